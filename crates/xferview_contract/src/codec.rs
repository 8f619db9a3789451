use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("response body is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error("expected a JSON array of records, found {0}")]
    NotAList(&'static str),
    #[error("record {index} does not match the expected shape: {source}")]
    Record {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Decodes a list endpoint body into records, preserving response order.
pub fn decode_list<T: DeserializeOwned>(bytes: &[u8]) -> Result<Vec<T>, CodecError> {
    let value: Value = serde_json::from_slice(bytes).map_err(CodecError::InvalidJson)?;
    let items = match value {
        Value::Array(items) => items,
        other => return Err(CodecError::NotAList(kind_of(&other))),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|source| CodecError::Record { index, source })
        })
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_list, CodecError};
    use crate::Resource;

    #[test]
    fn keeps_response_order() {
        let body = br#"[
            {"id": 2, "path": "b/second.txt", "size": 1, "is_active": true},
            {"id": 1, "path": "a/first.txt", "size": 2, "is_active": true}
        ]"#;

        let resources: Vec<Resource> = decode_list(body).expect("decode");
        let ids: Vec<i64> = resources.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn rejects_paginated_object_bodies() {
        let err = decode_list::<Resource>(br#"{"results": []}"#).expect_err("object body");
        assert!(matches!(err, CodecError::NotAList("an object")));
    }

    #[test]
    fn reports_index_of_bad_record() {
        let body = br#"[{"id": 1, "path": "ok"}, {"id": "x"}]"#;
        let err = decode_list::<Resource>(body).expect_err("bad record");
        assert!(matches!(err, CodecError::Record { index: 1, .. }));
    }
}
