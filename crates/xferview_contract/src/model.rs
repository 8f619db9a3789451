use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

pub type ResourceId = i64;
pub type TransferId = i64;
pub type OwnerId = i64;
pub type CoordinatorId = i64;

/// A transferable file tracked by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resource {
    pub id: ResourceId,
    pub path: String,
    /// File size in bytes.
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<OwnerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
}

impl Resource {
    pub fn filename(&self) -> &str {
        display_filename(&self.path)
    }
}

/// One transfer attempt for a [`Resource`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransferRecord {
    pub id: TransferId,
    pub resource: Resource,
    pub start_time: String,
    #[serde(default)]
    pub finish_time: Option<String>,
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinator: Option<CoordinatorId>,
}

impl TransferRecord {
    pub fn filename(&self) -> &str {
        self.resource.filename()
    }

    pub fn started_at(&self) -> Option<DateTime<FixedOffset>> {
        parse_timestamp(&self.start_time)
    }

    pub fn finished_at(&self) -> Option<DateTime<FixedOffset>> {
        self.finish_time.as_deref().and_then(parse_timestamp)
    }
}

/// Last `/`-separated segment of `path`.
pub fn display_filename(path: &str) -> &str {
    match path.rfind('/') {
        Some(index) => &path[index + 1..],
        None => path,
    }
}

/// Parses an RFC 3339 timestamp as emitted by the backend serializers.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw.trim()).ok()
}
