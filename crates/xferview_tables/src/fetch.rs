use http::{HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::debug;
use xferview_contract::decode_list;
use xferview_host::{HttpClient, HttpRequest};

use crate::error::LoadError;

pub const CSRF_HEADER: &str = "x-csrftoken";

/// Issues the GET with the session token attached and decodes a record list.
pub(crate) async fn fetch_list<T: DeserializeOwned>(
    http: &dyn HttpClient,
    mut request: HttpRequest,
    token: Option<&str>,
) -> Result<Vec<T>, LoadError> {
    match token {
        Some(token) => {
            let value = HeaderValue::from_str(token).map_err(|_| LoadError::InvalidToken)?;
            request
                .headers
                .insert(HeaderName::from_static(CSRF_HEADER), value);
        }
        None => debug!(path = %request.path, "no session token, sending request without it"),
    }

    let path = request.path.clone();
    let response = http.get(request).await.map_err(LoadError::Transport)?;
    if !response.status.is_success() {
        return Err(LoadError::Status {
            path,
            status: response.status,
        });
    }

    decode_list(&response.body).map_err(|source| LoadError::Decode { path, source })
}
