use http::StatusCode;
use thiserror::Error;
use xferview_contract::CodecError;
use xferview_host::HostError;

/// Every way a table load can fail. The page treats them all as "fetch failed".
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("session token is not a valid header value")]
    InvalidToken,
    #[error("transport failure: {0}")]
    Transport(#[source] HostError),
    #[error("{path} answered {status}")]
    Status { path: String, status: StatusCode },
    #[error("undecodable response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: CodecError,
    },
    #[error("failed to render row: {0}")]
    Render(#[source] HostError),
}

#[derive(Debug)]
pub enum LoadOutcome {
    Rendered { rows: usize },
    Failed(LoadError),
}

impl LoadOutcome {
    pub fn rows(&self) -> usize {
        match self {
            Self::Rendered { rows } => *rows,
            Self::Failed(_) => 0,
        }
    }

    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered { .. })
    }

    pub fn error(&self) -> Option<&LoadError> {
        match self {
            Self::Rendered { .. } => None,
            Self::Failed(error) => Some(error),
        }
    }
}
