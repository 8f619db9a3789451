use std::sync::Arc;

use async_trait::async_trait;
use http::{HeaderMap, StatusCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("table {0} is not present in the document")]
    MissingTable(String),
}

#[derive(Debug, Clone, Default)]
pub struct HttpRequest {
    /// Path relative to the backend root, e.g. `/resources/`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
}

impl HttpRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// Source of the ambient `;`-separated cookie string.
pub trait CookieStore: Send + Sync {
    fn cookie_string(&self) -> String;
}

#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, HostError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Checkbox { value: String, checked: bool },
    Text(String),
    /// A clickable control tagged with a record id.
    Control {
        control: String,
        label: String,
        data_id: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<Cell>,
}

impl TableRow {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    pub fn text(&self, column: usize) -> Option<&str> {
        match self.cells.get(column)? {
            Cell::Text(value) => Some(value),
            Cell::Checkbox { value, .. } => Some(value),
            Cell::Control { label, .. } => Some(label),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationEvent {
    pub table_id: String,
    pub control: String,
    pub data_id: String,
    default_prevented: bool,
}

impl ActivationEvent {
    pub fn new(
        table_id: impl Into<String>,
        control: impl Into<String>,
        data_id: impl Into<String>,
    ) -> Self {
        Self {
            table_id: table_id.into(),
            control: control.into(),
            data_id: data_id.into(),
            default_prevented: false,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

pub type ActivationHandler = Arc<dyn Fn(&mut ActivationEvent) + Send + Sync>;

/// Row-append view of the page's tables.
///
/// Rows are only ever appended. Binding a handler for a control that already
/// has one replaces it, so repeated renders never stack handlers.
pub trait DomRenderer: Send + Sync {
    fn append_row(&self, table_id: &str, row: TableRow) -> Result<(), HostError>;

    fn bind_activation(
        &self,
        table_id: &str,
        control: &str,
        handler: ActivationHandler,
    ) -> Result<(), HostError>;

    /// Sets every checkbox in the table, returning how many were touched.
    fn set_all_checked(&self, table_id: &str, checked: bool) -> Result<usize, HostError>;
}
