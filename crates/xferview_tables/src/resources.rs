use std::sync::Arc;

use tracing::{error, info};
use xferview_contract::Resource;
use xferview_host::{Cell, DomRenderer, HttpClient, HttpRequest, TableRow};

use crate::error::{LoadError, LoadOutcome};
use crate::fetch::fetch_list;
use crate::size::format_size;

pub const RESOURCES_PATH: &str = "/resources/";
pub const DOWNLOAD_TABLE_ID: &str = "download-table";

/// Renders the user's active resources as a selectable table.
pub struct ResourceTableLoader {
    http: Arc<dyn HttpClient>,
    dom: Arc<dyn DomRenderer>,
    table_id: String,
}

impl ResourceTableLoader {
    pub fn new(http: Arc<dyn HttpClient>, dom: Arc<dyn DomRenderer>) -> Self {
        Self {
            http,
            dom,
            table_id: DOWNLOAD_TABLE_ID.to_string(),
        }
    }

    pub fn with_table_id(mut self, table_id: impl Into<String>) -> Self {
        self.table_id = table_id.into();
        self
    }

    pub fn table_id(&self) -> &str {
        &self.table_id
    }

    /// Fetches and renders once. Failures are logged and leave the table as it was.
    pub async fn load(&self, token: Option<&str>) -> LoadOutcome {
        match self.try_load(token).await {
            Ok(rows) => {
                info!(table = %self.table_id, rows, "active resources rendered");
                LoadOutcome::Rendered { rows }
            }
            Err(err) => {
                error!(table = %self.table_id, error = %err, "failed to load active resources");
                LoadOutcome::Failed(err)
            }
        }
    }

    async fn try_load(&self, token: Option<&str>) -> Result<usize, LoadError> {
        let request = HttpRequest::get(RESOURCES_PATH).with_query("is_active", "true");
        let resources: Vec<Resource> = fetch_list(self.http.as_ref(), request, token).await?;

        for resource in &resources {
            self.dom
                .append_row(&self.table_id, resource_row(resource))
                .map_err(LoadError::Render)?;
        }
        Ok(resources.len())
    }
}

pub fn resource_row(resource: &Resource) -> TableRow {
    TableRow::new(vec![
        Cell::Checkbox {
            value: resource.id.to_string(),
            checked: false,
        },
        Cell::Text(resource.filename().to_string()),
        Cell::Text(format_size(resource.size)),
    ])
}
