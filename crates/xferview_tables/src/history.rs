use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use tracing::{debug, error, info, warn};
use xferview_contract::{TransferId, TransferRecord};
use xferview_host::{
    ActivationEvent, ActivationHandler, Cell, DomRenderer, HttpClient, HttpRequest, TableRow,
};

use crate::error::{LoadError, LoadOutcome};
use crate::fetch::fetch_list;

pub const TRANSFERS_PATH: &str = "/transferred-resources/";
pub const HISTORY_TABLE_ID: &str = "history-table";
pub const VIEW_CONTROL: &str = "view";
pub const VIEW_LABEL: &str = "View";
pub const UNFINISHED_MARK: &str = "-";

/// Computed view of one cached transfer.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TransferDetail {
    pub id: TransferId,
    pub filename: String,
    pub start_time: String,
    /// `"-"` for failed transfers.
    pub finish_time: String,
    /// Whole seconds between start and finish, for successful transfers with both timestamps.
    pub duration: Option<i64>,
}

/// Server-side filters accepted by the transfer list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    pub completed: Option<bool>,
    pub success: Option<bool>,
    pub download: Option<bool>,
}

impl HistoryFilter {
    fn apply(&self, mut request: HttpRequest) -> HttpRequest {
        let fields = [
            ("completed", self.completed),
            ("success", self.success),
            ("download", self.download),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                request = request.with_query(key, if value { "True" } else { "False" });
            }
        }
        request
    }
}

pub type DetailSink = Arc<dyn Fn(TransferDetail) + Send + Sync>;

#[derive(Clone, Default)]
struct HistoryCache {
    records: Arc<RwLock<HashMap<TransferId, TransferRecord>>>,
}

impl HistoryCache {
    fn read(&self) -> RwLockReadGuard<'_, HashMap<TransferId, TransferRecord>> {
        self.records
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<TransferId, TransferRecord>> {
        self.records
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn replace(&self, records: &[TransferRecord]) {
        let mut guard = self.write();
        guard.clear();
        guard.extend(records.iter().map(|record| (record.id, record.clone())));
    }

    fn detail(&self, id: TransferId) -> Option<TransferDetail> {
        let guard = self.read();
        let Some(record) = guard.get(&id) else {
            debug!(transfer_id = id, "detail requested for unknown transfer");
            return None;
        };
        Some(detail_of(record))
    }
}

/// Renders past transfers and answers detail lookups from the last fetch.
pub struct HistoryTableLoader {
    http: Arc<dyn HttpClient>,
    dom: Arc<dyn DomRenderer>,
    table_id: String,
    filter: HistoryFilter,
    cache: HistoryCache,
    detail_sink: Option<DetailSink>,
}

impl HistoryTableLoader {
    pub fn new(http: Arc<dyn HttpClient>, dom: Arc<dyn DomRenderer>) -> Self {
        Self {
            http,
            dom,
            table_id: HISTORY_TABLE_ID.to_string(),
            filter: HistoryFilter::default(),
            cache: HistoryCache::default(),
            detail_sink: None,
        }
    }

    pub fn with_table_id(mut self, table_id: impl Into<String>) -> Self {
        self.table_id = table_id.into();
        self
    }

    pub fn with_filter(mut self, filter: HistoryFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Receives the detail computed when a "View" control is activated.
    pub fn with_detail_sink(mut self, sink: DetailSink) -> Self {
        self.detail_sink = Some(sink);
        self
    }

    pub fn table_id(&self) -> &str {
        &self.table_id
    }

    pub fn cached_ids(&self) -> Vec<TransferId> {
        let mut ids: Vec<TransferId> = self.cache.read().keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Looks up a cached transfer. Unknown ids yield `None`; no request is made.
    pub fn show_detail(&self, id: TransferId) -> Option<TransferDetail> {
        self.cache.detail(id)
    }

    pub async fn load(&self, token: Option<&str>) -> LoadOutcome {
        match self.try_load(token).await {
            Ok(rows) => {
                info!(table = %self.table_id, rows, "transfer history rendered");
                LoadOutcome::Rendered { rows }
            }
            Err(err) => {
                error!(table = %self.table_id, error = %err, "failed to load transfer history");
                LoadOutcome::Failed(err)
            }
        }
    }

    async fn try_load(&self, token: Option<&str>) -> Result<usize, LoadError> {
        let request = self.filter.apply(HttpRequest::get(TRANSFERS_PATH));
        let records: Vec<TransferRecord> = fetch_list(self.http.as_ref(), request, token).await?;

        self.cache.replace(&records);
        for record in &records {
            self.dom
                .append_row(&self.table_id, history_row(record))
                .map_err(LoadError::Render)?;
        }

        self.dom
            .bind_activation(&self.table_id, VIEW_CONTROL, self.activation_handler())
            .map_err(LoadError::Render)?;
        Ok(records.len())
    }

    fn activation_handler(&self) -> ActivationHandler {
        let cache = self.cache.clone();
        let sink = self.detail_sink.clone();
        Arc::new(move |event: &mut ActivationEvent| {
            event.prevent_default();
            let Ok(id) = event.data_id.parse::<TransferId>() else {
                warn!(data_id = %event.data_id, "view control carries a non-numeric id");
                return;
            };
            let Some(detail) = cache.detail(id) else {
                return;
            };

            // TODO: render the detail into a panel once the page provides a target element for it.
            info!(
                transfer_id = detail.id,
                filename = %detail.filename,
                start_time = %detail.start_time,
                finish_time = %detail.finish_time,
                "transfer detail requested"
            );
            if let Some(sink) = &sink {
                sink(detail);
            }
        })
    }
}

pub fn history_row(record: &TransferRecord) -> TableRow {
    TableRow::new(vec![
        Cell::Text(record.filename().to_string()),
        Cell::Control {
            control: VIEW_CONTROL.to_string(),
            label: VIEW_LABEL.to_string(),
            data_id: record.id.to_string(),
        },
    ])
}

fn detail_of(record: &TransferRecord) -> TransferDetail {
    let finish_time = if record.success {
        record.finish_time.clone().unwrap_or_default()
    } else {
        UNFINISHED_MARK.to_string()
    };

    let duration = match (record.success, record.started_at(), record.finished_at()) {
        (true, Some(start), Some(finish)) => Some((finish - start).num_seconds()),
        _ => None,
    };

    TransferDetail {
        id: record.id,
        filename: record.filename().to_string(),
        start_time: record.start_time.clone(),
        finish_time,
        duration,
    }
}
