use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use http::StatusCode;
use tracing::debug;

use crate::host::{
    ActivationEvent, ActivationHandler, Cell, CookieStore, DomRenderer, HostError, HttpClient,
    HttpRequest, HttpResponse, TableRow,
};

#[derive(Debug, Clone, Default)]
pub struct StaticCookieStore {
    raw: String,
}

impl StaticCookieStore {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }
}

impl CookieStore for StaticCookieStore {
    fn cookie_string(&self) -> String {
        self.raw.clone()
    }
}

#[derive(Default)]
struct TableState {
    rows: Vec<TableRow>,
    handlers: HashMap<String, ActivationHandler>,
}

/// Headless document holding a fixed set of tables.
#[derive(Default)]
pub struct InMemoryDom {
    tables: Mutex<BTreeMap<String, TableState>>,
}

impl InMemoryDom {
    pub fn with_tables<I, S>(table_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tables = table_ids
            .into_iter()
            .map(|id| (id.into(), TableState::default()))
            .collect();
        Self {
            tables: Mutex::new(tables),
        }
    }

    pub fn rows(&self, table_id: &str) -> Vec<TableRow> {
        self.lock()
            .get(table_id)
            .map(|table| table.rows.clone())
            .unwrap_or_default()
    }

    pub fn handler_count(&self, table_id: &str) -> usize {
        self.lock()
            .get(table_id)
            .map(|table| table.handlers.len())
            .unwrap_or(0)
    }

    pub fn checked_values(&self, table_id: &str) -> Vec<String> {
        self.rows(table_id)
            .iter()
            .flat_map(|row| row.cells.iter())
            .filter_map(|cell| match cell {
                Cell::Checkbox {
                    value,
                    checked: true,
                } => Some(value.clone()),
                _ => None,
            })
            .collect()
    }

    /// Simulates a click on the control tagged `data_id`.
    ///
    /// Returns `None` when no such control is rendered or nothing is bound to it.
    pub fn activate(&self, table_id: &str, control: &str, data_id: &str) -> Option<ActivationEvent> {
        let handler = {
            let tables = self.lock();
            let table = tables.get(table_id)?;
            let rendered = table.rows.iter().flat_map(|row| row.cells.iter()).any(|cell| {
                matches!(
                    cell,
                    Cell::Control { control: c, data_id: d, .. } if c == control && d == data_id
                )
            });
            if !rendered {
                return None;
            }
            table.handlers.get(control)?.clone()
        };

        let mut event = ActivationEvent::new(table_id, control, data_id);
        handler(&mut event);
        Some(event)
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, TableState>> {
        self.tables
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DomRenderer for InMemoryDom {
    fn append_row(&self, table_id: &str, row: TableRow) -> Result<(), HostError> {
        let mut tables = self.lock();
        let table = tables
            .get_mut(table_id)
            .ok_or_else(|| HostError::MissingTable(table_id.to_string()))?;
        table.rows.push(row);
        Ok(())
    }

    fn bind_activation(
        &self,
        table_id: &str,
        control: &str,
        handler: ActivationHandler,
    ) -> Result<(), HostError> {
        let mut tables = self.lock();
        let table = tables
            .get_mut(table_id)
            .ok_or_else(|| HostError::MissingTable(table_id.to_string()))?;
        if table.handlers.insert(control.to_string(), handler).is_some() {
            debug!(table = %table_id, control = %control, "replaced existing activation handler");
        }
        Ok(())
    }

    fn set_all_checked(&self, table_id: &str, checked: bool) -> Result<usize, HostError> {
        let mut tables = self.lock();
        let table = tables
            .get_mut(table_id)
            .ok_or_else(|| HostError::MissingTable(table_id.to_string()))?;

        let mut touched = 0;
        for cell in table.rows.iter_mut().flat_map(|row| row.cells.iter_mut()) {
            if let Cell::Checkbox { checked: state, .. } = cell {
                *state = checked;
                touched += 1;
            }
        }
        Ok(touched)
    }
}

#[derive(Debug, Clone)]
enum Canned {
    Respond(StatusCode, Vec<u8>),
    Fail(String),
}

/// Answers requests from canned responses keyed by path and records what it saw.
#[derive(Debug, Clone, Default)]
pub struct StaticHttpClient {
    routes: HashMap<String, Canned>,
    seen: Arc<Mutex<Vec<HttpRequest>>>,
}

impl StaticHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, path: &str, status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        self.routes
            .insert(path.to_string(), Canned::Respond(status, body.into()));
        self
    }

    pub fn fail(mut self, path: &str, reason: &str) -> Self {
        self.routes
            .insert(path.to_string(), Canned::Fail(reason.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.seen
            .lock()
            .map(|seen| seen.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl HttpClient for StaticHttpClient {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, HostError> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(request.clone());
        }

        match self.routes.get(&request.path) {
            Some(Canned::Respond(status, body)) => Ok(HttpResponse {
                status: *status,
                body: body.clone(),
            }),
            Some(Canned::Fail(reason)) => Err(HostError::Transport {
                url: request.path,
                reason: reason.clone(),
            }),
            None => Ok(HttpResponse {
                status: StatusCode::NOT_FOUND,
                body: Vec::new(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::InMemoryDom;
    use crate::host::{ActivationEvent, Cell, DomRenderer, HostError, TableRow};

    fn checkbox_row(value: &str) -> TableRow {
        TableRow::new(vec![
            Cell::Checkbox {
                value: value.to_string(),
                checked: false,
            },
            Cell::Text(format!("{value}.txt")),
        ])
    }

    fn view_row(id: &str) -> TableRow {
        TableRow::new(vec![
            Cell::Text("f.txt".to_string()),
            Cell::Control {
                control: "view".to_string(),
                label: "View".to_string(),
                data_id: id.to_string(),
            },
        ])
    }

    #[test]
    fn append_to_unknown_table_is_an_error() {
        let dom = InMemoryDom::with_tables(["a"]);
        let err = dom.append_row("b", TableRow::default()).expect_err("missing");
        assert!(matches!(err, HostError::MissingTable(id) if id == "b"));
    }

    #[test]
    fn select_all_toggles_every_checkbox() {
        let dom = InMemoryDom::with_tables(["t"]);
        dom.append_row("t", checkbox_row("1")).expect("row");
        dom.append_row("t", checkbox_row("2")).expect("row");

        assert_eq!(dom.set_all_checked("t", true).expect("toggle"), 2);
        assert_eq!(dom.checked_values("t"), vec!["1", "2"]);

        assert_eq!(dom.set_all_checked("t", false).expect("toggle"), 2);
        assert!(dom.checked_values("t").is_empty());
        assert!(dom.set_all_checked("missing", true).is_err());
    }

    #[test]
    fn rebinding_replaces_handler() {
        let dom = InMemoryDom::with_tables(["h"]);
        dom.append_row("h", view_row("5")).expect("row");

        let calls = Arc::new(AtomicUsize::new(0));
        for _ in 0..2 {
            let calls = Arc::clone(&calls);
            dom.bind_activation(
                "h",
                "view",
                Arc::new(move |event: &mut ActivationEvent| {
                    event.prevent_default();
                    calls.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .expect("bind");
        }

        let event = dom.activate("h", "view", "5").expect("activated");
        assert!(event.default_prevented());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(dom.handler_count("h"), 1);
    }

    #[test]
    fn activating_unrendered_control_does_nothing() {
        let dom = InMemoryDom::with_tables(["h"]);
        dom.bind_activation("h", "view", Arc::new(|_: &mut ActivationEvent| {}))
            .expect("bind");
        assert!(dom.activate("h", "view", "99").is_none());
    }
}
