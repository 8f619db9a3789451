use std::sync::Arc;

use tracing::{info, warn};
use xferview_contract::TransferId;
use xferview_host::{CookieStore, DomRenderer, HostError, HttpClient};

use crate::error::LoadOutcome;
use crate::history::{
    DetailSink, HistoryFilter, HistoryTableLoader, TransferDetail, HISTORY_TABLE_ID,
};
use crate::resources::{ResourceTableLoader, DOWNLOAD_TABLE_ID};
use crate::session::SessionTokenAccessor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTables {
    pub download: String,
    pub history: String,
}

impl Default for PageTables {
    fn default() -> Self {
        Self {
            download: DOWNLOAD_TABLE_ID.to_string(),
            history: HISTORY_TABLE_ID.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct PageReport {
    pub resources: LoadOutcome,
    pub history: LoadOutcome,
}

/// Owns the page's loaders and performs the page-load sequence.
pub struct PageController {
    session: SessionTokenAccessor,
    dom: Arc<dyn DomRenderer>,
    resources: ResourceTableLoader,
    history: HistoryTableLoader,
}

impl PageController {
    pub fn new(
        cookies: Arc<dyn CookieStore>,
        http: Arc<dyn HttpClient>,
        dom: Arc<dyn DomRenderer>,
    ) -> Self {
        Self::builder(cookies, http, dom).build()
    }

    pub fn builder(
        cookies: Arc<dyn CookieStore>,
        http: Arc<dyn HttpClient>,
        dom: Arc<dyn DomRenderer>,
    ) -> PageControllerBuilder {
        PageControllerBuilder {
            cookies,
            http,
            dom,
            tables: PageTables::default(),
            filter: HistoryFilter::default(),
            detail_sink: None,
        }
    }

    /// Reads the session token once and runs both table loads concurrently.
    /// Each load succeeds or fails on its own; nothing is raised to the caller.
    pub async fn load(&self) -> PageReport {
        let token = self.session_token();

        let (resources, history) = futures::join!(
            self.resources.load(token.as_deref()),
            self.history.load(token.as_deref())
        );

        info!(
            resources = resources.rows(),
            resources_ok = resources.is_rendered(),
            history = history.rows(),
            history_ok = history.is_rendered(),
            "page load finished"
        );
        PageReport { resources, history }
    }

    /// Loads only the history table and refreshes the detail cache.
    ///
    /// Rows are appended on every call, so calling this after [`Self::load`]
    /// renders the history a second time.
    pub async fn load_history(&self) -> LoadOutcome {
        let token = self.session_token();
        self.history.load(token.as_deref()).await
    }

    pub fn session_token(&self) -> Option<String> {
        let token = self.session.csrf_token();
        if token.is_none() {
            warn!("no csrftoken cookie present, requests go out without a token");
        }
        token
    }

    pub fn show_detail(&self, id: TransferId) -> Option<TransferDetail> {
        self.history.show_detail(id)
    }

    /// The "select all" checkbox over the download table.
    pub fn select_all(&self, checked: bool) -> Result<usize, HostError> {
        self.dom.set_all_checked(self.resources.table_id(), checked)
    }
}

pub struct PageControllerBuilder {
    cookies: Arc<dyn CookieStore>,
    http: Arc<dyn HttpClient>,
    dom: Arc<dyn DomRenderer>,
    tables: PageTables,
    filter: HistoryFilter,
    detail_sink: Option<DetailSink>,
}

impl PageControllerBuilder {
    pub fn tables(mut self, tables: PageTables) -> Self {
        self.tables = tables;
        self
    }

    pub fn history_filter(mut self, filter: HistoryFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn detail_sink(mut self, sink: DetailSink) -> Self {
        self.detail_sink = Some(sink);
        self
    }

    pub fn build(self) -> PageController {
        let resources = ResourceTableLoader::new(Arc::clone(&self.http), Arc::clone(&self.dom))
            .with_table_id(self.tables.download);

        let mut history = HistoryTableLoader::new(self.http, Arc::clone(&self.dom))
            .with_table_id(self.tables.history)
            .with_filter(self.filter);
        if let Some(sink) = self.detail_sink {
            history = history.with_detail_sink(sink);
        }

        PageController {
            session: SessionTokenAccessor::new(self.cookies),
            dom: self.dom,
            resources,
            history,
        }
    }
}
