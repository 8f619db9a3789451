pub mod error;
mod fetch;
pub mod history;
pub mod page;
pub mod resources;
pub mod session;
pub mod size;

pub use error::{LoadError, LoadOutcome};
pub use fetch::CSRF_HEADER;
pub use history::{
    history_row, DetailSink, HistoryFilter, HistoryTableLoader, TransferDetail, HISTORY_TABLE_ID,
    TRANSFERS_PATH, VIEW_CONTROL,
};
pub use page::{PageController, PageControllerBuilder, PageReport, PageTables};
pub use resources::{resource_row, ResourceTableLoader, DOWNLOAD_TABLE_ID, RESOURCES_PATH};
pub use session::{find_cookie, SessionTokenAccessor, CSRF_COOKIE};
pub use size::format_size;
