mod render;

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use tracing::{info, warn};
use xferview_contract::TransferId;
use xferview_host::{DomRenderer, InMemoryDom, ReqwestHttpClient, StaticCookieStore};
use xferview_tables::{HistoryFilter, PageController, PageTables};

use crate::render::{render_html, render_text};

#[derive(Debug, Parser)]
#[command(author, version, about = "Transfer front-end table renderer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load both tables from the backend and print them.
    Render {
        #[arg(long, default_value = "config/page.toml")]
        config: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Overrides `session.cookies` from the config file.
        #[arg(long)]
        cookies: Option<String>,
        /// Tick every download checkbox before printing.
        #[arg(long)]
        select_all: bool,
    },
    /// Load the history table and print the detail of one transfer.
    Detail {
        #[arg(long, default_value = "config/page.toml")]
        config: PathBuf,
        #[arg(long)]
        id: TransferId,
        #[arg(long)]
        cookies: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Html,
    Text,
}

#[derive(Debug, Clone, Deserialize)]
struct PageConfig {
    backend: BackendSection,
    #[serde(default)]
    session: SessionSection,
    #[serde(default)]
    history: HistorySection,
    #[serde(default)]
    tables: TablesSection,
}

#[derive(Debug, Clone, Deserialize)]
struct BackendSection {
    base_url: String,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SessionSection {
    #[serde(default)]
    cookies: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct HistorySection {
    completed: Option<bool>,
    success: Option<bool>,
    download: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
struct TablesSection {
    download: String,
    history: String,
}

impl Default for TablesSection {
    fn default() -> Self {
        let tables = PageTables::default();
        Self {
            download: tables.download,
            history: tables.history,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,reqwest=warn".into()),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Render {
            config,
            format,
            cookies,
            select_all,
        } => run_render(config, format, cookies, select_all).await,
        Command::Detail {
            config,
            id,
            cookies,
        } => run_detail(config, id, cookies).await,
    }
}

struct Page {
    controller: PageController,
    dom: Arc<InMemoryDom>,
    tables: PageTables,
}

fn load_config(config_path: &Path) -> Result<PageConfig> {
    let config_source = std::fs::read_to_string(config_path)
        .with_context(|| format!("failed to read config file {}", config_path.display()))?;
    toml::from_str(&config_source)
        .with_context(|| format!("invalid config TOML at {}", config_path.display()))
}

fn build_page(config: PageConfig, cookies: Option<String>) -> Result<Page> {
    let timeout = config.backend.timeout_secs.map(Duration::from_secs);
    let http = ReqwestHttpClient::new(&config.backend.base_url, timeout)
        .with_context(|| format!("invalid backend url {}", config.backend.base_url))?;
    info!(backend = %http.base_url(), "using backend");

    let cookies = cookies.unwrap_or(config.session.cookies);
    if cookies.is_empty() {
        warn!("no cookies configured: requests will not carry a session token");
    }

    let tables = PageTables {
        download: config.tables.download,
        history: config.tables.history,
    };
    let dom = Arc::new(InMemoryDom::with_tables([
        tables.download.clone(),
        tables.history.clone(),
    ]));
    let renderer: Arc<dyn DomRenderer> = dom.clone();

    let controller = PageController::builder(
        Arc::new(StaticCookieStore::new(cookies)),
        Arc::new(http),
        renderer,
    )
    .tables(tables.clone())
    .history_filter(HistoryFilter {
        completed: config.history.completed,
        success: config.history.success,
        download: config.history.download,
    })
    .build();

    Ok(Page {
        controller,
        dom,
        tables,
    })
}

async fn run_render(
    config_path: PathBuf,
    format: OutputFormat,
    cookies: Option<String>,
    select_all: bool,
) -> Result<()> {
    let page = build_page(load_config(&config_path)?, cookies)?;
    let report = page.controller.load().await;
    if let Some(err) = report.resources.error() {
        warn!(error = %err, "download table left empty");
    }
    if let Some(err) = report.history.error() {
        warn!(error = %err, "history table left empty");
    }

    if select_all {
        let checked = page
            .controller
            .select_all(true)
            .context("failed to select download rows")?;
        info!(checked, "selected all download rows");
    }

    let table_ids = [page.tables.download.as_str(), page.tables.history.as_str()];
    let output = match format {
        OutputFormat::Html => render_html(&page.dom, &table_ids),
        OutputFormat::Text => render_text(&page.dom, &table_ids),
    };
    print!("{output}");
    Ok(())
}

async fn run_detail(config_path: PathBuf, id: TransferId, cookies: Option<String>) -> Result<()> {
    let page = build_page(load_config(&config_path)?, cookies)?;
    let outcome = page.controller.load_history().await;
    if let Some(err) = outcome.error() {
        return Err(anyhow!("transfer history unavailable: {err}"));
    }

    let detail = page
        .controller
        .show_detail(id)
        .ok_or_else(|| anyhow!("transfer {id} is not in the history"))?;
    println!(
        "{}",
        serde_json::to_string_pretty(&detail).context("serialize transfer detail")?
    );
    Ok(())
}
