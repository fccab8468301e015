use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::task::LocalSet;
use tracing::{info, warn};

use browser_search::config::{self, Config};
use browser_search::logging;
use browser_search::popup::Popup;
use browser_search::providers::{
    ChromiumBookmarks, ChromiumHistory, FixtureProviders, LinkOpener, Providers,
    RecordingLinkOpener, SystemLinkOpener,
};
use browser_search::stdin_commands::{self, ExternalCommand};
use browser_search::terminal_view::TerminalListView;

/// Upper bound on waiting for in-flight queries once stdin closes
const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Parser)]
#[command(
    name = "browser-search",
    version,
    about = "Search open tabs, bookmarks and history from one input"
)]
struct Cli {
    /// JSON fixture supplying tabs, bookmarks and history
    #[arg(long, value_name = "FILE")]
    fixture: Option<PathBuf>,
    /// Chromium `Bookmarks` file (replaces fixture bookmarks)
    #[arg(long, value_name = "FILE")]
    bookmarks: Option<PathBuf>,
    /// Chromium `History` database (replaces fixture history)
    #[arg(long, value_name = "FILE")]
    history: Option<PathBuf>,
    /// Config file [default: ~/.browser-search/config.json]
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Run a single query, print the settled list and exit
    #[arg(long, allow_hyphen_values = true)]
    query: Option<String>,
    /// Print activated links instead of opening them
    #[arg(long, default_value_t = false)]
    dry_run: bool,
    /// Show this many recent log lines under the list
    #[arg(long, value_name = "N", default_value_t = 0)]
    log_lines: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = logging::init();

    let config = match &cli.config {
        Some(path) => config::load_config_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => config::load_config(),
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build runtime")?;
    let local = LocalSet::new();
    let result = local.block_on(&runtime, run(cli, config));

    info!(event_type = "app_lifecycle", action = "exiting", "Exiting");
    result
}

fn build_providers(cli: &Cli) -> Result<Providers> {
    let fixture = match &cli.fixture {
        Some(path) => FixtureProviders::load(path)
            .with_context(|| format!("Failed to load fixture {}", path.display()))?,
        None => FixtureProviders::default(),
    };

    let mut providers = Providers::from_fixture(fixture);
    if let Some(path) = &cli.bookmarks {
        providers.bookmarks = Rc::new(ChromiumBookmarks::new(path));
    }
    if let Some(path) = &cli.history {
        providers.history = Rc::new(ChromiumHistory::new(path));
    }
    Ok(providers)
}

async fn run(cli: Cli, config: Config) -> Result<()> {
    let providers = build_providers(&cli)?;

    let recorder = cli.dry_run.then(|| Rc::new(RecordingLinkOpener::new()));
    let opener: Rc<dyn LinkOpener> = match &recorder {
        Some(recorder) => recorder.clone(),
        None => Rc::new(SystemLinkOpener),
    };

    let view = Rc::new(RefCell::new(
        TerminalListView::new(std::io::stdout(), config.get_highlight())
            .with_log_footer(cli.log_lines),
    ));
    let popup = Popup::new(config, providers, Box::new(view.clone()), opener);

    match &cli.query {
        Some(query) => {
            view.borrow_mut().set_batching(true);
            popup.dispatch(query).finished().await;
            view.borrow_mut()
                .flush_frame()
                .context("Failed to write results")?;
        }
        None => run_interactive(&popup).await,
    }

    if let Some(recorder) = recorder {
        for url in recorder.opened() {
            println!("open {}", url);
        }
    }
    Ok(())
}

/// Feed stdin commands to the popup until `close` or EOF
async fn run_interactive(popup: &Popup) {
    let commands = stdin_commands::start_stdin_listener();

    while let Ok(command) = commands.recv().await {
        if let Some(id) = command.request_id() {
            info!(request_id = %id, "Handling command");
        }
        match &command {
            ExternalCommand::Input { text, .. } => popup.on_input(text),
            ExternalCommand::Key { .. } => match command.nav_key() {
                Some(Ok(key)) => {
                    popup.on_key(key);
                }
                Some(Err(e)) => warn!(error = %e, "Ignoring key command"),
                None => {}
            },
            ExternalCommand::Close { .. } => {
                popup.close();
                return;
            }
        }
    }

    // stdin closed: let the last input dispatch and settle
    let settled = tokio::time::timeout(SETTLE_TIMEOUT, async {
        while popup.has_pending_input() || !popup.is_settled() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    if settled.is_err() {
        warn!("Gave up waiting for providers");
    }
    popup.close();
}
