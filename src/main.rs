use anyhow::{Context, Result};

mod boosts;
mod config;
mod cursor;
mod display;
mod errors;
mod feed;
mod gui;
mod poller;
mod render;
mod sound;
mod source;

use config::{Config, DEFAULT_CONFIG_FILE};
use gui::{GuiMessage, GuiRenderer};
use poller::Poller;
use render::ConsoleRenderer;
use source::HttpBoostSource;
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

#[derive(Parser, Debug)]
#[command(name = "boostfeed", version, about = "Watch a Helipad boost feed and pew for every boost")]
struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Base URL of the backend serving /boosts
    #[arg(long)]
    base_url: Option<String>,

    /// Chat/room id
    #[arg(long)]
    cid: Option<String>,

    /// Poll interval in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Log boosts to the console instead of opening a window
    #[arg(long)]
    headless: bool,
}

impl Cli {
    fn apply(&self, cfg: &mut Config) {
        if let Some(base_url) = &self.base_url {
            cfg.base_url = base_url.clone();
        }
        if let Some(cid) = &self.cid {
            cfg.cid = Some(cid.clone());
        }
        if let Some(interval_ms) = self.interval_ms {
            cfg.poll_interval_ms = interval_ms;
        }
    }
}

fn window_title(cfg: &Config) -> String {
    match cfg.cid.as_deref() {
        Some(cid) if !cid.is_empty() => format!("Boosts - {}", cid),
        _ => "Boosts".to_string(),
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut cfg = config::load_config(&cli.config)?;
    cli.apply(&mut cfg);
    cfg.validate().context("Invalid configuration")?;

    info!("Starting boostfeed {} against {}", env!("CARGO_PKG_VERSION"), cfg.base_url);
    if let Some(cid) = &cfg.cid {
        info!("Chat id: {}", cid);
    }

    let rt = tokio::runtime::Runtime::new()
        .context("Failed to start tokio runtime")?;

    let source = HttpBoostSource::new(&cfg.base_url, cfg.request_timeout())
        .context("Unable to create boost source")?;
    let notifier = rt.block_on(sound::build_notifier(&cfg, &source));

    let cancel = CancellationToken::new();

    if cli.headless {
        let poller = Poller::new(source, ConsoleRenderer::new(notifier), &cfg);

        let ctrl_c = cancel.clone();
        rt.spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutting down...");
            }
            ctrl_c.cancel();
        });

        rt.block_on(poller.run(cancel));
        return Ok(());
    }

    // Channel between the poller and the GUI
    let (tx, rx) = tokio::sync::mpsc::channel::<GuiMessage>(100);
    let poller = Poller::new(source, GuiRenderer::new(tx, notifier), &cfg);

    let poll_cancel = cancel.clone();
    let handle = rt.spawn(async move {
        poller.run(poll_cancel).await;
    });

    // Run the GUI on the main thread
    let result = gui::run_gui(window_title(&cfg), cfg.history_limit, rx);

    cancel.cancel();
    if let Err(e) = rt.block_on(handle) {
        warn!("Poller task ended abnormally: {}", e);
    }

    result
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
