use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use log::info;

use crate::{
    config::Config,
    data::{
        signal::{Producer, Shutdown},
        state_channel, State,
    },
    render::view::CanvasView,
};

mod config;
mod data;
mod gui;
mod headless;
mod render;
mod tui;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Frontend {
    Gui,
    Tui,
    Headless,
}

/// Circles following a sliding window of sine samples.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// TOML configuration file; built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = Frontend::Gui)]
    frontend: Frontend,

    /// Frames to log before exiting in headless mode (0 runs until Ctrl-C).
    #[arg(long, default_value_t = 0)]
    updates: u64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The terminal canvas owns the screen, so keep stderr quiet unless asked otherwise.
    let default_filter = match cli.frontend {
        Frontend::Tui => "warn",
        Frontend::Gui | Frontend::Headless => "info",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_micros()
        .init();

    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };
    info!("configuration: {config:?}");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    let (publisher, subscriber) = state_channel(State::default());
    let view = CanvasView::new(&config, subscriber);
    let shutdown = Shutdown::new();
    let producer = runtime.spawn(Producer::new(&config.producer, publisher).run(shutdown.signal()));

    let result = match cli.frontend {
        Frontend::Gui => gui::run_gui_app(&config, view),
        Frontend::Tui => tui::run_tui_app(view, config.producer.interval()),
        Frontend::Headless => {
            let frames = runtime.block_on(headless::run_headless(view, cli.updates));
            info!("logged {frames} frames");
            Ok(())
        }
    };

    shutdown.trigger();
    runtime
        .block_on(producer)
        .context("producer task panicked")?;

    result
}
