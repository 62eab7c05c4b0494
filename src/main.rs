use std::sync::Arc;

use chrono::Local;
use clap::Parser;
use color_eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::BookingClient;
use crate::app::App;
use crate::booking::{BookingScreen, Selection};
use crate::config::KeyResolver;
use crate::session::Session;
use crate::ui::StatusBar;

mod api;
mod app;
mod booking;
mod cli;
pub mod commands;
mod config;
pub mod screen;
mod search;
mod session;
mod theme;
pub mod tui;
mod ui;

pub use theme::Theme;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let _guard = initialize_logging()?;
    info!("Starting lazybook");

    let args = cli::Args::parse();

    let mut config = config::load()?;
    args.apply(&mut config);

    let provider_id = cli::initial_provider(&config)?;
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    info!("Booking with {} from {}", provider_id, date);

    let resolver = Arc::new(KeyResolver::new(Arc::new(config.keybindings.clone())));
    let theme = theme::theme_from_name(&config.theme.name);
    let api = Arc::new(BookingClient::new(&config.api)?);

    let screen = BookingScreen::new(
        api,
        Selection::new(provider_id, date, config.booking.date_picker),
        resolver.clone(),
    );
    let status_bar = StatusBar::new(Session::from_config(&config.session), resolver.clone());

    let mut app = App::new(Box::new(screen), status_bar, resolver, theme);
    app.run().await?;

    Ok(())
}

fn initialize_logging() -> Result<WorkerGuard> {
    let directory = dirs::data_local_dir().map_or_else(
        || std::path::PathBuf::from("logs"),
        |path| path.join("lazybook").join("logs"),
    );
    std::fs::create_dir_all(&directory)?;

    let file_appender = tracing_appender::rolling::daily(&directory, "lazybook.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .init();

    Ok(guard)
}
