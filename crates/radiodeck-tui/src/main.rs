mod action;
mod app;
mod app_state;
mod component;
mod components;
mod favicon;
mod focus;
mod mpv;
mod player;
mod theme;
mod widgets;

use radiodeck_core::api::DirectoryClient;
use radiodeck_core::config::Config;
use radiodeck_core::nav::Category;
use radiodeck_core::platform;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let log_path = data_dir.join("radiodeck.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; default to debug for app code but suppress noisy
    // connection-level DEBUG from HTTP client internals (hyper_util, reqwest).
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("radiodeck log: {}", log_path.display());

    tracing::info!("radiodeck starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let config = Config::load().unwrap_or_default();
    let initial = Category::from_key(&config.ui.default_category).unwrap_or_else(|| {
        tracing::warn!(
            "unknown default_category {:?}, using all",
            config.ui.default_category
        );
        Category::All
    });

    // ── Directory + favicon clients ──────────────────────────────────────────
    let client = DirectoryClient::new(&config.api)?;
    let favicon_client = favicon::probe_client(&config.api.user_agent)?;
    tracing::info!("directory: {}", client.base_url());

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let app = app::App::new(&config, initial, client, favicon_client, log_path);
    app.run().await
}
