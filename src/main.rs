use log::*;
use service::config::Config;
use service::logging::Logger;
use service::store::ResultStore;
use service::AppState;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config);

    // Best-effort consistency checks between BASE_URL and the registered
    // callback URL. A mismatch is a deployment problem, not a reason to crash.
    for warning in config.preflight_warnings() {
        warn!("[preflight] {warning}");
    }

    info!("BASE_URL={}", config.base_url());
    info!("CALLBACK_URL={}", config.callback_url());
    info!("Results file: {}", config.data_file().display());

    let store = Arc::new(ResultStore::new(config.data_file()));
    let app_state = AppState::new(config, &store);

    if let Err(error) = web::init_server(app_state).await {
        error!("Server failed: {error}");
        std::process::exit(1);
    }
}
