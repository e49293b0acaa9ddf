use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use log::*;
use service::config::Config;
use sha2::{Digest, Sha512};
use tower_http::cors::CorsLayer;
use tower_sessions::cookie::{Key, SameSite};
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

pub use self::error::{Error, Result};
pub use service::AppState;

pub(crate) mod controller;
pub(crate) mod error;
pub(crate) mod extractors;
pub(crate) mod router;

#[cfg(test)]
mod test_utils;

pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let interface = app_state
        .config
        .interface
        .clone()
        .unwrap_or_else(|| "0.0.0.0".to_string());
    let port = app_state.config.port;

    let listener = tokio::net::TcpListener::bind((interface.as_str(), port)).await?;
    info!("Server starting... listening on {interface}:{port}");

    let cors = cors_layer(&app_state.config);
    let sessions = session_layer(&app_state.config);

    let app = router::define_routes(app_state)
        .layer(cors)
        .layer(sessions);

    axum::serve(listener, app).await
}

/// Cookie-backed session management. The cookie only carries a signed session
/// id; the state itself lives in the in-process store and evaporates on
/// restart.
pub(crate) fn session_layer(config: &Config) -> SessionManagerLayer<MemoryStore, SignedCookie> {
    // Stretch the configured secret to the 64 bytes the signing key wants.
    let key = Key::from(Sha512::digest(config.session_secret().as_bytes()).as_slice());

    SessionManagerLayer::new(MemoryStore::default())
        .with_name("session")
        .with_secure(config.is_production())
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::seconds(
            config.session_expiry_seconds as i64,
        )))
        .with_signed(key)
}

pub(crate) fn cors_layer(config: &Config) -> CorsLayer {
    let origins = config
        .allowed_origins
        .iter()
        .filter_map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| warn!("Ignoring unparsable CORS origin {origin:?}"))
                .ok()
        })
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true)
}
