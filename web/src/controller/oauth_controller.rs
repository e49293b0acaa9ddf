//! Controller for the 42 intra OAuth login flow.
//!
//! Note: these endpoints work via browser redirects, so every failure
//! surfaces as a plain status code the browser can render; the user restarts
//! the flow manually.

use crate::{AppState, Error};

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect};

use domain::oauth_login;
use domain::session::SessionManager;
use serde::Deserialize;
use tower_sessions::Session;

/// Query parameters for the OAuth callback
#[derive(Debug, Deserialize)]
pub struct OAuthCallback {
    pub code: Option<String>,
    pub state: Option<String>,
}

/// GET /auth/42/login
///
/// Initiates the flow: mints a state token, stores it in the session as the
/// pending login, and redirects to the provider's authorization endpoint.
#[utoipa::path(
    get,
    path = "/auth/42/login",
    responses(
        (status = 307, description = "Redirect to the 42 intra authorization endpoint"),
        (status = 500, description = "Server error (OAuth credentials not configured)"),
    )
)]
pub async fn login(
    session: Session,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    let (url, state) = oauth_login::authorize_url(&app_state.config)?;
    SessionManager::new(&session).begin_login(&state).await?;
    Ok(Redirect::temporary(&url))
}

/// GET /auth/42/callback
///
/// Finishes the flow after the provider redirected back: validates the state
/// against the session's pending token, exchanges the code, fetches the
/// user, and stores the identity in the session.
#[utoipa::path(
    get,
    path = "/auth/42/callback",
    params(
        ("code" = Option<String>, Query, description = "Authorization code from the provider"),
        ("state" = Option<String>, Query, description = "State token echoed back by the provider"),
    ),
    responses(
        (status = 307, description = "Redirect to / on success"),
        (status = 400, description = "Missing or mismatched state"),
        (status = 500, description = "Token exchange or user fetch failed"),
    )
)]
pub async fn callback(
    session: Session,
    State(app_state): State<AppState>,
    Query(params): Query<OAuthCallback>,
) -> Result<impl IntoResponse, Error> {
    let manager = SessionManager::new(&session);
    let pending_state = manager.take_pending_state().await?;

    let identity = oauth_login::handle_callback(
        &app_state.config,
        params.code.as_deref(),
        params.state.as_deref(),
        pending_state.as_deref(),
    )
    .await?;

    manager.complete_login(&identity).await?;
    Ok(Redirect::temporary("/"))
}
