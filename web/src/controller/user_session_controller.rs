use crate::error::Result as WebResult;
use axum::response::IntoResponse;
use axum::Json;
use domain::session::SessionManager;
use log::*;
use serde_json::json;
use tower_sessions::Session;

/// Logs the user out by destroying their session entirely: both a pending
/// login state and an authenticated identity are gone afterwards.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Session destroyed", body = serde_json::Value),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn logout(session: Session) -> WebResult<impl IntoResponse> {
    trace!("UserSessionController::logout()");
    SessionManager::new(&session).logout().await?;
    Ok(Json(json!({ "ok": true })))
}
