use crate::extractors::RejectionType;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use domain::session::SessionManager;
use domain::Identity;
use log::*;
use tower_sessions::Session;

pub(crate) struct AuthenticatedUser(pub Identity);

// Wraps the session extractor: pulls the authenticated identity out of the
// session and rejects with 401 when there is none. Protected endpoints get an
// identity or never run; absence is an explicit error, not a default.
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = RejectionType;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(status, msg)| (status, msg.to_string()))?;

        match SessionManager::new(&session).current_user().await {
            Ok(Some(identity)) => Ok(AuthenticatedUser(identity)),
            Ok(None) => Err((StatusCode::UNAUTHORIZED, "Unauthorized".to_string())),
            Err(e) => {
                warn!("Failed to read identity from session: {e:?}");
                Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL SERVER ERROR".to_string(),
                ))
            }
        }
    }
}
