use crate::{controller::health_check_controller, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::controller::{game_controller, oauth_controller, user_session_controller};

use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Babelfish Contest API"
        ),
        paths(
            game_controller::me,
            game_controller::submit,
            game_controller::results,
            oauth_controller::login,
            oauth_controller::callback,
            user_session_controller::logout,
            health_check_controller::health_check,
        ),
        components(
            schemas(
                service::store::StoredResult,
                service::store::SubmissionOutcome,
                service::store::ResultSummary,
            )
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "babelfish_rs", description = "One-shot word guessing contest API")
        )
    )]
struct ApiDoc;

struct SecurityAddon;

// Defines our cookie session based authentication requirement for gaining access to our
// API endpoints for OpenAPI.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "session",
                    "Session cookie issued on the first request via Set-Cookie header",
                ))),
            )
        }
    }
}

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(game_routes(app_state.clone()))
        .merge(health_routes())
        .merge(oauth_routes(app_state.clone()))
        .merge(user_session_routes())
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
        .fallback_service(static_routes())
}

fn game_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/api/me", get(game_controller::me))
        .route("/api/submit", post(game_controller::submit))
        .route("/api/results", get(game_controller::results))
        .with_state(app_state)
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn oauth_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/auth/42/login", get(oauth_controller::login))
        .route("/auth/42/callback", get(oauth_controller::callback))
        .with_state(app_state)
}

fn user_session_routes() -> Router {
    Router::new().route("/auth/logout", post(user_session_controller::logout))
}

pub fn static_routes() -> Router {
    Router::new().fallback_service(ServeDir::new("web-client"))
}
