//! Controllers for the guessing game endpoints: who am I, submit a guess,
//! and the public scoreboard.

use crate::error::{Error, Result as WebResult, WebErrorKind};
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::AppState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use domain::guess;
use domain::session::SessionManager;
use serde_json::json;
use tower_sessions::Session;

/// GET /api/me
///
/// Reports whether the session carries an authenticated identity. Never an
/// error: an anonymous visitor simply gets `authenticated: false`.
#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Authentication state of the current session", body = serde_json::Value),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn me(session: Session) -> WebResult<impl IntoResponse> {
    match SessionManager::new(&session).current_user().await? {
        Some(user) => Ok(Json(json!({ "authenticated": true, "login": user.login }))),
        None => Ok(Json(json!({ "authenticated": false }))),
    }
}

/// POST /api/submit
///
/// Records the caller's one-shot guess. Requires an authenticated session;
/// the body must be a JSON object with a string `word`. Repeat calls return
/// the originally recorded result untouched.
#[utoipa::path(
    post,
    path = "/api/submit",
    request_body(content = serde_json::Value, content_type = "application/json",
        example = json!({"word": "babelfish"})),
    responses(
        (status = 200, description = "Recorded (or previously recorded) result", body = service::store::SubmissionOutcome),
        (status = 400, description = "Body is not an object with a string `word`"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal Server Error")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn submit(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> WebResult<impl IntoResponse> {
    let word = body
        .get("word")
        .and_then(|w| w.as_str())
        .ok_or(Error::Web(WebErrorKind::Input))?;

    let outcome = guess::record_first_submission(
        app_state.results_ref(),
        &user.login,
        word,
        app_state.config.target_word(),
    )
    .await?;

    Ok(Json(outcome))
}

/// GET /api/results
///
/// Public scoreboard: every recorded identity with its win flag, ordered by
/// login. The submitted words stay private.
#[utoipa::path(
    get,
    path = "/api/results",
    responses(
        (status = 200, description = "Scoreboard entries", body = [service::store::ResultSummary]),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn results(State(app_state): State<AppState>) -> WebResult<impl IntoResponse> {
    let entries = guess::summary(app_state.results_ref()).await?;
    Ok(Json(entries))
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{json_body, login_as, response_body, test_app};
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    fn submit_request(cookie: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri("/api/submit")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_me_reports_unauthenticated_without_session() {
        let dir = tempfile::TempDir::new().unwrap();
        let app = test_app("https://api.intra.42.fr", dir.path());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/me")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({ "authenticated": false }));
    }

    #[tokio::test]
    async fn test_submit_requires_authentication() {
        let dir = tempfile::TempDir::new().unwrap();
        let app = test_app("https://api.intra.42.fr", dir.path());

        let response = app
            .oneshot(submit_request(None, r#"{"word":"x"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_submit_rejects_non_string_word() {
        let mut server = mockito::Server::new_async().await;
        let dir = tempfile::TempDir::new().unwrap();
        let app = test_app(&server.url(), dir.path());
        let cookie = login_as(&app, &mut server, "alice").await;

        let response = app
            .oneshot(submit_request(Some(&cookie), r#"{"word":42}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response_body(response).await, "Invalid word");
    }

    #[tokio::test]
    async fn test_full_contest_flow() {
        let mut server = mockito::Server::new_async().await;
        let dir = tempfile::TempDir::new().unwrap();
        let app = test_app(&server.url(), dir.path());

        // Unauthenticated submission is rejected outright.
        let response = app
            .clone()
            .oneshot(submit_request(None, r#"{"word":"x"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // Authenticate as alice through the mocked provider.
        let cookie = login_as(&app, &mut server, "alice").await;

        // /api/me now reports the identity.
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/me")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            json_body(response).await,
            json!({ "authenticated": true, "login": "alice" })
        );

        // First submission wins (case-insensitive match on the target).
        let response = app
            .clone()
            .oneshot(submit_request(Some(&cookie), r#"{"word":"Babelfish"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["alreadySubmitted"], false);
        assert_eq!(body["result"]["win"], true);
        assert_eq!(body["result"]["word"], "Babelfish");

        // Repeat submission with a different word comes back unchanged.
        let response = app
            .clone()
            .oneshot(submit_request(Some(&cookie), r#"{"word":"nope"}"#))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["alreadySubmitted"], true);
        assert_eq!(body["result"]["win"], true);
        assert_eq!(body["result"]["word"], "Babelfish");

        // The scoreboard lists alice's win and hides the word.
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/results")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body, json!([{ "login": "alice", "win": true }]));

        // Logout destroys the session; /api/me is anonymous again.
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/auth/logout")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(json_body(response).await, json!({ "ok": true }));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/me")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(json_body(response).await, json!({ "authenticated": false }));
    }

    #[tokio::test]
    async fn test_results_is_public_and_ordered() {
        let mut server = mockito::Server::new_async().await;
        let dir = tempfile::TempDir::new().unwrap();
        let app = test_app(&server.url(), dir.path());

        for (login, word) in [("zoe", "babelfish"), ("bob", "wrong")] {
            let cookie = login_as(&app, &mut server, login).await;
            let response = app
                .clone()
                .oneshot(submit_request(
                    Some(&cookie),
                    &format!(r#"{{"word":"{word}"}}"#),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        // No cookie at all: the scoreboard is public.
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/results")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            json_body(response).await,
            json!([
                { "login": "bob", "win": false },
                { "login": "zoe", "win": true }
            ])
        );
    }
}
