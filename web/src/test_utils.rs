//! Shared fixtures for controller tests: a fully wired application with a
//! throwaway results file, plus helpers for cookie and body plumbing.

use crate::{router, session_layer, AppState};
use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use clap::Parser;
use serde_json::json;
use service::config::Config;
use service::store::ResultStore;
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

/// Builds the complete router, pointed at a mock provider and a temp
/// directory for the results file.
pub fn test_app(provider_base_url: &str, data_dir: &Path) -> Router {
    let config = Config::parse_from(["babelfish_rs"])
        .set_client_credentials("u-client", "s-secret")
        .set_provider_base_url(provider_base_url.to_string())
        .set_base_url("http://localhost:3000".to_string())
        .set_data_file(data_dir.join("results.json"));

    let sessions = session_layer(&config);
    let store = Arc::new(ResultStore::new(config.data_file()));
    let app_state = AppState::new(config, &store);

    router::define_routes(app_state).layer(sessions)
}

/// First `Set-Cookie` value with its attributes stripped, ready to send back
/// in a `Cookie` header.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    let raw = response.headers().get(header::SET_COOKIE)?.to_str().ok()?;
    Some(raw.split(';').next().unwrap_or(raw).to_string())
}

pub async fn response_body(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Pulls the `state` query parameter out of a redirect's `Location` header.
pub fn state_from_location(response: &Response<Body>) -> String {
    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap();
    let (_, rest) = location.split_once("state=").unwrap();
    rest.split('&').next().unwrap_or(rest).to_string()
}

/// Runs the full login flow against a mocked provider and returns the session
/// cookie carrying the authenticated identity.
pub async fn login_as(app: &Router, server: &mut mockito::Server, login: &str) -> String {
    // Unique code and token per login so every mock only answers its own
    // exchange, however many logins one test performs.
    let code = format!("code-{login}");
    let token = format!("tok-{login}");
    server
        .mock("POST", "/oauth/token")
        .match_body(mockito::Matcher::UrlEncoded("code".into(), code.clone()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "access_token": token,
                "token_type": "bearer",
                "expires_in": 7200,
                "scope": "public"
            })
            .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", "/v2/me")
        .match_header("authorization", format!("Bearer {token}").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "login": login }).to_string())
        .create_async()
        .await;

    let login_response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/auth/42/login")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(login_response.status().is_redirection());
    let cookie = session_cookie(&login_response).unwrap();
    let state = state_from_location(&login_response);

    let callback_response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/auth/42/callback?code={code}&state={state}"))
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(callback_response.status().is_redirection());

    // A fresh cookie is only issued if the store decided to cycle the id.
    session_cookie(&callback_response).unwrap_or(cookie)
}
