//! 42 intra OAuth client.
//!
//! This module provides an HTTP client for the 42 intra OAuth endpoints:
//! building the authorization URL, exchanging an authorization code for an
//! access token, and fetching the current user.

use crate::error::{DomainErrorKind, Error, ExternalErrorKind};
use log::*;
use serde::{Deserialize, Serialize};

/// OAuth token response from the 42 intra token endpoint
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub scope: String,
}

/// Current user resource from the 42 intra API. Only the fields this
/// application needs; the real payload is much larger.
#[derive(Debug, Deserialize)]
pub struct IntraUser {
    pub login: String,
}

/// Request to exchange authorization code for tokens.
/// The 42 token endpoint expects x-www-form-urlencoded (RFC 6749).
#[derive(Debug, Serialize)]
struct TokenExchangeRequest {
    grant_type: String,
    client_id: String,
    client_secret: String,
    code: String,
    redirect_uri: String,
}

/// Configuration for the 42 intra OAuth URLs
#[derive(Debug, Clone)]
pub struct IntraOAuthUrls {
    pub auth_url: String,
    pub token_url: String,
    pub me_url: String,
}

impl IntraOAuthUrls {
    /// Derive the three endpoint URLs from a provider base URL.
    pub fn for_base(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            auth_url: format!("{base}/oauth/authorize"),
            token_url: format!("{base}/oauth/token"),
            me_url: format!("{base}/v2/me"),
        }
    }
}

/// OAuth client for the 42 intra identity provider
pub struct IntraOAuthClient {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    urls: IntraOAuthUrls,
}

impl IntraOAuthClient {
    /// Create a new 42 intra OAuth client with configurable URLs
    pub fn new(
        client_id: &str,
        client_secret: &str,
        redirect_uri: &str,
        urls: IntraOAuthUrls,
    ) -> Result<Self, Error> {
        let client = reqwest::Client::builder().use_rustls_tls().build()?;

        Ok(Self {
            client,
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            redirect_uri: redirect_uri.to_string(),
            urls,
        })
    }

    /// Generate the OAuth authorization URL for user consent.
    ///
    /// The redirect_uri here must be byte-identical to the one later used in
    /// the token exchange and to the URL registered with the provider.
    pub fn authorization_url(&self, state: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}",
            self.urls.auth_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode("public"),
            urlencoding::encode(state)
        )
    }

    /// Exchange an authorization code for an access token
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, Error> {
        let request = TokenExchangeRequest {
            grant_type: "authorization_code".to_string(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            code: code.to_string(),
            redirect_uri: self.redirect_uri.clone(),
        };

        debug!("Exchanging 42 OAuth code for tokens");

        let response = self
            .client
            .post(&self.urls.token_url)
            .form(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to reach 42 token endpoint: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
                }
            })?;

        if response.status().is_success() {
            let tokens: TokenResponse = response.json().await.map_err(|e| {
                warn!("Failed to parse 42 token response: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::TokenExchangeFailed),
                }
            })?;
            info!("Successfully exchanged 42 OAuth code for an access token");
            Ok(tokens)
        } else {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            warn!("42 token exchange failed: {} {}", status, error_text);
            Err(Error {
                source: None,
                error_kind: DomainErrorKind::External(ExternalErrorKind::TokenExchangeFailed),
            })
        }
    }

    /// Fetch the current user using the access token
    pub async fn get_user(&self, access_token: &str) -> Result<IntraUser, Error> {
        let response = self
            .client
            .get(&self.urls.me_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to reach 42 current-user endpoint: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
                }
            })?;

        if response.status().is_success() {
            let user: IntraUser = response.json().await.map_err(|e| {
                warn!("Failed to parse 42 current-user response: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::UserFetchFailed),
                }
            })?;
            Ok(user)
        } else {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            warn!("42 user fetch failed: {} {}", status, error_text);
            Err(Error {
                source: None,
                error_kind: DomainErrorKind::External(ExternalErrorKind::UserFetchFailed),
            })
        }
    }
}
