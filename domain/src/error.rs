//! Error types for the `domain` layer.
//!
//! Errors are modeled as a tree: `Error` is the root, holding the original
//! failure as `source` and a kind enum describing where in the system it
//! belongs. Lower layers (`service::store`, reqwest, tower-sessions) are
//! translated into this tree at the boundary so the `web` layer can map
//! kinds to HTTP status codes without depending on infrastructure crates.

use service::store::Error as StoreError;
use std::error::Error as StdError;
use std::fmt;

#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
    Auth(AuthErrorKind),
}

#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    /// Required configuration (provider credentials) is absent.
    Config,
    /// Session read or write failed.
    Session,
    /// The result store failed outside the bootstrap case.
    Store,
    Other(String),
}

/// Authentication failures that are the caller's to fix by restarting the
/// login flow.
#[derive(Debug, PartialEq)]
pub enum AuthErrorKind {
    /// Missing or mismatched OAuth state token (CSRF / replay rejection).
    InvalidState,
    /// No authenticated identity in the session.
    Unauthenticated,
}

/// Failures while talking to the identity provider.
#[derive(Debug, PartialEq)]
pub enum ExternalErrorKind {
    /// Transport-level failure before a provider response was received.
    Network,
    /// The provider rejected the authorization-code exchange.
    TokenExchangeFailed,
    /// The provider rejected the current-user fetch.
    UserFetchFailed,
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Store),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // Errors that result from issues building the reqwest::Client instance. This
        // type of error will occur prior to any network calls being made.
        if err.is_builder() {
            Error {
                source: Some(Box::new(err)),
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                    "Failed to build reqwest client".to_string(),
                )),
            }
        // Errors that result from issues with the network call itself.
        } else {
            Error {
                source: Some(Box::new(err)),
                error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
            }
        }
    }
}

impl From<tower_sessions::session::Error> for Error {
    fn from(err: tower_sessions::session::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Session),
        }
    }
}
