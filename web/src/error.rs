use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use domain::error::{
    AuthErrorKind, DomainErrorKind, Error as DomainError, ExternalErrorKind, InternalErrorKind,
};
use log::*;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Domain(DomainError),
    Web(WebErrorKind),
}

/// Failures that originate in the web layer itself, before any domain logic
/// runs.
#[derive(Debug)]
pub enum WebErrorKind {
    Input,
    Auth,
}

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

// List of possible StatusCode variants https://docs.rs/http/latest/http/status/struct.StatusCode.html
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Domain(domain_error) => match domain_error.error_kind {
                DomainErrorKind::Auth(auth_error_kind) => match auth_error_kind {
                    AuthErrorKind::InvalidState => {
                        (StatusCode::BAD_REQUEST, "Invalid state").into_response()
                    }
                    AuthErrorKind::Unauthenticated => {
                        (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
                    }
                },
                DomainErrorKind::External(external_error_kind) => match external_error_kind {
                    ExternalErrorKind::Network => {
                        (StatusCode::BAD_GATEWAY, "BAD GATEWAY").into_response()
                    }
                    ExternalErrorKind::TokenExchangeFailed => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "Token exchange failed").into_response()
                    }
                    ExternalErrorKind::UserFetchFailed => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "User fetch failed").into_response()
                    }
                    ExternalErrorKind::Other(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
                    }
                },
                DomainErrorKind::Internal(internal_error_kind) => {
                    error!("Internal error: {internal_error_kind:?}");
                    match internal_error_kind {
                        InternalErrorKind::Config
                        | InternalErrorKind::Session
                        | InternalErrorKind::Store
                        | InternalErrorKind::Other(_) => {
                            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR")
                                .into_response()
                        }
                    }
                }
            },
            Error::Web(web_error_kind) => match web_error_kind {
                WebErrorKind::Input => (StatusCode::BAD_REQUEST, "Invalid word").into_response(),
                WebErrorKind::Auth => (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
            },
        }
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self::Domain(err.into())
    }
}
