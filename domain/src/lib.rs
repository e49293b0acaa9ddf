//! Business layer for the word-guess contest: the OAuth login flow, the
//! session contract, and the game rules. Infrastructure (config, logging,
//! the flat-file store) lives in the `service` crate; HTTP concerns live in
//! `web`.

// Re-export from `service` so `web` controllers work against one surface
// for data-model types.
pub use service::store::{ResultSummary, StoredResult, SubmissionOutcome};

pub mod error;
pub mod gateway;
pub mod guess;
pub mod oauth_login;
pub mod session;
pub mod user;

pub use user::Identity;
