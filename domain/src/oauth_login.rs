//! Authorization-code login flow against the 42 intra provider.
//!
//! `authorize_url` starts a flow: it mints an unguessable state token and
//! builds the provider redirect. The caller must persist the returned state
//! into the session before redirecting. `handle_callback` finishes it:
//! state validation, code exchange, current-user fetch.

use crate::error::{AuthErrorKind, DomainErrorKind, Error, InternalErrorKind};
use crate::gateway::intra::{IntraOAuthClient, IntraOAuthUrls};
use crate::user::Identity;
use log::*;
use rand::Rng;
use service::config::Config;

/// Generate a fresh random state token: 32 random bytes, hex encoded.
pub fn generate_state() -> String {
    let random_bytes: [u8; 32] = rand::thread_rng().gen();
    hex::encode(random_bytes)
}

fn invalid_state() -> Error {
    Error {
        source: None,
        error_kind: DomainErrorKind::Auth(AuthErrorKind::InvalidState),
    }
}

fn create_client(config: &Config) -> Result<IntraOAuthClient, Error> {
    let client_id = config.client_id().ok_or_else(|| Error {
        source: None,
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
    })?;

    let client_secret = config.client_secret().ok_or_else(|| Error {
        source: None,
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
    })?;

    let urls = IntraOAuthUrls::for_base(config.provider_base_url());
    IntraOAuthClient::new(&client_id, &client_secret, &config.callback_url(), urls)
}

/// Build the provider authorization URL and the state token that goes with
/// it. Side effect contract: the caller stores the state in the session
/// before redirecting the browser.
pub fn authorize_url(config: &Config) -> Result<(String, String), Error> {
    let client = create_client(config)?;
    let state = generate_state();
    let url = client.authorization_url(&state);

    info!("Redirecting to 42 intra authorization endpoint");
    Ok((url, state))
}

/// Complete the callback leg of the flow.
///
/// Rejects with `InvalidState` when `code`, `state`, or the session's pending
/// state is missing, or when the two states differ, regardless of whether the
/// code would have been valid. On match, exchanges the code and fetches the
/// provider's current user.
pub async fn handle_callback(
    config: &Config,
    code: Option<&str>,
    state: Option<&str>,
    session_state: Option<&str>,
) -> Result<Identity, Error> {
    let (Some(code), Some(state), Some(session_state)) = (code, state, session_state) else {
        warn!("OAuth callback missing code, state, or pending session state");
        return Err(invalid_state());
    };

    if state != session_state {
        warn!("OAuth callback state does not match the session's pending state");
        return Err(invalid_state());
    }

    let client = create_client(config)?;
    let tokens = client.exchange_code(code).await?;
    let user = client.get_user(&tokens.access_token).await?;

    info!("Authenticated 42 user: {}", user.login);
    Ok(Identity { login: user.login })
}
