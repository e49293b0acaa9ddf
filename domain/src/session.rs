//! Session Manager: typed access to the signed session.
//!
//! The session carries at most two values: a pending OAuth `state` token
//! during the login window, and the authenticated [`Identity`] afterwards.
//! Controllers never touch session keys directly; everything goes through
//! this wrapper so the backing store could change without touching callers.
//! A tampered or expired cookie never reaches this layer, the session
//! middleware already treats it as "no session".

use crate::error::Error;
use crate::user::Identity;
use tower_sessions::Session;

const SESSION_PENDING_STATE: &str = "auth:state";
const SESSION_USER: &str = "auth:user";

pub struct SessionManager<'a> {
    session: &'a Session,
}

impl<'a> SessionManager<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Stores a pending login state token, overwriting any prior one.
    pub async fn begin_login(&self, state: &str) -> Result<(), Error> {
        self.session
            .insert(SESSION_PENDING_STATE, state.to_string())
            .await?;
        Ok(())
    }

    /// Consumes and returns the pending state token, if any. The token is
    /// single-use: a second call returns `None`.
    pub async fn take_pending_state(&self) -> Result<Option<String>, Error> {
        Ok(self.session.remove(SESSION_PENDING_STATE).await?)
    }

    /// Clears the pending token and stores `identity` as the authenticated
    /// principal.
    pub async fn complete_login(&self, identity: &Identity) -> Result<(), Error> {
        self.session
            .remove::<String>(SESSION_PENDING_STATE)
            .await?;
        self.session.insert(SESSION_USER, identity).await?;
        Ok(())
    }

    /// Read-only accessor used by every protected endpoint.
    pub async fn current_user(&self) -> Result<Option<Identity>, Error> {
        Ok(self.session.get(SESSION_USER).await?)
    }

    /// Destroys the entire session, both pending token and identity,
    /// irrecoverably.
    pub async fn logout(&self) -> Result<(), Error> {
        self.session.flush().await?;
        Ok(())
    }
}
