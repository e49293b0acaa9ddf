use serde::{Deserialize, Serialize};

/// The minimal authenticated principal: the login name retrieved from the
/// provider's current-user endpoint. This is the only identity data a session
/// carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub login: String,
}
