//! Identity values and the claim set that carries them.

use serde::{Deserialize, Serialize};

/// An authenticated caller: a unique user id and a single role.
///
/// Produced by a successful token decode, or supplied by the login flow
/// when establishing a session. Immutable once constructed; it has no
/// lifecycle of its own beyond the token that carries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub role: String,
}

impl Identity {
    pub fn new(user_id: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: role.into(),
        }
    }
}

/// The claim set embedded in a signed identity token.
///
/// Claim names follow JWT convention: `sub` is the user id, `exp` and `iat`
/// are Unix timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// User ID (subject claim)
    pub sub: String,
    /// Role name granted to the user
    pub role: String,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}

impl IdentityClaims {
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.sub.clone(),
            role: self.role.clone(),
        }
    }
}
