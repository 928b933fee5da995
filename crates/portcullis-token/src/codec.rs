//! Token creation and verification.
//!
//! Encoding and decoding are pure in-memory computation over the token
//! bytes and the shared secret; no I/O happens here. Decode failures carry
//! a distinguished kind so the provider can log the cause, even though all
//! of them collapse to "no identity" at the middleware boundary.

use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::Deserialize;
use thiserror::Error;

use portcullis_config::TokenConfig;

use crate::claims::{Identity, IdentityClaims};

/// Signing-primitive failure while producing a token.
#[derive(Debug, Error)]
#[error("unable to sign identity token")]
pub struct SignError(#[from] jsonwebtoken::errors::Error);

/// Why a token string did not yield an [`Identity`].
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token is missing the {0:?} claim")]
    MissingClaim(&'static str),

    #[error("token verification backend failed")]
    Verification(#[source] jsonwebtoken::errors::Error),
}

/// Claim shape used on the decode side. Fields are optional so that a
/// verified token with an absent `sub` or `role` reports `MissingClaim`
/// instead of a parse failure.
#[derive(Debug, Deserialize)]
struct RawIdentityClaims {
    sub: Option<String>,
    role: Option<String>,
}

/// Encodes an identity into a signed token expiring at `expires_at`.
///
/// # Errors
///
/// Returns [`SignError`] only if the signing primitive itself fails.
pub fn encode_identity(
    identity: &Identity,
    expires_at: DateTime<Utc>,
    config: &TokenConfig,
) -> Result<String, SignError> {
    let claims = IdentityClaims {
        sub: identity.user_id.clone(),
        role: identity.role.clone(),
        exp: expires_at.timestamp() as usize,
        iat: Utc::now().timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(SignError::from)
}

/// Verifies a token string and returns the embedded identity.
///
/// # Errors
///
/// - [`DecodeError::Malformed`] if the token cannot be parsed
/// - [`DecodeError::InvalidSignature`] if verification fails
/// - [`DecodeError::Expired`] if the embedded expiry has passed
/// - [`DecodeError::MissingClaim`] if `sub` or `role` is absent from an
///   otherwise-valid token
/// - [`DecodeError::Verification`] if the crypto backend itself fails
pub fn decode_identity(token: &str, config: &TokenConfig) -> Result<Identity, DecodeError> {
    let data = decode::<RawIdentityClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(classify)?;

    let user_id = data.claims.sub.ok_or(DecodeError::MissingClaim("sub"))?;
    let role = data.claims.role.ok_or(DecodeError::MissingClaim("role"))?;

    Ok(Identity { user_id, role })
}

fn classify(err: jsonwebtoken::errors::Error) -> DecodeError {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::ExpiredSignature => DecodeError::Expired,
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => DecodeError::InvalidSignature,
        ErrorKind::InvalidToken
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_)
        | ErrorKind::MissingRequiredClaim(_) => DecodeError::Malformed,
        _ => DecodeError::Verification(err),
    }
}
