//! # Portcullis Token
//!
//! Signed identity token encoding and validation for the Portcullis
//! authorization gate.
//!
//! This crate provides:
//!
//! - [`claims`]: the [`Identity`] value and the claim set it is carried in
//! - [`codec`]: token creation and verification with distinguished failure
//!   kinds
//!
//! A token is an opaque signed string embedding a user id, a role, and an
//! expiry. Anything that decodes successfully was produced with the same
//! shared secret and has not expired. Tokens are never stored server-side;
//! they are reconstructed per request from the carrying cookie.
//!
//! # Example
//!
//! ```ignore
//! use chrono::{Duration, Utc};
//! use portcullis_config::TokenConfig;
//! use portcullis_token::{Identity, decode_identity, encode_identity};
//!
//! let config = TokenConfig::new("shared-secret");
//! let identity = Identity::new("u1", "editor");
//!
//! let token = encode_identity(&identity, Utc::now() + Duration::hours(8), &config)?;
//! let roundtripped = decode_identity(&token, &config)?;
//! assert_eq!(roundtripped, identity);
//! ```

pub mod claims;
pub mod codec;

// Re-export commonly used types at crate root
pub use claims::{Identity, IdentityClaims};
pub use codec::{DecodeError, SignError, decode_identity, encode_identity};
