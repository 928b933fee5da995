//! Identity resolution and the cookie that carries it.
//!
//! [`IdentityProvider`] is the capability set the middleware gates on:
//! resolve an identity from an incoming request's headers, attach one to an
//! outgoing response, or clear it. The default [`CookieIdentityProvider`]
//! carries a signed token in an `HttpOnly` cookie; alternative schemes (or
//! test stubs) plug in behind the trait.

use axum::http::{HeaderMap, HeaderValue, header};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use chrono::{Duration, Utc};
use tracing::{debug, warn};

use portcullis_config::TokenConfig;
use portcullis_token::{DecodeError, Identity, decode_identity, encode_identity};

use crate::error::GateError;

/// The three operations the authorization gate needs from an identity
/// scheme.
pub trait IdentityProvider: Send + Sync {
    /// Reconstructs the caller's identity from request headers.
    ///
    /// Every failure mode (cookie absent, token malformed, bad signature,
    /// expired, missing claim) collapses to `None`; the cause is logged
    /// here and callers never distinguish subtypes. Never mutates state.
    fn resolve(&self, headers: &HeaderMap) -> Option<Identity>;

    /// Establishes an identity on the outgoing response by appending the
    /// carrying cookie. Computes the token expiry from the configured TTL.
    fn attach(&self, headers: &mut HeaderMap, identity: &Identity) -> Result<(), GateError>;

    /// Appends a removal cookie so the user agent discards the identity.
    fn clear(&self, headers: &mut HeaderMap);
}

/// Cookie-backed provider over the signed-token codec.
pub struct CookieIdentityProvider {
    cookie_name: String,
    token: TokenConfig,
}

impl CookieIdentityProvider {
    pub fn new(cookie_name: impl Into<String>, token: TokenConfig) -> Self {
        Self {
            cookie_name: cookie_name.into(),
            token,
        }
    }

    fn site_cookie(&self, value: String) -> Cookie<'static> {
        // Whole-site scope, hidden from scripts. No cookie expiry: the
        // authoritative expiry is inside the token itself.
        Cookie::build((self.cookie_name.clone(), value))
            .http_only(true)
            .path("/")
            .build()
    }
}

impl IdentityProvider for CookieIdentityProvider {
    fn resolve(&self, headers: &HeaderMap) -> Option<Identity> {
        let jar = CookieJar::from_headers(headers);
        let cookie = jar.get(&self.cookie_name)?;

        match decode_identity(cookie.value(), &self.token) {
            Ok(identity) => Some(identity),
            Err(err @ DecodeError::Verification(_)) => {
                warn!(error = ?err, "token verification backend failed; treating as unauthenticated");
                None
            }
            Err(err) => {
                debug!(error = %err, "rejected identity cookie");
                None
            }
        }
    }

    fn attach(&self, headers: &mut HeaderMap, identity: &Identity) -> Result<(), GateError> {
        let expires_at = Utc::now() + Duration::seconds(self.token.ttl_seconds);
        let token = encode_identity(identity, expires_at, &self.token).map_err(GateError::signing)?;

        let cookie = self.site_cookie(token);
        let value = HeaderValue::from_str(&cookie.to_string()).map_err(GateError::internal)?;
        headers.append(header::SET_COOKIE, value);
        Ok(())
    }

    fn clear(&self, headers: &mut HeaderMap) {
        let mut cookie = self.site_cookie(String::new());
        cookie.make_removal();

        if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
            headers.append(header::SET_COOKIE, value);
        }
    }
}
