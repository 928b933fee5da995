//! # Portcullis
//!
//! Cookie-carried signed-identity authorization middleware for axum.
//!
//! Portcullis decides, per incoming request, whether the caller may proceed
//! to protected logic. The caller's identity (a user id and a role) travels
//! in a tamper-evident, expiring token inside an `HttpOnly` cookie; the
//! middleware resolves it on each request and either forwards the request,
//! redirects to the login flow, or produces a permission-denied response.
//!
//! ## Architecture
//!
//! ```text
//! crates/
//! ├── portcullis-token    # signed token codec: Identity <-> JWT string
//! └── portcullis-config   # GateConfig / TokenConfig, setup-time validation
//! src/
//! ├── gate.rs             # AuthGate: validated shared state + redirects
//! ├── provider.rs         # IdentityProvider trait, cookie implementation
//! ├── middleware/         # require_logged_in, require_roles, CurrentIdentity
//! └── error.rs            # GateError for rare internal failures
//! ```
//!
//! ## Decision Flow
//!
//! 1. `resolve` reconstructs the identity from the configured cookie. Any
//!    failure (absent cookie, malformed/expired/forged token, missing
//!    claim) is treated as "not logged in"; the cause is logged.
//! 2. Unauthenticated callers get a temporary redirect to the login URL
//!    with the originally requested path in a return parameter.
//! 3. `require_roles` additionally checks exact role membership and emits
//!    the configured invalid-role response on mismatch.
//! 4. Authorized requests reach the downstream handler unmodified.
//!
//! All static configuration (login URL, signing secret, the invalid-role
//! strategy) is validated once in the [`AuthGate`] constructors; a
//! misconfigured deployment fails at setup, never mid-request.
//!
//! ## Example
//!
//! ```ignore
//! use axum::{Router, middleware, routing::get};
//! use portcullis::{AuthGate, GateConfig, TokenConfig, require_logged_in};
//!
//! let mut config = GateConfig::new("/accounts/login");
//! config.invalid_role_url = Some("/accounts/denied".to_string());
//! let gate = AuthGate::new(config, TokenConfig::from_env())?;
//!
//! let app: Router = Router::new()
//!     .route("/profile", get(profile_handler))
//!     .route_layer(middleware::from_fn_with_state(gate.clone(), require_logged_in));
//! ```

pub mod error;
pub mod gate;
pub mod middleware;
pub mod provider;

// Re-export commonly used types at crate root
pub use error::GateError;
pub use gate::{AuthGate, InvalidRoleHandler};
pub use middleware::auth::{CurrentIdentity, require_logged_in};
pub use middleware::role::{has_role, require_roles};
pub use provider::{CookieIdentityProvider, IdentityProvider};

pub use portcullis_config::{ConfigError, GateConfig, TokenConfig};
pub use portcullis_token::{
    DecodeError, Identity, IdentityClaims, SignError, decode_identity, encode_identity,
};
