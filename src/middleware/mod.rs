//! Request-gating middleware.
//!
//! Two entry policies share one resolution step:
//!
//! - [`auth::require_logged_in`]: any authenticated caller may pass
//! - [`role::require_roles`]: the caller's role must be in the route's
//!   role set
//!
//! # Decision Flow
//!
//! 1. The identity provider resolves the caller from the request cookie,
//!    exactly once per request.
//! 2. Without an identity, the caller gets a temporary redirect to the
//!    login flow carrying the originally requested path; the downstream
//!    handler never runs.
//! 3. With an identity whose role is not in the set (`require_roles`
//!    only), the caller gets the configured invalid-role response;
//!    downstream never runs.
//! 4. Otherwise the downstream handler runs and its response passes
//!    through untouched.
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, middleware, routing::get};
//! use portcullis::middleware::auth::require_logged_in;
//! use portcullis::middleware::role::require_roles;
//!
//! let admin = Router::new()
//!     .route("/dash", get(dash_handler))
//!     .route_layer(middleware::from_fn_with_state(gate.clone(), |state, req, next| {
//!         require_roles(state, req, next, vec!["admin".to_string()])
//!     }));
//!
//! let account = Router::new()
//!     .route("/profile", get(profile_handler))
//!     .route_layer(middleware::from_fn_with_state(gate.clone(), require_logged_in));
//! ```

pub mod auth;
pub mod role;
