use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use portcullis_token::Identity;

use crate::gate::AuthGate;

/// Middleware that checks the authenticated caller's role against a route's
/// role set.
///
/// Resolution happens exactly once; the role check only runs when it
/// succeeded. An unauthenticated caller is redirected to the login flow, an
/// authenticated caller with a role outside the set gets the configured
/// invalid-role response, and a member's request passes through with the
/// downstream response untouched.
///
/// # Usage with axum::middleware::from_fn_with_state
///
/// ```rust,ignore
/// use axum::{Router, middleware, routing::get};
/// use portcullis::middleware::role::require_roles;
///
/// let editors = Router::new()
///     .route("/posts", get(posts_handler))
///     .route_layer(middleware::from_fn_with_state(gate.clone(), |state, req, next| {
///         require_roles(state, req, next, vec!["editor".to_string(), "admin".to_string()])
///     }));
/// ```
pub async fn require_roles(
    State(gate): State<AuthGate>,
    mut req: Request,
    next: Next,
    roles: Vec<String>,
) -> Response {
    let Some(identity) = gate.provider().resolve(req.headers()) else {
        return gate.login_redirect(req.uri().path());
    };

    if !has_role(&identity, &roles) {
        debug!(
            user_id = %identity.user_id,
            role = %identity.role,
            "role not authorized for route"
        );
        return gate.invalid_role_response(req).await;
    }

    req.extensions_mut().insert(identity);
    next.run(req).await
}

/// Exact string membership; roles are not hierarchical.
pub fn has_role(identity: &Identity, roles: &[String]) -> bool {
    roles.iter().any(|role| role == &identity.role)
}
