use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use portcullis_token::Identity;

use crate::gate::AuthGate;

/// Middleware that lets any authenticated caller through and sends
/// everyone else to the login flow.
///
/// On success the resolved [`Identity`] is stashed in request extensions,
/// so downstream extractors reuse it instead of resolving again.
///
/// # Usage with axum::middleware::from_fn_with_state
///
/// ```rust,ignore
/// use axum::{Router, middleware, routing::get};
/// use portcullis::middleware::auth::require_logged_in;
///
/// let protected = Router::new()
///     .route("/profile", get(profile_handler))
///     .route_layer(middleware::from_fn_with_state(gate.clone(), require_logged_in));
/// ```
pub async fn require_logged_in(
    State(gate): State<AuthGate>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(identity) = gate.provider().resolve(req.headers()) else {
        return gate.login_redirect(req.uri().path());
    };

    req.extensions_mut().insert(identity);
    next.run(req).await
}

/// Extractor that provides the authenticated caller's identity to a
/// handler, rejecting unauthenticated requests with the login redirect.
///
/// Reuses an identity already resolved by [`require_logged_in`] or
/// [`require_roles`](crate::middleware::role::require_roles) when layered
/// behind them; resolves on its own when used standalone.
///
/// # Example
///
/// ```rust,ignore
/// use portcullis::middleware::auth::CurrentIdentity;
///
/// async fn profile(CurrentIdentity(identity): CurrentIdentity) -> String {
///     format!("signed in as {}", identity.user_id)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub Identity);

impl<S> FromRequestParts<S> for CurrentIdentity
where
    AuthGate: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<Identity>() {
            return Ok(Self(identity.clone()));
        }

        let gate = AuthGate::from_ref(state);
        match gate.provider().resolve(&parts.headers) {
            Some(identity) => Ok(Self(identity)),
            None => Err(gate.login_redirect(parts.uri.path())),
        }
    }
}
