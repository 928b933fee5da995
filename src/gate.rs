//! The shared authorization gate handed to the middleware.
//!
//! [`AuthGate`] plays the role axum application state usually plays: a
//! cheaply-clonable handle over read-only configuration plus the identity
//! provider, safe for any number of concurrent in-flight requests. All
//! configuration validation happens in the constructors; the request path
//! only ever sees pre-validated values and cannot fail on static
//! misconfiguration.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::extract::Request;
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use url::form_urlencoded;

use portcullis_config::{ConfigError, GateConfig, TokenConfig};
use portcullis_token::Identity;

use crate::error::GateError;
use crate::provider::{CookieIdentityProvider, IdentityProvider};

/// Caller-supplied invalid-role handler: receives the denied request and
/// produces the full response.
pub type InvalidRoleHandler =
    Arc<dyn Fn(Request) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync>;

enum InvalidRoleAction {
    Redirect(String),
    Handler(InvalidRoleHandler),
}

struct LoginTarget {
    base: String,
    pairs: Vec<(String, String)>,
    return_param: String,
}

struct GateInner {
    provider: Arc<dyn IdentityProvider>,
    login: LoginTarget,
    invalid_role: InvalidRoleAction,
}

/// Handle over the gate configuration and identity provider.
#[derive(Clone)]
pub struct AuthGate {
    inner: Arc<GateInner>,
}

impl AuthGate {
    /// Builds a gate in static invalid-role mode: unauthorized-but-known
    /// callers are redirected to `invalid_role_url` with a 401.
    ///
    /// # Errors
    ///
    /// Fails fast on an unparseable or missing login URL, an empty signing
    /// secret, a non-positive TTL, or a missing `invalid_role_url`.
    pub fn new(gate: GateConfig, token: TokenConfig) -> Result<Self, ConfigError> {
        token.validate()?;
        let provider = Arc::new(CookieIdentityProvider::new(gate.cookie_name.clone(), token));
        Self::assemble(provider, gate, None)
    }

    /// Builds a gate that delegates invalid-role responses to `handler`
    /// instead of a static redirect.
    ///
    /// # Errors
    ///
    /// In addition to [`AuthGate::new`]'s checks, rejects a configuration
    /// that also sets `invalid_role_url`: exactly one strategy may be
    /// configured.
    pub fn with_invalid_role_handler<F, Fut>(
        gate: GateConfig,
        token: TokenConfig,
        handler: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        token.validate()?;
        let provider = Arc::new(CookieIdentityProvider::new(gate.cookie_name.clone(), token));
        Self::assemble(provider, gate, Some(box_handler(handler)))
    }

    /// Builds a gate over a caller-supplied provider (an alternative token
    /// scheme, or a stub in tests), in static invalid-role mode.
    pub fn with_provider(
        provider: Arc<dyn IdentityProvider>,
        gate: GateConfig,
    ) -> Result<Self, ConfigError> {
        Self::assemble(provider, gate, None)
    }

    fn assemble(
        provider: Arc<dyn IdentityProvider>,
        config: GateConfig,
        handler: Option<InvalidRoleHandler>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let invalid_role = match (config.invalid_role_url, handler) {
            (Some(url), None) => InvalidRoleAction::Redirect(url),
            (None, Some(handler)) => InvalidRoleAction::Handler(handler),
            (Some(_), Some(_)) => return Err(ConfigError::ConflictingInvalidRoleStrategies),
            (None, None) => return Err(ConfigError::MissingInvalidRoleStrategy),
        };

        let (base, query) = match config.login_url.split_once('?') {
            Some((base, query)) => (base.to_string(), query.to_string()),
            None => (config.login_url.clone(), String::new()),
        };
        let pairs = form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();

        Ok(Self {
            inner: Arc::new(GateInner {
                provider,
                login: LoginTarget {
                    base,
                    pairs,
                    return_param: config.return_param,
                },
                invalid_role,
            }),
        })
    }

    pub fn provider(&self) -> &dyn IdentityProvider {
        self.inner.provider.as_ref()
    }

    /// The response sent to an unauthenticated caller: a temporary redirect
    /// to the login flow, carrying the originally requested path (path
    /// only, no query string or host) so the login flow can send the user
    /// back.
    pub fn login_redirect(&self, requested_path: &str) -> Response {
        let login = &self.inner.login;

        let mut query = form_urlencoded::Serializer::new(String::new());
        query.extend_pairs(&login.pairs);
        query.append_pair(&login.return_param, requested_path);

        let location = format!("{}?{}", login.base, query.finish());
        (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
    }

    /// The response sent to an authenticated caller whose role is not in
    /// the route's role set.
    pub(crate) async fn invalid_role_response(&self, req: Request) -> Response {
        match &self.inner.invalid_role {
            InvalidRoleAction::Redirect(url) => {
                (StatusCode::UNAUTHORIZED, [(header::LOCATION, url.clone())]).into_response()
            }
            InvalidRoleAction::Handler(handler) => handler(req).await,
        }
    }

    /// Establishes `identity` on the outgoing response headers. For login
    /// flows, after credentials have been checked by the application.
    pub fn sign_in(&self, headers: &mut HeaderMap, identity: &Identity) -> Result<(), GateError> {
        self.inner.provider.attach(headers, identity)
    }

    /// Clears the identity cookie on the outgoing response headers.
    pub fn sign_out(&self, headers: &mut HeaderMap) {
        self.inner.provider.clear(headers);
    }

    /// Reads the return-parameter back off a login-page URI, for bouncing
    /// the user to where they started after sign-in. Only site-relative
    /// targets are honored; absolute and protocol-relative values yield
    /// `None`.
    pub fn return_target(&self, uri: &Uri) -> Option<String> {
        let query = uri.query()?;
        let param = &self.inner.login.return_param;

        form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == param.as_str())
            .map(|(_, value)| value.into_owned())
            .filter(|target| target.starts_with('/') && !target.starts_with("//"))
    }
}

fn box_handler<F, Fut>(handler: F) -> InvalidRoleHandler
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    Arc::new(move |req| Box::pin(handler(req)) as Pin<Box<dyn Future<Output = Response> + Send>>)
}
