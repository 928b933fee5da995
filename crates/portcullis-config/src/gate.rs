use std::env;

use url::Url;

use crate::error::ConfigError;

/// Route-gating configuration: where unauthenticated and unauthorized
/// callers are sent, and which cookie carries the identity token.
///
/// `invalid_role_url` is one of two mutually exclusive invalid-role
/// strategies; the other (a custom handler) is registered on the gate
/// itself. The gate constructor enforces that exactly one is present.
#[derive(Clone, Debug)]
pub struct GateConfig {
    pub cookie_name: String,
    pub login_url: String,
    pub invalid_role_url: Option<String>,
    pub return_param: String,
}

impl GateConfig {
    pub fn new(login_url: impl Into<String>) -> Self {
        Self {
            cookie_name: "authorization".to_string(),
            login_url: login_url.into(),
            invalid_role_url: None,
            return_param: "ret".to_string(),
        }
    }

    pub fn from_env() -> Self {
        Self {
            cookie_name: env::var("PORTCULLIS_COOKIE")
                .unwrap_or_else(|_| "authorization".to_string()),
            login_url: env::var("PORTCULLIS_LOGIN_URL").unwrap_or_default(),
            invalid_role_url: env::var("PORTCULLIS_INVALID_ROLE_URL").ok(),
            return_param: env::var("PORTCULLIS_RETURN_PARAM").unwrap_or_else(|_| "ret".to_string()),
        }
    }

    /// Checks the static pieces that would otherwise only fail once live
    /// traffic hits the redirect path.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.login_url.is_empty() {
            return Err(ConfigError::MissingLoginUrl);
        }
        parse_site_url(&self.login_url)?;
        Ok(())
    }
}

/// Accepts absolute URLs and site-relative paths; anything else is a
/// configuration error surfaced at setup.
fn parse_site_url(raw: &str) -> Result<(), ConfigError> {
    match Url::parse(raw) {
        Ok(_) => Ok(()),
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse("http://localhost")
            .and_then(|base| base.join(raw))
            .map(|_| ())
            .map_err(|source| ConfigError::InvalidLoginUrl {
                url: raw.to_string(),
                source,
            }),
        Err(source) => Err(ConfigError::InvalidLoginUrl {
            url: raw.to_string(),
            source,
        }),
    }
}
