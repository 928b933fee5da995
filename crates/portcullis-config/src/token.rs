use std::env;

use crate::error::ConfigError;

const DEFAULT_TTL_SECONDS: i64 = 28_800; // 8 hours

#[derive(Clone, Debug)]
pub struct TokenConfig {
    pub secret: String,
    pub ttl_seconds: i64,
}

impl TokenConfig {
    pub fn from_env() -> Self {
        Self {
            // No fallback secret; an empty value is rejected by validate()
            // at gate construction.
            secret: env::var("PORTCULLIS_SECRET").unwrap_or_default(),
            ttl_seconds: env::var("PORTCULLIS_TOKEN_TTL")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TTL_SECONDS),
        }
    }

    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ttl_seconds: DEFAULT_TTL_SECONDS,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        if self.ttl_seconds <= 0 {
            return Err(ConfigError::NonPositiveTtl(self.ttl_seconds));
        }
        Ok(())
    }
}
