use thiserror::Error;

/// Setup-time configuration failures.
///
/// All of these are raised from gate construction, before any traffic is
/// served. The request path never re-validates configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("login URL is not configured")]
    MissingLoginUrl,

    #[error("login URL {url:?} does not parse")]
    InvalidLoginUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("signing secret is empty")]
    MissingSecret,

    #[error("token TTL must be positive, got {0}")]
    NonPositiveTtl(i64),

    #[error("no invalid-role strategy configured; set an invalid-role URL or register a handler")]
    MissingInvalidRoleStrategy,

    #[error("both an invalid-role URL and an invalid-role handler are configured; pick one")]
    ConflictingInvalidRoleStrategies,
}
