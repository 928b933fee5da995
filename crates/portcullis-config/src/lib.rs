//! # Portcullis Config
//!
//! Configuration types for the Portcullis authorization gate.
//!
//! Configuration is fixed at setup time and read-only afterwards: the gate
//! validates it once during construction and never re-checks it on the
//! request path.
//!
//! - [`gate`]: cookie name, login/invalid-role URLs, return-parameter name
//! - [`token`]: signing secret and token lifetime
//! - [`error`]: setup-time validation failures
//!
//! # Example
//!
//! ```ignore
//! use portcullis_config::{GateConfig, TokenConfig};
//!
//! // Load from environment
//! let gate = GateConfig::from_env();
//! let token = TokenConfig::from_env();
//!
//! // Or construct explicitly
//! let mut gate = GateConfig::new("/accounts/login");
//! gate.invalid_role_url = Some("/accounts/denied".to_string());
//! ```

pub mod error;
pub mod gate;
pub mod token;

// Re-export commonly used types at crate root
pub use error::ConfigError;
pub use gate::GateConfig;
pub use token::TokenConfig;
