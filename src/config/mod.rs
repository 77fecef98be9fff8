//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize, VP_* env overrides)
//!     → validation.rs (semantic checks)
//!     → FrontendConfig (validated, immutable)
//!     → shared via Arc to the server and pages
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{
    ApiConfig, BlockchainConfig, ConfirmationMode, Erc20TokenConfig, FrontendConfig,
    ListenerConfig, NativeTokenConfig, ObservabilityConfig, TokensConfig,
};
pub use validation::ValidationError;
