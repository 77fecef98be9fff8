//! Verified Profile Front End Library
//!
//! View a public verified profile, read the balances held by a user's profile
//! contract, and withdraw them with the connected wallet.

pub mod blockchain;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod profile;
pub mod ui;
pub mod withdraw;

pub use config::schema::FrontendConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
