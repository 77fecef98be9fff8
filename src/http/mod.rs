//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → profile.rs / withdraw.rs (page state as JSON)
//!     → response.rs (error bodies, status mapping)
//!     → Send to client
//! ```

pub mod profile;
pub mod request;
pub mod response;
pub mod server;
pub mod withdraw;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
