//! Public profile lookup and display.
//!
//! # Data Flow
//! ```text
//! profile id (URL segment)
//!     → client.rs (GET profile API, error marker → NotFound)
//!     → types.rs (Profile payload, verbatim)
//!     → view.rs (ProfileView projection, ProfilePage state + panels)
//! ```

pub mod client;
pub mod types;
pub mod view;

pub use client::ProfileClient;
pub use types::{Profile, ProfileError, ProfileLookup};
pub use view::{ProfilePage, ProfileState, ProfileView};
