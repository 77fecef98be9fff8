//! Presentation state shared by the pages: timed banners and link helpers.

pub mod format;
pub mod notification;

pub use format::{domain_link, shorten_addr, twitter_link, Link};
pub use notification::{NotificationPanel, DEFAULT_NOTIFICATION_TTL};
