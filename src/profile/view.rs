//! The public profile page.
//!
//! ```text
//! Loading ──lookup──▶ Found(ProfileView)
//!    │
//!    └──error marker / failure──▶ NotFound
//! ```

use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::profile::client::ProfileClient;
use crate::profile::types::{Profile, ProfileLookup};
use crate::ui::{domain_link, shorten_addr, twitter_link, Link, NotificationPanel};

pub const NOT_FOUND_TITLE: &str = "Profile Not Found";
pub const NOT_FOUND_HINT: &str = "Please check the URL!";
pub const ADDRESS_COPIED: &str = "Address copied to clipboard!";

/// A verification row: the linked identity plus its credential document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerifiedLink {
    pub link: Link,
    pub credential: Option<Value>,
}

/// Display projection of a [`Profile`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileView {
    pub display_name: String,
    /// `@username`, or empty when the profile has no username.
    pub username: String,
    pub profile_addr: String,
    pub short_addr: String,
    pub twitter: Option<VerifiedLink>,
    pub domain: Option<VerifiedLink>,
}

impl From<Profile> for ProfileView {
    fn from(profile: Profile) -> Self {
        let profile_addr = profile.profile_addr.unwrap_or_default();
        Self {
            display_name: profile.display_name.unwrap_or_default(),
            username: profile
                .username
                .map(|u| format!("@{}", u))
                .unwrap_or_default(),
            short_addr: shorten_addr(&profile_addr),
            profile_addr,
            twitter: profile
                .twitter_handle
                .filter(|h| !h.is_empty())
                .map(|handle| VerifiedLink {
                    link: twitter_link(&handle),
                    credential: profile.twitter_cred,
                }),
            domain: profile
                .domain_name
                .filter(|d| !d.is_empty())
                .map(|domain| VerifiedLink {
                    link: domain_link(&domain),
                    credential: profile.domain_cred,
                }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProfileState {
    Loading,
    NotFound,
    Found(ProfileView),
}

/// Which credential panel to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    Twitter,
    Domain,
}

impl CredentialKind {
    pub fn title(&self) -> &'static str {
        match self {
            CredentialKind::Twitter => "Twitter Verification",
            CredentialKind::Domain => "Domain Name Verification",
        }
    }
}

/// An open credential panel.
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialPanel<'a> {
    pub kind: CredentialKind,
    /// Handle or domain name the credential attests to.
    pub subject: &'a str,
    pub credential: Option<&'a Value>,
}

/// State of one profile page visit.
#[derive(Debug)]
pub struct ProfilePage {
    profile_id: String,
    state: ProfileState,
    showing_twitter: bool,
    showing_domain: bool,
    notice: NotificationPanel,
}

impl ProfilePage {
    pub fn new(profile_id: impl Into<String>, notification_ttl: Duration) -> Self {
        Self {
            profile_id: profile_id.into(),
            state: ProfileState::Loading,
            showing_twitter: false,
            showing_domain: false,
            notice: NotificationPanel::new(notification_ttl),
        }
    }

    /// Look the profile up and settle the page state.
    ///
    /// Any failure is rendered as not found.
    pub async fn load(&mut self, client: &ProfileClient) -> &ProfileState {
        match client.lookup(&self.profile_id).await {
            Ok(lookup) => self.resolve(lookup),
            Err(e) => {
                tracing::warn!(profile_id = %self.profile_id, error = %e, "Profile lookup failed");
                self.state = ProfileState::NotFound;
            }
        }
        &self.state
    }

    pub fn resolve(&mut self, lookup: ProfileLookup) {
        self.state = match lookup {
            ProfileLookup::Found(profile) => ProfileState::Found(profile.into()),
            ProfileLookup::NotFound => ProfileState::NotFound,
        };
    }

    pub fn state(&self) -> &ProfileState {
        &self.state
    }

    pub fn profile_id(&self) -> &str {
        &self.profile_id
    }

    pub fn view(&self) -> Option<&ProfileView> {
        match &self.state {
            ProfileState::Found(view) => Some(view),
            _ => None,
        }
    }

    pub fn toggle_twitter(&mut self) {
        self.showing_twitter = !self.showing_twitter;
    }

    pub fn toggle_domain(&mut self) {
        self.showing_domain = !self.showing_domain;
    }

    /// Credential panels currently open, Twitter first.
    pub fn visible_credentials(&self) -> Vec<CredentialPanel<'_>> {
        let Some(view) = self.view() else {
            return Vec::new();
        };
        let mut panels = Vec::new();
        if self.showing_twitter {
            if let Some(twitter) = &view.twitter {
                panels.push(CredentialPanel {
                    kind: CredentialKind::Twitter,
                    subject: twitter.link.label.trim_start_matches('@'),
                    credential: twitter.credential.as_ref(),
                });
            }
        }
        if self.showing_domain {
            if let Some(domain) = &view.domain {
                panels.push(CredentialPanel {
                    kind: CredentialKind::Domain,
                    subject: &domain.link.label,
                    credential: domain.credential.as_ref(),
                });
            }
        }
        panels
    }

    /// Hand out the full profile address and confirm the copy.
    pub fn copy_address(&self) -> Option<String> {
        let addr = self.view()?.profile_addr.clone();
        self.notice.show(ADDRESS_COPIED);
        Some(addr)
    }

    pub fn notification(&self) -> Option<String> {
        self.notice.current()
    }
}
