//! Profile API payloads and error definitions.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A verified profile exactly as the profile API returns it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub display_name: Option<String>,
    pub username: Option<String>,
    pub profile_addr: Option<String>,
    pub twitter_handle: Option<String>,
    /// Signed Twitter attestation, shown as raw JSON.
    pub twitter_cred: Option<Value>,
    pub domain_name: Option<String>,
    /// Signed domain ownership attestation, shown as raw JSON.
    pub domain_cred: Option<Value>,
}

/// Result of a profile lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileLookup {
    Found(Profile),
    NotFound,
}

impl ProfileLookup {
    /// Interpret a decoded response body.
    ///
    /// Any truthy `error` member marks the profile as missing; everything else
    /// is taken verbatim as the profile.
    pub fn from_body(body: Value) -> Result<Self, ProfileError> {
        if body.get("error").is_some_and(is_truthy) {
            return Ok(ProfileLookup::NotFound);
        }
        let profile = serde_json::from_value(body).map_err(ProfileError::Decode)?;
        Ok(ProfileLookup::Found(profile))
    }

    pub fn is_found(&self) -> bool {
        matches!(self, ProfileLookup::Found(_))
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Errors that can occur while talking to the profile API.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Invalid profile URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Profile API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Profile API returned status {status}")]
    Status { status: u16 },

    #[error("Malformed profile payload: {0}")]
    Decode(serde_json::Error),
}

pub type ProfileResult<T> = Result<T, ProfileError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_marker_means_not_found() {
        let lookup = ProfileLookup::from_body(json!({ "error": "Profile not found" })).unwrap();
        assert_eq!(lookup, ProfileLookup::NotFound);

        let lookup = ProfileLookup::from_body(json!({ "error": true })).unwrap();
        assert_eq!(lookup, ProfileLookup::NotFound);
    }

    #[test]
    fn test_falsy_error_is_ignored() {
        let lookup = ProfileLookup::from_body(json!({
            "error": "",
            "displayName": "Ada",
        }))
        .unwrap();
        assert!(lookup.is_found());

        let lookup = ProfileLookup::from_body(json!({ "error": null, "username": "ada" })).unwrap();
        assert!(lookup.is_found());
    }

    #[test]
    fn test_fields_taken_verbatim() {
        let body = json!({
            "displayName": "Ada Lovelace",
            "username": "ada",
            "profileAddr": "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
            "twitterHandle": "ada_l",
            "twitterCred": { "proof": { "jws": "abc" } },
            "domainName": "ada.dev",
            "domainCred": { "issuer": "did:web:sourcecheck.org" }
        });
        let ProfileLookup::Found(profile) = ProfileLookup::from_body(body).unwrap() else {
            panic!("expected a profile");
        };
        assert_eq!(profile.display_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(profile.username.as_deref(), Some("ada"));
        assert_eq!(profile.twitter_handle.as_deref(), Some("ada_l"));
        assert_eq!(profile.domain_name.as_deref(), Some("ada.dev"));
        assert_eq!(profile.twitter_cred, Some(json!({ "proof": { "jws": "abc" } })));
    }

    #[test]
    fn test_wrong_shape_is_decode_error() {
        let err = ProfileLookup::from_body(json!({ "displayName": 42 })).unwrap_err();
        assert!(matches!(err, ProfileError::Decode(_)));
    }
}
