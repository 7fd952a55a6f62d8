//! Profile records keyed by wallet address.

use serde::{Deserialize, Serialize};

use crate::core::error::FetchError;

/// Stored profile. `user_id` is the owning wallet address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_id: String,
    pub username: String,
    #[serde(default)]
    pub bio: Option<String>,
}

/// Body sent on create and update.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProfileDraft {
    pub username: String,
    pub bio: Option<String>,
}

impl ProfileDraft {
    pub fn new(username: impl Into<String>, bio: impl Into<String>) -> Self {
        let bio = bio.into();
        let bio = bio.trim();
        Self {
            username: username.into().trim().to_string(),
            bio: (!bio.is_empty()).then(|| bio.to_string()),
        }
    }

    /// The backend rejects a missing username, so refuse to send one.
    pub fn validate(&self) -> Result<(), FetchError> {
        if self.username.trim().is_empty() {
            return Err(FetchError::InvalidRequest("username is required".to_string()));
        }
        Ok(())
    }
}

impl From<&Profile> for ProfileDraft {
    fn from(profile: &Profile) -> Self {
        Self {
            username: profile.username.clone(),
            bio: profile.bio.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_from_backend_json() {
        let json = r#"{"id":3,"userId":"9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM","username":"ape","bio":null}"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.username, "ape");
        assert_eq!(profile.bio, None);
    }

    #[test]
    fn test_draft_trims_and_drops_blank_bio() {
        let draft = ProfileDraft::new("  ape ", "   ");
        assert_eq!(draft.username, "ape");
        assert_eq!(draft.bio, None);
        assert_eq!(
            serde_json::to_string(&draft).unwrap(),
            r#"{"username":"ape","bio":null}"#
        );
    }

    #[test]
    fn test_draft_requires_username() {
        assert_eq!(
            ProfileDraft::new("", "hello").validate(),
            Err(FetchError::InvalidRequest("username is required".to_string()))
        );
        assert!(ProfileDraft::new("ape", "").validate().is_ok());
    }
}
