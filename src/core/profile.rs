//! Profile API client.
//!
//! Every request identifies the wallet through the `wallet-address` header;
//! the backend has no other notion of a user.

use gloo_net::http::{Request, RequestBuilder};

use crate::config::{PROFILE_BASE_URL, WALLET_ADDRESS_HEADER};
use crate::core::error::FetchError;
use crate::models::{Address, Profile, ProfileDraft};
use crate::utils::http::{check_status, read_json, send, send_json};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileClient {
    url: String,
}

impl ProfileClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// `Ok(None)` when the wallet has no profile yet.
    pub async fn get(&self, wallet: &Address) -> Result<Option<Profile>, FetchError> {
        let response = send(self.request(Request::get(&self.url), wallet)).await?;
        if response.status() == 404 {
            return Ok(None);
        }
        read_json(response).await.map(Some)
    }

    pub async fn create(&self, wallet: &Address, draft: &ProfileDraft) -> Result<Profile, FetchError> {
        draft.validate()?;
        let request = self.request(Request::post(&self.url), wallet);
        let response = send_json(request, draft).await?;
        log::info!("created profile for {}", wallet);
        read_json(response).await
    }

    pub async fn update(&self, wallet: &Address, draft: &ProfileDraft) -> Result<Profile, FetchError> {
        draft.validate()?;
        let request = self.request(Request::put(&self.url), wallet);
        let response = send_json(request, draft).await?;
        read_json(response).await
    }

    pub async fn delete(&self, wallet: &Address) -> Result<(), FetchError> {
        let response = send(self.request(Request::delete(&self.url), wallet)).await?;
        check_status(&response)?;
        log::info!("deleted profile for {}", wallet);
        Ok(())
    }

    fn request(&self, builder: RequestBuilder, wallet: &Address) -> RequestBuilder {
        builder.header(WALLET_ADDRESS_HEADER, wallet.as_str())
    }
}

impl Default for ProfileClient {
    fn default() -> Self {
        Self::new(PROFILE_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_url() {
        assert_eq!(ProfileClient::default().url(), PROFILE_BASE_URL);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_username_before_sending() {
        let client = ProfileClient::new("/api/users/profile");
        let wallet = Address::parse(crate::testing::ALICE).unwrap();

        let err = client
            .create(&wallet, &ProfileDraft::new(" ", "bio"))
            .await
            .unwrap_err();

        assert_eq!(err, FetchError::InvalidRequest("username is required".to_string()));
    }

    #[tokio::test]
    async fn test_update_rejects_blank_username_before_sending() {
        let client = ProfileClient::default();
        let wallet = Address::parse(crate::testing::BOB).unwrap();
        assert!(matches!(
            client.update(&wallet, &ProfileDraft::default()).await,
            Err(FetchError::InvalidRequest(_))
        ));
    }
}
