//! Client for the NFT indexing API.

use futures::FutureExt;
use futures::future::LocalBoxFuture;

use crate::config::INDEXER_BASE_URL;
use crate::core::error::FetchError;
use crate::core::nft_cache::AssetSource;
use crate::models::{Address, NftDetail, NftSummary, parse_asset_detail, parse_asset_list};
use crate::utils::http::get_text;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexerClient {
    base_url: String,
}

impl IndexerClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// `GET {base}/nfts?address=<owner>`
    pub fn list_url(&self, owner: &Address) -> String {
        format!("{}/nfts?address={}", self.base_url, owner)
    }

    /// `GET {base}/nfts/<id>`
    pub fn detail_url(&self, id: &str) -> String {
        format!("{}/nfts/{}", self.base_url, js_sys::encode_uri_component(id))
    }

    pub async fn assets_by_owner(&self, owner: &Address) -> Result<Vec<NftSummary>, FetchError> {
        let body = get_text(&self.list_url(owner)).await?;
        parse_asset_list(&body)
    }

    /// Look up a single asset. A blank id returns `Ok(None)` without a request.
    pub async fn fetch_detail(&self, id: &str) -> Result<Option<NftDetail>, FetchError> {
        let id = id.trim();
        if id.is_empty() {
            return Ok(None);
        }
        log::debug!("fetching asset {}", id);
        let body = get_text(&self.detail_url(id)).await?;
        parse_asset_detail(&body).map(Some)
    }
}

impl Default for IndexerClient {
    fn default() -> Self {
        Self::new(INDEXER_BASE_URL)
    }
}

impl AssetSource for IndexerClient {
    fn assets_by_owner<'a>(
        &'a self,
        owner: &'a Address,
    ) -> LocalBoxFuture<'a, Result<Vec<NftSummary>, FetchError>> {
        IndexerClient::assets_by_owner(self, owner).boxed_local()
    }
}
