//! NFT fetch cache.
//!
//! Maps an owner address to the asset list the indexer returned for it.
//! Lists are kept in localStorage under `nfts_<address>` and never expire;
//! only [`NftCache::refetch`] replaces one.

use std::rc::Rc;

use futures::future::LocalBoxFuture;

use crate::config::storage_keys::NFT_CACHE_PREFIX;
use crate::core::error::FetchError;
use crate::models::{Address, CachedAssetList, NftSummary};
use crate::utils::{Clock, KeyValueStore};

/// Source of owned-asset listings (the indexing API).
pub trait AssetSource {
    fn assets_by_owner<'a>(
        &'a self,
        owner: &'a Address,
    ) -> LocalBoxFuture<'a, Result<Vec<NftSummary>, FetchError>>;
}

/// Storage key for an owner's cached list.
pub fn cache_key(owner: &Address) -> String {
    format!("{}{}", NFT_CACHE_PREFIX, owner)
}

pub struct NftCache {
    store: Rc<dyn KeyValueStore>,
    source: Rc<dyn AssetSource>,
    clock: Rc<dyn Clock>,
}

impl NftCache {
    pub fn new(
        store: Rc<dyn KeyValueStore>,
        source: Rc<dyn AssetSource>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            source,
            clock,
        }
    }

    /// Cached list for `owner`, if one was stored and still decodes.
    pub fn cached(&self, owner: &Address) -> Option<CachedAssetList> {
        let key = cache_key(owner);
        let raw = self.store.get_item(&key)?;
        match serde_json::from_str::<CachedAssetList>(&raw) {
            Ok(list) if &list.address == owner => Some(list),
            Ok(_) => {
                log::warn!("cached list under {} belongs to another owner", key);
                None
            }
            Err(e) => {
                log::warn!("ignoring unreadable {}: {}", key, e);
                None
            }
        }
    }

    /// Assets owned by `address`, from cache when present.
    ///
    /// An empty or invalid address yields an empty list without a request.
    pub async fn fetch(&self, address: &str) -> Result<Vec<NftSummary>, FetchError> {
        let Some(owner) = owner_of(address) else {
            return Ok(Vec::new());
        };
        if let Some(hit) = self.cached(&owner) {
            log::debug!("cache hit for {} ({} items)", owner, hit.items.len());
            return Ok(hit.items);
        }
        self.load(owner).await
    }

    /// Always ask the indexer, replacing any cached list.
    pub async fn refetch(&self, address: &str) -> Result<Vec<NftSummary>, FetchError> {
        let Some(owner) = owner_of(address) else {
            return Ok(Vec::new());
        };
        self.load(owner).await
    }

    async fn load(&self, owner: Address) -> Result<Vec<NftSummary>, FetchError> {
        log::debug!("fetching assets for {}", owner);
        let items = self.source.assets_by_owner(&owner).await?;
        let list = CachedAssetList {
            address: owner,
            items,
            fetched_at: self.clock.now_ms(),
        };
        self.store_list(&list);
        Ok(list.items)
    }

    /// Cache writes are best effort; a full quota only costs a refetch.
    fn store_list(&self, list: &CachedAssetList) {
        let key = cache_key(&list.address);
        let result = serde_json::to_string(list)
            .map_err(|e| e.to_string())
            .and_then(|json| self.store.set_item(&key, &json).map_err(|e| e.to_string()));
        if let Err(e) = result {
            log::warn!("failed to cache {}: {}", key, e);
        }
    }
}

fn owner_of(address: &str) -> Option<Address> {
    if address.is_empty() {
        return None;
    }
    match Address::parse(address) {
        Ok(owner) => Some(owner),
        Err(e) => {
            log::debug!("skipping fetch: {}", e);
            None
        }
    }
}
