//! In-session favorite NFTs.

use crate::models::NftSummary;

/// Favorites in the order they were added. Ids are unique.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Favorites {
    items: Vec<NftSummary>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if an NFT with the same id is already present.
    pub fn add(&mut self, nft: NftSummary) -> bool {
        if self.contains(&nft.id) {
            return false;
        }
        self.items.push(nft);
        true
    }

    /// Returns `false` if nothing was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    /// Add when absent, remove when present. Returns whether it is now a favorite.
    pub fn toggle(&mut self, nft: &NftSummary) -> bool {
        if self.remove(&nft.id) {
            false
        } else {
            self.items.push(nft.clone());
            true
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|n| n.id == id)
    }

    pub fn items(&self) -> &[NftSummary] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
