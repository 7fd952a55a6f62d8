//! NFT shapes: the nested indexer wire format and the flat views the
//! dashboard renders.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::FetchError;
use crate::models::Address;

// ============================================================================
// Dashboard Types
// ============================================================================

/// A single `trait_type` / `value` pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub trait_type: String,
    pub value: String,
}

/// Card-sized view of an owned asset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub name: String,
    pub address: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Royalty {
    pub model: String,
    pub percent: f64,
    pub primary_sale_happened: bool,
    pub locked: bool,
}

impl Royalty {
    /// `percent` is a fraction (0.042); render it as `"4.2%"`.
    pub fn display_percent(&self) -> String {
        let shown = format!("{:.2}", self.percent * 100.0);
        let shown = shown.trim_end_matches('0').trim_end_matches('.');
        format!("{}%", shown)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compression {
    pub eligible: bool,
    pub compressed: bool,
}

/// Full view of one asset, shown by the search page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftDetail {
    #[serde(flatten)]
    pub summary: NftSummary,
    pub collection: Collection,
    pub royalty: Royalty,
    pub owner: String,
    pub mutable: bool,
    pub burnt: bool,
    pub external_url: Option<String>,
    pub symbol: String,
    pub token_standard: String,
    pub compression: Compression,
}

/// Asset list stored under `nfts_<address>` in localStorage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedAssetList {
    pub address: Address,
    pub items: Vec<NftSummary>,
    /// Milliseconds since the Unix epoch.
    pub fetched_at: u64,
}

// ============================================================================
// Indexer Wire Format
// ============================================================================

/// `{ "result": ..., "error": ... }` envelope returned by the indexer.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub result: Option<T>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl<T> Envelope<T> {
    /// Unwrap the result, surfacing an error object as [`FetchError::Api`].
    pub fn into_result(self) -> Result<T, FetchError> {
        if let Some(error) = self.error.filter(|e| !e.is_null()) {
            let message = match &error {
                Value::String(s) => s.clone(),
                Value::Object(map) => map
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| error.to_string()),
                other => other.to_string(),
            };
            return Err(FetchError::Api(message));
        }
        self.result
            .ok_or_else(|| FetchError::Api("response carried no result".to_string()))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AssetPage {
    #[serde(default)]
    pub items: Vec<RawAsset>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawAsset {
    pub id: String,
    pub content: RawContent,
    pub grouping: Vec<RawGrouping>,
    pub royalty: RawRoyalty,
    pub ownership: RawOwnership,
    pub compression: RawCompression,
    pub mutable: bool,
    pub burnt: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawContent {
    pub metadata: RawMetadata,
    pub links: RawLinks,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawMetadata {
    pub name: Option<String>,
    pub description: Option<String>,
    pub symbol: Option<String>,
    pub token_standard: Option<String>,
    pub attributes: Option<Vec<RawAttribute>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawAttribute {
    pub trait_type: Option<String>,
    pub value: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawLinks {
    pub image: Option<String>,
    pub external_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawGrouping {
    pub group_key: String,
    pub group_value: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawRoyalty {
    pub royalty_model: Option<String>,
    pub percent: Option<f64>,
    pub primary_sale_happened: Option<bool>,
    pub locked: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawOwnership {
    pub owner: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawCompression {
    pub eligible: bool,
    pub compressed: bool,
}

/// Empty strings count as missing, matching the indexer's habit of sending `""`.
fn or_default(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl From<RawAttribute> for Attribute {
    fn from(raw: RawAttribute) -> Self {
        let value = match raw.value {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        };
        Self {
            trait_type: raw.trait_type.unwrap_or_default(),
            value,
        }
    }
}

impl RawAsset {
    fn summary(&mut self) -> NftSummary {
        let metadata = &mut self.content.metadata;
        NftSummary {
            id: std::mem::take(&mut self.id),
            title: or_default(metadata.name.take(), "Untitled"),
            description: or_default(metadata.description.take(), "No description available."),
            image_url: self.content.links.image.take().unwrap_or_default(),
            attributes: metadata
                .attributes
                .take()
                .unwrap_or_default()
                .into_iter()
                .map(Attribute::from)
                .collect(),
        }
    }
}

impl From<RawAsset> for NftSummary {
    fn from(mut raw: RawAsset) -> Self {
        raw.summary()
    }
}

impl From<RawAsset> for NftDetail {
    fn from(mut raw: RawAsset) -> Self {
        let summary = raw.summary();
        let symbol = raw.content.metadata.symbol.take().unwrap_or_default();
        let collection_address = raw
            .grouping
            .iter()
            .find(|g| g.group_key == "collection")
            .map(|g| g.group_value.clone());

        Self {
            collection: Collection {
                name: or_default(Some(symbol.clone()), "Unknown Collection"),
                address: or_default(collection_address, "Unknown Address"),
            },
            royalty: Royalty {
                model: or_default(raw.royalty.royalty_model, "Unknown"),
                percent: raw.royalty.percent.unwrap_or(0.0),
                primary_sale_happened: raw.royalty.primary_sale_happened.unwrap_or(false),
                locked: raw.royalty.locked.unwrap_or(false),
            },
            owner: or_default(raw.ownership.owner, "Unknown Owner"),
            mutable: raw.mutable,
            burnt: raw.burnt,
            external_url: raw.content.links.external_url.filter(|u| !u.is_empty()),
            symbol,
            token_standard: raw.content.metadata.token_standard.unwrap_or_default(),
            compression: Compression {
                eligible: raw.compression.eligible,
                compressed: raw.compression.compressed,
            },
            summary,
        }
    }
}

/// Decode an asset-list envelope into summaries.
pub fn parse_asset_list(body: &str) -> Result<Vec<NftSummary>, FetchError> {
    let envelope: Envelope<AssetPage> =
        serde_json::from_str(body).map_err(|e| FetchError::JsonParseError(e.to_string()))?;
    Ok(envelope
        .into_result()?
        .items
        .into_iter()
        .map(NftSummary::from)
        .collect())
}

/// Decode a single-asset envelope into a detail view.
pub fn parse_asset_detail(body: &str) -> Result<NftDetail, FetchError> {
    let envelope: Envelope<RawAsset> =
        serde_json::from_str(body).map_err(|e| FetchError::JsonParseError(e.to_string()))?;
    Ok(envelope.into_result()?.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST_BODY: &str = r#"{
        "jsonrpc": "2.0",
        "result": {
            "total": 2,
            "items": [
                {
                    "id": "F9Lw3ki3hJ7PF9HQXsBzoY8GyE6sPoEZZdXJBsTTD2rk",
                    "content": {
                        "metadata": {
                            "name": "Mad Lad #8420",
                            "description": "Fock it.",
                            "attributes": [
                                { "trait_type": "Background", "value": "Purple" },
                                { "trait_type": "Rank", "value": 42 }
                            ]
                        },
                        "links": { "image": "https://img.example/8420.png" }
                    }
                },
                {
                    "id": "7Bn4sYVXXd3Lw6ksiDDjWSm3uTUC1ahkM6SgrnDC8pbJ",
                    "content": { "metadata": { "name": "", "description": null }, "links": {} }
                }
            ]
        }
    }"#;

    const DETAIL_BODY: &str = r#"{
        "jsonrpc": "2.0",
        "id": 1,
        "result": {
            "interface": "ProgrammableNFT",
            "id": "F9Lw3ki3hJ7PF9HQXsBzoY8GyE6sPoEZZdXJBsTTD2rk",
            "content": {
                "metadata": {
                    "name": "Mad Lad #8420",
                    "description": "Fock it.",
                    "symbol": "MAD",
                    "token_standard": "ProgrammableNonFungible"
                },
                "links": {
                    "image": "https://img.example/8420.png",
                    "external_url": "https://madlads.com"
                }
            },
            "grouping": [
                { "group_key": "collection", "group_value": "J1S9H3QjnRtBbbuD4HjPV6RpRhwuk4zKbxsnCHuTgh9w" }
            ],
            "royalty": {
                "royalty_model": "creators",
                "percent": 0.042,
                "primary_sale_happened": true,
                "locked": false
            },
            "ownership": { "owner": "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM" },
            "compression": { "eligible": false, "compressed": false },
            "mutable": true,
            "burnt": false
        }
    }"#;

    #[test]
    fn test_parse_asset_list_flattens_metadata() {
        let items = parse_asset_list(LIST_BODY).unwrap();
        assert_eq!(items.len(), 2);

        let first = &items[0];
        assert_eq!(first.title, "Mad Lad #8420");
        assert_eq!(first.description, "Fock it.");
        assert_eq!(first.image_url, "https://img.example/8420.png");
        assert_eq!(
            first.attributes,
            vec![
                Attribute {
                    trait_type: "Background".into(),
                    value: "Purple".into()
                },
                Attribute {
                    trait_type: "Rank".into(),
                    value: "42".into()
                },
            ]
        );
    }

    #[test]
    fn test_parse_asset_list_applies_defaults() {
        let items = parse_asset_list(LIST_BODY).unwrap();
        let second = &items[1];
        assert_eq!(second.title, "Untitled");
        assert_eq!(second.description, "No description available.");
        assert_eq!(second.image_url, "");
        assert!(second.attributes.is_empty());
    }

    #[test]
    fn test_parse_asset_list_error_object() {
        let body = r#"{ "error": { "code": -32602, "message": "Invalid owner address" } }"#;
        assert_eq!(
            parse_asset_list(body),
            Err(FetchError::Api("Invalid owner address".into()))
        );
    }

    #[test]
    fn test_parse_asset_list_rejects_garbage() {
        assert!(matches!(
            parse_asset_list("<html>502</html>"),
            Err(FetchError::JsonParseError(_))
        ));
    }

    #[test]
    fn test_parse_asset_list_missing_result() {
        assert!(matches!(parse_asset_list("{}"), Err(FetchError::Api(_))));
    }

    #[test]
    fn test_parse_asset_detail() {
        let nft = parse_asset_detail(DETAIL_BODY).unwrap();
        assert_eq!(nft.summary.title, "Mad Lad #8420");
        assert_eq!(nft.collection.name, "MAD");
        assert_eq!(
            nft.collection.address,
            "J1S9H3QjnRtBbbuD4HjPV6RpRhwuk4zKbxsnCHuTgh9w"
        );
        assert_eq!(nft.royalty.model, "creators");
        assert_eq!(nft.royalty.percent, 0.042);
        assert_eq!(nft.royalty.display_percent(), "4.2%");
        assert!(nft.royalty.primary_sale_happened);
        assert_eq!(nft.owner, "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM");
        assert_eq!(nft.external_url.as_deref(), Some("https://madlads.com"));
        assert_eq!(nft.token_standard, "ProgrammableNonFungible");
        assert!(nft.mutable);
        assert!(!nft.compression.compressed);
    }

    #[test]
    fn test_parse_asset_detail_defaults() {
        let nft = parse_asset_detail(r#"{ "result": { "id": "abc" } }"#).unwrap();
        assert_eq!(nft.collection.name, "Unknown Collection");
        assert_eq!(nft.collection.address, "Unknown Address");
        assert_eq!(nft.owner, "Unknown Owner");
        assert_eq!(nft.royalty.model, "Unknown");
        assert_eq!(nft.royalty.display_percent(), "0%");
        assert_eq!(nft.external_url, None);
    }

    #[test]
    fn test_cached_list_serialized_shape() {
        let cached = CachedAssetList {
            address: Address::parse("9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM").unwrap(),
            items: vec![],
            fetched_at: 1_700_000_000_000,
        };
        let json = serde_json::to_value(&cached).unwrap();
        assert_eq!(json["fetchedAt"], 1_700_000_000_000u64);
        assert_eq!(json["address"], "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM");
    }
}
