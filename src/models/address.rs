//! Validated base-58 wallet address.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::address::{DISPLAY_EDGE, MAX_LEN, MIN_LEN};
use crate::core::error::WalletError;

/// Bitcoin-style base-58 alphabet (no `0`, `O`, `I`, `l`).
const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Check whether `candidate` looks like a wallet address.
///
/// Valid addresses must:
/// - Be 32 to 44 characters long
/// - Contain only base-58 characters
pub fn is_valid_address(candidate: &str) -> bool {
    (MIN_LEN..=MAX_LEN).contains(&candidate.len())
        && candidate.chars().all(|c| BASE58_ALPHABET.contains(c))
}

/// A wallet address that has passed [`is_valid_address`].
///
/// Deserialization validates as well, so addresses read back from storage
/// or another tab are never trusted blindly.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Validate and wrap a candidate address, exactly as given.
    pub fn parse(candidate: &str) -> Result<Self, WalletError> {
        if is_valid_address(candidate) {
            Ok(Self(candidate.to_string()))
        } else {
            Err(WalletError::InvalidAddress(candidate.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Format for display (`Abcd...wxyz`).
    pub fn short(&self) -> String {
        let len = self.0.len();
        format!("{}...{}", &self.0[..DISPLAY_EDGE], &self.0[len - DISPLAY_EDGE..])
    }
}

impl TryFrom<String> for Address {
    type Error = WalletError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SYSTEM_PROGRAM: &str = "11111111111111111111111111111111";
    const TOKEN_PROGRAM: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";

    #[test]
    fn test_valid_addresses() {
        assert!(is_valid_address(SYSTEM_PROGRAM));
        assert!(is_valid_address(TOKEN_PROGRAM));
        assert!(is_valid_address(&"z".repeat(44)));
        assert!(is_valid_address(&"9".repeat(32)));
    }

    #[test]
    fn test_every_length_in_range_accepted() {
        for len in MIN_LEN..=MAX_LEN {
            let candidate: String = BASE58_ALPHABET.chars().cycle().take(len).collect();
            assert!(is_valid_address(&candidate), "length {} rejected", len);
        }
    }

    #[test]
    fn test_length_out_of_range_rejected() {
        assert!(!is_valid_address(""));
        assert!(!is_valid_address(&"a".repeat(31)));
        assert!(!is_valid_address(&"a".repeat(45)));
        assert!(!is_valid_address("BadAddr"));
    }

    #[test]
    fn test_disallowed_characters_rejected() {
        for bad in ['0', 'O', 'I', 'l', '-', ' ', '+', '/', 'é'] {
            let mut candidate = "a".repeat(40);
            candidate.push(bad);
            assert!(!is_valid_address(&candidate), "{:?} accepted", bad);
        }
    }

    #[test]
    fn test_parse_rejects_surrounding_whitespace() {
        let padded = format!("  {}\n", TOKEN_PROGRAM);
        assert!(!is_valid_address(&padded));
        assert_eq!(
            Address::parse(&padded),
            Err(WalletError::InvalidAddress(padded.clone()))
        );
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert_eq!(
            Address::parse("BadAddr"),
            Err(WalletError::InvalidAddress("BadAddr".to_string()))
        );
    }

    #[test]
    fn test_short_display() {
        let addr = Address::parse(TOKEN_PROGRAM).unwrap();
        assert_eq!(addr.short(), "Toke...Q5DA");
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Result<Address, _> = serde_json::from_str(&format!("\"{}\"", SYSTEM_PROGRAM));
        assert!(ok.is_ok());
        let bad: Result<Address, _> = serde_json::from_str("\"not-an-address\"");
        assert!(bad.is_err());
    }
}
