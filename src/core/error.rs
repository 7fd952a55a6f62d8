//! Custom error types for the application.
//!
//! Provides structured error handling with meaningful error messages
//! and proper error categorization for each domain:
//!
//! - [`WalletError`] - Registry operations and provider handshakes
//! - [`StorageError`] - localStorage writes
//! - [`FetchError`] - Network/fetch-related errors for HTTP requests
//!
//! Every variant is recoverable: the UI shows it inline and leaves retrying
//! to the user.

use thiserror::Error;

use crate::models::ProviderKind;

/// Errors raised by the wallet registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// Address failed base-58 / length validation.
    #[error("invalid wallet address: {0}")]
    InvalidAddress(String),
    /// Extension for this provider is not injected into the page.
    #[error("{0} wallet not detected. Please install the extension.")]
    NotDetected(ProviderKind),
    /// Provider handshake failed or was rejected by the user.
    #[error("failed to connect to {provider}: {reason}")]
    Connection {
        provider: ProviderKind,
        reason: String,
    },
    /// A handshake is already pending.
    #[error("{pending} connection already in progress")]
    ConcurrentConnect { pending: ProviderKind },
    /// A different wallet is already connected.
    #[error("{connected} is already connected; disconnect it first")]
    AnotherWalletConnected { connected: String },
    /// Selected account is not one the wallet reported.
    #[error("account {account} is not known to {wallet}")]
    UnknownAccount { wallet: String, account: String },
}

/// localStorage errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// localStorage not available.
    #[error("localStorage not available")]
    Unavailable,
    /// Failed to serialize a record to JSON.
    #[error("failed to serialize {key}: {reason}")]
    Serialization { key: String, reason: String },
    /// Failed to write to localStorage (quota, private mode).
    #[error("failed to write {0} to localStorage")]
    WriteFailed(String),
    /// Failed to remove from localStorage.
    #[error("failed to remove {0} from localStorage")]
    RemoveFailed(String),
}

/// Network/fetch-related errors for HTTP requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Failed to create HTTP request
    #[error("Failed to create request")]
    RequestCreationFailed,
    /// Network request failed (CORS, offline, etc.)
    #[error("Network error: {0}")]
    NetworkError(String),
    /// HTTP error response (non-2xx status)
    #[error("HTTP error: {0}")]
    HttpError(u16),
    /// Failed to read response body
    #[error("Failed to read response")]
    ResponseReadFailed,
    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParseError(String),
    /// Indexer answered with an error object
    #[error("Indexer error: {0}")]
    Api(String),
    /// Request rejected before sending
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
