//! Error types for the currency client.

use thiserror::Error;

/// Errors that can occur while converting an amount.
#[derive(Debug, Error)]
pub enum CurrencyError {
    /// The amount is not a finite, non-negative number.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// The currency code is not in the catalogue.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    /// HTTP transport or body decoding failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP client configuration error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// The server answered with a non-success status.
    #[error("conversion returned status {0}")]
    Status(u16),

    /// Base URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Convenience result alias for currency operations.
pub type CurrencyResult<T> = Result<T, CurrencyError>;
