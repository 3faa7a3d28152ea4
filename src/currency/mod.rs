//! Currency conversion form support.
//!
//! Conversion rates live on the remote service; this module only validates
//! input, issues the request and exposes the selectable currencies.

pub mod catalog;
pub mod client;
pub mod error;

pub use catalog::{find_currency, Currency, CURRENCIES, DEFAULT_SOURCE, DEFAULT_TARGET};
pub use client::{ConversionRequest, CurrencyClient};
pub use error::{CurrencyError, CurrencyResult};
