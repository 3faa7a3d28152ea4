//! One-shot client for the remote conversion endpoint.

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::catalog::find_currency;
use super::error::{CurrencyError, CurrencyResult};
use crate::config::ClientConfig;

/// Conversion endpoint, relative to the base URL.
const CONVERT_PATH: &str = "api/convert";

/// Body of `POST /api/convert`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRequest {
    /// Amount in the source currency.
    pub amount: f64,
    /// Source currency code.
    pub source_currency: String,
    /// Target currency code.
    pub target_currency: String,
}

impl ConversionRequest {
    /// Validate user input and build a request.
    ///
    /// # Errors
    /// Returns an error if the amount does not parse as a finite,
    /// non-negative number or a currency is unknown.
    pub fn parse(amount: &str, source: &str, target: &str) -> CurrencyResult<Self> {
        let value: f64 = amount
            .trim()
            .parse()
            .map_err(|_| CurrencyError::InvalidAmount(amount.to_string()))?;
        if !value.is_finite() || value < 0.0 {
            return Err(CurrencyError::InvalidAmount(amount.to_string()));
        }

        let source = find_currency(source)
            .ok_or_else(|| CurrencyError::UnknownCurrency(source.to_string()))?;
        let target = find_currency(target)
            .ok_or_else(|| CurrencyError::UnknownCurrency(target.to_string()))?;

        Ok(Self {
            amount: value,
            source_currency: source.code.to_string(),
            target_currency: target.code.to_string(),
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConversionResponse {
    target_amount: f64,
}

/// Stateless client for currency conversion.
#[derive(Clone, Debug)]
pub struct CurrencyClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl CurrencyClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> CurrencyResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| CurrencyError::HttpClient(e.to_string()))?;

        let mut base_url = Url::parse(&config.currency_base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let endpoint = base_url.join(CONVERT_PATH)?;

        Ok(Self { client, endpoint })
    }

    /// Convert an amount and return it in the target currency.
    ///
    /// # Errors
    /// Returns an error on transport failure or a non-success status.
    pub async fn convert(&self, request: &ConversionRequest) -> CurrencyResult<f64> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CurrencyError::Status(status.as_u16()));
        }

        let body: ConversionResponse = response.json().await?;
        debug!(
            "Converted {} {} to {} {}",
            request.amount, request.source_currency, body.target_amount, request.target_currency
        );
        Ok(body.target_amount)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn test_parse_request() {
        let request = ConversionRequest::parse(" 12.5 ", "usd", "INR").expect("parse");
        assert_eq!(request.amount, 12.5);
        assert_eq!(request.source_currency, "USD");
        assert_eq!(request.target_currency, "INR");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            ConversionRequest::parse("abc", "USD", "INR"),
            Err(CurrencyError::InvalidAmount(_))
        ));
        assert!(matches!(
            ConversionRequest::parse("-1", "USD", "INR"),
            Err(CurrencyError::InvalidAmount(_))
        ));
        assert!(matches!(
            ConversionRequest::parse("NaN", "USD", "INR"),
            Err(CurrencyError::InvalidAmount(_))
        ));
        assert!(matches!(
            ConversionRequest::parse("1", "USD", "XXX"),
            Err(CurrencyError::UnknownCurrency(_))
        ));
    }

    #[tokio::test]
    async fn test_convert() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/convert"))
            .and(body_json(serde_json::json!({
                "amount": 10.0,
                "sourceCurrency": "USD",
                "targetCurrency": "INR"
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"targetAmount": 835.5})),
            )
            .mount(&server)
            .await;

        let client =
            CurrencyClient::new(&ClientConfig::new().with_currency_base_url(server.uri()))
                .expect("client");
        let request = ConversionRequest::parse("10", "USD", "INR").unwrap();
        let converted = client.convert(&request).await.expect("convert");
        assert!((converted - 835.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_convert_failure_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/convert"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let client =
            CurrencyClient::new(&ClientConfig::new().with_currency_base_url(server.uri()))
                .expect("client");
        let request = ConversionRequest::parse("1", "EUR", "GBP").unwrap();
        let err = client.convert(&request).await.unwrap_err();
        assert!(matches!(err, CurrencyError::Status(502)));
    }
}
