//! Jupiter v6 HTTP client.
//!
//! `/quote` and `/swap` share one configurable base URL.

use anyhow::{anyhow, Context};
use log::debug;
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;

use crate::config::Config;
use crate::error::ApiError;
use crate::types::{Quote, QuoteParams, SwapTransactionRequest, SwapTransactionResponse};

/// The quoting / transaction-building service
#[async_trait::async_trait]
pub trait SwapApi: Send + Sync {
    /// Best route for `params`
    async fn quote(&self, params: &QuoteParams) -> Result<Quote, ApiError>;

    /// base64 transaction executing `request`
    async fn swap_transaction(&self, request: &SwapTransactionRequest) -> Result<String, ApiError>;
}

pub struct JupiterClient {
    pub base_url: String,
    pub http_client: Client,
}

impl JupiterClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http_client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(60))
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::with_client(config.jup_api_base(), http_client))
    }

    pub fn with_client(base_url: impl Into<String>, http_client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http_client }
    }

    pub fn quote_url(&self) -> String {
        format!("{}/quote", self.base_url)
    }

    pub fn swap_url(&self) -> String {
        format!("{}/swap", self.base_url)
    }
}

#[async_trait::async_trait]
impl SwapApi for JupiterClient {
    async fn quote(&self, params: &QuoteParams) -> Result<Quote, ApiError> {
        let url = self.quote_url();
        debug!("📡 GET {} {:?}", url, params.to_query());

        let response = self
            .http_client
            .get(&url)
            .query(&params.to_query())
            .send()
            .await
            .map_err(|e| ApiError::Network(anyhow!(e).context("Quote request failed")))?;

        let body = read_json(response, "Quote").await?;
        Ok(Quote(body))
    }

    async fn swap_transaction(&self, request: &SwapTransactionRequest) -> Result<String, ApiError> {
        let url = self.swap_url();
        debug!("📡 POST {} (user {})", url, request.user_public_key);

        let response = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::Network(anyhow!(e).context("Swap transaction request failed")))?;

        let body = read_json(response, "Swap transaction").await?;
        parse_swap_transaction(body)
    }
}

/// Pull the base64 transaction out of a `/swap` reply
fn parse_swap_transaction(body: Value) -> Result<String, ApiError> {
    let swap: SwapTransactionResponse = serde_json::from_value(body)
        .map_err(|e| ApiError::Service(anyhow!("Swap transaction response is missing swapTransaction: {}", e)))?;

    if let Some(height) = swap.last_valid_block_height {
        debug!("🧱 Swap transaction valid until block height {}", height);
    }

    Ok(swap.swap_transaction)
}

/// Read a response body as JSON, turning error statuses and error payloads into
/// [`ApiError::Service`]
async fn read_json(response: Response, what: &str) -> Result<Value, ApiError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::Network(anyhow!(e).context(format!("{} response could not be read", what))))?;

    parse_body(status.as_u16(), status.is_success(), &text, what)
}

fn parse_body(status: u16, is_success: bool, text: &str, what: &str) -> Result<Value, ApiError> {
    if !is_success {
        return Err(ApiError::Service(anyhow!(
            "{} request returned HTTP {}: {}",
            what,
            status,
            text.trim()
        )));
    }

    let body: Value = serde_json::from_str(text)
        .map_err(|e| ApiError::Service(anyhow!("{} response is not valid JSON ({}): {}", what, e, text.trim())))?;

    if let Some(error) = body.get("error").filter(|error| !error.is_null()) {
        let message = error.as_str().map(str::to_string).unwrap_or_else(|| error.to_string());
        return Err(ApiError::Service(anyhow!("{} error: {}", what, message)));
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;

    #[test]
    fn urls_share_one_base() {
        let client = JupiterClient::with_client("https://quote-api.jup.ag/v6/", Client::new());

        assert_eq!(client.quote_url(), "https://quote-api.jup.ag/v6/quote");
        assert_eq!(client.swap_url(), "https://quote-api.jup.ag/v6/swap");
    }

    #[test]
    fn new_reads_base_from_config() {
        let mut config = Config::new("http://localhost:8899");
        config.jup_api = "http://127.0.0.1:9000".to_string();

        let client = JupiterClient::new(&config).unwrap();
        assert_eq!(client.quote_url(), "http://127.0.0.1:9000/quote");
    }

    #[test]
    fn ok_json_body_is_returned() {
        let body = parse_body(200, true, r#"{"outAmount":"42"}"#, "Quote").unwrap();
        assert_eq!(body["outAmount"], "42");
    }

    #[test]
    fn error_status_is_service_failure() {
        let err = parse_body(502, false, "Bad Gateway", "Quote").unwrap_err();

        assert_eq!(err.kind(), FailureKind::Service);
        assert!(err.to_string().contains("HTTP 502"));
        assert!(err.to_string().contains("Bad Gateway"));
    }

    #[test]
    fn non_json_body_is_service_failure() {
        let err = parse_body(200, true, "<html>oops</html>", "Quote").unwrap_err();

        assert_eq!(err.kind(), FailureKind::Service);
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn error_payload_is_service_failure() {
        let err = parse_body(200, true, r#"{"error":"Could not find any route"}"#, "Quote").unwrap_err();

        assert_eq!(err.kind(), FailureKind::Service);
        assert_eq!(err.to_string(), "Quote error: Could not find any route");
    }

    #[test]
    fn null_error_field_is_success() {
        let body = parse_body(200, true, r#"{"error":null,"outAmount":"1"}"#, "Quote").unwrap();
        assert_eq!(body["outAmount"], "1");
    }

    #[test]
    fn swap_reply_yields_transaction() {
        let body = parse_body(
            200,
            true,
            r#"{"swapTransaction":"AQID","lastValidBlockHeight":279632475}"#,
            "Swap transaction",
        )
        .unwrap();

        assert_eq!(parse_swap_transaction(body).unwrap(), "AQID");
    }

    #[test]
    fn swap_reply_without_transaction_is_service_failure() {
        let body = parse_body(200, true, r#"{"lastValidBlockHeight":1}"#, "Swap transaction").unwrap();

        let err = parse_swap_transaction(body).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Service);
        assert!(err.to_string().contains("swapTransaction"));
    }
}
