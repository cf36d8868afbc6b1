use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use solana_commitment_config::CommitmentConfig;
use solana_sdk::{pubkey::Pubkey, signature::Keypair};
use std::str::FromStr;

/// Jupiter v6 API base, used for both `/quote` and `/swap`
pub const DEFAULT_JUP_API: &str = "https://quote-api.jup.ag/v6";

const DEFAULT_COMMITMENT_LEVEL: &str = "confirmed";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const MAX_BPS: u16 = 10_000;

/// Process-wide settings, loaded once and shared read-only across swaps.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // Network
    pub rpc_endpoint: String,
    #[serde(default = "default_commitment_level")]
    pub commitment_level: String,

    // Wallet
    #[serde(default)]
    pub wallet_private_key: Option<String>,

    // Jupiter
    #[serde(default = "default_jup_api")]
    pub jup_api: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub jup_fee_bps: Option<u16>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub jup_referral_account: Option<String>,

    // HTTP
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

/// `JUP_FEE_BPS=` in a `.env` file means "unset", not a parse error
fn empty_as_none<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

fn default_commitment_level() -> String {
    DEFAULT_COMMITMENT_LEVEL.to_string()
}

fn default_jup_api() -> String {
    DEFAULT_JUP_API.to_string()
}

fn default_http_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present)
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let config = envy::from_env::<Config>()
            .context("Failed to load configuration from environment variables")?;

        config.validate()?;

        Ok(config)
    }

    /// Minimal config pointing at `rpc_endpoint`, everything else defaulted
    pub fn new(rpc_endpoint: impl Into<String>) -> Self {
        Self {
            rpc_endpoint: rpc_endpoint.into(),
            commitment_level: default_commitment_level(),
            wallet_private_key: None,
            jup_api: default_jup_api(),
            jup_fee_bps: None,
            jup_referral_account: None,
            http_timeout_secs: default_http_timeout_secs(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.rpc_endpoint.trim().is_empty() {
            anyhow::bail!("rpc_endpoint must not be empty");
        }

        if self.jup_api.trim().is_empty() {
            anyhow::bail!("jup_api must not be empty");
        }

        if let Some(fee_bps) = self.jup_fee_bps {
            if fee_bps > MAX_BPS {
                anyhow::bail!("jup_fee_bps must be between 0 and {}", MAX_BPS);
            }
        }

        if self.http_timeout_secs == 0 {
            anyhow::bail!("http_timeout_secs must be > 0");
        }

        // Surface a bad referral key at load time rather than on the first swap
        self.referral_account()?;

        Ok(())
    }

    /// Jupiter base URL without a trailing slash
    pub fn jup_api_base(&self) -> &str {
        self.jup_api.trim_end_matches('/')
    }

    /// Configured referral account. Unset and empty values both mean "none".
    pub fn referral_account(&self) -> Result<Option<Pubkey>> {
        match self.jup_referral_account.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(account) => Pubkey::from_str(account)
                .map(Some)
                .with_context(|| format!("Invalid jup_referral_account: {}", account)),
        }
    }

    /// Decode the base58 wallet key
    pub fn get_keypair(&self) -> Result<Keypair> {
        let encoded = self
            .wallet_private_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .context("wallet_private_key is not set")?;

        let bytes = bs58::decode(encoded.trim())
            .into_vec()
            .context("wallet_private_key is not valid base58")?;

        Keypair::try_from(bytes.as_slice())
            .map_err(|e| anyhow::anyhow!("wallet_private_key is not a valid keypair: {}", e))
    }

    pub fn get_commitment_config(&self) -> CommitmentConfig {
        match self.commitment_level.to_lowercase().as_str() {
            "processed" => CommitmentConfig::processed(),
            "confirmed" => CommitmentConfig::confirmed(),
            "finalized" => CommitmentConfig::finalized(),
            _ => {
                log::warn!("⚠️  Unknown commitment_level: {}, falling back to 'confirmed'", self.commitment_level);
                CommitmentConfig::confirmed()
            }
        }
    }

    pub fn print_summary(&self) {
        log::info!("=== Configuration Summary ===");
        log::info!("Network:");
        log::info!("  RPC: {}", self.rpc_endpoint);
        log::info!("  Commitment: {}", self.commitment_level);
        log::info!("");
        log::info!("Jupiter:");
        log::info!("  API: {}", self.jup_api_base());
        match self.jup_fee_bps {
            Some(fee_bps) => log::info!("  Platform Fee: {} bps", fee_bps),
            None => log::info!("  Platform Fee: disabled"),
        }
        match self.jup_referral_account.as_deref().filter(|a| !a.trim().is_empty()) {
            Some(account) => log::info!("  Referral Account: {}", account),
            None => log::info!("  Referral Account: none"),
        }
        log::info!("  HTTP Timeout: {}s", self.http_timeout_secs);
        log::info!("=============================");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::signer::Signer;

    #[test]
    fn new_uses_defaults() {
        let config = Config::new("http://localhost:8899");

        assert_eq!(config.jup_api, DEFAULT_JUP_API);
        assert_eq!(config.commitment_level, "confirmed");
        assert_eq!(config.http_timeout_secs, 30);
        assert!(config.jup_fee_bps.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_values_deserialize_as_absent() {
        let config: Config = envy::from_iter(vec![
            ("RPC_ENDPOINT".to_string(), "http://localhost:8899".to_string()),
            ("JUP_FEE_BPS".to_string(), "".to_string()),
            ("JUP_REFERRAL_ACCOUNT".to_string(), "".to_string()),
        ])
        .unwrap();

        assert_eq!(config.jup_fee_bps, None);
        assert_eq!(config.jup_referral_account, None);
        assert_eq!(config.jup_api, DEFAULT_JUP_API);
    }

    #[test]
    fn fee_bps_is_parsed_from_env() {
        let config: Config = envy::from_iter(vec![
            ("RPC_ENDPOINT".to_string(), "http://localhost:8899".to_string()),
            ("JUP_FEE_BPS".to_string(), "50".to_string()),
        ])
        .unwrap();

        assert_eq!(config.jup_fee_bps, Some(50));
    }

    #[test]
    fn empty_referral_account_is_absent() {
        let mut config = Config::new("http://localhost:8899");
        config.jup_referral_account = Some("  ".to_string());

        assert_eq!(config.referral_account().unwrap(), None);
    }

    #[test]
    fn invalid_referral_account_fails_validation() {
        let mut config = Config::new("http://localhost:8899");
        config.jup_referral_account = Some("not-a-pubkey".to_string());

        let err = config.validate().unwrap_err();
        assert!(format!("{:#}", err).contains("jup_referral_account"));
    }

    #[test]
    fn fee_bps_above_limit_is_rejected() {
        let mut config = Config::new("http://localhost:8899");
        config.jup_fee_bps = Some(10_001);
        assert!(config.validate().is_err());

        config.jup_fee_bps = Some(10_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn jup_api_base_strips_trailing_slash() {
        let mut config = Config::new("http://localhost:8899");
        config.jup_api = "https://example.com/v6/".to_string();

        assert_eq!(config.jup_api_base(), "https://example.com/v6");
    }

    #[test]
    fn get_keypair_round_trips_base58() {
        let keypair = Keypair::new();
        let mut config = Config::new("http://localhost:8899");
        config.wallet_private_key = Some(keypair.to_base58_string());

        let loaded = config.get_keypair().unwrap();
        assert_eq!(loaded.pubkey(), keypair.pubkey());
    }

    #[test]
    fn get_keypair_rejects_garbage() {
        let mut config = Config::new("http://localhost:8899");
        config.wallet_private_key = Some("0OIl".to_string());
        assert!(config.get_keypair().is_err());

        config.wallet_private_key = None;
        assert!(config.get_keypair().is_err());
    }

    #[test]
    fn unknown_commitment_falls_back_to_confirmed() {
        let mut config = Config::new("http://localhost:8899");
        config.commitment_level = "bogus".to_string();

        assert_eq!(config.get_commitment_config(), CommitmentConfig::confirmed());
    }
}
