use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

/// Wrapped SOL mint; also stands for native SOL
pub const SOL_MINT: Pubkey = Pubkey::from_str_const("So11111111111111111111111111111111111111112");
pub const USDC_MINT: Pubkey = Pubkey::from_str_const("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v");

/// Jupiter referral program that owns the fee PDAs
pub const JUP_REFERRAL_PROGRAM: Pubkey =
    Pubkey::from_str_const("REFER4ZgmyYx9c6He5XfaTMiGfdLwRnkV4RPp9t9iF3");

pub const SOL_DECIMALS: u8 = 9;

/// 300 = 3%
pub const DEFAULT_SLIPPAGE_BPS: u16 = 300;
pub const MAX_SLIPPAGE_BPS: u16 = 10_000;

/// One swap, amounts in human units
#[derive(Debug, Clone, PartialEq)]
pub struct SwapRequest {
    pub output_mint: Pubkey,
    pub input_amount: Decimal,
    pub input_mint: Pubkey,
    pub slippage_bps: u16,
}

impl SwapRequest {
    /// Spend `input_amount` USDC for `output_mint` at the default slippage
    pub fn new(output_mint: Pubkey, input_amount: Decimal) -> Self {
        Self {
            output_mint,
            input_amount,
            input_mint: USDC_MINT,
            slippage_bps: DEFAULT_SLIPPAGE_BPS,
        }
    }

    pub fn with_input_mint(mut self, input_mint: Pubkey) -> Self {
        self.input_mint = input_mint;
        self
    }

    pub fn with_slippage_bps(mut self, slippage_bps: u16) -> Self {
        self.slippage_bps = slippage_bps;
        self
    }

    pub fn is_native_input(&self) -> bool {
        self.input_mint == SOL_MINT
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.input_amount <= Decimal::ZERO {
            anyhow::bail!("input amount must be greater than 0, got {}", self.input_amount);
        }

        if self.slippage_bps > MAX_SLIPPAGE_BPS {
            anyhow::bail!(
                "slippage must be between 0 and {} bps, got {}",
                MAX_SLIPPAGE_BPS,
                self.slippage_bps
            );
        }

        Ok(())
    }
}

/// Route proposal from `/quote`, passed back to `/swap` untouched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quote(pub serde_json::Value);

/// Query for `GET /quote`
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteParams {
    pub input_mint: Pubkey,
    pub output_mint: Pubkey,
    /// Base units
    pub amount: u64,
    pub slippage_bps: u16,
    pub platform_fee_bps: Option<u16>,
}

impl QuoteParams {
    /// Query string pairs in the order Jupiter documents them
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("inputMint", self.input_mint.to_string()),
            ("outputMint", self.output_mint.to_string()),
            ("amount", self.amount.to_string()),
            ("slippageBps", self.slippage_bps.to_string()),
            ("onlyDirectRoutes", "true".to_string()),
            ("maxAccounts", "20".to_string()),
        ];

        if let Some(fee_bps) = self.platform_fee_bps {
            query.push(("platformFeeBps", fee_bps.to_string()));
        }

        query
    }
}

/// Body for `POST /swap`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapTransactionRequest {
    pub quote_response: Quote,
    pub user_public_key: String,
    pub wrap_and_unwrap_sol: bool,
    pub dynamic_compute_unit_limit: bool,
    pub prioritization_fee_lamports: String,
    /// Serialized as `null` when there is no referral account
    pub fee_account: Option<String>,
}

impl SwapTransactionRequest {
    pub fn new(quote: Quote, user: &Pubkey, fee_account: Option<Pubkey>) -> Self {
        Self {
            quote_response: quote,
            user_public_key: user.to_string(),
            wrap_and_unwrap_sol: true,
            dynamic_compute_unit_limit: true,
            prioritization_fee_lamports: "auto".to_string(),
            fee_account: fee_account.map(|account| account.to_string()),
        }
    }
}

/// Reply from `POST /swap`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapTransactionResponse {
    /// base64 versioned transaction
    pub swap_transaction: String,
    #[serde(default)]
    pub last_valid_block_height: Option<u64>,
}
