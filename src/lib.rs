//! Token swaps through the Jupiter aggregator: quote, build, sign locally,
//! submit to Solana.

pub mod amount;
pub mod config;
pub mod error;
pub mod executor;
pub mod jupiter;
pub mod ledger;
pub mod referral;
pub mod types;

pub use config::Config;
pub use error::{ApiError, FailureKind, SwapFailure};
pub use executor::{SwapExecutor, TransactionBuilder};
pub use jupiter::{JupiterClient, SwapApi};
pub use ledger::{Ledger, RpcLedger};
pub use types::{Quote, QuoteParams, SwapRequest, SwapTransactionRequest, DEFAULT_SLIPPAGE_BPS, SOL_MINT, USDC_MINT};
