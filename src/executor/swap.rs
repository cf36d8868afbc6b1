//! Jupiter swap executor
//!
//! Flow for a single swap:
//! 1. Resolve input decimals (9 for SOL, otherwise read the mint)
//! 2. Scale the amount into base units
//! 3. GET /quote
//! 4. Derive the referral fee account, if one is configured
//! 5. POST /swap for a ready-made transaction
//! 6. Decode, sign, submit
//!
//! Each step maps its error to a [`FailureKind`]; the caller only ever sees a
//! [`SwapFailure`].

use log::{debug, error, info, warn};
use rust_decimal::Decimal;
use solana_sdk::{pubkey::Pubkey, signer::Signer};
use std::sync::Arc;

use crate::amount::to_base_units;
use crate::config::Config;
use crate::error::{FailureKind, SwapFailure};
use crate::executor::TransactionBuilder;
use crate::jupiter::{JupiterClient, SwapApi};
use crate::ledger::{Ledger, RpcLedger};
use crate::referral;
use crate::types::{QuoteParams, SwapRequest, SwapTransactionRequest, SOL_DECIMALS, SOL_MINT};

pub struct SwapExecutor {
    config: Arc<Config>,
    api: Arc<dyn SwapApi>,
    ledger: Arc<dyn Ledger>,
    builder: TransactionBuilder,
    /// Parsed once; `None` when no referral account is configured
    referral_account: Option<Pubkey>,
}

impl SwapExecutor {
    /// Executor talking to Jupiter over HTTP and to the configured RPC node
    pub fn new(config: Arc<Config>) -> anyhow::Result<Self> {
        let api = Arc::new(JupiterClient::new(&config)?);
        let ledger = Arc::new(RpcLedger::new(&config));

        let executor = Self::with_collaborators(config, api, ledger)?;

        info!("🔁 Swap executor initialized");
        info!("   Jupiter API: {}", executor.config.jup_api_base());
        info!("   RPC endpoint: {}", executor.config.rpc_endpoint);

        Ok(executor)
    }

    pub fn with_collaborators(
        config: Arc<Config>,
        api: Arc<dyn SwapApi>,
        ledger: Arc<dyn Ledger>,
    ) -> anyhow::Result<Self> {
        config.validate()?;
        let referral_account = config.referral_account()?;

        Ok(Self {
            config,
            api,
            ledger,
            builder: TransactionBuilder::new(),
            referral_account,
        })
    }

    /// Swap with the usual defaults: USDC input, 300 bps slippage
    pub async fn trade<S: Signer>(
        &self,
        wallet: &S,
        output_mint: Pubkey,
        input_amount: Decimal,
        input_mint: Option<Pubkey>,
        slippage_bps: Option<u16>,
    ) -> Result<String, SwapFailure> {
        let mut request = SwapRequest::new(output_mint, input_amount);
        if let Some(input_mint) = input_mint {
            request = request.with_input_mint(input_mint);
        }
        if let Some(slippage_bps) = slippage_bps {
            request = request.with_slippage_bps(slippage_bps);
        }

        self.execute(wallet, &request).await
    }

    /// Run one swap and return the transaction signature
    pub async fn execute<S: Signer>(&self, wallet: &S, request: &SwapRequest) -> Result<String, SwapFailure> {
        info!("═══════════════════════════════════════════════════════");
        info!("🔁 Starting Jupiter swap");
        info!("   Wallet: {}", wallet.pubkey());
        info!("   Input: {} of {}", request.input_amount, request.input_mint);
        info!("   Output mint: {}", request.output_mint);
        info!("   Slippage: {} bps", request.slippage_bps);
        info!("═══════════════════════════════════════════════════════");

        match self.run(wallet, request).await {
            Ok(signature) => {
                info!("✅ Swap submitted: {}", signature);
                Ok(signature)
            }
            Err(failure) => {
                error!("❌ {} ({} step)", failure, failure.kind);
                Err(failure)
            }
        }
    }

    async fn run<S: Signer>(&self, wallet: &S, request: &SwapRequest) -> Result<String, SwapFailure> {
        request
            .validate()
            .map_err(|e| SwapFailure::from_error(FailureKind::InvalidRequest, &e))?;

        // 1. decimals
        let decimals = self.input_decimals(&request.input_mint).await?;

        // 2. base units
        let amount = to_base_units(request.input_amount, decimals)
            .map_err(|e| SwapFailure::from_error(FailureKind::InvalidRequest, &e))?;
        debug!("💱 {} → {} base units ({} decimals)", request.input_amount, amount, decimals);

        // 3. quote
        let params = self.quote_params(request, amount);
        let quote = self.api.quote(&params).await.map_err(|e| {
            warn!("⚠️  Quote request failed: {:#}", e);
            SwapFailure::from(e)
        })?;
        debug!("📋 Quote received");

        // 4. fee account
        let fee_account = self.fee_account();
        if let Some(fee_account) = fee_account {
            debug!("💰 Referral fee account: {}", fee_account);
        }

        // 5. transaction from Jupiter
        let swap_request = SwapTransactionRequest::new(quote, &wallet.pubkey(), fee_account);
        let swap_transaction = self.api.swap_transaction(&swap_request).await.map_err(|e| {
            warn!("⚠️  Swap transaction request failed: {:#}", e);
            SwapFailure::from(e)
        })?;

        // 6. decode, sign, submit
        let transaction = self
            .builder
            .decode(&swap_transaction)
            .map_err(|e| SwapFailure::from_error(FailureKind::Decode, &e))?;

        let transaction = self
            .builder
            .sign(transaction, wallet)
            .map_err(|e| SwapFailure::from_error(FailureKind::Signing, &e))?;

        info!("📤 Sending swap transaction");
        let signature = self
            .ledger
            .send_transaction(&transaction)
            .await
            .map_err(|e| SwapFailure::from_error(FailureKind::Submission, &e))?;

        Ok(signature.to_string())
    }

    async fn input_decimals(&self, input_mint: &Pubkey) -> Result<u8, SwapFailure> {
        if *input_mint == SOL_MINT {
            return Ok(SOL_DECIMALS);
        }

        self.ledger.mint_decimals(input_mint).await.map_err(|e| {
            warn!("⚠️  Could not read decimals of {}: {:#}", input_mint, e);
            SwapFailure::from_error(FailureKind::MetadataLookup, &e)
        })
    }

    fn quote_params(&self, request: &SwapRequest, amount: u64) -> QuoteParams {
        QuoteParams {
            input_mint: if request.is_native_input() { SOL_MINT } else { request.input_mint },
            output_mint: request.output_mint,
            amount,
            slippage_bps: request.slippage_bps,
            platform_fee_bps: self.config.jup_fee_bps,
        }
    }

    fn fee_account(&self) -> Option<Pubkey> {
        self.referral_account.as_ref().map(referral::fee_account)
    }
}
