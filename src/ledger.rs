use anyhow::{Context, Result};
use log::debug;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    pubkey::Pubkey,
    signature::Signature,
    transaction::VersionedTransaction,
};
use spl_token::solana_program::program_pack::Pack;
use spl_token::state::Mint;

use crate::config::Config;

const TOKEN_PROGRAM: Pubkey = Pubkey::from_str_const("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");
const TOKEN_2022_PROGRAM: Pubkey = Pubkey::from_str_const("TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb");

/// On-chain reads and transaction submission
#[async_trait::async_trait]
pub trait Ledger: Send + Sync {
    /// Decimal precision of a token mint
    async fn mint_decimals(&self, mint: &Pubkey) -> Result<u8>;

    async fn send_transaction(&self, transaction: &VersionedTransaction) -> Result<Signature>;
}

pub struct RpcLedger {
    rpc_client: RpcClient,
}

impl RpcLedger {
    pub fn new(config: &Config) -> Self {
        Self::with_client(RpcClient::new_with_commitment(
            config.rpc_endpoint.clone(),
            config.get_commitment_config(),
        ))
    }

    pub fn with_client(rpc_client: RpcClient) -> Self {
        Self { rpc_client }
    }
}

#[async_trait::async_trait]
impl Ledger for RpcLedger {
    async fn mint_decimals(&self, mint: &Pubkey) -> Result<u8> {
        let account = self
            .rpc_client
            .get_account(mint)
            .await
            .with_context(|| format!("Failed to read mint account {}", mint))?;

        if account.owner != TOKEN_PROGRAM && account.owner != TOKEN_2022_PROGRAM {
            anyhow::bail!("{} is not a token mint (owner {})", mint, account.owner);
        }

        let decimals = decode_mint_decimals(&account.data)
            .with_context(|| format!("Failed to decode mint {}", mint))?;

        debug!("🔍 Mint {} has {} decimals", mint, decimals);
        Ok(decimals)
    }

    async fn send_transaction(&self, transaction: &VersionedTransaction) -> Result<Signature> {
        let signature = self
            .rpc_client
            .send_transaction(transaction)
            .await
            .context("Failed to send transaction")?;

        Ok(signature)
    }
}

/// Decimals from SPL Token mint data. Token-2022 mints share the base layout
/// and append extensions after it.
fn decode_mint_decimals(data: &[u8]) -> Result<u8> {
    if data.len() < Mint::LEN {
        anyhow::bail!("mint data too short: {} bytes", data.len());
    }

    let mint = Mint::unpack(&data[..Mint::LEN])
        .map_err(|e| anyhow::anyhow!("invalid mint data: {:?}", e))?;

    Ok(mint.decimals)
}
