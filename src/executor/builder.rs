use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use solana_sdk::{signature::Signature, signer::Signer, transaction::VersionedTransaction};

/// Turns the base64 payload from `/swap` into a signed transaction
pub struct TransactionBuilder;

impl TransactionBuilder {
    pub fn new() -> Self {
        Self
    }

    /// base64 → bincode `VersionedTransaction`
    pub fn decode(&self, swap_transaction: &str) -> Result<VersionedTransaction> {
        let bytes = STANDARD
            .decode(swap_transaction.trim())
            .context("swapTransaction is not valid base64")?;

        let transaction: VersionedTransaction = bincode::deserialize(&bytes)
            .context("swapTransaction is not a valid versioned transaction")?;

        Ok(transaction)
    }

    /// Add `wallet`'s signature to the transaction.
    ///
    /// Signatures already present for other required signers are kept. Fails
    /// if `wallet` is not one of the required signers.
    pub fn sign<S: Signer>(&self, mut transaction: VersionedTransaction, wallet: &S) -> Result<VersionedTransaction> {
        let wallet_pubkey = wallet.pubkey();
        let required = transaction.message.header().num_required_signatures as usize;

        let index = transaction.message.static_account_keys()[..required]
            .iter()
            .position(|key| *key == wallet_pubkey)
            .with_context(|| format!("{} is not a required signer of the swap transaction", wallet_pubkey))?;

        let signature = wallet
            .try_sign_message(&transaction.message.serialize())
            .map_err(|e| anyhow::anyhow!("Failed to sign transaction with {}: {}", wallet_pubkey, e))?;

        if transaction.signatures.len() < required {
            transaction.signatures.resize(required, Signature::default());
        }
        transaction.signatures[index] = signature;

        Ok(transaction)
    }
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
