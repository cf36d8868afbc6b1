use solana_sdk::pubkey::Pubkey;

use crate::types::{JUP_REFERRAL_PROGRAM, SOL_MINT};

const REFERRAL_ATA_SEED: &[u8] = b"referral_ata";

/// Referral token account that collects the platform fee in SOL.
///
/// PDA of `["referral_ata", referral_account, SOL mint]` under the Jupiter
/// referral program.
pub fn fee_account(referral_account: &Pubkey) -> Pubkey {
    fee_account_for_mint(referral_account, &SOL_MINT)
}

pub fn fee_account_for_mint(referral_account: &Pubkey, mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[REFERRAL_ATA_SEED, referral_account.as_ref(), mint.as_ref()],
        &JUP_REFERRAL_PROGRAM,
    )
    .0
}
