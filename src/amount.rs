//! Human amount → base units.
//!
//! Scaling is done in `Decimal` so `0.1` USDC is exactly `100_000` base units.
//! Digits beyond the mint's precision are truncated toward zero; a swap never
//! spends more than the caller asked for.

use anyhow::{Context, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Largest power of ten a `Decimal` can hold
const MAX_DECIMALS: u8 = 28;

/// `amount × 10^decimals`, truncated, as a `u64`
pub fn to_base_units(amount: Decimal, decimals: u8) -> Result<u64> {
    if amount <= Decimal::ZERO {
        anyhow::bail!("amount must be greater than 0, got {}", amount);
    }

    if decimals > MAX_DECIMALS {
        anyhow::bail!("unsupported mint precision: {} decimals", decimals);
    }

    let factor = Decimal::from_i128_with_scale(10i128.pow(decimals as u32), 0);
    let scaled = amount
        .checked_mul(factor)
        .with_context(|| format!("{} with {} decimals overflows", amount, decimals))?
        .trunc();

    let base_units = scaled
        .to_u64()
        .with_context(|| format!("{} base units does not fit in u64", scaled))?;

    if base_units == 0 {
        anyhow::bail!(
            "{} is smaller than one base unit of a {}-decimal token",
            amount,
            decimals
        );
    }

    Ok(base_units)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn native_sol_uses_nine_decimals() {
        assert_eq!(to_base_units(dec!(1.5), 9).unwrap(), 1_500_000_000);
    }

    #[test]
    fn six_decimal_token() {
        assert_eq!(to_base_units(dec!(10), 6).unwrap(), 10_000_000);
        assert_eq!(to_base_units(dec!(0.1), 6).unwrap(), 100_000);
    }

    #[test]
    fn zero_decimals_is_identity() {
        assert_eq!(to_base_units(dec!(42), 0).unwrap(), 42);
    }

    #[test]
    fn excess_precision_is_truncated() {
        assert_eq!(to_base_units(dec!(1.2345679), 6).unwrap(), 1_234_567);
        assert_eq!(to_base_units(dec!(0.0000019), 6).unwrap(), 1);
    }

    #[test]
    fn dust_below_one_unit_is_rejected() {
        let err = to_base_units(dec!(0.0000001), 6).unwrap_err();
        assert!(err.to_string().contains("smaller than one base unit"));
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        assert!(to_base_units(dec!(0), 9).is_err());
        assert!(to_base_units(dec!(-3), 9).is_err());
    }

    #[test]
    fn u64_overflow_is_an_error() {
        assert!(to_base_units(dec!(10000000000), 9).is_ok());
        assert!(to_base_units(dec!(100000000000000), 9).is_err());
    }

    #[test]
    fn oversized_precision_is_rejected() {
        assert!(to_base_units(dec!(1), 29).is_err());
    }
}
