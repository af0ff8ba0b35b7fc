//! Checked arithmetic helpers - no unwrap, no panics

use crate::error::EscrowError;

/// Add u64, failing with `Overflow` past `u64::MAX`
pub fn add_u64(a: u64, b: u64) -> Result<u64, EscrowError> {
    a.checked_add(b).ok_or(EscrowError::Overflow)
}

/// Subtract u64, failing with `InsufficientFunds` below zero
pub fn sub_u64(a: u64, b: u64) -> Result<u64, EscrowError> {
    a.checked_sub(b).ok_or(EscrowError::InsufficientFunds)
}

/// Sum into u128 so totals over many u64 balances cannot overflow
pub fn sum_u128<I: IntoIterator<Item = u64>>(values: I) -> u128 {
    values.into_iter().fold(0u128, |acc, v| acc.saturating_add(v as u128))
}
