//! In-memory token ledger standing in for the SPL token program

use std::collections::BTreeMap;

use crate::address::Address;
use crate::error::EscrowError;
use crate::math::{add_u64, sub_u64, sum_u128};

/// Token account identity: one account per (owner, mint), like an associated token account
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenAccountId {
    pub owner: Address,
    pub mint: Address,
}

impl TokenAccountId {
    pub fn new(owner: Address, mint: Address) -> Self {
        Self { owner, mint }
    }
}

/// Token-transfer capability consumed by the escrow operations
pub trait TokenBank {
    fn balance(&self, account: &TokenAccountId) -> u64;

    /// Move `amount` between two accounts of the same mint.
    ///
    /// # Errors
    ///
    /// `InsufficientFunds` when `from` holds less than `amount`,
    /// `InvalidAccount` when the mints differ.
    fn transfer(
        &mut self,
        from: &TokenAccountId,
        to: &TokenAccountId,
        amount: u64,
    ) -> Result<(), EscrowError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenLedger {
    balances: BTreeMap<TokenAccountId, u64>,
}

impl TokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create tokens out of thin air (test setup; the model never mints)
    pub fn mint_to(&mut self, account: &TokenAccountId, amount: u64) -> Result<(), EscrowError> {
        let balance = self.balances.entry(*account).or_insert(0);
        *balance = add_u64(*balance, amount)?;
        Ok(())
    }

    /// Sum of all balances for a mint
    pub fn supply(&self, mint: &Address) -> u128 {
        sum_u128(
            self.balances
                .iter()
                .filter(|(id, _)| id.mint == *mint)
                .map(|(_, amount)| *amount),
        )
    }
}

impl TokenBank for TokenLedger {
    fn balance(&self, account: &TokenAccountId) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn transfer(
        &mut self,
        from: &TokenAccountId,
        to: &TokenAccountId,
        amount: u64,
    ) -> Result<(), EscrowError> {
        if from.mint != to.mint {
            return Err(EscrowError::InvalidAccount);
        }
        if from == to {
            return Ok(());
        }

        let debited = sub_u64(self.balance(from), amount)?;
        let credited = add_u64(self.balance(to), amount)?;
        self.balances.insert(*from, debited);
        self.balances.insert(*to, credited);
        Ok(())
    }
}
