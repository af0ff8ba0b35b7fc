//! In-memory execution host
//!
//! Holds program-owned records keyed by derived address plus the token
//! ledger. Transitions clone the state, apply every mutation to the clone and
//! hand it back only on success, which gives the all-or-nothing commit the
//! on-chain runtime provides.

use std::collections::BTreeMap;

use crate::address::Address;
use crate::error::EscrowError;
use crate::seeds::vault_authority_address;
use crate::state::*;
use crate::tokens::{TokenAccountId, TokenLedger};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record {
    Pool(Pool),
    Maker(Maker),
    Contribution(Contribution),
    Transaction(Transaction),
    Config(ProgramConfig),
}

/// An identity whose signature the host has already validated.
///
/// Operations take the capability explicitly instead of reading an ambient
/// wallet, so each one states exactly which signer it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signer(Address);

impl Signer {
    pub fn new(key: Address) -> Self {
        Self(key)
    }

    pub fn key(&self) -> &Address {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    pub program_id: Address,
    /// Identity allowed to create and change the program config
    pub admin: Address,
    /// Owner of every vault token account
    pub vault_authority: Address,
    pub tokens: TokenLedger,
    accounts: BTreeMap<Address, Record>,
}

macro_rules! record_accessors {
    ($get:ident, $get_mut:ident, $variant:ident, $ty:ty) => {
        pub fn $get(&self, address: &Address) -> Result<&$ty, EscrowError> {
            match self.accounts.get(address) {
                Some(Record::$variant(record)) => Ok(record),
                Some(_) => Err(EscrowError::InvalidAccount),
                None => Err(EscrowError::NotFound),
            }
        }

        pub fn $get_mut(&mut self, address: &Address) -> Result<&mut $ty, EscrowError> {
            match self.accounts.get_mut(address) {
                Some(Record::$variant(record)) => Ok(record),
                Some(_) => Err(EscrowError::InvalidAccount),
                None => Err(EscrowError::NotFound),
            }
        }
    };
}

impl State {
    pub fn new(program_id: Address) -> Result<Self, EscrowError> {
        let (vault_authority, _) = vault_authority_address(&program_id)?;
        Ok(Self {
            program_id,
            admin: [0; 32],
            vault_authority,
            tokens: TokenLedger::new(),
            accounts: BTreeMap::new(),
        })
    }

    /// Fix the config admin, as a deployment does at build time
    pub fn with_admin(mut self, admin: Address) -> Self {
        self.admin = admin;
        self
    }

    /// Allocate a record at a fresh address
    pub fn create(&mut self, address: Address, record: Record) -> Result<(), EscrowError> {
        if self.accounts.contains_key(&address) {
            return Err(EscrowError::AlreadyExists);
        }
        self.accounts.insert(address, record);
        Ok(())
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.accounts.contains_key(address)
    }

    pub fn records(&self) -> impl Iterator<Item = (&Address, &Record)> {
        self.accounts.iter()
    }

    record_accessors!(pool, pool_mut, Pool, Pool);
    record_accessors!(maker, maker_mut, Maker, Maker);
    record_accessors!(contribution, contribution_mut, Contribution, Contribution);
    record_accessors!(transaction, transaction_mut, Transaction, Transaction);
    record_accessors!(config_at, config_at_mut, Config, ProgramConfig);

    /// Vault token account for `mint`
    pub fn vault(&self, mint: &Address) -> TokenAccountId {
        TokenAccountId::new(self.vault_authority, *mint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_rejects_duplicate() {
        let mut s = State::new([1; 32]).unwrap();
        let maker = Maker::new([2; 32], 255);
        s.create([3; 32], Record::Maker(maker)).unwrap();
        assert_eq!(s.create([3; 32], Record::Maker(maker)), Err(EscrowError::AlreadyExists));
    }

    #[test]
    fn test_typed_access() {
        let mut s = State::new([1; 32]).unwrap();
        s.create([3; 32], Record::Maker(Maker::new([2; 32], 255))).unwrap();

        assert!(s.maker(&[3; 32]).is_ok());
        assert_eq!(s.pool(&[3; 32]).unwrap_err(), EscrowError::InvalidAccount);
        assert_eq!(s.pool(&[4; 32]).unwrap_err(), EscrowError::NotFound);
    }
}
