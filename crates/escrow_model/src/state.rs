//! Account records
//!
//! Every record is `#[repr(C)]`, fixed-size and starts with a one-byte
//! [`AccountKind`] discriminator followed by the PDA bump. A zeroed first
//! byte means the account was allocated but never initialized. The same
//! structs are written into on-chain account data and held by the in-memory
//! model, so the status rules below apply identically in both places.

use crate::address::Address;
use crate::error::EscrowError;
use crate::math::{add_u64, sub_u64};

const ZERO: Address = [0u8; 32];

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    Uninitialized = 0,
    Pool = 1,
    Maker = 2,
    Contribution = 3,
    Transaction = 4,
    Config = 5,
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolStatus {
    Active = 0,
    Paused = 1,
    Closed = 2,
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    Deposit = 0,
    Trade = 1,
    Withdrawal = 2,
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    Pending = 0,
    Completed = 1,
    Cancelled = 2,
}

/// Which sub-protocol owns a transaction record
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionFlow {
    /// Nonce-keyed offer funded through the vault
    Escrow = 0,
    /// Pool/maker audit record for ledger deposits and withdrawals
    Ledger = 1,
}

impl TryFrom<u8> for PoolStatus {
    type Error = EscrowError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Self::Active),
            1 => Ok(Self::Paused),
            2 => Ok(Self::Closed),
            _ => Err(EscrowError::InvalidAccount),
        }
    }
}

impl TryFrom<u8> for TransactionType {
    type Error = EscrowError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Self::Deposit),
            1 => Ok(Self::Trade),
            2 => Ok(Self::Withdrawal),
            _ => Err(EscrowError::InvalidAccount),
        }
    }
}

impl TryFrom<u8> for TransactionStatus {
    type Error = EscrowError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Self::Pending),
            1 => Ok(Self::Completed),
            2 => Ok(Self::Cancelled),
            _ => Err(EscrowError::InvalidAccount),
        }
    }
}

impl TryFrom<u8> for TransactionFlow {
    type Error = EscrowError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Self::Escrow),
            1 => Ok(Self::Ledger),
            _ => Err(EscrowError::InvalidAccount),
        }
    }
}

/// Fixed-layout record stored in a program-owned account
pub trait AccountRecord: Copy {
    const KIND: AccountKind;
    const LEN: usize = core::mem::size_of::<Self>();
}

/// Liquidity pool, one per currency code
/// PDA: ["pool", currency]
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pool {
    pub discriminator: u8,
    pub bump: u8,
    pub status: u8,
    /// 3-byte ASCII currency code
    pub currency: [u8; 3],
    pub _padding: [u8; 2],
    /// Sum of every contribution's amount
    pub total_liquidity: u64,
    /// Reference exchange rate supplied at creation
    pub rate: u64,
    pub authority: Address,
}

impl AccountRecord for Pool {
    const KIND: AccountKind = AccountKind::Pool;
}

impl Pool {
    pub fn new(authority: Address, currency: [u8; 3], rate: u64, bump: u8) -> Self {
        Self {
            discriminator: AccountKind::Pool as u8,
            bump,
            status: PoolStatus::Active as u8,
            currency,
            _padding: [0; 2],
            total_liquidity: 0,
            rate,
            authority,
        }
    }

    pub fn status(&self) -> Result<PoolStatus, EscrowError> {
        PoolStatus::try_from(self.status)
    }

    pub fn require_active(&self) -> Result<(), EscrowError> {
        match self.status()? {
            PoolStatus::Active => Ok(()),
            _ => Err(EscrowError::InvalidState),
        }
    }

    pub fn credit(&mut self, amount: u64) -> Result<(), EscrowError> {
        self.total_liquidity = add_u64(self.total_liquidity, amount)?;
        Ok(())
    }

    pub fn debit(&mut self, amount: u64) -> Result<(), EscrowError> {
        self.total_liquidity = sub_u64(self.total_liquidity, amount)?;
        Ok(())
    }
}

/// Maker identity, one per authority
/// PDA: ["maker", authority]
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Maker {
    pub discriminator: u8,
    pub bump: u8,
    /// 0 = unverified, 1 = verified; never reset
    pub verified: u8,
    pub _padding: [u8; 5],
    pub authority: Address,
}

impl AccountRecord for Maker {
    const KIND: AccountKind = AccountKind::Maker;
}

impl Maker {
    pub fn new(authority: Address, bump: u8) -> Self {
        Self {
            discriminator: AccountKind::Maker as u8,
            bump,
            verified: 0,
            _padding: [0; 5],
            authority,
        }
    }

    pub fn is_verified(&self) -> bool {
        self.verified != 0
    }

    /// Idempotent: verifying twice is a no-op
    pub fn verify(&mut self) {
        self.verified = 1;
    }
}

/// Per (pool, maker) running deposit total
/// PDA: ["contribution", pool, maker]
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contribution {
    pub discriminator: u8,
    pub bump: u8,
    pub _padding: [u8; 6],
    pub amount: u64,
    pub pool: Address,
    pub maker: Address,
}

impl AccountRecord for Contribution {
    const KIND: AccountKind = AccountKind::Contribution;
}

impl Contribution {
    pub fn new(pool: Address, maker: Address, bump: u8) -> Self {
        Self {
            discriminator: AccountKind::Contribution as u8,
            bump,
            _padding: [0; 6],
            amount: 0,
            pool,
            maker,
        }
    }

    pub fn credit(&mut self, amount: u64) -> Result<(), EscrowError> {
        self.amount = add_u64(self.amount, amount)?;
        Ok(())
    }

    pub fn debit(&mut self, amount: u64) -> Result<(), EscrowError> {
        self.amount = sub_u64(self.amount, amount)?;
        Ok(())
    }
}

/// Escrow offer or ledger audit record
///
/// Escrow PDA: ["transaction", taker, nonce_le]
/// Ledger PDA: ["transaction", pool, maker]
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transaction {
    pub discriminator: u8,
    pub bump: u8,
    pub flow: u8,
    pub transaction_type: u8,
    pub status: u8,
    pub _padding: [u8; 3],
    pub amount: u64,
    pub exchange_rate: u64,
    pub nonce: u64,
    /// Depositing party (escrow flow)
    pub taker: Address,
    /// Accepting authority (escrow flow, zero until acceptance) or maker PDA (ledger flow)
    pub maker: Address,
    /// Escrowed token mint (escrow flow)
    pub mint: Address,
    /// Linked pool (ledger flow)
    pub pool: Address,
}

impl AccountRecord for Transaction {
    const KIND: AccountKind = AccountKind::Transaction;
}

impl Transaction {
    /// Funded escrow offer, created `Pending`
    pub fn new_offer(
        taker: Address,
        mint: Address,
        amount: u64,
        exchange_rate: u64,
        nonce: u64,
        bump: u8,
    ) -> Result<Self, EscrowError> {
        if amount == 0 {
            return Err(EscrowError::InvalidAmount);
        }
        Ok(Self {
            discriminator: AccountKind::Transaction as u8,
            bump,
            flow: TransactionFlow::Escrow as u8,
            transaction_type: TransactionType::Deposit as u8,
            status: TransactionStatus::Pending as u8,
            _padding: [0; 3],
            amount,
            exchange_rate,
            nonce,
            taker,
            maker: ZERO,
            mint,
            pool: ZERO,
        })
    }

    /// Ledger placeholder linking a pool and a maker
    pub fn new_ledger(pool: Address, maker: Address, bump: u8) -> Self {
        Self {
            discriminator: AccountKind::Transaction as u8,
            bump,
            flow: TransactionFlow::Ledger as u8,
            transaction_type: TransactionType::Deposit as u8,
            status: TransactionStatus::Pending as u8,
            _padding: [0; 3],
            amount: 0,
            exchange_rate: 0,
            nonce: 0,
            taker: ZERO,
            maker,
            mint: ZERO,
            pool,
        }
    }

    pub fn flow(&self) -> Result<TransactionFlow, EscrowError> {
        TransactionFlow::try_from(self.flow)
    }

    pub fn transaction_type(&self) -> Result<TransactionType, EscrowError> {
        TransactionType::try_from(self.transaction_type)
    }

    pub fn status(&self) -> Result<TransactionStatus, EscrowError> {
        TransactionStatus::try_from(self.status)
    }

    /// Accepting maker, once the offer has been settled
    pub fn maker(&self) -> Option<Address> {
        if self.maker == ZERO {
            None
        } else {
            Some(self.maker)
        }
    }

    /// Pending escrow offer: the only state that holds vault funds
    pub fn is_open_offer(&self) -> bool {
        self.flow == TransactionFlow::Escrow as u8 && self.status == TransactionStatus::Pending as u8
    }

    fn require_open_offer(&self) -> Result<(), EscrowError> {
        if self.flow()? != TransactionFlow::Escrow {
            return Err(EscrowError::InvalidState);
        }
        if self.status()? != TransactionStatus::Pending {
            return Err(EscrowError::InvalidState);
        }
        Ok(())
    }

    /// The offer-side preconditions of `accept`: Pending, and not the taker
    pub fn check_acceptable(&self, caller: &Address) -> Result<(), EscrowError> {
        self.require_open_offer()?;
        if *caller == self.taker {
            return Err(EscrowError::SelfTrade);
        }
        Ok(())
    }

    /// Pending -> Completed. Checks run in order: state, self-trade, verification.
    pub fn accept(&mut self, caller: &Address, maker_verified: bool) -> Result<(), EscrowError> {
        self.check_acceptable(caller)?;
        if !maker_verified {
            return Err(EscrowError::Unverified);
        }
        self.status = TransactionStatus::Completed as u8;
        self.transaction_type = TransactionType::Trade as u8;
        self.maker = *caller;
        Ok(())
    }

    /// Pending -> Cancelled, taker only
    pub fn cancel(&mut self, caller: &Address) -> Result<(), EscrowError> {
        self.require_open_offer()?;
        if *caller != self.taker {
            return Err(EscrowError::Unauthorized);
        }
        self.status = TransactionStatus::Cancelled as u8;
        Ok(())
    }

    /// Stamp a ledger record with the latest deposit or withdrawal
    pub fn record_ledger(&mut self, kind: TransactionType, amount: u64) -> Result<(), EscrowError> {
        if self.flow()? != TransactionFlow::Ledger {
            return Err(EscrowError::InvalidAccount);
        }
        self.transaction_type = kind as u8;
        self.amount = amount;
        self.status = TransactionStatus::Completed as u8;
        Ok(())
    }
}

/// Program-wide configuration
/// PDA: ["program_authority"]
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramConfig {
    pub discriminator: u8,
    pub bump: u8,
    pub _padding: [u8; 6],
    pub admin: Address,
    /// Privileged verifier; zero keeps maker self-attestation
    pub verifier: Address,
}

impl AccountRecord for ProgramConfig {
    const KIND: AccountKind = AccountKind::Config;
}

impl ProgramConfig {
    pub fn new(admin: Address, verifier: Address, bump: u8) -> Self {
        Self {
            discriminator: AccountKind::Config as u8,
            bump,
            _padding: [0; 6],
            admin,
            verifier,
        }
    }

    pub fn verifier(&self) -> Option<Address> {
        if self.verifier == ZERO {
            None
        } else {
            Some(self.verifier)
        }
    }

    /// Replace the verifier. Admin only; zero restores self-attestation.
    pub fn set_verifier(&mut self, signer: &Address, verifier: Address) -> Result<(), EscrowError> {
        check_admin(&self.admin, signer)?;
        self.verifier = verifier;
        Ok(())
    }
}

/// Config changes are reserved to the deployment's admin
pub fn check_admin(admin: &Address, signer: &Address) -> Result<(), EscrowError> {
    if *admin == ZERO || signer != admin {
        return Err(EscrowError::Unauthorized);
    }
    Ok(())
}

/// Who may flip `maker.verified`: the configured verifier when one is set,
/// otherwise the maker's own authority.
pub fn check_verifier(
    config: Option<&ProgramConfig>,
    maker: &Maker,
    signer: &Address,
) -> Result<(), EscrowError> {
    let expected = config
        .and_then(ProgramConfig::verifier)
        .unwrap_or(maker.authority);
    if *signer != expected {
        return Err(EscrowError::Unauthorized);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::mem::size_of;

    #[test]
    fn test_record_sizes() {
        assert_eq!(size_of::<Pool>(), 56);
        assert_eq!(size_of::<Maker>(), 40);
        assert_eq!(size_of::<Contribution>(), 80);
        assert_eq!(size_of::<Transaction>(), 160);
        assert_eq!(size_of::<ProgramConfig>(), 72);
        assert_eq!(Transaction::LEN, 160);
    }

    #[test]
    fn test_offer_requires_amount() {
        assert_eq!(
            Transaction::new_offer([1; 32], [2; 32], 0, 1, 1, 255),
            Err(EscrowError::InvalidAmount)
        );
    }

    #[test]
    fn test_accept_then_cancel_fails() {
        let taker = [1u8; 32];
        let maker = [2u8; 32];
        let mut tx = Transaction::new_offer(taker, [3; 32], 100, 1, 7, 254).unwrap();

        tx.accept(&maker, true).unwrap();
        assert_eq!(tx.status().unwrap(), TransactionStatus::Completed);
        assert_eq!(tx.transaction_type().unwrap(), TransactionType::Trade);
        assert_eq!(tx.maker(), Some(maker));

        assert_eq!(tx.cancel(&taker), Err(EscrowError::InvalidState));
        assert_eq!(tx.accept(&maker, true), Err(EscrowError::InvalidState));
    }

    #[test]
    fn test_self_trade_checked_before_verification() {
        let taker = [1u8; 32];
        let mut tx = Transaction::new_offer(taker, [3; 32], 100, 1, 7, 254).unwrap();
        assert_eq!(tx.accept(&taker, false), Err(EscrowError::SelfTrade));
        assert_eq!(tx.status().unwrap(), TransactionStatus::Pending);
        assert_eq!(tx.maker(), None);
    }

    #[test]
    fn test_unverified_maker_rejected() {
        let mut tx = Transaction::new_offer([1; 32], [3; 32], 100, 1, 7, 254).unwrap();
        assert_eq!(tx.accept(&[2; 32], false), Err(EscrowError::Unverified));
        assert!(tx.is_open_offer());
    }

    #[test]
    fn test_cancel_by_stranger() {
        let mut tx = Transaction::new_offer([1; 32], [3; 32], 100, 1, 7, 254).unwrap();
        assert_eq!(tx.cancel(&[2; 32]), Err(EscrowError::Unauthorized));
        tx.cancel(&[1; 32]).unwrap();
        assert_eq!(tx.status().unwrap(), TransactionStatus::Cancelled);
        assert!(!tx.is_open_offer());
    }

    #[test]
    fn test_ledger_record_cannot_settle() {
        let mut tx = Transaction::new_ledger([4; 32], [5; 32], 250);
        assert_eq!(tx.accept(&[2; 32], true), Err(EscrowError::InvalidState));
        assert_eq!(tx.cancel(&[0; 32]), Err(EscrowError::InvalidState));

        tx.record_ledger(TransactionType::Deposit, 500).unwrap();
        assert_eq!(tx.amount, 500);
        assert_eq!(tx.status().unwrap(), TransactionStatus::Completed);
    }

    #[test]
    fn test_offer_rejects_ledger_stamp() {
        let mut tx = Transaction::new_offer([1; 32], [3; 32], 100, 1, 7, 254).unwrap();
        assert_eq!(
            tx.record_ledger(TransactionType::Deposit, 1),
            Err(EscrowError::InvalidAccount)
        );
    }

    #[test]
    fn test_maker_verify_idempotent() {
        let mut maker = Maker::new([1; 32], 255);
        assert!(!maker.is_verified());
        maker.verify();
        maker.verify();
        assert!(maker.is_verified());
    }

    #[test]
    fn test_check_verifier() {
        let maker = Maker::new([1; 32], 255);
        assert!(check_verifier(None, &maker, &[1; 32]).is_ok());
        assert_eq!(check_verifier(None, &maker, &[2; 32]), Err(EscrowError::Unauthorized));

        let config = ProgramConfig::new([9; 32], [2; 32], 254);
        assert!(check_verifier(Some(&config), &maker, &[2; 32]).is_ok());
        assert_eq!(
            check_verifier(Some(&config), &maker, &[1; 32]),
            Err(EscrowError::Unauthorized)
        );

        let open = ProgramConfig::new([9; 32], [0; 32], 254);
        assert!(check_verifier(Some(&open), &maker, &[1; 32]).is_ok());
    }

    #[test]
    fn test_only_admin_sets_verifier() {
        let mut config = ProgramConfig::new([9; 32], [2; 32], 254);
        assert_eq!(config.set_verifier(&[2; 32], [3; 32]), Err(EscrowError::Unauthorized));
        assert_eq!(config.verifier(), Some([2; 32]));

        config.set_verifier(&[9; 32], [0; 32]).unwrap();
        assert_eq!(config.verifier(), None);
    }

    #[test]
    fn test_zero_admin_authorizes_nobody() {
        assert_eq!(check_admin(&[0; 32], &[0; 32]), Err(EscrowError::Unauthorized));
        assert!(check_admin(&[9; 32], &[9; 32]).is_ok());
    }

    #[test]
    fn test_pool_credit_overflow() {
        let mut pool = Pool::new([1; 32], *b"USD", 1_000_000, 255);
        pool.credit(u64::MAX).unwrap();
        assert_eq!(pool.credit(1), Err(EscrowError::Overflow));
        assert_eq!(pool.total_liquidity, u64::MAX);
    }
}
