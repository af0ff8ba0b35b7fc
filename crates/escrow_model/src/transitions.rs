//! State transition functions
//!
//! Each operation reads `&State` and returns the next state. The input is
//! never touched, so a failed precondition or transfer leaves nothing behind.

use crate::address::Address;
use crate::error::EscrowError;
use crate::host::{Record, Signer, State};
use crate::seeds::*;
use crate::state::*;
use crate::tokens::{TokenAccountId, TokenBank};

/// Record the program config and its verifier. A zero verifier keeps self-attestation.
pub fn initialize_config(s: &State, admin: &Signer, verifier: Address) -> Result<State, EscrowError> {
    check_admin(&s.admin, admin.key())?;
    let mut next = s.clone();
    let (address, bump) = config_address(&s.program_id)?;
    next.create(address, Record::Config(ProgramConfig::new(*admin.key(), verifier, bump)))?;
    Ok(next)
}

/// Replace the configured verifier; admin only
pub fn set_verifier(s: &State, admin: &Signer, verifier: Address) -> Result<State, EscrowError> {
    let mut next = s.clone();
    let (address, _) = config_address(&s.program_id)?;
    next.config_at_mut(&address)?.set_verifier(admin.key(), verifier)?;
    Ok(next)
}

/// Create the pool for `currency` with zero liquidity
pub fn create_pool(
    s: &State,
    authority: &Signer,
    currency: [u8; 3],
    rate: u64,
) -> Result<State, EscrowError> {
    let mut next = s.clone();
    let (address, bump) = pool_address(&currency, &s.program_id)?;
    next.create(address, Record::Pool(Pool::new(*authority.key(), currency, rate, bump)))?;
    Ok(next)
}

/// Create the signer's maker record, unverified
pub fn create_maker(s: &State, authority: &Signer) -> Result<State, EscrowError> {
    let mut next = s.clone();
    let (address, bump) = maker_address(authority.key(), &s.program_id)?;
    next.create(address, Record::Maker(Maker::new(*authority.key(), bump)))?;
    Ok(next)
}

/// Open a zero contribution for the signer's maker in `pool`
pub fn create_contribution(
    s: &State,
    authority: &Signer,
    pool: &Address,
) -> Result<State, EscrowError> {
    let mut next = s.clone();
    let (maker, _) = maker_address(authority.key(), &s.program_id)?;
    next.maker(&maker)?;
    next.pool(pool)?;

    let (address, bump) = contribution_address(pool, &maker, &s.program_id)?;
    next.create(address, Record::Contribution(Contribution::new(*pool, maker, bump)))?;
    Ok(next)
}

/// Create the ledger audit transaction for (pool, signer's maker)
pub fn create_transaction(
    s: &State,
    authority: &Signer,
    pool: &Address,
) -> Result<State, EscrowError> {
    let mut next = s.clone();
    let (maker, _) = maker_address(authority.key(), &s.program_id)?;
    next.maker(&maker)?;
    next.pool(pool)?;

    let (address, bump) = ledger_transaction_address(pool, &maker, &s.program_id)?;
    next.create(address, Record::Transaction(Transaction::new_ledger(*pool, maker, bump)))?;
    Ok(next)
}

/// Mark a maker verified. Idempotent.
pub fn verify_maker(s: &State, signer: &Signer, maker: &Address) -> Result<State, EscrowError> {
    let mut next = s.clone();
    let (config, _) = config_address(&s.program_id)?;
    let config = next.config_at(&config).ok().copied();

    let record = next.maker_mut(maker)?;
    check_verifier(config.as_ref(), record, signer.key())?;
    record.verify();
    Ok(next)
}

/// Ledger deposit: contribution, pool total and audit record move together
pub fn deposit(s: &State, authority: &Signer, pool: &Address, amount: u64) -> Result<State, EscrowError> {
    apply_ledger(s, authority, pool, amount, TransactionType::Deposit)
}

/// Ledger withdrawal, bounded by the maker's contribution
pub fn withdraw(s: &State, authority: &Signer, pool: &Address, amount: u64) -> Result<State, EscrowError> {
    apply_ledger(s, authority, pool, amount, TransactionType::Withdrawal)
}

fn apply_ledger(
    s: &State,
    authority: &Signer,
    pool: &Address,
    amount: u64,
    kind: TransactionType,
) -> Result<State, EscrowError> {
    if amount == 0 {
        return Err(EscrowError::InvalidAmount);
    }

    let mut next = s.clone();
    let (maker, _) = maker_address(authority.key(), &s.program_id)?;
    if !next.maker(&maker)?.is_verified() {
        return Err(EscrowError::Unverified);
    }

    let (contribution, _) = contribution_address(pool, &maker, &s.program_id)?;
    let (ledger_tx, _) = ledger_transaction_address(pool, &maker, &s.program_id)?;

    next.pool(pool)?.require_active()?;
    match kind {
        TransactionType::Withdrawal => {
            next.contribution_mut(&contribution)?.debit(amount)?;
            next.pool_mut(pool)?.debit(amount)?;
        }
        _ => {
            next.contribution_mut(&contribution)?.credit(amount)?;
            next.pool_mut(pool)?.credit(amount)?;
        }
    }
    next.transaction_mut(&ledger_tx)?.record_ledger(kind, amount)?;
    Ok(next)
}

/// Escrow deposit: move `amount` of `mint` from the taker into the vault and
/// open a pending offer at ["transaction", taker, nonce].
pub fn deposit_funds(
    s: &State,
    taker: &Signer,
    mint: &Address,
    amount: u64,
    exchange_rate: u64,
    nonce: u64,
) -> Result<State, EscrowError> {
    if amount == 0 {
        return Err(EscrowError::InvalidAmount);
    }

    let mut next = s.clone();
    let (offer, bump) = offer_address(taker.key(), nonce, &s.program_id)?;
    if next.contains(&offer) {
        return Err(EscrowError::AlreadyExists);
    }

    let tx = Transaction::new_offer(*taker.key(), *mint, amount, exchange_rate, nonce, bump)?;
    let vault = next.vault(mint);
    next.tokens
        .transfer(&TokenAccountId::new(*taker.key(), *mint), &vault, amount)?;
    next.create(offer, Record::Transaction(tx))?;
    Ok(next)
}

/// Settle a pending offer to a verified maker: vault pays the maker
pub fn accept_offer(s: &State, maker: &Signer, offer: &Address) -> Result<State, EscrowError> {
    let mut next = s.clone();
    let mut tx = *next.transaction(offer)?;

    let (maker_record, _) = maker_address(maker.key(), &s.program_id)?;
    let verified = matches!(next.maker(&maker_record), Ok(m) if m.is_verified());
    tx.accept(maker.key(), verified)?;

    let vault = next.vault(&tx.mint);
    next.tokens
        .transfer(&vault, &TokenAccountId::new(*maker.key(), tx.mint), tx.amount)?;
    *next.transaction_mut(offer)? = tx;
    Ok(next)
}

/// Refund a pending offer to its taker
pub fn cancel_offer(s: &State, taker: &Signer, offer: &Address) -> Result<State, EscrowError> {
    let mut next = s.clone();
    let mut tx = *next.transaction(offer)?;
    tx.cancel(taker.key())?;

    let vault = next.vault(&tx.mint);
    next.tokens
        .transfer(&vault, &TokenAccountId::new(tx.taker, tx.mint), tx.amount)?;
    *next.transaction_mut(offer)? = tx;
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::*;

    const PROGRAM: Address = [42u8; 32];
    const MINT: Address = [77u8; 32];

    fn setup() -> (State, Signer, Signer) {
        let taker = Signer::new([1; 32]);
        let maker = Signer::new([2; 32]);
        let mut s = State::new(PROGRAM).unwrap();
        s.tokens
            .mint_to(&TokenAccountId::new(*taker.key(), MINT), 100_000_000)
            .unwrap();
        let s = create_maker(&s, &maker).unwrap();
        let (maker_addr, _) = maker_address(maker.key(), &PROGRAM).unwrap();
        let s = verify_maker(&s, &maker, &maker_addr).unwrap();
        (s, taker, maker)
    }

    #[test]
    fn test_deposit_funds_opens_pending_offer() {
        let (s, taker, _) = setup();
        let next = deposit_funds(&s, &taker, &MINT, 10_000_000, 1_000_000, 5).unwrap();

        let (offer, _) = offer_address(taker.key(), 5, &PROGRAM).unwrap();
        let tx = next.transaction(&offer).unwrap();
        assert_eq!(tx.status().unwrap(), TransactionStatus::Pending);
        assert_eq!(tx.transaction_type().unwrap(), TransactionType::Deposit);
        assert_eq!(tx.amount, 10_000_000);
        assert_eq!(tx.exchange_rate, 1_000_000);
        assert_eq!(next.tokens.balance(&next.vault(&MINT)), 10_000_000);
        assert!(vault_collateralized(&next));
    }

    #[test]
    fn test_duplicate_nonce_rejected() {
        let (s, taker, _) = setup();
        let s = deposit_funds(&s, &taker, &MINT, 10, 1, 5).unwrap();
        assert_eq!(
            deposit_funds(&s, &taker, &MINT, 10, 1, 5).unwrap_err(),
            EscrowError::AlreadyExists
        );
    }

    #[test]
    fn test_failed_transfer_creates_nothing() {
        let (s, taker, _) = setup();
        let err = deposit_funds(&s, &taker, &MINT, 100_000_001, 1, 5).unwrap_err();
        assert_eq!(err, EscrowError::InsufficientFunds);

        let (offer, _) = offer_address(taker.key(), 5, &PROGRAM).unwrap();
        assert!(!s.contains(&offer));
    }

    #[test]
    fn test_accept_requires_verified_maker() {
        let (s, taker, _) = setup();
        let stranger = Signer::new([3; 32]);
        let s = deposit_funds(&s, &taker, &MINT, 10, 1, 5).unwrap();
        let (offer, _) = offer_address(taker.key(), 5, &PROGRAM).unwrap();

        assert_eq!(accept_offer(&s, &stranger, &offer).unwrap_err(), EscrowError::Unverified);

        let s = create_maker(&s, &stranger).unwrap();
        assert_eq!(accept_offer(&s, &stranger, &offer).unwrap_err(), EscrowError::Unverified);
    }

    #[test]
    fn test_cancel_by_non_taker() {
        let (s, taker, maker) = setup();
        let s = deposit_funds(&s, &taker, &MINT, 10, 1, 5).unwrap();
        let (offer, _) = offer_address(taker.key(), 5, &PROGRAM).unwrap();
        assert_eq!(cancel_offer(&s, &maker, &offer).unwrap_err(), EscrowError::Unauthorized);
    }

    #[test]
    fn test_accept_missing_offer() {
        let (s, _, maker) = setup();
        assert_eq!(accept_offer(&s, &maker, &[5; 32]).unwrap_err(), EscrowError::NotFound);
    }

    #[test]
    fn test_contribution_requires_maker_and_pool() {
        let s = State::new(PROGRAM).unwrap();
        let authority = Signer::new([8; 32]);
        let (pool, _) = pool_address(b"USD", &PROGRAM).unwrap();

        assert_eq!(create_contribution(&s, &authority, &pool).unwrap_err(), EscrowError::NotFound);
        let s = create_maker(&s, &authority).unwrap();
        assert_eq!(create_contribution(&s, &authority, &pool).unwrap_err(), EscrowError::NotFound);
        let s = create_pool(&s, &authority, *b"USD", 1_000_000).unwrap();
        assert!(create_contribution(&s, &authority, &pool).is_ok());
    }

    #[test]
    fn test_create_pool_twice() {
        let s = State::new(PROGRAM).unwrap();
        let authority = Signer::new([8; 32]);
        let s = create_pool(&s, &authority, *b"USD", 1).unwrap();
        assert_eq!(
            create_pool(&s, &authority, *b"USD", 2).unwrap_err(),
            EscrowError::AlreadyExists
        );

        let (pool, _) = pool_address(b"USD", &PROGRAM).unwrap();
        assert_eq!(s.pool(&pool).unwrap().total_liquidity, 0);
        assert_eq!(s.pool(&pool).unwrap().rate, 1);
    }

    #[test]
    fn test_configured_verifier_replaces_self_attestation() {
        let admin = Signer::new([9; 32]);
        let verifier = Signer::new([10; 32]);
        let maker = Signer::new([11; 32]);
        let s = State::new(PROGRAM).unwrap().with_admin(*admin.key());

        let s = initialize_config(&s, &admin, *verifier.key()).unwrap();
        let s = create_maker(&s, &maker).unwrap();
        let (maker_addr, _) = maker_address(maker.key(), &PROGRAM).unwrap();

        assert_eq!(verify_maker(&s, &maker, &maker_addr).unwrap_err(), EscrowError::Unauthorized);
        let s = verify_maker(&s, &verifier, &maker_addr).unwrap();
        assert!(s.maker(&maker_addr).unwrap().is_verified());

        assert_eq!(
            initialize_config(&s, &admin, [0; 32]).unwrap_err(),
            EscrowError::AlreadyExists
        );
    }

    #[test]
    fn test_config_is_reserved_to_admin() {
        let admin = Signer::new([9; 32]);
        let intruder = Signer::new([12; 32]);
        let s = State::new(PROGRAM).unwrap().with_admin(*admin.key());

        // First signer does not win the config
        assert_eq!(
            initialize_config(&s, &intruder, *intruder.key()).unwrap_err(),
            EscrowError::Unauthorized
        );

        let s = initialize_config(&s, &admin, [10; 32]).unwrap();
        assert_eq!(
            set_verifier(&s, &intruder, *intruder.key()).unwrap_err(),
            EscrowError::Unauthorized
        );

        let s = set_verifier(&s, &admin, [0; 32]).unwrap();
        let (config, _) = config_address(&PROGRAM).unwrap();
        assert_eq!(s.config_at(&config).unwrap().verifier(), None);
    }

    #[test]
    fn test_ledger_withdraw_bounded_by_contribution() {
        let maker = Signer::new([2; 32]);
        let s = State::new(PROGRAM).unwrap();
        let s = create_maker(&s, &maker).unwrap();
        let (maker_addr, _) = maker_address(maker.key(), &PROGRAM).unwrap();
        let s = verify_maker(&s, &maker, &maker_addr).unwrap();
        let s = create_pool(&s, &maker, *b"EUR", 1).unwrap();
        let (pool, _) = pool_address(b"EUR", &PROGRAM).unwrap();
        let s = create_contribution(&s, &maker, &pool).unwrap();
        let s = create_transaction(&s, &maker, &pool).unwrap();

        let s = deposit(&s, &maker, &pool, 500).unwrap();
        assert_eq!(withdraw(&s, &maker, &pool, 501).unwrap_err(), EscrowError::InsufficientFunds);

        let s = withdraw(&s, &maker, &pool, 200).unwrap();
        assert_eq!(s.pool(&pool).unwrap().total_liquidity, 300);
        assert!(ledger_balanced(&s));

        let (ledger_tx, _) = ledger_transaction_address(&pool, &maker_addr, &PROGRAM).unwrap();
        let tx = s.transaction(&ledger_tx).unwrap();
        assert_eq!(tx.transaction_type().unwrap(), TransactionType::Withdrawal);
        assert_eq!(tx.amount, 200);
    }

    #[test]
    fn test_ledger_deposit_requires_verification() {
        let maker = Signer::new([2; 32]);
        let s = State::new(PROGRAM).unwrap();
        let s = create_maker(&s, &maker).unwrap();
        let s = create_pool(&s, &maker, *b"EUR", 1).unwrap();
        let (pool, _) = pool_address(b"EUR", &PROGRAM).unwrap();
        let s = create_contribution(&s, &maker, &pool).unwrap();
        let s = create_transaction(&s, &maker, &pool).unwrap();

        assert_eq!(deposit(&s, &maker, &pool, 1).unwrap_err(), EscrowError::Unverified);
        assert_eq!(deposit(&s, &maker, &pool, 0).unwrap_err(), EscrowError::InvalidAmount);
    }
}
