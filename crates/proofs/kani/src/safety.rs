//! Kani safety proofs for settlement and ledger records

use kani::{any, assume};
use escrow_model::{EscrowError, TransactionStatus, TransactionType};
use crate::{adversary::*, generators::*};

/// Settlement happens at most once: an accepted offer rejects every later
/// accept or cancel with InvalidState.
#[kani::proof]
fn accept_is_at_most_once() {
    let mut tx = any_offer();
    let caller = any_identity();
    assume(caller != tx.taker);

    kani::assert(tx.accept(&caller, true).is_ok(), "verified non-taker accepts a pending offer");
    let settled = tx;

    let again = any_identity();
    kani::assert(
        tx.accept(&again, true) == Err(EscrowError::InvalidState),
        "second accept must fail",
    );
    kani::assert(
        tx.cancel(&settled.taker) == Err(EscrowError::InvalidState),
        "cancel after accept must fail",
    );
    kani::assert(tx == settled, "failed transitions leave the record untouched");
    kani::assert(
        tx.transaction_type() == Ok(TransactionType::Trade),
        "accepted offers are trades",
    );
}

/// Completed and Cancelled are absorbing
#[kani::proof]
fn terminal_status_is_absorbing() {
    let mut tx = any_offer_any_status();
    assume(tx.status != TransactionStatus::Pending as u8);
    let before = tx;

    let caller = any_identity();
    let _ = tx.accept(&caller, any());
    let _ = tx.cancel(&caller);

    kani::assert(tx == before, "terminal records never change");
}

/// The taker can never accept their own offer, verified or not
#[kani::proof]
fn taker_never_accepts_own_offer() {
    let mut tx = any_offer();
    let taker = tx.taker;
    let before = tx;

    kani::assert(
        tx.accept(&taker, any()) == Err(EscrowError::SelfTrade),
        "self trade rejected",
    );
    kani::assert(tx == before, "record untouched");
}

/// Only verified makers settle, only the taker cancels
#[kani::proof]
fn gate_and_cancel_authority() {
    let mut tx = any_offer();
    let caller = any_identity();
    assume(caller != tx.taker);
    let before = tx;

    kani::assert(
        tx.accept(&caller, false) == Err(EscrowError::Unverified),
        "unverified maker rejected",
    );
    kani::assert(
        tx.cancel(&caller) == Err(EscrowError::Unauthorized),
        "non-taker cancel rejected",
    );
    kani::assert(tx == before, "record untouched");
}

/// Credit either adds exactly or reports Overflow and keeps the old total
#[kani::proof]
fn credit_overflow_is_reported() {
    let mut pool = any_pool();
    let before = pool.total_liquidity;
    let amount: u64 = any();

    match pool.credit(amount) {
        Ok(()) => kani::assert(
            pool.total_liquidity as u128 == before as u128 + amount as u128,
            "credit adds exactly",
        ),
        Err(e) => {
            kani::assert(e == EscrowError::Overflow, "only overflow can fail");
            kani::assert(pool.total_liquidity == before, "failed credit keeps total");
        }
    }
}

/// Withdrawals never exceed the contribution
#[kani::proof]
fn debit_bounded_by_contribution() {
    let mut c = any_contribution();
    let before = c.amount;
    let amount: u64 = any();

    let result = c.debit(amount);
    kani::assert(result.is_ok() == (amount <= before), "debit succeeds iff covered");
    if result.is_err() {
        kani::assert(c.amount == before, "failed debit keeps amount");
    }
}

/// Pool total tracks a single contribution across adversarial sequences
#[kani::proof]
#[kani::unwind(5)]
fn ledger_stays_balanced() {
    let mut pool = any_pool();
    let mut c = any_contribution();
    pool.total_liquidity = c.amount;

    let steps: u8 = any::<u8>() % 4;
    for _ in 0..steps {
        let (p, n) = adversary_step(pool, c);
        pool = p;
        c = n;
        kani::assert(pool.total_liquidity == c.amount, "pool total equals contribution");
    }
}

/// Verification never reverts
#[kani::proof]
fn verify_is_idempotent() {
    let mut maker = any_maker();
    maker.verify();
    let once = maker;
    maker.verify();
    kani::assert(maker == once && maker.is_verified(), "verify is idempotent");
}
