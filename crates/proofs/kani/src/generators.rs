//! Generators for arbitrary records (for Kani)
//!
//! Identities come from a three-element domain so the solver explores
//! equal/unequal key combinations without enumerating 32-byte arrays.

#[cfg(kani)]
use kani::any;
use escrow_model::{Address, Contribution, Maker, Pool, Transaction};

/// Identities available to generated records
pub const IDENTITIES: [Address; 3] = [[1u8; 32], [2u8; 32], [3u8; 32]];

pub const MINT: Address = [7u8; 32];

#[cfg(kani)]
pub fn any_identity() -> Address {
    IDENTITIES[(any::<u8>() % 3) as usize]
}

/// Pending escrow offer with a non-zero amount
#[cfg(kani)]
pub fn any_offer() -> Transaction {
    let amount: u64 = any();
    kani::assume(amount > 0);
    let offer = Transaction::new_offer(any_identity(), MINT, amount, any(), any(), any());
    kani::assume(offer.is_ok());
    match offer {
        Ok(tx) => tx,
        Err(_) => unreachable!(),
    }
}

/// Escrow offer in any status, including terminal ones
#[cfg(kani)]
pub fn any_offer_any_status() -> Transaction {
    let mut tx = any_offer();
    tx.status = any::<u8>() % 3;
    tx
}

#[cfg(kani)]
pub fn any_maker() -> Maker {
    let mut maker = Maker::new(any_identity(), any());
    if any() {
        maker.verify();
    }
    maker
}

#[cfg(kani)]
pub fn any_pool() -> Pool {
    let mut pool = Pool::new(any_identity(), *b"USD", any(), any());
    pool.total_liquidity = any();
    pool
}

#[cfg(kani)]
pub fn any_contribution() -> Contribution {
    let mut c = Contribution::new(IDENTITIES[0], IDENTITIES[1], any());
    c.amount = any();
    c
}
