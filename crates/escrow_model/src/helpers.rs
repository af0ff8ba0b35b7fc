//! Invariant checking helpers

use std::collections::BTreeSet;

use crate::address::Address;
use crate::host::{Record, State};
use crate::math::sum_u128;
use crate::tokens::TokenBank;

/// Ledger: every pool's total_liquidity equals the sum of its contributions
pub fn ledger_balanced(s: &State) -> bool {
    s.records().all(|(address, record)| match record {
        Record::Pool(pool) => pool.total_liquidity as u128 == contributed(s, address),
        _ => true,
    })
}

/// Sum of contribution amounts referencing `pool`
pub fn contributed(s: &State, pool: &Address) -> u128 {
    sum_u128(s.records().filter_map(|(_, record)| match record {
        Record::Contribution(c) if c.pool == *pool => Some(c.amount),
        _ => None,
    }))
}

/// Sum of pending escrow offers denominated in `mint`
pub fn escrowed(s: &State, mint: &Address) -> u128 {
    sum_u128(s.records().filter_map(|(_, record)| match record {
        Record::Transaction(tx) if tx.is_open_offer() && tx.mint == *mint => Some(tx.amount),
        _ => None,
    }))
}

/// Vault: for every mint with open offers, the vault holds at least their sum
pub fn vault_collateralized(s: &State) -> bool {
    let mints: BTreeSet<Address> = s
        .records()
        .filter_map(|(_, record)| match record {
            Record::Transaction(tx) if tx.is_open_offer() => Some(tx.mint),
            _ => None,
        })
        .collect();

    mints
        .iter()
        .all(|mint| s.tokens.balance(&s.vault(mint)) as u128 >= escrowed(s, mint))
}

/// Conservation: total tokens of `mint` across all holders
pub fn token_supply(s: &State, mint: &Address) -> u128 {
    s.tokens.supply(mint)
}
