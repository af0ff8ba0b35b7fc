//! Derivation seeds shared by the program, the model and clients

use crate::address::{derive_address, Address};
use crate::error::EscrowError;

pub const POOL_SEED: &[u8] = b"pool";
pub const MAKER_SEED: &[u8] = b"maker";
pub const CONTRIBUTION_SEED: &[u8] = b"contribution";
pub const TRANSACTION_SEED: &[u8] = b"transaction";
/// Owner of every vault token account; signs outbound escrow transfers
pub const VAULT_AUTHORITY_SEED: &[u8] = b"program_token_account";
/// Program configuration (configurable verifier)
pub const PROGRAM_AUTHORITY_SEED: &[u8] = b"program_authority";

/// Pool PDA: ["pool", currency]
pub fn pool_address(currency: &[u8; 3], program_id: &Address) -> Result<(Address, u8), EscrowError> {
    derive_address(POOL_SEED, &[currency], program_id)
}

/// Maker PDA: ["maker", authority]
pub fn maker_address(authority: &Address, program_id: &Address) -> Result<(Address, u8), EscrowError> {
    derive_address(MAKER_SEED, &[authority], program_id)
}

/// Contribution PDA: ["contribution", pool, maker]
pub fn contribution_address(
    pool: &Address,
    maker: &Address,
    program_id: &Address,
) -> Result<(Address, u8), EscrowError> {
    derive_address(CONTRIBUTION_SEED, &[pool, maker], program_id)
}

/// Escrow offer PDA: ["transaction", taker, nonce_le]
pub fn offer_address(
    taker: &Address,
    nonce: u64,
    program_id: &Address,
) -> Result<(Address, u8), EscrowError> {
    derive_address(TRANSACTION_SEED, &[taker, &nonce.to_le_bytes()], program_id)
}

/// Ledger transaction PDA: ["transaction", pool, maker]
pub fn ledger_transaction_address(
    pool: &Address,
    maker: &Address,
    program_id: &Address,
) -> Result<(Address, u8), EscrowError> {
    derive_address(TRANSACTION_SEED, &[pool, maker], program_id)
}

/// Vault authority PDA: ["program_token_account"]
pub fn vault_authority_address(program_id: &Address) -> Result<(Address, u8), EscrowError> {
    derive_address(VAULT_AUTHORITY_SEED, &[], program_id)
}

/// Program config PDA: ["program_authority"]
pub fn config_address(program_id: &Address) -> Result<(Address, u8), EscrowError> {
    derive_address(PROGRAM_AUTHORITY_SEED, &[], program_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROGRAM: Address = [9u8; 32];

    #[test]
    fn test_offer_nonce_is_little_endian() {
        let taker = [3u8; 32];
        let nonce = 1_741_194_802_295u64;
        let (expected, _) =
            derive_address(b"transaction", &[&taker, &nonce.to_le_bytes()], &PROGRAM).unwrap();
        assert_eq!(offer_address(&taker, nonce, &PROGRAM).unwrap().0, expected);
    }

    #[test]
    fn test_offers_from_same_taker_do_not_collide() {
        let taker = [3u8; 32];
        let (a, _) = offer_address(&taker, 1, &PROGRAM).unwrap();
        let (b, _) = offer_address(&taker, 2, &PROGRAM).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_ledger_and_offer_transactions_are_distinct() {
        let pool = [4u8; 32];
        let maker = [5u8; 32];
        let (ledger, _) = ledger_transaction_address(&pool, &maker, &PROGRAM).unwrap();
        let (offer, _) = offer_address(&pool, 0, &PROGRAM).unwrap();
        assert_ne!(ledger, offer);
    }

    #[test]
    fn test_singletons_differ() {
        let (vault, _) = vault_authority_address(&PROGRAM).unwrap();
        let (config, _) = config_address(&PROGRAM).unwrap();
        assert_ne!(vault, config);
    }
}
