//! PDA derivation for escrow accounts
//!
//! On-chain this goes through the runtime's `find_program_address` syscall;
//! host builds fall back to the pure derivation in `escrow_model`, which
//! produces the same addresses.

use escrow_common::EscrowError;
use escrow_model::seeds::{
    CONTRIBUTION_SEED, MAKER_SEED, POOL_SEED, PROGRAM_AUTHORITY_SEED, TRANSACTION_SEED,
    VAULT_AUTHORITY_SEED,
};
use pinocchio::pubkey::Pubkey;

/// Associated token account program
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey =
    pinocchio_pubkey::pubkey!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");

#[cfg(target_os = "solana")]
fn find(seeds: &[&[u8]], program_id: &Pubkey) -> Result<(Pubkey, u8), EscrowError> {
    Ok(pinocchio::pubkey::find_program_address(seeds, program_id))
}

#[cfg(not(target_os = "solana"))]
fn find(seeds: &[&[u8]], program_id: &Pubkey) -> Result<(Pubkey, u8), EscrowError> {
    let (tag, rest) = seeds.split_first().ok_or(EscrowError::InvalidSeeds)?;
    escrow_model::derive_address(tag, rest, program_id)
}

/// Derive pool PDA: ["pool", currency]
pub fn derive_pool_pda(currency: &[u8; 3], program_id: &Pubkey) -> Result<(Pubkey, u8), EscrowError> {
    find(&[POOL_SEED, currency], program_id)
}

/// Derive maker PDA: ["maker", authority]
pub fn derive_maker_pda(authority: &Pubkey, program_id: &Pubkey) -> Result<(Pubkey, u8), EscrowError> {
    find(&[MAKER_SEED, authority], program_id)
}

/// Derive contribution PDA: ["contribution", pool, maker]
pub fn derive_contribution_pda(
    pool: &Pubkey,
    maker: &Pubkey,
    program_id: &Pubkey,
) -> Result<(Pubkey, u8), EscrowError> {
    find(&[CONTRIBUTION_SEED, pool, maker], program_id)
}

/// Derive escrow offer PDA: ["transaction", taker, nonce_le]
pub fn derive_offer_pda(
    taker: &Pubkey,
    nonce: u64,
    program_id: &Pubkey,
) -> Result<(Pubkey, u8), EscrowError> {
    find(&[TRANSACTION_SEED, taker, &nonce.to_le_bytes()], program_id)
}

/// Derive ledger transaction PDA: ["transaction", pool, maker]
pub fn derive_ledger_transaction_pda(
    pool: &Pubkey,
    maker: &Pubkey,
    program_id: &Pubkey,
) -> Result<(Pubkey, u8), EscrowError> {
    find(&[TRANSACTION_SEED, pool, maker], program_id)
}

/// Derive vault authority PDA: ["program_token_account"]
pub fn derive_vault_authority_pda(program_id: &Pubkey) -> Result<(Pubkey, u8), EscrowError> {
    find(&[VAULT_AUTHORITY_SEED], program_id)
}

/// Derive the vault for `mint`: the associated token account of the vault
/// authority, [authority, token_program, mint] under the ATA program
pub fn derive_vault_address(vault_authority: &Pubkey, mint: &Pubkey) -> Result<Pubkey, EscrowError> {
    let (vault, _) = find(
        &[vault_authority, &pinocchio_token::ID, mint],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )?;
    Ok(vault)
}

/// Derive program config PDA: ["program_authority"]
pub fn derive_config_pda(program_id: &Pubkey) -> Result<(Pubkey, u8), EscrowError> {
    find(&[PROGRAM_AUTHORITY_SEED], program_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use escrow_model::seeds;

    const PROGRAM: Pubkey = [0x4b; 32];

    #[test]
    fn test_host_derivation_matches_model() {
        let authority = [5u8; 32];
        assert_eq!(
            derive_maker_pda(&authority, &PROGRAM).unwrap(),
            seeds::maker_address(&authority, &PROGRAM).unwrap()
        );
        assert_eq!(
            derive_pool_pda(b"USD", &PROGRAM).unwrap(),
            seeds::pool_address(b"USD", &PROGRAM).unwrap()
        );
        assert_eq!(
            derive_offer_pda(&authority, 42, &PROGRAM).unwrap(),
            seeds::offer_address(&authority, 42, &PROGRAM).unwrap()
        );
        assert_eq!(
            derive_vault_authority_pda(&PROGRAM).unwrap(),
            seeds::vault_authority_address(&PROGRAM).unwrap()
        );
    }

    #[test]
    fn test_vault_is_one_address_per_mint() {
        let (authority, _) = derive_vault_authority_pda(&PROGRAM).unwrap();
        let usdc = [1u8; 32];
        let eurc = [2u8; 32];

        let vault = derive_vault_address(&authority, &usdc).unwrap();
        assert_eq!(vault, derive_vault_address(&authority, &usdc).unwrap());
        assert_ne!(vault, derive_vault_address(&authority, &eurc).unwrap());

        let (expected, _) = escrow_model::derive_address(
            &authority,
            &[&pinocchio_token::ID, &usdc],
            &ASSOCIATED_TOKEN_PROGRAM_ID,
        )
        .unwrap();
        assert_eq!(vault, expected);
    }

    #[test]
    fn test_offer_and_ledger_records_do_not_collide() {
        let key = [8u8; 32];
        let (offer, _) = derive_offer_pda(&key, 0, &PROGRAM).unwrap();
        let (ledger, _) = derive_ledger_transaction_pda(&key, &key, &PROGRAM).unwrap();
        assert_ne!(offer, ledger);
    }
}
