//! Account address derivation on `solana-sdk` types
//!
//! Wraps `escrow_model::seeds`, so the client and the program agree on every
//! address without a network round-trip.

use escrow_model::seeds;
use solana_sdk::pubkey::Pubkey;

use crate::error::{ClientError, Result};

/// SPL Token program
pub const TOKEN_PROGRAM_ID: Pubkey = solana_sdk::pubkey!("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");

/// Associated Token Account program
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey =
    solana_sdk::pubkey!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");

fn wrap(
    derived: std::result::Result<([u8; 32], u8), escrow_model::EscrowError>,
) -> Result<(Pubkey, u8)> {
    let (address, bump) = derived.map_err(ClientError::Derivation)?;
    Ok((Pubkey::new_from_array(address), bump))
}

pub fn pool_address(currency: &[u8; 3], program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    wrap(seeds::pool_address(currency, &program_id.to_bytes()))
}

pub fn maker_address(authority: &Pubkey, program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    wrap(seeds::maker_address(&authority.to_bytes(), &program_id.to_bytes()))
}

pub fn contribution_address(pool: &Pubkey, maker: &Pubkey, program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    wrap(seeds::contribution_address(
        &pool.to_bytes(),
        &maker.to_bytes(),
        &program_id.to_bytes(),
    ))
}

pub fn offer_address(taker: &Pubkey, nonce: u64, program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    wrap(seeds::offer_address(&taker.to_bytes(), nonce, &program_id.to_bytes()))
}

pub fn ledger_transaction_address(pool: &Pubkey, maker: &Pubkey, program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    wrap(seeds::ledger_transaction_address(
        &pool.to_bytes(),
        &maker.to_bytes(),
        &program_id.to_bytes(),
    ))
}

pub fn vault_authority_address(program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    wrap(seeds::vault_authority_address(&program_id.to_bytes()))
}

pub fn config_address(program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    wrap(seeds::config_address(&program_id.to_bytes()))
}

/// Associated token account of `owner` for `mint`
pub fn associated_token_address(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[owner.as_ref(), TOKEN_PROGRAM_ID.as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
    .0
}

/// The vault for `mint`: the vault authority's associated token account
pub fn vault_address(program_id: &Pubkey, mint: &Pubkey) -> Result<Pubkey> {
    let (authority, _) = vault_authority_address(program_id)?;
    Ok(associated_token_address(&authority, mint))
}
