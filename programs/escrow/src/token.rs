//! SPL token CPI helpers for the vault

use escrow_common::{validate_key, validate_writable, EscrowError};
use escrow_model::seeds::VAULT_AUTHORITY_SEED;
use pinocchio::{
    account_info::AccountInfo,
    instruction::{Seed, Signer},
    pubkey::Pubkey,
    ProgramResult,
};
use pinocchio_token::{instructions::Transfer, state::TokenAccount};

/// Validate the SPL token program account
pub fn validate_token_program(token_program: &AccountInfo) -> Result<(), EscrowError> {
    validate_key(token_program, &pinocchio_token::ID)
}

/// Check a token account's owner and mint, returning its balance
///
/// The borrow is released before returning so the account can take part in a
/// following transfer CPI.
pub fn check_token_account(
    account: &AccountInfo,
    owner: &Pubkey,
    mint: &Pubkey,
) -> Result<u64, EscrowError> {
    validate_writable(account)?;
    let token = TokenAccount::from_account_info(account).map_err(|_| EscrowError::InvalidAccount)?;
    if token.owner() != owner || token.mint() != mint {
        return Err(EscrowError::InvalidAccount);
    }
    Ok(token.amount())
}

/// Move tokens out of a user account, signed by the user
pub fn transfer_tokens(
    source: &AccountInfo,
    destination: &AccountInfo,
    authority: &AccountInfo,
    amount: u64,
) -> ProgramResult {
    Transfer {
        from: source,
        to: destination,
        authority,
        amount,
    }
    .invoke()
}

/// Move tokens out of the vault, signed by the vault authority PDA
pub fn transfer_from_vault(
    vault: &AccountInfo,
    destination: &AccountInfo,
    vault_authority: &AccountInfo,
    amount: u64,
    bump: u8,
) -> ProgramResult {
    let bump = [bump];
    let seeds = [Seed::from(VAULT_AUTHORITY_SEED), Seed::from(&bump[..])];
    let signer = Signer::from(&seeds[..]);

    Transfer {
        from: vault,
        to: destination,
        authority: vault_authority,
        amount,
    }
    .invoke_signed(&[signer])
}
