//! CreateContribution instruction - open a (pool, maker) running total

use crate::pda::{derive_contribution_pda, derive_maker_pda};
use crate::system::create_pda_account;
use escrow_common::*;
use escrow_model::{seeds::CONTRIBUTION_SEED, AccountRecord, Contribution, Maker, Pool};
use pinocchio::{account_info::AccountInfo, msg, pubkey::Pubkey, ProgramResult};

/// Check that `maker_account` is the signer's maker record and `pool_account` a pool
///
/// Shared by CreateContribution and CreateTransaction.
pub fn check_pool_and_maker(
    program_id: &Pubkey,
    pool_account: &AccountInfo,
    maker_account: &AccountInfo,
    authority: &AccountInfo,
) -> Result<(), EscrowError> {
    let (expected_maker, _) = derive_maker_pda(authority.key(), program_id)?;
    if maker_account.key() != &expected_maker {
        msg!("Error: Maker account is not the signer's maker PDA");
        return Err(EscrowError::InvalidAccount);
    }
    load::<Maker>(maker_account, program_id)?;
    load::<Pool>(pool_account, program_id)?;
    Ok(())
}

/// Process create contribution instruction
///
/// Creates a zero contribution at ["contribution", pool, maker].
pub fn process_create_contribution(
    program_id: &Pubkey,
    contribution_account: &AccountInfo,
    pool_account: &AccountInfo,
    maker_account: &AccountInfo,
    authority: &AccountInfo,
) -> ProgramResult {
    check_pool_and_maker(program_id, pool_account, maker_account, authority)?;

    let (expected_pda, bump) =
        derive_contribution_pda(pool_account.key(), maker_account.key(), program_id)?;
    if contribution_account.key() != &expected_pda {
        msg!("Error: Contribution account is not the correct PDA");
        return Err(EscrowError::InvalidAccount.into());
    }

    create_pda_account(
        authority,
        contribution_account,
        program_id,
        Contribution::LEN,
        &[CONTRIBUTION_SEED, pool_account.key(), maker_account.key()],
        bump,
    )?;
    store(
        contribution_account,
        &Contribution::new(*pool_account.key(), *maker_account.key(), bump),
    )?;

    msg!("Contribution created successfully");
    Ok(())
}
