//! CreatePool instruction - one pool per currency code

use crate::pda::derive_pool_pda;
use crate::system::create_pda_account;
use escrow_common::*;
use escrow_model::{seeds::POOL_SEED, AccountRecord, Pool};
use pinocchio::{account_info::AccountInfo, msg, pubkey::Pubkey, ProgramResult};
use pinocchio_log::log;

/// Process create pool instruction
///
/// Creates an Active pool with zero liquidity at ["pool", currency].
pub fn process_create_pool(
    program_id: &Pubkey,
    pool_account: &AccountInfo,
    authority: &AccountInfo,
    args: &CreatePoolArgs,
) -> ProgramResult {
    let (expected_pda, bump) = derive_pool_pda(&args.currency, program_id)?;
    if pool_account.key() != &expected_pda {
        msg!("Error: Pool account is not the correct PDA");
        return Err(EscrowError::InvalidAccount.into());
    }

    create_pda_account(
        authority,
        pool_account,
        program_id,
        Pool::LEN,
        &[POOL_SEED, &args.currency],
        bump,
    )?;
    store(
        pool_account,
        &Pool::new(*authority.key(), args.currency, args.rate, bump),
    )?;

    log!("Pool created, rate {}", args.rate);
    Ok(())
}
