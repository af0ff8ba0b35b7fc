//! CreateTransaction instruction - open the (pool, maker) ledger record

use super::create_contribution::check_pool_and_maker;
use crate::pda::derive_ledger_transaction_pda;
use crate::system::create_pda_account;
use escrow_common::*;
use escrow_model::{seeds::TRANSACTION_SEED, AccountRecord, Transaction};
use pinocchio::{account_info::AccountInfo, msg, pubkey::Pubkey, ProgramResult};

/// Process create transaction instruction
///
/// Creates a Pending ledger transaction at ["transaction", pool, maker].
/// Ledger deposits and withdrawals stamp this record.
pub fn process_create_transaction(
    program_id: &Pubkey,
    transaction_account: &AccountInfo,
    pool_account: &AccountInfo,
    maker_account: &AccountInfo,
    authority: &AccountInfo,
) -> ProgramResult {
    check_pool_and_maker(program_id, pool_account, maker_account, authority)?;

    let (expected_pda, bump) =
        derive_ledger_transaction_pda(pool_account.key(), maker_account.key(), program_id)?;
    if transaction_account.key() != &expected_pda {
        msg!("Error: Transaction account is not the correct PDA");
        return Err(EscrowError::InvalidAccount.into());
    }

    create_pda_account(
        authority,
        transaction_account,
        program_id,
        Transaction::LEN,
        &[TRANSACTION_SEED, pool_account.key(), maker_account.key()],
        bump,
    )?;
    store(
        transaction_account,
        &Transaction::new_ledger(*pool_account.key(), *maker_account.key(), bump),
    )?;

    msg!("Ledger transaction created successfully");
    Ok(())
}
