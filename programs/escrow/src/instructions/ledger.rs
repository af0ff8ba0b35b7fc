//! Deposit / Withdraw instructions - the liquidity ledger
//!
//! Contribution amount, pool total and the ledger transaction move together:
//! every record is updated on a copy and written back only once all checks
//! and arithmetic have succeeded.

use crate::pda::{derive_contribution_pda, derive_ledger_transaction_pda};
use escrow_common::*;
use escrow_model::{Contribution, Maker, Pool, Transaction, TransactionType};
use pinocchio::{account_info::AccountInfo, msg, pubkey::Pubkey, ProgramResult};
use pinocchio_log::log;

/// Records touched by one ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerRecords {
    pub pool: Pool,
    pub maker: Maker,
    pub contribution: Contribution,
    pub transaction: Transaction,
}

/// Apply a deposit or withdrawal to the loaded records
///
/// Checks run in order: amount, signer, verification, pool status, balance.
pub fn apply_ledger_entry(
    records: &mut LedgerRecords,
    signer: &Pubkey,
    kind: TransactionType,
    amount: u64,
) -> Result<(), EscrowError> {
    if amount == 0 {
        return Err(EscrowError::InvalidAmount);
    }
    if records.maker.authority != *signer {
        return Err(EscrowError::Unauthorized);
    }
    if !records.maker.is_verified() {
        return Err(EscrowError::Unverified);
    }
    records.pool.require_active()?;

    match kind {
        TransactionType::Withdrawal => {
            records.contribution.debit(amount)?;
            records.pool.debit(amount)?;
        }
        _ => {
            records.contribution.credit(amount)?;
            records.pool.credit(amount)?;
        }
    }
    records.transaction.record_ledger(kind, amount)
}

/// Process deposit instruction
pub fn process_deposit(
    program_id: &Pubkey,
    pool_account: &AccountInfo,
    maker_account: &AccountInfo,
    contribution_account: &AccountInfo,
    transaction_account: &AccountInfo,
    authority: &AccountInfo,
    amount: u64,
) -> ProgramResult {
    process_ledger_entry(
        program_id,
        pool_account,
        maker_account,
        contribution_account,
        transaction_account,
        authority,
        TransactionType::Deposit,
        amount,
    )?;
    log!("Deposit processed: {}", amount);
    Ok(())
}

/// Process withdraw instruction
pub fn process_withdraw(
    program_id: &Pubkey,
    pool_account: &AccountInfo,
    maker_account: &AccountInfo,
    contribution_account: &AccountInfo,
    transaction_account: &AccountInfo,
    authority: &AccountInfo,
    amount: u64,
) -> ProgramResult {
    process_ledger_entry(
        program_id,
        pool_account,
        maker_account,
        contribution_account,
        transaction_account,
        authority,
        TransactionType::Withdrawal,
        amount,
    )?;
    log!("Withdraw processed: {}", amount);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn process_ledger_entry(
    program_id: &Pubkey,
    pool_account: &AccountInfo,
    maker_account: &AccountInfo,
    contribution_account: &AccountInfo,
    transaction_account: &AccountInfo,
    authority: &AccountInfo,
    kind: TransactionType,
    amount: u64,
) -> Result<(), EscrowError> {
    let (expected_contribution, _) =
        derive_contribution_pda(pool_account.key(), maker_account.key(), program_id)?;
    if contribution_account.key() != &expected_contribution {
        msg!("Error: Contribution account does not link this pool and maker");
        return Err(EscrowError::InvalidAccount);
    }
    let (expected_transaction, _) =
        derive_ledger_transaction_pda(pool_account.key(), maker_account.key(), program_id)?;
    if transaction_account.key() != &expected_transaction {
        msg!("Error: Transaction account does not link this pool and maker");
        return Err(EscrowError::InvalidAccount);
    }

    let mut records = LedgerRecords {
        pool: load(pool_account, program_id)?,
        maker: load(maker_account, program_id)?,
        contribution: load(contribution_account, program_id)?,
        transaction: load(transaction_account, program_id)?,
    };
    apply_ledger_entry(&mut records, authority.key(), kind, amount)?;

    store(pool_account, &records.pool)?;
    store(contribution_account, &records.contribution)?;
    store(transaction_account, &records.transaction)?;
    Ok(())
}

// Exclude test module from BPF builds
#[cfg(all(test, not(target_os = "solana")))]
#[path = "ledger_test.rs"]
mod ledger_test;
