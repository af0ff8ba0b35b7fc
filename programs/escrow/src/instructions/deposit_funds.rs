//! DepositFunds instruction - fund the vault and open an escrow offer

use crate::pda::{derive_offer_pda, derive_vault_address, derive_vault_authority_pda};
use crate::system::create_pda_account;
use crate::token::{check_token_account, transfer_tokens};
use escrow_common::*;
use escrow_model::{seeds::TRANSACTION_SEED, AccountRecord, Transaction};
use pinocchio::{account_info::AccountInfo, msg, pubkey::Pubkey, ProgramResult};
use pinocchio_log::log;

/// Token-side accounts of an escrow operation
pub struct VaultAccounts<'a> {
    pub user_token: &'a AccountInfo,
    pub vault: &'a AccountInfo,
    pub vault_authority: &'a AccountInfo,
}

impl<'a> VaultAccounts<'a> {
    /// Verify the vault authority PDA, that the vault is the authority's
    /// associated token account for `mint`, and the user's token account.
    /// Returns the user token balance and the authority bump.
    pub fn check(
        &self,
        program_id: &Pubkey,
        user: &Pubkey,
        mint: &Pubkey,
    ) -> Result<(u64, u8), EscrowError> {
        let (expected_authority, bump) = derive_vault_authority_pda(program_id)?;
        if self.vault_authority.key() != &expected_authority {
            msg!("Error: Vault authority is not the correct PDA");
            return Err(EscrowError::InvalidAccount);
        }
        if validate_key(self.vault, &derive_vault_address(&expected_authority, mint)?).is_err() {
            msg!("Error: Vault is not the vault authority's associated token account");
            return Err(EscrowError::InvalidAccount);
        }
        if check_token_account(self.vault, &expected_authority, mint).is_err() {
            msg!("Error: Vault is not the program's token account for this mint");
            return Err(EscrowError::InvalidAccount);
        }
        let balance = match check_token_account(self.user_token, user, mint) {
            Ok(balance) => balance,
            Err(e) => {
                msg!("Error: User token account does not match signer and mint");
                return Err(e);
            }
        };
        Ok((balance, bump))
    }
}

/// Process deposit funds instruction
///
/// Moves `amount` of `mint` from the taker into the vault and records a
/// Pending offer at ["transaction", taker, nonce_le].
pub fn process_deposit_funds(
    program_id: &Pubkey,
    offer_account: &AccountInfo,
    taker: &AccountInfo,
    mint: &AccountInfo,
    vault_accounts: &VaultAccounts,
    args: &DepositFundsArgs,
) -> ProgramResult {
    let (expected_pda, bump) = derive_offer_pda(taker.key(), args.nonce, program_id)?;
    if offer_account.key() != &expected_pda {
        msg!("Error: Offer account is not the correct PDA");
        return Err(EscrowError::InvalidAccount.into());
    }
    if let Err(e) = validate_uninitialized(offer_account) {
        msg!("Error: Offer already exists for this nonce");
        return Err(e.into());
    }

    let offer = Transaction::new_offer(
        *taker.key(),
        *mint.key(),
        args.amount,
        args.exchange_rate,
        args.nonce,
        bump,
    )?;

    let (balance, _) = vault_accounts.check(program_id, taker.key(), mint.key())?;
    if balance < args.amount {
        msg!("Error: Taker balance too small");
        return Err(EscrowError::InsufficientFunds.into());
    }

    transfer_tokens(vault_accounts.user_token, vault_accounts.vault, taker, args.amount)?;

    let nonce = args.nonce.to_le_bytes();
    create_pda_account(
        taker,
        offer_account,
        program_id,
        Transaction::LEN,
        &[TRANSACTION_SEED, taker.key(), &nonce],
        bump,
    )?;
    store(offer_account, &offer)?;

    log!("Offer opened: amount {} nonce {}", args.amount, args.nonce);
    Ok(())
}
