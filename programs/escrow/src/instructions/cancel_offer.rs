//! CancelOffer instruction - refund a pending offer to its taker

use super::deposit_funds::VaultAccounts;
use crate::token::transfer_from_vault;
use escrow_common::*;
use escrow_model::Transaction;
use pinocchio::{account_info::AccountInfo, msg, pubkey::Pubkey, ProgramResult};
use pinocchio_log::log;

/// Process cancel offer instruction
pub fn process_cancel_offer(
    program_id: &Pubkey,
    offer_account: &AccountInfo,
    taker: &AccountInfo,
    vault_accounts: &VaultAccounts,
) -> ProgramResult {
    let mut offer = load::<Transaction>(offer_account, program_id)?;
    if let Err(e) = offer.cancel(taker.key()) {
        msg!("Error: Offer cannot be cancelled");
        return Err(e.into());
    }

    let (_, bump) = vault_accounts.check(program_id, taker.key(), &offer.mint)?;
    transfer_from_vault(
        vault_accounts.vault,
        vault_accounts.user_token,
        vault_accounts.vault_authority,
        offer.amount,
        bump,
    )?;
    store(offer_account, &offer)?;

    log!("Offer cancelled: refunded {}", offer.amount);
    Ok(())
}
