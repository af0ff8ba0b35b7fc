//! AcceptOffer instruction - settle a pending offer to a verified maker

use super::deposit_funds::VaultAccounts;
use crate::pda::derive_maker_pda;
use crate::token::transfer_from_vault;
use escrow_common::*;
use escrow_model::{Maker, Transaction};
use pinocchio::{account_info::AccountInfo, msg, pubkey::Pubkey, ProgramResult};
use pinocchio_log::log;

/// Whether `maker_account` is the caller's maker record and verified
///
/// A missing record counts as unverified.
pub fn maker_is_verified(
    program_id: &Pubkey,
    maker_account: &AccountInfo,
    caller: &Pubkey,
) -> Result<bool, EscrowError> {
    let (expected_maker, _) = derive_maker_pda(caller, program_id)?;
    if maker_account.key() != &expected_maker {
        msg!("Error: Maker account is not the caller's maker PDA");
        return Err(EscrowError::InvalidAccount);
    }
    match load::<Maker>(maker_account, program_id) {
        Ok(maker) => Ok(maker.is_verified()),
        Err(EscrowError::NotFound) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Accept `offer` for `caller`
///
/// The maker record is only resolved once the offer itself is acceptable, so
/// a settled offer or a self-trade is reported before any maker account
/// problem.
pub fn settle_offer(
    offer: &mut Transaction,
    caller: &Pubkey,
    maker_verified: impl FnOnce() -> Result<bool, EscrowError>,
) -> Result<(), EscrowError> {
    offer.check_acceptable(caller)?;
    let verified = maker_verified()?;
    offer.accept(caller, verified)
}

/// Process accept offer instruction
///
/// Checks run in order: offer exists, offer is Pending, caller is not the
/// taker, caller's maker is verified. On success the vault pays the caller
/// and the offer becomes Completed/Trade.
pub fn process_accept_offer(
    program_id: &Pubkey,
    offer_account: &AccountInfo,
    caller: &AccountInfo,
    maker_account: &AccountInfo,
    vault_accounts: &VaultAccounts,
) -> ProgramResult {
    let mut offer = load::<Transaction>(offer_account, program_id)?;
    let settled = settle_offer(&mut offer, caller.key(), || {
        maker_is_verified(program_id, maker_account, caller.key())
    });
    if let Err(e) = settled {
        msg!("Error: Offer cannot be accepted");
        return Err(e.into());
    }

    let (_, bump) = vault_accounts.check(program_id, caller.key(), &offer.mint)?;
    transfer_from_vault(
        vault_accounts.vault,
        vault_accounts.user_token,
        vault_accounts.vault_authority,
        offer.amount,
        bump,
    )?;
    store(offer_account, &offer)?;

    log!("Offer accepted: amount {} nonce {}", offer.amount, offer.nonce);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use escrow_model::{TransactionStatus, TransactionType};

    const TAKER: [u8; 32] = [1; 32];
    const MAKER: [u8; 32] = [2; 32];

    fn offer() -> Transaction {
        Transaction::new_offer(TAKER, [7; 32], 10_000_000, 1_000_000, 1_741_194_802_295, 254).unwrap()
    }

    fn wrong_maker_account() -> Result<bool, EscrowError> {
        Err(EscrowError::InvalidAccount)
    }

    #[test]
    fn test_settled_offer_reported_before_maker_account() {
        let mut tx = offer();
        settle_offer(&mut tx, &MAKER, || Ok(true)).unwrap();

        assert_eq!(
            settle_offer(&mut tx, &[3; 32], wrong_maker_account),
            Err(EscrowError::InvalidState)
        );
    }

    #[test]
    fn test_self_trade_reported_before_maker_account() {
        let mut tx = offer();
        assert_eq!(
            settle_offer(&mut tx, &TAKER, wrong_maker_account),
            Err(EscrowError::SelfTrade)
        );
        assert_eq!(tx.status().unwrap(), TransactionStatus::Pending);
    }

    #[test]
    fn test_maker_account_checked_for_acceptable_offer() {
        let mut tx = offer();
        assert_eq!(
            settle_offer(&mut tx, &MAKER, wrong_maker_account),
            Err(EscrowError::InvalidAccount)
        );
        assert_eq!(settle_offer(&mut tx, &MAKER, || Ok(false)), Err(EscrowError::Unverified));

        settle_offer(&mut tx, &MAKER, || Ok(true)).unwrap();
        assert_eq!(tx.status().unwrap(), TransactionStatus::Completed);
        assert_eq!(tx.transaction_type().unwrap(), TransactionType::Trade);
        assert_eq!(tx.maker, MAKER);
    }
}
