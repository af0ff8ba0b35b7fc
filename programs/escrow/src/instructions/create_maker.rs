//! CreateMaker instruction

use crate::pda::derive_maker_pda;
use crate::system::create_pda_account;
use escrow_common::*;
use escrow_model::{seeds::MAKER_SEED, AccountRecord, Maker};
use pinocchio::{account_info::AccountInfo, msg, pubkey::Pubkey, ProgramResult};

/// Process create maker instruction
///
/// Creates the signer's unverified maker record at ["maker", authority].
pub fn process_create_maker(
    program_id: &Pubkey,
    maker_account: &AccountInfo,
    authority: &AccountInfo,
) -> ProgramResult {
    let (expected_pda, bump) = derive_maker_pda(authority.key(), program_id)?;
    if maker_account.key() != &expected_pda {
        msg!("Error: Maker account is not the correct PDA");
        return Err(EscrowError::InvalidAccount.into());
    }

    create_pda_account(
        authority,
        maker_account,
        program_id,
        Maker::LEN,
        &[MAKER_SEED, authority.key()],
        bump,
    )?;
    store(maker_account, &Maker::new(*authority.key(), bump))?;

    msg!("Maker created successfully");
    Ok(())
}
