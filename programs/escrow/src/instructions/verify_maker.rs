//! VerifyMaker instruction - the verification gate

use crate::pda::derive_config_pda;
use escrow_common::*;
use escrow_model::{check_verifier, Maker, ProgramConfig};
use pinocchio::{account_info::AccountInfo, msg, pubkey::Pubkey, ProgramResult};

/// Process verify maker instruction
///
/// The config account must be the "program_authority" PDA; while it is
/// uninitialized the maker's own authority may verify. Verifying an
/// already-verified maker succeeds without change.
pub fn process_verify_maker(
    program_id: &Pubkey,
    maker_account: &AccountInfo,
    signer: &AccountInfo,
    config_account: &AccountInfo,
) -> ProgramResult {
    let (expected_config, _) = derive_config_pda(program_id)?;
    if config_account.key() != &expected_config {
        msg!("Error: Config account is not the correct PDA");
        return Err(EscrowError::InvalidAccount.into());
    }
    let config = match load::<ProgramConfig>(config_account, program_id) {
        Ok(config) => Some(config),
        Err(EscrowError::NotFound) => None,
        Err(e) => return Err(e.into()),
    };

    let mut maker = load::<Maker>(maker_account, program_id)?;
    if let Err(e) = check_verifier(config.as_ref(), &maker, signer.key()) {
        msg!("Error: Signer may not verify this maker");
        return Err(e.into());
    }

    if !maker.is_verified() {
        maker.verify();
        store(maker_account, &maker)?;
    }

    msg!("Maker verified");
    Ok(())
}
