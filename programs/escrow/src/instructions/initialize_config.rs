//! InitializeConfig instruction - record the program config and verifier

use crate::pda::derive_config_pda;
use crate::system::create_pda_account;
use crate::ADMIN;
use escrow_common::*;
use escrow_model::{check_admin, seeds::PROGRAM_AUTHORITY_SEED, AccountRecord, ProgramConfig};
use pinocchio::{account_info::AccountInfo, msg, pubkey::Pubkey, ProgramResult};

/// Process initialize config instruction
///
/// Creates the `ProgramConfig` at the "program_authority" PDA. Only the
/// deployment's `ADMIN` may sign. A zero `verifier` keeps maker
/// self-attestation.
pub fn process_initialize_config(
    program_id: &Pubkey,
    config_account: &AccountInfo,
    admin: &AccountInfo,
    verifier: &Pubkey,
) -> ProgramResult {
    if let Err(e) = check_admin(&ADMIN, admin.key()) {
        msg!("Error: Signer is not the program admin");
        return Err(e.into());
    }

    let (expected_pda, bump) = derive_config_pda(program_id)?;
    if config_account.key() != &expected_pda {
        msg!("Error: Config account is not the correct PDA");
        return Err(EscrowError::InvalidAccount.into());
    }

    create_pda_account(
        admin,
        config_account,
        program_id,
        ProgramConfig::LEN,
        &[PROGRAM_AUTHORITY_SEED],
        bump,
    )?;
    store(config_account, &ProgramConfig::new(*admin.key(), *verifier, bump))?;

    msg!("Config initialized successfully");
    Ok(())
}

/// Process set verifier instruction
///
/// Replaces the configured verifier. The signer must be the admin recorded
/// in the config; a zero `verifier` restores self-attestation.
pub fn process_set_verifier(
    program_id: &Pubkey,
    config_account: &AccountInfo,
    admin: &AccountInfo,
    verifier: &Pubkey,
) -> ProgramResult {
    let (expected_pda, _) = derive_config_pda(program_id)?;
    if config_account.key() != &expected_pda {
        msg!("Error: Config account is not the correct PDA");
        return Err(EscrowError::InvalidAccount.into());
    }

    let mut config = load::<ProgramConfig>(config_account, program_id)?;
    if let Err(e) = config.set_verifier(admin.key(), *verifier) {
        msg!("Error: Signer is not the config admin");
        return Err(e.into());
    }
    store(config_account, &config)?;

    msg!("Verifier updated");
    Ok(())
}
