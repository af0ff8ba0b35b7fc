//! PDA account allocation

use escrow_common::{validate_uninitialized, EscrowError};
use pinocchio::{
    account_info::AccountInfo,
    instruction::{Seed, Signer},
    pubkey::Pubkey,
    sysvars::{rent::Rent, Sysvar},
    ProgramResult,
};
use pinocchio_system::instructions::{Allocate, Assign, CreateAccount, Transfer};

/// How an uninitialized PDA gets its rent-exempt balance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Funding {
    /// Empty address: a single `CreateAccount` for the full minimum
    Create(u64),
    /// Address already holds lamports: transfer the shortfall, then
    /// allocate and assign under the PDA signature
    TopUp(u64),
}

/// Pick the funding path for an address holding `current` lamports
pub fn plan_funding(current: u64, rent_minimum: u64) -> Funding {
    if current == 0 {
        Funding::Create(rent_minimum)
    } else {
        Funding::TopUp(rent_minimum.saturating_sub(current))
    }
}

/// Allocate a rent-exempt, program-owned account at a PDA
///
/// `seeds` are the derivation seeds without the bump. Fails with
/// `AlreadyExists` only if the account already carries a record; lamports
/// sent to the address beforehand are kept and topped up.
pub fn create_pda_account(
    payer: &AccountInfo,
    account: &AccountInfo,
    program_id: &Pubkey,
    space: usize,
    seeds: &[&[u8]],
    bump: u8,
) -> ProgramResult {
    validate_uninitialized(account)?;
    if seeds.len() > 3 {
        return Err(EscrowError::InvalidSeeds.into());
    }

    let bump = [bump];
    let mut signer_seeds: [Seed; 4] = [
        Seed::from(&bump[..]),
        Seed::from(&bump[..]),
        Seed::from(&bump[..]),
        Seed::from(&bump[..]),
    ];
    for (slot, seed) in signer_seeds.iter_mut().zip(seeds.iter()) {
        *slot = Seed::from(*seed);
    }
    let signer_seeds = &signer_seeds[..seeds.len() + 1];

    let rent = Rent::get()?;
    match plan_funding(account.lamports(), rent.minimum_balance(space)) {
        Funding::Create(lamports) => CreateAccount {
            from: payer,
            to: account,
            lamports,
            space: space as u64,
            owner: program_id,
        }
        .invoke_signed(&[Signer::from(signer_seeds)]),
        Funding::TopUp(shortfall) => {
            if shortfall > 0 {
                Transfer {
                    from: payer,
                    to: account,
                    lamports: shortfall,
                }
                .invoke()?;
            }
            Allocate {
                account,
                space: space as u64,
            }
            .invoke_signed(&[Signer::from(signer_seeds)])?;
            Assign {
                account,
                owner: program_id,
            }
            .invoke_signed(&[Signer::from(signer_seeds)])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMUM: u64 = 1_447_680;

    #[test]
    fn test_empty_address_is_created() {
        assert_eq!(plan_funding(0, MINIMUM), Funding::Create(MINIMUM));
    }

    #[test]
    fn test_prefunded_address_is_topped_up() {
        // One lamport sent to a derivable address must not block creation
        assert_eq!(plan_funding(1, MINIMUM), Funding::TopUp(MINIMUM - 1));
    }

    #[test]
    fn test_overfunded_address_needs_no_transfer() {
        assert_eq!(plan_funding(MINIMUM + 5, MINIMUM), Funding::TopUp(0));
        assert_eq!(plan_funding(MINIMUM, MINIMUM), Funding::TopUp(0));
    }
}
