//! Escrow program entrypoint

use pinocchio::{account_info::AccountInfo, msg, pubkey::Pubkey, ProgramResult};

#[cfg(feature = "bpf-entrypoint")]
use pinocchio::entrypoint;

use crate::instructions::*;
use crate::token::validate_token_program;
use escrow_common::{
    split_instruction, validate_signer, validate_writable, AmountArgs, CreatePoolArgs,
    DepositFundsArgs, EscrowError, VerifierArgs,
};

#[cfg(feature = "bpf-entrypoint")]
entrypoint!(process_instruction);

pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    let (instruction, data) = match split_instruction(instruction_data) {
        Ok(parsed) => parsed,
        Err(e) => {
            msg!("Error: Unknown or empty instruction");
            return Err(e.into());
        }
    };

    match instruction {
        EscrowInstruction::CreatePool => {
            msg!("Instruction: CreatePool");
            process_create_pool_inner(program_id, accounts, data)
        }
        EscrowInstruction::CreateMaker => {
            msg!("Instruction: CreateMaker");
            process_create_maker_inner(program_id, accounts)
        }
        EscrowInstruction::CreateContribution => {
            msg!("Instruction: CreateContribution");
            process_create_contribution_inner(program_id, accounts)
        }
        EscrowInstruction::CreateTransaction => {
            msg!("Instruction: CreateTransaction");
            process_create_transaction_inner(program_id, accounts)
        }
        EscrowInstruction::VerifyMaker => {
            msg!("Instruction: VerifyMaker");
            process_verify_maker_inner(program_id, accounts)
        }
        EscrowInstruction::Deposit => {
            msg!("Instruction: Deposit");
            process_ledger_inner(program_id, accounts, data, false)
        }
        EscrowInstruction::Withdraw => {
            msg!("Instruction: Withdraw");
            process_ledger_inner(program_id, accounts, data, true)
        }
        EscrowInstruction::DepositFunds => {
            msg!("Instruction: DepositFunds");
            process_deposit_funds_inner(program_id, accounts, data)
        }
        EscrowInstruction::AcceptOffer => {
            msg!("Instruction: AcceptOffer");
            process_accept_offer_inner(program_id, accounts)
        }
        EscrowInstruction::CancelOffer => {
            msg!("Instruction: CancelOffer");
            process_cancel_offer_inner(program_id, accounts)
        }
        EscrowInstruction::InitializeConfig => {
            msg!("Instruction: InitializeConfig");
            process_initialize_config_inner(program_id, accounts, data)
        }
        EscrowInstruction::SetVerifier => {
            msg!("Instruction: SetVerifier");
            process_set_verifier_inner(program_id, accounts, data)
        }
    }
}

// Instruction processors with account validation

fn require_accounts(accounts: &[AccountInfo], n: usize) -> Result<(), EscrowError> {
    if accounts.len() < n {
        msg!("Error: Not enough accounts for instruction");
        return Err(EscrowError::InvalidInstruction);
    }
    Ok(())
}

fn require_signer(account: &AccountInfo) -> Result<(), EscrowError> {
    if let Err(e) = validate_signer(account) {
        msg!("Error: Missing required signature");
        return Err(e);
    }
    Ok(())
}

/// Process create pool instruction
///
/// Expected accounts:
/// 0. `[writable]` Pool account (PDA)
/// 1. `[signer, writable]` Authority (payer)
/// 2. `[]` System program
///
/// Expected data layout (11 bytes):
/// - currency: [u8; 3]
/// - rate: u64
fn process_create_pool_inner(program_id: &Pubkey, accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    require_accounts(accounts, 3)?;
    let pool_account = &accounts[0];
    let authority = &accounts[1];

    validate_writable(pool_account)?;
    require_signer(authority)?;

    let args = CreatePoolArgs::unpack(data)?;
    process_create_pool(program_id, pool_account, authority, &args)
}

/// Process create maker instruction
///
/// Expected accounts:
/// 0. `[writable]` Maker account (PDA)
/// 1. `[signer, writable]` Authority (payer)
/// 2. `[]` System program
fn process_create_maker_inner(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    require_accounts(accounts, 3)?;
    let maker_account = &accounts[0];
    let authority = &accounts[1];

    validate_writable(maker_account)?;
    require_signer(authority)?;

    process_create_maker(program_id, maker_account, authority)
}

/// Process create contribution instruction
///
/// Expected accounts:
/// 0. `[writable]` Contribution account (PDA)
/// 1. `[]` Pool account
/// 2. `[]` Maker account of the signer
/// 3. `[signer, writable]` Authority (payer)
/// 4. `[]` System program
fn process_create_contribution_inner(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    require_accounts(accounts, 5)?;
    let contribution_account = &accounts[0];
    let pool_account = &accounts[1];
    let maker_account = &accounts[2];
    let authority = &accounts[3];

    validate_writable(contribution_account)?;
    require_signer(authority)?;

    process_create_contribution(program_id, contribution_account, pool_account, maker_account, authority)
}

/// Process create transaction instruction
///
/// Expected accounts:
/// 0. `[writable]` Ledger transaction account (PDA)
/// 1. `[]` Pool account
/// 2. `[]` Maker account of the signer
/// 3. `[signer, writable]` Authority (payer)
/// 4. `[]` System program
fn process_create_transaction_inner(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    require_accounts(accounts, 5)?;
    let transaction_account = &accounts[0];
    let pool_account = &accounts[1];
    let maker_account = &accounts[2];
    let authority = &accounts[3];

    validate_writable(transaction_account)?;
    require_signer(authority)?;

    process_create_transaction(program_id, transaction_account, pool_account, maker_account, authority)
}

/// Process verify maker instruction
///
/// Expected accounts:
/// 0. `[writable]` Maker account
/// 1. `[signer]` Verifier (configured verifier, or the maker's authority)
/// 2. `[]` Program config account (PDA, may be uninitialized)
fn process_verify_maker_inner(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    require_accounts(accounts, 3)?;
    let maker_account = &accounts[0];
    let signer = &accounts[1];
    let config_account = &accounts[2];

    validate_writable(maker_account)?;
    require_signer(signer)?;

    process_verify_maker(program_id, maker_account, signer, config_account)
}

/// Process deposit / withdraw instruction
///
/// Expected accounts:
/// 0. `[writable]` Pool account
/// 1. `[]` Maker account
/// 2. `[writable]` Contribution account (PDA of pool, maker)
/// 3. `[writable]` Ledger transaction account (PDA of pool, maker)
/// 4. `[signer]` Maker authority
///
/// Expected data layout (8 bytes):
/// - amount: u64
fn process_ledger_inner(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    data: &[u8],
    withdraw: bool,
) -> ProgramResult {
    require_accounts(accounts, 5)?;
    let pool_account = &accounts[0];
    let maker_account = &accounts[1];
    let contribution_account = &accounts[2];
    let transaction_account = &accounts[3];
    let authority = &accounts[4];

    validate_writable(pool_account)?;
    validate_writable(contribution_account)?;
    validate_writable(transaction_account)?;
    require_signer(authority)?;

    let args = AmountArgs::unpack(data)?;
    if withdraw {
        process_withdraw(
            program_id,
            pool_account,
            maker_account,
            contribution_account,
            transaction_account,
            authority,
            args.amount,
        )
    } else {
        process_deposit(
            program_id,
            pool_account,
            maker_account,
            contribution_account,
            transaction_account,
            authority,
            args.amount,
        )
    }
}

/// Process deposit funds instruction
///
/// Expected accounts:
/// 0. `[writable]` Offer transaction account (PDA of taker, nonce)
/// 1. `[signer, writable]` Taker (payer)
/// 2. `[writable]` Taker token account
/// 3. `[writable]` Vault token account
/// 4. `[]` Vault authority (PDA)
/// 5. `[]` Mint
/// 6. `[]` Token program
/// 7. `[]` System program
///
/// Expected data layout (24 bytes):
/// - amount: u64
/// - exchange_rate: u64
/// - nonce: u64
fn process_deposit_funds_inner(program_id: &Pubkey, accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    require_accounts(accounts, 8)?;
    let offer_account = &accounts[0];
    let taker = &accounts[1];
    let mint = &accounts[5];

    validate_writable(offer_account)?;
    require_signer(taker)?;
    validate_token_program(&accounts[6])?;

    let args = DepositFundsArgs::unpack(data)?;
    let vault_accounts = VaultAccounts {
        user_token: &accounts[2],
        vault: &accounts[3],
        vault_authority: &accounts[4],
    };
    process_deposit_funds(program_id, offer_account, taker, mint, &vault_accounts, &args)
}

/// Process accept offer instruction
///
/// Expected accounts:
/// 0. `[writable]` Offer transaction account
/// 1. `[signer]` Accepting maker authority
/// 2. `[]` Maker account of the signer
/// 3. `[writable]` Maker token account (receives the escrow)
/// 4. `[writable]` Vault token account
/// 5. `[]` Vault authority (PDA)
/// 6. `[]` Token program
fn process_accept_offer_inner(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    require_accounts(accounts, 7)?;
    let offer_account = &accounts[0];
    let caller = &accounts[1];
    let maker_account = &accounts[2];

    validate_writable(offer_account)?;
    require_signer(caller)?;
    validate_token_program(&accounts[6])?;

    let vault_accounts = VaultAccounts {
        user_token: &accounts[3],
        vault: &accounts[4],
        vault_authority: &accounts[5],
    };
    process_accept_offer(program_id, offer_account, caller, maker_account, &vault_accounts)
}

/// Process cancel offer instruction
///
/// Expected accounts:
/// 0. `[writable]` Offer transaction account
/// 1. `[signer]` Taker
/// 2. `[writable]` Taker token account (receives the refund)
/// 3. `[writable]` Vault token account
/// 4. `[]` Vault authority (PDA)
/// 5. `[]` Token program
fn process_cancel_offer_inner(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    require_accounts(accounts, 6)?;
    let offer_account = &accounts[0];
    let taker = &accounts[1];

    validate_writable(offer_account)?;
    require_signer(taker)?;
    validate_token_program(&accounts[5])?;

    let vault_accounts = VaultAccounts {
        user_token: &accounts[2],
        vault: &accounts[3],
        vault_authority: &accounts[4],
    };
    process_cancel_offer(program_id, offer_account, taker, &vault_accounts)
}

/// Process initialize config instruction
///
/// Expected accounts:
/// 0. `[writable]` Config account (PDA)
/// 1. `[signer, writable]` Program admin (payer)
/// 2. `[]` System program
///
/// Expected data layout (32 bytes):
/// - verifier: Pubkey (zero keeps self-attestation)
fn process_initialize_config_inner(program_id: &Pubkey, accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    require_accounts(accounts, 3)?;
    let config_account = &accounts[0];
    let admin = &accounts[1];

    validate_writable(config_account)?;
    require_signer(admin)?;

    let args = VerifierArgs::unpack(data)?;
    process_initialize_config(program_id, config_account, admin, &args.verifier)
}

/// Process set verifier instruction
///
/// Expected accounts:
/// 0. `[writable]` Config account (PDA)
/// 1. `[signer]` Config admin
///
/// Expected data layout (32 bytes):
/// - verifier: Pubkey (zero restores self-attestation)
fn process_set_verifier_inner(program_id: &Pubkey, accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    require_accounts(accounts, 2)?;
    let config_account = &accounts[0];
    let admin = &accounts[1];

    validate_writable(config_account)?;
    require_signer(admin)?;

    let args = VerifierArgs::unpack(data)?;
    process_set_verifier(program_id, config_account, admin, &args.verifier)
}
