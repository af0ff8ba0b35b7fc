//! Instruction builders for every escrow operation
//!
//! Account order matches the program's entrypoint. PDAs are derived here, so
//! callers only supply wallets, mints and the pool currency.

use escrow_common::{
    pack_empty, AmountArgs, CreatePoolArgs, DepositFundsArgs, EscrowInstruction, VerifierArgs,
};
use solana_sdk::{
    hash::Hash,
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    signature::Keypair,
    signer::Signer,
    system_program,
    transaction::Transaction,
};

use crate::error::Result;
use crate::pda;

/// Build create_pool instruction
pub fn build_create_pool_instruction(
    program_id: &Pubkey,
    authority: &Pubkey,
    currency: [u8; 3],
    rate: u64,
) -> Result<Instruction> {
    let (pool, _) = pda::pool_address(&currency, program_id)?;
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(pool, false),
            AccountMeta::new(*authority, true),
            AccountMeta::new_readonly(system_program::ID, false),
        ],
        data: CreatePoolArgs { currency, rate }.pack(),
    })
}

/// Build create_maker instruction
pub fn build_create_maker_instruction(program_id: &Pubkey, authority: &Pubkey) -> Result<Instruction> {
    let (maker, _) = pda::maker_address(authority, program_id)?;
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(maker, false),
            AccountMeta::new(*authority, true),
            AccountMeta::new_readonly(system_program::ID, false),
        ],
        data: pack_empty(EscrowInstruction::CreateMaker),
    })
}

/// Build create_contribution instruction for the authority's maker in `currency`'s pool
pub fn build_create_contribution_instruction(
    program_id: &Pubkey,
    authority: &Pubkey,
    currency: [u8; 3],
) -> Result<Instruction> {
    let (pool, _) = pda::pool_address(&currency, program_id)?;
    let (maker, _) = pda::maker_address(authority, program_id)?;
    let (contribution, _) = pda::contribution_address(&pool, &maker, program_id)?;
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(contribution, false),
            AccountMeta::new_readonly(pool, false),
            AccountMeta::new_readonly(maker, false),
            AccountMeta::new(*authority, true),
            AccountMeta::new_readonly(system_program::ID, false),
        ],
        data: pack_empty(EscrowInstruction::CreateContribution),
    })
}

/// Build create_transaction instruction (ledger record for pool, maker)
pub fn build_create_transaction_instruction(
    program_id: &Pubkey,
    authority: &Pubkey,
    currency: [u8; 3],
) -> Result<Instruction> {
    let (pool, _) = pda::pool_address(&currency, program_id)?;
    let (maker, _) = pda::maker_address(authority, program_id)?;
    let (transaction, _) = pda::ledger_transaction_address(&pool, &maker, program_id)?;
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(transaction, false),
            AccountMeta::new_readonly(pool, false),
            AccountMeta::new_readonly(maker, false),
            AccountMeta::new(*authority, true),
            AccountMeta::new_readonly(system_program::ID, false),
        ],
        data: pack_empty(EscrowInstruction::CreateTransaction),
    })
}

/// Build verify_maker instruction
///
/// `signer` is the configured verifier, or `maker_authority` itself when no
/// verifier is configured.
pub fn build_verify_maker_instruction(
    program_id: &Pubkey,
    maker_authority: &Pubkey,
    signer: &Pubkey,
) -> Result<Instruction> {
    let (maker, _) = pda::maker_address(maker_authority, program_id)?;
    let (config, _) = pda::config_address(program_id)?;
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(maker, false),
            AccountMeta::new_readonly(*signer, true),
            AccountMeta::new_readonly(config, false),
        ],
        data: pack_empty(EscrowInstruction::VerifyMaker),
    })
}

fn build_ledger_instruction(
    program_id: &Pubkey,
    authority: &Pubkey,
    currency: [u8; 3],
    amount: u64,
    ix: EscrowInstruction,
) -> Result<Instruction> {
    let (pool, _) = pda::pool_address(&currency, program_id)?;
    let (maker, _) = pda::maker_address(authority, program_id)?;
    let (contribution, _) = pda::contribution_address(&pool, &maker, program_id)?;
    let (transaction, _) = pda::ledger_transaction_address(&pool, &maker, program_id)?;
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(pool, false),
            AccountMeta::new_readonly(maker, false),
            AccountMeta::new(contribution, false),
            AccountMeta::new(transaction, false),
            AccountMeta::new_readonly(*authority, true),
        ],
        data: AmountArgs { amount }.pack(ix),
    })
}

/// Build ledger deposit instruction
pub fn build_deposit_instruction(
    program_id: &Pubkey,
    authority: &Pubkey,
    currency: [u8; 3],
    amount: u64,
) -> Result<Instruction> {
    build_ledger_instruction(program_id, authority, currency, amount, EscrowInstruction::Deposit)
}

/// Build ledger withdraw instruction
pub fn build_withdraw_instruction(
    program_id: &Pubkey,
    authority: &Pubkey,
    currency: [u8; 3],
    amount: u64,
) -> Result<Instruction> {
    build_ledger_instruction(program_id, authority, currency, amount, EscrowInstruction::Withdraw)
}

/// Build deposit_funds instruction opening an offer at (taker, nonce)
///
/// The taker's and the vault's associated token accounts must already exist.
pub fn build_deposit_funds_instruction(
    program_id: &Pubkey,
    taker: &Pubkey,
    mint: &Pubkey,
    amount: u64,
    exchange_rate: u64,
    nonce: u64,
) -> Result<Instruction> {
    let (offer, _) = pda::offer_address(taker, nonce, program_id)?;
    let (vault_authority, _) = pda::vault_authority_address(program_id)?;
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(offer, false),
            AccountMeta::new(*taker, true),
            AccountMeta::new(pda::associated_token_address(taker, mint), false),
            AccountMeta::new(pda::associated_token_address(&vault_authority, mint), false),
            AccountMeta::new_readonly(vault_authority, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(pda::TOKEN_PROGRAM_ID, false),
            AccountMeta::new_readonly(system_program::ID, false),
        ],
        data: DepositFundsArgs {
            amount,
            exchange_rate,
            nonce,
        }
        .pack(),
    })
}

/// Build accept_offer instruction; `maker` receives the escrowed tokens
pub fn build_accept_offer_instruction(
    program_id: &Pubkey,
    maker: &Pubkey,
    taker: &Pubkey,
    mint: &Pubkey,
    nonce: u64,
) -> Result<Instruction> {
    let (offer, _) = pda::offer_address(taker, nonce, program_id)?;
    let (maker_record, _) = pda::maker_address(maker, program_id)?;
    let (vault_authority, _) = pda::vault_authority_address(program_id)?;
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(offer, false),
            AccountMeta::new_readonly(*maker, true),
            AccountMeta::new_readonly(maker_record, false),
            AccountMeta::new(pda::associated_token_address(maker, mint), false),
            AccountMeta::new(pda::associated_token_address(&vault_authority, mint), false),
            AccountMeta::new_readonly(vault_authority, false),
            AccountMeta::new_readonly(pda::TOKEN_PROGRAM_ID, false),
        ],
        data: pack_empty(EscrowInstruction::AcceptOffer),
    })
}

/// Build cancel_offer instruction refunding the taker
pub fn build_cancel_offer_instruction(
    program_id: &Pubkey,
    taker: &Pubkey,
    mint: &Pubkey,
    nonce: u64,
) -> Result<Instruction> {
    let (offer, _) = pda::offer_address(taker, nonce, program_id)?;
    let (vault_authority, _) = pda::vault_authority_address(program_id)?;
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(offer, false),
            AccountMeta::new_readonly(*taker, true),
            AccountMeta::new(pda::associated_token_address(taker, mint), false),
            AccountMeta::new(pda::associated_token_address(&vault_authority, mint), false),
            AccountMeta::new_readonly(vault_authority, false),
            AccountMeta::new_readonly(pda::TOKEN_PROGRAM_ID, false),
        ],
        data: pack_empty(EscrowInstruction::CancelOffer),
    })
}

/// Build initialize_config instruction; `None` keeps self-attestation
pub fn build_initialize_config_instruction(
    program_id: &Pubkey,
    admin: &Pubkey,
    verifier: Option<&Pubkey>,
) -> Result<Instruction> {
    let (config, _) = pda::config_address(program_id)?;
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(config, false),
            AccountMeta::new(*admin, true),
            AccountMeta::new_readonly(system_program::ID, false),
        ],
        data: verifier_args(verifier).pack(EscrowInstruction::InitializeConfig),
    })
}

/// Build set_verifier instruction; `None` restores self-attestation
pub fn build_set_verifier_instruction(
    program_id: &Pubkey,
    admin: &Pubkey,
    verifier: Option<&Pubkey>,
) -> Result<Instruction> {
    let (config, _) = pda::config_address(program_id)?;
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(config, false),
            AccountMeta::new_readonly(*admin, true),
        ],
        data: verifier_args(verifier).pack(EscrowInstruction::SetVerifier),
    })
}

fn verifier_args(verifier: Option<&Pubkey>) -> VerifierArgs {
    VerifierArgs {
        verifier: verifier.map(|v| v.to_bytes()).unwrap_or([0u8; 32]),
    }
}

/// Sign a transaction with `payer` as fee payer and sole signer
pub fn build_transaction(instructions: &[Instruction], payer: &Keypair, recent_blockhash: Hash) -> Transaction {
    Transaction::new_signed_with_payer(instructions, Some(&payer.pubkey()), &[payer], recent_blockhash)
}
