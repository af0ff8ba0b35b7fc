//! Liquidity escrow client
//!
//! Loads the client config and wallet, then derives and logs the accounts a
//! wallet works with. `init-config [path]` writes a default config file.
//! `initialize-config` and `set-verifier` prepare the admin instructions for
//! the configured verifier.

use anyhow::{Context, Result};
use escrow_client::{pda, tx_builder, Config};
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(String::as_str);
    if command == Some("init-config") {
        let path = args.get(2).map(String::as_str).unwrap_or("escrow-config.toml");
        return Config::write_default(path);
    }

    log::info!("Starting liquidity escrow client");

    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({:#}), using default devnet config", e);
        Config::default_devnet()
    });

    let program_id = config.program_id()?;
    let mint = config.mint()?;
    let currency = config.currency()?;
    log::info!("RPC: {}", config.rpc_url);
    log::info!("Escrow program: {}", program_id);

    // Load wallet
    let wallet = load_keypair(&config.keypair_path)?;
    let owner = wallet.pubkey();
    log::info!("Wallet: {}", owner);

    let (pool, pool_bump) = pda::pool_address(&currency, &program_id)?;
    let (maker, maker_bump) = pda::maker_address(&owner, &program_id)?;
    let (contribution, _) = pda::contribution_address(&pool, &maker, &program_id)?;
    let (ledger_tx, _) = pda::ledger_transaction_address(&pool, &maker, &program_id)?;
    let (vault_authority, vault_bump) = pda::vault_authority_address(&program_id)?;
    let (program_config, _) = pda::config_address(&program_id)?;

    log::info!("Pool ({}): {} bump {}", config.currency, pool, pool_bump);
    log::info!("Maker: {} bump {}", maker, maker_bump);
    log::info!("Contribution: {}", contribution);
    log::info!("Ledger transaction: {}", ledger_tx);
    log::info!("Vault authority: {} bump {}", vault_authority, vault_bump);
    log::info!("Vault ({}): {}", mint, pda::vault_address(&program_id, &mint)?);
    log::info!("Program config: {}", program_config);

    let verifier = config.verifier()?;
    match command {
        Some("initialize-config") => {
            let ix = tx_builder::build_initialize_config_instruction(&program_id, &owner, verifier.as_ref())?;
            log_admin_instruction("InitializeConfig", &ix, verifier.as_ref());
            return Ok(());
        }
        Some("set-verifier") => {
            let ix = tx_builder::build_set_verifier_instruction(&program_id, &owner, verifier.as_ref())?;
            log_admin_instruction("SetVerifier", &ix, verifier.as_ref());
            return Ok(());
        }
        _ => {}
    }

    // Onboarding sequence for this wallet as a maker
    let onboarding = [
        tx_builder::build_create_maker_instruction(&program_id, &owner)?,
        tx_builder::build_create_contribution_instruction(&program_id, &owner, currency)?,
        tx_builder::build_create_transaction_instruction(&program_id, &owner, currency)?,
    ];
    for ix in &onboarding {
        log::debug!(
            "Instruction {} with {} accounts, {} data bytes",
            ix.data[0],
            ix.accounts.len(),
            ix.data.len()
        );
    }
    log::info!("Prepared {} onboarding instructions", onboarding.len());

    Ok(())
}

fn log_admin_instruction(name: &str, ix: &Instruction, verifier: Option<&Pubkey>) {
    match verifier {
        Some(v) => log::info!("Prepared {} with verifier {}", name, v),
        None => log::info!("Prepared {} with maker self-attestation", name),
    }
    log::debug!("{} accounts, {} data bytes", ix.accounts.len(), ix.data.len());
}

/// Load wallet keypair from file
fn load_keypair(path: &str) -> Result<Keypair> {
    let expanded_path = shellexpand::tilde(path);
    let bytes = std::fs::read(expanded_path.as_ref())
        .context(format!("Failed to read keypair from {}", path))?;

    let keypair = if bytes.first() == Some(&b'[') {
        // JSON format
        let json_data: Vec<u8> = serde_json::from_slice(&bytes)
            .context("Failed to parse keypair JSON")?;
        Keypair::try_from(&json_data[..])
            .context("Failed to create keypair from bytes")?
    } else {
        // Binary format
        Keypair::try_from(&bytes[..])
            .context("Failed to create keypair from bytes")?
    };

    Ok(keypair)
}
