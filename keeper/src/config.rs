//! Client configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

use crate::error::ClientError;

/// Deployed program address
pub const DEFAULT_PROGRAM_ID: &str = "4B6SCjBKMUvBzv5epJK7GeVfHGwGZb5EdEVxGbZakb7u";

/// Devnet USDC mint
pub const DEFAULT_MINT: &str = "4zMMC9srt5Ri5X14GAgXhaHii3GnPAEERYPJgZJDncDU";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// RPC URL for Solana cluster
    pub rpc_url: String,

    /// Escrow program ID
    pub program_id: String,

    /// Wallet keypair path
    pub keypair_path: String,

    /// 3-letter pool currency code
    pub currency: String,

    /// Mint of the escrowed token
    pub mint: String,

    /// Verifier identity for InitializeConfig; unset keeps self-attestation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verifier: Option<String>,
}

fn parse_pubkey(field: &'static str, value: &str) -> std::result::Result<Pubkey, ClientError> {
    Pubkey::from_str(value).map_err(|_| ClientError::InvalidPubkey {
        field,
        value: value.to_string(),
    })
}

impl Config {
    /// Load configuration from TOML file
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("ESCROW_CONFIG")
            .unwrap_or_else(|_| "escrow-config.toml".to_string());

        let config_str = std::fs::read_to_string(&config_path)
            .context(format!("Failed to read config file: {}", config_path))?;

        let config: Config = toml::from_str(&config_str)
            .context("Failed to parse config TOML")?;

        Ok(config)
    }

    /// Create default configuration
    pub fn default_devnet() -> Self {
        Self {
            rpc_url: "https://api.devnet.solana.com".to_string(),
            program_id: DEFAULT_PROGRAM_ID.to_string(),
            keypair_path: "~/.config/solana/id.json".to_string(),
            currency: "USD".to_string(),
            mint: DEFAULT_MINT.to_string(),
            verifier: None,
        }
    }

    /// Write default config to file
    pub fn write_default(path: &str) -> Result<()> {
        let config = Self::default_devnet();
        let toml_str = toml::to_string_pretty(&config)
            .context("Failed to serialize config")?;

        std::fs::write(path, toml_str)
            .context(format!("Failed to write config to {}", path))?;

        log::info!("Created default config at {}", path);
        Ok(())
    }

    pub fn program_id(&self) -> std::result::Result<Pubkey, ClientError> {
        parse_pubkey("program_id", &self.program_id)
    }

    pub fn mint(&self) -> std::result::Result<Pubkey, ClientError> {
        parse_pubkey("mint", &self.mint)
    }

    pub fn verifier(&self) -> std::result::Result<Option<Pubkey>, ClientError> {
        self.verifier
            .as_deref()
            .map(|v| parse_pubkey("verifier", v))
            .transpose()
    }

    pub fn currency(&self) -> std::result::Result<[u8; 3], ClientError> {
        let bytes = self.currency.as_bytes();
        match bytes {
            [a, b, c] if bytes.is_ascii() => Ok([*a, *b, *c]),
            _ => Err(ClientError::InvalidCurrency(self.currency.clone())),
        }
    }
}
