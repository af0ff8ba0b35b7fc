//! Off-chain client for the liquidity escrow program
//!
//! Derives every account address from public seeds, builds instructions for
//! each program operation and decodes fetched account data. Submitting the
//! resulting transactions is left to the caller.

pub mod accounts;
pub mod config;
pub mod error;
pub mod pda;
pub mod tx_builder;

pub use config::Config;
pub use error::{ClientError, Result};
