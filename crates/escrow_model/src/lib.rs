//! Pure Rust model of the liquidity escrow protocol
//! No Solana runtime dependencies, no unwrap/panic, all transitions atomic

pub mod address;
pub mod error;
pub mod helpers;
pub mod host;
pub mod math;
pub mod seeds;
pub mod state;
pub mod tokens;
pub mod transitions;

// Re-export commonly used types
pub use address::{derive_address, Address};
pub use error::EscrowError;
pub use host::{Record, Signer, State};
pub use state::*;
pub use tokens::{TokenAccountId, TokenBank, TokenLedger};
