/// Escrow instruction handlers

pub mod accept_offer;
pub mod cancel_offer;
pub mod create_contribution;
pub mod create_maker;
pub mod create_pool;
pub mod create_transaction;
pub mod deposit_funds;
pub mod initialize_config;
pub mod ledger;
pub mod verify_maker;

pub use accept_offer::*;
pub use cancel_offer::*;
pub use create_contribution::*;
pub use create_maker::*;
pub use create_pool::*;
pub use create_transaction::*;
pub use deposit_funds::*;
pub use initialize_config::*;
pub use ledger::*;
pub use verify_maker::*;

pub use escrow_common::EscrowInstruction;

// Note: Instruction dispatching is handled in entrypoint.rs
// The functions in this module are called from the entrypoint after
// account list and signer validation.
