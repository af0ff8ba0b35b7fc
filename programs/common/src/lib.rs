#![no_std]

extern crate alloc;

pub mod account;
pub mod instruction;

pub use account::*;
pub use instruction::*;
pub use escrow_model::EscrowError;
