#![cfg_attr(target_os = "solana", no_std)]

pub mod instructions;
pub mod pda;
pub mod system;
pub mod token;

// Always expose entrypoint for testing, but only register as entrypoint when feature enabled
pub mod entrypoint;

// Panic handler for no_std builds (only for Solana BPF)
#[cfg(all(target_os = "solana", not(test)))]
#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
    loop {}
}

pub use instructions::*;

pinocchio_pubkey::declare_id!("4B6SCjBKMUvBzv5epJK7GeVfHGwGZb5EdEVxGbZakb7u");

/// Deployment admin: the only signer allowed to create or change the program config
pub const ADMIN: pinocchio::pubkey::Pubkey =
    pinocchio_pubkey::pubkey!("DopriX5bpaPmutNnbxf3scduGUZKrZWpvb286WK8p1SY");
