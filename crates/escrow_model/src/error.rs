//! Escrow error taxonomy
//!
//! Codes are stable: the on-chain program surfaces them as
//! `ProgramError::Custom(code)` and clients map them back with [`EscrowError::from_code`].

use core::fmt;

#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EscrowError {
    /// Derived address is already initialized
    AlreadyExists = 0,
    /// Expected account is missing or uninitialized
    NotFound = 1,
    /// Status precondition violated
    InvalidState = 2,
    /// Signer does not match the stored identity
    Unauthorized = 3,
    /// Maker has not passed the verification gate
    Unverified = 4,
    /// Taker and maker are the same identity
    SelfTrade = 5,
    /// Arithmetic bound exceeded
    Overflow = 6,
    /// Token transfer source balance too small
    InsufficientFunds = 7,
    /// No bump in the search space yields an off-curve address
    DerivationExhausted = 8,
    /// Amount must be non-zero
    InvalidAmount = 9,
    /// Account reference does not match its derived address, owner, mint or size
    InvalidAccount = 10,
    /// Unknown discriminator or truncated instruction data
    InvalidInstruction = 11,
    /// Too many seeds, or a seed longer than 32 bytes
    InvalidSeeds = 12,
    /// A required signer did not sign
    MissingSignature = 13,
}

impl EscrowError {
    pub const fn code(self) -> u32 {
        self as u32
    }

    pub fn from_code(code: u32) -> Option<Self> {
        let err = match code {
            0 => Self::AlreadyExists,
            1 => Self::NotFound,
            2 => Self::InvalidState,
            3 => Self::Unauthorized,
            4 => Self::Unverified,
            5 => Self::SelfTrade,
            6 => Self::Overflow,
            7 => Self::InsufficientFunds,
            8 => Self::DerivationExhausted,
            9 => Self::InvalidAmount,
            10 => Self::InvalidAccount,
            11 => Self::InvalidInstruction,
            12 => Self::InvalidSeeds,
            13 => Self::MissingSignature,
            _ => return None,
        };
        Some(err)
    }
}

impl fmt::Display for EscrowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::AlreadyExists => "account already exists",
            Self::NotFound => "account not found",
            Self::InvalidState => "transaction is not in the required state",
            Self::Unauthorized => "signer is not authorized for this account",
            Self::Unverified => "maker is not verified",
            Self::SelfTrade => "taker cannot accept their own offer",
            Self::Overflow => "arithmetic overflow",
            Self::InsufficientFunds => "insufficient funds",
            Self::DerivationExhausted => "no valid bump found for address derivation",
            Self::InvalidAmount => "amount must be greater than zero",
            Self::InvalidAccount => "invalid account",
            Self::InvalidInstruction => "invalid instruction",
            Self::InvalidSeeds => "invalid derivation seeds",
            Self::MissingSignature => "missing required signature",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for EscrowError {}

#[cfg(feature = "pinocchio")]
impl From<EscrowError> for pinocchio::program_error::ProgramError {
    fn from(e: EscrowError) -> Self {
        pinocchio::program_error::ProgramError::Custom(e.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for code in 0..14 {
            let err = EscrowError::from_code(code).unwrap();
            assert_eq!(err.code(), code);
        }
        assert_eq!(EscrowError::from_code(14), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(EscrowError::SelfTrade.to_string(), "taker cannot accept their own offer");
    }
}
