//! Client error type

use escrow_model::EscrowError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid pubkey for {field}: {value}")]
    InvalidPubkey { field: &'static str, value: String },

    #[error("currency code must be 3 ASCII bytes, got {0:?}")]
    InvalidCurrency(String),

    #[error("address derivation failed: {0}")]
    Derivation(#[source] EscrowError),

    #[error("account data rejected: {0}")]
    AccountData(#[source] EscrowError),

    #[error("program returned custom error {code}: {message}")]
    Program { code: u32, message: String },
}

impl ClientError {
    /// Map a `ProgramError::Custom` code returned by the program
    pub fn from_program_code(code: u32) -> Self {
        let message = match EscrowError::from_code(code) {
            Some(e) => e.to_string(),
            None => "unknown error code".to_string(),
        };
        Self::Program { code, message }
    }

    /// The escrow error behind a program failure, if the code is known
    pub fn escrow_error(&self) -> Option<EscrowError> {
        match self {
            Self::Program { code, .. } => EscrowError::from_code(*code),
            Self::Derivation(e) | Self::AccountData(e) => Some(*e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_code_round_trip() {
        let err = ClientError::from_program_code(EscrowError::SelfTrade.code());
        assert_eq!(err.escrow_error(), Some(EscrowError::SelfTrade));
        assert_eq!(
            err.to_string(),
            "program returned custom error 5: taker cannot accept their own offer"
        );
    }

    #[test]
    fn test_unknown_program_code() {
        let err = ClientError::from_program_code(999);
        assert_eq!(err.escrow_error(), None);
    }
}
