//! Decoding of fetched program account data

use escrow_common::decode;
use escrow_model::{AccountRecord, Contribution, Maker, Pool, ProgramConfig, Transaction};

use crate::error::{ClientError, Result};

/// Decode a record from raw account data
pub fn decode_record<T: AccountRecord>(data: &[u8]) -> Result<T> {
    decode::<T>(data).map_err(ClientError::AccountData)
}

pub fn decode_pool(data: &[u8]) -> Result<Pool> {
    decode_record(data)
}

pub fn decode_maker(data: &[u8]) -> Result<Maker> {
    decode_record(data)
}

pub fn decode_contribution(data: &[u8]) -> Result<Contribution> {
    decode_record(data)
}

pub fn decode_transaction(data: &[u8]) -> Result<Transaction> {
    decode_record(data)
}

pub fn decode_config(data: &[u8]) -> Result<ProgramConfig> {
    decode_record(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use escrow_common::encode;
    use escrow_model::{EscrowError, TransactionStatus};

    #[test]
    fn test_decode_offer() {
        let offer = Transaction::new_offer([1; 32], [2; 32], 10_000_000, 1_000_000, 7, 254).unwrap();
        let decoded = decode_transaction(&encode(&offer)).unwrap();
        assert_eq!(decoded.status().unwrap(), TransactionStatus::Pending);
        assert_eq!(decoded.amount, 10_000_000);
    }

    #[test]
    fn test_decode_wrong_kind() {
        let data = encode(&Maker::new([1; 32], 255));
        let err = decode_pool(&data).unwrap_err();
        assert_eq!(err.escrow_error(), Some(EscrowError::InvalidAccount));
    }
}
