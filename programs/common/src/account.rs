//! Account validation and record (de)serialization helpers

use escrow_model::{AccountKind, AccountRecord};
use pinocchio::{account_info::AccountInfo, pubkey::Pubkey};

use crate::EscrowError;

/// Validate that an account signed the transaction
#[inline]
pub fn validate_signer(account: &AccountInfo) -> Result<(), EscrowError> {
    if !account.is_signer() {
        return Err(EscrowError::MissingSignature);
    }
    Ok(())
}

/// Validate that an account is writable
#[inline]
pub fn validate_writable(account: &AccountInfo) -> Result<(), EscrowError> {
    if !account.is_writable() {
        return Err(EscrowError::InvalidAccount);
    }
    Ok(())
}

/// Validate that an account is owned by the given program
#[inline]
pub fn validate_owner(account: &AccountInfo, owner: &Pubkey) -> Result<(), EscrowError> {
    if !account.is_owned_by(owner) {
        return Err(EscrowError::InvalidAccount);
    }
    Ok(())
}

/// Validate that an account key matches the expected address
#[inline]
pub fn validate_key(account: &AccountInfo, expected: &Pubkey) -> Result<(), EscrowError> {
    if account.key() != expected {
        return Err(EscrowError::InvalidAccount);
    }
    Ok(())
}

/// Validate that an account holds no record yet
///
/// Fresh PDAs have no data; an allocated account counts as free only while
/// its discriminator byte is zero.
pub fn validate_uninitialized(account: &AccountInfo) -> Result<(), EscrowError> {
    if account.data_is_empty() {
        return Ok(());
    }
    let data = account
        .try_borrow_data()
        .map_err(|_| EscrowError::InvalidAccount)?;
    if data[0] != AccountKind::Uninitialized as u8 {
        return Err(EscrowError::AlreadyExists);
    }
    Ok(())
}

/// Read a record out of a program-owned account
///
/// Empty or zero-discriminator accounts are reported as `NotFound`; a record
/// of the wrong kind as `InvalidAccount`.
pub fn load<T: AccountRecord>(account: &AccountInfo, program_id: &Pubkey) -> Result<T, EscrowError> {
    if account.data_is_empty() {
        return Err(EscrowError::NotFound);
    }
    validate_owner(account, program_id)?;

    let data = account
        .try_borrow_data()
        .map_err(|_| EscrowError::InvalidAccount)?;
    if data[0] == AccountKind::Uninitialized as u8 {
        return Err(EscrowError::NotFound);
    }
    if data[0] != T::KIND as u8 || data.len() < T::LEN {
        return Err(EscrowError::InvalidAccount);
    }

    // SAFETY: length checked above; records are plain integer/byte-array structs
    Ok(unsafe { core::ptr::read_unaligned(data.as_ptr() as *const T) })
}

/// Write a record into a program-owned account
pub fn store<T: AccountRecord>(account: &AccountInfo, record: &T) -> Result<(), EscrowError> {
    let mut data = account
        .try_borrow_mut_data()
        .map_err(|_| EscrowError::InvalidAccount)?;
    if data.len() < T::LEN {
        return Err(EscrowError::InvalidAccount);
    }

    // SAFETY: length checked above
    unsafe { core::ptr::write_unaligned(data.as_mut_ptr() as *mut T, *record) };
    Ok(())
}

/// Decode a record from raw account bytes (off-chain readers)
pub fn decode<T: AccountRecord>(data: &[u8]) -> Result<T, EscrowError> {
    match data.first() {
        None => Err(EscrowError::NotFound),
        Some(&b) if b == AccountKind::Uninitialized as u8 => Err(EscrowError::NotFound),
        Some(&b) if b != T::KIND as u8 || data.len() < T::LEN => Err(EscrowError::InvalidAccount),
        // SAFETY: length checked above
        Some(_) => Ok(unsafe { core::ptr::read_unaligned(data.as_ptr() as *const T) }),
    }
}

/// Raw bytes of a record, as written by [`store`]
pub fn encode<T: AccountRecord>(record: &T) -> alloc::vec::Vec<u8> {
    let mut data = alloc::vec![0u8; T::LEN];
    // SAFETY: buffer is exactly T::LEN bytes
    unsafe { core::ptr::write_unaligned(data.as_mut_ptr() as *mut T, *record) };
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use escrow_model::{Maker, Pool, Transaction};

    #[test]
    fn test_decode_written_pool() {
        let mut pool = Pool::new([7; 32], *b"USD", 1_000_000, 254);
        pool.credit(500).unwrap();
        let data = encode(&pool);
        assert_eq!(data.len(), Pool::LEN);
        assert_eq!(data[0], AccountKind::Pool as u8);
        assert_eq!(decode::<Pool>(&data).unwrap(), pool);
    }

    #[test]
    fn test_decode_rejects_other_kind() {
        let data = encode(&Maker::new([1; 32], 255));
        assert_eq!(decode::<Pool>(&data).unwrap_err(), EscrowError::InvalidAccount);
        assert_eq!(decode::<Transaction>(&data).unwrap_err(), EscrowError::InvalidAccount);
    }

    #[test]
    fn test_decode_uninitialized() {
        assert_eq!(decode::<Maker>(&[]).unwrap_err(), EscrowError::NotFound);
        assert_eq!(decode::<Maker>(&[0u8; 40]).unwrap_err(), EscrowError::NotFound);
    }

    #[test]
    fn test_decode_short_buffer() {
        let data = encode(&Maker::new([1; 32], 255));
        assert_eq!(decode::<Maker>(&data[..20]).unwrap_err(), EscrowError::InvalidAccount);
    }
}
