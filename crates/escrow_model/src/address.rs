//! Program-derived address scheme
//!
//! `address = sha256(seeds.. || [bump] || program_id || "ProgramDerivedAddress")`,
//! accepted only when the 32 bytes do not decompress to an ed25519 point, so no
//! keypair can ever sign for it. This byte-matches Solana's
//! `find_program_address`, which means any client can recompute an account's
//! address from public seeds.

use curve25519_dalek::edwards::CompressedEdwardsY;
use sha2::{Digest, Sha256};

use crate::error::EscrowError;

/// 32-byte account identifier (same layout as a Solana pubkey)
pub type Address = [u8; 32];

/// Maximum number of seeds, bump included
pub const MAX_SEEDS: usize = 16;

/// Maximum length of a single seed
pub const MAX_SEED_LEN: usize = 32;

/// Domain separator appended to every derivation hash
pub const PDA_MARKER: &[u8; 21] = b"ProgramDerivedAddress";

/// True when `bytes` is a valid compressed ed25519 point (i.e. has a private key)
pub fn is_on_curve(bytes: &Address) -> bool {
    CompressedEdwardsY(*bytes).decompress().is_some()
}

/// Hash `tag || seeds || [bump]` under `program_id` and reject on-curve results.
pub fn create_address(
    tag: &[u8],
    seeds: &[&[u8]],
    bump: u8,
    program_id: &Address,
) -> Result<Address, EscrowError> {
    // tag + seeds + bump
    if seeds.len() + 2 > MAX_SEEDS {
        return Err(EscrowError::InvalidSeeds);
    }
    if tag.len() > MAX_SEED_LEN || seeds.iter().any(|s| s.len() > MAX_SEED_LEN) {
        return Err(EscrowError::InvalidSeeds);
    }

    let mut hasher = Sha256::new();
    hasher.update(tag);
    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update([bump]);
    hasher.update(program_id);
    hasher.update(PDA_MARKER);

    let address: Address = hasher.finalize().into();
    if is_on_curve(&address) {
        return Err(EscrowError::DerivationExhausted);
    }
    Ok(address)
}

/// Derive the canonical address for `tag || seeds` under `program_id`.
///
/// The bump search runs from 255 down to 1 and returns the first off-curve
/// hit, so the result is the same bump Solana clients compute.
///
/// # Errors
///
/// `InvalidSeeds` for malformed seeds, `DerivationExhausted` when every bump
/// lands on the curve.
pub fn derive_address(
    tag: &[u8],
    seeds: &[&[u8]],
    program_id: &Address,
) -> Result<(Address, u8), EscrowError> {
    for bump in (1..=u8::MAX).rev() {
        match create_address(tag, seeds, bump, program_id) {
            Ok(address) => return Ok((address, bump)),
            Err(EscrowError::DerivationExhausted) => continue,
            Err(e) => return Err(e),
        }
    }
    Err(EscrowError::DerivationExhausted)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROGRAM: Address = [7u8; 32];

    #[test]
    fn test_derivation_is_deterministic() {
        let a = derive_address(b"maker", &[&[1u8; 32]], &PROGRAM).unwrap();
        let b = derive_address(b"maker", &[&[1u8; 32]], &PROGRAM).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_derived_address_is_off_curve() {
        let (address, bump) = derive_address(b"pool", &[b"USD"], &PROGRAM).unwrap();
        assert!(!is_on_curve(&address));
        assert_eq!(create_address(b"pool", &[b"USD"], bump, &PROGRAM).unwrap(), address);
    }

    #[test]
    fn test_seed_order_matters() {
        let a = [1u8; 32];
        let b = [2u8; 32];
        let (ab, _) = derive_address(b"contribution", &[&a, &b], &PROGRAM).unwrap();
        let (ba, _) = derive_address(b"contribution", &[&b, &a], &PROGRAM).unwrap();
        assert_ne!(ab, ba);
    }

    #[test]
    fn test_program_id_separates_namespaces() {
        let (a, _) = derive_address(b"program_authority", &[], &PROGRAM).unwrap();
        let (b, _) = derive_address(b"program_authority", &[], &[8u8; 32]).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_rejects_long_seed() {
        let long = [0u8; 33];
        assert_eq!(
            derive_address(b"pool", &[&long], &PROGRAM),
            Err(EscrowError::InvalidSeeds)
        );
    }

    #[test]
    fn test_rejects_too_many_seeds() {
        let seed = [0u8; 1];
        let seeds: [&[u8]; 15] = [&seed; 15];
        assert_eq!(
            derive_address(b"pool", &seeds, &PROGRAM),
            Err(EscrowError::InvalidSeeds)
        );
    }

    #[test]
    fn test_identity_point_is_on_curve() {
        // Compressed encoding of the ed25519 identity (y = 1)
        let mut identity = [0u8; 32];
        identity[0] = 1;
        assert!(is_on_curve(&identity));
    }
}
