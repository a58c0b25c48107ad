//! Key-to-address mapping.
//!
//! The address of a key is the `n` least significant bits of its byte
//! encoding, read as one arbitrary-precision unsigned integer in
//! little-endian order:
//!
//! ```text
//! address(key) = bytes(key) & ((1 << n) - 1)
//! ```
//!
//! No hashing is involved: two keys share an address iff their lowest `n` bits
//! are equal. For a fixed `n` the address is a pure function of the key bytes.
//!
//! # Examples
//!
//! ```
//! use nway_cache::indexer::address_of;
//!
//! assert_eq!(address_of(&1i32, 1).unwrap(), 1);
//! assert_eq!(address_of(&2i32, 1).unwrap(), 0);
//! assert_eq!(address_of(&2i32, 2).unwrap(), 2);
//! assert!(address_of(&1i32, 32).is_err());
//! ```

use log::trace;
use num_bigint::BigUint;

use crate::bytes::{ByteEncoder, KeyBytes, NativeEncoder};
use crate::error::{CacheError, Result};

/// Takes the `bits` least significant bits of `bytes` as an address.
///
/// An empty encoding has exactly zero bits, so it maps to address `0` when
/// `bits == 0`.
///
/// # Errors
///
/// [`CacheError::AddressOutOfRange`] if `bits >= 8 * bytes.len()` (except for
/// the empty encoding with `bits == 0`), or if the address does not fit in a
/// `usize`.
pub fn address(bytes: &[u8], bits: u32) -> Result<usize> {
    let available = 8 * bytes.len() as u64;
    if bytes.is_empty() {
        return if bits == 0 {
            Ok(0)
        } else {
            Err(CacheError::AddressOutOfRange { bits, available })
        };
    }
    if u64::from(bits) >= available {
        return Err(CacheError::AddressOutOfRange { bits, available });
    }

    // Only the low `ceil(bits / 8)` bytes can contribute to the address.
    let low = &bytes[..(bits as usize).div_ceil(8)];
    let value = BigUint::from_bytes_le(low);
    let mask = (BigUint::from(1u8) << bits) - 1u8;
    let masked = value & mask;

    usize::try_from(&masked).map_err(|_| CacheError::AddressOutOfRange { bits, available })
}

/// Computes the address of `key` using a custom encoder.
///
/// # Errors
///
/// - [`CacheError::InvalidKey`] if the encoder reports an absent key.
/// - [`CacheError::AddressOutOfRange`] as for [`address`].
pub fn address_with<K, E>(key: &K, bits: u32, encoder: &E) -> Result<usize>
where
    K: ?Sized,
    E: ByteEncoder<K> + ?Sized,
{
    let bytes = encoder.encode(key).ok_or(CacheError::InvalidKey)?;
    let address = address(&bytes, bits)?;
    trace!("address(bytes = {:02x?}, bits = {}) = {}", bytes, bits, address);
    Ok(address)
}

/// Computes the address of `key` using its native [`KeyBytes`] encoding.
pub fn address_of<K: KeyBytes + ?Sized>(key: &K, bits: u32) -> Result<usize> {
    address_with(key, bits, &NativeEncoder)
}
