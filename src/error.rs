//! Error type shared by every fallible cache operation.

use thiserror::Error;

/// Errors reported by the cache.
///
/// Key-related errors come out of address derivation and surface directly
/// from [`Cache::read`][crate::cache::Cache::read] and
/// [`Cache::write`][crate::cache::Cache::write]. Option errors come out of
/// [`Options::new`][crate::options::Options::new].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// The key encoder reported that no key is present.
    #[error("key is missing")]
    InvalidKey,

    /// The requested number of address bits cannot be taken from the key encoding.
    #[error("cannot take {bits} address bits from a {available}-bit key encoding")]
    AddressOutOfRange { bits: u32, available: u64 },

    /// The cache must have at least one set.
    #[error("number of sets must be at least 1")]
    NoSets,

    /// The address table would be too large to allocate.
    #[error("address bits must be in range 0..={max}, got {bits}")]
    AddressBitsTooLarge { bits: u32, max: u32 },

    /// `num_sets × 2^address_bits` does not fit in a `usize`.
    #[error("{num_sets} sets × 2^{address_bits} addresses overflows the slot table size")]
    CapacityOverflow { num_sets: usize, address_bits: u32 },

    /// The replacement policy found nothing to evict at a full address.
    #[error("no eviction candidate at address {address}")]
    NoCandidate { address: usize },
}

pub type Result<T, E = CacheError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_address_out_of_range() {
        let err = CacheError::AddressOutOfRange { bits: 32, available: 32 };
        assert_eq!(err.to_string(), "cannot take 32 address bits from a 32-bit key encoding");
    }

    #[test]
    fn test_display_options_errors() {
        assert_eq!(CacheError::NoSets.to_string(), "number of sets must be at least 1");
        let err = CacheError::AddressBitsTooLarge { bits: 40, max: 31 };
        assert!(err.to_string().contains("0..=31"));
        assert!(err.to_string().contains("40"));
        let err = CacheError::CapacityOverflow { num_sets: 3, address_bits: 31 };
        assert_eq!(err.to_string(), "3 sets × 2^31 addresses overflows the slot table size");
    }

    #[test]
    fn test_implements_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<CacheError>();
    }
}
