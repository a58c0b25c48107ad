//! Cache geometry.
//!
//! A cache is a table of `num_sets × 2^address_bits` slots. Every key maps to
//! one address (a column of the table) and may live in any of the `num_sets`
//! ways at that address:
//!
//! ```text
//!              address 0   address 1   ...   address 2^bits - 1
//!   set 0      [ slot ]    [ slot ]    ...   [ slot ]
//!   set 1      [ slot ]    [ slot ]    ...   [ slot ]
//!   ...
//!   set n-1    [ slot ]    [ slot ]    ...   [ slot ]
//! ```
//!
//! Use `num_sets = 1` for a direct-mapped cache and `address_bits = 0` for a
//! fully associative one.

use crate::error::{CacheError, Result};

/// Largest supported number of address bits.
///
/// The slot table is pre-allocated, so `2^bits` columns must fit in memory
/// and every address must fit in a `usize` on all targets.
pub const MAX_ADDRESS_BITS: u32 = 31;

/// Default geometry: 4 sets × 2^4 addresses = 64 slots.
const DEFAULT_SETS: usize = 4;
const DEFAULT_ADDRESS_BITS: u32 = 4;

/// Immutable construction-time configuration of a [`Cache`][crate::cache::Cache].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Options {
    num_sets: usize,
    address_bits: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            num_sets: DEFAULT_SETS,
            address_bits: DEFAULT_ADDRESS_BITS,
        }
    }
}

impl Options {
    /// Creates options for a cache with `num_sets` ways per address and
    /// `2^address_bits` addresses.
    ///
    /// # Errors
    ///
    /// - [`CacheError::NoSets`] if `num_sets == 0`.
    /// - [`CacheError::AddressBitsTooLarge`] if `address_bits > MAX_ADDRESS_BITS`.
    /// - [`CacheError::CapacityOverflow`] if the slot count does not fit in a `usize`.
    pub fn new(num_sets: usize, address_bits: u32) -> Result<Self> {
        if num_sets == 0 {
            return Err(CacheError::NoSets);
        }
        if address_bits > MAX_ADDRESS_BITS {
            return Err(CacheError::AddressBitsTooLarge {
                bits: address_bits,
                max: MAX_ADDRESS_BITS,
            });
        }
        if num_sets.checked_mul(1usize << address_bits).is_none() {
            return Err(CacheError::CapacityOverflow { num_sets, address_bits });
        }
        Ok(Self { num_sets, address_bits })
    }

    /// Number of ways sharing each address (the associativity).
    pub fn num_sets(&self) -> usize {
        self.num_sets
    }

    /// Number of least-significant key bits used as the address.
    pub fn address_bits(&self) -> u32 {
        self.address_bits
    }

    /// Number of distinct addresses, `2^address_bits`.
    pub fn num_addresses(&self) -> usize {
        1usize << self.address_bits
    }

    /// Total number of slots, `num_sets × 2^address_bits`.
    pub fn capacity(&self) -> usize {
        self.num_sets * self.num_addresses()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_new() {
        let options = Options::new(4, 2).unwrap();
        assert_eq!(options.num_sets(), 4);
        assert_eq!(options.address_bits(), 2);
        assert_eq!(options.num_addresses(), 4);
        assert_eq!(options.capacity(), 16);
    }

    #[test]
    fn test_options_fully_associative() {
        let options = Options::new(8, 0).unwrap();
        assert_eq!(options.num_addresses(), 1);
        assert_eq!(options.capacity(), 8);
    }

    #[test]
    fn test_options_default() {
        let options = Options::default();
        assert_eq!(options.num_sets(), 4);
        assert_eq!(options.address_bits(), 4);
        assert_eq!(options.capacity(), 64);
    }

    #[test]
    fn test_options_zero_sets() {
        assert_eq!(Options::new(0, 3), Err(CacheError::NoSets));
    }

    #[test]
    fn test_options_too_many_bits() {
        assert!(Options::new(1, MAX_ADDRESS_BITS).is_ok());
        assert_eq!(
            Options::new(1, MAX_ADDRESS_BITS + 1),
            Err(CacheError::AddressBitsTooLarge { bits: 32, max: 31 })
        );
    }

    #[test]
    fn test_options_capacity_overflow() {
        let num_sets = usize::MAX / 2 + 1;
        assert_eq!(
            Options::new(num_sets, 1),
            Err(CacheError::CapacityOverflow { num_sets, address_bits: 1 })
        );
        assert_eq!(
            Options::new(usize::MAX, MAX_ADDRESS_BITS),
            Err(CacheError::CapacityOverflow {
                num_sets: usize::MAX,
                address_bits: MAX_ADDRESS_BITS,
            })
        );

        let options = Options::new(usize::MAX / 2, 1).unwrap();
        assert_eq!(options.capacity(), usize::MAX - 1);
    }
}
