//! # nway-cache: N-way set-associative cache in Rust
//!
//! **`nway-cache`** is a fixed-capacity, in-process key/value cache modeled on
//! hardware set-associative caches. Memory is split into `2^n` addresses, each
//! holding a fixed number of ways (sets). A key is mapped to an address by
//! taking the `n` least significant bits of its byte encoding, and may live in
//! any way at that address.
//!
//! ## Key Features
//!
//! - **Predictable addressing**: No hashing. The address is the literal low bits of the key's
//!   [byte encoding][crate::bytes], so it is reproducible across runs and platforms.
//! - **Pluggable replacement**: When all ways at an address are taken, a
//!   [`ReplacementPolicy`][crate::policy::ReplacementPolicy] chooses the victim (LRU/MRU by
//!   timestamp or by logical access sequence), or bring your own.
//! - **Pluggable encoding**: Keys are encoded through a [`ByteEncoder`][crate::bytes::ByteEncoder],
//!   with stable defaults for integers, floats and strings.
//! - **Fixed memory**: The slot table is allocated once and never resized.
//!
//! The cache is not a write-through cache: it never talks to a backing store.
//! It is single-threaded; wrap it in a mutex to share it.
//!
//! ## Basic Usage
//!
//! ```rust
//! use nway_cache::cache::Cache;
//! use nway_cache::options::Options;
//! use nway_cache::policy::Policy;
//!
//! // 4 ways per address, 2^2 = 4 addresses: 16 slots in total.
//! let options = Options::new(4, 2)?;
//! let mut cache = Cache::<String, u64, _>::with_policy(options, Policy::Lru);
//!
//! cache.write("alpha".to_string(), 1)?;
//! cache.write("beta".to_string(), 2)?;
//!
//! assert_eq!(cache.read(&"alpha".to_string())?, Some(&1));
//! assert_eq!(cache.read(&"gamma".to_string())?, None);
//! # Ok::<(), nway_cache::error::CacheError>(())
//! ```
//!
//! ## Core Components
//!
//! - **[`cache`]**: The [`Cache`][crate::cache::Cache] facade with `read` and `write`.
//! - **[`memory`]**: The slot table and the per-address insert/collision/eviction logic.
//! - **[`indexer`]**: Key-to-address mapping.
//! - **[`policy`]**: Replacement policies.
//! - **[`bytes`]**: Key-to-bytes encodings.

pub mod bytes;
pub mod cache;
pub mod error;
pub mod indexer;
pub mod memory;
pub mod options;
pub mod policy;
pub mod slot;
