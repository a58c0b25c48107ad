//! Key-to-bytes encodings.
//!
//! The cache never hashes keys. The address of a key is taken from the low
//! bits of its byte encoding, so the encoding has to be explicit and stable:
//! the same key must produce the same bytes on every run and every platform.
//!
//! Encodings are **little-endian**: byte 0 holds the least significant bits.
//!
//! # Default encodings
//!
//! | Type | Encoding |
//! |------|----------|
//! | `u8`..`u128`, `i8`..`i128` | fixed width, two's complement |
//! | `usize`, `isize` | widened to 8 bytes |
//! | `f32`, `f64` | IEEE-754 bit pattern |
//! | `bool` | one byte, `0` or `1` |
//! | `char`, `str`, `String` | UTF-16 code units, 2 bytes each |
//! | `[u8]`, `[u8; N]`, `Vec<u8>` | as-is |
//! | `Option<T>` | encoding of `T`; `None` is an absent key |
//!
//! Any other encoding can be plugged in through [`ByteEncoder`], for example
//! with [`FnEncoder`] wrapping a closure.

use std::borrow::Cow;

/// Types with a canonical byte encoding.
pub trait KeyBytes {
    /// Returns the little-endian encoding of the key, or `None` if no key is present.
    fn key_bytes(&self) -> Option<Cow<'_, [u8]>>;
}

macro_rules! impl_key_bytes_le {
    ($($t:ty),* $(,)?) => {
        $(
            impl KeyBytes for $t {
                fn key_bytes(&self) -> Option<Cow<'_, [u8]>> {
                    Some(Cow::Owned(self.to_le_bytes().to_vec()))
                }
            }
        )*
    };
}

impl_key_bytes_le!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128, f32, f64);

impl KeyBytes for usize {
    fn key_bytes(&self) -> Option<Cow<'_, [u8]>> {
        Some(Cow::Owned((*self as u64).to_le_bytes().to_vec()))
    }
}

impl KeyBytes for isize {
    fn key_bytes(&self) -> Option<Cow<'_, [u8]>> {
        Some(Cow::Owned((*self as i64).to_le_bytes().to_vec()))
    }
}

impl KeyBytes for bool {
    fn key_bytes(&self) -> Option<Cow<'_, [u8]>> {
        Some(Cow::Owned(vec![u8::from(*self)]))
    }
}

impl KeyBytes for char {
    fn key_bytes(&self) -> Option<Cow<'_, [u8]>> {
        let mut units = [0u16; 2];
        let units = self.encode_utf16(&mut units);
        Some(Cow::Owned(units.iter().flat_map(|u| u.to_le_bytes()).collect()))
    }
}

impl KeyBytes for str {
    fn key_bytes(&self) -> Option<Cow<'_, [u8]>> {
        Some(Cow::Owned(self.encode_utf16().flat_map(u16::to_le_bytes).collect()))
    }
}

impl KeyBytes for String {
    fn key_bytes(&self) -> Option<Cow<'_, [u8]>> {
        self.as_str().key_bytes()
    }
}

impl KeyBytes for [u8] {
    fn key_bytes(&self) -> Option<Cow<'_, [u8]>> {
        Some(Cow::Borrowed(self))
    }
}

impl<const N: usize> KeyBytes for [u8; N] {
    fn key_bytes(&self) -> Option<Cow<'_, [u8]>> {
        Some(Cow::Borrowed(self))
    }
}

impl KeyBytes for Vec<u8> {
    fn key_bytes(&self) -> Option<Cow<'_, [u8]>> {
        Some(Cow::Borrowed(self))
    }
}

impl<T: KeyBytes + ?Sized> KeyBytes for &T {
    fn key_bytes(&self) -> Option<Cow<'_, [u8]>> {
        (**self).key_bytes()
    }
}

impl<T: KeyBytes + ?Sized> KeyBytes for Box<T> {
    fn key_bytes(&self) -> Option<Cow<'_, [u8]>> {
        (**self).key_bytes()
    }
}

impl<T: KeyBytes> KeyBytes for Option<T> {
    fn key_bytes(&self) -> Option<Cow<'_, [u8]>> {
        self.as_ref().and_then(KeyBytes::key_bytes)
    }
}

/// Strategy turning a key into the bytes its address is taken from.
pub trait ByteEncoder<K: ?Sized> {
    /// Encodes `key`, returning `None` if no key is present.
    fn encode<'k>(&self, key: &'k K) -> Option<Cow<'k, [u8]>>;
}

/// Encoder delegating to the key's own [`KeyBytes`] implementation.
#[derive(Debug, Default, Copy, Clone)]
pub struct NativeEncoder;

impl<K: KeyBytes + ?Sized> ByteEncoder<K> for NativeEncoder {
    fn encode<'k>(&self, key: &'k K) -> Option<Cow<'k, [u8]>> {
        key.key_bytes()
    }
}

/// Encoder using the UTF-8 bytes of string keys instead of UTF-16.
#[derive(Debug, Default, Copy, Clone)]
pub struct Utf8Encoder;

impl<K: AsRef<str> + ?Sized> ByteEncoder<K> for Utf8Encoder {
    fn encode<'k>(&self, key: &'k K) -> Option<Cow<'k, [u8]>> {
        Some(Cow::Borrowed(key.as_ref().as_bytes()))
    }
}

/// Encoder backed by a closure.
///
/// ```
/// use nway_cache::bytes::{ByteEncoder, FnEncoder};
///
/// let encoder = FnEncoder(|key: &u32| key.to_be_bytes().to_vec());
/// assert_eq!(encoder.encode(&1).unwrap().as_ref(), &[0, 0, 0, 1]);
/// ```
#[derive(Debug, Copy, Clone)]
pub struct FnEncoder<F>(pub F);

impl<K: ?Sized, F: Fn(&K) -> Vec<u8>> ByteEncoder<K> for FnEncoder<F> {
    fn encode<'k>(&self, key: &'k K) -> Option<Cow<'k, [u8]>> {
        Some(Cow::Owned((self.0)(key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes<K: KeyBytes + ?Sized>(key: &K) -> Vec<u8> {
        key.key_bytes().unwrap().into_owned()
    }

    #[test]
    fn test_integers_are_little_endian() {
        assert_eq!(bytes(&1i32), vec![1, 0, 0, 0]);
        assert_eq!(bytes(&0x0102u16), vec![2, 1]);
        assert_eq!(bytes(&-1i8), vec![0xFF]);
        assert_eq!(bytes(&7u64).len(), 8);
    }

    #[test]
    fn test_pointer_sized_integers_are_widened() {
        assert_eq!(bytes(&5usize), bytes(&5u64));
        assert_eq!(bytes(&-5isize), bytes(&-5i64));
        assert_eq!(bytes(&1usize), vec![1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(bytes(&-1isize), vec![0xFF; 8]);
    }

    #[test]
    fn test_floats_use_bit_pattern() {
        assert_eq!(bytes(&1.5f64), 1.5f64.to_bits().to_le_bytes().to_vec());
        assert_eq!(bytes(&-0.0f32), (-0.0f32).to_bits().to_le_bytes().to_vec());
    }

    #[test]
    fn test_strings_are_utf16() {
        assert_eq!(bytes("1"), vec![0x31, 0x00]);
        assert_eq!(bytes(&String::from("ab")), vec![0x61, 0x00, 0x62, 0x00]);
        assert_eq!(bytes("\u{FF}"), vec![0xFF, 0x00]);
        assert!(bytes("").is_empty());
    }

    #[test]
    fn test_char_matches_str() {
        assert_eq!(bytes(&'x'), bytes("x"));
        assert_eq!(bytes(&'😀'), bytes("😀"));
        assert_eq!(bytes(&'😀').len(), 4);
    }

    #[test]
    fn test_byte_slices_are_borrowed() {
        let raw = vec![1u8, 2, 3];
        assert!(matches!(raw.key_bytes(), Some(Cow::Borrowed(_))));
        assert_eq!(bytes(&[9u8, 8]), vec![9, 8]);
    }

    #[test]
    fn test_option_none_is_absent() {
        assert_eq!(None::<u32>.key_bytes(), None);
        assert_eq!(bytes(&Some(3u8)), vec![3]);
    }

    #[test]
    fn test_references_and_boxes_delegate() {
        let key: Box<str> = "k".into();
        assert_eq!(bytes(&key), bytes("k"));
        assert_eq!(bytes(&&42u32), bytes(&42u32));
    }

    #[test]
    fn test_native_encoder() {
        let encoder = NativeEncoder;
        assert_eq!(encoder.encode(&2u16).unwrap().as_ref(), &[2, 0]);
        assert_eq!(ByteEncoder::<Option<u16>>::encode(&encoder, &None), None);
    }

    #[test]
    fn test_utf8_encoder() {
        let encoder = Utf8Encoder;
        assert_eq!(encoder.encode("ab").unwrap().as_ref(), b"ab");
        assert_eq!(encoder.encode(&String::from("é")).unwrap().as_ref(), "é".as_bytes());
    }

    #[test]
    fn test_fn_encoder() {
        let encoder = FnEncoder(|key: &(u8, u8)| vec![key.0, key.1]);
        assert_eq!(encoder.encode(&(4, 5)).unwrap().as_ref(), &[4, 5]);
    }
}
