//! Expiry Codec Module
//!
//! Object stores have no per-object TTL, so every stored object carries its
//! own expiration as a fixed 8-byte header in front of the serialized value:
//!
//! ```text
//! [0..8)  little-endian f64, absolute Unix-epoch seconds (0.0 = persistent)
//! [8..)   serializer payload (may be empty)
//! ```

use bytes::{BufMut, Bytes, BytesMut};

/// Size of the expiration header in bytes.
pub const HEADER_LEN: usize = 8;

// == Expiration ==
/// Expiration stored in an object header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expiration {
    /// Never expires through this layer
    Persistent,
    /// Absolute expiration in Unix-epoch seconds
    At(f64),
}

impl Expiration {
    /// Interprets a raw header value; only an all-zero bit pattern is persistent.
    pub fn from_header_value(value: f64) -> Self {
        if value.to_bits() == 0 {
            Expiration::Persistent
        } else {
            Expiration::At(value)
        }
    }

    /// Value written into the header.
    pub fn header_value(&self) -> f64 {
        match self {
            Expiration::Persistent => 0.0,
            Expiration::At(at) => *at,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry is expired at `now` (Unix-epoch seconds).
    ///
    /// Strict comparison: an entry is still live at exactly its expiration.
    pub fn is_expired_at(&self, now: f64) -> bool {
        match self {
            Expiration::Persistent => false,
            Expiration::At(at) => now > *at,
        }
    }

    /// Seconds left before expiry, clamped at zero. `None` for persistent entries.
    pub fn remaining(&self, now: f64) -> Option<f64> {
        match self {
            Expiration::Persistent => None,
            Expiration::At(at) => Some((at - now).max(0.0)),
        }
    }
}

// == Encode ==
/// Prepends the expiration header to a serialized payload.
pub fn encode(expiration: Expiration, payload: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(HEADER_LEN + payload.len());
    buf.put_f64_le(expiration.header_value());
    buf.put_slice(payload);
    buf.freeze()
}

// == Decode Header ==
/// Reads the expiration from the first 8 bytes.
///
/// Returns `None` when fewer than 8 bytes are available; callers treat that
/// as a miss.
pub fn decode_header(bytes: &[u8]) -> Option<Expiration> {
    let header: [u8; HEADER_LEN] = bytes.get(..HEADER_LEN)?.try_into().ok()?;
    Some(Expiration::from_header_value(f64::from_le_bytes(header)))
}

// == Split ==
/// Splits a fully fetched object into its expiration and payload.
pub fn split(bytes: Bytes) -> Option<(Expiration, Bytes)> {
    let expiration = decode_header(&bytes)?;
    Some((expiration, bytes.slice(HEADER_LEN..)))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_layout() {
        let framed = encode(Expiration::At(1_700_000_000.5), b"abc");
        assert_eq!(framed.len(), HEADER_LEN + 3);
        assert_eq!(&framed[..HEADER_LEN], &1_700_000_000.5f64.to_le_bytes());
        assert_eq!(&framed[HEADER_LEN..], b"abc");
    }

    #[test]
    fn test_persistent_header_is_zero() {
        let framed = encode(Expiration::Persistent, b"");
        assert_eq!(&framed[..], &[0u8; HEADER_LEN]);
        assert_eq!(decode_header(&framed), Some(Expiration::Persistent));
    }

    #[test]
    fn test_decode_header_ignores_payload() {
        let framed = encode(Expiration::At(42.0), b"payload");
        assert_eq!(decode_header(&framed), Some(Expiration::At(42.0)));
        assert_eq!(decode_header(&framed[..HEADER_LEN]), Some(Expiration::At(42.0)));
    }

    #[test]
    fn test_decode_header_short_body() {
        assert_eq!(decode_header(&[]), None);
        assert_eq!(decode_header(&[0u8; 7]), None);
    }

    #[test]
    fn test_negative_zero_is_not_persistent() {
        let header = (-0.0f64).to_le_bytes();
        assert_eq!(decode_header(&header), Some(Expiration::At(-0.0)));
    }

    #[test]
    fn test_split() {
        let framed = encode(Expiration::At(10.0), b"value");
        let (expiration, payload) = split(framed).unwrap();
        assert_eq!(expiration, Expiration::At(10.0));
        assert_eq!(&payload[..], b"value");

        assert!(split(Bytes::from_static(b"short")).is_none());
    }

    #[test]
    fn test_split_header_only_object() {
        let (expiration, payload) = split(encode(Expiration::Persistent, b"")).unwrap();
        assert_eq!(expiration, Expiration::Persistent);
        assert!(payload.is_empty());
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let expiration = Expiration::At(100.0);
        assert!(!expiration.is_expired_at(99.0));
        assert!(!expiration.is_expired_at(100.0), "live at exact expiry");
        assert!(expiration.is_expired_at(100.001));
    }

    #[test]
    fn test_persistent_never_expires() {
        assert!(!Expiration::Persistent.is_expired_at(f64::MAX));
    }

    #[test]
    fn test_remaining() {
        assert_eq!(Expiration::At(100.0).remaining(40.0), Some(60.0));
        assert_eq!(Expiration::At(100.0).remaining(140.0), Some(0.0));
        assert_eq!(Expiration::Persistent.remaining(40.0), None);
    }
}
