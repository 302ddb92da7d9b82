//! Cache keys as seen by the routing layer.
//!
//! A [`Key`] is an opaque byte string. Routes never interpret its contents,
//! they only read its length and, when splitting a key across replicas,
//! append a suffix to it.
//!
//! ```
//! use keysplit_core::Key;
//!
//! let key = Key::from("user:42");
//! assert_eq!(key.len(), 7);
//! assert_eq!(format!("{}", key), "user:42");
//! ```

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

/// Maximum key length accepted by the backend protocol, in bytes.
pub const MAX_KEY_LENGTH: usize = 255;

/// An owned, immutable cache key.
///
/// `Key` wraps [`Bytes`], so cloning only bumps a reference count. A cloned
/// key never borrows from the request it came from, which makes it safe to
/// move into background tasks.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Key(Bytes);

impl Key {
    /// Creates a key from raw bytes.
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    /// Returns the key length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the key has no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns a new key made of this key followed by `suffix` parts.
    ///
    /// The original key is left untouched.
    pub fn concat(&self, parts: &[&[u8]]) -> Self {
        let extra: usize = parts.iter().map(|p| p.len()).sum();
        let mut buf = BytesMut::with_capacity(self.len() + extra);
        buf.put_slice(&self.0);
        for part in parts {
            buf.put_slice(part);
        }
        Self(buf.freeze())
    }

    /// Consumes the key and returns the underlying bytes.
    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({:?})", String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl AsRef<[u8]> for Key {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<&'static str> for Key {
    fn from(value: &'static str) -> Self {
        Self(Bytes::from_static(value.as_bytes()))
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Self(Bytes::from(value))
    }
}

impl From<Vec<u8>> for Key {
    fn from(value: Vec<u8>) -> Self {
        Self(Bytes::from(value))
    }
}

impl From<Bytes> for Key {
    fn from(value: Bytes) -> Self {
        Self(value)
    }
}
