use bytes::Bytes;

/// Raw DNS query in wire format.
///
/// The bytes are never parsed: the full byte sequence (transaction ID
/// included) is the cache and coalescing key. `Bytes` keeps clones cheap
/// across the resolver → cache → index layers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DnsQuery {
    bytes: Bytes,
}

impl DnsQuery {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// The query key: the exact wire bytes.
    #[inline]
    pub fn key(&self) -> &Bytes {
        &self.bytes
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<Vec<u8>> for DnsQuery {
    fn from(value: Vec<u8>) -> Self {
        Self::new(value)
    }
}

impl From<Bytes> for DnsQuery {
    fn from(value: Bytes) -> Self {
        Self::new(value)
    }
}
