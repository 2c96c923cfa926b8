//! Header composite
//!
//! A header is an ordered list of raw fields in wire order. Concrete
//! headers supply the fields; length, raw bytes, hex form, text and hash
//! are derived from them once and cached in a [`HeaderCache`].

use layerkit_core::byte_arrays::{concat, hash_bytes, to_hex_string};
use layerkit_core::{Memo, PacketKind};
use std::fmt;
use std::hash::{Hash, Hasher};
use tracing::trace;

/// Cache cells backing the memoized [`Header`] accessors
#[derive(Clone, Default)]
pub struct HeaderCache {
    length: Memo<usize>,
    raw_data: Memo<Vec<u8>>,
    hex_string: Memo<String>,
    text: Memo<String>,
    hash_code: Memo<i32>,
}

impl HeaderCache {
    /// Create an empty cache
    pub const fn new() -> Self {
        HeaderCache {
            length: Memo::new(),
            raw_data: Memo::new(),
            hex_string: Memo::new(),
            text: Memo::new(),
            hash_code: Memo::new(),
        }
    }
}

impl fmt::Debug for HeaderCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeaderCache")
            .field("length", &self.length.get())
            .field("hash_code", &self.hash_code.get())
            .finish_non_exhaustive()
    }
}

/// Front portion of a packet's encoding
///
/// Implementors provide [`kind`](Header::kind), [`cache`](Header::cache)
/// and [`raw_fields`](Header::raw_fields). The `calc_*` / `build_*`
/// methods are the compose steps and may be overridden; the accessors
/// (`length`, `raw_data`, `hex_string`, `text`, `hash_code`) memoize them
/// and should be left alone.
pub trait Header: fmt::Debug + Send + Sync + 'static {
    /// Descriptor of the concrete header type
    fn kind(&self) -> &'static PacketKind;

    /// Cache owned by this header
    fn cache(&self) -> &HeaderCache;

    /// Raw fields in wire order
    fn raw_fields(&self) -> Vec<Vec<u8>>;

    fn calc_length(&self) -> usize {
        self.raw_fields().iter().map(Vec::len).sum()
    }

    fn build_raw_data(&self) -> Vec<u8> {
        concat(self.raw_fields())
    }

    fn build_hex_string(&self) -> String {
        to_hex_string(self.raw_slice(), ":")
    }

    fn build_string(&self) -> String {
        self.hex_string().to_owned()
    }

    fn calc_hash_code(&self) -> i32 {
        hash_bytes(self.raw_slice())
    }

    /// Header length in bytes
    fn length(&self) -> usize {
        *self.cache().length.get_or_compute(|| self.calc_length())
    }

    /// Borrowed view of the cached raw bytes
    fn raw_slice(&self) -> &[u8] {
        self.cache().raw_data.get_or_compute(|| {
            let data = self.build_raw_data();
            trace!(kind = %self.kind(), length = data.len(), "header raw data built");
            data
        })
    }

    /// Copy of the raw bytes; changing it never touches the cache
    fn raw_data(&self) -> Vec<u8> {
        self.raw_slice().to_vec()
    }

    /// Colon separated hex octets, e.g. `00:01:0a`
    fn hex_string(&self) -> &str {
        self.cache()
            .hex_string
            .get_or_compute(|| self.build_hex_string())
    }

    /// Descriptive text, the hex string unless overridden
    fn text(&self) -> &str {
        self.cache().text.get_or_compute(|| self.build_string())
    }

    fn hash_code(&self) -> i32 {
        *self.cache().hash_code.get_or_compute(|| self.calc_hash_code())
    }

    /// Kind-compatible and byte-identical.
    ///
    /// Directional: `other` must be of this header's kind or a sub-kind.
    fn equals(&self, other: &dyn Header) -> bool {
        if std::ptr::addr_eq(self as *const Self, other as *const dyn Header) {
            return true;
        }
        self.kind().accepts(other.kind()) && self.raw_slice() == other.raw_slice()
    }
}

impl fmt::Display for dyn Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

impl PartialEq for dyn Header {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Hash for dyn Header {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i32(self.hash_code());
    }
}

/// Implement `Display` and `PartialEq` for a concrete header type in
/// terms of its [`Header`] accessors.
macro_rules! impl_header_traits {
    ($ty:ty) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::header::Header::text(self))
            }
        }

        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                $crate::header::Header::equals(self, other)
            }
        }
    };
}

pub(crate) use impl_header_traits;
