//! Packet composite
//!
//! A packet is an optional [`Header`] followed by an optional payload,
//! which is itself a packet. Concrete packets expose those two parts and
//! inherit length, raw bytes, hex form, text, hash and equality from the
//! [`Packet`] trait, each computed once and cached in a [`PacketCache`].
//!
//! Packets that carry more than header and payload (a trailer, padding)
//! override the compose steps. The `base_*` functions are the default
//! steps, so an override can extend them rather than repeat them.

use crate::builder::Builder;
use crate::header::Header;
use layerkit_core::byte_arrays::{concat, hash_bytes, to_hex_string};
use layerkit_core::{Memo, PacketKind};
use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use tracing::trace;

/// Cache cells backing the memoized [`Packet`] accessors
#[derive(Default)]
pub struct PacketCache {
    length: Memo<usize>,
    raw_data: Memo<Vec<u8>>,
    hex_string: Memo<String>,
    text: Memo<String>,
    hash_code: Memo<i32>,
}

impl PacketCache {
    /// Create an empty cache
    pub const fn new() -> Self {
        PacketCache {
            length: Memo::new(),
            raw_data: Memo::new(),
            hex_string: Memo::new(),
            text: Memo::new(),
            hash_code: Memo::new(),
        }
    }
}

impl fmt::Debug for PacketCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PacketCache")
            .field("length", &self.length.get())
            .field("hash_code", &self.hash_code.get())
            .finish_non_exhaustive()
    }
}

/// One layer of a packet chain
///
/// Implementors provide [`kind`](Packet::kind), [`cache`](Packet::cache),
/// [`as_any`](Packet::as_any) and [`builder`](Packet::builder), and
/// override [`header`](Packet::header) / [`payload`](Packet::payload) when
/// they carry those parts. A packet with neither is a leaf.
///
/// # Chain depth
///
/// Composition, equality, building and dropping recurse once per layer.
/// Chains around a thousand layers deep fit a default thread stack; much
/// deeper chains need a thread with a larger one.
pub trait Packet: fmt::Debug + Send + Sync + 'static {
    /// Descriptor of the concrete packet type
    fn kind(&self) -> &'static PacketKind;

    /// Cache owned by this packet
    fn cache(&self) -> &PacketCache;

    fn as_any(&self) -> &dyn Any;

    /// Builder pre-populated with this packet's field values
    fn builder(&self) -> Box<dyn Builder>;

    fn header(&self) -> Option<&dyn Header> {
        None
    }

    fn payload(&self) -> Option<&dyn Packet> {
        None
    }

    /// Compose step behind [`length`](Packet::length).
    ///
    /// May read other accessors (`self.raw_slice().len()` is fine) but must
    /// not call `self.length()`, which is still being computed.
    fn calc_length(&self) -> usize {
        base_length(self)
    }

    fn build_raw_data(&self) -> Vec<u8> {
        base_raw_data(self)
    }

    fn build_hex_string(&self) -> String {
        to_hex_string(self.raw_slice(), " ")
    }

    fn build_string(&self) -> String {
        base_string(self)
    }

    fn calc_hash_code(&self) -> i32 {
        hash_bytes(self.raw_slice())
    }

    /// Structural equality through the whole chain.
    ///
    /// Directional: `other` must be of this packet's kind or a sub-kind, so
    /// a parent-kind packet can equal a child-kind packet while the reverse
    /// comparison fails.
    fn equals(&self, other: &dyn Packet) -> bool {
        base_equals(self, other)
    }

    /// Packet length in bytes
    fn length(&self) -> usize {
        *self.cache().length.get_or_compute(|| self.calc_length())
    }

    /// Borrowed view of the cached raw bytes
    fn raw_slice(&self) -> &[u8] {
        let data = self.cache().raw_data.get_or_compute(|| {
            let data = self.build_raw_data();
            trace!(kind = %self.kind(), length = data.len(), "packet raw data built");
            data
        });
        // Only compare against a length that is already cached, so a
        // `calc_length` built on `raw_slice` never re-enters its own cell.
        if let Some(length) = self.cache().length.get() {
            debug_assert_eq!(data.len(), *length, "{} length mismatch", self.kind());
        }
        data
    }

    /// Copy of the raw bytes; changing it never touches the cache
    fn raw_data(&self) -> Vec<u8> {
        self.raw_slice().to_vec()
    }

    /// Space separated hex octets, e.g. `00 01 0a`
    fn hex_string(&self) -> &str {
        self.cache()
            .hex_string
            .get_or_compute(|| self.build_hex_string())
    }

    /// Descriptive text of the whole chain
    fn text(&self) -> &str {
        self.cache().text.get_or_compute(|| self.build_string())
    }

    fn hash_code(&self) -> i32 {
        *self.cache().hash_code.get_or_compute(|| self.calc_hash_code())
    }
}

impl fmt::Display for dyn Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

impl PartialEq for dyn Packet {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Hash for dyn Packet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i32(self.hash_code());
    }
}

/// Header length plus payload length
pub fn base_length<P: Packet + ?Sized>(packet: &P) -> usize {
    packet.header().map_or(0, |h| h.length()) + packet.payload().map_or(0, |p| p.length())
}

/// Header bytes followed by payload bytes
pub fn base_raw_data<P: Packet + ?Sized>(packet: &P) -> Vec<u8> {
    let header = packet.header().map(|h| h.raw_slice()).unwrap_or_default();
    let payload = packet.payload().map(|p| p.raw_slice()).unwrap_or_default();
    concat([header, payload])
}

/// Header text followed by payload text
pub fn base_string<P: Packet + ?Sized>(packet: &P) -> String {
    let mut out = String::new();
    if let Some(header) = packet.header() {
        out.push_str(header.text());
    }
    if let Some(payload) = packet.payload() {
        out.push_str(payload.text());
    }
    out
}

/// Kind check, then header and payload comparison down the chain
pub fn base_equals<P: Packet + ?Sized>(packet: &P, other: &dyn Packet) -> bool {
    if std::ptr::addr_eq(packet as *const P, other as *const dyn Packet) {
        return true;
    }
    if !packet.kind().accepts(other.kind()) {
        return false;
    }

    let headers_match = match (packet.header(), other.header()) {
        (None, None) => true,
        (Some(a), Some(b)) => a.equals(b),
        _ => false,
    };
    if !headers_match {
        return false;
    }

    match (packet.payload(), other.payload()) {
        (None, None) => true,
        (Some(a), Some(b)) => a.equals(b),
        _ => false,
    }
}

/// Implement `Display` and `PartialEq` for a concrete packet type in
/// terms of its [`Packet`] accessors.
macro_rules! impl_packet_traits {
    ($ty:ty) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::packet::Packet::text(self))
            }
        }

        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                $crate::packet::Packet::equals(self, other)
            }
        }
    };
}

pub(crate) use impl_packet_traits;
