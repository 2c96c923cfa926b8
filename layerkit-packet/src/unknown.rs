//! Raw payload data
//!
//! [`UnknownPacket`] is the leaf of a chain: bytes that no layer claims,
//! with neither header nor payload.

use crate::builder::Builder;
use crate::packet::{impl_packet_traits, Packet, PacketCache};
use layerkit_core::byte_arrays::to_hex_string;
use layerkit_core::PacketKind;
use std::any::Any;

/// Raw, unparsed bytes at the end of a chain
#[derive(Debug)]
pub struct UnknownPacket {
    data: Vec<u8>,
    cache: PacketCache,
}

impl UnknownPacket {
    pub const KIND: PacketKind = PacketKind::new::<Self>("Unknown");

    /// Create a packet holding `data` as is
    pub fn new(data: Vec<u8>) -> Self {
        UnknownPacket {
            data,
            cache: PacketCache::new(),
        }
    }
}

impl Packet for UnknownPacket {
    fn kind(&self) -> &'static PacketKind {
        &Self::KIND
    }

    fn cache(&self) -> &PacketCache {
        &self.cache
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn builder(&self) -> Box<dyn Builder> {
        Box::new(UnknownBuilder::new(self.data.clone()))
    }

    fn calc_length(&self) -> usize {
        self.data.len()
    }

    fn build_raw_data(&self) -> Vec<u8> {
        self.data.clone()
    }

    fn build_string(&self) -> String {
        format!(
            "[Unknown Packet ({} bytes)]\n  Hex stream: {}\n",
            self.length(),
            to_hex_string(&self.data, " ")
        )
    }

    // With no header or payload the structural comparison would match
    // any two unknown packets, so compare the bytes themselves.
    fn equals(&self, other: &dyn Packet) -> bool {
        self.kind().accepts(other.kind()) && self.raw_slice() == other.raw_slice()
    }
}

impl_packet_traits!(UnknownPacket);

/// Builder for [`UnknownPacket`]
#[derive(Debug, Clone, Default)]
pub struct UnknownBuilder {
    data: Vec<u8>,
}

impl UnknownBuilder {
    pub fn new(data: Vec<u8>) -> Self {
        UnknownBuilder { data }
    }

    /// Bytes the built packet will carry
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Replace the raw bytes
    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.data = data;
        self
    }
}

impl Builder for UnknownBuilder {
    fn kind(&self) -> &'static PacketKind {
        &UnknownPacket::KIND
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn build(&self) -> Box<dyn Packet> {
        Box::new(UnknownPacket::new(self.data.clone()))
    }
}
