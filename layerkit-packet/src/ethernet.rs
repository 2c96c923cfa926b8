//! Ethernet II layer
//!
//! An Ethernet frame is a 14 byte header (destination, source, EtherType
//! or length) followed by the payload and, for short frames, a zero pad
//! that brings the frame up to the 60 byte minimum. The pad is a trailer,
//! so [`EthernetPacket`] extends the default length, byte and text
//! composition with it.

use crate::builder::Builder;
use crate::header::{impl_header_traits, Header, HeaderCache};
use crate::packet::{
    base_equals, base_length, base_raw_data, base_string, impl_packet_traits, Packet, PacketCache,
};
use layerkit_core::byte_arrays::{concat, to_hex_string};
use layerkit_core::{PacketKind, Result};
use std::any::Any;
use std::fmt;
use tracing::trace;

/// Common EtherType values used in Ethernet II frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EtherType {
    /// IPv4 (0x0800)
    IPv4,
    /// ARP (0x0806)
    ARP,
    /// VLAN-tagged frame (0x8100)
    VLAN,
    /// IPv6 (0x86DD)
    IPv6,
    /// LLDP (0x88CC)
    LLDP,
    /// 802.1X (0x888E)
    Dot1X,
    /// LLC/SNAP encapsulation - the field carries the payload length
    LLC,
    /// Custom EtherType
    Custom(u16),
}

impl EtherType {
    /// Convert EtherType to u16 value
    pub fn to_u16(self) -> u16 {
        match self {
            EtherType::IPv4 => 0x0800,
            EtherType::ARP => 0x0806,
            EtherType::VLAN => 0x8100,
            EtherType::IPv6 => 0x86DD,
            EtherType::LLDP => 0x88CC,
            EtherType::Dot1X => 0x888E,
            EtherType::LLC => 0, // Will be replaced with length
            EtherType::Custom(val) => val,
        }
    }
}

impl fmt::Display for EtherType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EtherType::IPv4 => write!(f, "IPv4"),
            EtherType::ARP => write!(f, "ARP"),
            EtherType::VLAN => write!(f, "VLAN"),
            EtherType::IPv6 => write!(f, "IPv6"),
            EtherType::LLDP => write!(f, "LLDP"),
            EtherType::Dot1X => write!(f, "802.1X"),
            EtherType::LLC => write!(f, "LLC"),
            EtherType::Custom(val) => write!(f, "0x{:04X}", val),
        }
    }
}

/// MAC address (6 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacAddress(pub [u8; 6]);

impl MacAddress {
    /// Broadcast MAC address (FF:FF:FF:FF:FF:FF)
    pub const BROADCAST: MacAddress = MacAddress([0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);

    /// Zero MAC address (00:00:00:00:00:00)
    pub const ZERO: MacAddress = MacAddress([0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);

    /// CDP/VTP/DTP multicast address (01:00:0C:CC:CC:CC)
    pub const CDP_MULTICAST: MacAddress = MacAddress([0x01, 0x00, 0x0C, 0xCC, 0xCC, 0xCC]);

    /// Get the MAC address as a byte array
    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl From<[u8; 6]> for MacAddress {
    fn from(bytes: [u8; 6]) -> Self {
        MacAddress(bytes)
    }
}

/// Ethernet II header
#[derive(Debug, Clone)]
pub struct EthernetHeader {
    destination: MacAddress,
    source: MacAddress,
    ethertype: EtherType,
    type_or_length: u16,
    cache: HeaderCache,
}

impl EthernetHeader {
    pub const KIND: PacketKind = PacketKind::new::<Self>("Ethernet Header");

    /// Ethernet header size (dst + src + type/length)
    pub const SIZE: usize = 14;

    fn new(
        destination: MacAddress,
        source: MacAddress,
        ethertype: EtherType,
        payload_length: usize,
    ) -> Self {
        // LLC frames carry the payload length instead of an EtherType
        let type_or_length = match ethertype {
            EtherType::LLC => payload_length as u16,
            other => other.to_u16(),
        };

        EthernetHeader {
            destination,
            source,
            ethertype,
            type_or_length,
            cache: HeaderCache::new(),
        }
    }

    pub fn destination(&self) -> MacAddress {
        self.destination
    }

    pub fn source(&self) -> MacAddress {
        self.source
    }

    pub fn ethertype(&self) -> EtherType {
        self.ethertype
    }

    /// Value written to the type/length field
    pub fn type_or_length(&self) -> u16 {
        self.type_or_length
    }
}

impl Header for EthernetHeader {
    fn kind(&self) -> &'static PacketKind {
        &Self::KIND
    }

    fn cache(&self) -> &HeaderCache {
        &self.cache
    }

    fn raw_fields(&self) -> Vec<Vec<u8>> {
        vec![
            self.destination.as_bytes().to_vec(),
            self.source.as_bytes().to_vec(),
            self.type_or_length.to_be_bytes().to_vec(),
        ]
    }

    fn build_string(&self) -> String {
        let type_line = match self.ethertype {
            EtherType::LLC => format!("  Length: {} (LLC)\n", self.type_or_length),
            other => format!("  Type: 0x{:04x} ({})\n", self.type_or_length, other),
        };

        format!(
            "[Ethernet Header ({} bytes)]\n  Destination address: {}\n  Source address: {}\n{}",
            self.length(),
            self.destination,
            self.source,
            type_line
        )
    }
}

impl_header_traits!(EthernetHeader);

/// Ethernet II frame
#[derive(Debug)]
pub struct EthernetPacket {
    header: EthernetHeader,
    payload: Option<Box<dyn Packet>>,
    pad: Vec<u8>,
    cache: PacketCache,
}

impl EthernetPacket {
    pub const KIND: PacketKind = PacketKind::new::<Self>("Ethernet");

    /// Minimum Ethernet frame size (without FCS)
    pub const MIN_FRAME_SIZE: usize = 60;

    /// Minimum payload size, pad included
    pub const MIN_PAYLOAD_SIZE: usize = Self::MIN_FRAME_SIZE - EthernetHeader::SIZE;

    pub fn ethernet_header(&self) -> &EthernetHeader {
        &self.header
    }

    /// Trailing pad bytes
    pub fn pad(&self) -> &[u8] {
        &self.pad
    }
}

impl Packet for EthernetPacket {
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
        Box::new(EthernetBuilder {
            destination: self.header.destination,
            source: self.header.source,
            ethertype: self.header.ethertype,
            payload: self.payload.as_ref().map(|p| p.builder()),
            pad: self.pad.clone(),
            pad_at_build: false,
        })
    }

    fn header(&self) -> Option<&dyn Header> {
        Some(&self.header)
    }

    fn payload(&self) -> Option<&dyn Packet> {
        self.payload.as_deref()
    }

    fn calc_length(&self) -> usize {
        base_length(self) + self.pad.len()
    }

    fn build_raw_data(&self) -> Vec<u8> {
        concat([base_raw_data(self), self.pad.clone()])
    }

    fn build_string(&self) -> String {
        let mut out = base_string(self);
        if !self.pad.is_empty() {
            out.push_str(&format!(
                "[Ethernet Pad ({} bytes)]\n  Hex stream: {}\n",
                self.pad.len(),
                to_hex_string(&self.pad, " ")
            ));
        }
        out
    }

    fn equals(&self, other: &dyn Packet) -> bool {
        base_equals(self, other)
            && other
                .as_any()
                .downcast_ref::<EthernetPacket>()
                .is_some_and(|eth| eth.pad == self.pad)
    }
}

impl_packet_traits!(EthernetPacket);

/// Builder for [`EthernetPacket`]
///
/// Defaults to zero addresses, [`EtherType::IPv4`] and padding at build.
#[derive(Debug)]
pub struct EthernetBuilder {
    destination: MacAddress,
    source: MacAddress,
    ethertype: EtherType,
    payload: Option<Box<dyn Builder>>,
    pad: Vec<u8>,
    pad_at_build: bool,
}

impl EthernetBuilder {
    pub fn new() -> Self {
        EthernetBuilder {
            destination: MacAddress::ZERO,
            source: MacAddress::ZERO,
            ethertype: EtherType::IPv4,
            payload: None,
            pad: Vec::new(),
            pad_at_build: true,
        }
    }

    pub fn dst_addr(mut self, addr: MacAddress) -> Self {
        self.destination = addr;
        self
    }

    pub fn src_addr(mut self, addr: MacAddress) -> Self {
        self.source = addr;
        self
    }

    /// Set the EtherType (use [`EtherType::LLC`] for LLC/SNAP frames)
    pub fn ether_type(mut self, ethertype: EtherType) -> Self {
        self.ethertype = ethertype;
        self
    }

    /// Set the builder of the encapsulated layer
    pub fn payload<B: Builder>(mut self, builder: B) -> Self {
        self.payload = Some(Box::new(builder));
        self
    }

    /// Explicit pad bytes, used only when padding at build is off
    pub fn pad(mut self, pad: Vec<u8>) -> Self {
        self.pad = pad;
        self
    }

    /// Zero-fill short frames up to [`EthernetPacket::MIN_FRAME_SIZE`]
    pub fn pad_at_build(mut self, enabled: bool) -> Self {
        self.pad_at_build = enabled;
        self
    }
}

impl Default for EthernetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder for EthernetBuilder {
    fn kind(&self) -> &'static PacketKind {
        &EthernetPacket::KIND
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn build(&self) -> Box<dyn Packet> {
        let payload = self.payload.as_ref().map(|b| b.build());
        let payload_length = payload.as_ref().map_or(0, |p| p.length());

        let pad = if self.pad_at_build {
            vec![0u8; EthernetPacket::MIN_PAYLOAD_SIZE.saturating_sub(payload_length)]
        } else {
            self.pad.clone()
        };

        let header = EthernetHeader::new(
            self.destination,
            self.source,
            self.ethertype,
            payload_length,
        );
        trace!(
            ethertype = %self.ethertype,
            payload_length,
            pad = pad.len(),
            "ethernet frame built"
        );

        Box::new(EthernetPacket {
            header,
            payload,
            pad,
            cache: PacketCache::new(),
        })
    }

    fn payload_builder(&self) -> Option<&dyn Builder> {
        self.payload.as_deref()
    }

    fn set_payload_builder(&mut self, builder: Box<dyn Builder>) -> Result<&mut dyn Builder> {
        self.payload = Some(builder);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traversal::PacketChain;
    use crate::unknown::{UnknownBuilder, UnknownPacket};

    const SRC: MacAddress = MacAddress([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
    const DST: MacAddress = MacAddress([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);

    fn frame_builder(payload: Vec<u8>) -> EthernetBuilder {
        EthernetBuilder::new()
            .dst_addr(DST)
            .src_addr(SRC)
            .ether_type(EtherType::IPv4)
            .payload(UnknownBuilder::new(payload))
    }

    #[test]
    fn test_ethertype_conversion() {
        assert_eq!(EtherType::IPv4.to_u16(), 0x0800);
        assert_eq!(EtherType::ARP.to_u16(), 0x0806);
        assert_eq!(EtherType::Custom(0x1234).to_u16(), 0x1234);
        assert_eq!(format!("{}", EtherType::Custom(0x1234)), "0x1234");
    }

    #[test]
    fn test_mac_address_display() {
        let mac = MacAddress([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
        assert_eq!(format!("{}", mac), "00:11:22:33:44:55");
    }

    #[test]
    fn test_ethernet_header_bytes() {
        let frame = frame_builder(vec![0x01, 0x02, 0x03, 0x04]).build();
        let header = frame.header().unwrap();

        assert_eq!(header.length(), EthernetHeader::SIZE);
        let bytes = header.raw_data();
        assert_eq!(&bytes[0..6], DST.as_bytes());
        assert_eq!(&bytes[6..12], SRC.as_bytes());
        assert_eq!(u16::from_be_bytes([bytes[12], bytes[13]]), 0x0800);
        assert!(header.hex_string().starts_with("aa:bb:cc:dd:ee:ff:00:11"));
    }

    #[test]
    fn test_ethernet_frame_padding() {
        let payload = vec![0x01, 0x02, 0x03, 0x04];
        let frame = frame_builder(payload.clone()).build();

        assert_eq!(frame.length(), EthernetPacket::MIN_FRAME_SIZE);
        let bytes = frame.raw_data();
        assert_eq!(bytes.len(), frame.length());
        assert_eq!(&bytes[14..18], &payload[..]);
        assert!(bytes[18..].iter().all(|&b| b == 0));

        let eth = frame.get_as::<EthernetPacket>().unwrap();
        assert_eq!(eth.pad().len(), 42);
    }

    #[test]
    fn test_ethernet_frame_without_padding() {
        let frame = frame_builder(vec![0x01, 0x02]).pad_at_build(false).build();
        assert_eq!(frame.length(), 16);
        assert_eq!(frame.raw_data().len(), 16);
    }

    #[test]
    fn test_ethernet_long_frame_has_no_pad() {
        let frame = frame_builder(vec![0x55; 100]).build();
        assert_eq!(frame.length(), 114);
        assert!(frame.get_as::<EthernetPacket>().unwrap().pad().is_empty());
        assert!(!frame.text().contains("Ethernet Pad"));
    }

    #[test]
    fn test_ethernet_explicit_pad() {
        let frame = frame_builder(vec![0x01])
            .pad_at_build(false)
            .pad(vec![0xEE, 0xEE])
            .build();

        assert_eq!(frame.length(), 17);
        assert_eq!(&frame.raw_data()[15..], &[0xEE, 0xEE]);
    }

    #[test]
    fn test_ethernet_frame_llc_length() {
        let payload = vec![0xAA, 0xAA, 0x03];
        let frame = EthernetBuilder::new()
            .dst_addr(MacAddress::CDP_MULTICAST)
            .src_addr(SRC)
            .ether_type(EtherType::LLC)
            .payload(UnknownBuilder::new(payload.clone()))
            .build();

        let bytes = frame.raw_data();
        let length = u16::from_be_bytes([bytes[12], bytes[13]]);
        assert_eq!(length, payload.len() as u16);
        assert!(frame.text().contains("Length: 3 (LLC)"));
    }

    #[test]
    fn test_ethernet_text() {
        let frame = frame_builder(vec![0x01, 0x02]).build();
        let text = frame.text();

        assert!(text.starts_with("[Ethernet Header (14 bytes)]\n"));
        assert!(text.contains("  Destination address: AA:BB:CC:DD:EE:FF\n"));
        assert!(text.contains("  Source address: 00:11:22:33:44:55\n"));
        assert!(text.contains("  Type: 0x0800 (IPv4)\n"));
        assert!(text.contains("[Unknown Packet (2 bytes)]"));
        assert!(text.ends_with(&format!(
            "[Ethernet Pad (44 bytes)]\n  Hex stream: {}\n",
            vec!["00"; 44].join(" ")
        )));
    }

    #[test]
    fn test_ethernet_equality() {
        let a = frame_builder(vec![0x01, 0x02]).build();
        let b = frame_builder(vec![0x01, 0x02]).build();
        let c = frame_builder(vec![0x01, 0x03]).build();

        assert!(*a == *b);
        assert_eq!(a.hash_code(), b.hash_code());
        assert!(*a != *c);
    }

    #[test]
    fn test_ethernet_equality_compares_pad() {
        let padded = frame_builder(vec![0x01]).build();
        let unpadded = frame_builder(vec![0x01]).pad_at_build(false).build();
        assert!(!padded.equals(unpadded.as_ref()));
    }

    #[test]
    fn test_ethernet_not_equal_to_raw_bytes() {
        let frame = frame_builder(vec![0x01]).build();
        let raw = UnknownPacket::new(frame.raw_data());

        assert_eq!(frame.raw_data(), raw.raw_data());
        assert!(!frame.equals(&raw));
        assert!(!raw.equals(frame.as_ref()));
    }

    #[test]
    fn test_ethernet_builder_round_trip() {
        let frame = frame_builder(vec![0x01, 0x02, 0x03]).build();
        let rebuilt = frame.builder().build();

        assert!(frame.equals(rebuilt.as_ref()));
        assert_eq!(frame.hex_string(), rebuilt.hex_string());
    }

    #[test]
    fn test_ethernet_builder_accepts_payload_builder() {
        let mut builder = EthernetBuilder::new();
        assert!(builder.payload_builder().is_none());

        builder
            .set_payload_builder(Box::new(UnknownBuilder::new(vec![0x09])))
            .unwrap();
        assert!(builder.payload_builder().is_some());
        assert!(builder.build().contains(&UnknownPacket::KIND));
    }
}
