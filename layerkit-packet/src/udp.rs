//! UDP layer
//!
//! The UDP header is source port, destination port, length and checksum,
//! two bytes each. The length field is derived from the payload at build
//! time unless told otherwise; the checksum is written as given and never
//! computed here.

use crate::builder::Builder;
use crate::header::{impl_header_traits, Header, HeaderCache};
use crate::packet::{impl_packet_traits, Packet, PacketCache};
use layerkit_core::{PacketKind, Result};
use std::any::Any;
use std::fmt;
use tracing::trace;

/// Common UDP port numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UdpPort(pub u16);

impl UdpPort {
    /// DNS (53)
    pub const DNS: UdpPort = UdpPort(53);

    /// DHCP Server (67)
    pub const DHCP_SERVER: UdpPort = UdpPort(67);

    /// DHCP Client (68)
    pub const DHCP_CLIENT: UdpPort = UdpPort(68);

    /// NTP (123)
    pub const NTP: UdpPort = UdpPort(123);

    /// SNMP (161)
    pub const SNMP: UdpPort = UdpPort(161);

    pub fn to_u16(self) -> u16 {
        self.0
    }

    fn service_name(self) -> Option<&'static str> {
        match self {
            UdpPort::DNS => Some("DNS"),
            UdpPort::DHCP_SERVER => Some("DHCP Server"),
            UdpPort::DHCP_CLIENT => Some("DHCP Client"),
            UdpPort::NTP => Some("NTP"),
            UdpPort::SNMP => Some("SNMP"),
            _ => None,
        }
    }
}

impl fmt::Display for UdpPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.service_name() {
            Some(name) => write!(f, "{} ({})", self.0, name),
            None => write!(f, "{}", self.0),
        }
    }
}

impl From<u16> for UdpPort {
    fn from(port: u16) -> Self {
        UdpPort(port)
    }
}

impl From<UdpPort> for u16 {
    fn from(port: UdpPort) -> Self {
        port.0
    }
}

/// UDP header
#[derive(Debug, Clone)]
pub struct UdpHeader {
    src_port: UdpPort,
    dst_port: UdpPort,
    length: u16,
    checksum: u16,
    cache: HeaderCache,
}

impl UdpHeader {
    pub const KIND: PacketKind = PacketKind::new::<Self>("UDP Header");

    /// UDP header size in bytes
    pub const SIZE: usize = 8;

    pub fn src_port(&self) -> UdpPort {
        self.src_port
    }

    pub fn dst_port(&self) -> UdpPort {
        self.dst_port
    }

    /// Value of the length field (header + data)
    pub fn length_field(&self) -> u16 {
        self.length
    }

    pub fn checksum(&self) -> u16 {
        self.checksum
    }
}

impl Header for UdpHeader {
    fn kind(&self) -> &'static PacketKind {
        &Self::KIND
    }

    fn cache(&self) -> &HeaderCache {
        &self.cache
    }

    fn raw_fields(&self) -> Vec<Vec<u8>> {
        vec![
            self.src_port.to_u16().to_be_bytes().to_vec(),
            self.dst_port.to_u16().to_be_bytes().to_vec(),
            self.length.to_be_bytes().to_vec(),
            self.checksum.to_be_bytes().to_vec(),
        ]
    }

    fn build_string(&self) -> String {
        format!(
            "[UDP Header ({} bytes)]\n  Source port: {}\n  Destination port: {}\n  Length: {}\n  Checksum: 0x{:04x}\n",
            self.length(),
            self.src_port,
            self.dst_port,
            self.length,
            self.checksum
        )
    }
}

impl_header_traits!(UdpHeader);

/// UDP datagram
#[derive(Debug)]
pub struct UdpPacket {
    header: UdpHeader,
    payload: Option<Box<dyn Packet>>,
    cache: PacketCache,
}

impl UdpPacket {
    pub const KIND: PacketKind = PacketKind::new::<Self>("UDP");

    pub fn udp_header(&self) -> &UdpHeader {
        &self.header
    }
}

impl Packet for UdpPacket {
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
        Box::new(UdpBuilder {
            src_port: self.header.src_port,
            dst_port: self.header.dst_port,
            length: self.header.length,
            checksum: self.header.checksum,
            correct_length_at_build: false,
            payload: self.payload.as_ref().map(|p| p.builder()),
        })
    }

    fn header(&self) -> Option<&dyn Header> {
        Some(&self.header)
    }

    fn payload(&self) -> Option<&dyn Packet> {
        self.payload.as_deref()
    }
}

impl_packet_traits!(UdpPacket);

/// Builder for [`UdpPacket`]
///
/// Ports, length and checksum start at zero; the length field is
/// corrected at build by default.
#[derive(Debug)]
pub struct UdpBuilder {
    src_port: UdpPort,
    dst_port: UdpPort,
    length: u16,
    checksum: u16,
    correct_length_at_build: bool,
    payload: Option<Box<dyn Builder>>,
}

impl UdpBuilder {
    pub fn new() -> Self {
        UdpBuilder {
            src_port: UdpPort(0),
            dst_port: UdpPort(0),
            length: 0,
            checksum: 0,
            correct_length_at_build: true,
            payload: None,
        }
    }

    pub fn src_port<P: Into<UdpPort>>(mut self, port: P) -> Self {
        self.src_port = port.into();
        self
    }

    pub fn dst_port<P: Into<UdpPort>>(mut self, port: P) -> Self {
        self.dst_port = port.into();
        self
    }

    /// Length field, used only when length correction is off
    pub fn length(mut self, length: u16) -> Self {
        self.length = length;
        self
    }

    /// Checksum field, written as given
    pub fn checksum(mut self, checksum: u16) -> Self {
        self.checksum = checksum;
        self
    }

    /// Set the length field to header + payload length at build
    pub fn correct_length_at_build(mut self, enabled: bool) -> Self {
        self.correct_length_at_build = enabled;
        self
    }

    /// Set the builder of the encapsulated layer
    pub fn payload<B: Builder>(mut self, builder: B) -> Self {
        self.payload = Some(Box::new(builder));
        self
    }
}

impl Default for UdpBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder for UdpBuilder {
    fn kind(&self) -> &'static PacketKind {
        &UdpPacket::KIND
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn build(&self) -> Box<dyn Packet> {
        let payload = self.payload.as_ref().map(|b| b.build());

        // Oversized datagrams wrap, matching a plain 16-bit field write
        let length = if self.correct_length_at_build {
            (UdpHeader::SIZE + payload.as_ref().map_or(0, |p| p.length())) as u16
        } else {
            self.length
        };
        trace!(
            src_port = self.src_port.to_u16(),
            dst_port = self.dst_port.to_u16(),
            length,
            "udp datagram built"
        );

        Box::new(UdpPacket {
            header: UdpHeader {
                src_port: self.src_port,
                dst_port: self.dst_port,
                length,
                checksum: self.checksum,
                cache: HeaderCache::new(),
            },
            payload,
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
    use crate::unknown::UnknownBuilder;

    fn dns_query() -> UdpBuilder {
        UdpBuilder::new()
            .src_port(54321u16)
            .dst_port(UdpPort::DNS)
            .checksum(0xBEEF)
            .payload(UnknownBuilder::new(vec![0x12, 0x34, 0x01, 0x00]))
    }

    #[test]
    fn test_udp_header_bytes() {
        let packet = dns_query().build();
        let bytes = packet.raw_data();

        assert_eq!(packet.length(), 12);
        assert_eq!(u16::from_be_bytes([bytes[0], bytes[1]]), 54321);
        assert_eq!(u16::from_be_bytes([bytes[2], bytes[3]]), 53);
        assert_eq!(u16::from_be_bytes([bytes[4], bytes[5]]), 12);
        assert_eq!(u16::from_be_bytes([bytes[6], bytes[7]]), 0xBEEF);
        assert_eq!(&bytes[8..], &[0x12, 0x34, 0x01, 0x00]);
    }

    #[test]
    fn test_udp_header_hex_string() {
        let packet = dns_query().build();
        assert_eq!(
            packet.header().unwrap().hex_string(),
            "d4:31:00:35:00:0c:be:ef"
        );
        assert_eq!(packet.hex_string(), "d4 31 00 35 00 0c be ef 12 34 01 00");
    }

    #[test]
    fn test_udp_length_without_correction() {
        let packet = dns_query()
            .correct_length_at_build(false)
            .length(0x0100)
            .build();

        let udp = packet.get_as::<UdpPacket>().unwrap();
        assert_eq!(udp.udp_header().length_field(), 0x0100);
        // the field is free; the packet length still counts real bytes
        assert_eq!(packet.length(), 12);
    }

    #[test]
    fn test_udp_without_payload() {
        let packet = UdpBuilder::new().src_port(1u16).dst_port(2u16).build();
        assert_eq!(packet.length(), UdpHeader::SIZE);
        assert!(packet.payload().is_none());
        assert_eq!(
            packet.get_as::<UdpPacket>().unwrap().udp_header().length_field(),
            8
        );
    }

    #[test]
    fn test_udp_text() {
        let packet = dns_query().build();
        let text = packet.text();

        assert!(text.starts_with("[UDP Header (8 bytes)]\n"));
        assert!(text.contains("  Source port: 54321\n"));
        assert!(text.contains("  Destination port: 53 (DNS)\n"));
        assert!(text.contains("  Length: 12\n"));
        assert!(text.contains("  Checksum: 0xbeef\n"));
        assert!(text.ends_with("[Unknown Packet (4 bytes)]\n  Hex stream: 12 34 01 00\n"));
    }

    #[test]
    fn test_udp_round_trip() {
        let packet = dns_query().build();
        let rebuilt = packet.builder().build();

        assert!(packet.equals(rebuilt.as_ref()));
        assert_eq!(packet.raw_data(), rebuilt.raw_data());
    }

    #[test]
    fn test_udp_port_conversions() {
        assert_eq!(UdpPort::from(53), UdpPort::DNS);
        assert_eq!(u16::from(UdpPort::NTP), 123);
        assert_eq!(UdpPort(9999).to_string(), "9999");
    }
}
