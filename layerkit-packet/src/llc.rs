//! LLC (Logical Link Control) and SNAP (SubNetwork Access Protocol)
//!
//! LLC frames with the SNAP extension carry CDP, VTP, DTP, UDLD and other
//! vendor protocols inside 802.3 frames. The header is the 3 byte LLC part
//! (DSAP, SSAP, control) followed by the 5 byte SNAP part (OUI, protocol
//! ID).

use crate::builder::Builder;
use crate::header::{impl_header_traits, Header, HeaderCache};
use crate::packet::{impl_packet_traits, Packet, PacketCache};
use layerkit_core::{PacketKind, Result};
use std::any::Any;
use tracing::trace;

/// LLC service access point values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlcSap {
    /// SNAP (0xAA)
    SNAP,
    /// STP/BPDU (0x42)
    STP,
    /// NetBIOS (0xF0)
    NetBIOS,
    /// Custom SAP value
    Custom(u8),
}

impl LlcSap {
    pub fn to_u8(self) -> u8 {
        match self {
            LlcSap::SNAP => 0xAA,
            LlcSap::STP => 0x42,
            LlcSap::NetBIOS => 0xF0,
            LlcSap::Custom(val) => val,
        }
    }
}

/// LLC Control field values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlcControl {
    /// Unnumbered Information (0x03) - most common for SNAP
    UnnumberedInformation,
    /// Custom control value
    Custom(u8),
}

impl LlcControl {
    pub fn to_u8(self) -> u8 {
        match self {
            LlcControl::UnnumberedInformation => 0x03,
            LlcControl::Custom(val) => val,
        }
    }
}

/// OUI (Organizationally Unique Identifier) - 3 bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Oui(pub [u8; 3]);

impl Oui {
    /// Cisco OUI (0x00000C)
    pub const CISCO: Oui = Oui([0x00, 0x00, 0x0C]);

    /// RFC 1042 OUI (0x000000) - for IP over LLC
    pub const RFC_1042: Oui = Oui([0x00, 0x00, 0x00]);

    pub fn as_bytes(&self) -> &[u8; 3] {
        &self.0
    }
}

impl From<[u8; 3]> for Oui {
    fn from(bytes: [u8; 3]) -> Self {
        Oui(bytes)
    }
}

/// SNAP Protocol ID (2 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapProtocolId(pub u16);

impl SnapProtocolId {
    /// CDP (0x2000)
    pub const CDP: SnapProtocolId = SnapProtocolId(0x2000);

    /// VTP (0x2003)
    pub const VTP: SnapProtocolId = SnapProtocolId(0x2003);

    /// DTP (0x2004)
    pub const DTP: SnapProtocolId = SnapProtocolId(0x2004);

    /// UDLD (0x0111)
    pub const UDLD: SnapProtocolId = SnapProtocolId(0x0111);

    pub fn to_u16(self) -> u16 {
        self.0
    }
}

impl From<u16> for SnapProtocolId {
    fn from(value: u16) -> Self {
        SnapProtocolId(value)
    }
}

/// LLC + SNAP header (8 bytes)
#[derive(Debug, Clone)]
pub struct LlcSnapHeader {
    dsap: LlcSap,
    ssap: LlcSap,
    control: LlcControl,
    oui: Oui,
    protocol_id: SnapProtocolId,
    cache: HeaderCache,
}

impl LlcSnapHeader {
    pub const KIND: PacketKind = PacketKind::new::<Self>("LLC/SNAP Header");

    /// LLC (3) + SNAP (5)
    pub const SIZE: usize = 8;

    pub fn dsap(&self) -> LlcSap {
        self.dsap
    }

    pub fn ssap(&self) -> LlcSap {
        self.ssap
    }

    pub fn control(&self) -> LlcControl {
        self.control
    }

    pub fn oui(&self) -> Oui {
        self.oui
    }

    pub fn protocol_id(&self) -> SnapProtocolId {
        self.protocol_id
    }
}

impl Header for LlcSnapHeader {
    fn kind(&self) -> &'static PacketKind {
        &Self::KIND
    }

    fn cache(&self) -> &HeaderCache {
        &self.cache
    }

    fn raw_fields(&self) -> Vec<Vec<u8>> {
        vec![
            vec![self.dsap.to_u8()],
            vec![self.ssap.to_u8()],
            vec![self.control.to_u8()],
            self.oui.as_bytes().to_vec(),
            self.protocol_id.to_u16().to_be_bytes().to_vec(),
        ]
    }

    fn build_string(&self) -> String {
        let oui = self.oui.as_bytes();
        format!(
            "[LLC/SNAP Header ({} bytes)]\n  DSAP: 0x{:02x}\n  SSAP: 0x{:02x}\n  Control: 0x{:02x}\n  OUI: {:02x}:{:02x}:{:02x}\n  Protocol ID: 0x{:04x}\n",
            self.length(),
            self.dsap.to_u8(),
            self.ssap.to_u8(),
            self.control.to_u8(),
            oui[0],
            oui[1],
            oui[2],
            self.protocol_id.to_u16()
        )
    }
}

impl_header_traits!(LlcSnapHeader);

/// LLC/SNAP encapsulated packet
#[derive(Debug)]
pub struct LlcSnapPacket {
    header: LlcSnapHeader,
    payload: Option<Box<dyn Packet>>,
    cache: PacketCache,
}

impl LlcSnapPacket {
    pub const KIND: PacketKind = PacketKind::new::<Self>("LLC/SNAP");

    pub fn llc_header(&self) -> &LlcSnapHeader {
        &self.header
    }
}

impl Packet for LlcSnapPacket {
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
        Box::new(LlcSnapBuilder {
            dsap: self.header.dsap,
            ssap: self.header.ssap,
            control: self.header.control,
            oui: self.header.oui,
            protocol_id: self.header.protocol_id,
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

impl_packet_traits!(LlcSnapPacket);

/// Builder for [`LlcSnapPacket`]
///
/// Starts from the standard SNAP LLC header (DSAP=0xAA, SSAP=0xAA,
/// Control=0x03) with the RFC 1042 OUI and protocol ID 0.
#[derive(Debug)]
pub struct LlcSnapBuilder {
    dsap: LlcSap,
    ssap: LlcSap,
    control: LlcControl,
    oui: Oui,
    protocol_id: SnapProtocolId,
    payload: Option<Box<dyn Builder>>,
}

impl LlcSnapBuilder {
    pub fn new() -> Self {
        LlcSnapBuilder {
            dsap: LlcSap::SNAP,
            ssap: LlcSap::SNAP,
            control: LlcControl::UnnumberedInformation,
            oui: Oui::RFC_1042,
            protocol_id: SnapProtocolId(0),
            payload: None,
        }
    }

    /// Cisco OUI with the CDP protocol ID
    pub fn cdp() -> Self {
        Self::new().oui(Oui::CISCO).protocol_id(SnapProtocolId::CDP)
    }

    pub fn dsap(mut self, dsap: LlcSap) -> Self {
        self.dsap = dsap;
        self
    }

    pub fn ssap(mut self, ssap: LlcSap) -> Self {
        self.ssap = ssap;
        self
    }

    pub fn control(mut self, control: LlcControl) -> Self {
        self.control = control;
        self
    }

    pub fn oui(mut self, oui: Oui) -> Self {
        self.oui = oui;
        self
    }

    pub fn protocol_id(mut self, protocol_id: SnapProtocolId) -> Self {
        self.protocol_id = protocol_id;
        self
    }

    /// Set the builder of the encapsulated layer
    pub fn payload<B: Builder>(mut self, builder: B) -> Self {
        self.payload = Some(Box::new(builder));
        self
    }
}

impl Default for LlcSnapBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder for LlcSnapBuilder {
    fn kind(&self) -> &'static PacketKind {
        &LlcSnapPacket::KIND
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn build(&self) -> Box<dyn Packet> {
        trace!(protocol_id = self.protocol_id.to_u16(), "llc/snap packet built");
        Box::new(LlcSnapPacket {
            header: LlcSnapHeader {
                dsap: self.dsap,
                ssap: self.ssap,
                control: self.control,
                oui: self.oui,
                protocol_id: self.protocol_id,
                cache: HeaderCache::new(),
            },
            payload: self.payload.as_ref().map(|b| b.build()),
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

    #[test]
    fn test_llc_snap_header_cdp() {
        let packet = LlcSnapBuilder::cdp().build();
        let header = packet.header().unwrap();

        assert_eq!(header.length(), LlcSnapHeader::SIZE);
        let bytes = header.raw_data();
        assert_eq!(&bytes[0..3], &[0xAA, 0xAA, 0x03]);
        assert_eq!(&bytes[3..6], &[0x00, 0x00, 0x0C]); // Cisco OUI
        assert_eq!(u16::from_be_bytes([bytes[6], bytes[7]]), 0x2000); // CDP
        assert_eq!(header.hex_string(), "aa:aa:03:00:00:0c:20:00");
    }

    #[test]
    fn test_llc_snap_packet_to_bytes() {
        let payload = vec![0x01, 0x02, 0x03, 0x04];
        let packet = LlcSnapBuilder::cdp()
            .payload(UnknownBuilder::new(payload.clone()))
            .build();

        let bytes = packet.raw_data();
        assert_eq!(bytes.len(), LlcSnapHeader::SIZE + payload.len());
        assert_eq!(&bytes[8..], &payload[..]);
        assert_eq!(packet.length(), 12);
    }

    #[test]
    fn test_llc_snap_custom_fields() {
        let packet = LlcSnapBuilder::new()
            .dsap(LlcSap::STP)
            .ssap(LlcSap::Custom(0x43))
            .control(LlcControl::Custom(0x13))
            .oui(Oui::from([0x01, 0x02, 0x03]))
            .protocol_id(SnapProtocolId::from(0x1234))
            .build();

        assert_eq!(packet.hex_string(), "42 43 13 01 02 03 12 34");

        let llc = packet.get_as::<LlcSnapPacket>().unwrap().llc_header();
        assert_eq!(llc.dsap(), LlcSap::STP);
        assert_eq!(llc.ssap().to_u8(), 0x43);
        assert_eq!(llc.control().to_u8(), 0x13);
        assert_eq!(llc.oui(), Oui([0x01, 0x02, 0x03]));
        assert_eq!(llc.protocol_id().to_u16(), 0x1234);
    }

    #[test]
    fn test_llc_snap_text() {
        let packet = LlcSnapBuilder::cdp().build();
        assert_eq!(
            packet.text(),
            "[LLC/SNAP Header (8 bytes)]\n  DSAP: 0xaa\n  SSAP: 0xaa\n  Control: 0x03\n  OUI: 00:00:0c\n  Protocol ID: 0x2000\n"
        );
    }

    #[test]
    fn test_llc_snap_round_trip() {
        let packet = LlcSnapBuilder::new()
            .oui(Oui::CISCO)
            .protocol_id(SnapProtocolId::VTP)
            .payload(UnknownBuilder::new(vec![0x01]))
            .build();
        let rebuilt = packet.builder().build();

        assert!(packet.equals(rebuilt.as_ref()));
        assert_eq!(packet.hash_code(), rebuilt.hash_code());
    }

    #[test]
    fn test_llc_snap_inequality() {
        let cdp = LlcSnapBuilder::cdp().build();
        let dtp = LlcSnapBuilder::cdp()
            .protocol_id(SnapProtocolId::DTP)
            .build();
        assert!(*cdp != *dtp);
    }

    #[test]
    fn test_protocol_id_constants() {
        assert_eq!(SnapProtocolId::CDP.0, 0x2000);
        assert_eq!(SnapProtocolId::VTP.0, 0x2003);
        assert_eq!(SnapProtocolId::DTP.0, 0x2004);
        assert_eq!(SnapProtocolId::UDLD.0, 0x0111);
    }
}
