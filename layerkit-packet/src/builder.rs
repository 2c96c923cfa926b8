//! Builder composite
//!
//! A builder is the mutable side of a packet: it collects field values,
//! optionally holds the builder of the next layer, and emits a fresh
//! immutable packet chain on every [`build`](Builder::build) call.
//!
//! # Examples
//!
//! ```
//! use layerkit_packet::ethernet::{EtherType, EthernetBuilder, MacAddress};
//! use layerkit_packet::udp::UdpBuilder;
//! use layerkit_packet::unknown::UnknownBuilder;
//! use layerkit_packet::{Builder, Packet};
//!
//! let builder = EthernetBuilder::new()
//!     .src_addr(MacAddress([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]))
//!     .dst_addr(MacAddress::BROADCAST)
//!     .ether_type(EtherType::IPv4)
//!     .payload(
//!         UdpBuilder::new()
//!             .src_port(54321u16)
//!             .dst_port(53u16)
//!             .payload(UnknownBuilder::new(vec![0x12, 0x34])),
//!     );
//!
//! let frame = builder.build();
//! assert_eq!(frame.length(), 60); // padded to the Ethernet minimum
//! assert!(frame.equals(builder.build().as_ref()));
//! ```

use crate::packet::Packet;
use layerkit_core::{Error, PacketKind, Result};
use std::any::Any;
use std::fmt;
use tracing::debug;

/// Staging object that finalizes into a [`Packet`]
pub trait Builder: fmt::Debug + Send + 'static {
    /// Kind of the packet this builder produces
    fn kind(&self) -> &'static PacketKind;

    fn as_any(&self) -> &dyn Any;

    /// Build an independent packet from the current field values.
    ///
    /// The builder is left untouched and can be built again.
    fn build(&self) -> Box<dyn Packet>;

    /// Builder of the next layer, if any
    fn payload_builder(&self) -> Option<&dyn Builder> {
        None
    }

    /// Attach the builder of the next layer, replacing any previous one.
    ///
    /// Returns this builder so calls can be chained.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedOperation`] unless the packet this
    /// builder produces carries a payload.
    fn set_payload_builder(&mut self, builder: Box<dyn Builder>) -> Result<&mut dyn Builder> {
        debug!(kind = %self.kind(), payload = %builder.kind(), "payload builder rejected");
        Err(Error::unsupported(format!(
            "{} builder does not take a payload builder",
            self.kind()
        )))
    }
}
