//! Composite, self-memoizing packet representation
//!
//! A packet is an immutable chain of layers. Each layer exposes an optional
//! [`Header`] and an optional payload, which is itself a [`Packet`]. The
//! derived views of a layer (length, raw bytes, hex dump, text rendering
//! and hash) are composed from the parts and computed at most once.
//!
//! Packets are produced by [`Builder`]s, which mirror the layer chain and
//! can be rebuilt any number of times. Every packet can hand back a builder
//! pre-filled with its own values.
//!
//! # Architecture
//!
//! - [`header`] - header contract and its memoized views
//! - [`packet`] - packet contract, composition defaults and equality
//! - [`builder`] - builder contract
//! - [`traversal`] - iteration and kind lookup over packet and builder chains
//! - [`ethernet`], [`llc`], [`udp`], [`unknown`] - concrete layers
//!
//! # Quick Start
//!
//! ```rust
//! use layerkit_packet::ethernet::{EthernetBuilder, MacAddress};
//! use layerkit_packet::udp::{UdpBuilder, UdpPacket};
//! use layerkit_packet::unknown::UnknownBuilder;
//! use layerkit_packet::{Builder, PacketChain};
//!
//! let frame = EthernetBuilder::new()
//!     .dst_addr(MacAddress::BROADCAST)
//!     .payload(
//!         UdpBuilder::new()
//!             .src_port(68u16)
//!             .dst_port(67u16)
//!             .payload(UnknownBuilder::new(vec![0x01, 0x01, 0x06, 0x00])),
//!     )
//!     .build();
//!
//! let udp = frame.get_as::<UdpPacket>().unwrap();
//! assert_eq!(udp.udp_header().dst_port().to_u16(), 67);
//! assert!(frame.contains(&UdpPacket::KIND));
//! println!("{}", frame);
//! ```

pub mod builder;
pub mod ethernet;
pub mod header;
pub mod llc;
pub mod packet;
pub mod traversal;
pub mod udp;
pub mod unknown;

// Re-export commonly used types for convenience
pub use builder::Builder;
pub use ethernet::{EtherType, EthernetBuilder, EthernetHeader, EthernetPacket, MacAddress};
pub use header::{Header, HeaderCache};
pub use llc::{LlcSnapBuilder, LlcSnapHeader, LlcSnapPacket, Oui, SnapProtocolId};
pub use packet::{Packet, PacketCache};
pub use traversal::{BuilderChain, BuilderIter, PacketChain, PacketIter};
pub use udp::{UdpBuilder, UdpHeader, UdpPacket, UdpPort};
pub use unknown::{UnknownBuilder, UnknownPacket};

pub use layerkit_core::{Error, Memo, PacketKind, Result};
