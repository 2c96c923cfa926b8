//! Example: Building an Ethernet/UDP frame
//!
//! Builds a DNS query inside UDP inside Ethernet, prints the layered text
//! rendering and hex dump, then walks the chain and rebuilds the frame
//! from its own builder.
//!
//! Build events are logged at trace level.

use layerkit_packet::ethernet::{EtherType, EthernetBuilder, MacAddress};
use layerkit_packet::udp::{UdpBuilder, UdpPacket, UdpPort};
use layerkit_packet::unknown::UnknownBuilder;
use layerkit_packet::{Builder, Packet, PacketChain};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    let src_mac = MacAddress([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
    let dst_mac = MacAddress([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);

    // DNS query header (simplified)
    let dns_query = vec![
        0x12, 0x34, // Transaction ID
        0x01, 0x00, // Flags: standard query
        0x00, 0x01, // Questions: 1
        0x00, 0x00, // Answer RRs: 0
        0x00, 0x00, // Authority RRs: 0
        0x00, 0x00, // Additional RRs: 0
    ];

    let builder = EthernetBuilder::new()
        .src_addr(src_mac)
        .dst_addr(dst_mac)
        .ether_type(EtherType::IPv4)
        .payload(
            UdpBuilder::new()
                .src_port(54321u16)
                .dst_port(UdpPort::DNS)
                .payload(UnknownBuilder::new(dns_query)),
        );

    let frame = builder.build();

    println!("Frame built: {} bytes", frame.length());
    println!();
    print!("{}", frame);
    println!();
    println!("Hex: {}", frame.hex_string());
    println!();

    let layers: Vec<&str> = frame.iter().map(|p| p.kind().name()).collect();
    println!("Layers: {}", layers.join(" / "));

    if let Some(udp) = frame.get_as::<UdpPacket>() {
        println!(
            "UDP {} -> {} (length field {})",
            udp.udp_header().src_port(),
            udp.udp_header().dst_port(),
            udp.udp_header().length_field()
        );
    }

    let rebuilt = frame.builder().build();
    println!("Rebuilt frame equal: {}", frame.equals(rebuilt.as_ref()));
    println!("Hash code: {}", frame.hash_code());
}
