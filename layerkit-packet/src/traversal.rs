//! Chain traversal
//!
//! Iterators over a packet and its nested payloads, and over a builder and
//! its nested payload builders. Both run outermost to innermost and stop
//! at the first layer without a payload.
//!
//! The kind queries live on [`PacketChain`] and [`BuilderChain`], which are
//! implemented for every concrete type and for the trait objects, so the
//! same calls work on a concrete layer and on a built `Box<dyn Packet>`.

use crate::builder::Builder;
use crate::packet::Packet;
use layerkit_core::PacketKind;
use std::iter::FusedIterator;

/// Iterator over a packet chain
#[derive(Debug, Clone)]
pub struct PacketIter<'a> {
    next: Option<&'a dyn Packet>,
}

impl<'a> PacketIter<'a> {
    pub fn new(start: &'a dyn Packet) -> Self {
        PacketIter { next: Some(start) }
    }
}

impl<'a> Iterator for PacketIter<'a> {
    type Item = &'a dyn Packet;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.payload();
        Some(current)
    }
}

impl FusedIterator for PacketIter<'_> {}

/// Iterator over a builder chain
#[derive(Debug, Clone)]
pub struct BuilderIter<'a> {
    next: Option<&'a dyn Builder>,
}

impl<'a> BuilderIter<'a> {
    pub fn new(start: &'a dyn Builder) -> Self {
        BuilderIter { next: Some(start) }
    }
}

impl<'a> Iterator for BuilderIter<'a> {
    type Item = &'a dyn Builder;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.payload_builder();
        Some(current)
    }
}

impl FusedIterator for BuilderIter<'_> {}

/// Kind queries over a packet chain
pub trait PacketChain {
    /// Walk this packet and its payloads, outermost first
    fn iter(&self) -> PacketIter<'_>;

    /// First packet in the chain of `kind` or one of its sub-kinds
    fn get(&self, kind: &PacketKind) -> Option<&dyn Packet> {
        self.iter().find(|p| kind.accepts(p.kind()))
    }

    /// First packet in the chain whose payload is of `kind`
    fn get_outer_of(&self, kind: &PacketKind) -> Option<&dyn Packet> {
        self.iter()
            .find(|p| p.payload().is_some_and(|inner| kind.accepts(inner.kind())))
    }

    fn contains(&self, kind: &PacketKind) -> bool {
        self.get(kind).is_some()
    }

    /// First packet in the chain whose concrete type is `T`
    fn get_as<T: Packet>(&self) -> Option<&T> {
        self.iter().find_map(|p| p.as_any().downcast_ref::<T>())
    }
}

impl PacketChain for dyn Packet {
    fn iter(&self) -> PacketIter<'_> {
        PacketIter::new(self)
    }
}

impl<P: Packet> PacketChain for P {
    fn iter(&self) -> PacketIter<'_> {
        PacketIter::new(self)
    }
}

/// Kind queries over a builder chain
///
/// Kinds are those of the packets the builders produce.
pub trait BuilderChain {
    /// Walk this builder and its payload builders, outermost first
    fn iter(&self) -> BuilderIter<'_>;

    /// First builder in the chain producing `kind` or one of its sub-kinds
    fn get(&self, kind: &PacketKind) -> Option<&dyn Builder> {
        self.iter().find(|b| kind.accepts(b.kind()))
    }

    /// First builder in the chain whose payload builder produces `kind`
    fn get_outer_of(&self, kind: &PacketKind) -> Option<&dyn Builder> {
        self.iter().find(|b| {
            b.payload_builder()
                .is_some_and(|inner| kind.accepts(inner.kind()))
        })
    }

    fn contains(&self, kind: &PacketKind) -> bool {
        self.get(kind).is_some()
    }

    /// First builder in the chain whose concrete type is `T`
    fn get_as<T: Builder>(&self) -> Option<&T> {
        self.iter().find_map(|b| b.as_any().downcast_ref::<T>())
    }
}

impl BuilderChain for dyn Builder {
    fn iter(&self) -> BuilderIter<'_> {
        BuilderIter::new(self)
    }
}

impl<B: Builder> BuilderChain for B {
    fn iter(&self) -> BuilderIter<'_> {
        BuilderIter::new(self)
    }
}
