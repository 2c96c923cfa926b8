//! layerkit core library
//!
//! This crate provides the leaf utilities every layerkit packet is built
//! on: the error type, the [`PacketKind`] type descriptor, the [`Memo`]
//! write-once cache cell and the byte array helpers used for hex
//! formatting and hashing.

pub mod byte_arrays;
pub mod error;
pub mod kind;
pub mod memo;

// Re-export commonly used types
pub use error::{Error, Result};
pub use kind::PacketKind;
pub use memo::Memo;
