//! Byte-level plumbing shared by the BCON codec family.
//!
//! [`Writer`] is an auto-growing in-memory buffer with little-endian
//! fixed-width write methods. [`ByteSink`] abstracts the write side so
//! encoders can target a channel as well as a buffer, and [`ByteSource`]
//! is the pull-one-byte read contract the streaming JSON decoder runs on.

mod sink;
mod source;
mod writer;

pub use sink::ByteSink;
pub use source::{ByteSource, ReadSource, SliceSource};
pub use writer::Writer;
