//! Aligned storage for kernel operands.
//!
//! Lane loads assume a 32-byte base address. Everything a kernel touches is
//! either allocated here or copied here first.

pub mod aligned;

pub use aligned::{ALIGN, AlignedBuffer, Scalar, is_aligned};
