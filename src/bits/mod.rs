//! Moving between codes and the packed payload.
//!
//! Codes are written most significant bit first: the first bit of a code ends up
//! in the highest unused bit of the current byte. The last byte is padded with zeros.
mod bit_reader;
mod bit_writer;

pub use bit_reader::{unpack, BitReader};
pub use bit_writer::{pack, BitWriter, PackError};
