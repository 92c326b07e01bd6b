//! Huffman compression with a self-describing side dictionary.
//!
//! Compression produces two artifacts: the packed payload and a dictionary that
//! describes the shape of the Huffman tree. Both are needed to get the original
//! bytes back.
//!
//! ```rust
//! let compressed = ruhuff::compress(b"abracadabra").unwrap();
//! let original = ruhuff::decompress(&compressed.payload, &compressed.dictionary).unwrap();
//! assert_eq!(original, b"abracadabra");
//! ```
#![no_std]
#![deny(trivial_casts, trivial_numeric_casts, rust_2018_idioms)]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

#[cfg(feature = "std")]
pub const VERBOSE: bool = false;

macro_rules! vprintln {
    ($($x:expr),*) => {
        #[cfg(feature = "std")]
        if crate::VERBOSE {
            std::println!($($x),*);
        }
    }
}

pub mod bits;
pub mod codebook;
pub mod codec;
pub mod frequency;
pub mod tree;
mod tests;

pub use codebook::{Code, CodeBook, InverseCodeBook};
pub use codec::{compress, decompress, CodecError, Compressed};
pub use frequency::FrequencyTable;
pub use tree::HuffmanTree;
