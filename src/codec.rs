//! Wires frequency counting, tree construction, code generation and bit packing
//! together into [`compress`] and [`decompress`].

use crate::bits::{self, PackError};
use crate::codebook::dictionary::{self, padding_trailer};
use crate::codebook::{Code, CodeBook, DictionaryError};
use crate::frequency::{FrequencyTable, FrequencyTableError};
use crate::tree::HuffmanTree;
use alloc::vec::Vec;

/// The two artifacts of a compression run and some information about how they were produced
#[derive(Debug, Clone)]
pub struct Compressed {
    /// The packed codes of every input byte
    pub payload: Vec<u8>,
    /// Tree description followed by the padding trailer. Needed to decompress `payload`.
    pub dictionary: Vec<u8>,
    /// Bits in `payload` that carry codes, excluding the padding of the last byte
    pub encoded_bits: usize,
    pub codes: CodeBook,
    pub frequencies: FrequencyTable,
}

impl Compressed {
    /// Size of the uncompressed input in bits
    pub fn original_bits(&self) -> usize {
        self.frequencies.total() * 8
    }

    /// Writes the payload and the dictionary into their respective sinks
    #[cfg(feature = "std")]
    pub fn write_to<P: std::io::Write, D: std::io::Write>(
        &self,
        mut payload: P,
        mut dictionary: D,
    ) -> Result<(), CodecError> {
        payload.write_all(&self.payload)?;
        payload.flush()?;
        dictionary.write_all(&self.dictionary)?;
        dictionary.flush()?;
        Ok(())
    }
}

#[derive(Debug)]
#[non_exhaustive]
pub enum CodecError {
    EmptyInput,
    EmptyDictionary,
    InvalidDictionary(DictionaryError),
    UndecodableBits { bit_offset: usize },
    PackError(PackError),
    #[cfg(feature = "std")]
    Io(std::io::Error),
}

#[cfg(feature = "std")]
impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CodecError::InvalidDictionary(source) => Some(source),
            CodecError::PackError(source) => Some(source),
            CodecError::Io(source) => Some(source),
            _ => None,
        }
    }
}

impl core::fmt::Display for CodecError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CodecError::EmptyInput => write!(f, "The input is empty"),
            CodecError::EmptyDictionary => write!(f, "The dictionary is empty"),
            CodecError::InvalidDictionary(e) => write!(f, "Dictionary content is invalid: {}", e),
            CodecError::UndecodableBits { bit_offset } => write!(
                f,
                "Bits starting at offset {} of the payload don't match any code of the dictionary",
                bit_offset,
            ),
            CodecError::PackError(e) => write!(f, "{}", e),
            #[cfg(feature = "std")]
            CodecError::Io(e) => write!(f, "{}", e),
        }
    }
}

impl From<FrequencyTableError> for CodecError {
    fn from(val: FrequencyTableError) -> Self {
        match val {
            FrequencyTableError::EmptyInput => CodecError::EmptyInput,
        }
    }
}

impl From<DictionaryError> for CodecError {
    fn from(val: DictionaryError) -> Self {
        match val {
            DictionaryError::Empty => CodecError::EmptyDictionary,
            other => CodecError::InvalidDictionary(other),
        }
    }
}

impl From<PackError> for CodecError {
    fn from(val: PackError) -> Self {
        Self::PackError(val)
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for CodecError {
    fn from(val: std::io::Error) -> Self {
        Self::Io(val)
    }
}

/// Compresses `data` into a payload and the dictionary needed to decode it.
///
/// Fails with [`CodecError::EmptyInput`] if `data` is empty.
pub fn compress(data: &[u8]) -> Result<Compressed, CodecError> {
    let frequencies = FrequencyTable::build(data)?;
    let tree = HuffmanTree::build(&frequencies);
    let (codes, mut tree_section) = CodeBook::generate(&tree);
    let (payload, padding_bits) = bits::pack(data, &codes)?;
    tree_section.push(padding_trailer(padding_bits));

    let encoded_bits = payload.len() * 8 - padding_bits as usize;
    vprintln!(
        "Compressed {} bytes into {} bits using {} codes, tree depth: {}",
        data.len(),
        encoded_bits,
        codes.len(),
        tree.depth()
    );

    Ok(Compressed {
        payload,
        dictionary: tree_section,
        encoded_bits,
        codes,
        frequencies,
    })
}

/// Restores the original bytes from a payload and its dictionary.
///
/// The payload is read bit by bit. Every time the bits collected so far form a code
/// of the dictionary the matching symbol is emitted. If the dictionary carries a
/// padding trailer, decoding stops right before the padding. Otherwise every bit of
/// the payload is consumed and bits that don't complete a code at the end are dropped.
pub fn decompress(payload: &[u8], dictionary: &[u8]) -> Result<Vec<u8>, CodecError> {
    let parsed = dictionary::parse(dictionary)?;
    if payload.is_empty() {
        return Err(CodecError::EmptyInput);
    }

    let mut reader = bits::unpack(payload);
    if let Some(padding_bits) = parsed.padding_bits {
        reader = reader.without_padding(padding_bits as usize);
    }
    let last_byte_start = (payload.len() - 1) * 8;

    let mut result = Vec::with_capacity(payload.len() * 2);
    let mut current = Code::new();
    let mut run_start = 0;
    while let Some(bit) = reader.get_bit() {
        if current.is_empty() {
            run_start = reader.bits_read() - 1;
        }
        current.push(bit);

        if let Some(symbol) = parsed.codes.get(&current) {
            result.push(symbol);
            current.clear();
        } else if current.len() >= parsed.codes.max_code_len() {
            // Only possible if the tree has a missing branch, like the single symbol tree.
            // Without a trailer this may be the zero padding of the last byte.
            if parsed.padding_bits.is_none() && run_start >= last_byte_start {
                break;
            }
            return Err(CodecError::UndecodableBits {
                bit_offset: run_start,
            });
        }
    }

    if !current.is_empty() {
        vprintln!("Dropping {} trailing bits: {}", current.len(), current);
    }
    Ok(result)
}

/// Reads all of `source` and compresses it
#[cfg(feature = "std")]
pub fn compress_from<R: std::io::Read>(mut source: R) -> Result<Compressed, CodecError> {
    let mut data = Vec::new();
    source.read_to_end(&mut data)?;
    compress(&data)
}

/// Reads the dictionary, then the payload, and decompresses them
#[cfg(feature = "std")]
pub fn decompress_from<P: std::io::Read, D: std::io::Read>(
    mut payload: P,
    mut dictionary: D,
) -> Result<Vec<u8>, CodecError> {
    let mut dictionary_bytes = Vec::new();
    dictionary.read_to_end(&mut dictionary_bytes)?;
    let mut payload_bytes = Vec::new();
    payload.read_to_end(&mut payload_bytes)?;
    decompress(&payload_bytes, &dictionary_bytes)
}

/// Compresses and decompresses `data` and checks that nothing changed
#[cfg(any(test, feature = "fuzz_exports"))]
pub fn round_trip(data: &[u8]) {
    let compressed = match compress(data) {
        Ok(compressed) => compressed,
        Err(CodecError::EmptyInput) => {
            assert!(data.is_empty());
            return;
        }
        Err(e) => panic!("Compression failed: {:?}", e),
    };
    assert_eq!(compressed.encoded_bits, compressed.codes.encoded_bits(&compressed.frequencies));

    let decompressed = decompress(&compressed.payload, &compressed.dictionary).unwrap();
    assert_eq!(decompressed, data);
}

#[cfg(test)]
mod tests {
    use super::{compress, decompress, round_trip, CodecError};
    use crate::codebook::DictionaryError;
    use alloc::vec;

    #[test]
    fn aaab() {
        let compressed = compress(b"aaab").unwrap();
        // b = 0, a = 1, four bits of padding
        assert_eq!(compressed.payload, vec![0b1110_0000]);
        assert_eq!(compressed.dictionary, b"01b1a4");
        assert_eq!(compressed.encoded_bits, 4);
        assert_eq!(compressed.original_bits(), 32);

        let tree_section = &compressed.dictionary[..compressed.dictionary.len() - 1];
        // neither symbol looks like a marker, so the markers can be counted directly
        assert_eq!(tree_section.iter().filter(|c| **c == b'1').count(), 2);
        assert_eq!(tree_section.iter().filter(|c| **c == b'0').count(), 1);

        let decompressed = decompress(&compressed.payload, &compressed.dictionary).unwrap();
        assert_eq!(decompressed, b"aaab");
    }

    #[test]
    fn single_symbol() {
        let compressed = compress(b"xxxxxxxxxxx").unwrap();
        assert_eq!(compressed.dictionary, b"1x5");
        assert_eq!(compressed.payload, vec![0xff, 0b1110_0000]);
        round_trip(b"xxxxxxxxxxx");
        round_trip(b"x");
    }

    #[test]
    fn empty_input() {
        assert!(matches!(compress(b""), Err(CodecError::EmptyInput)));
        assert!(matches!(
            decompress(b"", b"01a1b"),
            Err(CodecError::EmptyInput)
        ));
    }

    #[test]
    fn deterministic() {
        let data = b"a man, a plan, a canal: panama";
        let first = compress(data).unwrap();
        let second = compress(data).unwrap();
        assert_eq!(first.payload, second.payload);
        assert_eq!(first.dictionary, second.dictionary);
    }

    #[test]
    fn dictionary_errors() {
        assert!(matches!(
            decompress(&[0x00], b""),
            Err(CodecError::EmptyDictionary)
        ));
        assert!(matches!(
            decompress(&[0x00], b"01a2b"),
            Err(CodecError::InvalidDictionary(DictionaryError::InvalidMarker {
                offset: 3,
                found: b'2'
            }))
        ));
        assert!(matches!(
            decompress(&[0x00], b"001a1b"),
            Err(CodecError::InvalidDictionary(DictionaryError::Truncated { .. }))
        ));
    }

    #[test]
    fn dictionary_without_trailer() {
        // Every bit of the payload is decoded, so the zero padding turns into a's
        assert_eq!(decompress(&[0b0100_0000], b"01a1b").unwrap(), b"abaaaaaa");
        // Zeros never match the code of a lone symbol and are dropped
        assert_eq!(decompress(&[0b1110_0000], b"1x").unwrap(), b"xxx");
    }

    #[test]
    fn undecodable_bits() {
        assert!(matches!(
            decompress(&[0b1011_1111], b"1x0"),
            Err(CodecError::UndecodableBits { bit_offset: 1 })
        ));
        assert!(matches!(
            decompress(&[0b1000_0000, 0xff], b"1x"),
            Err(CodecError::UndecodableBits { bit_offset: 1 })
        ));
    }

    #[test]
    fn round_trips() {
        round_trip(b"");
        round_trip(b"aaab");
        round_trip(b"ab");
        round_trip(b"abracadabra");
        round_trip(&[0u8; 1000]);
        let all_bytes: alloc::vec::Vec<u8> = (0..=255u8).cycle().take(3000).collect();
        round_trip(&all_bytes);
    }

    #[cfg(feature = "std")]
    #[test]
    fn readers_and_writers() {
        use super::{compress_from, decompress_from};
        use std::io::Cursor;

        let data = b"It was the best of times, it was the worst of times";
        let compressed = compress_from(Cursor::new(&data[..])).unwrap();

        let mut payload = std::vec::Vec::new();
        let mut dictionary = std::vec::Vec::new();
        compressed.write_to(&mut payload, &mut dictionary).unwrap();
        assert_eq!(payload, compressed.payload);
        assert_eq!(dictionary, compressed.dictionary);

        let decompressed =
            decompress_from(Cursor::new(payload), Cursor::new(dictionary)).unwrap();
        assert_eq!(decompressed, &data[..]);
    }
}
