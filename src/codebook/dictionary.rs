//! Reading and writing the dictionary that accompanies a compressed payload.
//!
//! The dictionary is a pre-order description of the tree: `'0'` marks an internal
//! node whose two subtrees follow, `'1'` marks a leaf and is followed by the raw
//! symbol byte. The structural markers are ASCII characters, the symbols are not.
//!
//! The codec appends one more byte once the tree is complete: an ASCII digit
//! `'0'..='7'` holding the number of zero bits that pad the last payload byte.
//! The trailer is optional when parsing.

use super::{Code, CodeBook, InverseCodeBook, MAX_CODE_LEN};
use crate::tree::HuffmanTree;
use alloc::vec::Vec;

pub const INTERNAL_MARKER: u8 = b'0';
pub const LEAF_MARKER: u8 = b'1';

/// The tree section of the dictionary for `tree`, without a padding trailer
pub fn serialize(tree: &HuffmanTree) -> Vec<u8> {
    CodeBook::generate(tree).1
}

/// Encodes the amount of padding bits as the trailer byte
pub(crate) fn padding_trailer(padding_bits: u8) -> u8 {
    assert!(padding_bits < 8);
    b'0' + padding_bits
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDictionary {
    pub codes: InverseCodeBook,
    /// Padding of the last payload byte, if the dictionary carried a trailer
    pub padding_bits: Option<u8>,
}

#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum DictionaryError {
    Empty,
    InvalidMarker { offset: usize, found: u8 },
    TooDeep { offset: usize },
    Truncated { entries: usize },
    InvalidPadding { offset: usize, found: u8 },
    TrailingData { offset: usize },
}

#[cfg(feature = "std")]
impl std::error::Error for DictionaryError {}

impl core::fmt::Display for DictionaryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DictionaryError::Empty => write!(f, "The dictionary doesn't contain any entries"),
            DictionaryError::InvalidMarker { offset, found } => write!(
                f,
                "Expected a node marker ('0' or '1') at offset {}, found byte 0x{:02x}",
                offset, found,
            ),
            DictionaryError::TooDeep { offset } => write!(
                f,
                "Tree described by the dictionary is deeper than {} levels at offset {}",
                MAX_CODE_LEN, offset,
            ),
            DictionaryError::Truncated { entries } => write!(
                f,
                "Dictionary ended before the tree was complete, after {} entries",
                entries,
            ),
            DictionaryError::InvalidPadding { offset, found } => write!(
                f,
                "Expected the amount of padding bits ('0' to '7') at offset {}, found byte 0x{:02x}",
                offset, found,
            ),
            DictionaryError::TrailingData { offset } => {
                write!(f, "Unexpected data after the dictionary at offset {}", offset)
            }
        }
    }
}

/// Rebuilds the code of every symbol from the dictionary.
///
/// No tree is materialized. The parser keeps the path to the current node and, after
/// each leaf, walks back up past all right edges and continues with the right sibling
/// of the deepest left edge. A leaf whose path consists of right edges only is the
/// last leaf of the tree.
pub fn parse(source: &[u8]) -> Result<ParsedDictionary, DictionaryError> {
    let mut codes = InverseCodeBook::new();
    let mut path = Code::new();
    let mut offset = 0;
    let mut complete = false;

    while !complete && offset < source.len() {
        match source[offset] {
            INTERNAL_MARKER => {
                if path.len() == MAX_CODE_LEN {
                    return Err(DictionaryError::TooDeep { offset });
                }
                path.push(false);
                offset += 1;
            }
            LEAF_MARKER => {
                let symbol = match source.get(offset + 1) {
                    Some(symbol) => *symbol,
                    None => break,
                };
                if path.is_empty() {
                    codes.insert(Code::single_symbol(), symbol);
                    complete = true;
                } else {
                    codes.insert(path, symbol);
                    if path.iter().all(|bit| bit) {
                        complete = true;
                    } else {
                        next_sibling(&mut path);
                    }
                }
                offset += 2;
            }
            found => return Err(DictionaryError::InvalidMarker { offset, found }),
        }
    }

    if !complete {
        if codes.is_empty() {
            return Err(DictionaryError::Empty);
        }
        return Err(DictionaryError::Truncated {
            entries: codes.len(),
        });
    }

    let padding_bits = match source.get(offset) {
        None => None,
        Some(&found) if (b'0'..=b'7').contains(&found) => Some(found - b'0'),
        Some(&found) => return Err(DictionaryError::InvalidPadding { offset, found }),
    };
    if padding_bits.is_some() && offset + 1 < source.len() {
        return Err(DictionaryError::TrailingData { offset: offset + 1 });
    }

    vprintln!(
        "Parsed dictionary with {} entries, padding: {:?}",
        codes.len(),
        padding_bits
    );

    Ok(ParsedDictionary {
        codes,
        padding_bits,
    })
}

/// Moves `path` from a leaf to the next node in pre-order. `path` must contain a left edge.
fn next_sibling(path: &mut Code) {
    while path.len() > 1 && path.last() == Some(true) {
        path.pop();
    }
    path.pop();
    path.push(true);
}
