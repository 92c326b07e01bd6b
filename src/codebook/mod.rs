//! Codes derived from a [`HuffmanTree`] and the dictionary that describes them.
//!
//! The forward [`CodeBook`] maps every symbol to its path in the tree and is used for
//! compression. The [`InverseCodeBook`] maps paths back to symbols and is only ever
//! rebuilt from dictionary bytes, never from a tree.
use crate::frequency::{FrequencyTable, ALPHABET_SIZE};
use crate::tree::{HuffmanTree, Node, NodeIndex};
use alloc::collections::BTreeMap;
use alloc::vec::Vec;

pub mod dictionary;
pub use dictionary::{DictionaryError, ParsedDictionary};

/// Longest code a tree over a byte alphabet can produce: 256 leaves in a completely
/// unbalanced tree.
pub const MAX_CODE_LEN: usize = ALPHABET_SIZE - 1;

/// A path from the root of a tree to one of its leaves. `false` is a step to the left
/// child, `true` a step to the right child.
///
/// Bits beyond `len` are always zero, so the derived comparisons only depend on the
/// bits that are part of the code.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Code {
    len: u8,
    bits: [u64; 4],
}

impl Code {
    pub fn new() -> Self {
        Code::default()
    }

    /// The code given to the only symbol of a tree that consists of a single leaf.
    ///
    /// A path of length zero can't be written to the payload, so the symbol gets one bit.
    /// A `1` is used because the zero padding of the last payload byte can never match it.
    pub fn single_symbol() -> Self {
        let mut code = Code::new();
        code.push(true);
        code
    }

    pub fn from_bits(bits: &[bool]) -> Self {
        let mut code = Code::new();
        for &bit in bits {
            code.push(bit);
        }
        code
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// # Panics
    /// Panics if the code already holds [`MAX_CODE_LEN`] bits.
    pub fn push(&mut self, bit: bool) {
        assert!(
            self.len() < MAX_CODE_LEN,
            "Code can't be longer than {} bits",
            MAX_CODE_LEN
        );
        let idx = self.len();
        if bit {
            self.bits[idx / 64] |= 1 << (idx % 64);
        }
        self.len += 1;
    }

    pub fn pop(&mut self) -> Option<bool> {
        if self.is_empty() {
            return None;
        }
        let idx = self.len() - 1;
        let bit = self.get(idx);
        self.bits[idx / 64] &= !(1 << (idx % 64));
        self.len -= 1;
        Some(bit)
    }

    pub fn last(&self) -> Option<bool> {
        if self.is_empty() {
            None
        } else {
            Some(self.get(self.len() - 1))
        }
    }

    /// # Panics
    /// Panics if `idx` is out of bounds.
    pub fn get(&self, idx: usize) -> bool {
        assert!(idx < self.len());
        self.bits[idx / 64] & (1 << (idx % 64)) != 0
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len()).map(move |idx| self.get(idx))
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len() <= other.len() && (0..self.len()).all(|idx| self.get(idx) == other.get(idx))
    }

    pub fn clear(&mut self) {
        *self = Code::new();
    }
}

impl core::fmt::Display for Code {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl core::fmt::Debug for Code {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Code({})", self)
    }
}

/// Maps every symbol that occurred in the input to its code
#[derive(Clone, PartialEq, Eq)]
pub struct CodeBook {
    /// Index is the symbol
    codes: Vec<Option<Code>>,
}

impl CodeBook {
    /// Walks the tree depth first, left before right, assigning every leaf the path
    /// that leads to it. The same walk produces the dictionary: a `'0'` for every
    /// internal node that is entered and a `'1'` followed by the raw symbol for every leaf.
    pub fn generate(tree: &HuffmanTree) -> (CodeBook, Vec<u8>) {
        let mut book = CodeBook {
            codes: alloc::vec![None; ALPHABET_SIZE],
        };
        let mut dictionary = Vec::with_capacity(3 * tree.leaf_count());

        match *tree.node(tree.root()) {
            Node::Leaf { symbol, .. } => {
                book.codes[symbol as usize] = Some(Code::single_symbol());
                dictionary.push(dictionary::LEAF_MARKER);
                dictionary.push(symbol);
            }
            Node::Internal { .. } => {
                book.visit(tree, tree.root(), &mut Code::new(), &mut dictionary);
            }
        }

        (book, dictionary)
    }

    fn visit(
        &mut self,
        tree: &HuffmanTree,
        idx: NodeIndex,
        path: &mut Code,
        dictionary: &mut Vec<u8>,
    ) {
        match *tree.node(idx) {
            Node::Leaf { symbol, .. } => {
                self.codes[symbol as usize] = Some(*path);
                dictionary.push(dictionary::LEAF_MARKER);
                dictionary.push(symbol);
            }
            Node::Internal { left, right, .. } => {
                dictionary.push(dictionary::INTERNAL_MARKER);
                path.push(false);
                self.visit(tree, left, path, dictionary);
                path.pop();
                path.push(true);
                self.visit(tree, right, path, dictionary);
                path.pop();
            }
        }
    }

    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes[symbol as usize].as_ref()
    }

    /// All symbols with a code, in ascending order of the symbol
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.as_ref().map(|code| (symbol as u8, code)))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Amount of bits the input described by `frequencies` takes up once encoded, padding excluded
    pub fn encoded_bits(&self, frequencies: &FrequencyTable) -> usize {
        self.iter()
            .map(|(symbol, code)| frequencies.get(symbol) * code.len())
            .sum()
    }

    pub fn inverse(&self) -> InverseCodeBook {
        let mut inverse = InverseCodeBook::new();
        for (symbol, code) in self.iter() {
            inverse.insert(*code, symbol);
        }
        inverse
    }
}

impl core::fmt::Debug for CodeBook {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Maps codes back to the symbols they stand for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InverseCodeBook {
    symbols: BTreeMap<Code, u8>,
    max_code_len: usize,
}

impl InverseCodeBook {
    pub fn new() -> Self {
        InverseCodeBook::default()
    }

    pub(crate) fn insert(&mut self, code: Code, symbol: u8) {
        self.max_code_len = usize::max(self.max_code_len, code.len());
        self.symbols.insert(code, symbol);
    }

    pub fn get(&self, code: &Code) -> Option<u8> {
        self.symbols.get(code).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Code, u8)> + '_ {
        self.symbols.iter().map(|(code, symbol)| (code, *symbol))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn max_code_len(&self) -> usize {
        self.max_code_len
    }
}

#[cfg(test)]
mod tests {
    use super::{Code, CodeBook, MAX_CODE_LEN};
    use crate::frequency::FrequencyTable;
    use crate::tree::HuffmanTree;
    use alloc::string::ToString;
    use alloc::vec::Vec;

    fn generate(data: &[u8]) -> (CodeBook, Vec<u8>) {
        let frequencies = FrequencyTable::build(data).unwrap();
        CodeBook::generate(&HuffmanTree::build(&frequencies))
    }

    #[test]
    fn code_push_pop() {
        let mut code = Code::new();
        assert!(code.is_empty());
        assert_eq!(code.last(), None);
        code.push(true);
        code.push(false);
        code.push(true);
        assert_eq!(code.to_string(), "101");
        assert_eq!(code.last(), Some(true));
        assert_eq!(code.pop(), Some(true));
        assert_eq!(code.pop(), Some(false));
        assert_eq!(code, Code::from_bits(&[true]));
        assert_eq!(code.pop(), Some(true));
        assert_eq!(code.pop(), None);
        assert_eq!(code, Code::new());
    }

    #[test]
    fn code_spans_words() {
        let mut code = Code::new();
        for idx in 0..MAX_CODE_LEN {
            code.push(idx % 3 == 0);
        }
        assert_eq!(code.len(), MAX_CODE_LEN);
        for idx in 0..MAX_CODE_LEN {
            assert_eq!(code.get(idx), idx % 3 == 0);
        }
        while code.pop().is_some() {}
        assert_eq!(code, Code::new());
    }

    #[test]
    #[should_panic]
    fn code_overflow() {
        let mut code = Code::new();
        for _ in 0..=MAX_CODE_LEN {
            code.push(false);
        }
    }

    #[test]
    fn prefixes() {
        let short = Code::from_bits(&[false, true]);
        let long = Code::from_bits(&[false, true, true]);
        assert!(short.is_prefix_of(&long));
        assert!(short.is_prefix_of(&short));
        assert!(!long.is_prefix_of(&short));
        assert!(!Code::from_bits(&[true]).is_prefix_of(&long));
    }

    #[test]
    fn aaab() {
        let (book, dictionary) = generate(b"aaab");
        assert_eq!(book.len(), 2);
        assert!(book.get(b'a').unwrap().len() <= book.get(b'b').unwrap().len());
        assert_eq!(book.get(b'b'), Some(&Code::from_bits(&[false])));
        assert_eq!(book.get(b'a'), Some(&Code::from_bits(&[true])));
        assert_eq!(book.get(b'c'), None);
        assert_eq!(dictionary, b"01b1a");
    }

    #[test]
    fn single_symbol() {
        let (book, dictionary) = generate(b"xxxxxxx");
        assert_eq!(book.len(), 1);
        assert_eq!(book.get(b'x'), Some(&Code::single_symbol()));
        assert_eq!(dictionary, b"1x");
    }

    #[test]
    fn frequent_symbols_get_short_codes() {
        let (book, _) = generate(b"aaaaaaaaaaaaaaaabbbbbbbbccccdde");
        let lengths: Vec<usize> = [b'a', b'b', b'c', b'd', b'e']
            .iter()
            .map(|symbol| book.get(*symbol).unwrap().len())
            .collect();
        assert_eq!(lengths, alloc::vec![1, 2, 3, 4, 4]);
    }

    #[test]
    fn prefix_free() {
        let (book, _) = generate(b"the quick brown fox jumps over the lazy dog, again and again");
        for (left_symbol, left) in book.iter() {
            for (right_symbol, right) in book.iter() {
                if left_symbol != right_symbol {
                    assert!(!left.is_prefix_of(right), "{} is a prefix of {}", left, right);
                }
            }
        }
    }

    #[test]
    fn encoded_bits() {
        let data = b"aaaaaaaaaaaaaaaabbbbbbbbccccdde";
        let frequencies = FrequencyTable::build(data).unwrap();
        let (book, _) = CodeBook::generate(&HuffmanTree::build(&frequencies));
        assert_eq!(book.encoded_bits(&frequencies), 16 + 8 * 2 + 4 * 3 + 2 * 4 + 4);
    }

    #[test]
    fn inverse() {
        let (book, _) = generate(b"abracadabra");
        let inverse = book.inverse();
        assert_eq!(inverse.len(), book.len());
        for (symbol, code) in book.iter() {
            assert_eq!(inverse.get(code), Some(symbol));
        }
        let longest = book.iter().map(|(_, code)| code.len()).max().unwrap();
        assert_eq!(inverse.max_code_len(), longest);
    }
}
