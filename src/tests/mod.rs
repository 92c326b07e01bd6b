#![cfg(test)]
use crate::codebook::dictionary;
use crate::codec::round_trip;
use crate::{compress, decompress, CodeBook, FrequencyTable, HuffmanTree};
use alloc::vec::Vec;
use rand::{Rng, SeedableRng};

fn rng() -> rand::rngs::SmallRng {
    rand::rngs::SmallRng::seed_from_u64(0xDEADBEEF)
}

/// Inputs of random length drawn from a few differently shaped distributions
fn random_inputs() -> Vec<Vec<u8>> {
    let mut rng = rng();
    let mut inputs = Vec::new();
    for _ in 0..50 {
        let len = rng.gen_range(1..2000);
        inputs.push((0..len).map(|_| rng.gen::<u8>()).collect());
        inputs.push((0..len).map(|_| rng.gen::<u32>().trailing_zeros() as u8).collect());
        inputs.push((0..len).map(|_| b'a' + rng.gen_range(0..3)).collect());
    }
    inputs
}

/// Symbol `i` occurs as often as the `i`th fibonacci number, which makes every merge
/// extend the same chain and gives the deepest possible tree.
fn fibonacci_input(symbols: u8) -> Vec<u8> {
    let (mut a, mut b) = (1usize, 1usize);
    let mut data = Vec::new();
    for symbol in 0..symbols {
        data.extend(core::iter::repeat(symbol).take(a));
        let next = a + b;
        a = b;
        b = next;
    }
    data
}

#[test]
fn random_round_trips() {
    for input in random_inputs() {
        round_trip(&input);
    }
}

#[test]
fn deep_tree_round_trip() {
    let data = fibonacci_input(20);
    let tree = HuffmanTree::build(&FrequencyTable::build(&data).unwrap());
    assert_eq!(tree.depth(), 19);
    round_trip(&data);
}

#[test]
fn dictionary_describes_codebook() {
    let mut inputs = random_inputs();
    inputs.push(fibonacci_input(20));
    for input in inputs {
        let tree = HuffmanTree::build(&FrequencyTable::build(&input).unwrap());
        let (book, tree_section) = CodeBook::generate(&tree);
        let parsed = dictionary::parse(&tree_section).unwrap();
        assert_eq!(parsed.codes, book.inverse());
        assert_eq!(parsed.padding_bits, None);
    }
}

#[test]
fn codes_are_prefix_free() {
    for input in random_inputs() {
        let tree = HuffmanTree::build(&FrequencyTable::build(&input).unwrap());
        let (book, _) = CodeBook::generate(&tree);
        for (left_symbol, left) in book.iter() {
            for (right_symbol, right) in book.iter() {
                if left_symbol != right_symbol {
                    assert!(!left.is_prefix_of(right));
                }
            }
        }
    }
}

#[test]
fn compression_is_deterministic() {
    for input in random_inputs().iter().take(20) {
        let first = compress(input).unwrap();
        let second = compress(input).unwrap();
        assert_eq!(first.payload, second.payload);
        assert_eq!(first.dictionary, second.dictionary);
    }
}

#[test]
fn skewed_input_shrinks() {
    let mut rng = rng();
    let data: Vec<u8> = (0..10_000)
        .map(|_| rng.gen::<u32>().trailing_zeros() as u8)
        .collect();
    let compressed = compress(&data).unwrap();
    assert!(compressed.payload.len() < data.len() / 3);
    assert!(compressed.encoded_bits < compressed.original_bits());
    assert_eq!(decompress(&compressed.payload, &compressed.dictionary).unwrap(), data);
}

#[test]
fn handwritten_dictionary() {
    // a = 0, b = 10, c = 11; "abcabc" is 0 10 11 0 10 11 followed by six zero padding bits
    let payload = [0b0101_1010, 0b1100_0000];
    assert_eq!(decompress(&payload, b"01a01b1c6").unwrap(), b"abcabc");
    // without the trailer the padding decodes as a's
    assert_eq!(decompress(&payload, b"01a01b1c").unwrap(), b"abcabcaaaaaa");
}
