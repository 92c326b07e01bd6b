/// Reads the bits of a packed payload one at a time, most significant bit first
pub struct BitReader<'s> {
    idx: usize, //index counts bits already read
    end: usize, //number of bits that may be read from source
    source: &'s [u8],
}

impl<'s> BitReader<'s> {
    pub fn new(source: &'s [u8]) -> BitReader<'_> {
        BitReader {
            idx: 0,
            end: source.len() * 8,
            source,
        }
    }

    /// Stops reading `padding_bits` before the end of the source.
    ///
    /// # Panics
    /// Panics if the source holds fewer than `padding_bits` bits.
    pub fn without_padding(mut self, padding_bits: usize) -> Self {
        assert!(padding_bits <= self.source.len() * 8);
        self.end = self.source.len() * 8 - padding_bits;
        self
    }

    pub fn bits_left(&self) -> usize {
        self.end - self.idx
    }

    pub fn bits_read(&self) -> usize {
        self.idx
    }

    pub fn get_bit(&mut self) -> Option<bool> {
        if self.idx >= self.end {
            return None;
        }
        let byte = self.source[self.idx / 8];
        let bit = byte & (0x80 >> (self.idx % 8)) != 0;
        self.idx += 1;
        Some(bit)
    }

    pub fn reset(&mut self, new_source: &'s [u8]) {
        self.idx = 0;
        self.end = new_source.len() * 8;
        self.source = new_source;
    }
}

impl Iterator for BitReader<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        self.get_bit()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.bits_left(), Some(self.bits_left()))
    }
}

impl ExactSizeIterator for BitReader<'_> {}

/// Expands every byte of `source` into its eight bits, in order
pub fn unpack(source: &[u8]) -> BitReader<'_> {
    BitReader::new(source)
}
