use crate::codebook::{Code, CodeBook};
use alloc::vec::Vec;

/// An interface for writing an arbitrary number of bits into a buffer
pub struct BitWriter {
    /// The buffer that's filled with completed bytes
    output: Vec<u8>,
    /// The byte currently being filled, starting from the most significant bit
    current: u8,
    /// The number of bits that have been written into the writer so far
    bit_idx: usize,
}

#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum PackError {
    MissingCode { symbol: u8 },
}

#[cfg(feature = "std")]
impl std::error::Error for PackError {}

impl core::fmt::Display for PackError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PackError::MissingCode { symbol } => {
                write!(f, "Symbol 0x{:02x} has no code in the code book", symbol)
            }
        }
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl BitWriter {
    /// Initialize a new writer. Write new bits into the buffer with `write_bit` or
    /// `write_code`, and obtain the output using `dump`
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Like `new` with room for `bytes` output bytes
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            output: Vec::with_capacity(bytes),
            current: 0,
            bit_idx: 0,
        }
    }

    pub fn write_bit(&mut self, bit: bool) {
        let free_bits_in_current_byte = 8 - (self.bit_idx % 8);
        if bit {
            self.current |= 1 << (free_bits_in_current_byte - 1);
        }
        self.bit_idx += 1;
        if self.bit_idx % 8 == 0 {
            self.output.push(self.current);
            self.current = 0;
        }
    }

    pub fn write_code(&mut self, code: &Code) {
        for bit in code.iter() {
            self.write_bit(bit);
        }
    }

    pub fn bits_written(&self) -> usize {
        self.bit_idx
    }

    /// Returns the populated buffer and the number of zero bits that were added
    /// to fill up the last byte.
    ///
    /// This function consumes the writer, so it cannot be used after
    /// dumping
    pub fn dump(mut self) -> (Vec<u8>, u8) {
        let padding = ((8 - self.bit_idx % 8) % 8) as u8;
        if padding > 0 {
            self.output.push(self.current);
        }
        (self.output, padding)
    }
}

/// Concatenates the codes of every symbol in `data` and packs them into bytes.
///
/// Returns the packed bytes together with the number of padding bits in the last byte.
pub fn pack(data: &[u8], codes: &CodeBook) -> Result<(Vec<u8>, u8), PackError> {
    let mut writer = BitWriter::with_capacity(data.len() / 2);
    for &symbol in data {
        let code = codes
            .get(symbol)
            .ok_or(PackError::MissingCode { symbol })?;
        writer.write_code(code);
    }
    Ok(writer.dump())
}
