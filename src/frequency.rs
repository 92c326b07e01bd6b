//! Counting how often every byte value occurs in the input.

/// Number of distinct symbols in the alphabet, one per byte value.
pub const ALPHABET_SIZE: usize = 256;

/// Occurrence count of every byte value in some input.
///
/// The table is built once and never changes afterwards. A table always has at
/// least one symbol with a non zero count.
#[derive(Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [usize; ALPHABET_SIZE],
}

#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum FrequencyTableError {
    EmptyInput,
}

#[cfg(feature = "std")]
impl std::error::Error for FrequencyTableError {}

impl core::fmt::Display for FrequencyTableError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FrequencyTableError::EmptyInput => {
                write!(f, "Can't count symbol frequencies of an empty input")
            }
        }
    }
}

impl FrequencyTable {
    pub fn build(data: &[u8]) -> Result<FrequencyTable, FrequencyTableError> {
        if data.is_empty() {
            return Err(FrequencyTableError::EmptyInput);
        }
        let mut counts = [0; ALPHABET_SIZE];
        for &byte in data {
            counts[byte as usize] += 1;
        }
        Ok(FrequencyTable { counts })
    }

    /// How often `symbol` occurred, zero if it never did
    pub fn get(&self, symbol: u8) -> usize {
        self.counts[symbol as usize]
    }

    /// All symbols that occurred at least once with their count, in ascending order of the symbol
    pub fn iter(&self) -> impl Iterator<Item = (u8, usize)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(symbol, count)| (symbol as u8, *count))
    }

    pub fn distinct_symbols(&self) -> usize {
        self.iter().count()
    }

    /// Total amount of bytes that were counted
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

impl core::fmt::Debug for FrequencyTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
