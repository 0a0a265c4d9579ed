use bitvec::prelude::*;

const DIGITS: &str = "0123456789";
const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A set of accepted ASCII characters for string fields.
///
/// One bit per ASCII code point; characters outside ASCII are never members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Whitelist {
    bits: BitArray<[u64; 2], Lsb0>,
}

impl Whitelist {
    /// Creates an empty whitelist.
    pub fn empty() -> Self {
        Self {
            bits: BitArray::ZERO,
        }
    }

    /// `0-9 a-z A-Z`
    pub fn alnum() -> Self {
        let mut list = Self::empty();
        list.extend(DIGITS);
        list.extend(LOWER);
        list.extend(UPPER);
        list
    }

    /// `0-9 a-z A-Z` and the space character.
    pub fn alnum_space() -> Self {
        let mut list = Self::alnum();
        list.extend(" ");
        list
    }

    /// Adds every ASCII character of `chars` to the set.
    pub fn extend(&mut self, chars: &str) {
        for c in chars.chars().filter(char::is_ascii) {
            self.bits.set(c as usize, true);
        }
    }

    /// Returns true if `c` is a member of the set.
    pub fn contains(&self, c: char) -> bool {
        c.is_ascii() && self.bits[c as usize]
    }

    /// Number of accepted characters.
    pub fn len(&self) -> usize {
        self.bits.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }
}

impl Default for Whitelist {
    fn default() -> Self {
        Self::empty()
    }
}
