//! Fixed-length short code generation over a configurable alphabet.
//!
//! An identifier is written as a positional number in base `|alphabet|`,
//! most significant symbol first, left-padded with the alphabet's first
//! symbol up to the configured length.

use std::collections::HashMap;

use crate::domain::codec::Codec;
use crate::domain::errors::CodecError;

/// Positional codec mapping `[0, base^length)` onto codes of exactly `length` symbols.
///
/// Symbols are Unicode scalar values, so `length` counts characters rather
/// than bytes.
///
/// # Duplicate symbols
///
/// An alphabet with repeated symbols is accepted, but decoding resolves a
/// repeated symbol to its first position. Codes produced from the later
/// positions therefore decode to a different identifier. A warning is logged
/// when such an alphabet is configured.
///
/// # Examples
///
/// ```ignore
/// let codec = AlphabetCodec::new("abc", 5)?;
/// assert_eq!(codec.encode(4)?, "aaabb");
/// assert_eq!(codec.decode("aaabb")?, 4);
/// ```
#[derive(Debug, Clone)]
pub struct AlphabetCodec {
    symbols: Vec<char>,
    positions: HashMap<char, u64>,
    length: usize,
    /// `base^length`, or `None` when it exceeds the `u64` range.
    limit: Option<u64>,
}

impl AlphabetCodec {
    /// Builds a codec from an alphabet and a fixed code length.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidLength`] if `length` is zero and
    /// [`CodecError::InvalidAlphabet`] if the alphabet is empty.
    pub fn new(alphabet: &str, length: usize) -> Result<Self, CodecError> {
        if length == 0 {
            return Err(CodecError::InvalidLength);
        }

        if alphabet.is_empty() {
            return Err(CodecError::InvalidAlphabet);
        }

        let symbols: Vec<char> = alphabet.chars().collect();

        let mut positions = HashMap::with_capacity(symbols.len());
        for (index, symbol) in symbols.iter().enumerate() {
            positions.entry(*symbol).or_insert(index as u64);
        }

        if positions.len() != symbols.len() {
            tracing::warn!(
                alphabet,
                distinct = positions.len(),
                total = symbols.len(),
                "alphabet contains duplicate symbols; decoding uses the first occurrence"
            );
        }

        let base = symbols.len() as u64;
        let limit = u32::try_from(length)
            .ok()
            .and_then(|exp| base.checked_pow(exp));

        Ok(Self {
            symbols,
            positions,
            length,
            limit,
        })
    }

    /// Number of symbols in the alphabet.
    pub fn base(&self) -> u64 {
        self.symbols.len() as u64
    }

    /// Fixed length of every produced code.
    pub fn length(&self) -> usize {
        self.length
    }
}

impl Codec for AlphabetCodec {
    fn encode(&self, id: u64) -> Result<String, CodecError> {
        if self.limit.is_some_and(|limit| id >= limit) {
            return Err(CodecError::NumberOverflow);
        }

        let base = self.base();
        let mut digits = vec![self.symbols[0]; self.length];
        let mut rest = id;

        for slot in digits.iter_mut().rev() {
            if rest == 0 {
                break;
            }
            *slot = self.symbols[(rest % base) as usize];
            rest /= base;
        }

        Ok(digits.into_iter().collect())
    }

    fn decode(&self, code: &str) -> Result<u64, CodecError> {
        let actual = code.chars().count();
        if actual != self.length {
            return Err(CodecError::InvalidStringLength {
                expected: self.length,
                actual,
            });
        }

        let base = self.base();
        code.chars().try_fold(0u64, |id, symbol| {
            let index = *self
                .positions
                .get(&symbol)
                .ok_or(CodecError::InvalidCharacter(symbol))?;

            id.checked_mul(base)
                .and_then(|id| id.checked_add(index))
                .ok_or(CodecError::NumberOverflow)
        })
    }

    fn capacity(&self) -> u64 {
        self.limit.unwrap_or(u64::MAX)
    }
}
