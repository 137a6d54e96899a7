//! Codec contract between numeric identifiers and short codes.

use crate::domain::errors::CodecError;

/// Bijective transform between a bounded identifier and a fixed-length code.
///
/// Implementations must be pure: the same input always yields the same
/// output, and no call observes shared mutable state.
///
/// # Implementations
///
/// - [`crate::utils::code_generator::AlphabetCodec`] - positional encoding over a configurable alphabet
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
pub trait Codec: Send + Sync {
    /// Encodes an identifier into a short code.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::NumberOverflow`] if `id` is not below [`Codec::capacity`].
    fn encode(&self, id: u64) -> Result<String, CodecError>;

    /// Decodes a short code back into its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidStringLength`] or [`CodecError::InvalidCharacter`]
    /// for malformed codes.
    fn decode(&self, code: &str) -> Result<u64, CodecError>;

    /// Number of distinct identifiers this codec can represent, saturating at `u64::MAX`.
    fn capacity(&self) -> u64;
}
