//! Codec error types.
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Reasons the decoder rejects a buffer or the encoder rejects a value tree.
///
/// Every rejection maps to exactly one variant so callers can match on the
/// failure they care about.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The buffer ended in the middle of an item.
    #[error("not enough bytes left in buffer")]
    TruncatedInput,
    /// A length or argument was encoded wider than necessary.
    #[error("integer not minimally encoded")]
    NonMinimalInteger,
    /// Reserved additional-info values 28, 29 and 30, and any info that is
    /// meaningless for its major type.
    #[error("invalid additional info ({0})")]
    InvalidArgument(u8),
    /// Additional info 31 announces an indefinite-length item.
    #[error("indefinite-length items are not supported")]
    IndefiniteLengthUnsupported,
    /// A simple value other than false, true and null.
    #[error("invalid simple value ({0})")]
    InvalidSimpleValue(u8),
    /// A half- or single-precision float on the wire.
    #[error("only 64-bit floats are supported")]
    InvalidFloatWidth,
    /// NaN or an infinity, in either direction.
    #[error("non-finite floats are not allowed")]
    NonFiniteFloat,
    /// A text string body that is not valid UTF-8.
    #[error("text string is not valid utf-8")]
    InvalidUtf8,
    /// Any tag other than 42.
    #[error("unsupported tag ({0})")]
    UnsupportedTag(u64),
    /// A tag 42 payload that is not a byte string, is empty, or does not
    /// start with the multibase identity prefix.
    #[error("tag 42 payload is not a well-formed cid")]
    InvalidCidFraming,
    /// The link factory rejected the raw cid bytes.
    #[error("invalid cid: {0}")]
    InvalidCid(String),
    /// Map keys that are not strictly increasing in canonical order.
    #[error("non-canonical map key ordering")]
    NonCanonicalMapOrder,
    /// A map key on the wire that is not a text string.
    #[error("map keys must be strings")]
    InvalidMapKeyType,
    /// An integer outside [-2^64, 2^64 - 1].
    #[error("integer out of range")]
    IntegerOutOfRange,
    /// A raw byte string reached the encoder while atjson mode is active.
    #[error("raw byte strings cannot be encoded in atjson mode")]
    UnexpectedBytes,
    /// A link reached the encoder while atjson mode is active.
    #[error("links cannot be encoded in atjson mode")]
    UnexpectedLink,
    /// A "$bytes" payload that is not valid base64.
    #[error("invalid base64")]
    InvalidBase64,
    /// A "$link" payload that is not valid multibase base32.
    #[error("invalid base32")]
    InvalidBase32,
    /// Base32 with non-zero bits after the last full byte.
    #[error("non-canonical base32")]
    NonCanonicalBase32,
    /// Hex input with a bad digit or odd length.
    #[error("invalid base16")]
    InvalidBase16,
    /// Growing a parse stack or buffer failed.
    #[error("allocation failed")]
    AllocationFailure,
}
