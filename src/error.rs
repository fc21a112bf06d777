//! Error type for structured-field parsing and serialization.
//!
//! A single flat enum covers every failure mode. Parse errors are returned
//! at the first offending byte; serialization errors are returned before the
//! offending byte is committed to the output buffer. The last four variants
//! never originate in this crate: they are reserved for layers that map
//! parsed trees onto application types, so that such layers can share the
//! same error currency.
//!
//! ## Examples
//!
//! ```rust
//! use structured_fields::{parse_list, Error};
//!
//! assert_eq!(parse_list(b"1,,42"), Err(Error::InvalidList));
//! assert_eq!(parse_list(b"1, 42,"), Err(Error::InvalidList));
//! ```

use thiserror::Error;

/// Everything that can go wrong while parsing or serializing a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// Bytes remain after a complete field value and trailing spaces.
    #[error("trailing bytes after field value")]
    InvalidTrailingBytes,

    /// Separator or terminator violation in a top-level list.
    #[error("malformed list")]
    InvalidList,

    /// Separator or terminator violation in a top-level dictionary.
    #[error("malformed dictionary")]
    InvalidDictionary,

    /// Missing `)` or a non-space byte between inner-list items.
    #[error("malformed inner list")]
    InvalidInnerList,

    /// A byte that cannot begin a bare item.
    #[error("byte does not begin a valid item")]
    InvalidItem,

    /// A dictionary, parameter, or emitted key violates the key grammar.
    #[error("malformed key")]
    InvalidKey,

    /// Digit-count, length, or magnitude violation in a number.
    #[error("malformed or out-of-range integer or decimal")]
    InvalidIntegerOrDecimal,

    /// Disallowed byte, bad escape, or missing `"` terminator.
    #[error("malformed string")]
    InvalidString,

    /// Disallowed byte or missing `:` terminator in a byte sequence.
    #[error("malformed byte sequence")]
    InvalidByteSequence,

    /// `?` not followed by `0` or `1`.
    #[error("malformed boolean")]
    InvalidBoolean,

    /// Token emission with bytes outside the token grammar.
    #[error("malformed token")]
    InvalidToken,

    /// Malformed or out-of-range date.
    #[error("malformed or out-of-range date")]
    InvalidDate,

    /// Bad hex escape, disallowed byte, invalid UTF-8, or missing
    /// terminator in a display string.
    #[error("malformed display string")]
    InvalidDisplayString,

    /// A required key was absent. Raised by tree-mapping layers, not the
    /// core.
    #[error("missing key")]
    MissingKey,

    /// A tree node had an unexpected type. Raised by tree-mapping layers,
    /// not the core.
    #[error("unexpected type for item")]
    InvalidTypeForItem,

    /// An integer did not fit the target type. Raised by tree-mapping
    /// layers, not the core.
    #[error("integer out of range")]
    IntegerOutOfRange,

    /// A sequence index was out of bounds. Raised by tree-mapping layers,
    /// not the core.
    #[error("index out of range")]
    IndexOutOfRange,
}

/// Alias for `std::result::Result` with this crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
