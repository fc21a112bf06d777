//! Structured-field serialization.
//!
//! This module provides the [`Serializer`], which renders a parse tree into
//! its canonical byte representation. Serialization is strict: values a
//! parser could never have produced (out-of-range integers, strings with
//! control bytes, malformed tokens or keys) are rejected rather than
//! emitted, and every error is detected before the offending byte reaches
//! the output.
//!
//! ## Canonical output
//!
//! The serializer produces exactly one representation per tree: decimals
//! are canonicalized, parameters with value `?1` drop their `=?1`, entries
//! join with `", "`, and inner-list items join with a single space.
//! Re-parsing canonical output yields an equal tree, and re-serializing
//! that tree yields identical bytes.
//!
//! ## Usage
//!
//! Most users should use the top-level functions in the crate root:
//!
//! ```rust
//! use structured_fields::{parse_list, write_list};
//!
//! let list = parse_list(b"sugar ,  tea").unwrap();
//! assert_eq!(write_list(&list).unwrap(), b"sugar, tea");
//! ```
//!
//! One [`Serializer`] instance can be reused to amortize its buffer across
//! many calls:
//!
//! ```rust
//! use structured_fields::{Item, Serializer};
//!
//! let mut serializer = Serializer::new();
//! assert_eq!(serializer.write_item(&Item::new(1)).unwrap(), b"1");
//! assert_eq!(serializer.write_item(&Item::new(true)).unwrap(), b"?1");
//! ```

use crate::ascii::{
    is_printable, AT, BACKSLASH, CLOSE_PAREN, COLON, DQUOTE, EQUALS, HEX_LOWER, OPEN_PAREN,
    PERCENT, SEMICOLON, SP,
};
use crate::decimal::MAX_NUMERIC;
use crate::error::{Error, Result};
use crate::value::{
    is_valid_key, is_valid_token, BareItem, Dictionary, InnerList, Item, ItemOrInnerList, List,
    Parameters,
};

/// Renders parse trees into canonical bytes.
///
/// The serializer owns a scratch buffer that is cleared at the start of
/// every `write_*` call and borrowed out on success, so a reused instance
/// allocates only when a value outgrows the buffer. Use the top-level
/// `write_*` functions when an owned `Vec<u8>` is more convenient.
pub struct Serializer {
    buf: Vec<u8>,
}

impl Serializer {
    /// Creates a serializer with a small pre-allocated buffer.
    #[must_use]
    pub fn new() -> Self {
        // Typical field values fit well under this.
        Serializer {
            buf: Vec::with_capacity(256),
        }
    }

    /// Consumes the serializer, returning the buffer from the most recent
    /// `write_*` call.
    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    /// Serializes an item, returning the canonical bytes.
    ///
    /// # Errors
    ///
    /// Returns the error kind of the first unserializable value.
    pub fn write_item(&mut self, item: &Item) -> Result<&[u8]> {
        self.buf.clear();
        self.emit_item(item)?;
        Ok(&self.buf)
    }

    /// Serializes a list, returning the canonical bytes.
    ///
    /// An empty list yields empty bytes; such a field should simply not be
    /// sent.
    ///
    /// # Errors
    ///
    /// Returns the error kind of the first unserializable member.
    pub fn write_list(&mut self, list: &List) -> Result<&[u8]> {
        self.buf.clear();
        for (index, member) in list.iter().enumerate() {
            if index > 0 {
                self.buf.extend_from_slice(b", ");
            }
            self.emit_member(member)?;
        }
        Ok(&self.buf)
    }

    /// Serializes a dictionary, returning the canonical bytes.
    ///
    /// Entries emit in insertion order. A member that is a bare `?1` item
    /// emits as its key (and parameters) alone. An empty dictionary yields
    /// empty bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKey`] for a key violating the grammar, or
    /// the error kind of the first unserializable member.
    pub fn write_dictionary(&mut self, dictionary: &Dictionary) -> Result<&[u8]> {
        self.buf.clear();
        for (index, (key, member)) in dictionary.iter().enumerate() {
            if index > 0 {
                self.buf.extend_from_slice(b", ");
            }
            self.emit_key(key)?;
            match member {
                ItemOrInnerList::Item(item) if item.bare_item == BareItem::Boolean(true) => {
                    self.emit_parameters(&item.parameters)?;
                }
                ItemOrInnerList::Item(item) => {
                    self.buf.push(EQUALS);
                    self.emit_item(item)?;
                }
                ItemOrInnerList::InnerList(inner) => {
                    self.buf.push(EQUALS);
                    self.emit_inner_list(inner)?;
                }
            }
        }
        Ok(&self.buf)
    }

    pub(crate) fn write_bare_item(&mut self, bare_item: &BareItem) -> Result<&[u8]> {
        self.buf.clear();
        self.emit_bare_item(bare_item)?;
        Ok(&self.buf)
    }

    pub(crate) fn write_inner_list(&mut self, inner: &InnerList) -> Result<&[u8]> {
        self.buf.clear();
        self.emit_inner_list(inner)?;
        Ok(&self.buf)
    }

    fn emit_member(&mut self, member: &ItemOrInnerList) -> Result<()> {
        match member {
            ItemOrInnerList::Item(item) => self.emit_item(item),
            ItemOrInnerList::InnerList(inner) => self.emit_inner_list(inner),
        }
    }

    fn emit_item(&mut self, item: &Item) -> Result<()> {
        self.emit_bare_item(&item.bare_item)?;
        self.emit_parameters(&item.parameters)
    }

    fn emit_inner_list(&mut self, inner: &InnerList) -> Result<()> {
        self.buf.push(OPEN_PAREN);
        for (index, item) in inner.items.iter().enumerate() {
            if index > 0 {
                self.buf.push(SP);
            }
            self.emit_item(item)?;
        }
        self.buf.push(CLOSE_PAREN);
        self.emit_parameters(&inner.parameters)
    }

    fn emit_parameters(&mut self, parameters: &Parameters) -> Result<()> {
        for (key, value) in parameters {
            self.buf.push(SEMICOLON);
            self.emit_key(key)?;
            if *value == BareItem::Boolean(true) {
                // `?1` is implied by the bare key.
                continue;
            }
            self.buf.push(EQUALS);
            self.emit_bare_item(value)?;
        }
        Ok(())
    }

    fn emit_key(&mut self, key: &str) -> Result<()> {
        if !is_valid_key(key) {
            return Err(Error::InvalidKey);
        }
        self.buf.extend_from_slice(key.as_bytes());
        Ok(())
    }

    fn emit_bare_item(&mut self, bare_item: &BareItem) -> Result<()> {
        match bare_item {
            BareItem::Boolean(true) => self.buf.extend_from_slice(b"?1"),
            BareItem::Boolean(false) => self.buf.extend_from_slice(b"?0"),
            BareItem::Integer(value) => {
                self.emit_integer(*value, Error::InvalidIntegerOrDecimal)?;
            }
            BareItem::Decimal(decimal) => {
                // Display renders the canonical form.
                self.buf.extend_from_slice(decimal.to_string().as_bytes());
            }
            BareItem::String(text) => self.emit_string(text)?,
            BareItem::Token(token) => {
                if !is_valid_token(token) {
                    return Err(Error::InvalidToken);
                }
                self.buf.extend_from_slice(token.as_bytes());
            }
            BareItem::ByteSequence(base64) => {
                // Stored undecoded; the caller vouches for the content.
                self.buf.push(COLON);
                self.buf.extend_from_slice(base64.as_bytes());
                self.buf.push(COLON);
            }
            BareItem::Date(seconds) => {
                self.buf.push(AT);
                self.emit_integer(*seconds, Error::InvalidDate)?;
            }
            BareItem::DisplayString(text) => self.emit_display_string(text),
        }
        Ok(())
    }

    fn emit_integer(&mut self, value: i64, err: Error) -> Result<()> {
        if value.unsigned_abs() > MAX_NUMERIC as u64 {
            return Err(err);
        }
        self.buf.extend_from_slice(value.to_string().as_bytes());
        Ok(())
    }

    fn emit_string(&mut self, text: &str) -> Result<()> {
        self.buf.push(DQUOTE);
        for b in text.bytes() {
            if !is_printable(b) {
                return Err(Error::InvalidString);
            }
            if b == DQUOTE || b == BACKSLASH {
                self.buf.push(BACKSLASH);
            }
            self.buf.push(b);
        }
        self.buf.push(DQUOTE);
        Ok(())
    }

    fn emit_display_string(&mut self, text: &str) {
        self.buf.push(PERCENT);
        self.buf.push(DQUOTE);
        for b in text.bytes() {
            if b == PERCENT || b == DQUOTE || !is_printable(b) {
                self.buf.push(PERCENT);
                self.buf.push(HEX_LOWER[usize::from(b >> 4)]);
                self.buf.push(HEX_LOWER[usize::from(b & 0x0f)]);
            } else {
                self.buf.push(b);
            }
        }
        self.buf.push(DQUOTE);
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}
