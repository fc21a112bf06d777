//! Structured-field parsing.
//!
//! This module provides the [`Parser`], a single-pass recursive-descent
//! parser that turns one header field value into a typed tree. A parser
//! instance wraps the input byte slice and a cursor; each of the three
//! entry points consumes the entire input and fails on anything left over,
//! so one instance serves one parse.
//!
//! ## Overview
//!
//! - **Single pass**: the cursor only moves forward; strings with escapes
//!   are the one construct that re-reads its own span to drop the `\`
//!   bytes.
//! - **First-error semantics**: parsing stops at the first violation and
//!   returns a descriptive [`Error`] kind. Malformed input never panics.
//! - **Whole-value consumption**: leading spaces are allowed, optional
//!   whitespace around commas is allowed, and anything after the value
//!   fails with [`Error::InvalidTrailingBytes`].
//!
//! ## Usage
//!
//! Most users should use the top-level functions in the crate root:
//!
//! ```rust
//! use structured_fields::{parse_dictionary, BareItem};
//!
//! let dict = parse_dictionary(b"u=2, i").unwrap();
//! let urgency = dict.get("u").and_then(|m| m.as_item());
//! assert_eq!(urgency.unwrap().bare_item, BareItem::Integer(2));
//! ```
//!
//! Callers holding a field split across multiple header lines must join
//! the lines with `", "` before parsing; the grammar has no line
//! continuation.

use crate::ascii::{
    self, AT, BACKSLASH, CLOSE_PAREN, COLON, COMMA, DQUOTE, EQUALS, HTAB, MINUS, OPEN_PAREN,
    PERCENT, PERIOD, QUESTION, SEMICOLON, SP,
};
use crate::decimal::Decimal;
use crate::error::{Error, Result};
use crate::value::{
    BareInnerList, BareItem, Dictionary, InnerList, Item, ItemOrInnerList, List, Parameters,
};
use std::ops::Range;

/// Which revision of the structured-fields grammar to accept.
///
/// The data model is shared; the older revision simply has no syntax for
/// dates or display strings, so `@` and `%` cannot begin an item there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Version {
    /// RFC 8941, which predates Date and Display String.
    Rfc8941,
    /// RFC 9651, the current revision.
    #[default]
    Rfc9651,
}

/// A cursor-driven parser over one field value.
///
/// Created via [`Parser::new`] (RFC 9651) or [`Parser::with_version`].
/// Distinct instances are fully independent; a single instance must not be
/// shared across threads mid-parse.
pub struct Parser<'a> {
    data: &'a [u8],
    pos: usize,
    version: Version,
}

impl<'a> Parser<'a> {
    /// Creates a parser accepting the full RFC 9651 grammar.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser::with_version(data, Version::default())
    }

    /// Creates a parser for a specific grammar revision.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use structured_fields::{Error, Parser, Version};
    ///
    /// let mut p = Parser::with_version(b"@1659578233", Version::Rfc8941);
    /// assert_eq!(p.parse_item(), Err(Error::InvalidItem));
    /// ```
    #[must_use]
    pub fn with_version(data: &'a [u8], version: Version) -> Self {
        Parser {
            data,
            pos: 0,
            version,
        }
    }

    /// Parses the whole input as a single item.
    ///
    /// # Errors
    ///
    /// Returns the error kind of the first grammar violation;
    /// [`Error::InvalidItem`] for empty input.
    pub fn parse_item(&mut self) -> Result<Item> {
        self.discard_sp();
        let item = self.item()?;
        self.discard_sp();
        self.finish()?;
        Ok(item)
    }

    /// Parses the whole input as a list.
    ///
    /// Empty (or all-space) input is a valid, empty list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidList`] on separator violations, including a
    /// trailing comma, or the failing member's error kind.
    pub fn parse_list(&mut self) -> Result<List> {
        self.discard_sp();
        let mut list = List::new();

        while !self.eof() {
            list.push(self.item_or_inner_list()?);
            self.discard_ows();
            if self.eof() {
                break;
            }
            if self.peek() != Some(COMMA) {
                return Err(Error::InvalidList);
            }
            self.pos += 1;
            self.discard_ows();
            // A trailing or doubled comma is a separator violation, not a
            // member error.
            if self.eof() || self.peek() == Some(COMMA) {
                return Err(Error::InvalidList);
            }
        }

        Ok(list)
    }

    /// Parses the whole input as a dictionary.
    ///
    /// Empty (or all-space) input is a valid, empty dictionary. A key with
    /// no `=` means `?1`, with any parameters attached to that implicit
    /// boolean. A repeated key overwrites the earlier value but keeps its
    /// original position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDictionary`] on separator violations, or the
    /// failing key's or member's error kind.
    pub fn parse_dictionary(&mut self) -> Result<Dictionary> {
        self.discard_sp();
        let mut dict = Dictionary::new();

        while !self.eof() {
            let key = self.key()?;
            let member = if self.peek() == Some(EQUALS) {
                self.pos += 1;
                self.item_or_inner_list()?
            } else {
                let parameters = self.parameters()?;
                ItemOrInnerList::Item(Item::with_parameters(BareItem::Boolean(true), parameters))
            };
            dict.insert(key, member);

            self.discard_ows();
            if self.eof() {
                break;
            }
            if self.peek() != Some(COMMA) {
                return Err(Error::InvalidDictionary);
            }
            self.pos += 1;
            self.discard_ows();
            if self.eof() || self.peek() == Some(COMMA) {
                return Err(Error::InvalidDictionary);
            }
        }

        Ok(dict)
    }
}

impl Parser<'_> {
    #[inline]
    fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    #[inline]
    fn eof(&self) -> bool {
        self.pos == self.data.len()
    }

    fn discard_sp(&mut self) {
        while self.peek() == Some(SP) {
            self.pos += 1;
        }
    }

    fn discard_ows(&mut self) {
        while matches!(self.peek(), Some(SP) | Some(HTAB)) {
            self.pos += 1;
        }
    }

    fn finish(&self) -> Result<()> {
        if self.eof() {
            Ok(())
        } else {
            Err(Error::InvalidTrailingBytes)
        }
    }

    /// Copies a validated ASCII span out of the input. The spans handed in
    /// here only ever contain single-byte characters, so the UTF-8 check
    /// cannot fail; `err` keeps the failure typed rather than panicking.
    fn owned_ascii(&self, range: Range<usize>, err: Error) -> Result<String> {
        std::str::from_utf8(&self.data[range])
            .map(str::to_string)
            .map_err(|_| err)
    }

    fn item_or_inner_list(&mut self) -> Result<ItemOrInnerList> {
        if self.peek() == Some(OPEN_PAREN) {
            self.inner_list().map(ItemOrInnerList::InnerList)
        } else {
            self.item().map(ItemOrInnerList::Item)
        }
    }

    fn inner_list(&mut self) -> Result<InnerList> {
        self.pos += 1; // consume '('
        let mut items = BareInnerList::new();

        loop {
            self.discard_sp();
            match self.peek() {
                None => return Err(Error::InvalidInnerList),
                Some(CLOSE_PAREN) => {
                    self.pos += 1;
                    let parameters = self.parameters()?;
                    return Ok(InnerList::with_parameters(items, parameters));
                }
                Some(_) => {
                    items.push(self.item()?);
                    // An item must be followed by SP or the closing paren.
                    match self.peek() {
                        Some(SP) | Some(CLOSE_PAREN) => (),
                        _ => return Err(Error::InvalidInnerList),
                    }
                }
            }
        }
    }

    fn item(&mut self) -> Result<Item> {
        let bare_item = self.bare_item()?;
        let parameters = self.parameters()?;
        Ok(Item {
            bare_item,
            parameters,
        })
    }

    fn parameters(&mut self) -> Result<Parameters> {
        let mut parameters = Parameters::new();

        while self.peek() == Some(SEMICOLON) {
            self.pos += 1;
            self.discard_sp();
            let key = self.key()?;
            let value = if self.peek() == Some(EQUALS) {
                self.pos += 1;
                self.bare_item()?
            } else {
                BareItem::Boolean(true)
            };
            parameters.insert(key, value);
        }

        Ok(parameters)
    }

    fn key(&mut self) -> Result<String> {
        match self.peek() {
            Some(b) if ascii::is_key_start(b) => (),
            _ => return Err(Error::InvalidKey),
        }
        let start = self.pos;
        self.pos += 1;
        while let Some(b) = self.peek() {
            if !ascii::is_key_char(b) {
                break;
            }
            self.pos += 1;
        }
        self.owned_ascii(start..self.pos, Error::InvalidKey)
    }

    fn bare_item(&mut self) -> Result<BareItem> {
        let Some(first) = self.peek() else {
            return Err(Error::InvalidItem);
        };

        match first {
            DQUOTE => self.string(),
            MINUS | b'0'..=b'9' => self.number(),
            COLON => self.byte_sequence(),
            QUESTION => self.boolean(),
            AT if self.version == Version::Rfc9651 => self.date(),
            PERCENT if self.version == Version::Rfc9651 => self.display_string(),
            b if ascii::is_token_start(b) => self.token(),
            _ => Err(Error::InvalidItem),
        }
    }

    fn number(&mut self) -> Result<BareItem> {
        let negative = if self.peek() == Some(MINUS) {
            self.pos += 1;
            true
        } else {
            false
        };

        match self.peek() {
            Some(b) if ascii::is_digit(b) => (),
            _ => return Err(Error::InvalidIntegerOrDecimal),
        }

        let start = self.pos;
        let mut dot = None;

        while let Some(b) = self.peek() {
            if ascii::is_digit(b) {
                self.pos += 1;
                let len = self.pos - start;
                // Integers carry at most 15 characters, decimals at most 16
                // counting the point.
                match dot {
                    None if len > 15 => return Err(Error::InvalidIntegerOrDecimal),
                    Some(_) if len > 16 => return Err(Error::InvalidIntegerOrDecimal),
                    _ => (),
                }
            } else if b == PERIOD && dot.is_none() {
                if self.pos - start > 12 {
                    return Err(Error::InvalidIntegerOrDecimal);
                }
                dot = Some(self.pos);
                self.pos += 1;
            } else {
                break;
            }
        }

        let magnitude = self.data[start..self.pos]
            .iter()
            .filter(|&&b| b != PERIOD)
            .fold(0i64, |acc, &b| acc * 10 + i64::from(b - b'0'));
        let signed = if negative { -magnitude } else { magnitude };

        match dot {
            None => Ok(BareItem::Integer(signed)),
            Some(dot_pos) => {
                let fraction_digits = self.pos - dot_pos - 1;
                if !(1..=3).contains(&fraction_digits) {
                    return Err(Error::InvalidIntegerOrDecimal);
                }
                let exponent = -(fraction_digits as i8);
                Decimal::new(signed, exponent).map(BareItem::Decimal)
            }
        }
    }

    fn date(&mut self) -> Result<BareItem> {
        self.pos += 1; // consume '@'
        match self.number() {
            Ok(BareItem::Integer(seconds)) => Ok(BareItem::Date(seconds)),
            _ => Err(Error::InvalidDate),
        }
    }

    fn string(&mut self) -> Result<BareItem> {
        self.pos += 1; // consume '"'
        let start = self.pos;
        let mut escapes = 0usize;

        // First pass locates the terminator, validates every byte, and
        // counts escapes so the common escape-free case can convert the
        // span directly.
        let end = loop {
            match self.peek() {
                None => return Err(Error::InvalidString),
                Some(BACKSLASH) => {
                    self.pos += 1;
                    match self.peek() {
                        Some(DQUOTE) | Some(BACKSLASH) => escapes += 1,
                        _ => return Err(Error::InvalidString),
                    }
                }
                Some(DQUOTE) => break self.pos,
                Some(b) if ascii::is_printable(b) => (),
                Some(_) => return Err(Error::InvalidString),
            }
            self.pos += 1;
        };
        self.pos += 1; // consume closing '"'

        let raw = &self.data[start..end];
        if escapes == 0 {
            return self
                .owned_ascii(start..end, Error::InvalidString)
                .map(BareItem::String);
        }

        let mut text = String::with_capacity(raw.len() - escapes);
        let mut bytes = raw.iter().copied();
        while let Some(b) = bytes.next() {
            let b = if b == BACKSLASH {
                // The first pass guarantees every backslash has a follower
                // inside the span.
                bytes.next().unwrap_or(b)
            } else {
                b
            };
            text.push(char::from(b));
        }
        Ok(BareItem::String(text))
    }

    fn byte_sequence(&mut self) -> Result<BareItem> {
        self.pos += 1; // consume ':'
        let start = self.pos;

        loop {
            match self.peek() {
                None => return Err(Error::InvalidByteSequence),
                Some(COLON) => {
                    let end = self.pos;
                    self.pos += 1;
                    // Retained verbatim and undecoded; only the alphabet is
                    // checked, not padding placement.
                    return self
                        .owned_ascii(start..end, Error::InvalidByteSequence)
                        .map(BareItem::ByteSequence);
                }
                Some(b) if ascii::is_base64_char(b) => self.pos += 1,
                Some(_) => return Err(Error::InvalidByteSequence),
            }
        }
    }

    fn boolean(&mut self) -> Result<BareItem> {
        self.pos += 1; // consume '?'
        let value = match self.peek() {
            Some(b'1') => true,
            Some(b'0') => false,
            _ => return Err(Error::InvalidBoolean),
        };
        self.pos += 1;
        Ok(BareItem::Boolean(value))
    }

    fn token(&mut self) -> Result<BareItem> {
        let start = self.pos;
        self.pos += 1; // first byte validated by the dispatch
        while let Some(b) = self.peek() {
            if !ascii::is_token_char(b) {
                break;
            }
            self.pos += 1;
        }
        self.owned_ascii(start..self.pos, Error::InvalidToken)
            .map(BareItem::Token)
    }

    fn display_string(&mut self) -> Result<BareItem> {
        self.pos += 1; // consume '%'
        if self.peek() != Some(DQUOTE) {
            return Err(Error::InvalidDisplayString);
        }
        self.pos += 1;

        let mut decoded = Vec::new();
        loop {
            match self.peek() {
                None => return Err(Error::InvalidDisplayString),
                Some(PERCENT) => {
                    self.pos += 1;
                    let hi = self.hex_digit()?;
                    let lo = self.hex_digit()?;
                    decoded.push(hi << 4 | lo);
                }
                Some(DQUOTE) => {
                    self.pos += 1;
                    // UTF-8 is validated once over the assembled bytes.
                    return String::from_utf8(decoded)
                        .map(BareItem::DisplayString)
                        .map_err(|_| Error::InvalidDisplayString);
                }
                Some(b) if ascii::is_printable(b) => {
                    decoded.push(b);
                    self.pos += 1;
                }
                Some(_) => return Err(Error::InvalidDisplayString),
            }
        }
    }

    /// One lowercase hex digit of a display-string escape.
    fn hex_digit(&mut self) -> Result<u8> {
        let value = match self.peek() {
            Some(b @ b'0'..=b'9') => b - b'0',
            Some(b @ b'a'..=b'f') => b - b'a' + 10,
            _ => return Err(Error::InvalidDisplayString),
        };
        self.pos += 1;
        Ok(value)
    }
}
