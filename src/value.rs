//! The parse-tree value model for structured field values.
//!
//! This module defines the types a parsed field value is made of and that
//! the serializer consumes: [`BareItem`] for the primitive kinds, [`Item`]
//! and [`InnerList`] for parameterized nodes, [`ItemOrInnerList`] for
//! positions that accept either, and the [`List`] / [`Dictionary`] /
//! [`Parameters`] aliases for the three field shapes.
//!
//! ## Building trees
//!
//! ```rust
//! use structured_fields::{parameters, BareItem, Item};
//!
//! let item = Item::with_parameters(5, parameters!("bar" => BareItem::token("baz").unwrap()));
//! assert_eq!(structured_fields::write_item(&item).unwrap(), b"5;bar=baz");
//! ```
//!
//! ## Inspecting trees
//!
//! ```rust
//! use structured_fields::parse_item;
//!
//! let item = parse_item(b"?1;scope=global").unwrap();
//! assert_eq!(item.bare_item.as_bool(), Some(true));
//! assert_eq!(
//!     item.parameters.get("scope").and_then(|v| v.as_token()),
//!     Some("global")
//! );
//! ```
//!
//! Byte sequences are carried as their undecoded base64 text; decoding (and
//! choosing a codec) is left to the caller.

use crate::ascii;
use crate::decimal::Decimal;
use crate::error::{Error, Result};
use crate::map::OrderedMap;
use crate::ser::Serializer;
use chrono::{DateTime, Utc};
use std::fmt;

/// Parameters attached to an item or inner list: keys mapped to bare items,
/// in order of first appearance.
pub type Parameters = OrderedMap<String, BareItem>;

/// The items of an inner list, without the list's own parameters.
pub type BareInnerList = Vec<Item>;

/// A top-level list field: items and inner lists in order.
pub type List = Vec<ItemOrInnerList>;

/// A top-level dictionary field: keys mapped to members, in order of first
/// appearance.
pub type Dictionary = OrderedMap<String, ItemOrInnerList>;

/// A primitive structured-field value.
///
/// `Date` and `DisplayString` exist only in RFC 9651; parsing them can be
/// disabled with [`Version::Rfc8941`](crate::Version).
#[derive(Debug, Clone, PartialEq)]
pub enum BareItem {
    /// `?1` or `?0`.
    Boolean(bool),
    /// Up to fifteen decimal digits, signed.
    Integer(i64),
    /// Fixed-point decimal, see [`Decimal`].
    Decimal(Decimal),
    /// Printable-ASCII string (bytes `0x20..=0x7E`).
    String(String),
    /// An HTTP token, e.g. `text/html` or `*foo`.
    Token(String),
    /// Base64 text between colons, kept **undecoded**.
    ByteSequence(String),
    /// Seconds since the Unix epoch, e.g. `@1659578233`.
    Date(i64),
    /// A Unicode string carried via percent-encoding, e.g. `%"f%c3%bc"`.
    DisplayString(String),
}

/// Returns `true` if `s` satisfies the key grammar: a non-empty run of
/// `[a-z0-9_.*-]` starting with a lowercase letter or `*`.
#[must_use]
pub fn is_valid_key(s: &str) -> bool {
    match s.as_bytes().split_first() {
        Some((&first, rest)) => {
            ascii::is_key_start(first) && rest.iter().all(|&b| ascii::is_key_char(b))
        }
        None => false,
    }
}

/// Returns `true` if `s` satisfies the token grammar: a non-empty run of
/// `tchar`, `:`, or `/` starting with a letter or `*`.
///
/// Useful for layers mapping ambient strings onto the tree, to decide
/// between [`BareItem::Token`] and [`BareItem::String`].
///
/// # Examples
///
/// ```rust
/// use structured_fields::is_valid_token;
///
/// assert!(is_valid_token("text/html"));
/// assert!(is_valid_token("*"));
/// assert!(!is_valid_token("1abc"));
/// assert!(!is_valid_token(""));
/// ```
#[must_use]
pub fn is_valid_token(s: &str) -> bool {
    match s.as_bytes().split_first() {
        Some((&first, rest)) => {
            ascii::is_token_start(first) && rest.iter().all(|&b| ascii::is_token_char(b))
        }
        None => false,
    }
}

impl BareItem {
    /// Creates a [`BareItem::Token`], validating the token grammar.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidToken`] if `s` is not a valid token.
    pub fn token(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        if is_valid_token(&s) {
            Ok(BareItem::Token(s))
        } else {
            Err(Error::InvalidToken)
        }
    }

    /// Returns `true` for [`BareItem::Boolean`].
    #[inline]
    #[must_use]
    pub const fn is_boolean(&self) -> bool {
        matches!(self, BareItem::Boolean(_))
    }

    /// Returns `true` for [`BareItem::Integer`].
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, BareItem::Integer(_))
    }

    /// Returns `true` for [`BareItem::Decimal`].
    #[inline]
    #[must_use]
    pub const fn is_decimal(&self) -> bool {
        matches!(self, BareItem::Decimal(_))
    }

    /// Returns `true` for [`BareItem::String`].
    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, BareItem::String(_))
    }

    /// Returns `true` for [`BareItem::Token`].
    #[inline]
    #[must_use]
    pub const fn is_token(&self) -> bool {
        matches!(self, BareItem::Token(_))
    }

    /// Returns `true` for [`BareItem::ByteSequence`].
    #[inline]
    #[must_use]
    pub const fn is_byte_sequence(&self) -> bool {
        matches!(self, BareItem::ByteSequence(_))
    }

    /// Returns `true` for [`BareItem::Date`].
    #[inline]
    #[must_use]
    pub const fn is_date(&self) -> bool {
        matches!(self, BareItem::Date(_))
    }

    /// Returns `true` for [`BareItem::DisplayString`].
    #[inline]
    #[must_use]
    pub const fn is_display_string(&self) -> bool {
        matches!(self, BareItem::DisplayString(_))
    }

    /// The boolean value, if this is a boolean.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            BareItem::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer value, if this is an integer.
    #[inline]
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            BareItem::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// The decimal value, if this is a decimal.
    #[inline]
    #[must_use]
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            BareItem::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// The string content, if this is a string.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            BareItem::String(s) => Some(s),
            _ => None,
        }
    }

    /// The token text, if this is a token.
    #[inline]
    #[must_use]
    pub fn as_token(&self) -> Option<&str> {
        match self {
            BareItem::Token(t) => Some(t),
            _ => None,
        }
    }

    /// The undecoded base64 text, if this is a byte sequence.
    #[inline]
    #[must_use]
    pub fn as_byte_sequence(&self) -> Option<&str> {
        match self {
            BareItem::ByteSequence(b) => Some(b),
            _ => None,
        }
    }

    /// Seconds since the epoch, if this is a date.
    #[inline]
    #[must_use]
    pub fn as_date(&self) -> Option<i64> {
        match self {
            BareItem::Date(secs) => Some(*secs),
            _ => None,
        }
    }

    /// The date as a chrono timestamp, if this is a date and in chrono's
    /// representable range.
    #[inline]
    #[must_use]
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            BareItem::Date(secs) => DateTime::from_timestamp(*secs, 0),
            _ => None,
        }
    }

    /// The display-string content, if this is a display string.
    #[inline]
    #[must_use]
    pub fn as_display_string(&self) -> Option<&str> {
        match self {
            BareItem::DisplayString(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for BareItem {
    fn from(value: bool) -> Self {
        BareItem::Boolean(value)
    }
}

impl From<i64> for BareItem {
    fn from(value: i64) -> Self {
        BareItem::Integer(value)
    }
}

impl From<i32> for BareItem {
    fn from(value: i32) -> Self {
        BareItem::Integer(i64::from(value))
    }
}

impl From<Decimal> for BareItem {
    fn from(value: Decimal) -> Self {
        BareItem::Decimal(value)
    }
}

/// Ambient strings map to [`BareItem::String`]; use [`BareItem::token`] for
/// tokens.
impl From<&str> for BareItem {
    fn from(value: &str) -> Self {
        BareItem::String(value.to_string())
    }
}

impl From<String> for BareItem {
    fn from(value: String) -> Self {
        BareItem::String(value)
    }
}

impl From<DateTime<Utc>> for BareItem {
    fn from(value: DateTime<Utc>) -> Self {
        BareItem::Date(value.timestamp())
    }
}

/// A bare item together with its parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// The primitive value.
    pub bare_item: BareItem,
    /// Parameters in order of first appearance.
    pub parameters: Parameters,
}

impl Item {
    /// Creates an item with no parameters.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use structured_fields::{BareItem, Item};
    ///
    /// let item = Item::new(42);
    /// assert_eq!(item.bare_item, BareItem::Integer(42));
    /// assert!(item.parameters.is_empty());
    /// ```
    #[must_use]
    pub fn new(bare_item: impl Into<BareItem>) -> Self {
        Item {
            bare_item: bare_item.into(),
            parameters: Parameters::new(),
        }
    }

    /// Creates an item with the given parameters.
    #[must_use]
    pub fn with_parameters(bare_item: impl Into<BareItem>, parameters: Parameters) -> Self {
        Item {
            bare_item: bare_item.into(),
            parameters,
        }
    }
}

impl From<BareItem> for Item {
    fn from(value: BareItem) -> Self {
        Item::new(value)
    }
}

/// A parenthesized sequence of items with its own parameters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InnerList {
    /// The member items, in order.
    pub items: BareInnerList,
    /// Parameters of the list itself, not of any member.
    pub parameters: Parameters,
}

impl InnerList {
    /// Creates an inner list with no parameters.
    #[must_use]
    pub fn new(items: BareInnerList) -> Self {
        InnerList {
            items,
            parameters: Parameters::new(),
        }
    }

    /// Creates an inner list with the given parameters.
    #[must_use]
    pub fn with_parameters(items: BareInnerList, parameters: Parameters) -> Self {
        InnerList { items, parameters }
    }
}

/// A list or dictionary member: either a single item or an inner list.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOrInnerList {
    /// A single parameterized item.
    Item(Item),
    /// A parenthesized list of items.
    InnerList(InnerList),
}

impl ItemOrInnerList {
    /// Returns `true` for [`ItemOrInnerList::Item`].
    #[inline]
    #[must_use]
    pub const fn is_item(&self) -> bool {
        matches!(self, ItemOrInnerList::Item(_))
    }

    /// Returns `true` for [`ItemOrInnerList::InnerList`].
    #[inline]
    #[must_use]
    pub const fn is_inner_list(&self) -> bool {
        matches!(self, ItemOrInnerList::InnerList(_))
    }

    /// The item, if this member is one.
    #[inline]
    #[must_use]
    pub fn as_item(&self) -> Option<&Item> {
        match self {
            ItemOrInnerList::Item(item) => Some(item),
            _ => None,
        }
    }

    /// The inner list, if this member is one.
    #[inline]
    #[must_use]
    pub fn as_inner_list(&self) -> Option<&InnerList> {
        match self {
            ItemOrInnerList::InnerList(list) => Some(list),
            _ => None,
        }
    }
}

impl From<Item> for ItemOrInnerList {
    fn from(value: Item) -> Self {
        ItemOrInnerList::Item(value)
    }
}

impl From<InnerList> for ItemOrInnerList {
    fn from(value: InnerList) -> Self {
        ItemOrInnerList::InnerList(value)
    }
}

// Serializer output is pure ASCII, so the str conversion cannot fail.
fn fmt_bytes(f: &mut fmt::Formatter<'_>, bytes: Result<&[u8]>) -> fmt::Result {
    let bytes = bytes.map_err(|_| fmt::Error)?;
    f.write_str(std::str::from_utf8(bytes).map_err(|_| fmt::Error)?)
}

/// Renders the canonical serialization; fails with `fmt::Error` if the
/// value is out of range or otherwise unserializable.
impl fmt::Display for BareItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut serializer = Serializer::new();
        fmt_bytes(f, serializer.write_bare_item(self))
    }
}

/// Renders the canonical serialization; fails with `fmt::Error` if the
/// item is unserializable.
impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut serializer = Serializer::new();
        fmt_bytes(f, serializer.write_item(self))
    }
}

/// Renders the canonical serialization; fails with `fmt::Error` if the
/// list is unserializable.
impl fmt::Display for InnerList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut serializer = Serializer::new();
        fmt_bytes(f, serializer.write_inner_list(self))
    }
}

impl fmt::Display for ItemOrInnerList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemOrInnerList::Item(item) => item.fmt(f),
            ItemOrInnerList::InnerList(list) => list.fmt(f),
        }
    }
}
