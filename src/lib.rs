//! # structured-fields
//!
//! A parser and serializer for HTTP Structured Field Values as defined by
//! [RFC 9651](https://datatracker.ietf.org/doc/html/rfc9651).
//!
//! ## What are structured fields?
//!
//! Structured fields give HTTP header values a real grammar: items with
//! typed primitives (integers, decimals, strings, tokens, byte sequences,
//! booleans, dates, display strings), lists, dictionaries, inner lists, and
//! parameters. This crate turns one field value's bytes into a typed tree
//! and turns a tree back into the unique canonical byte form.
//!
//! ## Key Features
//!
//! - **Strictly validating**: every grammar rule and numeric range of
//!   RFC 9651 is enforced on both parse and serialize
//! - **Typed trees**: pattern-match on [`BareItem`] and friends instead of
//!   re-splitting header strings
//! - **Canonical output**: serializing always yields the single canonical
//!   representation, so equal trees produce identical bytes
//! - **Order-preserving**: dictionaries and parameters keep first-insertion
//!   order, including across overwrites, via [`OrderedMap`]
//! - **No unsafe code**: written entirely in safe Rust
//!
//! ## Quick Start
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! structured-fields = "0.1"
//! ```
//!
//! ### Parsing
//!
//! ```rust
//! use structured_fields::{parse_dictionary, BareItem};
//!
//! // An RFC 9218 Priority header: urgency 2, incremental.
//! let dict = parse_dictionary(b"u=2, i").unwrap();
//!
//! let urgency = dict
//!     .get("u")
//!     .and_then(|m| m.as_item())
//!     .and_then(|item| item.bare_item.as_integer());
//! assert_eq!(urgency, Some(2));
//!
//! let incremental = dict
//!     .get("i")
//!     .and_then(|m| m.as_item())
//!     .and_then(|item| item.bare_item.as_bool());
//! assert_eq!(incremental, Some(true));
//! ```
//!
//! ### Building and serializing
//!
//! ```rust
//! use structured_fields::{parameters, write_item, BareItem, Item};
//!
//! let item = Item::with_parameters(
//!     BareItem::token("sugar").unwrap(),
//!     parameters!("q" => 1),
//! );
//! assert_eq!(write_item(&item).unwrap(), b"sugar;q=1");
//! ```
//!
//! ### Round-tripping
//!
//! Parsing accepts some non-canonical inputs (leading spaces, tabs around
//! commas, unreduced decimals); serializing normalizes them:
//!
//! ```rust
//! use structured_fields::{parse_list, write_list};
//!
//! let list = parse_list(b" a;q=1.50 ,\tb").unwrap();
//! assert_eq!(write_list(&list).unwrap(), b"a;q=1.5, b");
//! ```
//!
//! ## Scope
//!
//! The crate is purely computational: no I/O, no buffering, no decoding of
//! byte-sequence content (base64 text is carried verbatim for the caller's
//! codec of choice). Field values split across header lines must be joined
//! with `", "` before parsing. Distinct [`Parser`] and [`Serializer`]
//! instances are independent and may be used from different threads;
//! parsed trees are plain data and freely shareable once built.

pub mod decimal;
pub mod error;
pub mod macros;
pub mod map;
pub mod parser;
pub mod ser;
pub mod value;

mod ascii;

pub use decimal::Decimal;
pub use error::{Error, Result};
pub use map::OrderedMap;
pub use parser::{Parser, Version};
pub use ser::Serializer;
pub use value::{
    is_valid_key, is_valid_token, BareInnerList, BareItem, Dictionary, InnerList, Item,
    ItemOrInnerList, List, Parameters,
};

/// Parses a complete field value as a single item.
///
/// # Examples
///
/// ```rust
/// use structured_fields::{parse_item, BareItem};
///
/// let item = parse_item(b"5;bar=baz").unwrap();
/// assert_eq!(item.bare_item, BareItem::Integer(5));
/// assert_eq!(
///     item.parameters.get("bar"),
///     Some(&BareItem::Token("baz".to_string()))
/// );
/// ```
///
/// # Errors
///
/// Returns the error kind of the first grammar violation.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_item(input: &[u8]) -> Result<Item> {
    let mut parser = Parser::new(input);
    parser.parse_item()
}

/// Parses a complete field value as a list.
///
/// # Examples
///
/// ```rust
/// use structured_fields::parse_list;
///
/// let list = parse_list(b"Sec-CH-Example, Sec-CH-Example-2").unwrap();
/// assert_eq!(list.len(), 2);
/// ```
///
/// # Errors
///
/// Returns the error kind of the first grammar violation.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_list(input: &[u8]) -> Result<List> {
    let mut parser = Parser::new(input);
    parser.parse_list()
}

/// Parses a complete field value as a dictionary.
///
/// # Examples
///
/// ```rust
/// use structured_fields::parse_dictionary;
///
/// let dict = parse_dictionary(b"a=1, b=2;x").unwrap();
/// assert_eq!(dict.len(), 2);
/// ```
///
/// # Errors
///
/// Returns the error kind of the first grammar violation.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_dictionary(input: &[u8]) -> Result<Dictionary> {
    let mut parser = Parser::new(input);
    parser.parse_dictionary()
}

/// Serializes an item to its canonical bytes.
///
/// # Errors
///
/// Returns the error kind of the first unserializable value.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn write_item(item: &Item) -> Result<Vec<u8>> {
    let mut serializer = Serializer::new();
    serializer.write_item(item)?;
    Ok(serializer.into_inner())
}

/// Serializes a list to its canonical bytes; an empty list yields empty
/// bytes.
///
/// # Errors
///
/// Returns the error kind of the first unserializable member.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn write_list(list: &List) -> Result<Vec<u8>> {
    let mut serializer = Serializer::new();
    serializer.write_list(list)?;
    Ok(serializer.into_inner())
}

/// Serializes a dictionary to its canonical bytes; an empty dictionary
/// yields empty bytes.
///
/// # Errors
///
/// Returns the error kind of the first unserializable key or member.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn write_dictionary(dictionary: &Dictionary) -> Result<Vec<u8>> {
    let mut serializer = Serializer::new();
    serializer.write_dictionary(dictionary)?;
    Ok(serializer.into_inner())
}
