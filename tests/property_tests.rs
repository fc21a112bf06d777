//! Property-based tests over generated trees and raw byte noise.
//!
//! These complement the example-driven integration tests by checking the
//! crate's quantified guarantees: serialization reaches a canonical fixed
//! point, parsing canonical bytes restores an equal tree, the ordered map
//! matches a reference model, token validity is closed under round-trips,
//! decimal bounds are exact, and malformed input never panics the parser.

use proptest::prelude::*;
use structured_fields::{
    is_valid_token, parse_dictionary, parse_item, parse_list, write_dictionary, write_item,
    write_list, BareItem, Decimal, Dictionary, Error, InnerList, Item, ItemOrInnerList, List,
    OrderedMap, Parameters,
};

fn key_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z*][a-z0-9_.*-]{0,8}").unwrap()
}

fn token_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex(r"[A-Za-z*][-A-Za-z0-9!#$%&'*+.^_`|~:/]{0,8}").unwrap()
}

fn string_content_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[ -~]{0,12}").unwrap()
}

fn base64_content_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9+/=]{0,12}").unwrap()
}

fn display_content_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(any::<char>(), 0..8).prop_map(|chars| chars.into_iter().collect())
}

fn serializable_integer_strategy() -> impl Strategy<Value = i64> {
    -999_999_999_999_999i64..=999_999_999_999_999
}

fn decimal_strategy() -> impl Strategy<Value = Decimal> {
    (0u32..=3).prop_flat_map(|scale| {
        let limit = 10i64.pow(12 + scale) - 1;
        (-limit..=limit).prop_map(move |mantissa| Decimal::new(mantissa, -(scale as i8)).unwrap())
    })
}

fn bare_item_strategy() -> impl Strategy<Value = BareItem> {
    prop_oneof![
        any::<bool>().prop_map(BareItem::Boolean),
        serializable_integer_strategy().prop_map(BareItem::Integer),
        decimal_strategy().prop_map(BareItem::Decimal),
        string_content_strategy().prop_map(BareItem::String),
        token_strategy().prop_map(BareItem::Token),
        base64_content_strategy().prop_map(BareItem::ByteSequence),
        serializable_integer_strategy().prop_map(BareItem::Date),
        display_content_strategy().prop_map(BareItem::DisplayString),
    ]
}

fn parameters_strategy() -> impl Strategy<Value = Parameters> {
    prop::collection::vec((key_strategy(), bare_item_strategy()), 0..3)
        .prop_map(|pairs| pairs.into_iter().collect())
}

fn item_strategy() -> impl Strategy<Value = Item> {
    (bare_item_strategy(), parameters_strategy()).prop_map(|(bare_item, parameters)| Item {
        bare_item,
        parameters,
    })
}

fn inner_list_strategy() -> impl Strategy<Value = InnerList> {
    (
        prop::collection::vec(item_strategy(), 0..3),
        parameters_strategy(),
    )
        .prop_map(|(items, parameters)| InnerList { items, parameters })
}

fn member_strategy() -> impl Strategy<Value = ItemOrInnerList> {
    prop_oneof![
        item_strategy().prop_map(ItemOrInnerList::Item),
        inner_list_strategy().prop_map(ItemOrInnerList::InnerList),
    ]
}

fn list_strategy() -> impl Strategy<Value = List> {
    prop::collection::vec(member_strategy(), 0..4)
}

fn dictionary_strategy() -> impl Strategy<Value = Dictionary> {
    prop::collection::vec((key_strategy(), member_strategy()), 0..4)
        .prop_map(|pairs| pairs.into_iter().collect())
}

proptest! {
    #[test]
    fn items_round_trip_losslessly(item in item_strategy()) {
        let bytes = write_item(&item).unwrap();
        let reparsed = parse_item(&bytes).unwrap();
        prop_assert_eq!(&reparsed, &item);
        // Canonical output is a fixed point.
        prop_assert_eq!(write_item(&reparsed).unwrap(), bytes);
    }

    #[test]
    fn lists_round_trip_losslessly(list in list_strategy()) {
        let bytes = write_list(&list).unwrap();
        let reparsed = parse_list(&bytes).unwrap();
        prop_assert_eq!(&reparsed, &list);
        prop_assert_eq!(write_list(&reparsed).unwrap(), bytes);
    }

    #[test]
    fn dictionaries_round_trip_losslessly(dict in dictionary_strategy()) {
        let bytes = write_dictionary(&dict).unwrap();
        let reparsed = parse_dictionary(&bytes).unwrap();
        prop_assert_eq!(&reparsed, &dict);
        prop_assert_eq!(write_dictionary(&reparsed).unwrap(), bytes);
    }

    #[test]
    fn parser_never_panics_on_arbitrary_bytes(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let _ = parse_item(&bytes);
        let _ = parse_list(&bytes);
        let _ = parse_dictionary(&bytes);
    }

    #[test]
    fn reparse_after_serialize_is_identity_on_parseable_noise(
        bytes in proptest::string::string_regex("[ -~]{0,24}").unwrap()
    ) {
        // Whenever arbitrary printable noise happens to parse, one
        // serialization must reach the canonical fixed point.
        if let Ok(list) = parse_list(bytes.as_bytes()) {
            if let Ok(canonical) = write_list(&list) {
                prop_assert_eq!(parse_list(&canonical).unwrap(), list);
                let again = write_list(&parse_list(&canonical).unwrap()).unwrap();
                prop_assert_eq!(again, canonical);
            }
        }
    }

    #[test]
    fn token_validity_is_closed_under_round_trips(s in "[ -~]{0,6}") {
        let item = Item::new(BareItem::Token(s.clone()));
        match write_item(&item) {
            Ok(bytes) => {
                prop_assert!(is_valid_token(&s));
                let reparsed = parse_item(&bytes).unwrap();
                prop_assert_eq!(reparsed.bare_item, BareItem::Token(s));
            }
            Err(err) => {
                prop_assert!(!is_valid_token(&s));
                prop_assert_eq!(err, Error::InvalidToken);
            }
        }
    }

    #[test]
    fn decimal_bounds_are_exact(mantissa in any::<i64>(), exponent in -5i8..=2) {
        let expected_ok = (-3..=0).contains(&exponent)
            && mantissa.unsigned_abs()
                <= 10u64.pow(12 + u32::from(exponent.unsigned_abs())) - 1;
        prop_assert_eq!(Decimal::new(mantissa, exponent).is_ok(), expected_ok);
    }

    #[test]
    fn parsed_strings_contain_only_printable_ascii(
        bytes in proptest::string::string_regex("\"[ -~]{0,16}\"").unwrap()
    ) {
        if let Ok(item) = parse_item(bytes.as_bytes()) {
            let text = item.bare_item.as_str().unwrap();
            prop_assert!(text.bytes().all(|b| (0x20..=0x7e).contains(&b)));
        }
    }
}

#[derive(Debug, Clone)]
enum MapOp {
    Insert(u8, i32),
    Remove(u8),
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        (0u8..6, any::<i32>()).prop_map(|(k, v)| MapOp::Insert(k, v)),
        (0u8..6).prop_map(MapOp::Remove),
    ]
}

proptest! {
    #[test]
    fn ordered_map_matches_reference_model(ops in prop::collection::vec(map_op_strategy(), 0..32)) {
        let mut map: OrderedMap<String, i32> = OrderedMap::new();
        let mut model: Vec<(String, i32)> = Vec::new();

        for op in ops {
            match op {
                MapOp::Insert(k, v) => {
                    let key = format!("k{k}");
                    map.insert(key.clone(), v);
                    match model.iter_mut().find(|(mk, _)| *mk == key) {
                        Some((_, slot)) => *slot = v,
                        None => model.push((key, v)),
                    }
                }
                MapOp::Remove(k) => {
                    let key = format!("k{k}");
                    map.remove(key.as_str());
                    model.retain(|(mk, _)| *mk != key);
                }
            }
        }

        let entries: Vec<_> = map.iter().map(|(k, v)| (k.clone(), *v)).collect();
        prop_assert_eq!(entries, model);
    }
}
