/// Builds [`Parameters`](crate::Parameters) from `key => value` entries.
///
/// Keys are any `Into<String>`; values are any `Into<BareItem>`, so bools,
/// integers, strings, and decimals work directly. Later duplicate keys
/// overwrite earlier values while keeping the original position, matching
/// parse semantics.
///
/// # Examples
///
/// ```rust
/// use structured_fields::{parameters, BareItem, Item, write_item};
///
/// let item = Item::with_parameters(
///     BareItem::token("sugar").unwrap(),
///     parameters!("q" => 1, "organic" => true),
/// );
/// assert_eq!(write_item(&item).unwrap(), b"sugar;q=1;organic");
///
/// let empty = parameters!();
/// assert!(empty.is_empty());
/// ```
#[macro_export]
macro_rules! parameters {
    () => {
        $crate::Parameters::new()
    };

    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut params = $crate::Parameters::new();
        $(
            params.insert(::std::string::String::from($key), $crate::BareItem::from($value));
        )+
        params
    }};
}
