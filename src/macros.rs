/// Builds a [`Meta`](crate::Meta) object from `key => value` pairs.
///
/// Values are anything convertible into a [`serde_json::Value`]; use
/// `serde_json::json!` for nested structures.
///
/// ```rust
/// use serde_jsonapi::meta;
///
/// let meta = meta! { "total" => 42, "tags" => serde_json::json!(["a", "b"]) };
/// assert_eq!(meta.len(), 2);
/// assert!(meta! {}.is_empty());
/// ```
#[macro_export]
macro_rules! meta {
    () => {
        $crate::JsonMap::new()
    };

    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::JsonMap::new();
        $(
            map.insert(
                ::std::string::ToString::to_string(&$key),
                ::core::convert::Into::<::serde_json::Value>::into($value),
            );
        )+
        map
    }};
}

/// Builds resource [`Attributes`](crate::Attributes) from `key => value`
/// pairs. Same syntax as [`meta!`].
#[macro_export]
macro_rules! attributes {
    ($($tt:tt)*) => {
        $crate::meta!($($tt)*)
    };
}
