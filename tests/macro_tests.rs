use serde_json::{json, Value};
use serde_jsonapi::{attributes, meta, parse_str, to_value, Document, JsonMap, Resource};

#[test]
fn test_meta_macro_empty() {
    let meta = meta! {};
    assert!(meta.is_empty());
    assert_eq!(meta, JsonMap::new());
}

#[test]
fn test_meta_macro_scalars() {
    let meta = meta! {
        "count" => 3,
        "ratio" => 0.5,
        "draft" => false,
        "owner" => "dan",
    };
    assert_eq!(meta.get("count"), Some(&json!(3)));
    assert_eq!(meta.get("ratio"), Some(&json!(0.5)));
    assert_eq!(meta.get("draft"), Some(&Value::Bool(false)));
    assert_eq!(meta.get("owner"), Some(&json!("dan")));
}

#[test]
fn test_meta_macro_keeps_insertion_order() {
    let meta = meta! { "z" => 1, "b" => 2, "m" => 3 };
    let keys: Vec<_> = meta.keys().cloned().collect();
    assert_eq!(keys, vec!["z", "b", "m"]);
}

#[test]
fn test_meta_macro_last_key_wins() {
    let meta = meta! { "page" => 1, "page" => 2 };
    assert_eq!(meta.len(), 1);
    assert_eq!(meta.get("page"), Some(&json!(2)));
}

#[test]
fn test_attributes_macro_with_json_values() {
    let attrs = attributes! {
        "title" => "JSON:API paints my bikeshed!",
        "tags" => json!(["api", "json"]),
        "stats" => json!({"views": 10, "likes": null}),
    };
    let article = Resource::builder("articles")
        .id("1")
        .attributes(attrs)
        .build()
        .unwrap();
    assert_eq!(article.attribute("tags"), Some(&json!(["api", "json"])));
    assert_eq!(
        article.attribute("stats").and_then(|s| s.get("views")),
        Some(&json!(10))
    );
}

#[test]
fn test_macros_in_documents() {
    let article = Resource::builder("articles")
        .id("1")
        .attributes(attributes! { "title" => "Hello" })
        .meta(meta! { "rev" => 4 })
        .build()
        .unwrap();
    let doc = Document::builder()
        .data(article)
        .meta(meta! { "total" => 1 })
        .build()
        .unwrap();

    let value = to_value(&doc).unwrap();
    assert_eq!(
        value,
        json!({
            "data": {"type": "articles", "id": "1", "attributes": {"title": "Hello"}, "meta": {"rev": 4}},
            "meta": {"total": 1}
        })
    );
    assert_eq!(parse_str(&value.to_string()).unwrap(), doc);
}

#[test]
fn test_reserved_name_from_macro_is_rejected() {
    let result = Resource::builder("articles")
        .id("1")
        .attributes(attributes! { "type" => "oops" })
        .build();
    assert!(result.is_err());
}
