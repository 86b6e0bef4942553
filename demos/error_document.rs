//! Turning validation failures into JSON:API error documents.
//!
//! Run with: cargo run --example error_document

use serde_jsonapi::{
    parse_str, to_string_pretty, AttributeRule, AttributeSchema, AttributeType, Document, Engine,
    ErrorObject, SchemaRegistry,
};
use std::error::Error;

const REQUEST: &str = r#"{
  "data": {
    "type": "articles",
    "id": "1",
    "attributes": {"title": 42, "type": "post"},
    "relationships": {"author": {"data": [null]}},
    "unexpected": true
  }
}"#;

fn main() -> Result<(), Box<dyn Error>> {
    let registry = SchemaRegistry::new().with(
        "articles",
        AttributeSchema::new()
            .field("title", AttributeRule::new(AttributeType::String).required())
            .field("body", AttributeRule::new(AttributeType::String)),
    );

    let err = match Engine::new().with_registry(&registry).parse_str(REQUEST) {
        Ok(_) => return Err("expected the request to be rejected".into()),
        Err(err) => err,
    };

    if let Some(violations) = err.validation_errors() {
        println!("{} violation(s) during {}:", violations.len(), violations.stage());
        for violation in violations {
            println!("  {}", violation);
        }
    }

    // The error document a server would answer with.
    let response = err.to_document()?;
    println!("\nResponse body:\n{}", to_string_pretty(&response)?);

    // Hand-written error documents go through the same checks.
    let not_found = ErrorObject::builder()
        .status(404)
        .code("not_found")
        .title("Resource not found")
        .detail("No article with id 7")
        .pointer("/data/id")
        .build()?;
    let doc = Document::with_errors(vec![not_found], None, None)?;
    let text = to_string_pretty(&doc)?;
    assert_eq!(parse_str(&text)?, doc);
    println!("\nNot found:\n{}", text);

    Ok(())
}
