//! Building, writing and reading back a single-resource document.
//!
//! Run with: cargo run --example simple

use serde_jsonapi::{attributes, meta, parse_str, to_string_pretty, Document, Resource};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let article = Resource::builder("articles")
        .id("1")
        .attributes(attributes! {
            "title" => "Rails is Omakase",
            "wordCount" => 1200,
        })
        .build()?;

    let doc = Document::builder()
        .data(article)
        .meta(meta! { "copyright" => "Example Corp." })
        .build()?;

    // Serialize to JSON:API
    let json = to_string_pretty(&doc)?;
    println!("JSON:API output:\n{}\n", json);

    // Parse and validate it again
    let doc_back = parse_str(&json)?;
    assert_eq!(doc, doc_back);
    println!("✓ Round-trip successful");

    let title = doc_back
        .data()
        .and_then(|d| d.single())
        .and_then(|a| a.attribute("title"));
    println!("Title: {}", title.map(ToString::to_string).unwrap_or_default());

    Ok(())
}
