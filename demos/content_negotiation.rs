//! Checking Content-Type and Accept headers for the JSON:API media type.
//!
//! Run with: cargo run --example content_negotiation

use serde_jsonapi::{to_string, Negotiator, MEDIA_TYPE};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let negotiator = Negotiator::new().with_extension("https://jsonapi.org/ext/atomic");
    println!("Base media type: {}\n", MEDIA_TYPE);

    let content_types = [
        "application/vnd.api+json",
        r#"application/vnd.api+json; ext="https://jsonapi.org/ext/atomic""#,
        "application/vnd.api+json; charset=utf-8",
        r#"application/vnd.api+json; ext="https://example.com/unknown""#,
        "application/json",
    ];
    for header in content_types {
        match negotiator.check_content_type(header) {
            Ok(media_type) => println!("Content-Type {header}\n  ✓ {media_type}"),
            Err(err) => println!(
                "Content-Type {header}\n  ✗ {} {}",
                err.kind().status(),
                err
            ),
        }
    }

    println!();
    let accepts = [
        "application/vnd.api+json",
        r#"application/vnd.api+json; profile="https://example.com/timestamps", text/html"#,
        r#"application/vnd.api+json; ext="https://example.com/unknown""#,
        "*/*",
        "text/html",
    ];
    for header in accepts {
        match negotiator.check_accept(header) {
            Ok(media_type) => println!("Accept {header}\n  ✓ respond with {media_type}"),
            Err(err) => {
                println!("Accept {header}\n  ✗ {} {}", err.kind().status(), err);
                println!("  body: {}", to_string(&err.to_document()?)?);
            }
        }
    }

    Ok(())
}
