//! Compound documents: included resources, include paths and sparse
//! fieldsets.
//!
//! Run with: cargo run --example compound_document

use serde_jsonapi::{
    to_string_pretty, Engine, Fieldsets, IncludePaths, Options, ResourceKey,
};
use std::error::Error;

const RESPONSE: &str = r#"{
  "links": {"self": "http://example.com/articles", "next": "http://example.com/articles?page[offset]=2"},
  "data": [{
    "type": "articles",
    "id": "1",
    "attributes": {"title": "JSON:API paints my bikeshed!", "body": "The shortest article. Ever."},
    "relationships": {
      "author": {
        "links": {"self": "http://example.com/articles/1/relationships/author", "related": "http://example.com/articles/1/author"},
        "data": {"type": "people", "id": "9"}
      },
      "comments": {"data": [{"type": "comments", "id": "5"}, {"type": "comments", "id": "12"}]}
    }
  }],
  "included": [
    {"type": "people", "id": "9", "attributes": {"firstName": "Dan", "lastName": "Gebhardt", "twitter": "dgeb"}},
    {"type": "comments", "id": "5", "attributes": {"body": "First!"},
     "relationships": {"author": {"data": {"type": "people", "id": "2"}}}},
    {"type": "comments", "id": "12", "attributes": {"body": "I like XML better"},
     "relationships": {"author": {"data": {"type": "people", "id": "9"}}}}
  ]
}"#;

fn main() -> Result<(), Box<dyn Error>> {
    // Every requested path must resolve inside the document.
    let options = Options::new()
        .with_include_paths(IncludePaths::parse("author,comments")?)
        .with_full_closure(true);
    let doc = Engine::with_options(options).parse_str(RESPONSE)?;

    for article in doc.data().map(|d| d.resources()).unwrap_or_default() {
        println!("{}", article.identifier());
        for comment in article
            .relationship("comments")
            .map(|r| r.linkage())
            .unwrap_or_default()
        {
            let body = comment
                .identifier()
                .key()
                .and_then(|key| doc.resolve(&key))
                .and_then(|c| c.attribute("body"));
            println!("  comment {}: {:?}", comment.identifier(), body);
        }
    }

    let author = doc.resolve(&ResourceKey::id("people", "9"));
    println!("\nAuthor: {:?}", author.and_then(|a| a.attribute("twitter")));

    // comments.author is not satisfied: people/2 is not included.
    let strict = Options::new().with_include_paths(IncludePaths::parse("comments.author")?);
    match Engine::with_options(strict).parse_str(RESPONSE) {
        Ok(_) => println!("\ncomments.author resolved"),
        Err(err) => println!("\ncomments.author rejected: {}", err),
    }

    // Sparse fieldsets: titles only, no relationships.
    let fields = Fieldsets::from_query("fields[articles]=title&fields[people]=twitter")?;
    println!("\nSparse:\n{}", to_string_pretty(&doc.sparse(&fields))?);

    Ok(())
}
