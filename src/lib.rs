//! # serde_jsonapi
//!
//! Validation and serialization of [JSON:API](https://jsonapi.org) documents.
//!
//! ## What it does
//!
//! JSON:API fixes how an HTTP API exchanges resources: a top-level document
//! carrying primary `data` (or `errors`), optional `included` resources that
//! form a compound document, and `links`, `meta` and `jsonapi` members. This
//! crate parses such documents into a typed model, checks every rule of the
//! format along the way, and serializes the model back out in canonical
//! member order.
//!
//! ## Key Features
//!
//! - **Valid by construction**: a [`Document`] exists only if it passed
//!   validation, whether it came from the wire or from [`DocumentBuilder`]
//! - **Located failures**: field-level problems carry a JSON Pointer and
//!   are reported together, ready to send back as a JSON:API error document
//! - **Compound documents**: included resources live in an arena keyed by
//!   identity, so cyclic relationships cannot form cycles in storage
//! - **Pluggable schemas**: attach a [`TypeRegistry`] to check attributes
//!   per resource type
//! - **Serde native**: every model type implements `Serialize`, and
//!   `Document` implements `Deserialize`
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! serde_jsonapi = "0.1"
//! ```
//!
//! ### Parsing
//!
//! ```rust
//! use serde_jsonapi::{parse, ResourceKey};
//!
//! let doc = parse(br#"{
//!     "data": {
//!         "type": "articles",
//!         "id": "1",
//!         "attributes": {"title": "JSON:API paints my bikeshed!"},
//!         "relationships": {"author": {"data": {"type": "people", "id": "9"}}}
//!     },
//!     "included": [{"type": "people", "id": "9", "attributes": {"name": "Dan"}}]
//! }"#).unwrap();
//!
//! let article = doc.data().and_then(|d| d.single()).unwrap();
//! let author = article.relationship("author").unwrap().linkage()[0].identifier();
//! assert_eq!(author.key(), Some(ResourceKey::id("people", "9")));
//! assert!(doc.resolve_identifier(author).is_some());
//! ```
//!
//! ### Reporting failures
//!
//! ```rust
//! use serde_jsonapi::{parse, to_string};
//!
//! let err = parse(br#"{"data":{"type":"x","attributes":{"id":"dup"}}}"#).unwrap_err();
//! let response = to_string(&err.to_document().unwrap()).unwrap();
//! assert!(response.contains(r#""pointer":"/data/attributes/id""#));
//! ```
//!
//! ### Building
//!
//! ```rust
//! use serde_jsonapi::{meta, to_string, Document, Links, Resource};
//!
//! let people = vec![
//!     Resource::builder("people").id("1").attribute("name", "Ann").build().unwrap(),
//!     Resource::builder("people").id("2").attribute("name", "Bo").build().unwrap(),
//! ];
//! let links = Links::self_link("/people?page[number]=1").with("next", "/people?page[number]=2");
//! let doc = Document::with_data(people, None, Some(links), Some(meta! { "total" => 12 })).unwrap();
//!
//! let json = to_string(&doc).unwrap();
//! assert!(json.starts_with(r#"{"data":[{"type":"people","id":"1""#));
//! ```
//!
//! ## Validation stages
//!
//! Parsing runs five ordered stages (top level, primary data,
//! relationships, included, cross reference). Each stage reports all of its
//! violations at once as [`Error::DocumentValidation`]; a later stage only
//! runs if the earlier ones were clean. See [`Engine`] and [`Options`].
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - build a document, write it out and read it back
//! - **`compound_document.rs`** - resolve a compound document with include paths and sparse fieldsets
//! - **`error_document.rs`** - turn validation failures into a response
//! - **`content_negotiation.rs`** - check `Content-Type` and `Accept` headers
//!
//! Run any example with: `cargo run --example <name>`

mod compound;
mod de;
pub mod document;
pub mod engine;
pub mod error;
pub mod error_object;
pub mod format;
pub mod identifier;
pub mod jsonapi;
pub mod links;
pub mod macros;
pub mod map;
pub mod media_type;
pub mod member;
pub mod options;
pub mod pointer;
pub mod query;
pub mod registry;
pub mod relationship;
pub mod resource;
mod ser;

pub use document::{Document, DocumentBuilder, Included, PrimaryContent, PrimaryData};
pub use engine::Engine;
pub use error::{Error, ErrorKind, Result, Stage, ValidationErrors, Violation};
pub use error_object::{ErrorObject, ErrorObjectBuilder, ErrorSource};
pub use identifier::{Identifier, KeyIdent, ResourceIdentifier, ResourceKey};
pub use jsonapi::{JsonApiObject, Version};
pub use links::{Hreflang, Link, LinkContext, LinkObject, LinkObjectBuilder, Links};
pub use map::{Attributes, JsonMap, Meta};
pub use media_type::{MediaType, Negotiator, MEDIA_TYPE};
pub use options::{Options, PrimaryShape};
pub use pointer::Pointer;
pub use query::{Fieldsets, IncludePaths};
pub use registry::{AttributeRule, AttributeSchema, AttributeType, SchemaRegistry, TypeRegistry};
pub use relationship::{Cardinality, Relationship, RelationshipData};
pub use resource::{Relationships, Resource, ResourceBuilder};

use serde::Serialize;
use serde_json::Value;
use std::io;

/// Parse and validate a document from UTF-8 JSON bytes with default options.
///
/// # Examples
///
/// ```rust
/// use serde_jsonapi::parse;
///
/// let doc = parse(br#"{"data":[],"meta":{"count":0}}"#).unwrap();
/// assert_eq!(doc.data().and_then(|d| d.collection()).map(|c| c.len()), Some(0));
/// ```
///
/// # Errors
///
/// Returns [`Error::Syntax`] for malformed JSON, a structural error for a
/// malformed document, or [`Error::DocumentValidation`] listing every
/// violation of the first failing stage.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse(bytes: &[u8]) -> Result<Document> {
    Engine::new().parse(bytes)
}

/// Parse and validate a document from a JSON string with default options.
///
/// # Errors
///
/// See [`parse`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_str(s: &str) -> Result<Document> {
    Engine::new().parse_str(s)
}

/// Validate an already-parsed JSON value with default options.
///
/// # Examples
///
/// ```rust
/// use serde_jsonapi::{parse_value, Error};
/// use serde_json::json;
///
/// let err = parse_value(json!({"data": null, "errors": [{"title": "x"}]})).unwrap_err();
/// assert!(matches!(err, Error::MixedPrimaryContent));
/// ```
///
/// # Errors
///
/// See [`parse`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_value(value: Value) -> Result<Document> {
    Engine::new().parse_value(value)
}

/// Parse and validate a document under custom [`Options`].
///
/// # Examples
///
/// ```rust
/// use serde_jsonapi::{parse_with_options, ErrorKind, Options};
///
/// let input = br#"{"meta":{"a":1},"trace":"abc"}"#;
/// let doc = parse_with_options(input, &Options::new()).unwrap();
/// assert!(doc.extensions().unwrap().contains_key("trace"));
///
/// let err = parse_with_options(input, &Options::new().with_strict_top_level(true)).unwrap_err();
/// assert!(err.has_kind(ErrorKind::UnknownTopLevelMember));
/// ```
///
/// # Errors
///
/// See [`parse`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_with_options(bytes: &[u8], options: &Options) -> Result<Document> {
    Engine::with_options(options.clone()).parse(bytes)
}

/// Parse and validate a document from an I/O stream with default options.
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails, otherwise see [`parse`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_reader<R: io::Read>(reader: R) -> Result<Document> {
    Engine::new().parse_reader(reader)
}

/// Serialize a document (or any model type) to a compact JSON string.
///
/// # Errors
///
/// Returns an error only if a value inside `meta` or `attributes` cannot
/// be represented as JSON.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    Ok(serde_json::to_string(value)?)
}

/// Serialize a document (or any model type) to an indented JSON string.
///
/// # Errors
///
/// See [`to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_pretty<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    Ok(serde_json::to_string_pretty(value)?)
}

/// Serialize to compact JSON bytes.
///
/// # Errors
///
/// See [`to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec<T>(value: &T) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    Ok(serde_json::to_vec(value)?)
}

/// Serialize to indented JSON bytes.
///
/// # Errors
///
/// See [`to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec_pretty<T>(value: &T) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    Ok(serde_json::to_vec_pretty(value)?)
}

/// Convert to a [`serde_json::Value`].
///
/// # Examples
///
/// ```rust
/// use serde_jsonapi::{to_value, Document, Resource};
///
/// let doc = Document::with_data(Resource::builder("tags").id("7").build().unwrap(), None, None, None).unwrap();
/// assert_eq!(to_value(&doc).unwrap(), serde_json::json!({"data": {"type": "tags", "id": "7"}}));
/// ```
///
/// # Errors
///
/// See [`to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    Ok(serde_json::to_value(value)?)
}

/// Serialize as compact JSON into a writer.
///
/// # Errors
///
/// Returns [`Error::Io`] if writing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    serde_json::to_writer(writer, value)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE: &str = r#"{
        "data": {
            "type": "articles",
            "id": "1",
            "attributes": {"title": "Rails is Omakase"},
            "relationships": {
                "author": {
                    "links": {"self": "/articles/1/relationships/author", "related": "/articles/1/author"},
                    "data": {"type": "people", "id": "9"}
                }
            },
            "links": {"self": "http://example.com/articles/1"}
        },
        "included": [{"type": "people", "id": "9", "attributes": {"firstName": "Dan"}}],
        "jsonapi": {"version": "1.1"}
    }"#;

    #[test]
    fn test_parse_serialize_parse() {
        let doc = parse_str(ARTICLE).unwrap();
        let bytes = to_vec(&doc).unwrap();
        let again = parse(&bytes).unwrap();
        assert_eq!(doc, again);
    }

    #[test]
    fn test_member_order_on_output() {
        let doc = parse_str(ARTICLE).unwrap();
        let text = to_string(&doc).unwrap();
        let data = text.find(r#""data""#).unwrap();
        let jsonapi = text.find(r#""jsonapi""#).unwrap();
        let included = text.find(r#""included""#).unwrap();
        assert!(data < jsonapi && jsonapi < included);
    }

    #[test]
    fn test_writer_and_reader() {
        let doc = parse_str(ARTICLE).unwrap();
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &doc).unwrap();
        let again = parse_reader(std::io::Cursor::new(buffer)).unwrap();
        assert_eq!(doc, again);
    }

    #[test]
    fn test_pretty_output_parses() {
        let doc = parse_str(ARTICLE).unwrap();
        let pretty = to_string_pretty(&doc).unwrap();
        assert!(pretty.contains('\n'));
        assert_eq!(parse_str(&pretty).unwrap(), doc);
        assert_eq!(to_vec_pretty(&doc).unwrap(), pretty.into_bytes());
    }

    #[test]
    fn test_syntax_error_has_position() {
        match parse(b"{\"data\": ") {
            Err(Error::Syntax { line, .. }) => assert_eq!(line, 1),
            other => panic!("expected syntax error, got {other:?}"),
        }
    }
}
