//! JSON:API Document Format
//!
//! This module documents the subset of the JSON:API 1.1 format that this
//! library reads and writes, and the exact rules it enforces.
//!
//! # Overview
//!
//! A JSON:API document is a JSON object. Its members fall into three groups:
//!
//! - **Primary content**: exactly one of `data`, `errors`, or neither (in
//!   which case `meta` is required)
//! - **Compound members**: `included`, allowed only alongside `data`
//! - **Descriptive members**: `meta`, `jsonapi`, `links`
//!
//! Any other top-level member is preserved verbatim in
//! [`Document::extensions`](crate::Document::extensions), or rejected with
//! [`Error::UnknownTopLevelMember`](crate::Error::UnknownTopLevelMember)
//! when [`Options::strict_top_level`](crate::Options::strict_top_level) is set.
//!
//! # Resource Objects
//!
//! ```json
//! {
//!   "type": "articles",
//!   "id": "1",
//!   "attributes": {"title": "Rails is Omakase"},
//!   "relationships": {
//!     "author": {
//!       "links": {"self": "/articles/1/relationships/author", "related": "/articles/1/author"},
//!       "data": {"type": "people", "id": "9"}
//!     }
//!   },
//!   "links": {"self": "http://example.com/articles/1"},
//!   "meta": {"rev": 3}
//! }
//! ```
//!
//! **Rules**:
//! - `type` is required and must be a valid member name
//! - `id` identifies a persisted resource; `lid` a resource created in the
//!   same request. Either may be present; when both are, `id` wins for
//!   equality and lookup
//! - A primary resource may lack both only in a creation payload
//!   ([`Options::allow_unassigned_ids`](crate::Options::allow_unassigned_ids))
//! - Attributes and relationships share one namespace: a name may not
//!   appear in both, and none may be `type`, `id`, `lid`, `links` or
//!   `relationships`
//! - Members starting with `@` are ignored; any other unknown member is a
//!   violation
//!
//! ## Member Names
//!
//! | Position | Allowed |
//! |----------|---------|
//! | Anywhere | `a-z`, `A-Z`, `0-9`, U+0080 and above |
//! | Inside only | `-`, `_`, space |
//! | Prefix | `@` (an @-member), or `namespace:` (an extension member) |
//!
//! # Relationship Objects
//!
//! A relationship holds at least one of `data`, `links`, `meta`.
//!
//! | `data` | Meaning |
//! |--------|---------|
//! | absent | Linkage unknown; links or meta only |
//! | `null` | Empty to-one relationship |
//! | `{...}` | To-one linkage |
//! | `[]` | Empty to-many relationship |
//! | `[{...}, ...]` | To-many linkage; `null` elements are rejected |
//!
//! Relationship `links` must contain `self` or `related`.
//!
//! # Links
//!
//! A link is a URI-reference string, a link object, or `null`:
//!
//! ```json
//! {
//!   "self": "/articles?page[number]=3",
//!   "next": null,
//!   "describedby": {"href": "/schemas/articles", "type": "application/schema+json", "hreflang": "en"}
//! }
//! ```
//!
//! Pagination links (`first`, `last`, `prev`, `next`) are accepted only in
//! the top-level links of a collection document and in the links of a
//! to-many relationship, unless
//! [`Options::validate_pagination_links`](crate::Options::validate_pagination_links)
//! is off.
//!
//! # Compound Documents
//!
//! `included` is an array of full resource objects. Each must carry an `id`
//! or `lid` (a `lid`-only resource must also carry attributes), and no
//! identity may appear twice across `data` and `included`.
//!
//! Resolution happens in two optional checks:
//!
//! 1. **Include paths**: for every requested path (`include=comments.author`),
//!    each linkage along the path must resolve to `data` or `included`
//! 2. **Full closure**: every included resource must be reachable from
//!    primary data through relationship linkage
//!
//! # Error Documents
//!
//! ```json
//! {"errors": [{"status": "422", "code": "invalid_attribute", "source": {"pointer": "/data/attributes/title"}}]}
//! ```
//!
//! - `errors` must be a non-empty array
//! - Each error object needs at least one member (configurable)
//! - `status` is a string holding the HTTP status code
//!
//! # Output
//!
//! Serialization writes members in a fixed order and omits absent members:
//!
//! | Object | Order |
//! |--------|-------|
//! | Document | `data` / `errors`, `meta`, `jsonapi`, `links`, `included`, extension members |
//! | Resource | `type`, `id`, `lid`, `attributes`, `relationships`, `links`, `meta` |
//! | Relationship | `data`, `links`, `meta` |
//! | Error | `id`, `links`, `status`, `code`, `title`, `detail`, `source`, `meta` |
//!
//! Attribute and meta members keep the order they were inserted or parsed in.
//!
//! # Media Type
//!
//! `application/vnd.api+json`, with only the `ext` and `profile` parameters:
//!
//! ```text
//! Content-Type: application/vnd.api+json; ext="https://jsonapi.org/ext/atomic"
//! Accept: application/vnd.api+json; profile="https://example.com/timestamps", application/vnd.api+json
//! ```
//!
//! See [`Negotiator`](crate::Negotiator) for how requests are checked.
