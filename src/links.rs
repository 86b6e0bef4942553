//! Links objects, link objects and pagination links.
//!
//! A links object maps link names (`self`, `related`, `describedby`, `first`,
//! `prev`, `next`, `last`, ...) to one of:
//!
//! - a URI-reference string,
//! - a link object (`href` plus optional `rel`, `describedby`, `title`,
//!   `type`, `hreflang`, `meta`),
//! - `null`, meaning the link does not exist (e.g. `next` on the last page).
//!
//! ```rust
//! use serde_jsonapi::{Link, LinkObject, Links};
//!
//! let mut links = Links::new();
//! links.insert("self", "https://example.com/articles?page[number]=2");
//! links.insert("next", Link::Null);
//! links.insert(
//!     "describedby",
//!     LinkObject::builder("https://example.com/schemas/articles")
//!         .title("Article schema")
//!         .media_type("application/schema+json")
//!         .build()
//!         .unwrap(),
//! );
//! assert!(links.self_href().is_some());
//! assert!(links.has_pagination());
//! ```

use indexmap::IndexMap;
use url::Url;

use crate::map::Meta;
use crate::member;
use crate::{Error, Result};

/// Link names that paginate a collection.
pub const PAGINATION_LINKS: [&str; 4] = ["first", "last", "prev", "next"];

/// A single link value.
#[derive(Debug, Clone, PartialEq)]
pub enum Link {
    /// `null`: the link is known not to exist.
    Null,
    /// A bare URI-reference.
    Uri(String),
    /// A full link object.
    Object(Box<LinkObject>),
}

impl Link {
    /// The link target, if any.
    #[must_use]
    pub fn href(&self) -> Option<&str> {
        match self {
            Link::Null => None,
            Link::Uri(uri) => Some(uri),
            Link::Object(object) => Some(&object.href),
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Link::Null)
    }

    pub(crate) fn check(&self, name: &str) -> Result<()> {
        match self {
            Link::Null => Ok(()),
            Link::Uri(uri) => check_uri_reference(name, uri),
            Link::Object(object) => object.check(name),
        }
    }
}

impl From<&str> for Link {
    fn from(uri: &str) -> Self {
        Link::Uri(uri.to_string())
    }
}

impl From<String> for Link {
    fn from(uri: String) -> Self {
        Link::Uri(uri)
    }
}

impl From<LinkObject> for Link {
    fn from(object: LinkObject) -> Self {
        Link::Object(Box::new(object))
    }
}

/// Language tag(s) of a link's target.
#[derive(Debug, Clone, PartialEq)]
pub enum Hreflang {
    One(String),
    Many(Vec<String>),
}

impl Hreflang {
    pub fn tags(&self) -> &[String] {
        match self {
            Hreflang::One(tag) => std::slice::from_ref(tag),
            Hreflang::Many(tags) => tags,
        }
    }
}

/// A link object.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkObject {
    pub href: String,
    pub rel: Option<String>,
    pub describedby: Option<String>,
    pub title: Option<String>,
    /// Media type of the link's target, serialized as `type`.
    pub media_type: Option<String>,
    pub hreflang: Option<Hreflang>,
    pub meta: Option<Meta>,
}

impl LinkObject {
    pub fn builder(href: impl Into<String>) -> LinkObjectBuilder {
        LinkObjectBuilder {
            inner: LinkObject {
                href: href.into(),
                rel: None,
                describedby: None,
                title: None,
                media_type: None,
                hreflang: None,
                meta: None,
            },
        }
    }

    pub(crate) fn check(&self, name: &str) -> Result<()> {
        check_uri_reference(name, &self.href)?;
        if let Some(describedby) = &self.describedby {
            check_uri_reference(name, describedby)?;
        }
        if let Some(rel) = &self.rel {
            if rel.is_empty() || rel.chars().any(char::is_whitespace) {
                return Err(Error::link(name, "`rel` must be a single link relation type"));
            }
        }
        if let Some(hreflang) = &self.hreflang {
            if hreflang.tags().is_empty() {
                return Err(Error::link(name, "`hreflang` must not be an empty list"));
            }
            if let Some(tag) = hreflang.tags().iter().find(|t| !is_language_tag(t)) {
                return Err(Error::link(
                    name,
                    &format!("`hreflang` value `{tag}` is not a valid language tag"),
                ));
            }
        }
        if let Some(meta) = &self.meta {
            member::validate_member_names(meta.keys())?;
        }
        Ok(())
    }
}

/// Builder for [`LinkObject`].
#[derive(Debug, Clone)]
pub struct LinkObjectBuilder {
    inner: LinkObject,
}

impl LinkObjectBuilder {
    #[must_use]
    pub fn rel(mut self, rel: impl Into<String>) -> Self {
        self.inner.rel = Some(rel.into());
        self
    }

    #[must_use]
    pub fn describedby(mut self, uri: impl Into<String>) -> Self {
        self.inner.describedby = Some(uri.into());
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.inner.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn media_type(mut self, media_type: impl Into<String>) -> Self {
        self.inner.media_type = Some(media_type.into());
        self
    }

    #[must_use]
    pub fn hreflang(mut self, tag: impl Into<String>) -> Self {
        self.inner.hreflang = Some(Hreflang::One(tag.into()));
        self
    }

    #[must_use]
    pub fn hreflangs<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.hreflang = Some(Hreflang::Many(tags.into_iter().map(Into::into).collect()));
        self
    }

    #[must_use]
    pub fn meta(mut self, meta: Meta) -> Self {
        self.inner.meta = Some(meta);
        self
    }

    /// # Errors
    ///
    /// [`Error::InvalidLink`] if `href` or `describedby` is not a
    /// URI-reference, `rel` is blank, or an `hreflang` tag is malformed.
    pub fn build(self) -> Result<LinkObject> {
        self.inner.check("href")?;
        Ok(self.inner)
    }
}

/// Where a links object sits, which decides the rules it must follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkContext {
    /// Top-level links; `collection` is `true` when primary data is an array.
    TopLevel { collection: bool },
    /// Links of a resource object.
    Resource,
    /// Links of a relationship object; `to_one` when linkage is a single identifier.
    Relationship { to_one: bool },
    /// Links of an error object.
    Error,
}

impl LinkContext {
    const fn allows_pagination(self) -> bool {
        match self {
            LinkContext::TopLevel { collection } => collection,
            LinkContext::Relationship { to_one } => !to_one,
            LinkContext::Resource | LinkContext::Error => false,
        }
    }
}

/// A links object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Links(IndexMap<String, Link>);

impl Links {
    #[must_use]
    pub fn new() -> Self {
        Links(IndexMap::new())
    }

    /// A links object holding only `self`.
    pub fn self_link(uri: impl Into<String>) -> Self {
        let mut links = Links::new();
        links.insert("self", Link::Uri(uri.into()));
        links
    }

    pub fn insert(&mut self, name: impl Into<String>, link: impl Into<Link>) -> Option<Link> {
        self.0.insert(name.into(), link.into())
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, link: impl Into<Link>) -> Self {
        self.insert(name, link);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Link> {
        self.0.get(name)
    }

    #[must_use]
    pub fn related(&self) -> Option<&Link> {
        self.0.get("related")
    }

    #[must_use]
    pub fn self_href(&self) -> Option<&str> {
        self.0.get("self").and_then(Link::href)
    }

    /// Returns `true` if any pagination link is present.
    #[must_use]
    pub fn has_pagination(&self) -> bool {
        PAGINATION_LINKS.iter().any(|name| self.0.contains_key(*name))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Link> {
        self.0.iter()
    }

    /// Checks link names and values, independent of placement.
    pub(crate) fn check_values(&self) -> Result<()> {
        for (name, link) in &self.0 {
            if member::classify(name).is_none() {
                return Err(Error::link(name, "link names must be valid member names"));
            }
            link.check(name)?;
        }
        Ok(())
    }

    /// Checks the placement rules of `context`.
    ///
    /// Relationship links must carry `self` or `related`. When
    /// `pagination` is enabled, pagination links are only allowed on
    /// collections.
    pub(crate) fn check_placement(&self, context: LinkContext, pagination: bool) -> Result<()> {
        if let LinkContext::Relationship { .. } = context {
            if !self.0.contains_key("self") && !self.0.contains_key("related") {
                return Err(Error::link(
                    "self",
                    "relationship links must contain `self` or `related`",
                ));
            }
        }
        if pagination && !context.allows_pagination() {
            if let Some(name) = PAGINATION_LINKS.iter().find(|n| self.0.contains_key(**n)) {
                return Err(Error::link(
                    name,
                    "pagination links are only allowed on collections",
                ));
            }
        }
        Ok(())
    }

    /// Checks values and placement.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidLink`] describing the first offending link.
    pub fn validate(&self, context: LinkContext, pagination: bool) -> Result<()> {
        self.check_values()?;
        self.check_placement(context, pagination)
    }
}

impl<'a> IntoIterator for &'a Links {
    type Item = (&'a String, &'a Link);
    type IntoIter = indexmap::map::Iter<'a, String, Link>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K: Into<String>, L: Into<Link>> FromIterator<(K, L)> for Links {
    fn from_iter<T: IntoIterator<Item = (K, L)>>(iter: T) -> Self {
        Links(iter.into_iter().map(|(k, l)| (k.into(), l.into())).collect())
    }
}

/// Base against which relative references are resolved while checking
/// them. Nothing is ever fetched from it.
const REFERENCE_BASE: &str = "http://reference.invalid/";

/// A URI-reference may be relative. It must be non-empty, free of
/// whitespace and control characters, and parse once resolved.
pub(crate) fn check_uri_reference(name: &str, uri: &str) -> Result<()> {
    if uri.is_empty() {
        return Err(Error::link(name, "URI-reference must not be empty"));
    }
    if uri.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(Error::link(
            name,
            &format!("`{uri}` is not a valid URI-reference"),
        ));
    }
    let base = Url::parse(REFERENCE_BASE).map_err(|e| Error::link(name, &e.to_string()))?;
    Url::options()
        .base_url(Some(&base))
        .parse(uri)
        .map_err(|e| Error::link(name, &format!("`{uri}` is not a valid URI-reference: {e}")))?;
    Ok(())
}

/// Basic RFC 5646 shape: a 2-3 letter primary tag followed by optional
/// alphanumeric subtags of 1-8 characters.
pub(crate) fn is_language_tag(tag: &str) -> bool {
    let mut parts = tag.split('-');
    let primary = parts.next().unwrap_or_default();
    if !(2..=3).contains(&primary.len()) || !primary.chars().all(|c| c.is_ascii_alphabetic()) {
        return false;
    }
    parts.all(|sub| (1..=8).contains(&sub.len()) && sub.chars().all(|c| c.is_ascii_alphanumeric()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_tags() {
        for ok in ["en", "en-US", "zh-Hant-TW", "sr-Latn", "de-CH-1996"] {
            assert!(is_language_tag(ok), "{ok}");
        }
        for bad in ["", "e", "english", "en_US", "en-", "12"] {
            assert!(!is_language_tag(bad), "{bad}");
        }
    }

    #[test]
    fn test_link_object_builder_validates() {
        assert!(LinkObject::builder("https://example.com").hreflang("en-GB").build().is_ok());
        assert!(LinkObject::builder("https://example.com").hreflang("english").build().is_err());
        assert!(LinkObject::builder("").build().is_err());
        assert!(LinkObject::builder("/a b").build().is_err());
        assert!(LinkObject::builder("/relative").rel("").build().is_err());
    }

    #[test]
    fn test_uri_references_are_parsed() {
        for ok in [
            "/articles?page[number]=2",
            "articles/1",
            "?page=2",
            "#top",
            "https://example.com/a%20b",
            "urn:isbn:0451450523",
            "mailto:team@example.com",
        ] {
            assert!(check_uri_reference("self", ok).is_ok(), "{ok}");
        }
        for bad in ["https://", "http://[::1", "http://a b.com", "a\tb"] {
            assert!(check_uri_reference("self", bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_link_object_meta_keys_are_member_names() {
        let meta: Meta = [("bad key!".to_string(), serde_json::json!(1))].into_iter().collect();
        let err = LinkObject::builder("/x").meta(meta).build().unwrap_err();
        assert!(matches!(err, Error::InvalidMemberName { .. }));
    }

    #[test]
    fn test_relationship_links_need_self_or_related() {
        let links = Links::new().with("describedby", "/schema");
        let err = links
            .validate(LinkContext::Relationship { to_one: true }, true)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidLink { .. }));

        let links = Links::new().with("related", "/articles/1/author");
        assert!(links.validate(LinkContext::Relationship { to_one: true }, true).is_ok());
    }

    #[test]
    fn test_pagination_only_on_collections() {
        let links = Links::self_link("/articles").with("next", "/articles?page=2");
        assert!(links.validate(LinkContext::TopLevel { collection: true }, true).is_ok());
        assert!(links.validate(LinkContext::TopLevel { collection: false }, true).is_err());
        assert!(links.validate(LinkContext::TopLevel { collection: false }, false).is_ok());
        assert!(links.validate(LinkContext::Resource, true).is_err());
    }

    #[test]
    fn test_invalid_link_name() {
        let links = Links::new().with("bad name!", "/x");
        assert!(links.validate(LinkContext::Resource, true).is_err());
    }
}
