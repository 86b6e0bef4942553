//! Relationship objects.
//!
//! The shape of `data` fixes the cardinality once, at construction:
//! a single identifier or `null` is to-one, an array is to-many. An empty
//! array is a valid to-many relationship with no related resources, which
//! is different from `data` being absent.

use crate::identifier::ResourceIdentifier;
use crate::links::{LinkContext, Links};
use crate::map::Meta;
use crate::member;
use crate::{Error, Result};

/// Resource linkage of a relationship.
#[derive(Debug, Clone, PartialEq)]
pub enum RelationshipData {
    /// A single identifier, or `null` for an empty to-one relationship.
    ToOne(Option<ResourceIdentifier>),
    /// An ordered, possibly empty, list of identifiers.
    ToMany(Vec<ResourceIdentifier>),
}

impl RelationshipData {
    #[must_use]
    pub const fn cardinality(&self) -> Cardinality {
        match self {
            RelationshipData::ToOne(_) => Cardinality::ToOne,
            RelationshipData::ToMany(_) => Cardinality::ToMany,
        }
    }

    /// Every identifier in the linkage, in order.
    #[must_use]
    pub fn identifiers(&self) -> &[ResourceIdentifier] {
        match self {
            RelationshipData::ToOne(Some(identifier)) => std::slice::from_ref(identifier),
            RelationshipData::ToOne(None) => &[],
            RelationshipData::ToMany(identifiers) => identifiers,
        }
    }
}

impl From<ResourceIdentifier> for RelationshipData {
    fn from(identifier: ResourceIdentifier) -> Self {
        RelationshipData::ToOne(Some(identifier))
    }
}

impl From<Vec<ResourceIdentifier>> for RelationshipData {
    fn from(identifiers: Vec<ResourceIdentifier>) -> Self {
        RelationshipData::ToMany(identifiers)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    ToOne,
    ToMany,
}

/// A relationship object: resource linkage plus optional links and meta.
///
/// # Examples
///
/// ```rust
/// use serde_jsonapi::{Cardinality, Relationship, ResourceIdentifier};
///
/// let author = Relationship::to_one(Some(ResourceIdentifier::of("people", "9").unwrap()));
/// assert_eq!(author.cardinality(), Some(Cardinality::ToOne));
///
/// let tags = Relationship::to_many(vec![]);
/// assert_eq!(tags.cardinality(), Some(Cardinality::ToMany));
/// assert!(tags.linkage().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    data: Option<RelationshipData>,
    links: Option<Links>,
    meta: Option<Meta>,
}

impl Relationship {
    /// Builds a relationship from its three optional members.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidRelationshipData`] if `data`, `links` and `meta`
    ///   are all absent.
    /// - [`Error::InvalidLink`] for a malformed link, or if `links` lacks
    ///   `self`/`related`.
    /// - [`Error::InvalidMemberName`] for a malformed `meta` key.
    ///
    /// Pagination links on a to-one relationship are rejected when the
    /// enclosing document is built, under its [`Options`](crate::Options).
    pub fn new(
        data: Option<RelationshipData>,
        links: Option<Links>,
        meta: Option<Meta>,
    ) -> Result<Self> {
        let links = links.filter(|l| !l.is_empty());
        if data.is_none() && links.is_none() && meta.is_none() {
            return Err(Error::InvalidRelationshipData(
                "a relationship must contain at least one of `data`, `links` or `meta`".to_string(),
            ));
        }
        let relationship = Relationship { data, links, meta };
        relationship.check(false)?;
        Ok(relationship)
    }

    /// Bypasses link placement checks; the decoder reports those itself.
    pub(crate) fn from_decoded(
        data: Option<RelationshipData>,
        links: Option<Links>,
        meta: Option<Meta>,
    ) -> Self {
        Relationship {
            data,
            links: links.filter(|l| !l.is_empty()),
            meta,
        }
    }

    /// A to-one relationship; `None` is the empty (`null`) linkage.
    pub fn to_one(identifier: Option<ResourceIdentifier>) -> Self {
        Relationship {
            data: Some(RelationshipData::ToOne(identifier)),
            links: None,
            meta: None,
        }
    }

    pub fn to_many(identifiers: Vec<ResourceIdentifier>) -> Self {
        Relationship {
            data: Some(RelationshipData::ToMany(identifiers)),
            links: None,
            meta: None,
        }
    }

    /// A relationship without linkage, described only by its links.
    pub fn from_links(links: Links) -> Result<Self> {
        Self::new(None, Some(links), None)
    }

    /// # Errors
    ///
    /// [`Error::InvalidLink`] under the same rules as [`Relationship::new`].
    pub fn with_links(self, links: Links) -> Result<Self> {
        Self::new(self.data, Some(links), self.meta)
    }

    #[must_use]
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }

    /// `None` when the relationship carries no `data`.
    #[must_use]
    pub fn cardinality(&self) -> Option<Cardinality> {
        self.data.as_ref().map(RelationshipData::cardinality)
    }

    #[must_use]
    pub const fn data(&self) -> Option<&RelationshipData> {
        self.data.as_ref()
    }

    /// Identifiers in the linkage; empty when `data` is absent or `null`.
    #[must_use]
    pub fn linkage(&self) -> &[ResourceIdentifier] {
        match &self.data {
            Some(data) => data.identifiers(),
            None => &[],
        }
    }

    #[must_use]
    pub const fn links(&self) -> Option<&Links> {
        self.links.as_ref()
    }

    #[must_use]
    pub const fn meta(&self) -> Option<&Meta> {
        self.meta.as_ref()
    }

    /// Checks links and meta keys, and link placement when `pagination`
    /// is set.
    pub(crate) fn check(&self, pagination: bool) -> Result<()> {
        if let Some(links) = &self.links {
            links.validate(self.link_context(), pagination)?;
        }
        if let Some(meta) = &self.meta {
            member::validate_member_names(meta.keys())?;
        }
        self.linkage()
            .iter()
            .filter_map(ResourceIdentifier::meta)
            .try_for_each(|meta| member::validate_member_names(meta.keys()))
    }

    pub(crate) fn link_context(&self) -> LinkContext {
        LinkContext::Relationship {
            to_one: self.cardinality() == Some(Cardinality::ToOne),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(id: &str) -> ResourceIdentifier {
        ResourceIdentifier::of("people", id).unwrap()
    }

    #[test]
    fn test_cardinality_follows_data_shape() {
        assert_eq!(
            Relationship::to_one(None).cardinality(),
            Some(Cardinality::ToOne)
        );
        assert_eq!(
            Relationship::to_many(vec![person("1")]).cardinality(),
            Some(Cardinality::ToMany)
        );
        let links_only = Relationship::from_links(Links::new().with("related", "/a/1/b")).unwrap();
        assert_eq!(links_only.cardinality(), None);
    }

    #[test]
    fn test_empty_relationship_is_rejected() {
        let err = Relationship::new(None, None, None).unwrap_err();
        assert!(matches!(err, Error::InvalidRelationshipData(_)));
        assert!(Relationship::new(None, Some(Links::new()), None).is_err());
    }

    #[test]
    fn test_pagination_placement_is_checked_on_demand() {
        let links = Links::self_link("/articles/1/relationships/author")
            .with("next", "/articles/1/relationships/author?page=2");
        let to_one = Relationship::to_one(Some(person("9"))).with_links(links.clone()).unwrap();
        assert!(to_one.check(true).is_err());
        assert!(to_one.check(false).is_ok());
        let to_many = Relationship::to_many(vec![person("9")]).with_links(links).unwrap();
        assert!(to_many.check(true).is_ok());
    }

    #[test]
    fn test_meta_keys_are_checked() {
        let meta: Meta = [("bad key!".to_string(), serde_json::json!(1))].into_iter().collect();
        let err = Relationship::new(None, None, Some(meta.clone())).unwrap_err();
        assert!(matches!(err, Error::InvalidMemberName { .. }));

        let linkage = person("1").with_meta(meta);
        assert!(Relationship::to_many(vec![linkage]).check(false).is_err());
    }

    #[test]
    fn test_linkage() {
        let rel = Relationship::to_many(vec![person("1"), person("2")]);
        let ids: Vec<_> = rel
            .linkage()
            .iter()
            .filter_map(|r| r.identifier().id())
            .collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert!(Relationship::to_one(None).linkage().is_empty());
    }
}
