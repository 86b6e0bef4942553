//! Resource objects and their builder.
//!
//! A resource composes an [`Identifier`] with attributes, relationships,
//! links and meta. Field names are checked the same way whether a resource
//! is built by hand or decoded from a document:
//!
//! - attribute and relationship names must be valid member names;
//! - neither may be `type`, `id`, `lid`, `links` or `relationships`;
//! - a relationship must not share its name with an attribute.
//!
//! Empty `attributes` and `relationships` objects are normalized to absent.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::identifier::Identifier;
use crate::links::{LinkContext, Links};
use crate::map::{Attributes, Meta};
use crate::member::{self, MemberKind};
use crate::relationship::Relationship;
use crate::{Error, Result};

/// Relationship objects of a resource, in declaration order.
pub type Relationships = IndexMap<String, Relationship>;

/// A resource object.
///
/// # Examples
///
/// ```rust
/// use serde_jsonapi::{attributes, Relationship, Resource, ResourceIdentifier};
///
/// let article = Resource::builder("articles")
///     .id("1")
///     .attributes(attributes! { "title" => "JSON:API paints my bikeshed!" })
///     .relationship(
///         "author",
///         Relationship::to_one(Some(ResourceIdentifier::of("people", "9").unwrap())),
///     )
///     .build()
///     .unwrap();
///
/// assert_eq!(article.identifier().id(), Some("1"));
/// assert!(article.relationship("author").is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    identifier: Identifier,
    attributes: Option<Attributes>,
    relationships: Option<Relationships>,
    links: Option<Links>,
    meta: Option<Meta>,
}

impl Resource {
    pub fn builder(kind: impl Into<String>) -> ResourceBuilder {
        ResourceBuilder {
            kind: kind.into(),
            id: None,
            lid: None,
            attributes: Attributes::new(),
            relationships: Relationships::new(),
            links: None,
            meta: None,
        }
    }

    /// Starts a builder from any serializable value.
    ///
    /// The value must serialize to a JSON object. Its `id` member, when
    /// present and not `null`, becomes the resource `id`; a number is
    /// written in decimal. A `type` member is dropped. Every other member
    /// becomes an attribute, so reserved names are still rejected by
    /// [`ResourceBuilder::build`].
    ///
    /// ```rust
    /// use serde::Serialize;
    /// use serde_jsonapi::Resource;
    ///
    /// #[derive(Serialize)]
    /// struct Person {
    ///     id: u64,
    ///     name: String,
    /// }
    ///
    /// let person = Person { id: 9, name: "Dan".into() };
    /// let resource = Resource::from_serialize("people", &person).unwrap().build().unwrap();
    /// assert_eq!(resource.identifier().id(), Some("9"));
    /// assert_eq!(resource.attribute("name"), Some(&serde_json::json!("Dan")));
    /// assert!(resource.attribute("id").is_none());
    /// ```
    ///
    /// # Errors
    ///
    /// - [`Error::Custom`] if `value` fails to serialize.
    /// - [`Error::InvalidDocument`] if it does not serialize to an object.
    /// - [`Error::InvalidIdentifier`] if its `id` is neither a string nor a
    ///   number.
    pub fn from_serialize<T>(kind: impl Into<String>, value: &T) -> Result<ResourceBuilder>
    where
        T: Serialize + ?Sized,
    {
        let kind = kind.into();
        let mut members = match serde_json::to_value(value).map_err(Error::custom)? {
            Value::Object(members) => members,
            other => {
                return Err(Error::InvalidDocument(format!(
                    "a `{kind}` resource must serialize to an object, not {}",
                    json_type(&other)
                )))
            }
        };
        members.remove("type");
        let id = match members.remove("id") {
            None | Some(Value::Null) => None,
            Some(Value::String(id)) => Some(id),
            Some(Value::Number(id)) => Some(id.to_string()),
            Some(other) => {
                return Err(Error::InvalidIdentifier(format!(
                    "`id` of a `{kind}` resource must be a string or a number, not {}",
                    json_type(&other)
                )))
            }
        };
        let builder = Resource::builder(kind).attributes(Attributes::from(members));
        Ok(match id {
            Some(id) => builder.id(id),
            None => builder,
        })
    }

    /// Assembles a resource whose fields were already checked.
    pub(crate) fn from_checked(
        identifier: Identifier,
        attributes: Option<Attributes>,
        relationships: Option<Relationships>,
        links: Option<Links>,
        meta: Option<Meta>,
    ) -> Self {
        Resource {
            identifier,
            attributes: attributes.filter(|a| !a.is_empty()),
            relationships: relationships.filter(|r| !r.is_empty()),
            links: links.filter(|l| !l.is_empty()),
            meta,
        }
    }

    #[must_use]
    pub const fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    /// The resource `type`.
    #[must_use]
    pub fn kind(&self) -> &str {
        self.identifier.kind()
    }

    #[must_use]
    pub const fn attributes(&self) -> Option<&Attributes> {
        self.attributes.as_ref()
    }

    /// The value of one attribute. A present `null` is `Some(&Value::Null)`.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.as_ref().and_then(|a| a.get(name))
    }

    #[must_use]
    pub const fn relationships(&self) -> Option<&Relationships> {
        self.relationships.as_ref()
    }

    #[must_use]
    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships.as_ref().and_then(|r| r.get(name))
    }

    #[must_use]
    pub const fn links(&self) -> Option<&Links> {
        self.links.as_ref()
    }

    #[must_use]
    pub const fn meta(&self) -> Option<&Meta> {
        self.meta.as_ref()
    }

    /// Attribute names followed by relationship names.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        let attributes = self.attributes.iter().flat_map(|a| a.keys());
        let relationships = self.relationships.iter().flat_map(|r| r.keys());
        attributes.chain(relationships).map(String::as_str)
    }

    /// Returns a copy with the server-assigned `id` set.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidIdentifier`] if `id` is empty.
    pub fn with_id(&self, id: impl Into<String>) -> Result<Self> {
        Ok(Resource {
            identifier: self.identifier.with_id(id)?,
            ..self.clone()
        })
    }

    /// Reduces the resource to the requested fields.
    ///
    /// Attributes and relationships not named in `fields` are dropped;
    /// `type`, `id`, `lid`, links and meta are kept. The reduction does not
    /// touch `self`, and applying it twice equals applying it once.
    ///
    /// ```rust
    /// use serde_jsonapi::{attributes, Resource};
    ///
    /// let full = Resource::builder("articles")
    ///     .id("1")
    ///     .attributes(attributes! { "title" => "A", "body" => "..." })
    ///     .build()
    ///     .unwrap();
    ///
    /// let sparse = full.sparse(&["title", "missing"]);
    /// assert_eq!(sparse.field_names().collect::<Vec<_>>(), vec!["title"]);
    /// assert_eq!(full.field_names().count(), 2);
    /// ```
    #[must_use]
    pub fn sparse<S: AsRef<str>>(&self, fields: &[S]) -> Resource {
        let wanted = |name: &str| fields.iter().any(|f| f.as_ref() == name);
        let attributes = self.attributes.as_ref().map(|attributes| {
            let mut kept = attributes.clone();
            kept.retain(|name, _| wanted(name));
            kept
        });
        let relationships = self.relationships.as_ref().map(|relationships| {
            relationships
                .iter()
                .filter(|(name, _)| wanted(name))
                .map(|(name, rel)| (name.clone(), rel.clone()))
                .collect::<Relationships>()
        });
        Resource::from_checked(
            self.identifier.clone(),
            attributes,
            relationships,
            self.links.clone(),
            self.meta.clone(),
        )
    }
}

/// Builder for [`Resource`].
#[derive(Debug, Clone)]
pub struct ResourceBuilder {
    kind: String,
    id: Option<String>,
    lid: Option<String>,
    attributes: Attributes,
    relationships: Relationships,
    links: Option<Links>,
    meta: Option<Meta>,
}

impl ResourceBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn lid(mut self, lid: impl Into<String>) -> Self {
        self.lid = Some(lid.into());
        self
    }

    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Adds every member of `attributes`, replacing same-named ones.
    #[must_use]
    pub fn attributes(mut self, attributes: Attributes) -> Self {
        for (name, value) in attributes {
            self.attributes.insert(name, value);
        }
        self
    }

    #[must_use]
    pub fn relationship(mut self, name: impl Into<String>, relationship: Relationship) -> Self {
        self.relationships.insert(name.into(), relationship);
        self
    }

    #[must_use]
    pub fn links(mut self, links: Links) -> Self {
        self.links = Some(links);
        self
    }

    #[must_use]
    pub fn meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Builds a resource that can be referenced by `id` or `lid`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidIdentifier`] if `type` is invalid or both `id` and
    ///   `lid` are missing.
    /// - [`Error::ReservedFieldCollision`] if a field uses a reserved name
    ///   or a relationship shares a name with an attribute.
    /// - [`Error::InvalidMemberName`] for a malformed field name or `meta`
    ///   key.
    /// - [`Error::InvalidLink`] for a malformed link.
    ///
    /// Pagination links are rejected when the enclosing document is built,
    /// under its [`Options`](crate::Options).
    pub fn build(self) -> Result<Resource> {
        let identifier = Identifier::from_parts(self.kind.clone(), self.id.clone(), self.lid.clone())?;
        self.finish(identifier)
    }

    /// Builds the primary resource of a creation request, where the server
    /// has not assigned an `id` yet and the client may omit `lid` too.
    pub fn build_for_creation(self) -> Result<Resource> {
        let identifier =
            Identifier::unchecked_parts(self.kind.clone(), self.id.clone(), self.lid.clone())?;
        self.finish(identifier)
    }

    fn finish(self, identifier: Identifier) -> Result<Resource> {
        let names = self.relationships.keys().map(String::as_str);
        if let Some(issue) = field_issues(Some(&self.attributes), names).into_iter().next() {
            return Err(issue.error);
        }
        if let Some(links) = &self.links {
            links.validate(LinkContext::Resource, false)?;
        }
        if let Some(meta) = &self.meta {
            member::validate_member_names(meta.keys())?;
        }
        for relationship in self.relationships.values() {
            relationship.check(false)?;
        }
        Ok(Resource::from_checked(
            identifier,
            Some(self.attributes),
            Some(self.relationships),
            self.links,
            self.meta,
        ))
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A problem with one attribute or relationship name.
#[derive(Debug, Clone)]
pub(crate) struct FieldIssue {
    /// `attributes` or `relationships`.
    pub section: &'static str,
    pub name: String,
    pub error: Error,
}

fn name_error(name: &str) -> Option<Error> {
    match member::classify(name) {
        Some(MemberKind::Plain | MemberKind::At) => None,
        Some(MemberKind::Extension) => Some(Error::InvalidMemberName {
            name: name.to_string(),
            reason: "extension members are not allowed here".to_string(),
        }),
        None => member::validate_member_name(name).err(),
    }
}

/// Checks attribute and relationship names together.
pub(crate) fn field_issues<'a>(
    attributes: Option<&Attributes>,
    relationship_names: impl Iterator<Item = &'a str>,
) -> Vec<FieldIssue> {
    let mut issues = Vec::new();
    let attribute_names: Vec<&str> = attributes
        .map(|a| a.keys().map(String::as_str).collect())
        .unwrap_or_default();

    for name in &attribute_names {
        if member::is_reserved_field(name) {
            issues.push(FieldIssue {
                section: "attributes",
                name: name.to_string(),
                error: Error::collision(name, "a reserved resource member"),
            });
        } else if let Some(error) = name_error(name) {
            issues.push(FieldIssue {
                section: "attributes",
                name: name.to_string(),
                error,
            });
        }
    }

    for name in relationship_names {
        let error = if member::is_reserved_field(name) {
            Some(Error::collision(name, "a reserved resource member"))
        } else if attribute_names.contains(&name) {
            Some(Error::collision(name, &format!("attribute `{name}`")))
        } else {
            name_error(name)
        };
        if let Some(error) = error {
            issues.push(FieldIssue {
                section: "relationships",
                name: name.to_string(),
                error,
            });
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::ResourceIdentifier;
    use serde_json::json;

    fn article() -> ResourceBuilder {
        Resource::builder("articles").id("1")
    }

    #[test]
    fn test_reserved_attribute_names() {
        for reserved in ["type", "id", "lid", "links", "relationships"] {
            let err = article().attribute(reserved, "x").build().unwrap_err();
            assert!(
                matches!(err, Error::ReservedFieldCollision { ref field, .. } if field == reserved),
                "{reserved}: {err}"
            );
        }
    }

    #[test]
    fn test_relationship_colliding_with_attribute() {
        let err = article()
            .attribute("author", "Dan")
            .relationship("author", Relationship::to_one(None))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::ReservedFieldCollision { .. }));
        assert!(err.to_string().contains("attribute `author`"));
    }

    #[test]
    fn test_invalid_field_name() {
        let err = article().attribute("bad.name", 1).build().unwrap_err();
        assert!(matches!(err, Error::InvalidMemberName { .. }));
    }

    #[test]
    fn test_null_attribute_is_preserved() {
        let resource = article().attribute("subtitle", Value::Null).build().unwrap();
        assert_eq!(resource.attribute("subtitle"), Some(&Value::Null));
        assert_eq!(resource.attribute("missing"), None);
    }

    #[test]
    fn test_empty_sections_normalize_to_absent() {
        let resource = article().build().unwrap();
        assert!(resource.attributes().is_none());
        assert!(resource.relationships().is_none());
    }

    #[test]
    fn test_identifier_required_unless_creating() {
        assert!(Resource::builder("photos").build().is_err());
        let draft = Resource::builder("photos")
            .attribute("title", json!("Ember Hamster"))
            .build_for_creation()
            .unwrap();
        assert!(!draft.identifier().is_assigned());
    }

    #[test]
    fn test_meta_keys_are_member_names() {
        let err = article()
            .meta(crate::meta! { "bad key!" => 1 })
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidMemberName { ref name, .. } if name == "bad key!"));

        let rel = Relationship::to_one(None).with_meta(crate::meta! { "bad key!" => 1 });
        let err = article().relationship("author", rel).build().unwrap_err();
        assert!(matches!(err, Error::InvalidMemberName { .. }));

        assert!(article().meta(crate::meta! { "@context" => "x" }).build().is_ok());
    }

    #[test]
    fn test_pagination_links_wait_for_the_document() {
        let links = Links::self_link("/articles/1").with("next", "/articles/2");
        let resource = article().links(links).build().unwrap();
        assert!(resource.links().is_some_and(Links::has_pagination));
    }

    #[derive(serde::Serialize)]
    struct Person {
        id: Option<u64>,
        name: String,
        #[serde(rename = "type")]
        kind: &'static str,
    }

    #[test]
    fn test_from_serialize() {
        let dan = Person { id: Some(9), name: "Dan".into(), kind: "person" };
        let resource = Resource::from_serialize("people", &dan).unwrap().build().unwrap();
        assert_eq!(resource.identifier().id(), Some("9"));
        assert_eq!(resource.kind(), "people");
        assert_eq!(resource.field_names().collect::<Vec<_>>(), vec!["name"]);

        let draft = Person { id: None, name: "New".into(), kind: "person" };
        let builder = Resource::from_serialize("people", &draft).unwrap();
        assert!(builder.clone().build().is_err());
        let local = builder.lid("tmp-1").build().unwrap();
        assert_eq!(local.identifier().lid(), Some("tmp-1"));
        assert_eq!(local.attribute("name"), Some(&json!("New")));
    }

    #[test]
    fn test_from_serialize_rejects_non_objects() {
        assert!(matches!(
            Resource::from_serialize("people", &[1, 2]),
            Err(Error::InvalidDocument(_))
        ));
        assert!(matches!(
            Resource::from_serialize("people", &json!({"id": true})),
            Err(Error::InvalidIdentifier(_))
        ));
        let err = Resource::from_serialize("people", &json!({"id": "1", "links": {}}))
            .unwrap()
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::ReservedFieldCollision { .. }));
    }

    #[test]
    fn test_sparse_keeps_only_requested_fields() {
        let full = article()
            .attribute("title", "A")
            .attribute("body", "B")
            .relationship(
                "author",
                Relationship::to_one(Some(ResourceIdentifier::of("people", "9").unwrap())),
            )
            .relationship("comments", Relationship::to_many(vec![]))
            .build()
            .unwrap();

        let sparse = full.sparse(&["title", "author", "nope"]);
        let names: Vec<_> = sparse.field_names().collect();
        assert_eq!(names, vec!["title", "author"]);
        assert_eq!(sparse.sparse(&["title", "author", "nope"]), sparse);

        let bare = full.sparse::<&str>(&[]);
        assert!(bare.attributes().is_none());
        assert!(bare.relationships().is_none());
        assert_eq!(bare.identifier(), full.identifier());
    }
}
