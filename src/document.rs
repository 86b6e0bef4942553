//! The top-level document.
//!
//! A document holds exactly one kind of primary content:
//!
//! - `data`: a resource, `null`, or an array of resources, optionally with
//!   `included` resources forming a compound document;
//! - `errors`: a non-empty list of error objects;
//! - meta only: neither `data` nor `errors`, just top-level `meta`.
//!
//! Documents are only ever created through [`DocumentBuilder`] or the
//! engine, so every `Document` value satisfies the same rules.

use indexmap::IndexMap;

use crate::compound::{self, Arena};
use crate::error::{Stage, ValidationErrors};
use crate::error_object::ErrorObject;
use crate::identifier::{Identifier, ResourceKey};
use crate::jsonapi::{self, JsonApiObject};
use crate::links::{LinkContext, Links};
use crate::map::{JsonMap, Meta};
use crate::member;
use crate::options::{Options, PrimaryShape};
use crate::query::{Fieldsets, IncludePaths};
use crate::resource::Resource;
use crate::{Error, Result};

/// Members a top-level document may carry.
pub const TOP_LEVEL_MEMBERS: [&str; 6] = ["data", "errors", "meta", "jsonapi", "links", "included"];

/// Primary `data`.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimaryData {
    Null,
    Single(Box<Resource>),
    Collection(Vec<Resource>),
}

impl PrimaryData {
    #[must_use]
    pub fn single(&self) -> Option<&Resource> {
        match self {
            PrimaryData::Single(resource) => Some(resource),
            _ => None,
        }
    }

    #[must_use]
    pub fn collection(&self) -> Option<&[Resource]> {
        match self {
            PrimaryData::Collection(resources) => Some(resources),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_collection(&self) -> bool {
        matches!(self, PrimaryData::Collection(_))
    }

    /// Every primary resource, in order.
    #[must_use]
    pub fn resources(&self) -> &[Resource] {
        match self {
            PrimaryData::Null => &[],
            PrimaryData::Single(resource) => std::slice::from_ref(resource.as_ref()),
            PrimaryData::Collection(resources) => resources,
        }
    }

    fn map(&self, f: impl Fn(&Resource) -> Resource) -> PrimaryData {
        match self {
            PrimaryData::Null => PrimaryData::Null,
            PrimaryData::Single(resource) => PrimaryData::Single(Box::new(f(resource))),
            PrimaryData::Collection(resources) => {
                PrimaryData::Collection(resources.iter().map(f).collect())
            }
        }
    }
}

impl From<Resource> for PrimaryData {
    fn from(resource: Resource) -> Self {
        PrimaryData::Single(Box::new(resource))
    }
}

impl From<Option<Resource>> for PrimaryData {
    fn from(resource: Option<Resource>) -> Self {
        resource.map_or(PrimaryData::Null, PrimaryData::from)
    }
}

impl From<Vec<Resource>> for PrimaryData {
    fn from(resources: Vec<Resource>) -> Self {
        PrimaryData::Collection(resources)
    }
}

/// The primary content slot of a document.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimaryContent {
    Data(PrimaryData),
    Errors(Vec<ErrorObject>),
    MetaOnly,
}

/// The `included` resources of a compound document, keyed by identity.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Included(IndexMap<ResourceKey, Resource>);

impl Included {
    pub(crate) fn from_map(map: IndexMap<ResourceKey, Resource>) -> Option<Self> {
        (!map.is_empty()).then_some(Included(map))
    }

    #[must_use]
    pub fn get(&self, key: &ResourceKey) -> Option<&Resource> {
        self.0.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &ResourceKey) -> bool {
        self.0.contains_key(key)
    }

    /// Included resources in document order.
    pub fn iter(&self) -> indexmap::map::Values<'_, ResourceKey, Resource> {
        self.0.values()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, ResourceKey, Resource> {
        self.0.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Included {
    type Item = &'a Resource;
    type IntoIter = indexmap::map::Values<'a, ResourceKey, Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.values()
    }
}

/// A JSON:API top-level document.
///
/// # Examples
///
/// ```rust
/// use serde_jsonapi::{meta, Document, Resource};
///
/// let article = Resource::builder("articles").id("1").attribute("title", "A").build().unwrap();
/// let doc = Document::with_data(article, None, None, Some(meta! { "copyright" => "2024" })).unwrap();
/// assert_eq!(doc.data().and_then(|d| d.single()).map(|r| r.kind()), Some("articles"));
///
/// let meta_only = Document::with_meta_only(meta! { "authors" => 3 }, None).unwrap();
/// assert!(meta_only.is_meta_only());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub(crate) primary: PrimaryContent,
    pub(crate) included: Option<Included>,
    pub(crate) links: Option<Links>,
    pub(crate) meta: Option<Meta>,
    pub(crate) jsonapi: Option<JsonApiObject>,
    pub(crate) extensions: Option<JsonMap>,
}

impl Document {
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::default()
    }

    /// A success document.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateIncludedResource`] if two resources share an
    /// identifier, plus the link and identifier errors of
    /// [`DocumentBuilder::build`].
    pub fn with_data(
        data: impl Into<PrimaryData>,
        included: Option<Vec<Resource>>,
        links: Option<Links>,
        meta: Option<Meta>,
    ) -> Result<Document> {
        let mut builder = Document::builder().data(data);
        if let Some(included) = included {
            builder = builder.included(included);
        }
        builder.links_opt(links).meta_opt(meta).build()
    }

    /// An error document.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyErrorList`] if `errors` is empty, or
    /// [`Error::EmptyErrorObject`] if any error object has no members.
    pub fn with_errors(
        errors: Vec<ErrorObject>,
        links: Option<Links>,
        meta: Option<Meta>,
    ) -> Result<Document> {
        Document::builder()
            .errors(errors)
            .links_opt(links)
            .meta_opt(meta)
            .build()
    }

    /// A document with neither `data` nor `errors`.
    pub fn with_meta_only(meta: Meta, links: Option<Links>) -> Result<Document> {
        Document::builder().meta(meta).links_opt(links).build()
    }

    #[must_use]
    pub const fn primary(&self) -> &PrimaryContent {
        &self.primary
    }

    #[must_use]
    pub const fn data(&self) -> Option<&PrimaryData> {
        match &self.primary {
            PrimaryContent::Data(data) => Some(data),
            _ => None,
        }
    }

    #[must_use]
    pub fn errors(&self) -> Option<&[ErrorObject]> {
        match &self.primary {
            PrimaryContent::Errors(errors) => Some(errors),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_meta_only(&self) -> bool {
        matches!(self.primary, PrimaryContent::MetaOnly)
    }

    #[must_use]
    pub const fn included(&self) -> Option<&Included> {
        self.included.as_ref()
    }

    #[must_use]
    pub const fn links(&self) -> Option<&Links> {
        self.links.as_ref()
    }

    #[must_use]
    pub const fn meta(&self) -> Option<&Meta> {
        self.meta.as_ref()
    }

    #[must_use]
    pub const fn jsonapi(&self) -> Option<&JsonApiObject> {
        self.jsonapi.as_ref()
    }

    /// Unknown top-level members preserved verbatim by a lenient parse.
    #[must_use]
    pub const fn extensions(&self) -> Option<&JsonMap> {
        self.extensions.as_ref()
    }

    /// Finds the full resource for `key` in primary data, then `included`.
    ///
    /// ```rust
    /// use serde_jsonapi::{parse, ResourceKey};
    ///
    /// let doc = parse(br#"{
    ///     "data": {"type":"articles","id":"1","relationships":{"author":{"data":{"type":"people","id":"9"}}}},
    ///     "included": [{"type":"people","id":"9","attributes":{"name":"Dan"}}]
    /// }"#).unwrap();
    ///
    /// let author = doc.resolve(&ResourceKey::id("people", "9")).unwrap();
    /// assert_eq!(author.attribute("name").and_then(|v| v.as_str()), Some("Dan"));
    /// ```
    #[must_use]
    pub fn resolve(&self, key: &ResourceKey) -> Option<&Resource> {
        let primary = self
            .data()
            .map(PrimaryData::resources)
            .unwrap_or_default()
            .iter()
            .find(|r| r.identifier().key().as_ref() == Some(key));
        primary.or_else(|| self.included.as_ref().and_then(|i| i.get(key)))
    }

    /// Shorthand for [`Document::resolve`] with an identifier's key.
    #[must_use]
    pub fn resolve_identifier(&self, identifier: &Identifier) -> Option<&Resource> {
        identifier.key().and_then(|key| self.resolve(&key))
    }

    /// Applies sparse fieldsets to primary data and included resources.
    ///
    /// An included resource known only by `lid` keeps its attributes when
    /// its fieldset would drop all of them, so the result stays a valid
    /// compound document.
    #[must_use]
    pub fn sparse(&self, fieldsets: &Fieldsets) -> Document {
        let primary = match &self.primary {
            PrimaryContent::Data(data) => PrimaryContent::Data(data.map(|r| fieldsets.apply(r))),
            other => other.clone(),
        };
        let included = self.included.as_ref().map(|included| {
            Included(
                included
                    .0
                    .iter()
                    .map(|(key, resource)| (key.clone(), sparse_included(fieldsets, resource)))
                    .collect(),
            )
        });
        Document {
            primary,
            included,
            ..self.clone()
        }
    }
}

fn sparse_included(fieldsets: &Fieldsets, resource: &Resource) -> Resource {
    let reduced = fieldsets.apply(resource);
    if !resource.identifier().is_local() || reduced.attributes().is_some() {
        return reduced;
    }
    Resource::from_checked(
        reduced.identifier().clone(),
        resource.attributes().cloned(),
        reduced.relationships().cloned(),
        reduced.links().cloned(),
        reduced.meta().cloned(),
    )
}

/// Checks link placement on a resource and its relationships.
fn check_resource_links(resource: &Resource, pagination: bool) -> Result<()> {
    if let Some(links) = resource.links() {
        links.check_placement(LinkContext::Resource, pagination)?;
    }
    resource
        .relationships()
        .into_iter()
        .flat_map(|r| r.values())
        .try_for_each(|relationship| relationship.check(pagination))
}

/// Assembles a [`Document`] under the rules of an [`Options`].
#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder {
    data: Option<PrimaryData>,
    errors: Option<Vec<ErrorObject>>,
    included: Vec<Resource>,
    links: Option<Links>,
    meta: Option<Meta>,
    jsonapi: Option<JsonApiObject>,
    extensions: JsonMap,
    options: Options,
}

impl DocumentBuilder {
    #[must_use]
    pub fn data(mut self, data: impl Into<PrimaryData>) -> Self {
        self.data = Some(data.into());
        self
    }

    #[must_use]
    pub fn errors(mut self, errors: Vec<ErrorObject>) -> Self {
        self.errors = Some(errors);
        self
    }

    #[must_use]
    pub fn include(mut self, resource: Resource) -> Self {
        self.included.push(resource);
        self
    }

    #[must_use]
    pub fn included(mut self, resources: impl IntoIterator<Item = Resource>) -> Self {
        self.included.extend(resources);
        self
    }

    #[must_use]
    pub fn links(mut self, links: Links) -> Self {
        self.links = Some(links);
        self
    }

    fn links_opt(mut self, links: Option<Links>) -> Self {
        self.links = links;
        self
    }

    #[must_use]
    pub fn meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }

    fn meta_opt(mut self, meta: Option<Meta>) -> Self {
        self.meta = meta;
        self
    }

    #[must_use]
    pub fn jsonapi(mut self, jsonapi: JsonApiObject) -> Self {
        self.jsonapi = Some(jsonapi);
        self
    }

    /// Adds a non-standard top-level member, such as an extension member.
    /// Its name is checked by [`DocumentBuilder::build`].
    #[must_use]
    pub fn extension(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.extensions.insert(name.into(), value);
        self
    }

    #[must_use]
    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// The `include` paths whose linkage must resolve in the result.
    #[must_use]
    pub fn include_paths(mut self, paths: IncludePaths) -> Self {
        self.options.include_paths = paths;
        self
    }

    /// # Errors
    ///
    /// - [`Error::MixedPrimaryContent`] if both `data` and `errors` were set.
    /// - [`Error::EmptyErrorList`] / [`Error::EmptyErrorObject`] for bad errors.
    /// - [`Error::InvalidDocument`] if the primary content is missing, does
    ///   not match [`Options::primary_shape`], `included` accompanies
    ///   something other than `data`, or an extension member shadows a
    ///   standard one.
    /// - [`Error::InvalidMemberName`] for a malformed extension member name
    ///   or `meta` key.
    /// - [`Error::UnknownTopLevelMember`] for extension members in strict mode.
    /// - [`Error::InvalidIdentifier`] for an unassigned primary resource
    ///   without [`Options::allow_unassigned_ids`], or a lid-only included
    ///   resource without attributes.
    /// - [`Error::DuplicateIncludedResource`] for repeated identities.
    /// - [`Error::InvalidLink`] for malformed or misplaced links, anywhere in
    ///   the document. Pagination links are only allowed on collections
    ///   while [`Options::validate_pagination_links`] is set.
    /// - [`Error::DocumentValidation`] if include-path linkage does not
    ///   resolve, or the closure check fails.
    pub fn build(self) -> Result<Document> {
        let options = &self.options;
        let primary = match (self.data, self.errors) {
            (Some(_), Some(_)) => return Err(Error::MixedPrimaryContent),
            (Some(data), None) => PrimaryContent::Data(data),
            (None, Some(errors)) => {
                if errors.is_empty() {
                    return Err(Error::EmptyErrorList);
                }
                if options.reject_empty_error_objects && errors.iter().any(ErrorObject::is_empty) {
                    return Err(Error::EmptyErrorObject);
                }
                for error in &errors {
                    if let Some(links) = &error.links {
                        links.validate(LinkContext::Error, options.validate_pagination_links)?;
                    }
                    if let Some(meta) = &error.meta {
                        member::validate_member_names(meta.keys())?;
                    }
                }
                PrimaryContent::Errors(errors)
            }
            (None, None) if self.meta.is_some() => PrimaryContent::MetaOnly,
            (None, None) => {
                return Err(Error::InvalidDocument(
                    "a document must contain at least one of `data`, `errors` or `meta`"
                        .to_string(),
                ))
            }
        };

        if let Some(name) = self
            .extensions
            .keys()
            .find(|k| TOP_LEVEL_MEMBERS.contains(&k.as_str()))
        {
            return Err(Error::InvalidDocument(format!(
                "extension member `{name}` shadows a standard top-level member"
            )));
        }
        member::validate_member_names(self.extensions.keys())?;
        if let Some(meta) = &self.meta {
            member::validate_member_names(meta.keys())?;
        }
        if options.strict_top_level {
            if let Some(name) = self.extensions.keys().next() {
                return Err(Error::UnknownTopLevelMember(name.clone()));
            }
        }
        if let Some(jsonapi) = &self.jsonapi {
            for uri in &jsonapi.ext {
                jsonapi::check_absolute("ext", uri)?;
            }
            for uri in &jsonapi.profile {
                jsonapi::check_absolute("profile", uri)?;
            }
            if let Some(meta) = &jsonapi.meta {
                member::validate_member_names(meta.keys())?;
            }
        }

        let mut arena = Arena::default();
        let included = match &primary {
            PrimaryContent::Data(data) => {
                check_shape(data.is_collection(), options.primary_shape)?;
                if let Some(links) = &self.links {
                    links.check_values()?;
                    links.check_placement(
                        LinkContext::TopLevel {
                            collection: data.is_collection(),
                        },
                        options.validate_pagination_links,
                    )?;
                }
                for resource in data.resources().iter().chain(&self.included) {
                    check_resource_links(resource, options.validate_pagination_links)?;
                }
                for resource in data.resources() {
                    if !resource.identifier().is_assigned() && !options.allow_unassigned_ids {
                        return Err(Error::InvalidIdentifier(format!(
                            "primary resource {} needs an `id` or `lid`",
                            resource.identifier()
                        )));
                    }
                    arena.add_primary(resource.identifier())?;
                }
                for resource in self.included {
                    arena.include(resource)?;
                }
                arena.into_included()
            }
            _ => {
                if !self.included.is_empty() {
                    return Err(Error::InvalidDocument(
                        "`included` may only appear alongside `data`".to_string(),
                    ));
                }
                if let Some(links) = &self.links {
                    links.validate(
                        LinkContext::TopLevel { collection: false },
                        options.validate_pagination_links,
                    )?;
                }
                None
            }
        };

        let document = Document {
            primary,
            included,
            links: self.links.filter(|l| !l.is_empty()),
            meta: self.meta,
            jsonapi: self.jsonapi,
            extensions: (!self.extensions.is_empty()).then_some(self.extensions),
        };

        if let Some(data) = document.data() {
            let violations = compound::cross_reference(data, document.included(), options);
            if !violations.is_empty() {
                return Err(Error::DocumentValidation(ValidationErrors::new(
                    Stage::CrossReference,
                    violations,
                )));
            }
        }
        Ok(document)
    }
}

pub(crate) fn check_shape(is_collection: bool, shape: PrimaryShape) -> Result<()> {
    let ok = match shape {
        PrimaryShape::Any => true,
        PrimaryShape::Single => !is_collection,
        PrimaryShape::Collection => is_collection,
    };
    if ok {
        Ok(())
    } else {
        Err(Error::InvalidDocument(format!(
            "primary data must be {}",
            shape.as_str()
        )))
    }
}
