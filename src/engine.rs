//! The validation engine.
//!
//! [`Engine`] turns raw JSON into a [`Document`] in five ordered stages:
//!
//! 1. **Top level**: member set, primary content kind, `meta`, `jsonapi`,
//!    top-level `links` and (for error documents) the error objects.
//! 2. **Primary data**: identity, attributes, links and meta of every
//!    primary resource, plus the expected primary shape.
//! 3. **Relationships**: relationship objects of primary resources and the
//!    registry attribute schemas.
//! 4. **Included**: every `included` resource and deduplication.
//! 5. **Cross reference**: include-path resolution and the optional
//!    closure check.
//!
//! Each stage collects all of its violations; a later stage runs only if
//! the earlier ones were clean. Structural problems with no meaningful
//! location (both `data` and `errors`, an empty `errors` array, unknown
//! members in strict mode) fail immediately.
//!
//! An engine holds no per-parse state, so one instance can serve any number
//! of threads at once.

use std::io;

use serde_json::{Map, Value};

use crate::compound::{self, Arena};
use crate::de::{Decoder, Draft};
use crate::document::{self, Document, Included, PrimaryContent, PrimaryData, TOP_LEVEL_MEMBERS};
use crate::error::{ErrorKind, Stage, ValidationErrors};
use crate::error_object::ErrorObject;
use crate::jsonapi::JsonApiObject;
use crate::links::{LinkContext, Links};
use crate::map::{JsonMap, Meta};
use crate::member;
use crate::options::Options;
use crate::pointer::Pointer;
use crate::registry::TypeRegistry;
use crate::{Error, Result};

/// Parses and validates JSON:API documents.
///
/// # Examples
///
/// ```rust
/// use serde_jsonapi::{Engine, IncludePaths, Options, ResourceKey};
///
/// let engine = Engine::with_options(
///     Options::new().with_include_paths(IncludePaths::parse("author").unwrap()),
/// );
/// let doc = engine
///     .parse_str(r#"{
///         "data": {"type": "articles", "id": "1",
///                  "relationships": {"author": {"data": {"type": "people", "id": "9"}}}},
///         "included": [{"type": "people", "id": "9", "attributes": {"name": "Dan"}}]
///     }"#)
///     .unwrap();
/// assert!(doc.resolve(&ResourceKey::id("people", "9")).is_some());
///
/// let err = engine
///     .parse_str(r#"{"data": {"type": "articles", "id": "1",
///                  "relationships": {"author": {"data": {"type": "people", "id": "9"}}}}}"#)
///     .unwrap_err();
/// assert!(err.to_string().contains("include path `author`"));
/// ```
#[derive(Clone, Default)]
pub struct Engine<'r> {
    options: Options,
    registry: Option<&'r dyn TypeRegistry>,
}

impl std::fmt::Debug for Engine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("options", &self.options)
            .field("registry", &self.registry.is_some())
            .finish()
    }
}

impl<'r> Engine<'r> {
    /// An engine with default [`Options`] and no registry.
    #[must_use]
    pub fn new() -> Self {
        Engine::default()
    }

    #[must_use]
    pub fn with_options(options: Options) -> Self {
        Engine {
            options,
            registry: None,
        }
    }

    /// Checks resource attributes against `registry` while parsing.
    #[must_use]
    pub fn with_registry(mut self, registry: &'r dyn TypeRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    /// Parses a document from UTF-8 JSON bytes.
    ///
    /// # Errors
    ///
    /// [`Error::Syntax`] for malformed JSON, a structural variant such as
    /// [`Error::MixedPrimaryContent`], or [`Error::DocumentValidation`]
    /// with every violation of the first failing stage.
    pub fn parse(&self, bytes: &[u8]) -> Result<Document> {
        let value: Value = serde_json::from_slice(bytes)?;
        self.parse_value(value)
    }

    /// Parses a document from a JSON string.
    ///
    /// # Errors
    ///
    /// See [`Engine::parse`].
    pub fn parse_str(&self, s: &str) -> Result<Document> {
        let value: Value = serde_json::from_str(s)?;
        self.parse_value(value)
    }

    /// Parses a document from a reader.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if reading fails, otherwise see [`Engine::parse`].
    pub fn parse_reader<R: io::Read>(&self, reader: R) -> Result<Document> {
        let value: Value = serde_json::from_reader(reader)?;
        self.parse_value(value)
    }

    /// Validates an already-parsed JSON value.
    ///
    /// # Errors
    ///
    /// See [`Engine::parse`].
    pub fn parse_value(&self, value: Value) -> Result<Document> {
        let span = tracing::debug_span!(
            "parse_document",
            strict = self.options.strict_top_level,
            registry = self.registry.is_some()
        );
        let _enter = span.enter();

        let Value::Object(root) = value else {
            return Err(Error::InvalidDocument(
                "the top-level value must be a JSON object".to_string(),
            ));
        };
        let mut de = Decoder::new(&self.options, self.registry);
        let top = self.top_level(&root, &mut de)?;

        let Some(data) = root.get("data") else {
            tracing::debug!(kind = top.kind(), "document parsed");
            return Ok(top.into_document(None, None));
        };

        let drafts = self.primary(data, &mut de)?;

        let mut resources = Vec::with_capacity(drafts.len());
        for draft in drafts {
            if let Some(resource) = de.complete(draft) {
                resources.push(resource);
            }
        }
        de.finish(Stage::Relationships)?;
        let data = match data {
            Value::Array(_) => PrimaryData::Collection(resources),
            _ => resources.pop().map_or(PrimaryData::Null, PrimaryData::from),
        };

        let included = self.included(&root, &data, &mut de)?;

        let violations = compound::cross_reference(&data, included.as_ref(), &self.options);
        if !violations.is_empty() {
            tracing::debug!(violations = violations.len(), "cross reference failed");
            return Err(Error::DocumentValidation(ValidationErrors::new(
                Stage::CrossReference,
                violations,
            )));
        }

        tracing::debug!(
            primary = data.resources().len(),
            included = included.as_ref().map_or(0, |i| i.len()),
            "document parsed"
        );
        Ok(top.into_document(Some(data), included))
    }

    fn top_level(&self, root: &Map<String, Value>, de: &mut Decoder<'_>) -> Result<TopLevel> {
        let has_data = root.contains_key("data");
        let has_errors = root.contains_key("errors");
        if has_data && has_errors {
            return Err(Error::MixedPrimaryContent);
        }
        if !has_data && !has_errors && !root.contains_key("meta") {
            return Err(Error::InvalidDocument(
                "a document must contain at least one of `data`, `errors` or `meta`".to_string(),
            ));
        }
        if root.contains_key("included") && !has_data {
            return Err(Error::InvalidDocument(
                "`included` may only appear alongside `data`".to_string(),
            ));
        }

        let mut extensions = JsonMap::new();
        for (name, value) in root {
            if TOP_LEVEL_MEMBERS.contains(&name.as_str()) {
                continue;
            }
            if self.options.strict_top_level {
                return Err(Error::UnknownTopLevelMember(name.clone()));
            }
            if member::classify(name).is_none() {
                de.report(
                    ErrorKind::InvalidMemberName,
                    &Pointer::root().push(name),
                    format!("top-level member `{name}` is not a valid member name"),
                );
                continue;
            }
            tracing::debug!(member = %name, "preserving non-standard top-level member");
            extensions.insert(name.clone(), value.clone());
        }

        let errors = match root.get("errors") {
            None => None,
            Some(Value::Array(items)) if items.is_empty() => return Err(Error::EmptyErrorList),
            Some(Value::Array(items)) => {
                let base = Pointer::root().push("errors");
                let objects: Vec<_> = items
                    .iter()
                    .enumerate()
                    .filter_map(|(i, item)| de.error_object(item, &base.push(i)))
                    .collect();
                Some(objects)
            }
            Some(_) => {
                return Err(Error::InvalidDocument(
                    "`errors` must be an array of error objects".to_string(),
                ))
            }
        };

        let collection = match root.get("data") {
            None | Some(Value::Null | Value::Object(_)) => false,
            Some(Value::Array(_)) => true,
            Some(_) => {
                return Err(Error::InvalidDocument(
                    "`data` must be a resource object, null or an array".to_string(),
                ))
            }
        };
        if let Some(included) = root.get("included") {
            if !included.is_array() {
                return Err(Error::InvalidDocument(
                    "`included` must be an array of resource objects".to_string(),
                ));
            }
        }

        let root_ptr = Pointer::root();
        let meta = root.get("meta").and_then(|v| de.meta(v, &root_ptr.push("meta")));
        let jsonapi = root
            .get("jsonapi")
            .and_then(|v| de.jsonapi(v, &root_ptr.push("jsonapi")));
        let links = root.get("links").and_then(|v| {
            let at = root_ptr.push("links");
            let links = de.links(v, &at)?;
            de.link_placement(&links, LinkContext::TopLevel { collection }, &at);
            Some(links)
        });
        de.finish(Stage::TopLevel)?;

        if let Some(jsonapi) = &jsonapi {
            tracing::trace!(version = %jsonapi.effective_version(), "jsonapi object");
        }
        Ok(TopLevel {
            errors,
            links: links.filter(|l| !l.is_empty()),
            meta,
            jsonapi,
            extensions: (!extensions.is_empty()).then_some(extensions),
        })
    }

    fn primary<'v>(&self, data: &'v Value, de: &mut Decoder<'_>) -> Result<Vec<Draft<'v>>> {
        let at = Pointer::root().push("data");
        if let Err(error) = document::check_shape(data.is_array(), self.options.primary_shape) {
            de.report_error(&at, &error);
            return de.finish(Stage::PrimaryData).map(|()| Vec::new());
        }

        let allow_unassigned = self.options.allow_unassigned_ids;
        let drafts: Vec<Draft<'v>> = match data {
            Value::Array(items) => items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| de.draft(item, at.push(i), allow_unassigned))
                .collect(),
            Value::Object(_) => de.draft(data, at, allow_unassigned).into_iter().collect(),
            _ => Vec::new(),
        };

        let mut arena = Arena::default();
        for draft in &drafts {
            if let Err(error) = arena.add_primary(&draft.identifier) {
                de.report_error(&draft.pointer, &error);
            }
        }
        de.finish(Stage::PrimaryData)?;
        Ok(drafts)
    }

    fn included(
        &self,
        root: &Map<String, Value>,
        data: &PrimaryData,
        de: &mut Decoder<'_>,
    ) -> Result<Option<Included>> {
        let Some(Value::Array(items)) = root.get("included") else {
            return Ok(None);
        };
        let mut arena = Arena::default();
        for resource in data.resources() {
            arena.add_primary(resource.identifier())?;
        }

        let base = Pointer::root().push("included");
        for (i, item) in items.iter().enumerate() {
            let at = base.push(i);
            let Some(draft) = de.draft(item, at.clone(), false) else {
                continue;
            };
            let Some(resource) = de.complete(draft) else {
                continue;
            };
            if let Err(error) = arena.include(resource) {
                de.report_error(&at, &error);
            }
        }
        de.finish(Stage::Included)?;
        Ok(arena.into_included())
    }
}

/// Everything the top-level stage decodes besides primary data.
struct TopLevel {
    errors: Option<Vec<ErrorObject>>,
    links: Option<Links>,
    meta: Option<Meta>,
    jsonapi: Option<JsonApiObject>,
    extensions: Option<JsonMap>,
}

impl TopLevel {
    fn kind(&self) -> &'static str {
        if self.errors.is_some() {
            "errors"
        } else {
            "meta"
        }
    }

    fn into_document(self, data: Option<PrimaryData>, included: Option<Included>) -> Document {
        let primary = match (data, self.errors) {
            (Some(data), _) => PrimaryContent::Data(data),
            (None, Some(errors)) => PrimaryContent::Errors(errors),
            (None, None) => PrimaryContent::MetaOnly,
        };
        Document {
            primary,
            included,
            links: self.links,
            meta: self.meta,
            jsonapi: self.jsonapi,
            extensions: self.extensions,
        }
    }
}
