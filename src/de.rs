//! Decoding raw JSON into the document model.
//!
//! The [`Decoder`] never stops at the first problem. Each helper records a
//! [`Violation`] with a JSON Pointer to the offending member and returns
//! `None`, so one pass over a stage reports every field-level failure. The
//! engine calls [`Decoder::finish`] at each stage boundary to turn the
//! collected violations into [`Error::DocumentValidation`].
//!
//! `Document` also implements [`serde::Deserialize`] by running the engine
//! with default options, so it can be read with any serde data format:
//!
//! ```rust
//! use serde_jsonapi::Document;
//!
//! let doc: Document = serde_json::from_str(r#"{"meta":{"total":0}}"#).unwrap();
//! assert!(doc.is_meta_only());
//!
//! let err = serde_json::from_str::<Document>(r#"{"errors":[]}"#).unwrap_err();
//! assert!(err.to_string().contains("at least one error object"));
//! ```

use serde::de::{self, Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::document::Document;
use crate::engine::Engine;
use crate::error::{ErrorKind, Stage, ValidationErrors, Violation};
use crate::error_object::{ErrorObject, ErrorSource};
use crate::identifier::{Identifier, ResourceIdentifier};
use crate::jsonapi::{JsonApiObject, Version};
use crate::links::{Hreflang, Link, LinkContext, LinkObject, Links};
use crate::map::{Attributes, Meta};
use crate::media_type::is_absolute_uri;
use crate::member::{self, MemberKind};
use crate::options::Options;
use crate::pointer::Pointer;
use crate::registry::TypeRegistry;
use crate::relationship::{Relationship, RelationshipData};
use crate::resource::{self, Relationships, Resource};
use crate::{Error, Result};

const RESOURCE_MEMBERS: [&str; 7] = [
    "type",
    "id",
    "lid",
    "attributes",
    "relationships",
    "links",
    "meta",
];
const IDENTIFIER_MEMBERS: [&str; 4] = ["type", "id", "lid", "meta"];
const RELATIONSHIP_MEMBERS: [&str; 3] = ["data", "links", "meta"];
const ERROR_MEMBERS: [&str; 8] = [
    "id", "links", "status", "code", "title", "detail", "source", "meta",
];
const LINK_OBJECT_MEMBERS: [&str; 7] = [
    "href",
    "rel",
    "describedby",
    "title",
    "type",
    "hreflang",
    "meta",
];
const JSONAPI_MEMBERS: [&str; 4] = ["version", "ext", "profile", "meta"];

/// A resource whose identity, attributes, links and meta are decoded but
/// whose relationships are still raw JSON.
pub(crate) struct Draft<'v> {
    pub identifier: Identifier,
    pub attributes: Option<Attributes>,
    pub relationships: Option<&'v Map<String, Value>>,
    pub links: Option<Links>,
    pub meta: Option<Meta>,
    pub pointer: Pointer,
}

/// Collects violations while decoding one document.
pub(crate) struct Decoder<'a> {
    options: &'a Options,
    registry: Option<&'a dyn TypeRegistry>,
    violations: Vec<Violation>,
}

impl<'a> Decoder<'a> {
    pub fn new(options: &'a Options, registry: Option<&'a dyn TypeRegistry>) -> Self {
        Decoder {
            options,
            registry,
            violations: Vec::new(),
        }
    }

    pub fn report(&mut self, kind: ErrorKind, at: &Pointer, detail: impl Into<String>) {
        self.violations.push(Violation::new(kind, at.as_str(), detail));
    }

    pub fn report_error(&mut self, at: &Pointer, error: &Error) {
        self.report(error.kind(), at, error.to_string());
    }

    /// Ends a stage: fails with every violation recorded since the last
    /// boundary, if any.
    pub fn finish(&mut self, stage: Stage) -> Result<()> {
        if self.violations.is_empty() {
            tracing::trace!(stage = %stage, "stage passed");
            return Ok(());
        }
        let violations = std::mem::take(&mut self.violations);
        tracing::debug!(stage = %stage, violations = violations.len(), "stage failed");
        Err(Error::DocumentValidation(ValidationErrors::new(stage, violations)))
    }

    fn object<'v>(
        &mut self,
        value: &'v Value,
        at: &Pointer,
        kind: ErrorKind,
        what: &str,
    ) -> Option<&'v Map<String, Value>> {
        match value {
            Value::Object(map) => Some(map),
            _ => {
                self.report(kind, at, format!("{what} must be an object"));
                None
            }
        }
    }

    fn string(&mut self, value: &Value, at: &Pointer, kind: ErrorKind, what: &str) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            _ => {
                self.report(kind, at, format!("{what} must be a string"));
                None
            }
        }
    }

    /// Reports members outside `allowed`. `@`-members are ignored.
    fn unknown_members(&mut self, map: &Map<String, Value>, allowed: &[&str], at: &Pointer, what: &str) {
        for name in map.keys() {
            if allowed.contains(&name.as_str()) || member::classify(name) == Some(MemberKind::At) {
                continue;
            }
            self.report(
                ErrorKind::UnknownMember,
                &at.push(name),
                format!("`{name}` is not a member of {what}"),
            );
        }
    }

    /// Decodes a meta object. Its values are free-form, its keys are not.
    pub fn meta(&mut self, value: &Value, at: &Pointer) -> Option<Meta> {
        let map = self.object(value, at, ErrorKind::InvalidDocument, "`meta`")?;
        let mut ok = true;
        for key in map.keys().filter(|k| member::classify(k).is_none()) {
            self.report(
                ErrorKind::InvalidMemberName,
                &at.push(key),
                format!("meta key `{key}` is not a valid member name"),
            );
            ok = false;
        }
        ok.then(|| map.clone().into())
    }

    fn optional_meta(&mut self, map: &Map<String, Value>, at: &Pointer) -> Option<Meta> {
        map.get("meta").and_then(|v| self.meta(v, &at.push("meta")))
    }

    /// Decodes a links object and checks each link. Placement rules are
    /// checked separately with [`Decoder::link_placement`].
    pub fn links(&mut self, value: &Value, at: &Pointer) -> Option<Links> {
        let map = self.object(value, at, ErrorKind::InvalidLink, "`links`")?;
        let mut links = Links::new();
        let mut ok = true;
        for (name, value) in map {
            let here = at.push(name);
            let link = match value {
                Value::Null => Link::Null,
                Value::String(uri) => Link::Uri(uri.clone()),
                Value::Object(object) => match self.link_object(object, &here) {
                    Some(object) => Link::from(object),
                    None => {
                        ok = false;
                        continue;
                    }
                },
                _ => {
                    self.report(
                        ErrorKind::InvalidLink,
                        &here,
                        "a link must be a string, a link object or null",
                    );
                    ok = false;
                    continue;
                }
            };
            if member::classify(name).is_none() {
                self.report(
                    ErrorKind::InvalidMemberName,
                    &here,
                    format!("link name `{name}` is not a valid member name"),
                );
                ok = false;
            } else if let Err(error) = link.check(name) {
                self.report_error(&here, &error);
                ok = false;
            }
            links.insert(name.clone(), link);
        }
        ok.then_some(links)
    }

    fn optional_links(&mut self, map: &Map<String, Value>, at: &Pointer) -> Option<Links> {
        map.get("links").and_then(|v| self.links(v, &at.push("links")))
    }

    pub fn link_placement(&mut self, links: &Links, context: LinkContext, at: &Pointer) {
        if let Err(error) = links.check_placement(context, self.options.validate_pagination_links) {
            let here = match &error {
                Error::InvalidLink { name, .. } if links.get(name).is_some() => at.push(name),
                _ => at.clone(),
            };
            self.report_error(&here, &error);
        }
    }

    fn link_object(&mut self, map: &Map<String, Value>, at: &Pointer) -> Option<LinkObject> {
        self.unknown_members(map, &LINK_OBJECT_MEMBERS, at, "a link object");
        let Some(href) = map.get("href") else {
            self.report(ErrorKind::InvalidLink, at, "a link object must contain `href`");
            return None;
        };
        let href = self.string(href, &at.push("href"), ErrorKind::InvalidLink, "`href`")?;
        let mut field = |name: &str| -> Option<String> {
            map.get(name)
                .and_then(|v| self.string(v, &at.push(name), ErrorKind::InvalidLink, &format!("`{name}`")))
        };
        let rel = field("rel");
        let describedby = field("describedby");
        let title = field("title");
        let media_type = field("type");
        let hreflang = match map.get("hreflang") {
            None => None,
            Some(Value::String(tag)) => Some(Hreflang::One(tag.clone())),
            Some(Value::Array(tags)) if tags.iter().all(Value::is_string) => Some(Hreflang::Many(
                tags.iter().filter_map(|t| t.as_str().map(str::to_string)).collect(),
            )),
            Some(_) => {
                self.report(
                    ErrorKind::InvalidLink,
                    &at.push("hreflang"),
                    "`hreflang` must be a string or an array of strings",
                );
                None
            }
        };
        let meta = self.optional_meta(map, at);
        Some(LinkObject {
            href,
            rel,
            describedby,
            title,
            media_type,
            hreflang,
            meta,
        })
    }

    pub fn jsonapi(&mut self, value: &Value, at: &Pointer) -> Option<JsonApiObject> {
        let map = self.object(value, at, ErrorKind::InvalidDocument, "`jsonapi`")?;
        self.unknown_members(map, &JSONAPI_MEMBERS, at, "the jsonapi object");
        let version = match map.get("version") {
            None => None,
            Some(v) => self
                .string(v, &at.push("version"), ErrorKind::InvalidVersion, "`version`")
                .and_then(|s| match s.parse::<Version>() {
                    Ok(version) => Some(version),
                    Err(error) => {
                        self.report_error(&at.push("version"), &error);
                        None
                    }
                }),
        };
        let ext = self.uri_list(map, "ext", at);
        let profile = self.uri_list(map, "profile", at);
        let meta = self.optional_meta(map, at);
        Some(JsonApiObject {
            version,
            ext,
            profile,
            meta,
        })
    }

    fn uri_list(&mut self, map: &Map<String, Value>, member: &str, at: &Pointer) -> Vec<String> {
        let here = at.push(member);
        let Some(value) = map.get(member) else {
            return Vec::new();
        };
        let Some(items) = value.as_array() else {
            self.report(ErrorKind::InvalidLink, &here, format!("`{member}` must be an array of URIs"));
            return Vec::new();
        };
        let mut uris = Vec::new();
        for (i, item) in items.iter().enumerate() {
            match item.as_str() {
                Some(uri) if is_absolute_uri(uri) => uris.push(uri.to_string()),
                _ => self.report(
                    ErrorKind::InvalidLink,
                    &here.push(i),
                    format!("`{member}` entries must be absolute URIs"),
                ),
            }
        }
        uris
    }

    pub fn error_object(&mut self, value: &Value, at: &Pointer) -> Option<ErrorObject> {
        let map = self.object(value, at, ErrorKind::InvalidDocument, "an error object")?;
        self.unknown_members(map, &ERROR_MEMBERS, at, "an error object");
        let mut field = |name: &str| -> Option<String> {
            map.get(name).and_then(|v| {
                self.string(v, &at.push(name), ErrorKind::InvalidDocument, &format!("`{name}`"))
            })
        };
        let id = field("id");
        let status = field("status");
        let code = field("code");
        let title = field("title");
        let detail = field("detail");
        let source = map.get("source").and_then(|v| self.error_source(v, &at.push("source")));
        let links = self.optional_links(map, at);
        if let Some(links) = &links {
            self.link_placement(links, LinkContext::Error, &at.push("links"));
        }
        let meta = self.optional_meta(map, at);
        let object = ErrorObject {
            id,
            links,
            status,
            code,
            title,
            detail,
            source,
            meta,
        };
        let has_members = ERROR_MEMBERS.iter().any(|m| map.contains_key(*m));
        if self.options.reject_empty_error_objects && !has_members {
            self.report_error(at, &Error::EmptyErrorObject);
        }
        Some(object)
    }

    fn error_source(&mut self, value: &Value, at: &Pointer) -> Option<ErrorSource> {
        let map = self.object(value, at, ErrorKind::InvalidDocument, "`source`")?;
        let mut field = |name: &str| -> Option<String> {
            map.get(name).and_then(|v| {
                self.string(v, &at.push(name), ErrorKind::InvalidDocument, &format!("`{name}`"))
            })
        };
        Some(ErrorSource {
            pointer: field("pointer"),
            parameter: field("parameter"),
            header: field("header"),
        })
    }

    /// Reads `type`, `id` and `lid`, reporting problems as `kind`. With
    /// `allow_unassigned`, both `id` and `lid` may be missing.
    fn identifier(
        &mut self,
        map: &Map<String, Value>,
        at: &Pointer,
        allow_unassigned: bool,
        kind: ErrorKind,
    ) -> Option<Identifier> {
        let resource_type = match map.get("type") {
            None => {
                self.report(kind, at, "`type` is required");
                return None;
            }
            Some(v) => self.string(v, &at.push("type"), kind, "`type`")?,
        };
        let mut ident = |name: &str| -> std::result::Result<Option<String>, ()> {
            match map.get(name) {
                None => Ok(None),
                Some(v) => self
                    .string(v, &at.push(name), kind, &format!("`{name}`"))
                    .map(Some)
                    .ok_or(()),
            }
        };
        let (id, lid) = (ident("id"), ident("lid"));
        let (Ok(id), Ok(lid)) = (id, lid) else {
            return None;
        };
        let identifier = match Identifier::unchecked_parts(resource_type, id, lid) {
            Ok(identifier) => identifier,
            Err(error) => {
                self.report(kind, at, error.to_string());
                return None;
            }
        };
        if !identifier.is_assigned() && !allow_unassigned {
            self.report(
                kind,
                at,
                format!("resource of type `{}` has neither `id` nor `lid`", identifier.kind()),
            );
            return None;
        }
        Some(identifier)
    }

    fn resource_identifier(&mut self, value: &Value, at: &Pointer) -> Option<ResourceIdentifier> {
        let map = self.object(value, at, ErrorKind::InvalidRelationshipData, "resource linkage")?;
        self.unknown_members(map, &IDENTIFIER_MEMBERS, at, "a resource identifier object");
        let identifier = self.identifier(map, at, false, ErrorKind::InvalidRelationshipData)?;
        let meta = self.optional_meta(map, at);
        let linkage = ResourceIdentifier::new(identifier).ok()?;
        Some(match meta {
            Some(meta) => linkage.with_meta(meta),
            None => linkage,
        })
    }

    fn relationship_data(&mut self, value: &Value, at: &Pointer) -> Option<RelationshipData> {
        match value {
            Value::Null => Some(RelationshipData::ToOne(None)),
            Value::Object(_) => self
                .resource_identifier(value, at)
                .map(|r| RelationshipData::ToOne(Some(r))),
            Value::Array(items) => {
                let mut linkage = Vec::with_capacity(items.len());
                let mut ok = true;
                for (i, item) in items.iter().enumerate() {
                    let here = at.push(i);
                    if item.is_null() {
                        self.report(
                            ErrorKind::InvalidRelationshipData,
                            &here,
                            "to-many linkage must not contain null",
                        );
                        ok = false;
                        continue;
                    }
                    match self.resource_identifier(item, &here) {
                        Some(r) => linkage.push(r),
                        None => ok = false,
                    }
                }
                ok.then_some(RelationshipData::ToMany(linkage))
            }
            _ => {
                self.report(
                    ErrorKind::InvalidRelationshipData,
                    at,
                    "`data` must be a resource identifier, null or an array of resource identifiers",
                );
                None
            }
        }
    }

    fn relationship(&mut self, value: &Value, at: &Pointer) -> Option<Relationship> {
        let map = self.object(value, at, ErrorKind::InvalidRelationshipData, "a relationship")?;
        self.unknown_members(map, &RELATIONSHIP_MEMBERS, at, "a relationship object");
        let data = match map.get("data") {
            None => None,
            Some(v) => Some(self.relationship_data(v, &at.push("data"))?),
        };
        let links = self.optional_links(map, at);
        let meta = self.optional_meta(map, at);
        let relationship = Relationship::from_decoded(data, links, meta);
        if relationship.data().is_none()
            && relationship.links().is_none()
            && relationship.meta().is_none()
        {
            self.report(
                ErrorKind::InvalidRelationshipData,
                at,
                "a relationship must contain at least one of `data`, `links` or `meta`",
            );
            return None;
        }
        if let Some(links) = relationship.links() {
            self.link_placement(links, relationship.link_context(), &at.push("links"));
        }
        Some(relationship)
    }

    /// Decodes everything but relationships, which need their own stage.
    pub fn draft<'v>(
        &mut self,
        value: &'v Value,
        at: Pointer,
        allow_unassigned: bool,
    ) -> Option<Draft<'v>> {
        let map = self.object(value, &at, ErrorKind::InvalidDocument, "a resource object")?;
        self.unknown_members(map, &RESOURCE_MEMBERS, &at, "a resource object");
        let identifier = self.identifier(map, &at, allow_unassigned, ErrorKind::InvalidIdentifier);

        let attributes = match map.get("attributes") {
            None => None,
            Some(v) => self
                .object(v, &at.push("attributes"), ErrorKind::InvalidDocument, "`attributes`")
                .map(|m| Attributes::from(m.clone())),
        };
        let relationships = match map.get("relationships") {
            None => None,
            Some(v) => self.object(
                v,
                &at.push("relationships"),
                ErrorKind::InvalidDocument,
                "`relationships`",
            ),
        };
        let names = relationships.into_iter().flat_map(|r| r.keys()).map(String::as_str);
        for issue in resource::field_issues(attributes.as_ref(), names) {
            self.report_error(&at.push(issue.section).push(&issue.name), &issue.error);
        }

        let links = self.optional_links(map, &at);
        if let Some(links) = &links {
            self.link_placement(links, LinkContext::Resource, &at.push("links"));
        }
        let meta = self.optional_meta(map, &at);
        Some(Draft {
            identifier: identifier?,
            attributes,
            relationships,
            links,
            meta,
            pointer: at,
        })
    }

    /// Decodes the relationships of `draft` and checks its attributes
    /// against the registry.
    pub fn complete(&mut self, draft: Draft<'_>) -> Option<Resource> {
        self.check_schema(&draft);
        let mut relationships = Relationships::new();
        let mut ok = true;
        if let Some(raw) = draft.relationships {
            let base = draft.pointer.push("relationships");
            for (name, value) in raw {
                match self.relationship(value, &base.push(name)) {
                    Some(rel) => {
                        relationships.insert(name.clone(), rel);
                    }
                    None => ok = false,
                }
            }
        }
        ok.then(|| {
            Resource::from_checked(
                draft.identifier,
                draft.attributes,
                Some(relationships),
                draft.links,
                draft.meta,
            )
        })
    }

    fn check_schema(&mut self, draft: &Draft<'_>) {
        let Some(registry) = self.registry else {
            return;
        };
        let kind = draft.identifier.kind();
        match registry.resolve_attribute_schema(kind) {
            Some(schema) => {
                let violations = schema.check(draft.attributes.as_ref(), &draft.pointer);
                self.violations.extend(violations);
            }
            None if self.options.require_registered_types => self.report(
                ErrorKind::UnknownResourceType,
                &draft.pointer.push("type"),
                format!("resource type `{kind}` is not registered"),
            ),
            None => {}
        }
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Engine::new().parse_value(value).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decoder(options: &Options) -> Decoder<'_> {
        Decoder::new(options, None)
    }

    #[test]
    fn test_draft_collects_every_violation() {
        let options = Options::new();
        let mut de = decoder(&options);
        let value = json!({
            "type": "articles",
            "attributes": {"id": "dup", "bad.name": 1},
            "extra": true,
            "@context": "ignored"
        });
        assert!(de.draft(&value, Pointer::root().push("data"), false).is_none());
        let err = de.finish(Stage::PrimaryData).unwrap_err();
        let violations = err.validation_errors().unwrap();
        assert!(violations.at("/data").is_some());
        assert_eq!(
            violations.at("/data/attributes/id").map(|v| v.kind),
            Some(ErrorKind::ReservedFieldCollision)
        );
        assert_eq!(
            violations.at("/data/attributes/bad.name").map(|v| v.kind),
            Some(ErrorKind::InvalidMemberName)
        );
        assert_eq!(
            violations.at("/data/extra").map(|v| v.kind),
            Some(ErrorKind::UnknownMember)
        );
        assert!(violations.at("/data/@context").is_none());
    }

    #[test]
    fn test_to_many_rejects_null_members() {
        let options = Options::new();
        let mut de = decoder(&options);
        let value = json!({"data": [{"type": "tags", "id": "1"}, null, "x"]});
        assert!(de.relationship(&value, &Pointer::root().push("tags")).is_none());
        let err = de.finish(Stage::Relationships).unwrap_err();
        let violations = err.validation_errors().unwrap();
        assert_eq!(violations.len(), 2);
        assert!(violations.at("/tags/data/1").is_some());
        assert!(violations.at("/tags/data/2").is_some());
    }

    #[test]
    fn test_malformed_linkage_is_relationship_data() {
        let options = Options::new();
        let mut de = decoder(&options);
        let value = json!({"data": [{"type": "tags", "id": "1"}, {"id": "2"}]});
        let at = Pointer::root().push("data").push("relationships").push("r");
        assert!(de.relationship(&value, &at).is_none());
        let err = de.finish(Stage::Relationships).unwrap_err();
        let violations = err.validation_errors().unwrap();
        assert_eq!(
            violations.at("/data/relationships/r/data/1").map(|v| v.kind),
            Some(ErrorKind::InvalidRelationshipData)
        );
        assert!(!violations.contains(ErrorKind::InvalidIdentifier));

        de.relationship(&json!({"data": {"type": "people"}}), &at);
        let err = de.finish(Stage::Relationships).unwrap_err();
        assert_eq!(
            err.validation_errors().unwrap().at("/data/relationships/r/data").map(|v| v.kind),
            Some(ErrorKind::InvalidRelationshipData)
        );
    }

    #[test]
    fn test_meta_keys_must_be_member_names() {
        let options = Options::new();
        let mut de = decoder(&options);
        let at = Pointer::root().push("meta");
        let meta = de.meta(&json!({"ok": 1, "@context": "x", "ext:flag": true}), &at);
        assert_eq!(meta.map(|m| m.len()), Some(3));
        assert!(de.finish(Stage::TopLevel).is_ok());

        assert!(de.meta(&json!({"ok": 1, "bad key!": 2}), &at).is_none());
        let err = de.finish(Stage::TopLevel).unwrap_err();
        assert_eq!(
            err.validation_errors().unwrap().at("/meta/bad key!").map(|v| v.kind),
            Some(ErrorKind::InvalidMemberName)
        );
    }

    #[test]
    fn test_empty_relationship() {
        let options = Options::new();
        let mut de = decoder(&options);
        assert!(de.relationship(&json!({}), &Pointer::root()).is_none());
        assert!(de.finish(Stage::Relationships).is_err());
        assert!(de.finish(Stage::Relationships).is_ok());
    }

    #[test]
    fn test_link_objects() {
        let options = Options::new();
        let mut de = decoder(&options);
        let links = de
            .links(
                &json!({
                    "self": "/articles/1",
                    "next": null,
                    "describedby": {"href": "/schema", "hreflang": ["en", "de-CH"], "meta": {"v": 1}}
                }),
                &Pointer::root().push("links"),
            )
            .unwrap();
        assert_eq!(links.len(), 3);
        assert!(de.finish(Stage::TopLevel).is_ok());

        assert!(de
            .links(&json!({"self": {"title": "no href"}, "bad": 3}), &Pointer::root())
            .is_none());
        let err = de.finish(Stage::TopLevel).unwrap_err();
        assert_eq!(err.validation_errors().unwrap().len(), 2);
    }

    #[test]
    fn test_jsonapi_object() {
        let options = Options::new();
        let mut de = decoder(&options);
        let object = de
            .jsonapi(
                &json!({"version": "1.1", "ext": ["https://jsonapi.org/ext/atomic"]}),
                &Pointer::root().push("jsonapi"),
            )
            .unwrap();
        assert_eq!(object.version, Some(Version::V1_1));
        assert!(de.finish(Stage::TopLevel).is_ok());

        de.jsonapi(&json!({"version": "2.0", "profile": ["relative"]}), &Pointer::root().push("jsonapi"));
        let err = de.finish(Stage::TopLevel).unwrap_err();
        let violations = err.validation_errors().unwrap();
        assert_eq!(
            violations.at("/jsonapi/version").map(|v| v.kind),
            Some(ErrorKind::InvalidVersion)
        );
        assert!(violations.at("/jsonapi/profile/0").is_some());
    }
}
