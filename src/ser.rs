//! Serialization of the document model.
//!
//! Every model type implements [`serde::Serialize`] and writes members in
//! the canonical JSON:API order: `type`, `id`, `lid`, `attributes`,
//! `relationships`, `links`, `meta` for resources, and `data`/`errors`,
//! `meta`, `jsonapi`, `links`, `included` for documents. Absent optional
//! members are omitted, never written as `null`; the only `null`s in the
//! output are empty to-one linkage, null primary data and null links.
//!
//! Documents are valid by construction, so serialization never revalidates.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::document::{Document, Included, PrimaryContent, PrimaryData};
use crate::error_object::{ErrorObject, ErrorSource};
use crate::identifier::{Identifier, ResourceIdentifier};
use crate::jsonapi::{JsonApiObject, Version};
use crate::links::{Hreflang, Link, LinkObject, Links};
use crate::relationship::{Relationship, RelationshipData};
use crate::resource::Resource;

fn entry<M, V>(map: &mut M, key: &str, value: Option<&V>) -> Result<(), M::Error>
where
    M: SerializeMap,
    V: ?Sized + Serialize,
{
    match value {
        Some(value) => map.serialize_entry(key, value),
        None => Ok(()),
    }
}

fn identity<M: SerializeMap>(map: &mut M, identifier: &Identifier) -> Result<(), M::Error> {
    map.serialize_entry("type", identifier.kind())?;
    entry(map, "id", identifier.id())?;
    entry(map, "lid", identifier.lid())
}

impl Serialize for Link {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Link::Null => serializer.serialize_unit(),
            Link::Uri(uri) => serializer.serialize_str(uri),
            Link::Object(object) => object.serialize(serializer),
        }
    }
}

impl Serialize for Hreflang {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Hreflang::One(tag) => serializer.serialize_str(tag),
            Hreflang::Many(tags) => tags.serialize(serializer),
        }
    }
}

impl Serialize for LinkObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("href", &self.href)?;
        entry(&mut map, "rel", self.rel.as_ref())?;
        entry(&mut map, "describedby", self.describedby.as_ref())?;
        entry(&mut map, "title", self.title.as_ref())?;
        entry(&mut map, "type", self.media_type.as_ref())?;
        entry(&mut map, "hreflang", self.hreflang.as_ref())?;
        entry(&mut map, "meta", self.meta.as_ref())?;
        map.end()
    }
}

impl Serialize for Links {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl Serialize for ResourceIdentifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        identity(&mut map, self.identifier())?;
        entry(&mut map, "meta", self.meta())?;
        map.end()
    }
}

impl Serialize for RelationshipData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RelationshipData::ToOne(None) => serializer.serialize_unit(),
            RelationshipData::ToOne(Some(identifier)) => identifier.serialize(serializer),
            RelationshipData::ToMany(identifiers) => identifiers.serialize(serializer),
        }
    }
}

impl Serialize for Relationship {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        entry(&mut map, "data", self.data())?;
        entry(&mut map, "links", self.links())?;
        entry(&mut map, "meta", self.meta())?;
        map.end()
    }
}

impl Serialize for Resource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        identity(&mut map, self.identifier())?;
        entry(&mut map, "attributes", self.attributes())?;
        entry(&mut map, "relationships", self.relationships())?;
        entry(&mut map, "links", self.links())?;
        entry(&mut map, "meta", self.meta())?;
        map.end()
    }
}

impl Serialize for ErrorSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        entry(&mut map, "pointer", self.pointer.as_ref())?;
        entry(&mut map, "parameter", self.parameter.as_ref())?;
        entry(&mut map, "header", self.header.as_ref())?;
        map.end()
    }
}

impl Serialize for ErrorObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        entry(&mut map, "id", self.id.as_ref())?;
        entry(&mut map, "links", self.links.as_ref())?;
        entry(&mut map, "status", self.status.as_ref())?;
        entry(&mut map, "code", self.code.as_ref())?;
        entry(&mut map, "title", self.title.as_ref())?;
        entry(&mut map, "detail", self.detail.as_ref())?;
        entry(&mut map, "source", self.source.as_ref())?;
        entry(&mut map, "meta", self.meta.as_ref())?;
        map.end()
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl Serialize for JsonApiObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        entry(&mut map, "version", self.version.as_ref())?;
        if !self.ext.is_empty() {
            map.serialize_entry("ext", &self.ext)?;
        }
        if !self.profile.is_empty() {
            map.serialize_entry("profile", &self.profile)?;
        }
        entry(&mut map, "meta", self.meta.as_ref())?;
        map.end()
    }
}

impl Serialize for PrimaryData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PrimaryData::Null => serializer.serialize_unit(),
            PrimaryData::Single(resource) => resource.serialize(serializer),
            PrimaryData::Collection(resources) => {
                let mut seq = serializer.serialize_seq(Some(resources.len()))?;
                for resource in resources {
                    seq.serialize_element(resource)?;
                }
                seq.end()
            }
        }
    }
}

impl Serialize for Included {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match &self.primary {
            PrimaryContent::Data(data) => map.serialize_entry("data", data)?,
            PrimaryContent::Errors(errors) => map.serialize_entry("errors", errors)?,
            PrimaryContent::MetaOnly => {}
        }
        entry(&mut map, "meta", self.meta.as_ref())?;
        entry(&mut map, "jsonapi", self.jsonapi.as_ref())?;
        entry(&mut map, "links", self.links.as_ref())?;
        entry(&mut map, "included", self.included.as_ref())?;
        if let Some(extensions) = &self.extensions {
            for (name, value) in extensions {
                map.serialize_entry(name, value)?;
            }
        }
        map.end()
    }
}
