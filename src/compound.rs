//! Compound document assembly: the included arena, include-path
//! resolution and the optional closure check.
//!
//! Resources never nest. Relationships name other resources by identifier,
//! and lookups go through a map keyed by [`ResourceKey`], so cyclic
//! relationships cannot form cycles in storage.

use std::collections::{HashMap, HashSet, VecDeque};

use indexmap::IndexMap;

use crate::document::{Included, PrimaryData};
use crate::error::{ErrorKind, Violation};
use crate::identifier::{Identifier, ResourceKey};
use crate::options::Options;
use crate::pointer::Pointer;
use crate::relationship::Cardinality;
use crate::resource::Resource;
use crate::{Error, Result};

/// Collects primary identities and included resources, rejecting repeats.
#[derive(Debug, Default)]
pub(crate) struct Arena {
    primary: HashSet<ResourceKey>,
    included: IndexMap<ResourceKey, Resource>,
}

impl Arena {
    pub fn add_primary(&mut self, identifier: &Identifier) -> Result<()> {
        let Some(key) = identifier.key() else {
            return Ok(());
        };
        if !self.primary.insert(key.clone()) {
            return Err(Error::DuplicateIncludedResource(format!(
                "{key} (repeated in primary data)"
            )));
        }
        Ok(())
    }

    pub fn include(&mut self, resource: Resource) -> Result<()> {
        let identifier = resource.identifier();
        let Some(key) = identifier.key() else {
            return Err(Error::InvalidIdentifier(format!(
                "included resource {identifier} needs an `id` or `lid`"
            )));
        };
        if identifier.is_local() && resource.attributes().is_none() {
            return Err(Error::InvalidIdentifier(format!(
                "included resource {identifier} is known only by `lid` and must carry attributes"
            )));
        }
        if self.primary.contains(&key) {
            return Err(Error::DuplicateIncludedResource(format!(
                "{key} (already in primary data)"
            )));
        }
        if self.included.contains_key(&key) {
            return Err(Error::DuplicateIncludedResource(key.to_string()));
        }
        self.included.insert(key, resource);
        Ok(())
    }

    pub fn into_included(self) -> Option<Included> {
        Included::from_map(self.included)
    }
}

/// Where each full resource of a document lives.
struct Index<'d> {
    entries: HashMap<ResourceKey, (&'d Resource, Pointer)>,
    primary: Vec<(&'d Resource, Pointer)>,
}

impl<'d> Index<'d> {
    fn new(data: &'d PrimaryData, included: Option<&'d Included>) -> Self {
        let root = Pointer::root().push("data");
        let primary: Vec<_> = match data {
            PrimaryData::Collection(resources) => resources
                .iter()
                .enumerate()
                .map(|(i, r)| (r, root.push(i)))
                .collect(),
            other => other.resources().iter().map(|r| (r, root.clone())).collect(),
        };
        let mut entries = HashMap::new();
        for (resource, pointer) in &primary {
            if let Some(key) = resource.identifier().key() {
                entries.insert(key, (*resource, pointer.clone()));
            }
        }
        let included_root = Pointer::root().push("included");
        for (i, resource) in included.into_iter().flatten().enumerate() {
            if let Some(key) = resource.identifier().key() {
                entries.insert(key, (resource, included_root.push(i)));
            }
        }
        Index { entries, primary }
    }

    fn get(&self, key: &ResourceKey) -> Option<&(&'d Resource, Pointer)> {
        self.entries.get(key)
    }
}

fn linkage_pointer(base: &Pointer, name: &str, cardinality: Option<Cardinality>, i: usize) -> Pointer {
    let data = base.push("relationships").push(name).push("data");
    match cardinality {
        Some(Cardinality::ToMany) => data.push(i),
        _ => data,
    }
}

/// Runs include-path resolution, then the closure check if requested.
pub(crate) fn cross_reference(
    data: &PrimaryData,
    included: Option<&Included>,
    options: &Options,
) -> Vec<Violation> {
    let index = Index::new(data, included);
    let mut violations = resolve_paths(&index, options);
    if options.require_full_closure {
        violations.extend(orphans(&index, included));
    }
    violations
}

/// Follows each include path from primary data. Every identifier on the
/// path claims a full representation, so it must resolve.
fn resolve_paths(index: &Index<'_>, options: &Options) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut reported = HashSet::new();

    for path in options.include_paths.iter() {
        let dotted = path.join(".");
        let mut frontier = index.primary.clone();
        for segment in path {
            let mut next = Vec::new();
            for (resource, base) in &frontier {
                let Some(relationship) = resource.relationship(segment) else {
                    continue;
                };
                for (i, linked) in relationship.linkage().iter().enumerate() {
                    let Some(key) = linked.identifier().key() else {
                        continue;
                    };
                    match index.get(&key) {
                        Some((target, pointer)) => next.push((*target, pointer.clone())),
                        None => {
                            let at = linkage_pointer(base, segment, relationship.cardinality(), i);
                            if reported.insert(at.clone()) {
                                violations.push(Violation::new(
                                    ErrorKind::UnresolvedInclusion,
                                    at,
                                    format!(
                                        "{key} is requested by include path `{dotted}` but is not in `data` or `included`"
                                    ),
                                ));
                            }
                        }
                    }
                }
            }
            frontier = next;
        }
    }
    violations
}

/// Included resources unreachable from primary data.
fn orphans(index: &Index<'_>, included: Option<&Included>) -> Vec<Violation> {
    let Some(included) = included else {
        return Vec::new();
    };
    let mut reached: HashSet<ResourceKey> = HashSet::new();
    let mut queue: VecDeque<&Resource> = index.primary.iter().map(|(r, _)| *r).collect();
    while let Some(resource) = queue.pop_front() {
        for relationship in resource.relationships().into_iter().flat_map(|r| r.values()) {
            for linked in relationship.linkage() {
                let Some(key) = linked.identifier().key() else {
                    continue;
                };
                if let Some((target, _)) = index.get(&key) {
                    if reached.insert(key) {
                        queue.push_back(*target);
                    }
                }
            }
        }
    }

    let root = Pointer::root().push("included");
    included
        .keys()
        .enumerate()
        .filter(|(_, key)| !reached.contains(*key))
        .map(|(i, key)| {
            Violation::new(
                ErrorKind::OrphanIncludedResource,
                root.push(i),
                format!("{key} is not reachable from primary data"),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::ResourceIdentifier;
    use crate::query::IncludePaths;
    use crate::relationship::Relationship;

    fn person(id: &str, friend: Option<&str>) -> Resource {
        let mut builder = Resource::builder("people").id(id).attribute("name", id);
        if let Some(friend) = friend {
            builder = builder.relationship(
                "friend",
                Relationship::to_one(Some(ResourceIdentifier::of("people", friend).unwrap())),
            );
        }
        builder.build().unwrap()
    }

    fn comments(ids: &[&str]) -> Resource {
        let linkage = ids
            .iter()
            .map(|id| ResourceIdentifier::of("comments", *id).unwrap())
            .collect();
        Resource::builder("articles")
            .id("1")
            .relationship("comments", Relationship::to_many(linkage))
            .build()
            .unwrap()
    }

    fn arena_of(data: &PrimaryData, resources: Vec<Resource>) -> Option<Included> {
        let mut arena = Arena::default();
        for r in data.resources() {
            arena.add_primary(r.identifier()).unwrap();
        }
        for r in resources {
            arena.include(r).unwrap();
        }
        arena.into_included()
    }

    #[test]
    fn test_lid_only_included_needs_attributes() {
        let mut arena = Arena::default();
        let bare = Resource::builder("people").lid("tmp").build().unwrap();
        assert!(matches!(arena.include(bare), Err(Error::InvalidIdentifier(_))));
        let full = Resource::builder("people").lid("tmp").attribute("name", "x").build().unwrap();
        assert!(arena.include(full).is_ok());
    }

    #[test]
    fn test_unresolved_to_many_linkage_is_located() {
        let data = PrimaryData::from(comments(&["5", "12"]));
        let comment = Resource::builder("comments").id("5").attribute("body", "hi").build().unwrap();
        let included = arena_of(&data, vec![comment]);
        let options = Options::new().with_include_paths(IncludePaths::parse("comments").unwrap());

        let violations = cross_reference(&data, included.as_ref(), &options);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].pointer, "/data/relationships/comments/data/1");
        assert_eq!(violations[0].kind, ErrorKind::UnresolvedInclusion);
    }

    #[test]
    fn test_nested_paths_walk_through_included() {
        let data = PrimaryData::from(person("1", Some("2")));
        let included = arena_of(&data, vec![person("2", Some("3"))]);
        let options =
            Options::new().with_include_paths(IncludePaths::parse("friend.friend").unwrap());

        let violations = cross_reference(&data, included.as_ref(), &options);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].pointer, "/included/0/relationships/friend/data");
    }

    #[test]
    fn test_closure_reaches_through_included() {
        let data = PrimaryData::from(person("1", Some("2")));
        let included = arena_of(
            &data,
            vec![person("2", Some("3")), person("3", None), person("4", None)],
        );
        let options = Options::new().with_full_closure(true);

        let violations = cross_reference(&data, included.as_ref(), &options);
        let pointers: Vec<_> = violations.iter().map(|v| v.pointer.as_str()).collect();
        assert_eq!(pointers, vec!["/included/2"]);
    }
}
