//! Resource identifiers and the keys used to deduplicate them.
//!
//! An [`Identifier`] is the `(type, id)` or `(type, lid)` pair that names a
//! resource. Equality follows JSON:API identity rather than structure:
//!
//! - a server-assigned `id` wins whenever both sides carry one, so
//!   `(people, 9)` equals `(people, 9, lid: "tmp")`;
//! - otherwise both sides must use `lid` and their `lid`s must match.
//!
//! [`ResourceKey`] is the hashable canonical form of that rule and keys the
//! included-resource arena.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::map::Meta;
use crate::member;
use crate::{Error, Result};

/// The identity of a resource: its `type` plus an `id` and/or `lid`.
///
/// # Examples
///
/// ```rust
/// use serde_jsonapi::Identifier;
///
/// let a = Identifier::new("people", "9").unwrap();
/// let b = Identifier::from_parts("people", Some("9".into()), Some("tmp-1".into())).unwrap();
/// assert_eq!(a, b);
///
/// assert!(Identifier::new("", "9").is_err());
/// ```
#[derive(Debug, Clone, Eq)]
pub struct Identifier {
    kind: String,
    id: Option<String>,
    lid: Option<String>,
}

fn check_kind(kind: &str) -> Result<()> {
    if kind.is_empty() {
        return Err(Error::InvalidIdentifier(
            "`type` must be a non-empty string".to_string(),
        ));
    }
    if !member::is_valid_member_name(kind) {
        return Err(Error::InvalidIdentifier(format!(
            "`type` value `{kind}` is not a valid member name"
        )));
    }
    Ok(())
}

fn check_value(field: &str, value: Option<&str>) -> Result<()> {
    match value {
        Some("") => Err(Error::InvalidIdentifier(format!(
            "`{field}` must not be an empty string"
        ))),
        _ => Ok(()),
    }
}

impl Identifier {
    /// Identifies a persisted resource by `type` and server-assigned `id`.
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Result<Self> {
        Self::from_parts(kind, Some(id.into()), None)
    }

    /// Identifies a not-yet-persisted resource by its client-generated `lid`.
    pub fn local(kind: impl Into<String>, lid: impl Into<String>) -> Result<Self> {
        Self::from_parts(kind, None, Some(lid.into()))
    }

    /// Builds an identifier that must resolve to a resource.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidIdentifier`] if `kind` is empty or not a valid member
    /// name, if `id`/`lid` is an empty string, or if both are absent.
    pub fn from_parts(
        kind: impl Into<String>,
        id: Option<String>,
        lid: Option<String>,
    ) -> Result<Self> {
        let identifier = Self::unchecked_parts(kind.into(), id, lid)?;
        if !identifier.is_assigned() {
            return Err(Error::InvalidIdentifier(format!(
                "resource of type `{}` has neither `id` nor `lid`",
                identifier.kind
            )));
        }
        Ok(identifier)
    }

    /// An identifier with neither `id` nor `lid`.
    ///
    /// Only valid for the primary resource of a client creation payload,
    /// before the server assigns an `id`.
    pub fn unassigned(kind: impl Into<String>) -> Result<Self> {
        Self::unchecked_parts(kind.into(), None, None)
    }

    pub(crate) fn unchecked_parts(
        kind: String,
        id: Option<String>,
        lid: Option<String>,
    ) -> Result<Self> {
        check_kind(&kind)?;
        check_value("id", id.as_deref())?;
        check_value("lid", lid.as_deref())?;
        Ok(Identifier { kind, id, lid })
    }

    /// The resource `type`.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    #[must_use]
    pub fn lid(&self) -> Option<&str> {
        self.lid.as_deref()
    }

    /// Returns `true` if the identifier carries an `id` or a `lid`.
    #[must_use]
    pub const fn is_assigned(&self) -> bool {
        self.id.is_some() || self.lid.is_some()
    }

    /// Returns `true` if the resource is known only by its `lid`.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        self.id.is_none() && self.lid.is_some()
    }

    /// The canonical key, or `None` for an unassigned identifier.
    #[must_use]
    pub fn key(&self) -> Option<ResourceKey> {
        let ident = match (&self.id, &self.lid) {
            (Some(id), _) => KeyIdent::Id(id.clone()),
            (None, Some(lid)) => KeyIdent::Lid(lid.clone()),
            (None, None) => return None,
        };
        Some(ResourceKey {
            kind: self.kind.clone(),
            ident,
        })
    }

    /// Returns a copy with the server-assigned `id` set, keeping any `lid`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidIdentifier`] if `id` is empty.
    pub fn with_id(&self, id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        check_value("id", Some(&id))?;
        Ok(Identifier {
            kind: self.kind.clone(),
            id: Some(id),
            lid: self.lid.clone(),
        })
    }
}

impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        if self.kind != other.kind {
            return false;
        }
        match (&self.id, &other.id) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.lid == other.lid,
            _ => false,
        }
    }
}

impl Hash for Identifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        match (&self.id, &self.lid) {
            (Some(id), _) => (0u8, id).hash(state),
            (None, lid) => (1u8, lid).hash(state),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.id, &self.lid) {
            (Some(id), _) => write!(f, "({}, {})", self.kind, id),
            (None, Some(lid)) => write!(f, "({}, lid:{})", self.kind, lid),
            (None, None) => write!(f, "({}, unassigned)", self.kind),
        }
    }
}

/// The identifying half of a [`ResourceKey`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyIdent {
    Id(String),
    Lid(String),
}

/// Canonical `(type, id-or-lid)` key used for set membership.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey {
    kind: String,
    ident: KeyIdent,
}

impl ResourceKey {
    pub fn id(kind: impl Into<String>, id: impl Into<String>) -> Self {
        ResourceKey {
            kind: kind.into(),
            ident: KeyIdent::Id(id.into()),
        }
    }

    pub fn lid(kind: impl Into<String>, lid: impl Into<String>) -> Self {
        ResourceKey {
            kind: kind.into(),
            ident: KeyIdent::Lid(lid.into()),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[must_use]
    pub const fn ident(&self) -> &KeyIdent {
        &self.ident
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.ident {
            KeyIdent::Id(id) => write!(f, "({}, {})", self.kind, id),
            KeyIdent::Lid(lid) => write!(f, "({}, lid:{})", self.kind, lid),
        }
    }
}

/// A resource identifier object as it appears in relationship linkage:
/// an [`Identifier`] plus optional `meta`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceIdentifier {
    identifier: Identifier,
    meta: Option<Meta>,
}

impl ResourceIdentifier {
    /// Wraps an identifier that resolves to a resource.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidIdentifier`] if the identifier is unassigned; linkage
    /// must always point at an `id` or a `lid`.
    pub fn new(identifier: Identifier) -> Result<Self> {
        if !identifier.is_assigned() {
            return Err(Error::InvalidIdentifier(format!(
                "linkage to {identifier} must carry an `id` or `lid`"
            )));
        }
        Ok(ResourceIdentifier {
            identifier,
            meta: None,
        })
    }

    /// Shorthand for `ResourceIdentifier::new(Identifier::new(kind, id)?)`.
    pub fn of(kind: impl Into<String>, id: impl Into<String>) -> Result<Self> {
        Self::new(Identifier::new(kind, id)?)
    }

    #[must_use]
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }

    #[must_use]
    pub const fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    #[must_use]
    pub const fn meta(&self) -> Option<&Meta> {
        self.meta.as_ref()
    }
}

impl From<ResourceIdentifier> for Identifier {
    fn from(value: ResourceIdentifier) -> Self {
        value.identifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_id_wins_over_lid() {
        let a = Identifier::new("people", "9").unwrap();
        let b = Identifier::from_parts("people", Some("9".into()), Some("x".into())).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.key(), b.key());

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_lid_only_identifiers_compare_by_lid() {
        let a = Identifier::local("people", "tmp-1").unwrap();
        let b = Identifier::local("people", "tmp-1").unwrap();
        let c = Identifier::local("people", "tmp-2").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.is_local());
    }

    #[test]
    fn test_id_and_lid_forms_are_distinct() {
        let by_id = Identifier::new("people", "1").unwrap();
        let by_lid = Identifier::local("people", "1").unwrap();
        assert_ne!(by_id, by_lid);
        assert_ne!(by_id.key(), by_lid.key());
    }

    #[test]
    fn test_type_must_differ_for_inequality() {
        let a = Identifier::new("people", "1").unwrap();
        let b = Identifier::new("articles", "1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_rejects_bad_parts() {
        assert!(matches!(
            Identifier::new("", "1"),
            Err(Error::InvalidIdentifier(_))
        ));
        assert!(Identifier::new("bad type!", "1").is_err());
        assert!(Identifier::new("people", "").is_err());
        assert!(Identifier::from_parts("people", None, None).is_err());
    }

    #[test]
    fn test_unassigned_has_no_key() {
        let id = Identifier::unassigned("photos").unwrap();
        assert!(!id.is_assigned());
        assert!(id.key().is_none());
        assert!(ResourceIdentifier::new(id.clone()).is_err());
        let assigned = id.with_id("42").unwrap();
        assert_eq!(assigned.key(), Some(ResourceKey::id("photos", "42")));
    }

    #[test]
    fn test_display() {
        assert_eq!(Identifier::new("people", "9").unwrap().to_string(), "(people, 9)");
        assert_eq!(ResourceKey::lid("people", "a").to_string(), "(people, lid:a)");
    }
}
