//! JSON:API member-name grammar.
//!
//! Member names are the keys of every object in a document (attribute and
//! relationship names, meta keys, link names) and resource `type` values.
//!
//! - Globally allowed: `a-z`, `A-Z`, `0-9` and any character U+0080 or above.
//! - Allowed only between globally allowed characters: `-`, `_`, space.
//! - `@`-members: `@` followed by a valid name. Implementations ignore them.
//! - Extension members: `namespace:name`, where the namespace is alphanumeric.
//!
//! ```rust
//! use serde_jsonapi::member::{classify, is_valid_member_name, MemberKind};
//!
//! assert!(is_valid_member_name("first-name"));
//! assert!(!is_valid_member_name("-leading"));
//! assert_eq!(classify("@context"), Some(MemberKind::At));
//! assert_eq!(classify("atomic:operations"), Some(MemberKind::Extension));
//! ```

use crate::{Error, Result};

/// Names that resources reserve for identification and structure.
///
/// An attribute or relationship must not use any of them.
pub const RESERVED_FIELD_NAMES: [&str; 5] = ["type", "id", "lid", "links", "relationships"];

/// The grammatical class of a member name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    /// An ordinary member name.
    Plain,
    /// An `@`-member, ignored by JSON:API processors.
    At,
    /// An extension member, `namespace:name`.
    Extension,
}

#[inline]
fn is_globally_allowed(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch as u32 >= 0x80
}

#[inline]
fn is_internal_only(ch: char) -> bool {
    matches!(ch, '-' | '_' | ' ')
}

fn plain_name_error(name: &str) -> Option<&'static str> {
    let mut chars = name.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return Some("member names must contain at least one character"),
    };
    if !is_globally_allowed(first) {
        return Some("member names must start with a letter, digit or non-ASCII character");
    }
    let last = name.chars().next_back().unwrap_or(first);
    if !is_globally_allowed(last) {
        return Some("member names must end with a letter, digit or non-ASCII character");
    }
    if name
        .chars()
        .any(|c| !is_globally_allowed(c) && !is_internal_only(c))
    {
        return Some("member names may only contain letters, digits, `-`, `_` and spaces");
    }
    None
}

/// Classifies `name`, or returns `None` if it is not a valid member name of
/// any kind.
#[must_use]
pub fn classify(name: &str) -> Option<MemberKind> {
    if let Some(rest) = name.strip_prefix('@') {
        return plain_name_error(rest).is_none().then_some(MemberKind::At);
    }
    if let Some((namespace, member)) = name.split_once(':') {
        let namespace_ok =
            !namespace.is_empty() && namespace.chars().all(|c| c.is_ascii_alphanumeric());
        return (namespace_ok && plain_name_error(member).is_none())
            .then_some(MemberKind::Extension);
    }
    plain_name_error(name).is_none().then_some(MemberKind::Plain)
}

/// Returns `true` if `name` is a valid plain member name.
#[must_use]
pub fn is_valid_member_name(name: &str) -> bool {
    plain_name_error(name).is_none()
}

/// Checks that `name` is a valid plain member name.
///
/// # Errors
///
/// Returns [`Error::InvalidMemberName`] describing the first rule broken.
pub fn validate_member_name(name: &str) -> Result<()> {
    match plain_name_error(name) {
        None => Ok(()),
        Some(reason) => Err(Error::InvalidMemberName {
            name: name.to_string(),
            reason: reason.to_string(),
        }),
    }
}

/// Checks the keys of an object that admits every kind of member name,
/// such as `meta`.
///
/// # Errors
///
/// Returns [`Error::InvalidMemberName`] for the first malformed key.
pub fn validate_member_names<'a, I>(names: I) -> Result<()>
where
    I: IntoIterator<Item = &'a String>,
{
    for name in names {
        if classify(name).is_none() {
            validate_member_name(name)?;
        }
    }
    Ok(())
}

/// Returns `true` if `name` is reserved for resource identification.
#[must_use]
pub fn is_reserved_field(name: &str) -> bool {
    RESERVED_FIELD_NAMES.contains(&name)
}
