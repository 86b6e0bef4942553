//! Error types for JSON:API validation, assembly and serialization.
//!
//! Errors fall into two groups:
//!
//! - **Structural errors** short-circuit immediately. A document that has
//!   both `data` and `errors`, or an empty `errors` array, has no meaningful
//!   per-field location, so the engine fails with the matching variant.
//! - **Field-level errors** are collected per validation [`Stage`] and
//!   surfaced together as [`Error::DocumentValidation`], each entry carrying a
//!   JSON Pointer to the offending member.
//!
//! Both groups render into a JSON:API error document, so the failure path and
//! the success path share one representation:
//!
//! ```rust
//! use serde_jsonapi::{parse, Error, ErrorKind};
//!
//! let err = parse(br#"{"data":{"type":"x","id":"1","attributes":{"id":"dup"}}}"#).unwrap_err();
//! assert!(err.has_kind(ErrorKind::ReservedFieldCollision));
//!
//! let response = err.to_document().unwrap();
//! assert_eq!(response.errors().map(|e| e.len()), Some(1));
//! ```

use std::fmt;
use thiserror::Error;

use crate::document::Document;
use crate::error_object::{ErrorObject, ErrorSource};

/// Every failure the crate can report.
///
/// Variants map one-to-one onto [`ErrorKind`] (see [`Error::kind`]).
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// A resource identifier is malformed or lacks both `id` and `lid`.
    #[error("invalid resource identifier: {0}")]
    InvalidIdentifier(String),

    /// An attribute or relationship name collides with a reserved or sibling field.
    #[error("field `{field}` collides with {collides_with}")]
    ReservedFieldCollision { field: String, collides_with: String },

    /// Relationship `data` has the wrong shape, or the relationship is empty.
    #[error("invalid relationship data: {0}")]
    InvalidRelationshipData(String),

    /// Both `data` and `errors` were supplied for one document.
    #[error("a document must not contain both `data` and `errors`")]
    MixedPrimaryContent,

    /// An error document was built from an empty error list.
    #[error("`errors` must contain at least one error object")]
    EmptyErrorList,

    /// Two full resource objects share one identifier in a compound document.
    #[error("resource {0} appears more than once in the compound document")]
    DuplicateIncludedResource(String),

    /// Aggregated field-level failures from one validation stage.
    #[error("document failed validation during {stage}:\n{0}", stage = .0.stage())]
    DocumentValidation(ValidationErrors),

    /// An error object was built with no members at all.
    #[error("an error object must carry at least one member")]
    EmptyErrorObject,

    /// A member name does not follow the JSON:API member-name grammar.
    #[error("invalid member name `{name}`: {reason}")]
    InvalidMemberName { name: String, reason: String },

    /// A link value is malformed or placed where it is not allowed.
    #[error("invalid link `{name}`: {reason}")]
    InvalidLink { name: String, reason: String },

    /// The top-level document shape is wrong.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// Strict mode rejected a top-level member outside the JSON:API set.
    #[error("unknown top-level member `{0}`")]
    UnknownTopLevelMember(String),

    /// The `jsonapi.version` member names an unsupported version.
    #[error("unsupported JSON:API version `{0}`, expected 1.0 or 1.1")]
    InvalidVersion(String),

    /// A `fields[...]` or `include` query parameter is malformed.
    #[error("invalid query parameter `{parameter}`: {reason}")]
    InvalidQueryParameter { parameter: String, reason: String },

    /// A `Content-Type` header is not an acceptable JSON:API media type.
    #[error("unsupported media type: {0}")]
    InvalidMediaType(String),

    /// An `Accept` header admits no JSON:API media type this server can produce.
    #[error("not acceptable: {0}")]
    NotAcceptable(String),

    /// The input is not well-formed JSON.
    #[error("JSON syntax error at line {line}, column {column}: {msg}")]
    Syntax {
        line: usize,
        column: usize,
        msg: String,
    },

    /// IO error during reading or writing.
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error raised through serde.
    #[error("{0}")]
    Custom(String),
}

/// Fieldless classification of every error and violation.
///
/// Some kinds (`InvalidAttribute`, `UnknownResourceType`, `UnknownMember`,
/// `UnresolvedInclusion`, `OrphanIncludedResource`) only ever appear inside
/// a [`ValidationErrors`] aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidIdentifier,
    ReservedFieldCollision,
    InvalidRelationshipData,
    MixedPrimaryContent,
    EmptyErrorList,
    DuplicateIncludedResource,
    DocumentValidation,
    EmptyErrorObject,
    InvalidMemberName,
    InvalidLink,
    InvalidDocument,
    UnknownTopLevelMember,
    InvalidVersion,
    InvalidQueryParameter,
    InvalidMediaType,
    NotAcceptable,
    InvalidAttribute,
    UnknownResourceType,
    UnknownMember,
    UnresolvedInclusion,
    OrphanIncludedResource,
    Syntax,
    Io,
    Custom,
}

impl ErrorKind {
    /// Stable machine-readable code, used as the error object's `code`.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidIdentifier => "invalid_identifier",
            ErrorKind::ReservedFieldCollision => "reserved_field_collision",
            ErrorKind::InvalidRelationshipData => "invalid_relationship_data",
            ErrorKind::MixedPrimaryContent => "mixed_primary_content",
            ErrorKind::EmptyErrorList => "empty_error_list",
            ErrorKind::DuplicateIncludedResource => "duplicate_included_resource",
            ErrorKind::DocumentValidation => "document_validation",
            ErrorKind::EmptyErrorObject => "empty_error_object",
            ErrorKind::InvalidMemberName => "invalid_member_name",
            ErrorKind::InvalidLink => "invalid_link",
            ErrorKind::InvalidDocument => "invalid_document",
            ErrorKind::UnknownTopLevelMember => "unknown_top_level_member",
            ErrorKind::InvalidVersion => "invalid_version",
            ErrorKind::InvalidQueryParameter => "invalid_query_parameter",
            ErrorKind::InvalidMediaType => "invalid_media_type",
            ErrorKind::NotAcceptable => "not_acceptable",
            ErrorKind::InvalidAttribute => "invalid_attribute",
            ErrorKind::UnknownResourceType => "unknown_resource_type",
            ErrorKind::UnknownMember => "unknown_member",
            ErrorKind::UnresolvedInclusion => "unresolved_inclusion",
            ErrorKind::OrphanIncludedResource => "orphan_included_resource",
            ErrorKind::Syntax => "syntax",
            ErrorKind::Io => "io",
            ErrorKind::Custom => "custom",
        }
    }

    /// Short human-readable summary, used as the error object's `title`.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            ErrorKind::InvalidIdentifier => "Invalid resource identifier",
            ErrorKind::ReservedFieldCollision => "Reserved field collision",
            ErrorKind::InvalidRelationshipData => "Invalid relationship data",
            ErrorKind::MixedPrimaryContent => "Mixed primary content",
            ErrorKind::EmptyErrorList => "Empty error list",
            ErrorKind::DuplicateIncludedResource => "Duplicate included resource",
            ErrorKind::DocumentValidation => "Document validation failed",
            ErrorKind::EmptyErrorObject => "Empty error object",
            ErrorKind::InvalidMemberName => "Invalid member name",
            ErrorKind::InvalidLink => "Invalid link",
            ErrorKind::InvalidDocument => "Invalid document",
            ErrorKind::UnknownTopLevelMember => "Unknown top-level member",
            ErrorKind::InvalidVersion => "Unsupported JSON:API version",
            ErrorKind::InvalidQueryParameter => "Invalid query parameter",
            ErrorKind::InvalidMediaType => "Unsupported media type",
            ErrorKind::NotAcceptable => "Not acceptable",
            ErrorKind::InvalidAttribute => "Invalid attribute",
            ErrorKind::UnknownResourceType => "Unknown resource type",
            ErrorKind::UnknownMember => "Unknown member",
            ErrorKind::UnresolvedInclusion => "Unresolved inclusion",
            ErrorKind::OrphanIncludedResource => "Orphan included resource",
            ErrorKind::Syntax => "Malformed JSON",
            ErrorKind::Io => "I/O failure",
            ErrorKind::Custom => "Error",
        }
    }

    /// HTTP status an embedding application should answer with.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            ErrorKind::InvalidMediaType => 415,
            ErrorKind::NotAcceptable => 406,
            ErrorKind::Io | ErrorKind::Custom => 500,
            _ => 400,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Ordered stages of the validation engine.
///
/// A stage runs only if every earlier stage produced zero violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    /// Top-level members and their shapes.
    TopLevel,
    /// Primary `data` resources: identity, attributes, links, meta.
    PrimaryData,
    /// Relationship objects and registry attribute schemas.
    Relationships,
    /// `included` resources and deduplication.
    Included,
    /// Include-path resolution and optional closure.
    CrossReference,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::TopLevel => "top-level shape check",
            Stage::PrimaryData => "primary data decode",
            Stage::Relationships => "relationship decode",
            Stage::Included => "included decode",
            Stage::CrossReference => "cross-reference resolution",
        })
    }
}

/// One field-level failure, located by a JSON Pointer (RFC 6901).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub kind: ErrorKind,
    pub pointer: String,
    pub detail: String,
}

impl Violation {
    pub fn new(kind: ErrorKind, pointer: impl Into<String>, detail: impl Into<String>) -> Self {
        Violation {
            kind,
            pointer: pointer.into(),
            detail: detail.into(),
        }
    }

    /// Renders this violation as a JSON:API error object.
    #[must_use]
    pub fn to_error_object(&self) -> ErrorObject {
        ErrorObject {
            status: Some(self.kind.status().to_string()),
            code: Some(self.kind.code().to_string()),
            title: Some(self.kind.title().to_string()),
            detail: Some(self.detail.clone()),
            source: Some(ErrorSource {
                pointer: Some(self.pointer.clone()),
                ..ErrorSource::default()
            }),
            ..ErrorObject::default()
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pointer.is_empty() {
            write!(f, "  (root): [{}] {}", self.kind, self.detail)
        } else {
            write!(f, "  {}: [{}] {}", self.pointer, self.kind, self.detail)
        }
    }
}

/// The ordered violations of the stage that stopped validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    stage: Stage,
    violations: Vec<Violation>,
}

impl ValidationErrors {
    pub(crate) fn new(stage: Stage, violations: Vec<Violation>) -> Self {
        ValidationErrors { stage, violations }
    }

    /// The stage whose violations are reported.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.violations.iter()
    }

    /// Returns `true` if any violation has the given kind.
    #[must_use]
    pub fn contains(&self, kind: ErrorKind) -> bool {
        self.violations.iter().any(|v| v.kind == kind)
    }

    /// Returns the first violation located at `pointer`.
    #[must_use]
    pub fn at(&self, pointer: &str) -> Option<&Violation> {
        self.violations.iter().find(|v| v.pointer == pointer)
    }

    /// Each violation as a JSON:API error object, in order.
    #[must_use]
    pub fn error_objects(&self) -> Vec<ErrorObject> {
        self.violations.iter().map(Violation::to_error_object).collect()
    }

    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}

impl Error {
    /// Classifies this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidIdentifier(_) => ErrorKind::InvalidIdentifier,
            Error::ReservedFieldCollision { .. } => ErrorKind::ReservedFieldCollision,
            Error::InvalidRelationshipData(_) => ErrorKind::InvalidRelationshipData,
            Error::MixedPrimaryContent => ErrorKind::MixedPrimaryContent,
            Error::EmptyErrorList => ErrorKind::EmptyErrorList,
            Error::DuplicateIncludedResource(_) => ErrorKind::DuplicateIncludedResource,
            Error::DocumentValidation(_) => ErrorKind::DocumentValidation,
            Error::EmptyErrorObject => ErrorKind::EmptyErrorObject,
            Error::InvalidMemberName { .. } => ErrorKind::InvalidMemberName,
            Error::InvalidLink { .. } => ErrorKind::InvalidLink,
            Error::InvalidDocument(_) => ErrorKind::InvalidDocument,
            Error::UnknownTopLevelMember(_) => ErrorKind::UnknownTopLevelMember,
            Error::InvalidVersion(_) => ErrorKind::InvalidVersion,
            Error::InvalidQueryParameter { .. } => ErrorKind::InvalidQueryParameter,
            Error::InvalidMediaType(_) => ErrorKind::InvalidMediaType,
            Error::NotAcceptable(_) => ErrorKind::NotAcceptable,
            Error::Syntax { .. } => ErrorKind::Syntax,
            Error::Io(_) => ErrorKind::Io,
            Error::Custom(_) => ErrorKind::Custom,
        }
    }

    /// Returns `true` if this error is, or aggregates, a failure of `kind`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_jsonapi::{parse, ErrorKind};
    ///
    /// let err = parse(br#"{"errors":[]}"#).unwrap_err();
    /// assert!(err.has_kind(ErrorKind::EmptyErrorList));
    /// ```
    #[must_use]
    pub fn has_kind(&self, kind: ErrorKind) -> bool {
        match self {
            Error::DocumentValidation(errors) => {
                kind == ErrorKind::DocumentValidation || errors.contains(kind)
            }
            other => other.kind() == kind,
        }
    }

    /// The aggregated violations, if this is a [`Error::DocumentValidation`].
    #[must_use]
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Error::DocumentValidation(errors) => Some(errors),
            _ => None,
        }
    }

    /// Renders this error as JSON:API error objects.
    #[must_use]
    pub fn error_objects(&self) -> Vec<ErrorObject> {
        if let Error::DocumentValidation(errors) = self {
            return errors.error_objects();
        }
        let kind = self.kind();
        let parameter = match self {
            Error::InvalidQueryParameter { parameter, .. } => Some(parameter.clone()),
            _ => None,
        };
        let header = match kind {
            ErrorKind::InvalidMediaType => Some("Content-Type".to_string()),
            ErrorKind::NotAcceptable => Some("Accept".to_string()),
            _ => None,
        };
        let source = (parameter.is_some() || header.is_some()).then(|| ErrorSource {
            pointer: None,
            parameter,
            header,
        });
        vec![ErrorObject {
            status: Some(kind.status().to_string()),
            code: Some(kind.code().to_string()),
            title: Some(kind.title().to_string()),
            detail: Some(self.to_string()),
            source,
            ..ErrorObject::default()
        }]
    }

    /// Builds the JSON:API error document an embedding application would
    /// answer with.
    ///
    /// # Errors
    ///
    /// Fails only if the rendered error objects cannot form an error
    /// document, which does not happen for errors produced by this crate.
    pub fn to_document(&self) -> Result<Document> {
        Document::with_errors(self.error_objects(), None, None)
    }

    pub(crate) fn syntax(line: usize, column: usize, msg: &str) -> Self {
        Error::Syntax {
            line,
            column,
            msg: msg.to_string(),
        }
    }

    pub(crate) fn collision(field: &str, collides_with: &str) -> Self {
        Error::ReservedFieldCollision {
            field: field.to_string(),
            collides_with: collides_with.to_string(),
        }
    }

    pub(crate) fn link(name: &str, reason: &str) -> Self {
        Error::InvalidLink {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            serde_json::error::Category::Io => Error::io(&err.to_string()),
            _ => Error::syntax(err.line(), err.column(), &err.to_string()),
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_renders_error_object_with_pointer() {
        let v = Violation::new(
            ErrorKind::ReservedFieldCollision,
            "/data/attributes/id",
            "attribute `id` is reserved",
        );
        let object = v.to_error_object();
        assert_eq!(object.status.as_deref(), Some("400"));
        assert_eq!(object.code.as_deref(), Some("reserved_field_collision"));
        assert_eq!(
            object.source.and_then(|s| s.pointer).as_deref(),
            Some("/data/attributes/id")
        );
    }

    #[test]
    fn test_validation_errors_display_lists_every_violation() {
        let errors = ValidationErrors::new(
            Stage::PrimaryData,
            vec![
                Violation::new(ErrorKind::InvalidIdentifier, "", "missing id"),
                Violation::new(ErrorKind::InvalidMemberName, "/data/type", "bad type"),
            ],
        );
        let text = Error::DocumentValidation(errors).to_string();
        assert!(text.contains("primary data decode"));
        assert!(text.contains("(root)"));
        assert!(text.contains("/data/type"));
    }

    #[test]
    fn test_has_kind_looks_inside_aggregates() {
        let err = Error::DocumentValidation(ValidationErrors::new(
            Stage::Included,
            vec![Violation::new(
                ErrorKind::DuplicateIncludedResource,
                "/included/1",
                "duplicate",
            )],
        ));
        assert!(err.has_kind(ErrorKind::DuplicateIncludedResource));
        assert!(err.has_kind(ErrorKind::DocumentValidation));
        assert!(!err.has_kind(ErrorKind::InvalidLink));
    }

    #[test]
    fn test_media_type_errors_carry_header_source_and_status() {
        let objects = Error::InvalidMediaType("text/html".into()).error_objects();
        assert_eq!(objects[0].status.as_deref(), Some("415"));
        assert_eq!(
            objects[0].source.as_ref().and_then(|s| s.header.as_deref()),
            Some("Content-Type")
        );
    }

    #[test]
    fn test_to_document_builds_error_document() {
        let doc = Error::EmptyErrorList.to_document().unwrap();
        let errors = doc.errors().unwrap();
        assert_eq!(errors[0].code.as_deref(), Some("empty_error_list"));
    }
}
