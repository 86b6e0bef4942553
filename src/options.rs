//! Configuration shared by parsing and document assembly.
//!
//! - [`Options`]: the rule switches
//! - [`PrimaryShape`]: what the endpoint expects primary `data` to be
//!
//! ## Examples
//!
//! ```rust
//! use serde_jsonapi::{parse_with_options, IncludePaths, Options, PrimaryShape};
//!
//! let options = Options::strict()
//!     .with_primary_shape(PrimaryShape::Single)
//!     .with_include_paths(IncludePaths::parse("author").unwrap());
//!
//! let err = parse_with_options(br#"{"data":[]}"#, &options).unwrap_err();
//! assert!(err.to_string().contains("single resource"));
//! ```

use crate::query::IncludePaths;

/// The shape primary `data` must take, as fixed by the endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PrimaryShape {
    /// A single resource or `null`, or an array of resources.
    #[default]
    Any,
    /// A single resource object or `null`.
    Single,
    /// An array of resource objects.
    Collection,
}

impl PrimaryShape {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            PrimaryShape::Any => "a resource, null or an array of resources",
            PrimaryShape::Single => "a single resource or null",
            PrimaryShape::Collection => "an array of resources",
        }
    }
}

/// Validation options.
///
/// # Examples
///
/// ```rust
/// use serde_jsonapi::Options;
///
/// let options = Options::new();
/// assert!(!options.strict_top_level);
/// assert!(options.validate_pagination_links);
///
/// let options = Options::new().with_strict_top_level(true).with_full_closure(true);
/// assert!(options.require_full_closure);
/// ```
#[derive(Clone, Debug)]
pub struct Options {
    /// Reject top-level members outside the JSON:API set instead of
    /// preserving them.
    pub strict_top_level: bool,
    /// Require every included resource to be reachable from primary data.
    pub require_full_closure: bool,
    /// Only allow `first`/`last`/`prev`/`next` links on collections. Applies
    /// to parsing and to [`DocumentBuilder::build`](crate::DocumentBuilder::build).
    pub validate_pagination_links: bool,
    /// Treat an error object with no members as a violation.
    pub reject_empty_error_objects: bool,
    /// Accept primary resources with neither `id` nor `lid`.
    pub allow_unassigned_ids: bool,
    /// With a registry attached, reject types the registry does not know.
    pub require_registered_types: bool,
    pub primary_shape: PrimaryShape,
    /// Requested `include` paths. Linkage along these paths must resolve.
    pub include_paths: IncludePaths,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            strict_top_level: false,
            require_full_closure: false,
            validate_pagination_links: true,
            reject_empty_error_objects: true,
            allow_unassigned_ids: false,
            require_registered_types: false,
            primary_shape: PrimaryShape::Any,
            include_paths: IncludePaths::new(),
        }
    }
}

impl Options {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects unknown top-level members, orphan included resources and
    /// unregistered types.
    #[must_use]
    pub fn strict() -> Self {
        Options {
            strict_top_level: true,
            require_full_closure: true,
            require_registered_types: true,
            ..Default::default()
        }
    }

    /// For client creation requests: a single primary resource that may
    /// lack an `id`.
    ///
    /// ```rust
    /// use serde_jsonapi::{Engine, Options};
    ///
    /// let engine = Engine::with_options(Options::creation());
    /// let doc = engine
    ///     .parse_str(r#"{"data":{"type":"photos","attributes":{"title":"Ember Hamster"}}}"#)
    ///     .unwrap();
    /// assert!(!doc.data().unwrap().single().unwrap().identifier().is_assigned());
    /// ```
    #[must_use]
    pub fn creation() -> Self {
        Options {
            allow_unassigned_ids: true,
            primary_shape: PrimaryShape::Single,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_strict_top_level(mut self, strict: bool) -> Self {
        self.strict_top_level = strict;
        self
    }

    #[must_use]
    pub fn with_full_closure(mut self, require: bool) -> Self {
        self.require_full_closure = require;
        self
    }

    #[must_use]
    pub fn with_pagination_links(mut self, validate: bool) -> Self {
        self.validate_pagination_links = validate;
        self
    }

    #[must_use]
    pub fn with_empty_error_objects(mut self, reject: bool) -> Self {
        self.reject_empty_error_objects = reject;
        self
    }

    #[must_use]
    pub fn with_unassigned_ids(mut self, allow: bool) -> Self {
        self.allow_unassigned_ids = allow;
        self
    }

    #[must_use]
    pub fn with_registered_types(mut self, require: bool) -> Self {
        self.require_registered_types = require;
        self
    }

    #[must_use]
    pub fn with_primary_shape(mut self, shape: PrimaryShape) -> Self {
        self.primary_shape = shape;
        self
    }

    #[must_use]
    pub fn with_include_paths(mut self, paths: IncludePaths) -> Self {
        self.include_paths = paths;
        self
    }
}
