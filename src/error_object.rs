//! JSON:API error objects.
//!
//! Every member is optional. The builder refuses to produce an object with
//! no members at all, since such an object tells the client nothing; use
//! [`ErrorObjectBuilder::build_lenient`] to opt out.

use crate::links::Links;
use crate::map::Meta;
use crate::{Error, Result};

/// Locates the cause of an error in the request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorSource {
    /// JSON Pointer to the offending member of the request document.
    pub pointer: Option<String>,
    /// Name of the offending query parameter.
    pub parameter: Option<String>,
    /// Name of the offending request header.
    pub header: Option<String>,
}

impl ErrorSource {
    pub fn pointer(pointer: impl Into<String>) -> Self {
        ErrorSource {
            pointer: Some(pointer.into()),
            ..ErrorSource::default()
        }
    }

    pub fn parameter(parameter: impl Into<String>) -> Self {
        ErrorSource {
            parameter: Some(parameter.into()),
            ..ErrorSource::default()
        }
    }

    pub fn header(header: impl Into<String>) -> Self {
        ErrorSource {
            header: Some(header.into()),
            ..ErrorSource::default()
        }
    }
}

/// A JSON:API error object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ErrorObject {
    pub id: Option<String>,
    pub links: Option<Links>,
    /// HTTP status code, as a string.
    pub status: Option<String>,
    /// Application-specific error code.
    pub code: Option<String>,
    pub title: Option<String>,
    pub detail: Option<String>,
    pub source: Option<ErrorSource>,
    pub meta: Option<Meta>,
}

impl ErrorObject {
    /// ```rust
    /// use serde_jsonapi::ErrorObject;
    ///
    /// let error = ErrorObject::builder()
    ///     .status(422)
    ///     .title("Invalid Attribute")
    ///     .detail("First name must contain at least two characters.")
    ///     .pointer("/data/attributes/firstName")
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(error.status.as_deref(), Some("422"));
    ///
    /// assert!(ErrorObject::builder().build().is_err());
    /// ```
    pub fn builder() -> ErrorObjectBuilder {
        ErrorObjectBuilder::default()
    }

    /// Returns `true` if every member is absent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &ErrorObject::default()
    }
}

/// Builder for [`ErrorObject`].
#[derive(Debug, Clone, Default)]
pub struct ErrorObjectBuilder {
    inner: ErrorObject,
}

impl ErrorObjectBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.inner.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn links(mut self, links: Links) -> Self {
        self.inner.links = Some(links);
        self
    }

    #[must_use]
    pub fn status(mut self, status: u16) -> Self {
        self.inner.status = Some(status.to_string());
        self
    }

    #[must_use]
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.inner.code = Some(code.into());
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.inner.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.inner.detail = Some(detail.into());
        self
    }

    #[must_use]
    pub fn source(mut self, source: ErrorSource) -> Self {
        self.inner.source = Some(source);
        self
    }

    /// Shorthand for a `source` holding only a JSON Pointer.
    #[must_use]
    pub fn pointer(self, pointer: impl Into<String>) -> Self {
        self.source(ErrorSource::pointer(pointer))
    }

    #[must_use]
    pub fn meta(mut self, meta: Meta) -> Self {
        self.inner.meta = Some(meta);
        self
    }

    /// # Errors
    ///
    /// [`Error::EmptyErrorObject`] if no member was set, or
    /// [`Error::InvalidLink`] for malformed links.
    pub fn build(self) -> Result<ErrorObject> {
        if self.inner.is_empty() {
            return Err(Error::EmptyErrorObject);
        }
        self.build_lenient()
    }

    /// Builds without the non-empty check.
    pub fn build_lenient(self) -> Result<ErrorObject> {
        if let Some(links) = &self.inner.links {
            links.check_values()?;
        }
        Ok(self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_builder_is_rejected() {
        assert!(matches!(
            ErrorObject::builder().build(),
            Err(Error::EmptyErrorObject)
        ));
        let lenient = ErrorObject::builder().build_lenient().unwrap();
        assert!(lenient.is_empty());
    }

    #[test]
    fn test_meta_alone_is_enough() {
        let error = ErrorObject::builder()
            .meta(crate::meta! { "trace" => "abc" })
            .build()
            .unwrap();
        assert!(!error.is_empty());
    }

    #[test]
    fn test_sources() {
        assert_eq!(
            ErrorSource::parameter("include").parameter.as_deref(),
            Some("include")
        );
        assert_eq!(ErrorSource::header("Accept").pointer, None);
    }
}
