//! The `fields[TYPE]` and `include` query parameters.
//!
//! [`Fieldsets::from_query`] takes a raw query string and decodes it as
//! `application/x-www-form-urlencoded`. [`Fieldsets::from_pairs`] and
//! [`IncludePaths::parse`] take values the caller has already decoded.

use indexmap::IndexMap;
use url::form_urlencoded;

use crate::member;
use crate::resource::Resource;
use crate::{Error, Result};

/// Sparse fieldsets, one requested field list per resource type.
///
/// ```rust
/// use serde_jsonapi::{attributes, Fieldsets, Resource};
///
/// let fields = Fieldsets::from_query("fields[articles]=title&fields[people]=name").unwrap();
/// let article = Resource::builder("articles")
///     .id("1")
///     .attributes(attributes! { "title" => "A", "body" => "B" })
///     .build()
///     .unwrap();
///
/// let sparse = fields.apply(&article);
/// assert!(sparse.attribute("body").is_none());
/// assert_eq!(fields.get("people"), Some(&["name".to_string()][..]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fieldsets(IndexMap<String, Vec<String>>);

impl Fieldsets {
    #[must_use]
    pub fn new() -> Self {
        Fieldsets::default()
    }

    /// Requests `fields` for resources of `kind`. An empty list keeps only
    /// the identifier.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidQueryParameter`] if `kind` or a field is not a valid
    /// member name.
    pub fn insert<I, S>(&mut self, kind: impl Into<String>, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let kind = kind.into();
        let parameter = format!("fields[{kind}]");
        if !member::is_valid_member_name(&kind) {
            return Err(Error::InvalidQueryParameter {
                parameter,
                reason: format!("`{kind}` is not a valid resource type"),
            });
        }
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        if let Some(bad) = fields.iter().find(|f| !member::is_valid_member_name(f)) {
            return Err(Error::InvalidQueryParameter {
                parameter,
                reason: format!("`{bad}` is not a valid field name"),
            });
        }
        self.0.insert(kind, fields);
        Ok(())
    }

    /// Collects every `fields[TYPE]` pair, ignoring other parameters.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidQueryParameter`] for a malformed `fields` key or value.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut fieldsets = Fieldsets::new();
        for (key, value) in pairs {
            let key = key.as_ref();
            let Some(rest) = key.strip_prefix("fields") else {
                continue;
            };
            if !rest.is_empty() && !rest.starts_with('[') {
                continue;
            }
            let kind = rest
                .strip_prefix('[')
                .and_then(|r| r.strip_suffix(']'))
                .ok_or_else(|| Error::InvalidQueryParameter {
                    parameter: key.to_string(),
                    reason: "expected `fields[TYPE]`".to_string(),
                })?;
            let value = value.as_ref();
            let fields = value
                .split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty());
            fieldsets.insert(kind, fields)?;
        }
        Ok(fieldsets)
    }

    /// Parses a raw query string such as `fields[articles]=title,body`.
    ///
    /// A leading `?` is ignored; keys and values are percent-decoded, with
    /// `+` read as a space.
    pub fn from_query(query: &str) -> Result<Self> {
        Self::from_pairs(form_urlencoded::parse(query.trim_start_matches('?').as_bytes()))
    }

    /// The requested fields for `kind`, if the client restricted it.
    #[must_use]
    pub fn get(&self, kind: &str) -> Option<&[String]> {
        self.0.get(kind).map(Vec::as_slice)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reduces `resource` if its type has a fieldset, otherwise clones it.
    #[must_use]
    pub fn apply(&self, resource: &Resource) -> Resource {
        match self.get(resource.kind()) {
            Some(fields) => resource.sparse(fields),
            None => resource.clone(),
        }
    }
}

/// Relationship paths requested with `include`.
///
/// ```rust
/// use serde_jsonapi::IncludePaths;
///
/// let paths = IncludePaths::parse("author,comments.author").unwrap();
/// assert_eq!(paths.len(), 2);
/// assert!(paths.contains("comments.author"));
/// assert!(IncludePaths::parse("comments..author").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IncludePaths(Vec<Vec<String>>);

impl IncludePaths {
    #[must_use]
    pub fn new() -> Self {
        IncludePaths::default()
    }

    /// Parses the comma-separated value of the `include` parameter. An empty
    /// value requests nothing.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidQueryParameter`] if a path segment is empty or not a
    /// valid member name.
    pub fn parse(value: &str) -> Result<Self> {
        let mut paths = IncludePaths::new();
        for path in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            paths.push(path)?;
        }
        Ok(paths)
    }

    /// Adds one dotted path.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidQueryParameter`] for a malformed path.
    pub fn push(&mut self, path: &str) -> Result<()> {
        let segments: Vec<String> = path.split('.').map(str::to_string).collect();
        if let Some(bad) = segments.iter().find(|s| !member::is_valid_member_name(s)) {
            return Err(Error::InvalidQueryParameter {
                parameter: "include".to_string(),
                reason: format!("`{path}` has an invalid relationship name `{bad}`"),
            });
        }
        if !self.0.contains(&segments) {
            self.0.push(segments);
        }
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.0.iter().any(|segments| segments.join(".") == path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &[String]> {
        self.0.iter().map(Vec::as_slice)
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

impl std::fmt::Display for IncludePaths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, segments) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(&segments.join("."))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fieldsets_from_query() {
        let fields =
            Fieldsets::from_query("?include=author&fields[articles]=title,body&fields[people]=")
                .unwrap();
        assert_eq!(
            fields.get("articles"),
            Some(&["title".to_string(), "body".to_string()][..])
        );
        assert_eq!(fields.get("people"), Some(&[][..]));
        assert_eq!(fields.get("comments"), None);
    }

    #[test]
    fn test_fieldsets_from_encoded_query() {
        let fields =
            Fieldsets::from_query("fields%5Barticles%5D=title%2Cbody&fields%5Bpeople%5D=first+name")
                .unwrap();
        assert_eq!(
            fields.get("articles"),
            Some(&["title".to_string(), "body".to_string()][..])
        );
        assert_eq!(fields.get("people"), Some(&["first name".to_string()][..]));
    }

    #[test]
    fn test_malformed_fieldsets() {
        assert!(matches!(
            Fieldsets::from_query("fields=title"),
            Err(Error::InvalidQueryParameter { .. })
        ));
        assert!(Fieldsets::from_query("fields[articles]=ti.tle").is_err());
        assert!(Fieldsets::from_query("fields[bad type!]=a").is_err());
    }

    #[test]
    fn test_include_paths_dedup_and_render() {
        let mut paths = IncludePaths::parse("author, comments.author").unwrap();
        paths.push("author").unwrap();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths.to_string(), "author,comments.author");
        assert!(IncludePaths::parse("").unwrap().is_empty());
    }

    #[test]
    fn test_include_error_names_parameter() {
        let err = IncludePaths::parse("comments.").unwrap_err();
        let objects = err.error_objects();
        assert_eq!(
            objects[0].source.as_ref().and_then(|s| s.parameter.as_deref()),
            Some("include")
        );
    }
}
