//! The top-level `jsonapi` object describing the server's implementation.

use std::fmt;
use std::str::FromStr;

use crate::map::Meta;
use crate::media_type::is_absolute_uri;
use crate::{Error, Result};

/// A supported JSON:API version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Version {
    V1_0,
    #[default]
    V1_1,
}

impl Version {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Version::V1_0 => "1.0",
            Version::V1_1 => "1.1",
        }
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "1.0" => Ok(Version::V1_0),
            "1.1" => Ok(Version::V1_1),
            other => Err(Error::InvalidVersion(other.to_string())),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `jsonapi` member of a top-level document.
///
/// ```rust
/// use serde_jsonapi::{JsonApiObject, Version};
///
/// let object = JsonApiObject::new(Version::V1_1)
///     .with_ext("https://jsonapi.org/ext/atomic")
///     .unwrap();
/// assert_eq!(object.ext, vec!["https://jsonapi.org/ext/atomic"]);
///
/// assert!(JsonApiObject::new(Version::V1_1).with_profile("not a uri").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JsonApiObject {
    /// `None` when the member was omitted, which implies 1.0.
    pub version: Option<Version>,
    /// Applied extensions, as absolute URIs.
    pub ext: Vec<String>,
    /// Applied profiles, as absolute URIs.
    pub profile: Vec<String>,
    pub meta: Option<Meta>,
}

impl JsonApiObject {
    #[must_use]
    pub fn new(version: Version) -> Self {
        JsonApiObject {
            version: Some(version),
            ..JsonApiObject::default()
        }
    }

    /// # Errors
    ///
    /// [`Error::InvalidLink`] if `uri` is not absolute.
    pub fn with_ext(mut self, uri: impl Into<String>) -> Result<Self> {
        let uri = uri.into();
        check_absolute("ext", &uri)?;
        self.ext.push(uri);
        Ok(self)
    }

    /// # Errors
    ///
    /// [`Error::InvalidLink`] if `uri` is not absolute.
    pub fn with_profile(mut self, uri: impl Into<String>) -> Result<Self> {
        let uri = uri.into();
        check_absolute("profile", &uri)?;
        self.profile.push(uri);
        Ok(self)
    }

    #[must_use]
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }

    /// The version in effect: 1.0 when unspecified.
    #[must_use]
    pub fn effective_version(&self) -> Version {
        self.version.unwrap_or(Version::V1_0)
    }
}

pub(crate) fn check_absolute(member: &str, uri: &str) -> Result<()> {
    if is_absolute_uri(uri) {
        Ok(())
    } else {
        Err(Error::link(member, &format!("`{uri}` is not an absolute URI")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parsing() {
        assert_eq!("1.0".parse::<Version>().unwrap(), Version::V1_0);
        assert_eq!("1.1".parse::<Version>().unwrap(), Version::V1_1);
        assert!(matches!(
            "2.0".parse::<Version>(),
            Err(Error::InvalidVersion(v)) if v == "2.0"
        ));
    }

    #[test]
    fn test_missing_version_means_1_0() {
        assert_eq!(JsonApiObject::default().effective_version(), Version::V1_0);
        assert_eq!(JsonApiObject::new(Version::V1_1).effective_version(), Version::V1_1);
    }

    #[test]
    fn test_urn_extensions_are_absolute() {
        let object = JsonApiObject::new(Version::V1_1)
            .with_ext("urn:ietf:params:jsonapi:ext")
            .unwrap();
        assert_eq!(object.ext, vec!["urn:ietf:params:jsonapi:ext"]);
        assert!(JsonApiObject::new(Version::V1_1).with_ext("/ext").is_err());
    }
}
