//! The JSON:API media type and content negotiation.
//!
//! JSON:API uses `application/vnd.api+json` with two optional parameters,
//! `ext` and `profile`, each a space-separated list of absolute URIs. Any
//! other parameter makes the media type unacceptable.
//!
//! ```rust
//! use serde_jsonapi::{MediaType, Negotiator};
//!
//! let negotiator = Negotiator::new().with_extension("https://jsonapi.org/ext/atomic");
//!
//! negotiator
//!     .check_content_type(r#"application/vnd.api+json; ext="https://jsonapi.org/ext/atomic""#)
//!     .unwrap();
//! assert!(negotiator.check_content_type("application/json").is_err());
//!
//! let chosen = negotiator
//!     .check_accept("text/html, application/vnd.api+json; q=0.9")
//!     .unwrap();
//! assert_eq!(chosen, MediaType::new());
//! assert_eq!(Negotiator::VARY, "Accept");
//! ```

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::{Error, Result};

/// `application/vnd.api+json`
pub const MEDIA_TYPE: &str = "application/vnd.api+json";

const ALLOWED_PARAMS: [&str; 2] = ["ext", "profile"];

/// Returns `true` for an absolute URI: a scheme followed by a valid
/// hierarchical or opaque part, such as `https://example.com/ext` or
/// `urn:ietf:params:jsonapi:ext`.
#[must_use]
pub fn is_absolute_uri(uri: &str) -> bool {
    !uri.chars().any(|c| c.is_whitespace() || c.is_control()) && Url::parse(uri).is_ok()
}

/// A JSON:API media type with its `ext` and `profile` parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MediaType {
    pub ext: Vec<String>,
    pub profile: Vec<String>,
}

/// One parsed parameter list: allowed parameters, plus whether any other
/// parameter (besides `q` in an `Accept` range) was present.
struct Params {
    ext: Vec<String>,
    profile: Vec<String>,
    disallowed: Option<String>,
    quality: f32,
}

fn split_params<'a>(parts: impl Iterator<Item = &'a str>, in_accept: bool) -> Result<Params> {
    let mut params = Params {
        ext: Vec::new(),
        profile: Vec::new(),
        disallowed: None,
        quality: 1.0,
    };
    for part in parts.map(str::trim).filter(|p| !p.is_empty()) {
        let Some((key, value)) = part.split_once('=') else {
            if in_accept {
                continue;
            }
            return Err(Error::InvalidMediaType(format!(
                "invalid parameter format `{part}`"
            )));
        };
        let key = key.trim().to_ascii_lowercase();
        let value = value.trim().trim_matches('"');
        match key.as_str() {
            "q" if in_accept => {
                if let Ok(q) = value.parse::<f32>() {
                    params.quality = q;
                }
            }
            "ext" => params.ext = value.split_whitespace().map(str::to_string).collect(),
            "profile" => params.profile = value.split_whitespace().map(str::to_string).collect(),
            _ => {
                params.disallowed.get_or_insert(key);
            }
        }
    }
    Ok(params)
}

impl MediaType {
    /// The bare media type without parameters.
    #[must_use]
    pub fn new() -> Self {
        MediaType::default()
    }

    /// # Errors
    ///
    /// [`Error::InvalidMediaType`] if `uri` is not absolute.
    pub fn with_ext(mut self, uri: impl Into<String>) -> Result<Self> {
        let uri = uri.into();
        if !is_absolute_uri(&uri) {
            return Err(Error::InvalidMediaType(format!("invalid URI in `ext`: `{uri}`")));
        }
        self.ext.push(uri);
        Ok(self)
    }

    /// # Errors
    ///
    /// [`Error::InvalidMediaType`] if `uri` is not absolute.
    pub fn with_profile(mut self, uri: impl Into<String>) -> Result<Self> {
        let uri = uri.into();
        if !is_absolute_uri(&uri) {
            return Err(Error::InvalidMediaType(format!(
                "invalid URI in `profile`: `{uri}`"
            )));
        }
        self.profile.push(uri);
        Ok(self)
    }

    /// Parses a `Content-Type` style value.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidMediaType`] for an empty value, another media type,
    /// a parameter other than `ext`/`profile`, or a non-absolute URI.
    pub fn parse(value: &str) -> Result<Self> {
        let mut parts = value.split(';');
        let essence = parts.next().map(str::trim).unwrap_or_default();
        if essence.is_empty() {
            return Err(Error::InvalidMediaType("header is empty".to_string()));
        }
        if !essence.eq_ignore_ascii_case(MEDIA_TYPE) {
            return Err(Error::InvalidMediaType(format!(
                "invalid media type `{essence}`, expected `{MEDIA_TYPE}`"
            )));
        }
        let params = split_params(parts, false)?;
        if let Some(key) = params.disallowed {
            return Err(Error::InvalidMediaType(format!(
                "invalid parameter `{key}`, only {} are allowed",
                ALLOWED_PARAMS.map(|p| format!("`{p}`")).join(" and ")
            )));
        }
        let mut media_type = MediaType::new();
        for uri in params.ext {
            media_type = media_type.with_ext(uri)?;
        }
        for uri in params.profile {
            media_type = media_type.with_profile(uri)?;
        }
        Ok(media_type)
    }
}

impl FromStr for MediaType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        MediaType::parse(s)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(MEDIA_TYPE)?;
        if !self.ext.is_empty() {
            write!(f, "; ext=\"{}\"", self.ext.join(" "))?;
        }
        if !self.profile.is_empty() {
            write!(f, "; profile=\"{}\"", self.profile.join(" "))?;
        }
        Ok(())
    }
}

/// Server-side content negotiation.
#[derive(Debug, Clone, Default)]
pub struct Negotiator {
    supported_ext: Vec<String>,
}

impl Negotiator {
    /// Value for the `Vary` response header.
    pub const VARY: &'static str = "Accept";

    /// A negotiator that supports no extensions.
    #[must_use]
    pub fn new() -> Self {
        Negotiator::default()
    }

    #[must_use]
    pub fn with_extension(mut self, uri: impl Into<String>) -> Self {
        self.supported_ext.push(uri.into());
        self
    }

    #[must_use]
    pub fn supported_extensions(&self) -> &[String] {
        &self.supported_ext
    }

    fn supports_all(&self, ext: &[String]) -> bool {
        ext.iter().all(|uri| self.supported_ext.contains(uri))
    }

    /// Validates a request `Content-Type` header.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidMediaType`] (HTTP 415) if the value is not a valid
    /// JSON:API media type or names an unsupported extension.
    pub fn check_content_type(&self, header: &str) -> Result<MediaType> {
        let media_type = MediaType::parse(header)?;
        if let Some(uri) = media_type.ext.iter().find(|uri| !self.supported_ext.contains(uri)) {
            return Err(Error::InvalidMediaType(format!(
                "unsupported extension `{uri}`"
            )));
        }
        Ok(media_type)
    }

    /// Picks the preferred acceptable JSON:API media type from an `Accept`
    /// header.
    ///
    /// Ranges are tried in descending `q` order. JSON:API ranges carrying
    /// parameters other than `ext`/`profile` are ignored, as are ranges with
    /// `q=0`. `*/*` and `application/*` count as the bare media type.
    ///
    /// # Errors
    ///
    /// [`Error::NotAcceptable`] (HTTP 406) if no JSON:API range remains, or
    /// if every remaining range asks for an unsupported extension.
    pub fn check_accept(&self, header: &str) -> Result<MediaType> {
        let mut candidates = Vec::new();
        for range in header.split(',').map(str::trim).filter(|r| !r.is_empty()) {
            let mut parts = range.split(';');
            let essence = parts.next().map(str::trim).unwrap_or_default();
            let is_wildcard = essence == "*/*" || essence.eq_ignore_ascii_case("application/*");
            if !is_wildcard && !essence.eq_ignore_ascii_case(MEDIA_TYPE) {
                continue;
            }
            let params = split_params(parts, true)?;
            if params.disallowed.is_some() || params.quality <= 0.0 {
                continue;
            }
            let media_type = if is_wildcard {
                MediaType::new()
            } else {
                MediaType {
                    ext: params.ext,
                    profile: params.profile,
                }
            };
            candidates.push((params.quality, media_type));
        }
        if candidates.is_empty() {
            return Err(Error::NotAcceptable(
                "no acceptable media types found in Accept header".to_string(),
            ));
        }
        // Stable, so equal weights keep header order.
        candidates.sort_by(|a, b| b.0.total_cmp(&a.0));
        candidates
            .into_iter()
            .map(|(_, media_type)| media_type)
            .find(|media_type| self.supports_all(&media_type.ext))
            .ok_or_else(|| {
                Error::NotAcceptable(
                    "no acceptable media types found due to unsupported extensions".to_string(),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXT: &str = "https://example.com/ext1";

    #[test]
    fn test_absolute_uris() {
        assert!(is_absolute_uri("https://example.com"));
        assert!(is_absolute_uri("urn+x://host/path?q#f"));
        assert!(!is_absolute_uri("/relative"));
        assert!(!is_absolute_uri("https://"));
        assert!(!is_absolute_uri("not-a-valid-uri"));
        assert!(!is_absolute_uri("1http://example.com"));
        assert!(!is_absolute_uri("https://exa mple.com"));
    }

    #[test]
    fn test_opaque_absolute_uris() {
        assert!(is_absolute_uri("urn:ietf:params:jsonapi:ext"));
        assert!(is_absolute_uri("tag:example.com,2024:ext"));

        let media_type: MediaType = r#"application/vnd.api+json; ext="urn:example:ext""#
            .parse()
            .unwrap();
        assert_eq!(media_type.ext, vec!["urn:example:ext"]);
    }

    #[test]
    fn test_parse_and_render() {
        let media_type: MediaType =
            format!(r#"application/vnd.api+json; profile="{EXT}"; ext="{EXT}""#)
                .parse()
                .unwrap();
        assert_eq!(media_type.ext, vec![EXT]);
        assert_eq!(
            media_type.to_string(),
            format!(r#"application/vnd.api+json; ext="{EXT}"; profile="{EXT}""#)
        );
    }

    #[test]
    fn test_content_type_rejections() {
        let negotiator = Negotiator::new().with_extension(EXT);
        for bad in [
            "",
            "application/json",
            r#"application/vnd.api+json; charset="utf-8""#,
            "application/vnd.api+json; ext",
            r#"application/vnd.api+json; ext="not-a-uri""#,
            r#"application/vnd.api+json; ext="https://unsupported.com/ext""#,
        ] {
            let err = negotiator.check_content_type(bad).unwrap_err();
            assert!(matches!(err, Error::InvalidMediaType(_)), "{bad}");
        }
        assert!(negotiator.check_content_type(MEDIA_TYPE).is_ok());
    }

    #[test]
    fn test_accept_prefers_supported_range() {
        let negotiator = Negotiator::new().with_extension(EXT);
        let header = format!(
            r#"application/vnd.api+json; ext="https://unsupported.com/ext", application/vnd.api+json; ext="{EXT}"; q=0.5"#
        );
        assert_eq!(negotiator.check_accept(&header).unwrap().ext, vec![EXT]);

        let header = format!(
            r#"application/vnd.api+json; unknown="value", application/vnd.api+json; ext="{EXT}""#
        );
        assert!(negotiator.check_accept(&header).is_ok());
    }

    #[test]
    fn test_accept_failures() {
        let negotiator = Negotiator::new().with_extension(EXT);
        let none = negotiator.check_accept("text/html, application/json").unwrap_err();
        assert!(none.to_string().contains("no acceptable media types found in Accept"));

        let unsupported = negotiator
            .check_accept(&format!(
                r#"application/vnd.api+json; ext="{EXT} https://unsupported.com/ext""#
            ))
            .unwrap_err();
        assert!(matches!(unsupported, Error::NotAcceptable(_)));
        assert!(unsupported.to_string().contains("unsupported extensions"));

        assert!(Negotiator::new()
            .check_accept(r#"application/vnd.api+json; unknown="value""#)
            .is_err());
        assert!(Negotiator::new().check_accept("application/vnd.api+json; q=0").is_err());
    }

    #[test]
    fn test_wildcard_accepts_bare_media_type() {
        assert_eq!(Negotiator::new().check_accept("*/*").unwrap(), MediaType::new());
    }
}
