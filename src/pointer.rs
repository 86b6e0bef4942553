//! JSON Pointers (RFC 6901) locating members in a document being validated.

use std::fmt;

/// A JSON Pointer built up one reference token at a time.
///
/// ```rust
/// use serde_jsonapi::Pointer;
///
/// let ptr = Pointer::root().push("data").push(0).push("attributes").push("a/b");
/// assert_eq!(ptr.as_str(), "/data/0/attributes/a~1b");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Pointer(String);

impl Pointer {
    /// The empty pointer, which refers to the whole document.
    #[must_use]
    pub const fn root() -> Self {
        Pointer(String::new())
    }

    /// Returns a new pointer extended by one reference token.
    ///
    /// `~` and `/` inside the token are escaped as `~0` and `~1`.
    #[must_use]
    pub fn push<T: fmt::Display>(&self, token: T) -> Self {
        let token = token.to_string();
        let mut out = String::with_capacity(self.0.len() + token.len() + 1);
        out.push_str(&self.0);
        out.push('/');
        for ch in token.chars() {
            match ch {
                '~' => out.push_str("~0"),
                '/' => out.push_str("~1"),
                c => out.push(c),
            }
        }
        Pointer(out)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Pointer> for String {
    fn from(ptr: Pointer) -> Self {
        ptr.0
    }
}

impl AsRef<str> for Pointer {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_empty() {
        assert!(Pointer::root().is_root());
        assert_eq!(Pointer::root().to_string(), "");
    }

    #[test]
    fn test_escapes_tilde_before_slash() {
        let ptr = Pointer::root().push("~/");
        assert_eq!(ptr.as_str(), "/~0~1");
    }

    #[test]
    fn test_push_does_not_mutate_parent() {
        let parent = Pointer::root().push("included");
        let child = parent.push(3);
        assert_eq!(parent.as_str(), "/included");
        assert_eq!(child.as_str(), "/included/3");
    }
}
