//! Ordered map type for attributes and meta objects.
//!
//! [`JsonMap`] wraps an [`IndexMap`] so that members keep the order they were
//! inserted or parsed in. Serialized documents therefore list attributes and
//! meta members in a stable, predictable order, which keeps diffs and golden
//! tests readable. Equality ignores order, matching JSON object semantics.
//!
//! ## Examples
//!
//! ```rust
//! use serde_jsonapi::JsonMap;
//! use serde_json::json;
//!
//! let mut map = JsonMap::new();
//! map.insert("title".to_string(), json!("JSON:API paints my bikeshed!"));
//! map.insert("pages".to_string(), json!(12));
//!
//! let keys: Vec<_> = map.keys().cloned().collect();
//! assert_eq!(keys, vec!["title", "pages"]);
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An ordered map of member names to arbitrary JSON values.
///
/// Used for resource attributes and every `meta` object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonMap(IndexMap<String, Value>);

/// Non-standard meta-information attached to any JSON:API object.
pub type Meta = JsonMap;

/// The attributes object of a resource.
pub type Attributes = JsonMap;

impl JsonMap {
    #[must_use]
    pub fn new() -> Self {
        JsonMap(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        JsonMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a member, returning the previous value under that name.
    ///
    /// A replaced member keeps its original position.
    pub fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Removes a member, preserving the order of the remaining members.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    /// Keeps only the members for which `keep` returns `true`.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str, &Value) -> bool,
    {
        self.0.retain(|k, v| keep(k, v));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the member names, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, Value> {
        self.0.values()
    }

    /// Returns an iterator over the members, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }
}

impl From<serde_json::Map<String, Value>> for JsonMap {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

impl From<JsonMap> for serde_json::Map<String, Value> {
    fn from(map: JsonMap) -> Self {
        map.0.into_iter().collect()
    }
}

impl From<JsonMap> for Value {
    fn from(map: JsonMap) -> Self {
        Value::Object(map.into())
    }
}

impl IntoIterator for JsonMap {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a JsonMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for JsonMap {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        JsonMap(IndexMap::from_iter(iter))
    }
}
