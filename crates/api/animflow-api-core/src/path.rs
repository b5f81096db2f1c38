//! Dotted property paths over JSON property trees.
//!
//! Grammar: `segment(.segment)*`, e.g. `move.to.x` or `color.to`.
//! - Segments are non-empty and contain no whitespace.
//! - The first segment usually names a track type or track identifier; the remaining
//!   segments address a field inside that track's `properties` object.
//!
//! Paths may address a leaf (`move.to.x`) or a whole structure (`move.to`); [`PropertyPath::set`]
//! creates intermediate objects as needed.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid property path '{path}': {reason}")]
pub struct PathError {
    pub path: String,
    pub reason: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyPath {
    segments: Vec<String>,
}

impl PropertyPath {
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    pub fn parse(s: &str) -> Result<Self, PathError> {
        let err = |reason| PathError {
            path: s.to_string(),
            reason,
        };
        if s.is_empty() {
            return Err(err("empty path"));
        }
        let mut segments = Vec::new();
        for seg in s.split('.') {
            if seg.is_empty() {
                return Err(err("empty segment"));
            }
            if seg.chars().any(char::is_whitespace) {
                return Err(err("segment contains whitespace"));
            }
            segments.push(seg.to_string());
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Split into the leading segment and the remaining path.
    pub fn split_first(&self) -> Option<(&str, PropertyPath)> {
        let (head, rest) = self.segments.split_first()?;
        Some((head.as_str(), PropertyPath::new(rest.to_vec())))
    }

    /// `true` if `self` equals `other` or is one of its ancestors.
    pub fn covers(&self, other: &PropertyPath) -> bool {
        self.segments.len() <= other.segments.len()
            && self.segments.iter().zip(&other.segments).all(|(a, b)| a == b)
    }

    pub fn get<'a>(&self, root: &'a JsonValue) -> Option<&'a JsonValue> {
        let mut cur = root;
        for seg in &self.segments {
            cur = match cur {
                JsonValue::Object(map) => map.get(seg)?,
                JsonValue::Array(items) => items.get(seg.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(cur)
    }

    /// Write `value` at this path, replacing non-object intermediates with objects.
    ///
    /// An empty path replaces `root` entirely.
    pub fn set(&self, root: &mut JsonValue, value: JsonValue) {
        let Some((last, parents)) = self.segments.split_last() else {
            *root = value;
            return;
        };
        let mut cur = root;
        for seg in parents {
            cur = ensure_object(cur)
                .entry(seg.clone())
                .or_insert_with(|| JsonValue::Object(Map::new()));
        }
        ensure_object(cur).insert(last.clone(), value);
    }
}

fn ensure_object(value: &mut JsonValue) -> &mut Map<String, JsonValue> {
    if !value.is_object() {
        *value = JsonValue::Object(Map::new());
    }
    match value {
        JsonValue::Object(map) => map,
        _ => unreachable!("value was just replaced with an object"),
    }
}

/// Recursively merge `patch` into `base`. Objects merge key-wise; any other value in
/// `patch` replaces what is in `base`.
pub fn deep_merge(base: &mut JsonValue, patch: &JsonValue) {
    match (base, patch) {
        (JsonValue::Object(base_map), JsonValue::Object(patch_map)) => {
            for (key, patch_value) in patch_map {
                match base_map.get_mut(key) {
                    Some(existing) => deep_merge(existing, patch_value),
                    None => {
                        base_map.insert(key.clone(), patch_value.clone());
                    }
                }
            }
        }
        (base, patch) => *base = patch.clone(),
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl FromStr for PropertyPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropertyPath::parse(s)
    }
}

impl Serialize for PropertyPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PropertyPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        PropertyPath::parse(&s).map_err(de::Error::custom)
    }
}
