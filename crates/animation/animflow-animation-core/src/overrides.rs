//! Per-object override records carried in node metadata.

use std::collections::BTreeSet;

use animflow_api_core::deep_merge;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Key under which a batch override stores its fallback value.
pub const DEFAULT_BATCH_KEY: &str = "default";

/// `fieldPath -> { batchKey | "default" -> value }`.
pub type BatchOverrides = IndexMap<String, IndexMap<String, JsonValue>>;

/// Field paths whose value comes from an external binding.
pub type BoundFields = BTreeSet<String>;

/// Property overrides for a single authored track, matched by track identifier.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrackAssignment {
    pub track_id: String,
    #[serde(default)]
    pub properties: JsonValue,
}

/// Property assignments for one object.
///
/// `initial` keys are `"{trackType}.{propertyPath}"` paths applied to every track of that
/// type; `tracks` entries apply to the track with the matching identifier.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectAssignments {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub initial: IndexMap<String, JsonValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tracks: Vec<TrackAssignment>,
}

impl ObjectAssignments {
    pub fn is_empty(&self) -> bool {
        self.initial.is_empty() && self.tracks.is_empty()
    }

    /// Field-level merge: every field present in `other` wins, every other field is kept.
    pub fn merge_from(&mut self, other: &ObjectAssignments) {
        for (field, value) in &other.initial {
            self.initial.insert(field.clone(), value.clone());
        }
        for incoming in &other.tracks {
            match self
                .tracks
                .iter_mut()
                .find(|t| t.track_id == incoming.track_id)
            {
                Some(existing) => deep_merge(&mut existing.properties, &incoming.properties),
                None => self.tracks.push(incoming.clone()),
            }
        }
    }
}

/// Merge `incoming` batch overrides into `base`; `incoming` wins per field and batch key.
pub fn merge_batch_overrides(base: &mut BatchOverrides, incoming: &BatchOverrides) {
    for (field, values) in incoming {
        let slot = base.entry(field.clone()).or_default();
        for (key, value) in values {
            slot.insert(key.clone(), value.clone());
        }
    }
}
