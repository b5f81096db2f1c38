//! Payloads and metadata published on node ports.

use animflow_animation_core::{
    merge_batch_overrides, AssembledScene, BatchOverrides, BoundFields, ObjectAssignments,
    SceneAnimationTrack,
};
use animflow_api_core::{Item, PortKind};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Payload carried by an [`ExecutionValue`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum Value {
    Number(f64),
    Boolean(bool),
    Text(String),
    Objects(Vec<Item>),
    Scene(Box<AssembledScene>),
    Json(JsonValue),
    /// Published by result nodes with nothing connected.
    Empty,
}

impl Value {
    /// Kind this payload naturally publishes as.
    pub fn kind(&self) -> PortKind {
        match self {
            Value::Number(_) => PortKind::Number,
            Value::Boolean(_) => PortKind::Boolean,
            Value::Text(_) => PortKind::Text,
            Value::Objects(_) => PortKind::Objects,
            Value::Scene(_) => PortKind::Scene,
            Value::Json(_) | Value::Empty => PortKind::Any,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_items(&self) -> &[Item] {
        match self {
            Value::Objects(items) => items,
            _ => &[],
        }
    }

    pub fn into_items(self) -> Vec<Item> {
        match self {
            Value::Objects(items) => items,
            _ => Vec::new(),
        }
    }

    pub fn as_scene(&self) -> Option<&AssembledScene> {
        match self {
            Value::Scene(scene) => Some(scene),
            _ => None,
        }
    }

    /// JSON view of the payload, used for bindings and debug formatting.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Number(v) => serde_json::Number::from_f64(*v)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Value::Boolean(v) => JsonValue::Bool(*v),
            Value::Text(s) => JsonValue::String(s.clone()),
            Value::Objects(items) => {
                serde_json::to_value(items).unwrap_or_else(|_| JsonValue::Array(Vec::new()))
            }
            Value::Scene(scene) => serde_json::to_value(scene).unwrap_or(JsonValue::Null),
            Value::Json(json) => json.clone(),
            Value::Empty => JsonValue::Null,
        }
    }
}

/// Side-channel state propagated alongside object streams.
///
/// Unknown keys land in `extra` and are passed through by nodes that do not interpret them.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub per_object_time_cursor: IndexMap<String, f64>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub per_object_animations: IndexMap<String, Vec<SceneAnimationTrack>>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub per_object_assignments: IndexMap<String, ObjectAssignments>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub per_object_batch_overrides: IndexMap<String, BatchOverrides>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub per_object_bound_fields: IndexMap<String, BoundFields>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl Metadata {
    pub fn is_empty(&self) -> bool {
        self.per_object_time_cursor.is_empty()
            && self.per_object_animations.is_empty()
            && self.per_object_assignments.is_empty()
            && self.per_object_batch_overrides.is_empty()
            && self.per_object_bound_fields.is_empty()
            && self.extra.is_empty()
    }

    pub fn time_cursor(&self, object_id: &str) -> Option<f64> {
        self.per_object_time_cursor.get(object_id).copied()
    }

    /// Raise the cursor for `object_id` to `time` if it is behind.
    pub fn advance_cursor(&mut self, object_id: &str, time: f64) {
        let slot = self
            .per_object_time_cursor
            .entry(object_id.to_string())
            .or_insert(time);
        if time > *slot {
            *slot = time;
        }
    }

    pub fn animations(&self, object_id: &str) -> &[SceneAnimationTrack] {
        self.per_object_animations
            .get(object_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Fold `other` in without port priority: cursors by max, animations appended,
    /// assignments and overrides with `other` winning per field, bound fields unioned.
    pub fn absorb(&mut self, other: Metadata) {
        for (id, time) in other.per_object_time_cursor {
            self.advance_cursor(&id, time);
        }
        for (id, anims) in other.per_object_animations {
            self.per_object_animations
                .entry(id)
                .or_default()
                .extend(anims);
        }
        for (id, assignments) in other.per_object_assignments {
            self.per_object_assignments
                .entry(id)
                .or_default()
                .merge_from(&assignments);
        }
        for (id, overrides) in other.per_object_batch_overrides {
            merge_batch_overrides(
                self.per_object_batch_overrides.entry(id).or_default(),
                &overrides,
            );
        }
        for (id, fields) in other.per_object_bound_fields {
            self.per_object_bound_fields
                .entry(id)
                .or_default()
                .extend(fields);
        }
        self.extra.extend(other.extra);
    }

    /// Drop every per-object entry whose id fails `keep`. Unknown keys are untouched.
    pub fn retain_objects(&mut self, keep: impl Fn(&str) -> bool) {
        self.per_object_time_cursor.retain(|id, _| keep(id));
        self.per_object_animations.retain(|id, _| keep(id));
        self.per_object_assignments.retain(|id, _| keep(id));
        self.per_object_batch_overrides.retain(|id, _| keep(id));
        self.per_object_bound_fields.retain(|id, _| keep(id));
    }
}

/// A value published under `(node, port)`, with the kind it was declared as.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionValue {
    pub kind: PortKind,
    pub data: Value,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl ExecutionValue {
    pub fn new(kind: PortKind, data: Value, metadata: Metadata) -> Self {
        ExecutionValue {
            kind,
            data,
            metadata,
        }
    }

    /// Wrap `data` with its natural kind and no metadata.
    pub fn plain(data: Value) -> Self {
        ExecutionValue {
            kind: data.kind(),
            data,
            metadata: Metadata::default(),
        }
    }
}
