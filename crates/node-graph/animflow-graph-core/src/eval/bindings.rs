//! Resolution of configuration fields bound to other nodes' outputs.

use animflow_animation_core::{AnimationTrack, BoundFields};
use animflow_api_core::{PortKind, PropertyPath};
use indexmap::IndexMap;
use serde_json::Value as JsonValue;

use super::context::ExecutionContext;
use crate::error::{DomainError, NodeRef};
use crate::types::{Binding, NodeSpec};
use crate::value::{ExecutionValue, Value};

/// The value published by the node a binding points at.
pub fn bound_value<'a>(
    ctx: &'a ExecutionContext<'_>,
    node: &NodeSpec,
    field: &str,
    binding: &Binding,
) -> Result<&'a ExecutionValue, DomainError> {
    ctx.output(&binding.node_id, &binding.port)
        .ok_or_else(|| DomainError::MissingBinding {
            node: NodeRef::of(node),
            field: field.to_string(),
            source_node: binding.node_id.clone(),
            port: binding.port.clone(),
        })
}

fn mismatch(node: &NodeSpec, field: &str, expected: PortKind, actual: PortKind) -> DomainError {
    DomainError::TypeValidation {
        node: NodeRef::of(node),
        port: field.to_string(),
        expected,
        actual,
    }
}

/// Check a bound value against the field it replaces. Numbers only replace numbers and
/// text only replaces text; structured fields accept JSON payloads.
fn fit_to_field(
    node: &NodeSpec,
    field: &str,
    current: Option<&JsonValue>,
    value: &ExecutionValue,
) -> Result<JsonValue, DomainError> {
    let expected = match current {
        Some(JsonValue::Number(_)) => PortKind::Number,
        Some(JsonValue::String(_)) => PortKind::Text,
        Some(JsonValue::Bool(_)) => PortKind::Boolean,
        _ => PortKind::Any,
    };
    match (&value.data, expected) {
        (Value::Number(_), PortKind::Number | PortKind::Any)
        | (Value::Text(_), PortKind::Text | PortKind::Any)
        | (Value::Boolean(_), PortKind::Boolean | PortKind::Any)
        | (Value::Json(_), PortKind::Any) => Ok(value.data.to_json()),
        (_, PortKind::Any) => Err(mismatch(node, field, PortKind::Number, value.kind)),
        (_, expected) => Err(mismatch(node, field, expected, value.kind)),
    }
}

/// Apply `bindings` (field path -> binding) to a copy of `tracks`.
///
/// A field path starts with a track identifier or a track type, followed by the property
/// path inside that track (`"slide.to.x"`, `"fade.to"`). Every field written is recorded in
/// `bound` as `"{trackType}.{propertyPath}"` so later batch layers leave it alone.
pub fn apply_track_bindings(
    ctx: &ExecutionContext<'_>,
    node: &NodeSpec,
    tracks: &[AnimationTrack],
    bindings: &IndexMap<&str, &Binding>,
    bound: &mut BoundFields,
) -> Result<Vec<AnimationTrack>, DomainError> {
    let mut resolved = tracks.to_vec();
    for (field, binding) in bindings {
        let path = PropertyPath::parse(field).map_err(|source| DomainError::Assembly {
            node: NodeRef::of(node),
            source: source.into(),
        })?;
        let Some((head, rest)) = path.split_first() else {
            continue;
        };
        let value = bound_value(ctx, node, field, binding)?;
        for track in resolved
            .iter_mut()
            .filter(|t| t.identifier == head || t.kind.as_str() == head)
        {
            let json = fit_to_field(node, field, rest.get(&track.properties), value)?;
            if track.properties.is_null() {
                track.properties = JsonValue::Object(Default::default());
            }
            rest.set(&mut track.properties, json);
            bound.insert(if rest.is_empty() {
                track.kind.as_str().to_string()
            } else {
                format!("{}.{}", track.kind.as_str(), rest)
            });
        }
    }
    Ok(resolved)
}

/// Batch keys carried by a bound value: a string, or a list of strings.
pub fn keys_from_value(
    node: &NodeSpec,
    field: &str,
    value: &ExecutionValue,
) -> Result<Vec<String>, DomainError> {
    match &value.data {
        Value::Text(s) => Ok(vec![s.clone()]),
        Value::Number(n) => Ok(vec![n.to_string()]),
        Value::Json(JsonValue::String(s)) => Ok(vec![s.clone()]),
        Value::Json(JsonValue::Array(items)) => items
            .iter()
            .map(|item| match item {
                JsonValue::String(s) => Ok(s.clone()),
                _ => Err(mismatch(node, field, PortKind::Text, PortKind::Any)),
            })
            .collect(),
        Value::Empty => Ok(Vec::new()),
        _ => Err(mismatch(node, field, PortKind::Text, value.kind)),
    }
}
