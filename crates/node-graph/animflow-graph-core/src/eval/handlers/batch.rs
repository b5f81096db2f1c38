//! Batch node: tags objects with the batch keys they are replicated under.

use animflow_api_core::{Item, PortKind};

use super::{optional_object_input, OUTPUT};
use crate::error::{DomainError, NodeRef, Result};
use crate::eval::bindings::{bound_value, keys_from_value};
use crate::eval::context::ExecutionContext;
use crate::types::{BatchParams, NodeSpec};
use crate::value::Value;

/// Sorted, de-duplicated, blank entries dropped.
fn normalize(keys: Vec<String>) -> Vec<String> {
    let mut keys: Vec<String> = keys
        .into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();
    keys.sort();
    keys.dedup();
    keys
}

/// First non-empty source wins: per-object binding, global binding, `key`, `keys`.
fn resolve_keys(
    ctx: &ExecutionContext<'_>,
    node: &NodeSpec,
    params: &BatchParams,
    object_id: &str,
) -> Result<Vec<String>, DomainError> {
    if let Some(binding) = params.bindings_by_object.get(object_id) {
        let field = format!("bindingsByObject.{object_id}");
        let value = bound_value(ctx, node, &field, binding)?;
        let keys = normalize(keys_from_value(node, &field, value)?);
        if !keys.is_empty() {
            return Ok(keys);
        }
    }
    if let Some(binding) = &params.binding {
        let value = bound_value(ctx, node, "binding", binding)?;
        let keys = normalize(keys_from_value(node, "binding", value)?);
        if !keys.is_empty() {
            return Ok(keys);
        }
    }
    if let Some(key) = &params.key {
        let keys = normalize(vec![key.clone()]);
        if !keys.is_empty() {
            return Ok(keys);
        }
    }
    Ok(normalize(params.keys.clone()))
}

pub fn eval_batch(
    ctx: &mut ExecutionContext<'_>,
    node: &NodeSpec,
    params: &BatchParams,
) -> Result<()> {
    let (mut items, meta) = optional_object_input(ctx, node)?;
    let mut missing = Vec::new();

    for obj in items.iter_mut().filter_map(Item::as_object_mut) {
        let keys = resolve_keys(ctx, node, params, &obj.id)?;
        if keys.is_empty() {
            missing.push(obj.id.clone());
            continue;
        }
        if obj.batch {
            let existing = normalize(obj.batch_keys.clone());
            if !existing.is_empty() && existing != keys {
                return Err(DomainError::BatchRetag {
                    node: NodeRef::of(node),
                    object_id: obj.id.clone(),
                    existing,
                    requested: keys,
                }
                .into());
            }
        }
        obj.batch = true;
        obj.batch_keys = keys;
    }

    if !missing.is_empty() {
        let cap = ctx.config().error_list_cap;
        let remaining = missing.len().saturating_sub(cap);
        missing.truncate(cap);
        return Err(DomainError::EmptyBatchKeys {
            node: NodeRef::of(node),
            object_ids: missing,
            remaining,
        }
        .into());
    }

    ctx.set_node_output(&node.id, OUTPUT, PortKind::Objects, Value::Objects(items), meta);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_sorts_and_dedups() {
        let keys = normalize(vec!["b".into(), " a".into(), "b".into(), "".into()]);
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
    }
}
