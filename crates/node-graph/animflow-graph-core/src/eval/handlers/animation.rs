//! Animation node: turns authored tracks into scene animations for every object.

use animflow_animation_core::{
    convert_tracks_to_scene_animations, merge_batch_overrides, supersede_overlapping,
    BatchOverrideContext,
};
use animflow_api_core::{Item, PortKind};
use indexmap::IndexMap;

use super::{object_input, OUTPUT};
use crate::error::{DomainError, NodeRef, Result};
use crate::eval::bindings::apply_track_bindings;
use crate::eval::context::ExecutionContext;
use crate::types::{AnimationParams, Binding, NodeSpec};
use crate::value::Value;

pub fn eval_animation(
    ctx: &mut ExecutionContext<'_>,
    node: &NodeSpec,
    params: &AnimationParams,
) -> Result<()> {
    let (items, mut meta) = object_input(ctx, node)?;
    let mut produced = Vec::new();
    let mut latest_end = 0.0_f64;

    for obj in items.iter().filter_map(Item::as_object) {
        let id = obj.id.as_str();
        let baseline = meta
            .time_cursor(id)
            .or(obj.appearance_time)
            .unwrap_or(0.0);

        // Per-object bindings override global ones field by field.
        let mut table: IndexMap<&str, &Binding> = params
            .bindings
            .iter()
            .map(|(field, b)| (field.as_str(), b))
            .collect();
        if let Some(local) = params.bindings_by_object.get(id) {
            table.extend(local.iter().map(|(field, b)| (field.as_str(), b)));
        }
        let mut bound = meta
            .per_object_bound_fields
            .get(id)
            .cloned()
            .unwrap_or_default();
        let tracks = apply_track_bindings(ctx, node, &params.tracks, &table, &mut bound)?;

        let mut assignments = meta
            .per_object_assignments
            .get(id)
            .cloned()
            .unwrap_or_default();
        if let Some(local) = params.assignments.get(id) {
            assignments.merge_from(local);
        }
        let mut overrides = meta
            .per_object_batch_overrides
            .get(id)
            .cloned()
            .unwrap_or_default();
        if let Some(local) = params.batch_overrides.get(id) {
            merge_batch_overrides(&mut overrides, local);
        }

        let batch = BatchOverrideContext {
            batch_key: None,
            overrides: Some(&overrides),
            bound_fields: Some(&bound),
        };
        let prior = meta.animations(id);
        let assembled = convert_tracks_to_scene_animations(
            &tracks,
            id,
            baseline,
            prior,
            Some(&assignments),
            Some(&batch),
        )
        .map_err(|source| DomainError::Assembly {
            node: NodeRef::of(node),
            source,
        })?;

        let mut history = prior.to_vec();
        supersede_overlapping(&mut history, &assembled);
        history.extend(assembled.iter().cloned());

        let end = assembled
            .iter()
            .map(|a| a.end_time())
            .fold(baseline, f64::max);
        latest_end = latest_end.max(end);
        meta.advance_cursor(id, end);
        meta.per_object_animations.insert(id.to_string(), history);
        if !assignments.is_empty() {
            meta.per_object_assignments.insert(id.to_string(), assignments);
        }
        if !overrides.is_empty() {
            meta.per_object_batch_overrides
                .insert(id.to_string(), overrides);
        }
        if !bound.is_empty() {
            meta.per_object_bound_fields.insert(id.to_string(), bound);
        }
        produced.extend(assembled);
    }

    ctx.scene_animations.extend(produced);
    ctx.advance_time(latest_end);
    ctx.set_node_output(&node.id, OUTPUT, PortKind::Objects, Value::Objects(items), meta);
    Ok(())
}
