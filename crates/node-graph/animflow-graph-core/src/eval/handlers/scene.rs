use animflow_animation_core::AssembledScene;
use animflow_api_core::{Item, PortKind};
use indexmap::IndexMap;

use super::object_input;
use crate::error::Result;
use crate::eval::context::ExecutionContext;
use crate::types::{NodeSpec, SceneParams};
use crate::value::Value;

pub const SCENE: &str = "scene";

/// Assemble the objects on `input` and the animation history their path carries.
pub fn eval_scene(
    ctx: &mut ExecutionContext<'_>,
    node: &NodeSpec,
    _params: &SceneParams,
) -> Result<()> {
    let (items, meta) = object_input(ctx, node)?;
    let objects: Vec<_> = items
        .into_iter()
        .filter_map(|item| match item {
            Item::Object(obj) => Some(obj),
            Item::Raw(_) => None,
        })
        .collect();

    let mut animations = Vec::new();
    let mut batch_overrides = IndexMap::new();
    let mut bound_fields = IndexMap::new();
    for obj in &objects {
        animations.extend(meta.animations(&obj.id).iter().cloned());
        if let Some(overrides) = meta.per_object_batch_overrides.get(&obj.id) {
            batch_overrides.insert(obj.id.clone(), overrides.clone());
        }
        if let Some(bound) = meta.per_object_bound_fields.get(&obj.id) {
            bound_fields.insert(obj.id.clone(), bound.clone());
        }
    }
    let duration = animations
        .iter()
        .map(|a| a.end_time())
        .fold(0.0_f64, f64::max);

    let scene = AssembledScene {
        objects,
        animations,
        batch_overrides,
        bound_fields,
        duration,
    };
    ctx.advance_time(duration);
    ctx.set_node_output(
        &node.id,
        SCENE,
        PortKind::Scene,
        Value::Scene(Box::new(scene)),
        meta,
    );
    Ok(())
}
