//! Nodes that introduce objects or place them in time.

use animflow_api_core::{Item, PortKind, SceneObject};

use super::{object_input, OUTPUT};
use crate::error::Result;
use crate::eval::context::ExecutionContext;
use crate::types::{GeometryParams, InsertParams, NodeSpec};
use crate::value::{Metadata, Value};

/// One object per configured shape. An omitted id becomes the node id, or
/// `{nodeId}_{index}` when several shapes are configured.
pub fn eval_geometry(
    ctx: &mut ExecutionContext<'_>,
    node: &NodeSpec,
    params: &GeometryParams,
) -> Result<()> {
    let many = params.shapes.len() > 1;
    let items = params
        .shapes
        .iter()
        .enumerate()
        .map(|(index, shape)| {
            let id = match &shape.id {
                Some(id) => id.clone(),
                None if many => format!("{}_{}", node.id, index),
                None => node.id.clone(),
            };
            let mut obj = SceneObject::new(id).with_type(shape.object_type.clone());
            obj.properties = shape.properties.clone();
            Item::Object(obj)
        })
        .collect();
    ctx.set_node_output(
        &node.id,
        OUTPUT,
        PortKind::Objects,
        Value::Objects(items),
        Metadata::default(),
    );
    Ok(())
}

/// Stamp appearance times and seed each object's cursor with them.
pub fn eval_insert(
    ctx: &mut ExecutionContext<'_>,
    node: &NodeSpec,
    params: &InsertParams,
) -> Result<()> {
    let (mut items, mut meta) = object_input(ctx, node)?;
    for obj in items.iter_mut().filter_map(Item::as_object_mut) {
        let time = params
            .appearance_times
            .get(&obj.id)
            .copied()
            .or(params.appearance_time);
        if let Some(time) = time {
            obj.appearance_time = Some(time);
            meta.advance_cursor(&obj.id, time);
        }
    }
    ctx.set_node_output(&node.id, OUTPUT, PortKind::Objects, Value::Objects(items), meta);
    Ok(())
}
