use animflow_api_core::{Item, PortKind};
use hashbrown::HashSet;

use super::{optional_object_input, OUTPUT};
use crate::error::Result;
use crate::eval::context::ExecutionContext;
use crate::types::{FilterParams, NodeSpec};
use crate::value::Value;

/// Keep objects on the allow-list and every non-identified item; shrink metadata to match.
pub fn eval_filter(
    ctx: &mut ExecutionContext<'_>,
    node: &NodeSpec,
    params: &FilterParams,
) -> Result<()> {
    let (items, mut meta) = optional_object_input(ctx, node)?;
    let allowed: HashSet<&str> = params.object_ids.iter().map(String::as_str).collect();
    let kept: Vec<Item> = items
        .into_iter()
        .filter(|item| item.id().map_or(true, |id| allowed.contains(id)))
        .collect();
    let survivors: HashSet<&str> = kept.iter().filter_map(Item::id).collect();
    meta.retain_objects(|id| survivors.contains(id));
    drop(survivors);
    ctx.set_node_output(&node.id, OUTPUT, PortKind::Objects, Value::Objects(kept), meta);
    Ok(())
}
