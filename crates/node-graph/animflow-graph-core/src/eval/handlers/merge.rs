//! Merge node: union of numbered object streams, deduplicated by id.

use animflow_api_core::{Item, PortKind};
use hashbrown::HashSet;
use indexmap::IndexMap;

use super::OUTPUT;
use crate::error::{DomainError, FlowError, InvariantViolation, NodeRef, Result};
use crate::eval::context::ExecutionContext;
use crate::eval::metadata::merge_by_port_priority;
use crate::types::{MergeParams, NodeSpec};
use crate::value::Value;

pub fn eval_merge(
    ctx: &mut ExecutionContext<'_>,
    node: &NodeSpec,
    params: &MergeParams,
) -> Result<()> {
    // Winner per id as (port, position, item). Ports are visited from the highest number
    // down so that lower ports overwrite.
    let mut by_id: IndexMap<String, (usize, usize, Item)> = IndexMap::new();
    let mut raw: Vec<(usize, usize, Item)> = Vec::new();
    let mut port_meta = Vec::new();

    for port in (1..=params.input_count).rev() {
        let name = format!("input{port}");
        for input in ctx.inputs(&node.id, &name) {
            if !PortKind::Objects.accepts(input.value.kind) {
                return Err(DomainError::TypeValidation {
                    node: NodeRef::of(node),
                    port: name,
                    expected: PortKind::Objects,
                    actual: input.value.kind,
                }
                .into());
            }
            for (position, item) in input.value.data.into_items().into_iter().enumerate() {
                match item.id().map(str::to_string) {
                    Some(id) => {
                        // Two connections on the same port: the earlier connection keeps it.
                        if by_id.get(&id).is_some_and(|(p, _, _)| *p == port) {
                            continue;
                        }
                        by_id.insert(id, (port, position, item));
                    }
                    None => raw.push((port, position, item)),
                }
            }
            port_meta.push((port, input.value.metadata));
        }
    }

    let mut ordered: Vec<(usize, usize, Item)> = by_id.into_values().chain(raw).collect();
    ordered.sort_by_key(|(port, position, _)| (*port, *position));
    let items: Vec<Item> = ordered.into_iter().map(|(_, _, item)| item).collect();

    let mut seen = HashSet::new();
    for id in items.iter().filter_map(Item::id) {
        if !seen.insert(id) {
            let violation = InvariantViolation::DuplicateObjectId {
                node: NodeRef::of(node),
                object_id: id.to_string(),
            };
            log::error!("{violation}");
            return Err(FlowError::Invariant(violation));
        }
    }

    drop(seen);
    let meta = merge_by_port_priority(port_meta);
    ctx.set_node_output(&node.id, OUTPUT, PortKind::Objects, Value::Objects(items), meta);
    Ok(())
}
