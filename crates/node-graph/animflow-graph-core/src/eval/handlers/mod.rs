//! One evaluator per node kind. Each publishes through
//! [`ExecutionContext::set_node_output`] and keeps no state between calls.

use animflow_api_core::{Item, PortKind};

use super::context::ExecutionContext;
use crate::error::DomainError;
use crate::types::NodeSpec;
use crate::value::Metadata;

pub mod animation;
pub mod batch;
pub mod data;
pub mod duplicate;
pub mod filter;
pub mod logic;
pub mod math;
pub mod merge;
pub mod scene;
pub mod source;

pub(crate) const INPUT: &str = "input";
pub(crate) const OUTPUT: &str = "output";

/// The object stream on a node's `input` port, owned, with its metadata.
pub(crate) fn object_input(
    ctx: &ExecutionContext<'_>,
    node: &NodeSpec,
) -> Result<(Vec<Item>, Metadata), DomainError> {
    let value = ctx.typed_input(node, INPUT, PortKind::Objects)?;
    Ok((value.data.into_items(), value.metadata))
}

/// Like [`object_input`], but an unconnected `input` yields an empty stream so the node
/// still publishes.
pub(crate) fn optional_object_input(
    ctx: &ExecutionContext<'_>,
    node: &NodeSpec,
) -> Result<(Vec<Item>, Metadata), DomainError> {
    if ctx.connections(&node.id, INPUT).is_empty() {
        return Ok((Vec::new(), Metadata::default()));
    }
    object_input(ctx, node)
}

/// Log a failure at the node before handing it back to the caller.
pub(crate) fn logged<T>(node: &NodeSpec, result: Result<T, DomainError>) -> Result<T, DomainError> {
    result.map_err(|err| {
        log::error!("node '{}' failed: {}", node.id, err);
        err
    })
}
