use animflow_api_core::PortKind;

use super::{INPUT, OUTPUT};
use crate::error::{DomainError, NodeRef, Result};
use crate::eval::context::ExecutionContext;
use crate::eval::debug::{summarize, DebugEntry};
use crate::types::{ConstantParams, ConstantValue, NodeSpec, ResultParams};
use crate::value::{ExecutionValue, Metadata, Value};

pub fn eval_constant(
    ctx: &mut ExecutionContext<'_>,
    node: &NodeSpec,
    params: &ConstantParams,
) -> Result<()> {
    let data = match &params.value {
        ConstantValue::Number(v) => Value::Number(*v),
        ConstantValue::Boolean(v) => Value::Boolean(*v),
        ConstantValue::Text(s) => Value::Text(s.clone()),
    };
    ctx.set_node_output(&node.id, OUTPUT, data.kind(), data, Metadata::default());
    Ok(())
}

/// Pass-through sink. Zero inputs publish [`Value::Empty`]; the debug target also gets a
/// formatted summary of what arrived.
pub fn eval_result(
    ctx: &mut ExecutionContext<'_>,
    node: &NodeSpec,
    params: &ResultParams,
) -> Result<()> {
    let connections = ctx.connections(&node.id, INPUT);
    if connections.len() > 1 {
        return Err(DomainError::AmbiguousResultInput {
            node: NodeRef::of(node),
            sources: connections.iter().map(|e| e.source.clone()).collect(),
        }
        .into());
    }

    let mut inputs = ctx.inputs(&node.id, INPUT);
    let (source, value) = match inputs.pop() {
        Some(input) => (Some(input.source), input.value),
        None => (
            None,
            ExecutionValue::new(PortKind::Any, Value::Empty, Metadata::default()),
        ),
    };

    if ctx.is_debug_target(&node.id) {
        let summary = summarize(&value.data, ctx.config().preview_items);
        log::debug!(
            "result '{}' ({}): {} = {}",
            node.id,
            params.label.as_deref().unwrap_or(node.display_name()),
            summary.value_type,
            summary.formatted
        );
        ctx.record_debug(DebugEntry {
            node_id: node.id.clone(),
            node_name: params
                .label
                .clone()
                .unwrap_or_else(|| node.display_name().to_string()),
            source,
            summary,
        });
    }

    ctx.set_node_output(&node.id, OUTPUT, value.kind, value.data, value.metadata);
    Ok(())
}
