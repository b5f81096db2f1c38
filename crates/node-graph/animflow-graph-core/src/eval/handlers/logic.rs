//! Comparison, routing and boolean nodes.

use animflow_api_core::PortKind;

use super::logged;
use crate::error::{DomainError, NodeRef, Result};
use crate::eval::context::ExecutionContext;
use crate::types::{BooleanOp, BooleanParams, CompareOp, CompareParams, NodeSpec};
use crate::value::{Metadata, Value};

const RESULT: &str = "result";

/// A value declared as `expected` whose payload is something else.
fn payload_mismatch(node: &NodeSpec, port: &str, expected: PortKind, data: &Value) -> DomainError {
    DomainError::TypeValidation {
        node: NodeRef::of(node),
        port: port.to_string(),
        expected,
        actual: data.kind(),
    }
}

pub(crate) fn number(
    ctx: &ExecutionContext<'_>,
    node: &NodeSpec,
    port: &str,
) -> Result<f64, DomainError> {
    let value = logged(node, ctx.typed_input(node, port, PortKind::Number))?;
    let number = value
        .data
        .as_number()
        .ok_or_else(|| payload_mismatch(node, port, PortKind::Number, &value.data));
    logged(node, number)
}

fn boolean(ctx: &ExecutionContext<'_>, node: &NodeSpec, port: &str) -> Result<bool, DomainError> {
    let value = logged(node, ctx.typed_input(node, port, PortKind::Boolean))?;
    let flag = value
        .data
        .as_bool()
        .ok_or_else(|| payload_mismatch(node, port, PortKind::Boolean, &value.data));
    logged(node, flag)
}

pub fn compare(op: CompareOp, a: f64, b: f64) -> bool {
    match op {
        CompareOp::Gt => a > b,
        CompareOp::Lt => a < b,
        CompareOp::Eq => a == b,
        CompareOp::Neq => a != b,
        CompareOp::Gte => a >= b,
        CompareOp::Lte => a <= b,
    }
}

pub fn boolean_op(op: BooleanOp, a: bool, b: bool) -> bool {
    match op {
        BooleanOp::And => a && b,
        BooleanOp::Or => a || b,
        BooleanOp::Xor => a ^ b,
        BooleanOp::Not => !a,
    }
}

pub fn eval_compare(
    ctx: &mut ExecutionContext<'_>,
    node: &NodeSpec,
    params: &CompareParams,
) -> Result<()> {
    let a = number(ctx, node, "a")?;
    let b = number(ctx, node, "b")?;
    ctx.set_node_output(
        &node.id,
        RESULT,
        PortKind::Boolean,
        Value::Boolean(compare(params.operator, a, b)),
        Metadata::default(),
    );
    Ok(())
}

/// Route `data` to the `true` or `false` port. Only the taken port is published.
pub fn eval_if_else(ctx: &mut ExecutionContext<'_>, node: &NodeSpec) -> Result<()> {
    let condition = boolean(ctx, node, "condition")?;
    let data = logged(node, ctx.input(node, "data"))?;
    let port = if condition { "true" } else { "false" };
    ctx.set_node_output(&node.id, port, data.kind, data.data, data.metadata);
    Ok(())
}

pub fn eval_boolean(
    ctx: &mut ExecutionContext<'_>,
    node: &NodeSpec,
    params: &BooleanParams,
) -> Result<()> {
    let a = boolean(ctx, node, "a")?;
    let b = if params.operator.is_unary() {
        false
    } else {
        boolean(ctx, node, "b")?
    };
    ctx.set_node_output(
        &node.id,
        RESULT,
        PortKind::Boolean,
        Value::Boolean(boolean_op(params.operator, a, b)),
        Metadata::default(),
    );
    Ok(())
}
