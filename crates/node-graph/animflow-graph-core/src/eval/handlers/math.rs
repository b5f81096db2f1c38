use animflow_api_core::PortKind;

use super::logged;
use super::logic::number;
use crate::error::{DomainError, NodeRef, Result};
use crate::eval::context::ExecutionContext;
use crate::types::{MathOp, MathParams, NodeSpec};
use crate::value::{Metadata, Value};

/// Apply `op`, rejecting zero divisors, negative square roots and NaN results. Infinite
/// results are returned as-is.
pub fn apply(node: &NodeSpec, op: MathOp, a: f64, b: f64) -> Result<f64, DomainError> {
    let result = match op {
        MathOp::Add => a + b,
        MathOp::Subtract => a - b,
        MathOp::Multiply => a * b,
        MathOp::Divide => {
            if b == 0.0 {
                return Err(DomainError::DivisionByZero {
                    node: NodeRef::of(node),
                    left: a,
                    right: b,
                });
            }
            a / b
        }
        MathOp::Modulo => {
            if b == 0.0 {
                return Err(DomainError::ModuloByZero {
                    node: NodeRef::of(node),
                    left: a,
                    right: b,
                });
            }
            a % b
        }
        MathOp::Power => a.powf(b),
        MathOp::Min => a.min(b),
        MathOp::Max => a.max(b),
        MathOp::Sqrt => {
            if a < 0.0 {
                return Err(DomainError::NegativeSqrt {
                    node: NodeRef::of(node),
                    operand: a,
                });
            }
            a.sqrt()
        }
        MathOp::Abs => a.abs(),
    };
    if result.is_nan() {
        let operands = if op.is_unary() { vec![a] } else { vec![a, b] };
        return Err(DomainError::NotANumber {
            node: NodeRef::of(node),
            operator: op.as_str(),
            operands,
        });
    }
    Ok(result)
}

pub fn eval_math(
    ctx: &mut ExecutionContext<'_>,
    node: &NodeSpec,
    params: &MathParams,
) -> Result<()> {
    let op = params.operator;
    let a = number(ctx, node, "a")?;
    let b = if op.is_unary() {
        0.0
    } else {
        number(ctx, node, "b")?
    };
    let result = logged(node, apply(node, op, a, b))?;
    if result.is_infinite() {
        log::warn!(
            "math '{}': {} of ({}, {}) is {}",
            node.id,
            op.as_str(),
            a,
            b,
            result
        );
    }
    ctx.set_node_output(
        &node.id,
        "result",
        PortKind::Number,
        Value::Number(result),
        Metadata::default(),
    );
    Ok(())
}
