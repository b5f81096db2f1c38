//! Per-node dispatch.

use crate::error::Result;
use crate::eval::context::ExecutionContext;
use crate::types::{NodeKind, NodeSpec};

use super::handlers::{
    animation, batch, data, duplicate, filter, logic, math, merge, scene, source,
};

/// Evaluate a single node, publishing its outputs into `ctx`.
pub fn eval_node(ctx: &mut ExecutionContext<'_>, spec: &NodeSpec) -> Result<()> {
    log::debug!("evaluating node '{}' ({})", spec.id, spec.kind.type_name());
    evaluate_kind(ctx, spec)
}

fn evaluate_kind(ctx: &mut ExecutionContext<'_>, spec: &NodeSpec) -> Result<()> {
    match &spec.kind {
        NodeKind::Geometry(params) => source::eval_geometry(ctx, spec, params),
        NodeKind::Insert(params) => source::eval_insert(ctx, spec, params),
        NodeKind::Animation(params) => animation::eval_animation(ctx, spec, params),
        NodeKind::Merge(params) => merge::eval_merge(ctx, spec, params),
        NodeKind::Duplicate(params) => {
            let existing = ctx.id_snapshot();
            duplicate::eval_duplicate(ctx, spec, params, &existing)
        }
        NodeKind::Filter(params) => filter::eval_filter(ctx, spec, params),
        NodeKind::Batch(params) => batch::eval_batch(ctx, spec, params),
        NodeKind::Constant(params) => data::eval_constant(ctx, spec, params),
        NodeKind::Result(params) => data::eval_result(ctx, spec, params),
        NodeKind::Compare(params) => logic::eval_compare(ctx, spec, params),
        NodeKind::IfElse(_) => logic::eval_if_else(ctx, spec),
        NodeKind::Boolean(params) => logic::eval_boolean(ctx, spec, params),
        NodeKind::Math(params) => math::eval_math(ctx, spec, params),
        NodeKind::Scene(params) => scene::eval_scene(ctx, spec, params),
    }
}
