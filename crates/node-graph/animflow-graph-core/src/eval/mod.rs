//! Evaluation pipeline for flow graphs.
//!
//! - [`context`] holds the run-scoped output table and typed input lookup.
//! - [`metadata`] merges per-object metadata across inputs.
//! - [`bindings`] resolves configuration fields bound to other nodes.
//! - [`debug`] formats values for the debug target.
//! - [`eval_node`] dispatches each [`NodeKind`](crate::types::NodeKind) to its handler.
//!
//! Most callers only need [`evaluate_flow`].

use animflow_animation_core::SceneAnimationTrack;
use animflow_api_core::Item;
use serde::Serialize;
use uuid::Uuid;

use crate::config::RunConfig;
use crate::error::Result;
use crate::types::GraphSpec;
use crate::value::ExecutionValue;

pub mod bindings;
pub mod context;
pub mod debug;
pub mod eval_node;
pub mod handlers;
pub mod metadata;

pub use context::{ConnectedInput, ExecutionContext, IdSnapshot, OutputTable};
pub use debug::{DebugEntry, DebugLog, ValueSummary};
pub use eval_node::eval_node;


/// Everything a completed run produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowRun {
    pub run_id: Uuid,
    pub outputs: OutputTable,
    pub scene_animations: Vec<SceneAnimationTrack>,
    pub current_time: f64,
    pub debug_log: DebugLog,
}

impl FlowRun {
    pub fn output(&self, node_id: &str, port: &str) -> Option<&ExecutionValue> {
        self.outputs.get(node_id).and_then(|ports| ports.get(port))
    }

    /// Items published on `(node_id, "output")`.
    pub fn objects(&self, node_id: &str) -> &[Item] {
        self.output(node_id, handlers::OUTPUT)
            .map(|v| v.data.as_items())
            .unwrap_or(&[])
    }

    /// Ids of the objects published on `(node_id, "output")`, in order.
    pub fn object_ids(&self, node_id: &str) -> Vec<&str> {
        self.objects(node_id).iter().filter_map(Item::id).collect()
    }

    pub fn scene(&self, node_id: &str) -> Option<&animflow_animation_core::AssembledScene> {
        self.output(node_id, handlers::scene::SCENE)
            .and_then(|v| v.data.as_scene())
    }
}

/// Walk `ctx`'s graph in topological order, evaluating every node.
///
/// The first error aborts the walk; outputs published before it stay in `ctx`.
pub fn evaluate_all(ctx: &mut ExecutionContext<'_>) -> Result<()> {
    let graph = ctx.graph();
    crate::schema::validate_graph(graph)?;
    if let Some(target) = &ctx.config().debug_target {
        if graph.node(target).is_none() {
            log::warn!("debug target '{target}' is not a node in this graph");
        }
    }

    let order = crate::topo::topo_order(graph)?;
    for id in &order {
        if let Some(node) = graph.node(id) {
            eval_node(ctx, node)?;
        }
    }
    log::debug!(
        "evaluated {} nodes, time cursor at {}",
        order.len(),
        ctx.current_time
    );
    Ok(())
}

/// Evaluate `spec` from scratch under `config`.
pub fn evaluate_flow(spec: &GraphSpec, config: &RunConfig) -> Result<FlowRun> {
    let run_id = Uuid::new_v4();
    log::debug!("flow run {run_id}: {} nodes", spec.nodes.len());
    let mut ctx = ExecutionContext::new(spec, config);
    evaluate_all(&mut ctx)?;
    let (outputs, scene_animations, current_time, debug_log) = ctx.into_parts();
    Ok(FlowRun {
        run_id,
        outputs,
        scene_animations,
        current_time,
        debug_log,
    })
}
