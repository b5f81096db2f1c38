//! animflow graph core
//!
//! Evaluates flow graphs of typed nodes (geometry, animation, merge, duplicate, filter,
//! batch, logic, math, scene) into per-object scene animations. Entry point:
//! [`evaluate_flow`].

pub mod config;
pub mod error;
pub mod eval;
pub mod schema;
pub mod topo;
pub mod types;
pub mod value;

pub use config::{DuplicateLimits, RunConfig};
pub use error::{DomainError, FlowError, GraphError, InvariantViolation, NodeRef};
pub use eval::{eval_node, evaluate_all, evaluate_flow, ExecutionContext, FlowRun};
pub use schema::{registry, validate_graph};
pub use topo::topo_order;
pub use types::*;
pub use value::{ExecutionValue, Metadata, Value};
