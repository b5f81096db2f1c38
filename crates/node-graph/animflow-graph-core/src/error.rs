//! Error taxonomy for flow evaluation.
//!
//! - [`DomainError`]: user-attributable configuration problems. Each carries the offending
//!   node and a stable [`DomainError::code`].
//! - [`InvariantViolation`]: engine bugs. Never caused by user input; report, don't fix input.
//! - [`GraphError`]: structural problems with the graph itself (decode, unknown references,
//!   cycles).

use std::fmt;

use animflow_animation_core::AssemblyError;
use animflow_api_core::PortKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{NodeId, NodeSpec};

pub type Result<T, E = FlowError> = std::result::Result<T, E>;

/// Identity of the node an error is attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRef {
    pub id: NodeId,
    pub name: String,
}

impl NodeRef {
    pub fn of(spec: &NodeSpec) -> Self {
        NodeRef {
            id: spec.id.clone(),
            name: spec.display_name().to_string(),
        }
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name == self.id {
            write!(f, "'{}'", self.id)
        } else {
            write!(f, "'{}' ({})", self.name, self.id)
        }
    }
}

fn format_ids(ids: &[String], remaining: &usize) -> String {
    let mut out = ids.join(", ");
    if *remaining > 0 {
        out.push_str(&format!(" and {remaining} more"));
    }
    out
}

fn format_operands(operands: &[f64]) -> String {
    operands
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum DomainError {
    #[error("node {node}: missing required input '{port}'")]
    MissingInput { node: NodeRef, port: String },

    #[error("node {node}: input '{port}' accepts a single connection but has {} ({})", .sources.len(), .sources.join(", "))]
    AmbiguousInput {
        node: NodeRef,
        port: String,
        sources: Vec<NodeId>,
    },

    #[error("node {node}: input '{port}' expects {expected} but received {actual}")]
    TypeValidation {
        node: NodeRef,
        port: String,
        expected: PortKind,
        actual: PortKind,
    },

    #[error("node {node}: result nodes accept at most one input, found {} ({})", .sources.len(), .sources.join(", "))]
    AmbiguousResultInput { node: NodeRef, sources: Vec<NodeId> },

    #[error("node {node}: duplicate needs at least one input object")]
    NoInputObjects { node: NodeRef },

    #[error("node {node}: duplicate count must be at least 1, got {count}")]
    InvalidDuplicateCount { node: NodeRef, count: i64 },

    #[error("node {node}: duplicating {objects} object(s) x{count} yields {requested} objects, limit is {limit}")]
    TooManyObjects {
        node: NodeRef,
        objects: usize,
        count: usize,
        requested: usize,
        limit: usize,
    },

    #[error("node {node}: division by zero ({left} / {right})")]
    DivisionByZero { node: NodeRef, left: f64, right: f64 },

    #[error("node {node}: modulo by zero ({left} % {right})")]
    ModuloByZero { node: NodeRef, left: f64, right: f64 },

    #[error("node {node}: square root of negative number {operand}")]
    NegativeSqrt { node: NodeRef, operand: f64 },

    #[error("node {node}: {operator} of ({}) is not a number", format_operands(.operands))]
    NotANumber {
        node: NodeRef,
        operator: &'static str,
        operands: Vec<f64>,
    },

    #[error("node {node}: no batch key resolved for object(s) {}", format_ids(.object_ids, .remaining))]
    EmptyBatchKeys {
        node: NodeRef,
        object_ids: Vec<String>,
        remaining: usize,
    },

    #[error("node {node}: object '{object_id}' is already tagged with [{}], cannot re-tag with [{}]; only one Batch node allowed per object path", .existing.join(", "), .requested.join(", "))]
    BatchRetag {
        node: NodeRef,
        object_id: String,
        existing: Vec<String>,
        requested: Vec<String>,
    },

    #[error("node {node}: binding for '{field}' references '{source_node}.{port}', which has no output")]
    MissingBinding {
        node: NodeRef,
        field: String,
        source_node: NodeId,
        port: String,
    },

    #[error("node {node}: {source}")]
    Assembly {
        node: NodeRef,
        #[source]
        source: AssemblyError,
    },
}

impl DomainError {
    /// Stable identifier for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingInput { .. } => "MISSING_INPUT",
            Self::AmbiguousInput { .. } => "AMBIGUOUS_INPUT",
            Self::TypeValidation { .. } => "TYPE_VALIDATION",
            Self::AmbiguousResultInput { .. } => "AMBIGUOUS_RESULT_INPUT",
            Self::NoInputObjects { .. } => "NO_INPUT_OBJECTS",
            Self::InvalidDuplicateCount { .. } => "INVALID_DUPLICATE_COUNT",
            Self::TooManyObjects { .. } => "TOO_MANY_OBJECTS",
            Self::DivisionByZero { .. } => "DIVISION_BY_ZERO",
            Self::ModuloByZero { .. } => "MODULO_BY_ZERO",
            Self::NegativeSqrt { .. } => "NEGATIVE_SQRT",
            Self::NotANumber { .. } => "NOT_A_NUMBER",
            Self::EmptyBatchKeys { .. } => "EMPTY_BATCH_KEYS",
            Self::BatchRetag { .. } => "BATCH_RETAG",
            Self::MissingBinding { .. } => "MISSING_BINDING",
            Self::Assembly { .. } => "INVALID_ANIMATION",
        }
    }

    pub fn node(&self) -> &NodeRef {
        match self {
            Self::MissingInput { node, .. }
            | Self::AmbiguousInput { node, .. }
            | Self::TypeValidation { node, .. }
            | Self::AmbiguousResultInput { node, .. }
            | Self::NoInputObjects { node }
            | Self::InvalidDuplicateCount { node, .. }
            | Self::TooManyObjects { node, .. }
            | Self::DivisionByZero { node, .. }
            | Self::ModuloByZero { node, .. }
            | Self::NegativeSqrt { node, .. }
            | Self::NotANumber { node, .. }
            | Self::EmptyBatchKeys { node, .. }
            | Self::BatchRetag { node, .. }
            | Self::MissingBinding { node, .. }
            | Self::Assembly { node, .. } => node,
        }
    }
}

/// Engine bugs detected at runtime.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InvariantViolation {
    #[error("node {node} published object id '{object_id}' more than once")]
    DuplicateObjectId { node: NodeRef, object_id: String },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GraphError {
    #[error("graph json parse error: {0}")]
    Decode(String),

    #[error("duplicate node id '{0}'")]
    DuplicateNode(NodeId),

    #[error("'{referrer}' references unknown node '{node}'")]
    UnknownNode { referrer: String, node: NodeId },

    #[error("node '{node}' ({kind}) has no {direction} port '{port}'")]
    UnknownPort {
        node: NodeId,
        kind: &'static str,
        direction: &'static str,
        port: String,
    },

    #[error("cycle detected in graph involving {}", .remaining.join(", "))]
    Cycle { remaining: Vec<NodeId> },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FlowError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("internal invariant violated (this is a bug): {0}")]
    Invariant(#[from] InvariantViolation),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl FlowError {
    /// `true` for errors that signal an engine bug rather than a configuration problem.
    pub fn is_bug(&self) -> bool {
        matches!(self, FlowError::Invariant(_))
    }

    pub fn category(&self) -> &'static str {
        match self {
            FlowError::Domain(_) => "domain",
            FlowError::Invariant(_) => "invariant",
            FlowError::Graph(_) => "graph",
        }
    }

    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            FlowError::Domain(err) => Some(err),
            _ => None,
        }
    }
}
