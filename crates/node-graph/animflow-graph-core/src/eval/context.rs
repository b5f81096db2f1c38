//! Run-scoped state shared by every node handler.

use animflow_animation_core::SceneAnimationTrack;
use animflow_api_core::PortKind;
use hashbrown::{HashMap, HashSet};

use crate::config::RunConfig;
use crate::error::{DomainError, NodeRef};
use crate::types::{EdgeSpec, GraphSpec, NodeId, NodeSpec};
use crate::value::{ExecutionValue, Metadata, Value};

use super::debug::{DebugEntry, DebugLog};

pub type OutputTable = HashMap<NodeId, HashMap<String, ExecutionValue>>;

/// An upstream value delivered to an input port, owned by the receiving handler.
#[derive(Clone, Debug)]
pub struct ConnectedInput {
    pub source: NodeId,
    pub source_port: String,
    pub value: ExecutionValue,
}

/// Read-only view of every object id present in the output table at one point in time.
#[derive(Clone, Debug, Default)]
pub struct IdSnapshot {
    ids: HashSet<String>,
}

impl IdSnapshot {
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for IdSnapshot {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        IdSnapshot {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

pub struct ExecutionContext<'g> {
    graph: &'g GraphSpec,
    config: &'g RunConfig,
    /// Incoming edges per target node, in declaration order.
    incoming: HashMap<&'g str, Vec<&'g EdgeSpec>>,
    pub outputs: OutputTable,
    /// Every scene animation produced during the run, in production order.
    pub scene_animations: Vec<SceneAnimationTrack>,
    pub current_time: f64,
    pub debug_log: DebugLog,
}

impl<'g> ExecutionContext<'g> {
    pub fn new(graph: &'g GraphSpec, config: &'g RunConfig) -> Self {
        let mut incoming: HashMap<&'g str, Vec<&'g EdgeSpec>> = HashMap::new();
        for edge in &graph.edges {
            incoming.entry(edge.target.as_str()).or_default().push(edge);
        }
        ExecutionContext {
            graph,
            config,
            incoming,
            outputs: OutputTable::new(),
            scene_animations: Vec::new(),
            current_time: 0.0,
            debug_log: DebugLog::default(),
        }
    }

    pub fn graph(&self) -> &'g GraphSpec {
        self.graph
    }

    pub fn config(&self) -> &'g RunConfig {
        self.config
    }

    /// Edges connected to `port` on `node_id`, whether or not their source has published.
    pub fn connections(&self, node_id: &str, port: &str) -> Vec<&'g EdgeSpec> {
        self.incoming
            .get(node_id)
            .map(|edges| {
                edges
                    .iter()
                    .copied()
                    .filter(|e| e.target_port == port)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Published values arriving on `port`, cloned, in connection order. Connections whose
    /// source did not publish on that port (an untaken if/else branch) are skipped.
    pub fn inputs(&self, node_id: &str, port: &str) -> Vec<ConnectedInput> {
        self.connections(node_id, port)
            .into_iter()
            .filter_map(|edge| {
                self.output(&edge.source, &edge.source_port)
                    .map(|value| ConnectedInput {
                        source: edge.source.clone(),
                        source_port: edge.source_port.clone(),
                        value: value.clone(),
                    })
            })
            .collect()
    }

    /// The single value on `port`, any kind.
    pub fn input(&self, node: &NodeSpec, port: &str) -> Result<ExecutionValue, DomainError> {
        let mut found = self.inputs(&node.id, port);
        match found.len() {
            0 => Err(DomainError::MissingInput {
                node: NodeRef::of(node),
                port: port.to_string(),
            }),
            1 => Ok(found.remove(0).value),
            _ => Err(DomainError::AmbiguousInput {
                node: NodeRef::of(node),
                port: port.to_string(),
                sources: found.into_iter().map(|c| c.source).collect(),
            }),
        }
    }

    /// The single value on `port`, rejected unless its declared kind matches `expected`.
    pub fn typed_input(
        &self,
        node: &NodeSpec,
        port: &str,
        expected: PortKind,
    ) -> Result<ExecutionValue, DomainError> {
        let value = self.input(node, port)?;
        if !expected.accepts(value.kind) {
            return Err(DomainError::TypeValidation {
                node: NodeRef::of(node),
                port: port.to_string(),
                expected,
                actual: value.kind,
            });
        }
        Ok(value)
    }

    pub fn output(&self, node_id: &str, port: &str) -> Option<&ExecutionValue> {
        self.outputs.get(node_id).and_then(|ports| ports.get(port))
    }

    /// Record the value published on `(node_id, port)`, replacing any earlier one.
    pub fn set_node_output(
        &mut self,
        node_id: &str,
        port: &str,
        kind: PortKind,
        data: Value,
        metadata: Metadata,
    ) {
        self.outputs
            .entry(node_id.to_string())
            .or_default()
            .insert(port.to_string(), ExecutionValue::new(kind, data, metadata));
    }

    /// Move the run's time cursor forward; it never moves back.
    pub fn advance_time(&mut self, time: f64) {
        if time > self.current_time {
            self.current_time = time;
        }
    }

    pub fn is_debug_target(&self, node_id: &str) -> bool {
        self.config.debug_target.as_deref() == Some(node_id)
    }

    pub fn record_debug(&mut self, entry: DebugEntry) {
        if self.is_debug_target(&entry.node_id) {
            self.debug_log.push(entry);
        }
    }

    /// Every object id currently published anywhere in the output table.
    pub fn id_snapshot(&self) -> IdSnapshot {
        let mut ids = HashSet::new();
        for value in self.outputs.values().flat_map(|ports| ports.values()) {
            match &value.data {
                Value::Objects(items) => {
                    ids.extend(items.iter().filter_map(|i| i.id()).map(str::to_string));
                }
                Value::Scene(scene) => {
                    ids.extend(scene.objects.iter().map(|o| o.id.clone()));
                }
                _ => {}
            }
        }
        IdSnapshot { ids }
    }

    pub(crate) fn into_parts(self) -> (OutputTable, Vec<SceneAnimationTrack>, f64, DebugLog) {
        (
            self.outputs,
            self.scene_animations,
            self.current_time,
            self.debug_log,
        )
    }
}
