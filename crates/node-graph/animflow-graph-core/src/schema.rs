//! Port registry: which ports each node kind declares, and graph validation against it.

use animflow_api_core::PortKind;
use hashbrown::HashSet;
use serde::Serialize;

use crate::error::GraphError;
use crate::types::{GraphSpec, NodeKind, NodeSpec};

#[derive(Debug, Clone, Serialize)]
pub struct PortSpec {
    pub id: &'static str,
    pub kind: PortKind,
    pub label: &'static str,
    pub doc: &'static str,
    pub optional: bool,
}

/// Numbered ports `{prefix}1..{prefix}N`, as used by merge nodes.
#[derive(Debug, Clone, Serialize)]
pub struct VariadicSpec {
    pub prefix: &'static str,
    pub kind: PortKind,
    pub label: &'static str,
    pub min: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeSignature {
    pub type_id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub inputs: Vec<PortSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variadic_inputs: Option<VariadicSpec>,
    pub outputs: Vec<PortSpec>,
}

impl NodeSignature {
    pub fn output(&self, port: &str) -> Option<&PortSpec> {
        self.outputs.iter().find(|p| p.id == port)
    }

    pub fn input(&self, port: &str) -> Option<&PortSpec> {
        self.inputs.iter().find(|p| p.id == port)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Registry {
    pub version: &'static str,
    pub nodes: Vec<NodeSignature>,
}

impl Registry {
    pub fn get(&self, type_id: &str) -> Option<&NodeSignature> {
        self.nodes.iter().find(|n| n.type_id == type_id)
    }
}

fn port(id: &'static str, kind: PortKind, label: &'static str, doc: &'static str) -> PortSpec {
    PortSpec {
        id,
        kind,
        label,
        doc,
        optional: false,
    }
}

fn objects_in() -> PortSpec {
    port("input", PortKind::Objects, "Objects", "")
}

fn objects_out() -> PortSpec {
    port("output", PortKind::Objects, "Objects", "")
}

fn object_node(
    type_id: &'static str,
    name: &'static str,
    inputs: Vec<PortSpec>,
    outputs: Vec<PortSpec>,
) -> NodeSignature {
    NodeSignature {
        type_id,
        name,
        category: "Objects",
        inputs,
        variadic_inputs: None,
        outputs,
    }
}

fn logic_node(
    type_id: &'static str,
    name: &'static str,
    inputs: Vec<PortSpec>,
    outputs: Vec<PortSpec>,
) -> NodeSignature {
    NodeSignature {
        type_id,
        name,
        category: "Logic",
        inputs,
        variadic_inputs: None,
        outputs,
    }
}

pub fn registry() -> Registry {
    let mut nodes = Vec::new();

    nodes.push(object_node(
        "geometry",
        "Geometry",
        vec![],
        vec![port(
            "output",
            PortKind::Objects,
            "Objects",
            "One scene object per configured shape.",
        )],
    ));
    nodes.push(object_node(
        "insert",
        "Insert",
        vec![objects_in()],
        vec![objects_out()],
    ));
    nodes.push(object_node(
        "animation",
        "Animation",
        vec![objects_in()],
        vec![port(
            "output",
            PortKind::Objects,
            "Objects",
            "Input objects unchanged; animations travel in metadata.",
        )],
    ));
    nodes.push(NodeSignature {
        type_id: "merge",
        name: "Merge",
        category: "Objects",
        inputs: vec![],
        variadic_inputs: Some(VariadicSpec {
            prefix: "input",
            kind: PortKind::Objects,
            label: "Input",
            min: 1,
            max: None,
        }),
        outputs: vec![port(
            "output",
            PortKind::Objects,
            "Objects",
            "Union by id; the lowest-numbered port wins collisions.",
        )],
    });
    nodes.push(object_node(
        "duplicate",
        "Duplicate",
        vec![objects_in()],
        vec![objects_out()],
    ));
    nodes.push(object_node(
        "filter",
        "Filter",
        vec![PortSpec {
            optional: true,
            ..objects_in()
        }],
        vec![objects_out()],
    ));
    nodes.push(object_node(
        "batch",
        "Batch",
        vec![PortSpec {
            optional: true,
            ..objects_in()
        }],
        vec![objects_out()],
    ));
    nodes.push(object_node(
        "scene",
        "Scene",
        vec![objects_in()],
        vec![port(
            "scene",
            PortKind::Scene,
            "Scene",
            "Assembled scene ready for partitioning and rendering.",
        )],
    ));

    // Data nodes
    nodes.push(NodeSignature {
        type_id: "constant",
        name: "Constant",
        category: "Data",
        inputs: vec![],
        variadic_inputs: None,
        outputs: vec![port("output", PortKind::Any, "Value", "")],
    });
    nodes.push(NodeSignature {
        type_id: "result",
        name: "Result",
        category: "Data",
        inputs: vec![PortSpec {
            optional: true,
            ..port("input", PortKind::Any, "Value", "At most one connection.")
        }],
        variadic_inputs: None,
        outputs: vec![port("output", PortKind::Any, "Value", "Input passed through.")],
    });

    // Logic
    nodes.push(logic_node(
        "compare",
        "Compare",
        vec![
            port("a", PortKind::Number, "A", ""),
            port("b", PortKind::Number, "B", ""),
        ],
        vec![port("result", PortKind::Boolean, "Result", "")],
    ));
    nodes.push(logic_node(
        "if_else",
        "If / Else",
        vec![
            port("condition", PortKind::Boolean, "Condition", ""),
            port("data", PortKind::Any, "Data", "Routed to exactly one output."),
        ],
        vec![
            port("true", PortKind::Any, "True", ""),
            port("false", PortKind::Any, "False", ""),
        ],
    ));
    nodes.push(logic_node(
        "boolean",
        "Boolean",
        vec![
            port("a", PortKind::Boolean, "A", ""),
            PortSpec {
                optional: true,
                ..port("b", PortKind::Boolean, "B", "Unused by `not`.")
            },
        ],
        vec![port("result", PortKind::Boolean, "Result", "")],
    ));
    nodes.push(logic_node(
        "math",
        "Math",
        vec![
            port("a", PortKind::Number, "A", ""),
            PortSpec {
                optional: true,
                ..port("b", PortKind::Number, "B", "Unused by `sqrt` and `abs`.")
            },
        ],
        vec![port("result", PortKind::Number, "Result", "")],
    ));

    Registry {
        version: "1.0.0",
        nodes,
    }
}

/// Whether `port` names an input of `node`, honouring a merge node's configured count.
fn has_input(sig: &NodeSignature, node: &NodeSpec, port: &str) -> bool {
    if sig.input(port).is_some() {
        return true;
    }
    let (Some(variadic), NodeKind::Merge(params)) = (&sig.variadic_inputs, &node.kind) else {
        return false;
    };
    port.strip_prefix(variadic.prefix)
        .and_then(|n| n.parse::<usize>().ok())
        .is_some_and(|n| n >= 1 && n <= params.input_count)
}

fn signature<'r>(registry: &'r Registry, node: &NodeSpec) -> Result<&'r NodeSignature, GraphError> {
    registry
        .get(node.kind.type_name())
        .ok_or_else(|| GraphError::UnknownNode {
            referrer: format!("registry v{}", registry.version),
            node: node.id.clone(),
        })
}

/// Structural checks run before evaluation: unique ids, known edge/binding endpoints and
/// declared ports.
pub fn validate_graph(spec: &GraphSpec) -> Result<(), GraphError> {
    let registry = registry();
    let mut seen = HashSet::new();
    for node in &spec.nodes {
        if !seen.insert(node.id.as_str()) {
            return Err(GraphError::DuplicateNode(node.id.clone()));
        }
    }

    for edge in &spec.edges {
        let referrer = format!("edge {} -> {}", edge.source, edge.target);
        let source = spec.node(&edge.source).ok_or_else(|| GraphError::UnknownNode {
            referrer: referrer.clone(),
            node: edge.source.clone(),
        })?;
        let target = spec.node(&edge.target).ok_or_else(|| GraphError::UnknownNode {
            referrer,
            node: edge.target.clone(),
        })?;
        if signature(&registry, source)?.output(&edge.source_port).is_none() {
            return Err(GraphError::UnknownPort {
                node: source.id.clone(),
                kind: source.kind.type_name(),
                direction: "output",
                port: edge.source_port.clone(),
            });
        }
        if !has_input(signature(&registry, target)?, target, &edge.target_port) {
            return Err(GraphError::UnknownPort {
                node: target.id.clone(),
                kind: target.kind.type_name(),
                direction: "input",
                port: edge.target_port.clone(),
            });
        }
    }

    for node in &spec.nodes {
        for binding in node.bindings() {
            let bound = spec
                .node(&binding.node_id)
                .ok_or_else(|| GraphError::UnknownNode {
                    referrer: format!("binding on {}", node.id),
                    node: binding.node_id.clone(),
                })?;
            if signature(&registry, bound)?.output(&binding.port).is_none() {
                return Err(GraphError::UnknownPort {
                    node: bound.id.clone(),
                    kind: bound.kind.type_name(),
                    direction: "output",
                    port: binding.port.clone(),
                });
            }
        }
    }
    Ok(())
}
