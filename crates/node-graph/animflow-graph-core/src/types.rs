use animflow_animation_core::{AnimationTrack, BatchOverrides, ObjectAssignments};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

pub type NodeId = String;

fn default_output_port() -> String {
    "output".to_string()
}

fn default_input_port() -> String {
    "input".to_string()
}

/// A directed connection from one node's output port to another node's input port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EdgeSpec {
    pub source: NodeId,
    #[serde(default = "default_output_port")]
    pub source_port: String,
    pub target: NodeId,
    #[serde(default = "default_input_port")]
    pub target_port: String,
}

impl EdgeSpec {
    pub fn new(
        source: impl Into<NodeId>,
        source_port: impl Into<String>,
        target: impl Into<NodeId>,
        target_port: impl Into<String>,
    ) -> Self {
        EdgeSpec {
            source: source.into(),
            source_port: source_port.into(),
            target: target.into(),
            target_port: target_port.into(),
        }
    }
}

/// Reference to another node's published output, used to bind configuration fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    pub node_id: NodeId,
    #[serde(default = "default_output_port")]
    pub port: String,
}

impl Binding {
    pub fn to(node_id: impl Into<NodeId>) -> Self {
        Binding {
            node_id: node_id.into(),
            port: default_output_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShapeSpec {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub object_type: String,
    #[serde(default)]
    pub properties: Map<String, JsonValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct GeometryParams {
    pub shapes: Vec<ShapeSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct InsertParams {
    pub appearance_time: Option<f64>,
    pub appearance_times: IndexMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AnimationParams {
    pub tracks: Vec<AnimationTrack>,
    /// Node-local assignments, keyed by object id.
    pub assignments: IndexMap<String, ObjectAssignments>,
    /// `fieldPath -> binding`, applied to every object.
    pub bindings: IndexMap<String, Binding>,
    /// `objectId -> fieldPath -> binding`, overriding `bindings`.
    pub bindings_by_object: IndexMap<String, IndexMap<String, Binding>>,
    pub batch_overrides: IndexMap<String, BatchOverrides>,
}

fn default_input_count() -> usize {
    2
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MergeParams {
    #[serde(default = "default_input_count")]
    pub input_count: usize,
}

impl Default for MergeParams {
    fn default() -> Self {
        MergeParams {
            input_count: default_input_count(),
        }
    }
}

fn default_duplicate_count() -> i64 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateParams {
    #[serde(default = "default_duplicate_count")]
    pub count: i64,
}

impl Default for DuplicateParams {
    fn default() -> Self {
        DuplicateParams {
            count: default_duplicate_count(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterParams {
    pub object_ids: Vec<String>,
}

/// Batch key sources, in precedence order: per-object binding, global binding, the literal
/// `key`, then the legacy `keys` list.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchParams {
    pub bindings_by_object: IndexMap<String, Binding>,
    pub binding: Option<Binding>,
    pub key: Option<String>,
    pub keys: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ConstantValue {
    Number(f64),
    Boolean(bool),
    Text(String),
}

impl Default for ConstantValue {
    fn default() -> Self {
        ConstantValue::Number(0.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ConstantParams {
    pub value: ConstantValue,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ResultParams {
    pub label: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CompareOp {
    Gt,
    Lt,
    Eq,
    Neq,
    Gte,
    Lte,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BooleanOp {
    And,
    Or,
    Xor,
    Not,
}

impl BooleanOp {
    pub fn is_unary(&self) -> bool {
        matches!(self, BooleanOp::Not)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MathOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
    Min,
    Max,
    Sqrt,
    Abs,
}

impl MathOp {
    pub fn is_unary(&self) -> bool {
        matches!(self, MathOp::Sqrt | MathOp::Abs)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MathOp::Add => "add",
            MathOp::Subtract => "subtract",
            MathOp::Multiply => "multiply",
            MathOp::Divide => "divide",
            MathOp::Modulo => "modulo",
            MathOp::Power => "power",
            MathOp::Min => "min",
            MathOp::Max => "max",
            MathOp::Sqrt => "sqrt",
            MathOp::Abs => "abs",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompareParams {
    pub operator: CompareOp,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BooleanParams {
    pub operator: BooleanOp,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MathParams {
    pub operator: MathOp,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct IfElseParams {}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SceneParams {}

/// The closed set of node kinds, each with its own typed configuration.
///
/// JSON form: `{ "type": "merge", "params": { "inputCount": 3 } }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "params", rename_all = "snake_case")]
pub enum NodeKind {
    Geometry(GeometryParams),
    Insert(InsertParams),
    Animation(AnimationParams),
    Merge(MergeParams),
    Duplicate(DuplicateParams),
    Filter(FilterParams),
    Batch(BatchParams),
    Constant(ConstantParams),
    Result(ResultParams),
    Compare(CompareParams),
    IfElse(IfElseParams),
    Boolean(BooleanParams),
    Math(MathParams),
    Scene(SceneParams),
}

impl NodeKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Geometry(_) => "geometry",
            NodeKind::Insert(_) => "insert",
            NodeKind::Animation(_) => "animation",
            NodeKind::Merge(_) => "merge",
            NodeKind::Duplicate(_) => "duplicate",
            NodeKind::Filter(_) => "filter",
            NodeKind::Batch(_) => "batch",
            NodeKind::Constant(_) => "constant",
            NodeKind::Result(_) => "result",
            NodeKind::Compare(_) => "compare",
            NodeKind::IfElse(_) => "if_else",
            NodeKind::Boolean(_) => "boolean",
            NodeKind::Math(_) => "math",
            NodeKind::Scene(_) => "scene",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeSpec {
    pub id: NodeId,
    /// Display name used in error messages; defaults to the id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl NodeSpec {
    pub fn new(id: impl Into<NodeId>, kind: NodeKind) -> Self {
        NodeSpec {
            id: id.into(),
            name: None,
            kind,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Every binding declared on this node. Bound nodes must be evaluated first even though
    /// no edge connects them.
    pub fn bindings(&self) -> Vec<&Binding> {
        match &self.kind {
            NodeKind::Animation(params) => params
                .bindings
                .values()
                .chain(params.bindings_by_object.values().flat_map(|m| m.values()))
                .collect(),
            NodeKind::Batch(params) => params
                .binding
                .iter()
                .chain(params.bindings_by_object.values())
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GraphSpec {
    pub nodes: Vec<NodeSpec>,
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
}

impl GraphSpec {
    pub fn from_json(json: &str) -> Result<Self, crate::error::GraphError> {
        serde_json::from_str(json).map_err(|e| crate::error::GraphError::Decode(e.to_string()))
    }

    pub fn node(&self, id: &str) -> Option<&NodeSpec> {
        self.nodes.iter().find(|n| n.id == id)
    }
}
