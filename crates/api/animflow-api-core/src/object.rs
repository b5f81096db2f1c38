//! Scene objects and the items that flow through object streams.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

fn is_false(v: &bool) -> bool {
    !*v
}

/// An identified scene object. Only these participate in per-object metadata tracking.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SceneObject {
    pub id: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    /// Time at which the object first appears in the scene.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appearance_time: Option<f64>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub batch: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub batch_keys: Vec<String>,
    /// Remaining authored properties (position, colours, ...), carried verbatim.
    #[serde(flatten)]
    pub properties: Map<String, JsonValue>,
}

impl SceneObject {
    pub fn new(id: impl Into<String>) -> Self {
        SceneObject {
            id: id.into(),
            object_type: None,
            appearance_time: None,
            batch: false,
            batch_keys: Vec::new(),
            properties: Map::new(),
        }
    }

    pub fn with_type(mut self, object_type: impl Into<String>) -> Self {
        self.object_type = Some(object_type.into());
        self
    }

    /// `true` when this object was tagged by a batch node and carries at least one key.
    pub fn is_batched(&self) -> bool {
        self.batch && !self.batch_keys.is_empty()
    }
}

/// One entry of an object stream: either an identified object or an opaque payload
/// that is carried along without per-object bookkeeping.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Item {
    Object(SceneObject),
    Raw(JsonValue),
}

impl Item {
    pub fn id(&self) -> Option<&str> {
        match self {
            Item::Object(obj) => Some(obj.id.as_str()),
            Item::Raw(_) => None,
        }
    }

    pub fn as_object(&self) -> Option<&SceneObject> {
        match self {
            Item::Object(obj) => Some(obj),
            Item::Raw(_) => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut SceneObject> {
        match self {
            Item::Object(obj) => Some(obj),
            Item::Raw(_) => None,
        }
    }
}

impl From<SceneObject> for Item {
    fn from(obj: SceneObject) -> Self {
        Item::Object(obj)
    }
}
