use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared kind of a value published on a port.
///
/// `Any` is used by pass-through ports whose kind depends on what is connected.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PortKind {
    Number,
    Boolean,
    Text,
    Objects,
    Scene,
    Any,
}

impl PortKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PortKind::Number => "number",
            PortKind::Boolean => "boolean",
            PortKind::Text => "text",
            PortKind::Objects => "objects",
            PortKind::Scene => "scene",
            PortKind::Any => "any",
        }
    }

    /// `true` when a value declared as `actual` may be consumed by a port expecting `self`.
    pub fn accepts(&self, actual: PortKind) -> bool {
        matches!(self, PortKind::Any) || *self == actual
    }
}

impl fmt::Display for PortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
