use serde::{Deserialize, Serialize};

use crate::types::NodeId;

/// Bounds enforced by duplicate nodes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct DuplicateLimits {
    /// Requested counts above this are clamped.
    pub max_count_per_object: usize,
    /// Upper bound on `input objects x count`; exceeding it is an error.
    pub max_total_objects: usize,
}

impl Default for DuplicateLimits {
    fn default() -> Self {
        DuplicateLimits {
            max_count_per_object: 50,
            max_total_objects: 200,
        }
    }
}

/// Per-run configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RunConfig {
    /// Node whose results are captured in the debug log. `None` disables capture.
    pub debug_target: Option<NodeId>,
    pub limits: DuplicateLimits,
    /// Maximum number of ids listed in an error message before the rest are summarised.
    pub error_list_cap: usize,
    /// Items/keys shown when formatting arrays and objects for the debug log.
    pub preview_items: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            debug_target: None,
            limits: DuplicateLimits::default(),
            error_list_cap: 10,
            preview_items: 3,
        }
    }
}

impl RunConfig {
    pub fn with_debug_target(mut self, node: impl Into<NodeId>) -> Self {
        self.debug_target = Some(node.into());
        self
    }
}
