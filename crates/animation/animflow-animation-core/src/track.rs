//! Authored and assembled animation tracks.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt;

use crate::easing::Easing;

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum TrackType {
    Move,
    Rotate,
    Scale,
    Fade,
    Color,
}

impl TrackType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackType::Move => "move",
            TrackType::Rotate => "rotate",
            TrackType::Scale => "scale",
            TrackType::Fade => "fade",
            TrackType::Color => "color",
        }
    }
}

impl fmt::Display for TrackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn empty_properties() -> JsonValue {
    JsonValue::Object(Map::new())
}

/// A track as authored on an animation node. `start_time` is relative to the object's
/// baseline (its time cursor on the current path).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnimationTrack {
    pub identifier: String,
    #[serde(rename = "type")]
    pub kind: TrackType,
    #[serde(default)]
    pub start_time: f64,
    pub duration: f64,
    #[serde(default)]
    pub easing: Easing,
    #[serde(default = "empty_properties")]
    pub properties: JsonValue,
}

impl AnimationTrack {
    pub fn new(identifier: impl Into<String>, kind: TrackType, duration: f64) -> Self {
        AnimationTrack {
            identifier: identifier.into(),
            kind,
            start_time: 0.0,
            duration,
            easing: Easing::default(),
            properties: empty_properties(),
        }
    }

    pub fn starting_at(mut self, start_time: f64) -> Self {
        self.start_time = start_time;
        self
    }

    pub fn with_properties(mut self, properties: JsonValue) -> Self {
        self.properties = properties;
        self
    }
}

/// A fully resolved animation with an absolute start time, bound to one object.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SceneAnimationTrack {
    pub object_id: String,
    pub identifier: String,
    #[serde(rename = "type")]
    pub kind: TrackType,
    pub start_time: f64,
    pub duration: f64,
    pub easing: Easing,
    pub properties: JsonValue,
    /// `from` was taken from the previous animation of the same type rather than authored.
    #[serde(default, skip_serializing_if = "is_false")]
    pub chained: bool,
}

fn is_false(v: &bool) -> bool {
    !*v
}

impl SceneAnimationTrack {
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }
}
