//! Typed scene transforms built from assembled animations, and time sampling.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::easing::Easing;
use crate::error::AssemblyError;
use crate::track::{SceneAnimationTrack, TrackType};

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorProperty {
    #[default]
    Fill,
    Stroke,
}

/// Start/end values of one animation. `from` is `None` when the animation starts from
/// whatever state the renderer holds for the object.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SceneTransform {
    Move {
        from: Option<Point>,
        to: Point,
    },
    Rotate {
        from: Option<f64>,
        to: f64,
    },
    Scale {
        from: Option<f64>,
        to: f64,
    },
    Fade {
        from: Option<f64>,
        to: f64,
    },
    Color {
        property: ColorProperty,
        from: Option<String>,
        to: String,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum SampledValue {
    Point(Point),
    Number(f64),
    Color(String),
}

/// A transform placed on the scene timeline.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimedTransform {
    pub object_id: String,
    pub start_time: f64,
    pub duration: f64,
    pub easing: Easing,
    pub transform: SceneTransform,
}

impl TimedTransform {
    /// Eased progress in [0, 1] at absolute scene time `time`.
    pub fn progress(&self, time: f64) -> f64 {
        if self.duration <= 0.0 {
            return if time >= self.start_time { 1.0 } else { 0.0 };
        }
        let u = ((time - self.start_time) / self.duration).clamp(0.0, 1.0);
        self.easing.apply(u)
    }

    /// Value at absolute scene time `time`. Returns `None` while the animation is running
    /// and has no explicit start value.
    pub fn sample(&self, time: f64) -> Option<SampledValue> {
        let p = self.progress(time);
        let done = p >= 1.0 && time >= self.start_time;
        match &self.transform {
            SceneTransform::Move { from, to } => match from {
                Some(from) => Some(SampledValue::Point(Point {
                    x: lerp(from.x, to.x, p),
                    y: lerp(from.y, to.y, p),
                })),
                None => done.then_some(SampledValue::Point(*to)),
            },
            SceneTransform::Rotate { from, to }
            | SceneTransform::Scale { from, to }
            | SceneTransform::Fade { from, to } => match from {
                Some(from) => Some(SampledValue::Number(lerp(*from, *to, p))),
                None => done.then_some(SampledValue::Number(*to)),
            },
            SceneTransform::Color { from, to, .. } => match from {
                Some(from) => Some(SampledValue::Color(lerp_hex(from, to, p))),
                None => done.then(|| SampledValue::Color(to.clone())),
            },
        }
    }
}

/// Builds typed transforms from assembled animations.
pub trait TransformFactory {
    fn create(&self, anim: &SceneAnimationTrack) -> Result<TimedTransform, AssemblyError>;
}

/// Factory covering every [`TrackType`].
///
/// Expected properties: `move` `{from?: {x,y}, to: {x,y}}`; `rotate`/`scale`/`fade`
/// `{from?: number, to: number}`; `color` `{property?: "fill"|"stroke", from?: "#rrggbb", to}`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultTransformFactory;

impl TransformFactory for DefaultTransformFactory {
    fn create(&self, anim: &SceneAnimationTrack) -> Result<TimedTransform, AssemblyError> {
        let props = &anim.properties;
        let transform = match anim.kind {
            TrackType::Move => SceneTransform::Move {
                from: optional(anim, props, "from", read_point)?,
                to: required(anim, props, "to", read_point)?,
            },
            TrackType::Rotate => SceneTransform::Rotate {
                from: optional(anim, props, "from", read_number)?,
                to: required(anim, props, "to", read_number)?,
            },
            TrackType::Scale => SceneTransform::Scale {
                from: optional(anim, props, "from", read_number)?,
                to: required(anim, props, "to", read_number)?,
            },
            TrackType::Fade => SceneTransform::Fade {
                from: optional(anim, props, "from", read_number)?,
                to: required(anim, props, "to", read_number)?,
            },
            TrackType::Color => SceneTransform::Color {
                property: optional(anim, props, "property", read_color_property)?
                    .unwrap_or_default(),
                from: optional(anim, props, "from", read_string)?,
                to: required(anim, props, "to", read_string)?,
            },
        };
        Ok(TimedTransform {
            object_id: anim.object_id.clone(),
            start_time: anim.start_time,
            duration: anim.duration,
            easing: anim.easing,
            transform,
        })
    }
}

type Reader<T> = fn(&JsonValue) -> Option<T>;

fn optional<T>(
    anim: &SceneAnimationTrack,
    props: &JsonValue,
    property: &'static str,
    read: Reader<T>,
) -> Result<Option<T>, AssemblyError> {
    match props.get(property) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(raw) => read(raw)
            .map(Some)
            .ok_or_else(|| type_error(anim, property)),
    }
}

fn required<T>(
    anim: &SceneAnimationTrack,
    props: &JsonValue,
    property: &'static str,
    read: Reader<T>,
) -> Result<T, AssemblyError> {
    optional(anim, props, property, read)?.ok_or_else(|| AssemblyError::MissingProperty {
        track: anim.identifier.clone(),
        kind: anim.kind.as_str(),
        property,
    })
}

fn type_error(anim: &SceneAnimationTrack, property: &'static str) -> AssemblyError {
    let expected = match (anim.kind, property) {
        (TrackType::Move, _) => "a point {x, y}",
        (TrackType::Color, "property") => "\"fill\" or \"stroke\"",
        (TrackType::Color, _) => "a colour string",
        _ => "a number",
    };
    AssemblyError::InvalidPropertyType {
        track: anim.identifier.clone(),
        property,
        expected,
    }
}

fn read_number(v: &JsonValue) -> Option<f64> {
    v.as_f64()
}

fn read_string(v: &JsonValue) -> Option<String> {
    v.as_str().map(str::to_string)
}

fn read_point(v: &JsonValue) -> Option<Point> {
    Some(Point {
        x: v.get("x")?.as_f64()?,
        y: v.get("y")?.as_f64()?,
    })
}

fn read_color_property(v: &JsonValue) -> Option<ColorProperty> {
    serde_json::from_value(v.clone()).ok()
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn parse_hex(s: &str) -> Option<[u8; 3]> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

/// Blend two `#rrggbb` colours; non-hex colours switch from `a` to `b` at completion.
fn lerp_hex(a: &str, b: &str, t: f64) -> String {
    match (parse_hex(a), parse_hex(b)) {
        (Some(ca), Some(cb)) => {
            let mix = |i: usize| lerp(ca[i] as f64, cb[i] as f64, t).round() as u8;
            format!("#{:02x}{:02x}{:02x}", mix(0), mix(1), mix(2))
        }
        _ if t >= 1.0 => b.to_string(),
        _ => a.to_string(),
    }
}
