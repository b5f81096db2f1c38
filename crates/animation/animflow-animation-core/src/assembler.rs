//! Scene assembler: authored tracks -> absolute-time scene animations.
//!
//! Property resolution is layered, later layers winning:
//! 1. the track's authored `properties`
//! 2. the object's assignments (`initial` paths for the track type, then the
//!    `tracks` entry whose `trackId` matches the track identifier)
//! 3. batch overrides registered under `"{trackType}.{propertyPath}"`, unless the field is
//!    covered by the object's bound-field set
//!
//! A track with no `from` property continues from the `to` of the latest earlier animation
//! of the same type on the object's path.

use animflow_api_core::{deep_merge, PropertyPath};
use serde_json::{Map, Value as JsonValue};

use crate::error::AssemblyError;
use crate::overrides::{BatchOverrides, BoundFields, ObjectAssignments, DEFAULT_BATCH_KEY};
use crate::track::{AnimationTrack, SceneAnimationTrack, TrackType};

/// Batch state for one object at assembly time.
#[derive(Clone, Copy, Debug, Default)]
pub struct BatchOverrideContext<'a> {
    /// Key of the replica being assembled; `None` when the object is not part of a batch
    /// replica, in which case only `default` entries apply.
    pub batch_key: Option<&'a str>,
    pub overrides: Option<&'a BatchOverrides>,
    pub bound_fields: Option<&'a BoundFields>,
}

pub fn convert_tracks_to_scene_animations(
    tracks: &[AnimationTrack],
    object_id: &str,
    baseline_time: f64,
    prior: &[SceneAnimationTrack],
    assignments: Option<&ObjectAssignments>,
    batch: Option<&BatchOverrideContext<'_>>,
) -> Result<Vec<SceneAnimationTrack>, AssemblyError> {
    let mut assembled: Vec<SceneAnimationTrack> = Vec::with_capacity(tracks.len());
    for track in tracks {
        let mut properties = match &track.properties {
            JsonValue::Object(_) => track.properties.clone(),
            JsonValue::Null => JsonValue::Object(Map::new()),
            _ => {
                return Err(AssemblyError::InvalidProperties {
                    track: track.identifier.clone(),
                })
            }
        };
        if let Some(assignments) = assignments {
            apply_assignments(track, &mut properties, assignments)?;
        }
        if let Some(ctx) = batch {
            apply_batch_layer(track.kind, &mut properties, ctx)?;
        }

        let start_time = baseline_time + track.start_time;
        let mut chained = false;
        if properties.get("from").map_or(true, JsonValue::is_null) {
            let history = prior.iter().chain(assembled.iter());
            if let Some(from) = continuation(history, track.kind, start_time, &properties) {
                PropertyPath::new(vec!["from".to_string()]).set(&mut properties, from);
                chained = true;
            }
        }

        assembled.push(SceneAnimationTrack {
            object_id: object_id.to_string(),
            identifier: track.identifier.clone(),
            kind: track.kind,
            start_time,
            duration: track.duration,
            easing: track.easing,
            properties,
            chained,
        });
    }
    Ok(assembled)
}

fn apply_assignments(
    track: &AnimationTrack,
    properties: &mut JsonValue,
    assignments: &ObjectAssignments,
) -> Result<(), AssemblyError> {
    for (field, value) in &assignments.initial {
        let path = PropertyPath::parse(field)?;
        if let Some((head, rest)) = path.split_first() {
            if head == track.kind.as_str() {
                rest.set(properties, value.clone());
            }
        }
    }
    for entry in assignments
        .tracks
        .iter()
        .filter(|entry| entry.track_id == track.identifier)
    {
        deep_merge(properties, &entry.properties);
    }
    Ok(())
}

/// Apply the batch layer for `kind` onto already-resolved `properties`.
pub fn apply_batch_layer(
    kind: TrackType,
    properties: &mut JsonValue,
    ctx: &BatchOverrideContext<'_>,
) -> Result<(), AssemblyError> {
    let Some(overrides) = ctx.overrides else {
        return Ok(());
    };
    for (field, values) in overrides {
        let path = PropertyPath::parse(field)?;
        let Some((head, rest)) = path.split_first() else {
            continue;
        };
        if head != kind.as_str() || is_bound(ctx.bound_fields, &path) {
            continue;
        }
        let value = ctx
            .batch_key
            .and_then(|key| values.get(key))
            .or_else(|| values.get(DEFAULT_BATCH_KEY));
        if let Some(value) = value {
            // Bound leaves inside the overridden structure keep their current values.
            let mut kept: Vec<(PropertyPath, JsonValue)> = Vec::new();
            for b in bound_below(ctx.bound_fields, &path) {
                let Some((_, local)) = b.split_first() else {
                    continue;
                };
                if let Some(current) = local.get(properties).cloned() {
                    kept.push((local, current));
                }
            }
            rest.set(properties, value.clone());
            for (local, current) in kept {
                local.set(properties, current);
            }
        }
    }
    Ok(())
}

fn bound_paths(bound: Option<&BoundFields>) -> impl Iterator<Item = PropertyPath> + '_ {
    bound
        .into_iter()
        .flatten()
        .filter_map(|f| PropertyPath::parse(f).ok())
}

fn is_bound(bound: Option<&BoundFields>, path: &PropertyPath) -> bool {
    bound_paths(bound).any(|b| b.covers(path))
}

/// Bound fields strictly inside `path`.
fn bound_below(bound: Option<&BoundFields>, path: &PropertyPath) -> Vec<PropertyPath> {
    bound_paths(bound)
        .filter(|b| path.covers(b) && b != path)
        .collect()
}

fn same_channel(kind: TrackType, a: &JsonValue, b: &JsonValue) -> bool {
    kind != TrackType::Color || a.get("property") == b.get("property")
}

pub(crate) fn continuation<'a>(
    history: impl Iterator<Item = &'a SceneAnimationTrack>,
    kind: TrackType,
    start_time: f64,
    properties: &JsonValue,
) -> Option<JsonValue> {
    history
        .filter(|prev| prev.kind == kind && prev.start_time <= start_time)
        .filter(|prev| same_channel(kind, &prev.properties, properties))
        .last()
        .and_then(|prev| prev.properties.get("to").cloned())
}

/// Truncate earlier animations in `history` that are still running when an incoming
/// animation of the same type (and colour channel) starts.
pub fn supersede_overlapping(
    history: &mut [SceneAnimationTrack],
    incoming: &[SceneAnimationTrack],
) {
    for next in incoming {
        for prev in history.iter_mut() {
            if prev.kind == next.kind
                && same_channel(next.kind, &prev.properties, &next.properties)
                && prev.start_time < next.start_time
                && prev.end_time() > next.start_time
            {
                prev.duration = next.start_time - prev.start_time;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn start_times_are_offset_by_baseline() {
        let tracks = vec![
            AnimationTrack::new("m", TrackType::Move, 2.0)
                .starting_at(0.5)
                .with_properties(json!({ "from": { "x": 0, "y": 0 }, "to": { "x": 1, "y": 1 } })),
            AnimationTrack::new("f", TrackType::Fade, 1.0)
                .with_properties(json!({ "from": 0, "to": 1 })),
        ];
        let out = convert_tracks_to_scene_animations(&tracks, "obj", 3.0, &[], None, None).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].start_time, 3.5);
        assert_eq!(out[0].end_time(), 5.5);
        assert_eq!(out[1].start_time, 3.0);
        assert!(out.iter().all(|a| a.object_id == "obj"));
    }

    #[test]
    fn missing_from_continues_previous_animation() {
        let first = AnimationTrack::new("m1", TrackType::Move, 1.0)
            .with_properties(json!({ "from": { "x": 0, "y": 0 }, "to": { "x": 5, "y": 0 } }));
        let prior = convert_tracks_to_scene_animations(&[first], "o", 0.0, &[], None, None).unwrap();

        let second = AnimationTrack::new("m2", TrackType::Move, 1.0)
            .with_properties(json!({ "to": { "x": 5, "y": 5 } }));
        let out = convert_tracks_to_scene_animations(&[second], "o", 1.0, &prior, None, None).unwrap();
        assert_eq!(out[0].properties["from"], json!({ "x": 5, "y": 0 }));
    }

    #[test]
    fn colour_continuation_stays_on_its_channel() {
        let fill = AnimationTrack::new("c1", TrackType::Color, 1.0)
            .with_properties(json!({ "property": "fill", "from": "#000000", "to": "#ff0000" }));
        let prior = convert_tracks_to_scene_animations(&[fill], "o", 0.0, &[], None, None).unwrap();
        let stroke = AnimationTrack::new("c2", TrackType::Color, 1.0)
            .with_properties(json!({ "property": "stroke", "to": "#00ff00" }));
        let out = convert_tracks_to_scene_animations(&[stroke], "o", 1.0, &prior, None, None).unwrap();
        assert!(out[0].properties.get("from").is_none());
    }

    #[test]
    fn non_object_properties_are_rejected() {
        let bad = AnimationTrack::new("x", TrackType::Rotate, 1.0).with_properties(json!(5));
        let err = convert_tracks_to_scene_animations(&[bad], "o", 0.0, &[], None, None)
            .expect_err("should fail");
        assert!(matches!(err, AssemblyError::InvalidProperties { .. }));
    }

    #[test]
    fn superseding_truncates_running_animation() {
        let a = AnimationTrack::new("r1", TrackType::Rotate, 4.0)
            .with_properties(json!({ "from": 0, "to": 90 }));
        let mut history = convert_tracks_to_scene_animations(&[a], "o", 0.0, &[], None, None).unwrap();
        let b = AnimationTrack::new("r2", TrackType::Rotate, 1.0)
            .starting_at(1.5)
            .with_properties(json!({ "to": 180 }));
        let incoming =
            convert_tracks_to_scene_animations(&[b], "o", 0.0, &history, None, None).unwrap();
        supersede_overlapping(&mut history, &incoming);
        assert_eq!(history[0].duration, 1.5);
        assert_eq!(incoming[0].properties["from"], json!(90));
    }
}
