use animflow_animation_core::{
    convert_tracks_to_scene_animations, AnimationTrack, BatchOverrideContext, BatchOverrides,
    BoundFields, ObjectAssignments, TrackType,
};
use serde_json::{json, Value as JsonValue};

// Track value X = 1, assignment Y = 2, batch override { A: 3, default: 4 }.
fn fade_track() -> AnimationTrack {
    AnimationTrack::new("fade-1", TrackType::Fade, 1.0).with_properties(json!({ "from": 0, "to": 1 }))
}

fn assignment() -> ObjectAssignments {
    serde_json::from_value(json!({ "initial": { "fade.to": 2 } })).unwrap()
}

fn overrides() -> BatchOverrides {
    serde_json::from_value(json!({ "fade.to": { "A": 3, "default": 4 } })).unwrap()
}

fn resolve(
    key: Option<&str>,
    assignments: Option<&ObjectAssignments>,
    bound: Option<&BoundFields>,
) -> JsonValue {
    let overrides = overrides();
    let ctx = BatchOverrideContext {
        batch_key: key,
        overrides: Some(&overrides),
        bound_fields: bound,
    };
    let out = convert_tracks_to_scene_animations(
        &[fade_track()],
        "obj",
        0.0,
        &[],
        assignments,
        Some(&ctx),
    )
    .expect("assembly succeeds");
    out[0].properties["to"].clone()
}

#[test]
fn batch_key_value_wins_over_assignment_and_track() {
    assert_eq!(resolve(Some("A"), Some(&assignment()), None), json!(3));
}

#[test]
fn absent_batch_key_falls_back_to_default() {
    assert_eq!(resolve(Some("B"), Some(&assignment()), None), json!(4));
    assert_eq!(resolve(None, Some(&assignment()), None), json!(4));
}

#[test]
fn bound_field_skips_batch_layer() {
    let bound: BoundFields = ["fade.to".to_string()].into_iter().collect();
    assert_eq!(resolve(Some("A"), Some(&assignment()), Some(&bound)), json!(2));
    assert_eq!(resolve(Some("B"), None, Some(&bound)), json!(1));
}

#[test]
fn bound_parent_structure_masks_leaf_overrides() {
    let track = AnimationTrack::new("m", TrackType::Move, 1.0)
        .with_properties(json!({ "to": { "x": 1, "y": 1 } }));
    let overrides: BatchOverrides =
        serde_json::from_value(json!({ "move.to.x": { "A": 50 }, "move.from": { "A": { "x": 7, "y": 7 } } }))
            .unwrap();
    let bound: BoundFields = ["move.to".to_string()].into_iter().collect();
    let ctx = BatchOverrideContext {
        batch_key: Some("A"),
        overrides: Some(&overrides),
        bound_fields: Some(&bound),
    };
    let out = convert_tracks_to_scene_animations(&[track], "o", 0.0, &[], None, Some(&ctx)).unwrap();
    assert_eq!(out[0].properties["to"], json!({ "x": 1, "y": 1 }));
    assert_eq!(out[0].properties["from"], json!({ "x": 7, "y": 7 }));
}

#[test]
fn structure_override_keeps_bound_leaf() {
    let track = AnimationTrack::new("m", TrackType::Move, 1.0)
        .with_properties(json!({ "to": { "x": 1, "y": 1 } }));
    let overrides: BatchOverrides =
        serde_json::from_value(json!({ "move.to": { "A": { "x": 9, "y": 9 } } })).unwrap();
    let bound: BoundFields = ["move.to.x".to_string()].into_iter().collect();
    let ctx = BatchOverrideContext {
        batch_key: Some("A"),
        overrides: Some(&overrides),
        bound_fields: Some(&bound),
    };
    let out = convert_tracks_to_scene_animations(&[track], "o", 0.0, &[], None, Some(&ctx)).unwrap();
    assert_eq!(out[0].properties["to"], json!({ "x": 1, "y": 9 }));
}

#[test]
fn track_specific_assignment_applies_after_initial() {
    let assignments: ObjectAssignments = serde_json::from_value(json!({
        "initial": { "fade.to": 0.5 },
        "tracks": [{ "trackId": "fade-1", "properties": { "to": 0.75 } }]
    }))
    .unwrap();
    let out = convert_tracks_to_scene_animations(
        &[fade_track()],
        "obj",
        0.0,
        &[],
        Some(&assignments),
        None,
    )
    .unwrap();
    assert_eq!(out[0].properties["to"], json!(0.75));
}

#[test]
fn overrides_for_other_track_types_are_ignored() {
    let overrides: BatchOverrides =
        serde_json::from_value(json!({ "rotate.to": { "default": 45 } })).unwrap();
    let ctx = BatchOverrideContext {
        batch_key: None,
        overrides: Some(&overrides),
        bound_fields: None,
    };
    let out =
        convert_tracks_to_scene_animations(&[fade_track()], "obj", 0.0, &[], None, Some(&ctx)).unwrap();
    assert_eq!(out[0].properties, json!({ "from": 0, "to": 1 }));
}
