use animflow_animation_core::{
    convert_tracks_to_scene_animations, partition_by_batch_key, AnimationTrack, AssembledScene,
    BatchOverrideContext, BatchOverrides, DefaultTransformFactory, Easing, SceneAnimationTrack,
    TrackType,
};
use animflow_api_core::SceneObject;
use indexmap::IndexMap;
use serde_json::json;

fn batched(id: &str, keys: &[&str]) -> SceneObject {
    let mut obj = SceneObject::new(id).with_type("circle");
    obj.batch = true;
    obj.batch_keys = keys.iter().map(|k| k.to_string()).collect();
    obj
}

fn fade(object_id: &str, to: f64) -> SceneAnimationTrack {
    SceneAnimationTrack {
        object_id: object_id.into(),
        identifier: "fade".into(),
        kind: TrackType::Fade,
        start_time: 0.0,
        duration: 1.0,
        easing: Easing::Linear,
        properties: json!({ "from": 0, "to": to }),
        chained: false,
    }
}

#[test]
fn scene_without_batches_is_a_single_partition() {
    let scene = AssembledScene {
        objects: vec![SceneObject::new("a"), SceneObject::new("b")],
        animations: vec![fade("a", 1.0)],
        duration: 1.0,
        ..Default::default()
    };
    let parts = partition_by_batch_key(&scene).unwrap();
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].batch_key, None);
    assert_eq!(parts[0].objects, scene.objects);
    assert_eq!(parts[0].animations, scene.animations);
}

#[test]
fn partitions_share_plain_objects_and_split_batched_ones() {
    let scene = AssembledScene {
        objects: vec![
            SceneObject::new("background"),
            batched("x", &["beta"]),
            batched("y", &["alpha", "beta"]),
        ],
        animations: vec![fade("background", 1.0), fade("x", 1.0), fade("y", 1.0)],
        duration: 1.0,
        ..Default::default()
    };
    let parts = partition_by_batch_key(&scene).unwrap();
    let keys: Vec<_> = parts.iter().map(|p| p.batch_key.clone()).collect();
    assert_eq!(keys, vec![Some("alpha".to_string()), Some("beta".to_string())]);

    let ids = |i: usize| -> Vec<&str> { parts[i].objects.iter().map(|o| o.id.as_str()).collect() };
    assert_eq!(ids(0), vec!["background", "y"]);
    assert_eq!(ids(1), vec!["background", "x", "y"]);
    assert_eq!(parts[0].animations.len(), 2);
    assert_eq!(parts[1].animations.len(), 3);
}

#[test]
fn batched_animations_are_resolved_per_key() {
    let mut batch_overrides = IndexMap::new();
    let per_object: BatchOverrides =
        serde_json::from_value(json!({ "fade.to": { "alpha": 0.1, "default": 0.9 } })).unwrap();
    batch_overrides.insert("y".to_string(), per_object);

    let scene = AssembledScene {
        objects: vec![batched("y", &["alpha", "beta"])],
        animations: vec![fade("y", 0.9)],
        batch_overrides,
        duration: 1.0,
        ..Default::default()
    };
    let parts = partition_by_batch_key(&scene).unwrap();
    assert_eq!(parts[0].animations[0].properties["to"], json!(0.1));
    assert_eq!(parts[1].animations[0].properties["to"], json!(0.9));

    let transforms = scene.transforms(&DefaultTransformFactory).unwrap();
    assert_eq!(transforms.len(), 1);
}

#[test]
fn chained_from_follows_the_partition_resolution() {
    let first = AnimationTrack::new("m1", TrackType::Move, 1.0)
        .with_properties(json!({ "from": { "x": 0, "y": 0 }, "to": { "x": 0, "y": 0 } }));
    let second = AnimationTrack::new("m2", TrackType::Move, 1.0)
        .starting_at(1.0)
        .with_properties(json!({ "to": { "x": 20, "y": 0 } }));
    let overrides: BatchOverrides =
        serde_json::from_value(json!({ "move.to.x": { "A": 10, "default": 0 } })).unwrap();
    let batch = BatchOverrideContext {
        batch_key: None,
        overrides: Some(&overrides),
        bound_fields: None,
    };
    let animations =
        convert_tracks_to_scene_animations(&[first], "y", 0.0, &[], None, Some(&batch)).unwrap();
    let chained =
        convert_tracks_to_scene_animations(&[second], "y", 0.0, &animations, None, None).unwrap();
    assert!(chained[0].chained);
    assert_eq!(chained[0].properties["from"], json!({ "x": 0, "y": 0 }));

    let mut batch_overrides = IndexMap::new();
    batch_overrides.insert("y".to_string(), overrides.clone());
    let scene = AssembledScene {
        objects: vec![batched("y", &["A"])],
        animations: animations.into_iter().chain(chained).collect(),
        batch_overrides,
        duration: 2.0,
        ..Default::default()
    };
    let parts = partition_by_batch_key(&scene).unwrap();
    let anims = &parts[0].animations;
    assert_eq!(anims[0].properties["to"], json!({ "x": 10, "y": 0 }));
    assert_eq!(anims[1].properties["from"], anims[0].properties["to"]);
}
