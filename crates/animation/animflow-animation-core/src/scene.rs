//! Assembled scenes and their per-batch-key replicas.

use std::collections::BTreeSet;

use animflow_api_core::{PropertyPath, SceneObject};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::assembler::{apply_batch_layer, continuation, BatchOverrideContext};
use crate::error::AssemblyError;
use crate::overrides::{BatchOverrides, BoundFields};
use crate::track::SceneAnimationTrack;
use crate::transform::{TimedTransform, TransformFactory};

/// Objects plus their resolved animations, ready for rendering.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssembledScene {
    pub objects: Vec<SceneObject>,
    pub animations: Vec<SceneAnimationTrack>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub batch_overrides: IndexMap<String, BatchOverrides>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub bound_fields: IndexMap<String, BoundFields>,
    pub duration: f64,
}

impl AssembledScene {
    /// Distinct batch keys carried by tagged objects, ascending.
    pub fn batch_keys(&self) -> BTreeSet<&str> {
        self.objects
            .iter()
            .filter(|obj| obj.batch)
            .flat_map(|obj| obj.batch_keys.iter().map(String::as_str))
            .collect()
    }

    /// Build renderer-ready transforms for every animation in the scene.
    pub fn transforms(
        &self,
        factory: &dyn TransformFactory,
    ) -> Result<Vec<TimedTransform>, AssemblyError> {
        self.animations.iter().map(|a| factory.create(a)).collect()
    }
}

/// One replica of a scene. `batch_key` is `None` for scenes without batched objects.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScenePartition {
    pub batch_key: Option<String>,
    pub objects: Vec<SceneObject>,
    pub animations: Vec<SceneAnimationTrack>,
}

/// Split `scene` into one partition per distinct batch key.
///
/// Non-batched objects appear in every partition. Batched objects appear only in the
/// partitions of the keys they carry, with their animations re-resolved for that key.
pub fn partition_by_batch_key(
    scene: &AssembledScene,
) -> Result<Vec<ScenePartition>, AssemblyError> {
    let keys = scene.batch_keys();
    if keys.is_empty() {
        return Ok(vec![ScenePartition {
            batch_key: None,
            objects: scene.objects.clone(),
            animations: scene.animations.clone(),
        }]);
    }

    let mut partitions = Vec::with_capacity(keys.len());
    for key in keys {
        let objects: Vec<SceneObject> = scene
            .objects
            .iter()
            .filter(|obj| !obj.batch || obj.batch_keys.iter().any(|k| k == key))
            .cloned()
            .collect();

        let mut animations: Vec<SceneAnimationTrack> = Vec::new();
        for anim in &scene.animations {
            let Some(owner) = objects.iter().find(|obj| obj.id == anim.object_id) else {
                continue;
            };
            let mut anim = anim.clone();
            if owner.batch {
                let ctx = BatchOverrideContext {
                    batch_key: Some(key),
                    overrides: scene.batch_overrides.get(&owner.id),
                    bound_fields: scene.bound_fields.get(&owner.id),
                };
                if anim.chained {
                    if let JsonValue::Object(props) = &mut anim.properties {
                        props.remove("from");
                    }
                }
                apply_batch_layer(anim.kind, &mut anim.properties, &ctx)?;
                if anim.chained && anim.properties.get("from").map_or(true, JsonValue::is_null) {
                    // Continue from this key's resolution of the earlier animation.
                    let history = animations.iter().filter(|a| a.object_id == anim.object_id);
                    if let Some(from) =
                        continuation(history, anim.kind, anim.start_time, &anim.properties)
                    {
                        PropertyPath::new(vec!["from".to_string()]).set(&mut anim.properties, from);
                    }
                }
            }
            animations.push(anim);
        }

        partitions.push(ScenePartition {
            batch_key: Some(key.to_string()),
            objects,
            animations,
        });
    }
    Ok(partitions)
}
