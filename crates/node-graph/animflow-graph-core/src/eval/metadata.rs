//! Metadata collection across a node's connected inputs.

use animflow_animation_core::{merge_batch_overrides, SceneAnimationTrack};

use super::context::ConnectedInput;
use crate::value::Metadata;

/// Fold the metadata of every input in connection order, without port priority.
pub fn collect_metadata(inputs: &[ConnectedInput]) -> Metadata {
    let mut merged = Metadata::default();
    for input in inputs {
        merged.absorb(input.value.metadata.clone());
    }
    merged
}

/// Replace animations in `existing` whose type also appears in `incoming`, keep the rest,
/// then order by start time.
fn overlay_animations(existing: &mut Vec<SceneAnimationTrack>, incoming: Vec<SceneAnimationTrack>) {
    existing.retain(|prev| !incoming.iter().any(|next| next.kind == prev.kind));
    existing.extend(incoming);
    existing.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
}

/// Merge metadata from numbered ports so that the lowest-numbered port wins.
///
/// `ports` pairs each port number with the metadata it carried. Ports are folded from the
/// highest number to the lowest, each overwriting what came before: cursors still take the
/// maximum, bound fields are unioned.
pub fn merge_by_port_priority(mut ports: Vec<(usize, Metadata)>) -> Metadata {
    ports.sort_by(|a, b| b.0.cmp(&a.0));
    let mut merged = Metadata::default();
    for (_, meta) in ports {
        for (id, time) in meta.per_object_time_cursor {
            merged.advance_cursor(&id, time);
        }
        for (id, anims) in meta.per_object_animations {
            overlay_animations(merged.per_object_animations.entry(id).or_default(), anims);
        }
        for (id, assignments) in meta.per_object_assignments {
            merged
                .per_object_assignments
                .entry(id)
                .or_default()
                .merge_from(&assignments);
        }
        for (id, overrides) in meta.per_object_batch_overrides {
            merge_batch_overrides(
                merged.per_object_batch_overrides.entry(id).or_default(),
                &overrides,
            );
        }
        for (id, fields) in meta.per_object_bound_fields {
            merged
                .per_object_bound_fields
                .entry(id)
                .or_default()
                .extend(fields);
        }
        merged.extra.extend(meta.extra);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use animflow_animation_core::{Easing, ObjectAssignments, TrackType};
    use serde_json::json;

    fn anim(kind: TrackType, start: f64, tag: &str) -> SceneAnimationTrack {
        SceneAnimationTrack {
            object_id: "a".into(),
            identifier: tag.into(),
            kind,
            start_time: start,
            duration: 1.0,
            easing: Easing::Linear,
            properties: json!({}),
            chained: false,
        }
    }

    fn assignments(field: &str, value: f64) -> ObjectAssignments {
        let mut a = ObjectAssignments::default();
        a.initial.insert(field.into(), json!(value));
        a
    }

    #[test]
    fn lowest_port_wins_per_field_and_type() {
        let mut port1 = Metadata::default();
        port1.advance_cursor("a", 1.0);
        port1
            .per_object_animations
            .insert("a".into(), vec![anim(TrackType::Move, 0.0, "p1-move")]);
        port1
            .per_object_assignments
            .insert("a".into(), assignments("move.to.x", 1.0));

        let mut port2 = Metadata::default();
        port2.advance_cursor("a", 5.0);
        port2.per_object_animations.insert(
            "a".into(),
            vec![
                anim(TrackType::Move, 0.0, "p2-move"),
                anim(TrackType::Fade, 2.0, "p2-fade"),
            ],
        );
        let mut a2 = assignments("move.to.x", 2.0);
        a2.initial.insert("fade.to".into(), json!(0.5));
        port2.per_object_assignments.insert("a".into(), a2);

        let merged = merge_by_port_priority(vec![(1, port1), (2, port2)]);
        assert_eq!(merged.time_cursor("a"), Some(5.0));

        let ids: Vec<&str> = merged
            .animations("a")
            .iter()
            .map(|a| a.identifier.as_str())
            .collect();
        assert_eq!(ids, vec!["p1-move", "p2-fade"]);

        let merged_assign = &merged.per_object_assignments["a"];
        assert_eq!(merged_assign.initial["move.to.x"], json!(1.0));
        assert_eq!(merged_assign.initial["fade.to"], json!(0.5));
    }

    #[test]
    fn bound_fields_are_unioned() {
        let mut p1 = Metadata::default();
        p1.per_object_bound_fields
            .insert("a".into(), ["move.to.x".to_string()].into());
        let mut p2 = Metadata::default();
        p2.per_object_bound_fields
            .insert("a".into(), ["fade.to".to_string()].into());
        let merged = merge_by_port_priority(vec![(2, p2), (1, p1)]);
        assert_eq!(merged.per_object_bound_fields["a"].len(), 2);
    }
}
