//! Duplicate node: copies every object `count - 1` times under fresh ids.

use animflow_api_core::{Item, PortKind};
use hashbrown::HashSet;

use super::{object_input, OUTPUT};
use crate::error::{DomainError, NodeRef, Result};
use crate::eval::context::{ExecutionContext, IdSnapshot};
use crate::types::{DuplicateParams, NodeSpec};
use crate::value::{Metadata, Value};

/// `{id}_dup_{NNN}`, with `_{n}` appended until `is_taken` rejects nothing.
fn fresh_id(original: &str, index: usize, is_taken: impl Fn(&str) -> bool) -> String {
    let base = format!("{original}_dup_{index:03}");
    if !is_taken(&base) {
        return base;
    }
    let mut n = 1;
    loop {
        let candidate = format!("{base}_{n}");
        if !is_taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Copy everything `meta` knows about `from` onto `to`, rewriting animation owners.
fn clone_object_metadata(meta: &mut Metadata, from: &str, to: &str) {
    if let Some(time) = meta.time_cursor(from) {
        meta.per_object_time_cursor.insert(to.to_string(), time);
    }
    if let Some(anims) = meta.per_object_animations.get(from) {
        let mut anims = anims.clone();
        for anim in &mut anims {
            anim.object_id = to.to_string();
        }
        meta.per_object_animations.insert(to.to_string(), anims);
    }
    if let Some(assignments) = meta.per_object_assignments.get(from).cloned() {
        meta.per_object_assignments.insert(to.to_string(), assignments);
    }
    if let Some(overrides) = meta.per_object_batch_overrides.get(from).cloned() {
        meta.per_object_batch_overrides
            .insert(to.to_string(), overrides);
    }
    if let Some(bound) = meta.per_object_bound_fields.get(from).cloned() {
        meta.per_object_bound_fields.insert(to.to_string(), bound);
    }
}

/// `existing` lists every object id in the run when this node starts.
pub fn eval_duplicate(
    ctx: &mut ExecutionContext<'_>,
    node: &NodeSpec,
    params: &DuplicateParams,
    existing: &IdSnapshot,
) -> Result<()> {
    let limits = ctx.config().limits;
    if params.count < 1 {
        return Err(DomainError::InvalidDuplicateCount {
            node: NodeRef::of(node),
            count: params.count,
        }
        .into());
    }
    let mut count = usize::try_from(params.count).unwrap_or(usize::MAX);
    // A copy count never drops below the original itself.
    let per_object = limits.max_count_per_object.max(1);
    if count > per_object {
        log::warn!(
            "duplicate '{}': count {} clamped to {}",
            node.id,
            count,
            per_object
        );
        count = per_object;
    }

    let (items, mut meta) = object_input(ctx, node)?;
    let objects = items.iter().filter(|i| i.id().is_some()).count();
    if objects == 0 {
        return Err(DomainError::NoInputObjects {
            node: NodeRef::of(node),
        }
        .into());
    }
    let requested = objects * count;
    if requested > limits.max_total_objects {
        return Err(DomainError::TooManyObjects {
            node: NodeRef::of(node),
            objects,
            count,
            requested,
            limit: limits.max_total_objects,
        }
        .into());
    }

    let mut taken: HashSet<String> = items
        .iter()
        .filter_map(Item::id)
        .map(str::to_string)
        .collect();
    let mut out = Vec::with_capacity(requested + items.len() - objects);
    for item in items {
        let original = match item {
            Item::Object(obj) => obj,
            raw => {
                out.push(raw);
                continue;
            }
        };
        let mut copies = Vec::with_capacity(count - 1);
        for index in 1..count {
            let id = fresh_id(&original.id, index, |c| {
                taken.contains(c) || existing.contains(c)
            });
            if id != format!("{}_dup_{:03}", original.id, index) {
                log::warn!(
                    "duplicate '{}': id for copy {} of '{}' disambiguated to '{}'",
                    node.id,
                    index,
                    original.id,
                    id
                );
            }
            taken.insert(id.clone());
            clone_object_metadata(&mut meta, &original.id, &id);
            let mut copy = original.clone();
            copy.id = id;
            copies.push(Item::Object(copy));
        }
        out.push(Item::Object(original));
        out.extend(copies);
    }

    ctx.set_node_output(&node.id, OUTPUT, PortKind::Objects, Value::Objects(out), meta);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_are_zero_padded_and_suffixed_on_collision() {
        let mut taken: HashSet<String> = HashSet::new();
        assert_eq!(fresh_id("a", 1, |c| taken.contains(c)), "a_dup_001");
        taken.insert("a_dup_001".to_string());
        taken.insert("a_dup_001_1".to_string());
        assert_eq!(fresh_id("a", 1, |c| taken.contains(c)), "a_dup_001_2");
    }
}
