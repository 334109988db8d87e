use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::collect::{
    context::FieldAccumulator,
    field_group::{FieldDetails, FieldGroup, GroupedFieldSet, GroupedFieldSetDetails},
    target::{Target, TargetSet},
};

struct TargetSetDetails<'d> {
    keys: IndexSet<&'d str>,
    should_initiate_defer: bool,
}

/// Partitions the collected fields by the targets that mask them.
///
/// Keys masked by exactly `parent_targets` form the returned grouped field
/// set, every other masking set gets its own entry.
pub(crate) fn build_grouped_field_sets<'d>(
    targets_by_key: &IndexMap<&'d str, IndexSet<Target>>,
    fields_by_target: &mut FxHashMap<Target, FieldAccumulator<'d>>,
    parent_targets: &TargetSet,
) -> (
    GroupedFieldSet<'d>,
    IndexMap<TargetSet, GroupedFieldSetDetails<'d>>,
) {
    let mut parent_target_keys: IndexSet<&'d str> = IndexSet::new();
    let mut target_set_details: IndexMap<TargetSet, TargetSetDetails<'d>> = IndexMap::new();

    for (response_key, targets) in targets_by_key {
        let masking_targets = masking_targets(targets);

        if &masking_targets == parent_targets {
            parent_target_keys.insert(*response_key);
            continue;
        }

        let should_initiate_defer = masking_targets
            .iter()
            .any(|target| !parent_targets.contains(target));

        target_set_details
            .entry(masking_targets)
            .or_insert_with(|| TargetSetDetails {
                keys: IndexSet::new(),
                should_initiate_defer,
            })
            .keys
            .insert(*response_key);
    }

    let grouped_field_set = if parent_target_keys.is_empty() {
        GroupedFieldSet::default()
    } else {
        ordered_grouped_field_set(
            &parent_target_keys,
            parent_targets,
            targets_by_key,
            fields_by_target,
        )
    };

    let mut new_grouped_field_set_details = IndexMap::new();
    for (masking_targets, details) in target_set_details {
        trace!(
            keys = details.keys.len(),
            targets = masking_targets.len(),
            should_initiate_defer = details.should_initiate_defer,
            "new grouped field set"
        );

        let grouped_field_set = ordered_grouped_field_set(
            &details.keys,
            &masking_targets,
            targets_by_key,
            fields_by_target,
        );

        new_grouped_field_set_details.insert(
            masking_targets,
            GroupedFieldSetDetails {
                grouped_field_set,
                should_initiate_defer: details.should_initiate_defer,
            },
        );
    }

    (grouped_field_set, new_grouped_field_set_details)
}

/// Drops every target that has one of its ancestors in the same set, keeping
/// only the most specific boundaries.
fn masking_targets(targets: &IndexSet<Target>) -> TargetSet {
    targets
        .iter()
        .filter(|target| {
            target
                .ancestors()
                .iter()
                .all(|ancestor| !targets.contains(ancestor))
        })
        .cloned()
        .collect()
}

/// Keys follow the accumulation order of the first masking target. Each
/// group concatenates the selections of every target that collected its key,
/// and those selections are taken out of the accumulators.
fn ordered_grouped_field_set<'d>(
    keys: &IndexSet<&'d str>,
    masking_targets: &TargetSet,
    targets_by_key: &IndexMap<&'d str, IndexSet<Target>>,
    fields_by_target: &mut FxHashMap<Target, FieldAccumulator<'d>>,
) -> GroupedFieldSet<'d> {
    let mut grouped_field_set = GroupedFieldSet::default();

    let Some(first_target) = masking_targets.first() else {
        return grouped_field_set;
    };

    let ordered_keys: Vec<&'d str> = fields_by_target
        .get(first_target)
        .map(|fields| {
            fields
                .keys()
                .copied()
                .filter(|key| keys.contains(key))
                .collect()
        })
        .unwrap_or_default();

    for response_key in ordered_keys {
        let mut fields = Vec::new();

        for target in targets_by_key.get(response_key).into_iter().flatten() {
            let nodes = fields_by_target
                .get_mut(target)
                .and_then(|target_fields| target_fields.shift_remove(response_key))
                .unwrap_or_default();

            fields.extend(nodes.into_iter().map(|node| FieldDetails {
                node,
                target: target.clone(),
            }));
        }

        grouped_field_set.insert(
            response_key.to_string(),
            FieldGroup {
                fields,
                targets: masking_targets.clone(),
            },
        );
    }

    grouped_field_set
}
