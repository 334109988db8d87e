use graphql_parser::query as parser;
use tracing::trace;

use crate::{
    ast::{response_key, Directive, SelectionSet},
    collect::{context::CollectFieldsContext, target::Target},
    directives::{defer_values, should_include, DeferValues},
    fragments::does_fragment_condition_match,
};

/// Walks `selection_set` and records every included field into the context.
///
/// Fields are recorded under `new_target` when set, otherwise under
/// `parent_target`. Termination relies on the fragment spread graph being
/// acyclic, which validation guarantees.
pub(crate) fn collect_fields_impl<'d>(
    ctx: &mut CollectFieldsContext<'_, 'd>,
    selection_set: &'d SelectionSet,
    parent_target: &Target,
    new_target: Option<&Target>,
) {
    for selection in &selection_set.items {
        match selection {
            parser::Selection::Field(field) => {
                if !should_include(ctx.schema, ctx.variables, &field.directives) {
                    trace!(field = field.name.as_str(), "field excluded by directives");
                    continue;
                }

                let target = new_target.unwrap_or(parent_target);
                ctx.record_field(response_key(field), target, field);
            }
            parser::Selection::InlineFragment(inline_fragment) => {
                if !should_include(ctx.schema, ctx.variables, &inline_fragment.directives)
                    || !does_fragment_condition_match(
                        ctx.schema,
                        inline_fragment.type_condition.as_ref(),
                        ctx.runtime_type,
                    )
                {
                    continue;
                }

                match deferral(ctx, &inline_fragment.directives) {
                    None => collect_fields_impl(
                        ctx,
                        &inline_fragment.selection_set,
                        parent_target,
                        new_target,
                    ),
                    Some(defer) => {
                        let target = register_defer_usage(ctx, parent_target, defer);
                        collect_fields_impl(
                            ctx,
                            &inline_fragment.selection_set,
                            parent_target,
                            Some(&target),
                        );
                    }
                }
            }
            parser::Selection::FragmentSpread(spread) => {
                if !should_include(ctx.schema, ctx.variables, &spread.directives) {
                    continue;
                }

                let fragment_name = spread.fragment_name.as_str();
                let Some(fragment) = ctx.fragments.get(fragment_name) else {
                    trace!(fragment = fragment_name, "unknown fragment spread skipped");
                    continue;
                };

                if !does_fragment_condition_match(
                    ctx.schema,
                    Some(&fragment.type_condition),
                    ctx.runtime_type,
                ) {
                    continue;
                }

                match deferral(ctx, &spread.directives) {
                    None => {
                        if !ctx.visited_fragment_names.insert(fragment.name.as_str()) {
                            continue;
                        }

                        collect_fields_impl(ctx, &fragment.selection_set, parent_target, new_target);
                    }
                    Some(defer) => {
                        let target = register_defer_usage(ctx, parent_target, defer);
                        collect_fields_impl(
                            ctx,
                            &fragment.selection_set,
                            parent_target,
                            Some(&target),
                        );
                    }
                }
            }
        }
    }
}

fn deferral(ctx: &CollectFieldsContext<'_, '_>, directives: &[Directive]) -> Option<DeferValues> {
    if !ctx.defer_enabled {
        return None;
    }

    defer_values(ctx.schema, ctx.operation_kind, ctx.variables, directives)
}

fn register_defer_usage(
    ctx: &mut CollectFieldsContext<'_, '_>,
    parent_target: &Target,
    defer: DeferValues,
) -> Target {
    let target = Target::defer(parent_target, defer.label);
    trace!(
        label = target.label(),
        depth = target.ancestors().len(),
        "new defer usage"
    );
    ctx.new_defer_usages.push(target.clone());

    target
}
