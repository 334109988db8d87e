mod collector;
mod context;
mod display;
pub mod field_group;
mod grouping;
pub mod target;

use tracing::instrument;

pub use field_group::{
    CollectFieldsResult, FieldDetails, FieldGroup, GroupedFieldSet, GroupedFieldSetDetails,
};
pub use target::{DeferUsage, Target, TargetSet};

use crate::{
    ast::Field,
    directives::values::VariableValues,
    fragments::FragmentTable,
    operation::ExecutableOperation,
    state::schema_state::SchemaState,
};
use collector::collect_fields_impl;
use context::CollectFieldsContext;
use grouping::build_grouped_field_sets;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectFieldsOptions {
    /// When disabled, `@defer` is ignored and every selection is collected
    /// into the parent's delivery.
    pub defer_enabled: bool,
}

impl Default for CollectFieldsOptions {
    fn default() -> Self {
        Self {
            defer_enabled: true,
        }
    }
}

/// Collects fields of one operation. Every call builds its own accumulators,
/// so a collector can be shared between independent selection sets.
#[derive(Clone, Copy)]
pub struct FieldCollector<'a, 'd> {
    schema: &'a SchemaState,
    fragments: &'a FragmentTable<'d>,
    variables: &'a VariableValues,
    operation: &'a ExecutableOperation<'d>,
    options: CollectFieldsOptions,
}

impl<'a, 'd> FieldCollector<'a, 'd> {
    pub fn new(
        schema: &'a SchemaState,
        fragments: &'a FragmentTable<'d>,
        variables: &'a VariableValues,
        operation: &'a ExecutableOperation<'d>,
    ) -> Self {
        Self {
            schema,
            fragments,
            variables,
            operation,
            options: CollectFieldsOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CollectFieldsOptions) -> Self {
        self.options = options;
        self
    }

    pub fn schema(&self) -> &'a SchemaState {
        self.schema
    }

    pub fn operation(&self) -> &'a ExecutableOperation<'d> {
        self.operation
    }

    /// Collects the operation's root selection set for `runtime_type`.
    #[instrument(level = "trace", skip(self), name = "collect_fields")]
    pub fn collect_fields(&self, runtime_type: &str) -> CollectFieldsResult<'d> {
        let mut ctx = self.context(runtime_type);
        collect_fields_impl(
            &mut ctx,
            self.operation.selection_set,
            &Target::Base,
            None,
        );

        finish(ctx, &TargetSet::base())
    }

    /// Collects the merged sub-selections of `field_group` for `return_type`.
    ///
    /// Each field is walked under the target it was collected with, and the
    /// group's own targets are the parent delivery.
    #[instrument(level = "trace", skip(self, field_group), name = "collect_subfields")]
    pub fn collect_subfields(
        &self,
        return_type: &str,
        field_group: &FieldGroup<'d>,
    ) -> CollectFieldsResult<'d> {
        let mut ctx = self.context(return_type);

        for details in &field_group.fields {
            let node: &'d Field = details.node;
            if !node.selection_set.items.is_empty() {
                collect_fields_impl(&mut ctx, &node.selection_set, &details.target, None);
            }
        }

        finish(ctx, &field_group.targets)
    }

    fn context<'s>(&'s self, runtime_type: &'s str) -> CollectFieldsContext<'s, 'd> {
        CollectFieldsContext::new(
            self.schema,
            self.fragments,
            self.variables,
            self.operation.kind,
            runtime_type,
            self.options.defer_enabled,
        )
    }
}

fn finish<'d>(
    ctx: CollectFieldsContext<'_, 'd>,
    parent_targets: &TargetSet,
) -> CollectFieldsResult<'d> {
    let CollectFieldsContext {
        targets_by_key,
        mut fields_by_target,
        new_defer_usages,
        ..
    } = ctx;

    let (grouped_field_set, new_grouped_field_set_details) =
        build_grouped_field_sets(&targets_by_key, &mut fields_by_target, parent_targets);

    CollectFieldsResult {
        grouped_field_set,
        new_grouped_field_set_details,
        new_defer_usages,
    }
}

/// Collects the root selection set of `operation` for `runtime_type`.
pub fn collect_fields<'d>(
    schema: &SchemaState,
    fragments: &FragmentTable<'d>,
    variables: &VariableValues,
    runtime_type: &str,
    operation: &ExecutableOperation<'d>,
) -> CollectFieldsResult<'d> {
    FieldCollector::new(schema, fragments, variables, operation).collect_fields(runtime_type)
}

/// Collects the merged sub-selections of a field group for `return_type`.
pub fn collect_subfields<'d>(
    schema: &SchemaState,
    fragments: &FragmentTable<'d>,
    variables: &VariableValues,
    operation: &ExecutableOperation<'d>,
    return_type: &str,
    field_group: &FieldGroup<'d>,
) -> CollectFieldsResult<'d> {
    FieldCollector::new(schema, fragments, variables, operation)
        .collect_subfields(return_type, field_group)
}
