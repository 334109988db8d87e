use tracing::{instrument, trace};

use crate::{
    collect::{
        CollectFieldsOptions, CollectFieldsResult, FieldCollector, FieldGroup, GroupedFieldSet,
    },
    directives::values::VariableValues,
    operation::ExecutableOperation,
    plan::{
        error::FieldPlanError,
        plan_nodes::{
            DeferUsagePlan, DeferredFieldsPlan, FieldPlan, FieldPlanNode, SelectionPlan,
        },
    },
    state::schema_state::SchemaState,
};

/// Collects the whole operation the way an executor walks it: the root
/// selection set first, then the sub-selections of every composite field,
/// once per object type it may resolve to.
#[instrument(level = "trace", skip_all, fields(operation_kind = %operation.kind))]
pub fn build_field_plan(
    schema: &SchemaState,
    operation: &ExecutableOperation<'_>,
    variables: &VariableValues,
    options: CollectFieldsOptions,
) -> Result<FieldPlan, FieldPlanError> {
    let root_type = schema
        .root_type(operation.kind)
        .ok_or(FieldPlanError::RootTypeNotFound {
            operation_kind: operation.kind,
        })?;

    let collector = FieldCollector::new(schema, operation.fragments(), variables, operation)
        .with_options(options);
    let result = collector.collect_fields(root_type);

    Ok(FieldPlan {
        operation_kind: operation.kind,
        root_type: root_type.to_string(),
        root: selection_plan(&collector, root_type, result)?,
    })
}

fn selection_plan<'d>(
    collector: &FieldCollector<'_, 'd>,
    runtime_type: &str,
    result: CollectFieldsResult<'d>,
) -> Result<SelectionPlan, FieldPlanError> {
    let fields = field_nodes(collector, runtime_type, &result.grouped_field_set)?;

    let deferred = result
        .new_grouped_field_set_details
        .iter()
        .map(|(targets, details)| {
            Ok(DeferredFieldsPlan {
                targets: targets.iter().map(ToString::to_string).collect(),
                should_initiate_defer: details.should_initiate_defer,
                fields: field_nodes(collector, runtime_type, &details.grouped_field_set)?,
            })
        })
        .collect::<Result<Vec<_>, FieldPlanError>>()?;

    let defer_usages = result
        .new_defer_usages
        .iter()
        .map(|target| DeferUsagePlan {
            target: target.to_string(),
            label: target.label().map(str::to_string),
            parent: target
                .ancestors()
                .first()
                .map(ToString::to_string)
                .unwrap_or_default(),
        })
        .collect();

    Ok(SelectionPlan {
        runtime_type: runtime_type.to_string(),
        fields,
        deferred,
        defer_usages,
    })
}

fn field_nodes<'d>(
    collector: &FieldCollector<'_, 'd>,
    runtime_type: &str,
    grouped_field_set: &GroupedFieldSet<'d>,
) -> Result<Vec<FieldPlanNode>, FieldPlanError> {
    grouped_field_set
        .iter()
        .map(|(response_key, group)| field_node(collector, runtime_type, response_key, group))
        .collect()
}

fn field_node<'d>(
    collector: &FieldCollector<'_, 'd>,
    parent_type: &str,
    response_key: &str,
    group: &FieldGroup<'d>,
) -> Result<FieldPlanNode, FieldPlanError> {
    let schema = collector.schema();
    let field_name = group.field_name().unwrap_or(response_key);

    let return_type = schema.field_type(parent_type, field_name).ok_or_else(|| {
        FieldPlanError::FieldNotFoundInType {
            field_name: field_name.to_string(),
            type_name: parent_type.to_string(),
        }
    })?;

    let named_type = return_type.inner_type();
    let selections = if schema.is_composite_type(named_type) {
        let possible_types = schema.possible_types(named_type);
        trace!(
            response_key,
            return_type = named_type,
            possible_types = possible_types.len(),
            "collecting subfields"
        );

        possible_types
            .into_iter()
            .map(|object_type| {
                let result = collector.collect_subfields(object_type, group);
                selection_plan(collector, object_type, result)
            })
            .collect::<Result<Vec<_>, FieldPlanError>>()?
    } else {
        vec![]
    };

    Ok(FieldPlanNode {
        response_key: response_key.to_string(),
        field_name: field_name.to_string(),
        return_type: return_type.to_string(),
        collected_under: group
            .fields
            .iter()
            .map(|details| details.target.to_string())
            .collect(),
        selections,
    })
}
