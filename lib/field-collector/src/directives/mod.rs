use sonic_rs::JsonValueTrait;

use crate::{
    ast::{Directive, OperationKind},
    state::schema_state::SchemaState,
};

pub mod values;

use values::{get_directive_values, VariableValues};

pub const SKIP_DIRECTIVE: &str = "skip";
pub const INCLUDE_DIRECTIVE: &str = "include";
pub const DEFER_DIRECTIVE: &str = "defer";

/// Arguments of an active `@defer`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeferValues {
    pub label: Option<String>,
}

/// `@skip(if: true)` always wins over `@include`.
pub fn should_include(
    schema: &SchemaState,
    variables: &VariableValues,
    directives: &[Directive],
) -> bool {
    if extract_condition(schema, SKIP_DIRECTIVE, directives, variables).is_some_and(|skip| skip) {
        return false;
    }

    if extract_condition(schema, INCLUDE_DIRECTIVE, directives, variables)
        .is_some_and(|include| !include)
    {
        return false;
    }

    true
}

/// Returns the `@defer` arguments when the selection is deferred.
///
/// # Panics
///
/// When an active `@defer` is found inside a subscription. Such operations
/// must be rejected before collection starts.
pub fn defer_values(
    schema: &SchemaState,
    operation_kind: OperationKind,
    variables: &VariableValues,
    directives: &[Directive],
) -> Option<DeferValues> {
    let definition = schema.directive_definition(DEFER_DIRECTIVE)?;
    let values = get_directive_values(definition, directives, variables)?;

    if values.get("if").and_then(|v| v.as_bool()) == Some(false) {
        return None;
    }

    if operation_kind == OperationKind::Subscription {
        panic!("`@defer` is not supported on subscription operations");
    }

    Some(DeferValues {
        label: values
            .get("label")
            .and_then(|v| v.as_str())
            .map(str::to_string),
    })
}

fn extract_condition(
    schema: &SchemaState,
    directive_name: &str,
    directives: &[Directive],
    variables: &VariableValues,
) -> Option<bool> {
    let definition = schema.directive_definition(directive_name)?;

    get_directive_values(definition, directives, variables)?
        .get("if")
        .and_then(|v| v.as_bool())
}
