use std::collections::{BTreeMap, HashMap};

use sonic_rs::{JsonValueTrait, Value as SonicValue};

use crate::{
    ast::{Directive, Value},
    state::schema_state::DirectiveDefinition,
};

pub type VariableValues = HashMap<String, SonicValue>;
pub type ArgumentValues = HashMap<String, SonicValue>;

/// Converts an AST value into its runtime representation.
/// Returns `None` when the value references a variable that was not provided.
pub fn value_from_ast(value: &Value, variables: &VariableValues) -> Option<SonicValue> {
    match value {
        Value::Null => Some(SonicValue::new_null()),
        Value::Boolean(b) => Some((*b).into()),
        Value::String(s) => Some(s.as_str().into()),
        Value::Enum(e) => Some(e.as_str().into()),
        Value::Int(n) => n.as_i64().map(|n| n.into()),
        Value::Float(n) => SonicValue::new_f64(*n),
        Value::List(l) => {
            let list = l
                .iter()
                .map(|v| value_from_ast(v, variables))
                .collect::<Option<Vec<SonicValue>>>()?;

            Some(SonicValue::from_iter(list))
        }
        Value::Object(o) => {
            let map = o
                .iter()
                .map(|(k, v)| value_from_ast(v, variables).map(|val| (k.to_string(), val)))
                .collect::<Option<BTreeMap<String, SonicValue>>>()?;

            Some(SonicValue::from_iter(map.iter()))
        }
        Value::Variable(name) => variables.get(name).cloned(),
    }
}

/// Coerces the arguments of the directive named by `definition`, as found on
/// a selection.
///
/// Returns `None` when the selection doesn't carry the directive. Arguments
/// that can't be resolved (missing variable, no default) are left out of the
/// returned map.
pub fn get_directive_values(
    definition: &DirectiveDefinition,
    directives: &[Directive],
    variables: &VariableValues,
) -> Option<ArgumentValues> {
    let directive = directives.iter().find(|d| d.name == definition.name)?;

    let mut values = ArgumentValues::new();

    for argument in &definition.arguments {
        let provided = directive
            .arguments
            .iter()
            .find_map(|(name, value)| (name == &argument.name).then_some(value));

        let coerced = match provided {
            Some(value) => value_from_ast(value, variables).or_else(|| {
                argument
                    .default_value
                    .as_ref()
                    .and_then(|default| value_from_ast(default, variables))
            }),
            None => argument
                .default_value
                .as_ref()
                .and_then(|default| value_from_ast(default, variables)),
        };

        match coerced {
            Some(value) if !(value.is_null() && argument.value_type.is_non_null()) => {
                values.insert(argument.name.clone(), value);
            }
            _ => {}
        }
    }

    Some(values)
}
