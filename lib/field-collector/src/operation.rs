use std::collections::HashMap;

use graphql_parser::query as parser;
use sonic_rs::{JsonValueTrait, Value as SonicValue};
use tracing::{instrument, trace};

use crate::{
    ast::{Document, OperationKind, SelectionSet, VariableDefinition},
    directives::values::{value_from_ast, VariableValues},
    fragments::FragmentTable,
    state::schema_state::TypeNode,
};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OperationError {
    #[error("An operation was expected, but none were present.")]
    OperationNotFound,

    #[error("Multiple operations found, an operation name is required.")]
    MultipleOperationsFound,

    #[error("Specified operation '{operation_name}' not found.")]
    SpecifiedOperationNotFound { operation_name: String },

    #[error("Variable '${variable_name}' of non-null type '{variable_type}' must not be null.")]
    NullNonNullVariable {
        variable_name: String,
        variable_type: String,
    },

    #[error("Variable '${variable_name}' of required type '{variable_type}' was not provided.")]
    MissingVariable {
        variable_name: String,
        variable_type: String,
    },
}

/// The operation selected for execution, together with the fragments of its document.
#[derive(Debug, Clone)]
pub struct ExecutableOperation<'d> {
    pub name: Option<&'d str>,
    pub kind: OperationKind,
    pub selection_set: &'d SelectionSet,
    pub variable_definitions: &'d [VariableDefinition],
    fragments: FragmentTable<'d>,
}

impl<'d> ExecutableOperation<'d> {
    /// Selects the operation to execute from `document`.
    ///
    /// Without `operation_name` the document must contain exactly one operation.
    #[instrument(level = "trace", skip(document))]
    pub fn from_document(
        document: &'d Document,
        operation_name: Option<&str>,
    ) -> Result<Self, OperationError> {
        let mut operations = document
            .definitions
            .iter()
            .filter_map(|definition| match definition {
                parser::Definition::Operation(operation) => Some(operation),
                parser::Definition::Fragment(_) => None,
            });

        let operation = match operation_name {
            Some(operation_name) => operations
                .find(|operation| operation_name_of(operation) == Some(operation_name))
                .ok_or_else(|| OperationError::SpecifiedOperationNotFound {
                    operation_name: operation_name.to_string(),
                })?,
            None => {
                let first = operations.next().ok_or(OperationError::OperationNotFound)?;
                if operations.next().is_some() {
                    return Err(OperationError::MultipleOperationsFound);
                }
                first
            }
        };

        let no_variables: &'d [VariableDefinition] = &[];
        let (kind, selection_set, variable_definitions) = match operation {
            parser::OperationDefinition::SelectionSet(selection_set) => {
                (OperationKind::Query, selection_set, no_variables)
            }
            parser::OperationDefinition::Query(query) => (
                OperationKind::Query,
                &query.selection_set,
                query.variable_definitions.as_slice(),
            ),
            parser::OperationDefinition::Mutation(mutation) => (
                OperationKind::Mutation,
                &mutation.selection_set,
                mutation.variable_definitions.as_slice(),
            ),
            parser::OperationDefinition::Subscription(subscription) => (
                OperationKind::Subscription,
                &subscription.selection_set,
                subscription.variable_definitions.as_slice(),
            ),
        };

        let fragments = FragmentTable::from_document(document);
        trace!(
            kind = %kind,
            fragments = fragments.len(),
            "operation selected"
        );

        Ok(Self {
            name: operation_name_of(operation),
            kind,
            selection_set,
            variable_definitions,
            fragments,
        })
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn selection_set(&self) -> &'d SelectionSet {
        self.selection_set
    }

    pub fn variable_definitions(&self) -> &'d [VariableDefinition] {
        self.variable_definitions
    }

    pub fn fragments(&self) -> &FragmentTable<'d> {
        &self.fragments
    }

    /// Builds the variable values for this operation from the raw request input.
    ///
    /// Provided values are taken as-is, missing ones fall back to the declared
    /// default. Values not declared by the operation are dropped.
    pub fn coerce_variables(
        &self,
        raw: Option<HashMap<String, SonicValue>>,
    ) -> Result<VariableValues, OperationError> {
        let mut raw = raw.unwrap_or_default();
        let mut coerced = VariableValues::new();

        for definition in self.variable_definitions {
            let variable_type = TypeNode::from(&definition.var_type);

            let value = match raw.remove(&definition.name) {
                Some(value) => Some(value),
                None => definition
                    .default_value
                    .as_ref()
                    .and_then(|default| value_from_ast(default, &VariableValues::new())),
            };

            match value {
                Some(value) if value.is_null() && variable_type.is_non_null() => {
                    return Err(OperationError::NullNonNullVariable {
                        variable_name: definition.name.clone(),
                        variable_type: variable_type.to_string(),
                    });
                }
                Some(value) => {
                    coerced.insert(definition.name.clone(), value);
                }
                None if variable_type.is_non_null() => {
                    return Err(OperationError::MissingVariable {
                        variable_name: definition.name.clone(),
                        variable_type: variable_type.to_string(),
                    });
                }
                None => {}
            }
        }

        Ok(coerced)
    }
}

fn operation_name_of<'d>(
    operation: &'d parser::OperationDefinition<'static, String>,
) -> Option<&'d str> {
    match operation {
        parser::OperationDefinition::SelectionSet(_) => None,
        parser::OperationDefinition::Query(query) => query.name.as_deref(),
        parser::OperationDefinition::Mutation(mutation) => mutation.name.as_deref(),
        parser::OperationDefinition::Subscription(subscription) => subscription.name.as_deref(),
    }
}
