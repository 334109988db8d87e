use std::collections::HashMap;

use graphql_parser::query as parser;

use crate::{
    ast::{type_condition_name, Document, FragmentDefinition, TypeCondition},
    state::schema_state::SchemaState,
};

/// Fragment definitions of a document, by name.
#[derive(Debug, Default, Clone)]
pub struct FragmentTable<'d> {
    map: HashMap<&'d str, &'d FragmentDefinition>,
}

impl<'d> FragmentTable<'d> {
    pub fn from_document(document: &'d Document) -> Self {
        let map = document
            .definitions
            .iter()
            .filter_map(|definition| match definition {
                parser::Definition::Fragment(fragment) => {
                    Some((fragment.name.as_str(), fragment))
                }
                _ => None,
            })
            .collect();

        Self { map }
    }

    pub fn get(&self, name: &str) -> Option<&'d FragmentDefinition> {
        self.map.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Whether a fragment with the given type condition applies to `runtime_type`.
///
/// A missing condition always applies. A condition naming a type the schema
/// doesn't know never applies.
pub fn does_fragment_condition_match(
    schema: &SchemaState,
    type_condition: Option<&TypeCondition>,
    runtime_type: &str,
) -> bool {
    let Some(type_condition) = type_condition else {
        return true;
    };

    let condition_type = type_condition_name(type_condition);
    if condition_type == runtime_type {
        return schema.type_by_name(condition_type).is_some();
    }

    schema.is_abstract_type(condition_type) && schema.is_subtype(condition_type, runtime_type)
}
