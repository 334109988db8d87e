use std::fmt::Display;

use graphql_parser::query as parser;
use serde::{Deserialize, Serialize};

pub type Document = parser::Document<'static, String>;
pub type OperationDefinition = parser::OperationDefinition<'static, String>;
pub type FragmentDefinition = parser::FragmentDefinition<'static, String>;
pub type SelectionSet = parser::SelectionSet<'static, String>;
pub type Selection = parser::Selection<'static, String>;
pub type Field = parser::Field<'static, String>;
pub type InlineFragment = parser::InlineFragment<'static, String>;
pub type FragmentSpread = parser::FragmentSpread<'static, String>;
pub type TypeCondition = parser::TypeCondition<'static, String>;
pub type Directive = parser::Directive<'static, String>;
pub type Value = parser::Value<'static, String>;
pub type VariableDefinition = parser::VariableDefinition<'static, String>;

pub const TYPENAME_FIELD: &str = "__typename";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    #[serde(rename = "query")]
    Query,
    #[serde(rename = "mutation")]
    Mutation,
    #[serde(rename = "subscription")]
    Subscription,
}

impl Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationKind::Query => write!(f, "query"),
            OperationKind::Mutation => write!(f, "mutation"),
            OperationKind::Subscription => write!(f, "subscription"),
        }
    }
}

/// The key under which a field appears in the response: its alias, or its name.
#[inline]
pub fn response_key(field: &Field) -> &str {
    field.alias.as_deref().unwrap_or(field.name.as_str())
}

#[inline]
pub fn type_condition_name(type_condition: &TypeCondition) -> &str {
    match type_condition {
        parser::TypeCondition::On(name) => name.as_str(),
    }
}
