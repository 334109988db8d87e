pub mod ast;
pub mod collect;
pub mod directives;
pub mod fragments;
pub mod operation;
pub mod plan;
pub mod state;
pub mod utils;

#[cfg(test)]
mod tests;

pub use collect::{
    collect_fields, collect_subfields, CollectFieldsOptions, CollectFieldsResult, FieldCollector,
};
pub use operation::{ExecutableOperation, OperationError};
pub use plan::{build_field_plan, FieldPlan, FieldPlanError};
pub use state::schema_state::SchemaState;
