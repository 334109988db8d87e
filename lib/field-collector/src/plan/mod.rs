mod builder;
pub mod error;
pub mod plan_nodes;

pub use builder::build_field_plan;
pub use error::FieldPlanError;
pub use plan_nodes::{
    DeferUsagePlan, DeferredFieldsPlan, FieldPlan, FieldPlanNode, SelectionPlan,
};
