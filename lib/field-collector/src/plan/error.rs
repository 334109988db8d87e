use crate::ast::OperationKind;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FieldPlanError {
    #[error("Schema does not define a root type for {operation_kind} operations.")]
    RootTypeNotFound { operation_kind: OperationKind },

    #[error("Field '{field_name}' not found in type '{type_name}'.")]
    FieldNotFoundInType {
        field_name: String,
        type_name: String,
    },
}
