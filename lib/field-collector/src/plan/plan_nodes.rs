use std::fmt::{Display, Formatter as FmtFormatter, Result as FmtResult};

use serde::Serialize;

use crate::{
    ast::OperationKind,
    utils::pretty_display::{get_indent, PrettyDisplay},
};

#[derive(Debug, Clone, Serialize)]
pub struct FieldPlan {
    pub operation_kind: OperationKind,
    pub root_type: String,
    pub root: SelectionPlan,
}

/// The outcome of collecting one selection set for one runtime type.
#[derive(Debug, Clone, Serialize)]
pub struct SelectionPlan {
    pub runtime_type: String,
    pub fields: Vec<FieldPlanNode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deferred: Vec<DeferredFieldsPlan>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub defer_usages: Vec<DeferUsagePlan>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldPlanNode {
    pub response_key: String,
    pub field_name: String,
    pub return_type: String,
    /// The target each merged selection was collected under.
    pub collected_under: Vec<String>,
    /// One entry per object type the field may resolve to. Empty for leaves.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub selections: Vec<SelectionPlan>,
}

/// Fields delivered with a set of targets other than the parent's.
#[derive(Debug, Clone, Serialize)]
pub struct DeferredFieldsPlan {
    pub targets: Vec<String>,
    pub should_initiate_defer: bool,
    pub fields: Vec<FieldPlanNode>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeferUsagePlan {
    pub target: String,
    pub label: Option<String>,
    pub parent: String,
}

impl Display for FieldPlan {
    fn fmt(&self, f: &mut FmtFormatter<'_>) -> FmtResult {
        self.pretty_fmt(f, 0)
    }
}

impl Display for SelectionPlan {
    fn fmt(&self, f: &mut FmtFormatter<'_>) -> FmtResult {
        self.pretty_fmt(f, 0)
    }
}

impl PrettyDisplay for FieldPlan {
    fn pretty_fmt(&self, f: &mut FmtFormatter<'_>, depth: usize) -> FmtResult {
        let indent = get_indent(depth);
        writeln!(f, "{indent}FieldPlan({} on {}) {{", self.operation_kind, self.root_type)?;
        self.root.pretty_fmt(f, depth + 1)?;
        writeln!(f, "{indent}}}")?;

        Ok(())
    }
}

impl PrettyDisplay for SelectionPlan {
    fn pretty_fmt(&self, f: &mut FmtFormatter<'_>, depth: usize) -> FmtResult {
        let indent = get_indent(depth);

        for field in &self.fields {
            field.pretty_fmt(f, depth)?;
        }

        for deferred in &self.deferred {
            let kind = if deferred.should_initiate_defer {
                "Defer"
            } else {
                "Inherited"
            };
            writeln!(f, "{indent}{kind}([{}]) {{", deferred.targets.join(", "))?;
            for field in &deferred.fields {
                field.pretty_fmt(f, depth + 1)?;
            }
            writeln!(f, "{indent}}}")?;
        }

        for usage in &self.defer_usages {
            writeln!(f, "{indent}# {} in {}", usage.target, usage.parent)?;
        }

        Ok(())
    }
}

impl PrettyDisplay for FieldPlanNode {
    fn pretty_fmt(&self, f: &mut FmtFormatter<'_>, depth: usize) -> FmtResult {
        let indent = get_indent(depth);

        write!(f, "{indent}{}", self.response_key)?;
        if self.response_key != self.field_name {
            write!(f, ": {}", self.field_name)?;
        }
        write!(f, " <- {}", self.collected_under.join(" "))?;

        match self.selections.as_slice() {
            [] => writeln!(f),
            [selection] if selection.runtime_type == named_type(&self.return_type) => {
                writeln!(f, " {{")?;
                selection.pretty_fmt(f, depth + 1)?;
                writeln!(f, "{indent}}}")
            }
            selections => {
                writeln!(f, " {{")?;
                for selection in selections {
                    writeln!(f, "{indent}  ... on {} {{", selection.runtime_type)?;
                    selection.pretty_fmt(f, depth + 2)?;
                    writeln!(f, "{indent}  }}")?;
                }
                writeln!(f, "{indent}}}")
            }
        }
    }
}

fn named_type(type_ref: &str) -> &str {
    type_ref.trim_matches(|c| matches!(c, '[' | ']' | '!'))
}
