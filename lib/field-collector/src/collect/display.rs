use std::fmt::{Display, Formatter as FmtFormatter, Result as FmtResult};

use crate::{
    ast::response_key,
    collect::{
        field_group::{CollectFieldsResult, FieldGroup, GroupedFieldSet},
        target::{Target, TargetSet},
    },
    utils::pretty_display::{get_indent, PrettyDisplay},
};

impl Display for Target {
    fn fmt(&self, f: &mut FmtFormatter<'_>) -> FmtResult {
        match self {
            Target::Base => write!(f, "base"),
            Target::Deferred(usage) => match &usage.label {
                Some(label) => write!(f, "defer({})", label),
                None => write!(f, "defer"),
            },
        }
    }
}

impl Display for TargetSet {
    fn fmt(&self, f: &mut FmtFormatter<'_>) -> FmtResult {
        write!(f, "[")?;
        for (i, target) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", target)?;
        }
        write!(f, "]")
    }
}

impl PrettyDisplay for FieldGroup<'_> {
    fn pretty_fmt(&self, f: &mut FmtFormatter<'_>, depth: usize) -> FmtResult {
        let indent = get_indent(depth);
        let Some(first) = self.first_field() else {
            return Ok(());
        };

        write!(f, "{indent}{}", response_key(first))?;
        if first.alias.is_some() {
            write!(f, ": {}", first.name)?;
        }

        write!(f, " <-")?;
        for details in &self.fields {
            write!(f, " {}", details.target)?;
        }
        writeln!(f)
    }
}

impl PrettyDisplay for GroupedFieldSet<'_> {
    fn pretty_fmt(&self, f: &mut FmtFormatter<'_>, depth: usize) -> FmtResult {
        for (_, group) in self.iter() {
            group.pretty_fmt(f, depth)?;
        }
        Ok(())
    }
}

impl PrettyDisplay for CollectFieldsResult<'_> {
    fn pretty_fmt(&self, f: &mut FmtFormatter<'_>, depth: usize) -> FmtResult {
        let indent = get_indent(depth);

        writeln!(f, "{indent}fields {{")?;
        self.grouped_field_set.pretty_fmt(f, depth + 1)?;
        writeln!(f, "{indent}}}")?;

        for (targets, details) in &self.new_grouped_field_set_details {
            let kind = if details.should_initiate_defer {
                "deferred"
            } else {
                "inherited"
            };
            writeln!(f, "{indent}{kind} {targets} {{")?;
            details.grouped_field_set.pretty_fmt(f, depth + 1)?;
            writeln!(f, "{indent}}}")?;
        }

        if !self.new_defer_usages.is_empty() {
            writeln!(f, "{indent}defer usages {{")?;
            for usage in &self.new_defer_usages {
                write!(f, "{indent}  {}", usage)?;
                if let Some(parent) = usage.ancestors().first() {
                    write!(f, " in {}", parent)?;
                }
                writeln!(f)?;
            }
            writeln!(f, "{indent}}}")?;
        }

        Ok(())
    }
}

impl Display for CollectFieldsResult<'_> {
    fn fmt(&self, f: &mut FmtFormatter<'_>) -> FmtResult {
        self.pretty_fmt(f, 0)
    }
}
