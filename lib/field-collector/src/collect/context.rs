use indexmap::{IndexMap, IndexSet};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{
    ast::{Field, OperationKind},
    collect::target::Target,
    directives::values::VariableValues,
    fragments::FragmentTable,
    state::schema_state::SchemaState,
};

/// Response key to the field selections collected for it, in arrival order.
pub(crate) type FieldAccumulator<'d> = IndexMap<&'d str, Vec<&'d Field>>;

/// State shared by one collection call and every recursion it makes.
pub(crate) struct CollectFieldsContext<'a, 'd> {
    pub schema: &'a SchemaState,
    pub fragments: &'a FragmentTable<'d>,
    pub variables: &'a VariableValues,
    pub operation_kind: OperationKind,
    pub runtime_type: &'a str,
    pub defer_enabled: bool,
    /// Every target each response key was collected under, keys in first-seen order.
    pub targets_by_key: IndexMap<&'d str, IndexSet<Target>>,
    pub fields_by_target: FxHashMap<Target, FieldAccumulator<'d>>,
    pub new_defer_usages: Vec<Target>,
    /// Fragments already expanded without `@defer`.
    pub visited_fragment_names: FxHashSet<&'d str>,
}

impl<'a, 'd> CollectFieldsContext<'a, 'd> {
    pub fn new(
        schema: &'a SchemaState,
        fragments: &'a FragmentTable<'d>,
        variables: &'a VariableValues,
        operation_kind: OperationKind,
        runtime_type: &'a str,
        defer_enabled: bool,
    ) -> Self {
        Self {
            schema,
            fragments,
            variables,
            operation_kind,
            runtime_type,
            defer_enabled,
            targets_by_key: IndexMap::new(),
            fields_by_target: FxHashMap::default(),
            new_defer_usages: Vec::new(),
            visited_fragment_names: FxHashSet::default(),
        }
    }

    pub fn record_field(&mut self, response_key: &'d str, target: &Target, field: &'d Field) {
        self.targets_by_key
            .entry(response_key)
            .or_default()
            .insert(target.clone());

        self.fields_by_target
            .entry(target.clone())
            .or_default()
            .entry(response_key)
            .or_default()
            .push(field);
    }
}
