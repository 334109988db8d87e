use indexmap::IndexMap;

use crate::{
    ast::Field,
    collect::target::{Target, TargetSet},
};

/// A field selection together with the target it was collected under.
#[derive(Debug, Clone)]
pub struct FieldDetails<'d> {
    pub node: &'d Field,
    pub target: Target,
}

/// All selections merged under one response key, delivered with `targets`.
#[derive(Debug, Clone)]
pub struct FieldGroup<'d> {
    pub fields: Vec<FieldDetails<'d>>,
    /// The masking targets that decide when this group is delivered.
    pub targets: TargetSet,
}

impl<'d> FieldGroup<'d> {
    pub fn first_field(&self) -> Option<&'d Field> {
        self.fields.first().map(|details| details.node)
    }

    pub fn field_name(&self) -> Option<&'d str> {
        self.first_field().map(|field| field.name.as_str())
    }

    pub fn nodes(&self) -> impl Iterator<Item = &'d Field> + '_ {
        self.fields.iter().map(|details| details.node)
    }
}

/// Response key to field group, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct GroupedFieldSet<'d>(IndexMap<String, FieldGroup<'d>>);

impl<'d> GroupedFieldSet<'d> {
    pub(crate) fn insert(&mut self, response_key: String, group: FieldGroup<'d>) {
        self.0.insert(response_key, group);
    }

    pub fn get(&self, response_key: &str) -> Option<&FieldGroup<'d>> {
        self.0.get(response_key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldGroup<'d>)> {
        self.0.iter().map(|(key, group)| (key.as_str(), group))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct GroupedFieldSetDetails<'d> {
    pub grouped_field_set: GroupedFieldSet<'d>,
    /// At least one of the masking targets is not already being delivered by
    /// the caller, so a new incremental payload has to be scheduled.
    pub should_initiate_defer: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CollectFieldsResult<'d> {
    /// Fields delivered together with the parent.
    pub grouped_field_set: GroupedFieldSet<'d>,
    /// Fields delivered with a different set of targets, keyed by that set.
    pub new_grouped_field_set_details: IndexMap<TargetSet, GroupedFieldSetDetails<'d>>,
    /// `@defer` usages created by this collection, in discovery order.
    pub new_defer_usages: Vec<Target>,
}
