use std::{
    hash::{Hash, Hasher},
    sync::Arc,
};

use indexmap::IndexSet;

/// A `@defer` boundary discovered during collection.
#[derive(Debug)]
pub struct DeferUsage {
    pub label: Option<String>,
    /// Enclosing targets, innermost first. A usage rooted at the initial
    /// payload ends with [`Target::Base`].
    pub ancestors: Vec<Target>,
}

/// The delivery boundary a field was collected under.
///
/// Deferred targets compare by identity: two `@defer` usages with the same
/// label are still distinct targets.
#[derive(Debug, Clone)]
pub enum Target {
    Base,
    Deferred(Arc<DeferUsage>),
}

impl Target {
    pub(crate) fn defer(parent: &Target, label: Option<String>) -> Target {
        let ancestors = match parent {
            Target::Base => vec![Target::Base],
            Target::Deferred(usage) => std::iter::once(parent.clone())
                .chain(usage.ancestors.iter().cloned())
                .collect(),
        };

        Target::Deferred(Arc::new(DeferUsage { label, ancestors }))
    }

    pub fn is_base(&self) -> bool {
        matches!(self, Target::Base)
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Target::Base => None,
            Target::Deferred(usage) => usage.label.as_deref(),
        }
    }

    pub fn ancestors(&self) -> &[Target] {
        match self {
            Target::Base => &[],
            Target::Deferred(usage) => &usage.ancestors,
        }
    }

    /// Stable within a process for as long as the target is alive.
    fn identity(&self) -> usize {
        match self {
            Target::Base => 0,
            Target::Deferred(usage) => Arc::as_ptr(usage) as usize,
        }
    }
}

impl PartialEq for Target {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Target::Base, Target::Base) => true,
            (Target::Deferred(a), Target::Deferred(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Target {}

impl Hash for Target {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

/// An insertion-ordered set of targets with set semantics for equality and
/// hashing, so it can key the partitions of a grouped field set.
#[derive(Debug, Clone, Default)]
pub struct TargetSet(IndexSet<Target>);

impl TargetSet {
    /// The set holding only [`Target::Base`].
    pub fn base() -> Self {
        Self(IndexSet::from([Target::Base]))
    }

    pub fn insert(&mut self, target: Target) -> bool {
        self.0.insert(target)
    }

    pub fn contains(&self, target: &Target) -> bool {
        self.0.contains(target)
    }

    pub fn first(&self) -> Option<&Target> {
        self.0.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_base(&self) -> bool {
        self.0.len() == 1 && self.0.contains(&Target::Base)
    }
}

impl PartialEq for TargetSet {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && self.0.iter().all(|target| other.0.contains(target))
    }
}

impl Eq for TargetSet {}

impl Hash for TargetSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut identities: Vec<usize> = self.0.iter().map(Target::identity).collect();
        identities.sort_unstable();
        identities.hash(state);
    }
}

impl FromIterator<Target> for TargetSet {
    fn from_iter<I: IntoIterator<Item = Target>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TargetSet {
    type Item = &'a Target;
    type IntoIter = indexmap::set::Iter<'a, Target>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
