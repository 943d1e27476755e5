//! Typesafe resolution: type match, qualifier match, enablement and ambiguity rules.

use std::collections::BTreeSet;
use std::sync::Arc;

use trellis_types::{AssignabilityRules, Type, TypeError};

use crate::bean::{Bean, RegisteredBean};
use crate::enablement::Enablement;
use crate::qualifier::QualifierInstance;
use crate::registry::BeanRegistry;

/// Required type plus normalized qualifiers. Equality is structural, so a query rebuilt for the
/// same injection point hits the same cache entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResolutionQuery {
    required: Type,
    qualifiers: BTreeSet<QualifierInstance>,
}

impl ResolutionQuery {
    pub fn new(required: Type, qualifiers: impl IntoIterator<Item = QualifierInstance>) -> Self {
        Self {
            required,
            qualifiers: qualifiers.into_iter().collect(),
        }
    }

    pub fn required(&self) -> &Type {
        &self.required
    }

    pub fn qualifiers(&self) -> &BTreeSet<QualifierInstance> {
        &self.qualifiers
    }
}

/// Classification of a lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Unsatisfied,
    Resolved(Arc<Bean>),
    Ambiguous(Vec<Arc<Bean>>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolutionResult {
    pub(crate) eligible: Vec<Arc<Bean>>,
    pub(crate) resolution: Resolution,
}

impl ResolutionResult {
    /// Enabled beans matching the query's type and qualifiers, in registration order, before
    /// alternatives and priorities break ties.
    pub fn eligible(&self) -> &[Arc<Bean>] {
        &self.eligible
    }

    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    pub fn resolved(&self) -> Option<&Arc<Bean>> {
        match &self.resolution {
            Resolution::Resolved(bean) => Some(bean),
            Resolution::Unsatisfied | Resolution::Ambiguous(_) => None,
        }
    }

    pub fn is_unsatisfied(&self) -> bool {
        matches!(self.resolution, Resolution::Unsatisfied)
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self.resolution, Resolution::Ambiguous(_))
    }

    /// Names of the beans the lookup ended with: none, the resolved bean, or the ambiguous set.
    pub fn bean_names(&self) -> Vec<&str> {
        match &self.resolution {
            Resolution::Unsatisfied => Vec::new(),
            Resolution::Resolved(bean) => vec![bean.name()],
            Resolution::Ambiguous(beans) => beans.iter().map(|bean| bean.name()).collect(),
        }
    }
}

pub(crate) struct Resolver<'a> {
    pub(crate) rules: AssignabilityRules<'a>,
    pub(crate) registry: &'a BeanRegistry,
    pub(crate) enablement: &'a dyn Enablement,
}

impl Resolver<'_> {
    pub(crate) fn resolve(&self, query: &ResolutionQuery) -> Result<ResolutionResult, TypeError> {
        let mut eligible = Vec::new();
        for bean in self.registry.iter() {
            if !self.matches_type(bean, query.required())? {
                continue;
            }
            if !query.qualifiers().iter().all(|q| bean.has_qualifier(q)) {
                continue;
            }
            if !self.enablement.is_enabled(bean) {
                continue;
            }
            eligible.push(bean);
        }

        // A bean specialized by an enabled bean is replaced by it everywhere, whether or not the
        // specializing bean matched this query.
        eligible.retain(|bean| {
            !self
                .registry
                .specializers_of(bean.name())
                .any(|specializer| self.enablement.is_enabled(specializer))
        });

        let resolution = self.classify(&eligible);
        Ok(ResolutionResult {
            eligible: eligible.iter().map(|bean| bean.bean().clone()).collect(),
            resolution,
        })
    }

    fn matches_type(&self, bean: &RegisteredBean, required: &Type) -> Result<bool, TypeError> {
        self.rules
            .is_assignable_from_at_least_one(required, bean.bean().types())
    }

    fn classify(&self, eligible: &[&Arc<RegisteredBean>]) -> Resolution {
        match eligible {
            [] => return Resolution::Unsatisfied,
            [only] => return Resolution::Resolved(only.bean().clone()),
            _ => {}
        }

        let mut candidates: Vec<&Arc<RegisteredBean>> = eligible.to_vec();
        if candidates.iter().any(|bean| bean.is_alternative()) {
            candidates.retain(|bean| bean.is_alternative());
        }

        let top = candidates
            .iter()
            .map(|bean| self.enablement.priority(bean))
            .max()
            .flatten();
        if top.is_some() {
            candidates.retain(|bean| self.enablement.priority(bean) == top);
        }

        match candidates.as_slice() {
            [only] => Resolution::Resolved(only.bean().clone()),
            _ => Resolution::Ambiguous(candidates.iter().map(|bean| bean.bean().clone()).collect()),
        }
    }
}
