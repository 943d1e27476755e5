//! Alternatives, priorities and stereotypes.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use trellis_types::Type;

use crate::bean::RegisteredBean;
use crate::DefinitionError;

/// Decides which beans take part in resolution and how ambiguous candidates are ranked.
pub trait Enablement: Send + Sync + fmt::Debug {
    /// Disabled beans are dropped before classification.
    fn is_enabled(&self, bean: &RegisteredBean) -> bool;

    /// Rank used to break ties between alternatives; higher wins and `None` ranks lowest.
    fn priority(&self, bean: &RegisteredBean) -> Option<i32>;
}

/// Application-wide enablement: an alternative is enabled when it has a priority or was selected
/// by name. Other beans are always enabled and unranked.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlobalEnablement {
    selected: HashSet<String>,
}

impl GlobalEnablement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable an alternative without giving it a priority (`<alternatives>` in `beans.xml`).
    pub fn select(&mut self, bean: impl Into<String>) -> &mut Self {
        self.selected.insert(bean.into());
        self
    }

    pub fn is_selected(&self, bean: &str) -> bool {
        self.selected.contains(bean)
    }
}

impl Enablement for GlobalEnablement {
    fn is_enabled(&self, bean: &RegisteredBean) -> bool {
        !bean.is_alternative() || bean.priority().is_some() || self.is_selected(bean.name())
    }

    fn priority(&self, bean: &RegisteredBean) -> Option<i32> {
        if bean.is_alternative() {
            bean.priority()
        } else {
            None
        }
    }
}

/// An annotation bundling bean metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stereotype {
    name: String,
    alternative: bool,
    priority: Option<i32>,
    stereotypes: Vec<String>,
    required_types: Vec<Type>,
}

impl Stereotype {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alternative: false,
            priority: None,
            stereotypes: Vec::new(),
            required_types: Vec::new(),
        }
    }

    pub fn alternative(mut self) -> Self {
        self.alternative = true;
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Stereotype annotated with another stereotype.
    pub fn stereotype(mut self, stereotype: impl Into<String>) -> Self {
        self.stereotypes.push(stereotype.into());
        self
    }

    /// Beans with this stereotype must have a bean type assignable to `ty`.
    pub fn requires_type(mut self, ty: Type) -> Self {
        self.required_types.push(ty);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_alternative(&self) -> bool {
        self.alternative
    }

    pub fn declared_priority(&self) -> Option<i32> {
        self.priority
    }

    pub fn required_types(&self) -> &[Type] {
        &self.required_types
    }
}

/// Registered stereotypes.
#[derive(Clone, Debug, Default)]
pub struct StereotypeModel {
    defs: HashMap<String, Stereotype>,
}

/// What a set of stereotypes contributes to a bean.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct StereotypeSummary<'a> {
    pub(crate) alternative: bool,
    pub(crate) priorities: BTreeSet<i32>,
    /// Every stereotype reached, directly or nested, in discovery order.
    pub(crate) reached: Vec<&'a Stereotype>,
}

impl StereotypeModel {
    pub fn register(&mut self, stereotype: Stereotype) {
        self.defs.insert(stereotype.name.clone(), stereotype);
    }

    pub fn get(&self, name: &str) -> Option<&Stereotype> {
        self.defs.get(name)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Walk `names` and the stereotypes nested in them.
    pub(crate) fn summarize<'a>(
        &'a self,
        names: &[String],
    ) -> Result<StereotypeSummary<'a>, DefinitionError> {
        let mut summary = StereotypeSummary::default();
        let mut visited = HashSet::new();
        let mut stack: Vec<&str> = names.iter().rev().map(String::as_str).collect();

        while let Some(name) = stack.pop() {
            if !visited.insert(name) {
                continue;
            }
            let stereotype =
                self.defs
                    .get(name)
                    .ok_or_else(|| DefinitionError::UnknownStereotype {
                        stereotype: name.to_owned(),
                    })?;
            summary.alternative |= stereotype.alternative;
            summary.priorities.extend(stereotype.priority);
            summary.reached.push(stereotype);
            stack.extend(stereotype.stereotypes.iter().rev().map(String::as_str));
        }

        Ok(summary)
    }
}
