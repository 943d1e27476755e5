use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use indexmap::IndexMap;
use trellis_types::{check_well_formed, format_type, AssignabilityRules, Type};

use crate::bean::{Bean, RegisteredBean};
use crate::enablement::StereotypeModel;
use crate::qualifier::QualifierModel;
use crate::DefinitionError;

/// Beans in registration order, keyed by name.
#[derive(Clone, Debug, Default)]
pub struct BeanRegistry {
    beans: IndexMap<String, Arc<RegisteredBean>>,
    /// Specialized bean name to the names of the beans specializing it.
    specialized_by: HashMap<String, Vec<String>>,
}

impl BeanRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.beans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beans.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<RegisteredBean>> {
        self.beans.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<RegisteredBean>> + '_ {
        self.beans.values()
    }

    /// Beans that directly specialize `name`.
    pub fn specializers_of<'a>(
        &'a self,
        name: &str,
    ) -> impl Iterator<Item = &'a Arc<RegisteredBean>> + 'a {
        self.specialized_by
            .get(name)
            .into_iter()
            .flatten()
            .filter_map(|specializer| self.beans.get(specializer))
    }

    pub fn clear(&mut self) {
        self.beans.clear();
        self.specialized_by.clear();
    }

    /// Validate `bean` and resolve what it inherits from stereotypes and from the bean it
    /// specializes.
    pub(crate) fn register(
        &mut self,
        bean: Bean,
        deployment: &Deployment<'_>,
    ) -> Result<Arc<RegisteredBean>, DefinitionError> {
        let name = bean.name().to_owned();
        if self.beans.contains_key(&name) {
            return Err(DefinitionError::DuplicateBeanName { bean: name });
        }
        check_bean_types(&bean, deployment)?;

        let mut qualifiers = BTreeSet::new();
        for qualifier in bean.qualifiers() {
            qualifiers.insert(deployment.qualifiers.normalize(qualifier)?);
        }

        let specialized = match bean.specializes() {
            Some(target) => Some(self.beans.get(target).cloned().ok_or_else(|| {
                DefinitionError::UnknownSpecializedBean {
                    bean: name.clone(),
                    specialized: target.to_owned(),
                }
            })?),
            None => None,
        };
        if let Some(specialized) = &specialized {
            qualifiers.extend(specialized.qualifiers().iter().cloned());
        }

        let summary = deployment.stereotypes.summarize(bean.stereotypes())?;
        for stereotype in &summary.reached {
            for required in stereotype.required_types() {
                if !deployment
                    .rules
                    .is_assignable_from_at_least_one(required, bean.types())
                    .map_err(|source| DefinitionError::MalformedBeanType {
                        bean: name.clone(),
                        source,
                    })?
                {
                    return Err(DefinitionError::StereotypeRequiredType {
                        bean: name,
                        stereotype: stereotype.name().to_owned(),
                        required: format_type(deployment.rules.env(), required),
                    });
                }
            }
        }

        // A priority on the bean itself wins over anything found on its stereotypes.
        let priority = match bean.priority() {
            Some(priority) => Some(priority),
            None if summary.priorities.len() > 1 => {
                return Err(DefinitionError::MultiplePriorityValues {
                    bean: name,
                    priorities: summary.priorities.into_iter().collect(),
                });
            }
            None => summary.priorities.first().copied(),
        };

        let registered = Arc::new(RegisteredBean {
            alternative: bean.is_alternative() || summary.alternative,
            priority,
            qualifiers: qualifiers.into_iter().collect(),
            bean: Arc::new(bean),
        });

        if let Some(specialized) = specialized {
            self.specialized_by
                .entry(specialized.name().to_owned())
                .or_default()
                .push(name.clone());
        }
        self.beans.insert(name, registered.clone());
        Ok(registered)
    }
}

/// Models a bean is validated against.
pub(crate) struct Deployment<'a> {
    pub(crate) rules: AssignabilityRules<'a>,
    pub(crate) qualifiers: &'a QualifierModel,
    pub(crate) stereotypes: &'a StereotypeModel,
}

fn check_bean_types(bean: &Bean, deployment: &Deployment<'_>) -> Result<(), DefinitionError> {
    if bean.types().is_empty() {
        return Err(DefinitionError::NoBeanTypes {
            bean: bean.name().to_owned(),
        });
    }

    let env = deployment.rules.env();
    for ty in bean.types() {
        let reason = match ty {
            Type::Wildcard(_) => Some("a wildcard is not a type"),
            Type::Variable(_) => Some("a type variable cannot be a bean type"),
            Type::Raw(_) | Type::Parameterized(_) | Type::GenericArray(_) => None,
        };
        if let Some(reason) = reason {
            return Err(DefinitionError::IllegalBeanType {
                bean: bean.name().to_owned(),
                ty: format_type(env, ty),
                reason,
            });
        }
        check_well_formed(env, ty).map_err(|source| DefinitionError::MalformedBeanType {
            bean: bean.name().to_owned(),
            source,
        })?;
    }
    Ok(())
}
