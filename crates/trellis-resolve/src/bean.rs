use std::sync::Arc;

use trellis_types::{canonical_type, type_closure, ClassId, RawType, Type, TypeEnv, TypeError};

use crate::qualifier::{Qualifier, QualifierInstance};

/// Declared metadata of a bean, as produced by discovery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bean {
    name: String,
    bean_class: ClassId,
    types: Vec<Type>,
    qualifiers: Vec<Qualifier>,
    alternative: bool,
    priority: Option<i32>,
    stereotypes: Vec<String>,
    specializes: Option<String>,
}

impl Bean {
    pub fn builder(name: impl Into<String>, bean_class: ClassId) -> BeanBuilder {
        BeanBuilder {
            bean: Bean {
                name: name.into(),
                bean_class,
                types: Vec::new(),
                qualifiers: Vec::new(),
                alternative: false,
                priority: None,
                stereotypes: Vec::new(),
                specializes: None,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bean_class(&self) -> ClassId {
        self.bean_class
    }

    pub fn types(&self) -> &[Type] {
        &self.types
    }

    pub fn qualifiers(&self) -> &[Qualifier] {
        &self.qualifiers
    }

    /// Declared `@Alternative`. Stereotypes may also make a bean an alternative; see
    /// [`RegisteredBean::is_alternative`].
    pub fn is_alternative(&self) -> bool {
        self.alternative
    }

    /// Declared `@Priority`.
    pub fn priority(&self) -> Option<i32> {
        self.priority
    }

    pub fn stereotypes(&self) -> &[String] {
        &self.stereotypes
    }

    pub fn specializes(&self) -> Option<&str> {
        self.specializes.as_deref()
    }
}

#[derive(Clone, Debug)]
pub struct BeanBuilder {
    bean: Bean,
}

impl BeanBuilder {
    /// Add a bean type. Duplicates are ignored.
    pub fn bean_type(mut self, ty: Type) -> Self {
        if !self.bean.types.contains(&ty) {
            self.bean.types.push(ty);
        }
        self
    }

    pub fn bean_types(self, types: impl IntoIterator<Item = Type>) -> Self {
        types.into_iter().fold(self, BeanBuilder::bean_type)
    }

    /// Use every type in the hierarchy of the bean class as a bean type, which is what a managed
    /// bean without `@Typed` exposes.
    ///
    /// A generic bean class contributes its canonical form (`Repo<T>`), so the type variables stay
    /// bounded rather than erased.
    pub fn types_from_hierarchy(self, env: &dyn TypeEnv) -> Result<Self, TypeError> {
        let class = canonical_type(env, &RawType::Class(self.bean.bean_class))?;
        let closure = type_closure(env, &class)?;
        Ok(self.bean_types(closure.iter().cloned()))
    }

    pub fn qualifier(mut self, qualifier: Qualifier) -> Self {
        self.bean.qualifiers.push(qualifier);
        self
    }

    pub fn alternative(mut self) -> Self {
        self.bean.alternative = true;
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.bean.priority = Some(priority);
        self
    }

    pub fn stereotype(mut self, stereotype: impl Into<String>) -> Self {
        self.bean.stereotypes.push(stereotype.into());
        self
    }

    pub fn specializes(mut self, bean: impl Into<String>) -> Self {
        self.bean.specializes = Some(bean.into());
        self
    }

    pub fn build(self) -> Bean {
        self.bean
    }
}

/// A bean accepted by the registry, with the metadata it inherits from stereotypes and
/// specialization resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisteredBean {
    pub(crate) bean: Arc<Bean>,
    pub(crate) qualifiers: Vec<QualifierInstance>,
    pub(crate) alternative: bool,
    pub(crate) priority: Option<i32>,
}

impl RegisteredBean {
    pub fn bean(&self) -> &Arc<Bean> {
        &self.bean
    }

    pub fn name(&self) -> &str {
        self.bean.name()
    }

    /// Normalized qualifiers, sorted. Includes qualifiers inherited from a specialized bean.
    pub fn qualifiers(&self) -> &[QualifierInstance] {
        &self.qualifiers
    }

    pub fn has_qualifier(&self, qualifier: &QualifierInstance) -> bool {
        self.qualifiers.binary_search(qualifier).is_ok()
    }

    /// Declared an alternative directly or through a stereotype.
    pub fn is_alternative(&self) -> bool {
        self.alternative
    }

    /// Declared priority, or the single priority found among the bean's stereotypes.
    pub fn priority(&self) -> Option<i32> {
        self.priority
    }
}
