//! Qualifier annotations and their binding-member normal form.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::DefinitionError;

pub const DEFAULT_QUALIFIER: &str = "jakarta.enterprise.inject.Default";
pub const ANY_QUALIFIER: &str = "jakarta.enterprise.inject.Any";
pub const NAMED_QUALIFIER: &str = "jakarta.inject.Named";

/// Value of an annotation member.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnnotationValue {
    Bool(bool),
    Int(i64),
    Str(String),
    /// Enum constant, by simple name.
    Enum(String),
    /// Class literal, by binary name.
    Class(String),
    Array(Vec<AnnotationValue>),
}

impl From<bool> for AnnotationValue {
    fn from(value: bool) -> Self {
        AnnotationValue::Bool(value)
    }
}

impl From<i64> for AnnotationValue {
    fn from(value: i64) -> Self {
        AnnotationValue::Int(value)
    }
}

impl From<&str> for AnnotationValue {
    fn from(value: &str) -> Self {
        AnnotationValue::Str(value.to_owned())
    }
}

impl From<String> for AnnotationValue {
    fn from(value: String) -> Self {
        AnnotationValue::Str(value)
    }
}

impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationValue::Bool(value) => write!(f, "{value}"),
            AnnotationValue::Int(value) => write!(f, "{value}"),
            AnnotationValue::Str(value) => write!(f, "{value:?}"),
            AnnotationValue::Enum(value) => f.write_str(value),
            AnnotationValue::Class(value) => write!(f, "{value}.class"),
            AnnotationValue::Array(values) => {
                f.write_str("{")?;
                for (idx, value) in values.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// A qualifier annotation as written on a bean or an injection point.
///
/// Members left out take their declared default when the qualifier is normalized.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Qualifier {
    annotation: String,
    members: BTreeMap<String, AnnotationValue>,
}

impl Qualifier {
    pub fn new(annotation: impl Into<String>) -> Self {
        Self {
            annotation: annotation.into(),
            members: BTreeMap::new(),
        }
    }

    pub fn with_member(mut self, name: impl Into<String>, value: impl Into<AnnotationValue>) -> Self {
        self.members.insert(name.into(), value.into());
        self
    }

    /// `@Named("name")`
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(NAMED_QUALIFIER).with_member("value", AnnotationValue::Str(name.into()))
    }

    /// `@Default`
    pub fn default_qualifier() -> Self {
        Self::new(DEFAULT_QUALIFIER)
    }

    /// `@Any`
    pub fn any() -> Self {
        Self::new(ANY_QUALIFIER)
    }

    pub fn annotation(&self) -> &str {
        &self.annotation
    }

    pub fn member(&self, name: &str) -> Option<&AnnotationValue> {
        self.members.get(name)
    }

    pub fn members(&self) -> impl Iterator<Item = (&str, &AnnotationValue)> + '_ {
        self.members.iter().map(|(name, value)| (name.as_str(), value))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct MemberDef {
    default: Option<AnnotationValue>,
    binding: bool,
}

/// Declaration of a qualifier annotation type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QualifierDef {
    name: String,
    members: BTreeMap<String, MemberDef>,
}

impl QualifierDef {
    /// A qualifier without members.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: BTreeMap::new(),
        }
    }

    /// Declare a binding member. Without a default, every use must supply a value.
    pub fn member(mut self, name: impl Into<String>, default: Option<AnnotationValue>) -> Self {
        self.members.insert(
            name.into(),
            MemberDef {
                default,
                binding: true,
            },
        );
        self
    }

    /// Declare a member that is ignored when comparing qualifiers (`@Nonbinding`).
    pub fn non_binding(mut self, name: impl Into<String>, default: Option<AnnotationValue>) -> Self {
        self.members.insert(
            name.into(),
            MemberDef {
                default,
                binding: false,
            },
        );
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_binding(&self, member: &str) -> bool {
        self.members.get(member).is_some_and(|def| def.binding)
    }
}

/// Qualifier reduced to its binding members, defaults applied. Two qualifiers match exactly when
/// their instances are equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifierInstance {
    annotation: String,
    binding: BTreeMap<String, AnnotationValue>,
}

impl QualifierInstance {
    pub fn annotation(&self) -> &str {
        &self.annotation
    }

    pub fn binding_member(&self, name: &str) -> Option<&AnnotationValue> {
        self.binding.get(name)
    }
}

impl fmt::Display for QualifierInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.annotation)?;
        if self.binding.is_empty() {
            return Ok(());
        }
        f.write_str("(")?;
        for (idx, (name, value)) in self.binding.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str(")")
    }
}

/// Registered qualifier annotation types.
#[derive(Clone, Debug)]
pub struct QualifierModel {
    defs: HashMap<String, QualifierDef>,
}

impl Default for QualifierModel {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl QualifierModel {
    /// A model that knows `@Default`, `@Any` and `@Named`.
    pub fn with_builtins() -> Self {
        let mut model = Self {
            defs: HashMap::new(),
        };
        model.register(QualifierDef::new(DEFAULT_QUALIFIER));
        model.register(QualifierDef::new(ANY_QUALIFIER));
        model.register(
            QualifierDef::new(NAMED_QUALIFIER).member("value", Some(AnnotationValue::from(""))),
        );
        model
    }

    /// Register (or replace) a qualifier declaration.
    pub fn register(&mut self, def: QualifierDef) {
        self.defs.insert(def.name.clone(), def);
    }

    pub fn get(&self, annotation: &str) -> Option<&QualifierDef> {
        self.defs.get(annotation)
    }

    pub fn is_qualifier(&self, annotation: &str) -> bool {
        self.defs.contains_key(annotation)
    }

    /// Check `qualifier` against its declaration and reduce it to its binding members.
    pub fn normalize(&self, qualifier: &Qualifier) -> Result<QualifierInstance, DefinitionError> {
        let def = self
            .defs
            .get(&qualifier.annotation)
            .ok_or_else(|| DefinitionError::UnknownQualifier {
                annotation: qualifier.annotation.clone(),
            })?;

        if let Some(member) = qualifier.members.keys().find(|m| !def.members.contains_key(*m)) {
            return Err(DefinitionError::UnknownQualifierMember {
                annotation: def.name.clone(),
                member: member.clone(),
            });
        }

        let mut binding = BTreeMap::new();
        for (name, member) in &def.members {
            let value = qualifier
                .members
                .get(name)
                .or(member.default.as_ref())
                .ok_or_else(|| DefinitionError::MissingQualifierMember {
                    annotation: def.name.clone(),
                    member: name.clone(),
                })?;
            if member.binding {
                binding.insert(name.clone(), value.clone());
            }
        }

        Ok(QualifierInstance {
            annotation: def.name.clone(),
            binding,
        })
    }
}
