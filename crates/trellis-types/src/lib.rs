//! Generic type model and Java assignability rules used by bean resolution.
//!
//! A [`Type`] is a structural token describing one *use* of a type: a raw class, a parameterized
//! type, a type variable, a wildcard or a generic array. Class and type-parameter declarations
//! live in a [`TypeEnv`] (usually a [`TypeStore`]) and are referenced by id. This keeps tokens
//! cheap to compare and lets a bound refer back to its own declaration (`E extends Enum<E>`).
//!
//! Two relations are provided on top of the model:
//!
//! - [`is_assignable_covariant`]: normal widening, used to match bean types against a required
//!   type.
//! - [`is_assignable_invariant`]: the stricter rule applied to type arguments (`List<Dog>` is not
//!   a `List<Animal>`).

mod assignability;
mod closure;
mod error;
mod format;
mod raw;
mod store;

pub use assignability::{
    is_assignable_covariant, is_assignable_from_at_least_one, is_assignable_invariant,
    AssignabilityRules, DEFAULT_MAX_TYPE_DEPTH,
};
pub use closure::{type_closure, ClosureCache, TypeClosure};
pub use error::{Result, TypeError};
pub use format::{format_type, TypeDisplay};
pub use raw::{
    boxed, boxed_type, canonical_type, check_well_formed, erasure, is_raw_assignable, substitute,
    type_var_bounds,
};
pub use store::{TypeStore, WellKnownTypes};

use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(u32);

impl ClassId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn to_raw(self) -> u32 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeVarId(u32);

impl TypeVarId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn to_raw(self) -> u32 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
    Void,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 9] = [
        PrimitiveType::Boolean,
        PrimitiveType::Byte,
        PrimitiveType::Short,
        PrimitiveType::Char,
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Float,
        PrimitiveType::Double,
        PrimitiveType::Void,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Char => "char",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
            PrimitiveType::Void => "void",
        }
    }
}

/// A type without type arguments: the runtime notion of a Java `Class`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RawType {
    Class(ClassId),
    Primitive(PrimitiveType),
    Array(Box<RawType>),
}

impl RawType {
    pub fn array_of(component: RawType) -> Self {
        RawType::Array(Box::new(component))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, RawType::Array(_))
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, RawType::Primitive(_))
    }

    pub fn component(&self) -> Option<&RawType> {
        match self {
            RawType::Array(component) => Some(component),
            _ => None,
        }
    }

    pub fn class_id(&self) -> Option<ClassId> {
        match self {
            RawType::Class(id) => Some(*id),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParameterizedType {
    pub raw: ClassId,
    pub args: Vec<Type>,
}

/// `? extends upper super lower`. An unbounded wildcard has `Object` as its upper bound.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WildcardType {
    pub upper: Box<Type>,
    pub lower: Option<Box<Type>>,
}

impl WildcardType {
    pub fn lower(&self) -> Option<&Type> {
        self.lower.as_deref()
    }
}

/// Structural token for a generic type use.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Raw(RawType),
    Parameterized(ParameterizedType),
    Variable(TypeVarId),
    Wildcard(WildcardType),
    GenericArray(Box<Type>),
}

impl Type {
    pub fn class(id: ClassId) -> Self {
        Type::Raw(RawType::Class(id))
    }

    pub fn primitive(primitive: PrimitiveType) -> Self {
        Type::Raw(RawType::Primitive(primitive))
    }

    pub fn parameterized(raw: ClassId, args: Vec<Type>) -> Self {
        Type::Parameterized(ParameterizedType { raw, args })
    }

    pub fn variable(id: TypeVarId) -> Self {
        Type::Variable(id)
    }

    pub fn wildcard(upper: Type, lower: Option<Type>) -> Self {
        Type::Wildcard(WildcardType {
            upper: Box::new(upper),
            lower: lower.map(Box::new),
        })
    }

    /// Array of `component`.
    ///
    /// Arrays of raw components are raw array classes (`String[]`); anything else becomes a
    /// generic array (`T[]`, `List<String>[]`). Keeping this normal form makes structural equality
    /// independent of how the array was built.
    pub fn array(component: Type) -> Self {
        match component {
            Type::Raw(raw) => Type::Raw(RawType::array_of(raw)),
            other => Type::GenericArray(Box::new(other)),
        }
    }

    pub fn as_raw(&self) -> Option<&RawType> {
        match self {
            Type::Raw(raw) => Some(raw),
            _ => None,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Type::Wildcard(_))
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Type::Variable(_))
    }

    /// Raw, parameterized and generic-array types are "actual" types; variables and wildcards
    /// only stand for one.
    pub fn is_actual(&self) -> bool {
        matches!(
            self,
            Type::Raw(_) | Type::Parameterized(_) | Type::GenericArray(_)
        )
    }

    pub fn display<'a>(&'a self, env: &'a dyn TypeEnv) -> TypeDisplay<'a> {
        TypeDisplay::new(env, self)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Annotation,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassDef {
    pub name: String,
    pub kind: ClassKind,
    pub type_params: Vec<TypeVarId>,
    pub super_class: Option<Type>,
    pub interfaces: Vec<Type>,
}

impl ClassDef {
    /// A non-generic declaration without supertypes.
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            type_params: Vec::new(),
            super_class: None,
            interfaces: Vec::new(),
        }
    }

    pub fn with_type_params(mut self, type_params: Vec<TypeVarId>) -> Self {
        self.type_params = type_params;
        self
    }

    pub fn extends(mut self, super_class: Type) -> Self {
        self.super_class = Some(super_class);
        self
    }

    pub fn implements(mut self, interface: Type) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }

    pub fn is_interface(&self) -> bool {
        matches!(self.kind, ClassKind::Interface | ClassKind::Annotation)
    }
}

/// Declaration of a type variable. An empty bound list means `Object`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParamDef {
    pub name: String,
    pub upper_bounds: Vec<Type>,
}

/// Read-only view over class and type-parameter declarations.
pub trait TypeEnv {
    fn class(&self, id: ClassId) -> Option<&ClassDef>;
    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef>;
    fn lookup_class(&self, name: &str) -> Option<ClassId>;
    fn well_known(&self) -> &WellKnownTypes;

    /// Storage for memoized type closures, if this environment keeps one.
    fn closure_cache(&self) -> Option<&ClosureCache> {
        None
    }
}

pub(crate) fn class_def(env: &dyn TypeEnv, id: ClassId) -> Result<&ClassDef> {
    env.class(id).ok_or(TypeError::UnknownClass(id))
}

pub(crate) fn type_param_def(env: &dyn TypeEnv, id: TypeVarId) -> Result<&TypeParamDef> {
    env.type_param(id).ok_or(TypeError::UnknownTypeVariable(id))
}

/// Substitution of type variables by type arguments.
pub type Substitution = HashMap<TypeVarId, Type>;
