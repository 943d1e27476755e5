use crate::{ClassId, TypeVarId};

pub type Result<T> = std::result::Result<T, TypeError>;

/// Model-consistency errors.
///
/// These are never retried: they mean the class metadata handed to the type system is malformed
/// or inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    #[error("unknown class id {}", .0.to_raw())]
    UnknownClass(ClassId),

    #[error("unknown type variable id {}", .0.to_raw())]
    UnknownTypeVariable(TypeVarId),

    #[error("invalid type argument combination: `{first}` and `{second}`")]
    ArgumentCountMismatch { first: String, second: String },

    #[error("`{ty}` has {found} type arguments but its class declares {expected}")]
    WrongArgumentCount {
        ty: String,
        expected: usize,
        found: usize,
    },

    #[error("`{0}` is not a type")]
    NotAType(String),

    #[error("type variable `{0}` is bounded by itself")]
    CyclicTypeVariable(String),

    #[error("type nesting deeper than {limit} levels while checking `{ty}`")]
    RecursionLimit { limit: usize, ty: String },
}
