//! Erasure, boxing and raw (`Class.isAssignableFrom`) assignability.

use std::collections::{HashSet, VecDeque};

use crate::{
    class_def, format_type, type_param_def, ClassId, RawType, Result, Substitution, Type,
    TypeEnv, TypeError, TypeVarId, WildcardType,
};

/// Upper bounds of a type variable; an unbounded variable is bounded by `Object`.
pub fn type_var_bounds(env: &dyn TypeEnv, id: TypeVarId) -> Result<Vec<Type>> {
    let def = type_param_def(env, id)?;
    if def.upper_bounds.is_empty() {
        return Ok(vec![env.well_known().object_type()]);
    }
    Ok(def.upper_bounds.clone())
}

/// The raw type a token erases to.
///
/// Type variables erase to their first bound, wildcards to their upper bound and generic arrays
/// to the array class of their erased component.
pub fn erasure(env: &dyn TypeEnv, ty: &Type) -> Result<RawType> {
    let mut seen_vars = HashSet::new();
    erasure_inner(env, ty, &mut seen_vars)
}

fn erasure_inner(
    env: &dyn TypeEnv,
    ty: &Type,
    seen_vars: &mut HashSet<TypeVarId>,
) -> Result<RawType> {
    match ty {
        Type::Raw(raw) => Ok(raw.clone()),
        Type::Parameterized(p) => Ok(RawType::Class(p.raw)),
        Type::Variable(id) => {
            if !seen_vars.insert(*id) {
                return Err(TypeError::CyclicTypeVariable(format_type(env, ty)));
            }
            let bounds = type_var_bounds(env, *id)?;
            match bounds.first() {
                Some(bound) => erasure_inner(env, bound, seen_vars),
                None => Ok(RawType::Class(env.well_known().object)),
            }
        }
        Type::Wildcard(WildcardType { upper, .. }) => erasure_inner(env, upper, seen_vars),
        Type::GenericArray(component) => Ok(RawType::array_of(erasure_inner(
            env, component, seen_vars,
        )?)),
    }
}

/// Replace a primitive by its wrapper class. Primitive arrays are left alone.
pub fn boxed(env: &dyn TypeEnv, raw: &RawType) -> RawType {
    match raw {
        RawType::Primitive(p) => RawType::Class(env.well_known().boxed(*p)),
        other => other.clone(),
    }
}

/// [`boxed`] lifted to type tokens.
pub fn boxed_type(env: &dyn TypeEnv, ty: &Type) -> Type {
    match ty {
        Type::Raw(raw @ RawType::Primitive(_)) => Type::Raw(boxed(env, raw)),
        other => other.clone(),
    }
}

/// The fully parameterized form of a raw type.
///
/// A generic class `C` becomes `C<T1, .., Tn>` over its own type parameters; an array of a generic
/// class becomes a generic array. Any other raw type is its own canonical form, so
/// `canonical_type(c) != Type::Raw(c)` identifies a raw use of a generic class.
pub fn canonical_type(env: &dyn TypeEnv, raw: &RawType) -> Result<Type> {
    match raw {
        RawType::Class(id) => {
            let def = class_def(env, *id)?;
            if def.type_params.is_empty() {
                return Ok(Type::Raw(raw.clone()));
            }
            let args = def.type_params.iter().copied().map(Type::Variable).collect();
            Ok(Type::parameterized(*id, args))
        }
        RawType::Array(component) => Ok(Type::array(canonical_type(env, component)?)),
        RawType::Primitive(_) => Ok(Type::Raw(raw.clone())),
    }
}

/// Java's `Class.isAssignableFrom`: can a value of raw type `from` be stored in a `to`?
///
/// No boxing is applied here; see [`boxed`].
pub fn is_raw_assignable(env: &dyn TypeEnv, to: &RawType, from: &RawType) -> Result<bool> {
    if to == from {
        return Ok(true);
    }
    let wk = env.well_known();
    match (to, from) {
        (RawType::Class(_), RawType::Primitive(_)) => Ok(false),
        (RawType::Class(to), _) if *to == wk.object => Ok(true),
        (RawType::Class(to), RawType::Class(from)) => class_extends(env, *from, *to),
        (RawType::Class(to), RawType::Array(_)) => {
            Ok(*to == wk.cloneable || *to == wk.serializable)
        }
        (RawType::Array(to), RawType::Array(from)) => {
            // Primitive arrays are only assignable to themselves.
            if to.is_primitive() || from.is_primitive() {
                return Ok(false);
            }
            is_raw_assignable(env, to, from)
        }
        _ => Ok(false),
    }
}

/// Whether class `sub` is `sup` or has it among its erased supertypes.
fn class_extends(env: &dyn TypeEnv, sub: ClassId, sup: ClassId) -> Result<bool> {
    let mut queue = VecDeque::from([sub]);
    let mut seen = HashSet::new();
    while let Some(current) = queue.pop_front() {
        if current == sup {
            return Ok(true);
        }
        if !seen.insert(current) {
            continue;
        }
        let def = class_def(env, current)?;
        for supertype in def.super_class.iter().chain(def.interfaces.iter()) {
            match supertype {
                Type::Raw(RawType::Class(id)) => queue.push_back(*id),
                Type::Parameterized(p) => queue.push_back(p.raw),
                _ => {}
            }
        }
    }
    Ok(false)
}

/// Apply `subst` to every type variable occurring in `ty`.
pub fn substitute(ty: &Type, subst: &Substitution) -> Type {
    match ty {
        Type::Raw(_) => ty.clone(),
        Type::Variable(id) => subst.get(id).cloned().unwrap_or_else(|| ty.clone()),
        Type::Parameterized(p) => Type::parameterized(
            p.raw,
            p.args.iter().map(|arg| substitute(arg, subst)).collect(),
        ),
        Type::Wildcard(w) => Type::wildcard(
            substitute(&w.upper, subst),
            w.lower().map(|lower| substitute(lower, subst)),
        ),
        Type::GenericArray(component) => Type::array(substitute(component, subst)),
    }
}

/// Check that every id referenced by `ty` is declared and every parameterized use supplies as
/// many arguments as its class declares.
pub fn check_well_formed(env: &dyn TypeEnv, ty: &Type) -> Result<()> {
    match ty {
        Type::Raw(RawType::Class(id)) => class_def(env, *id).map(|_| ()),
        Type::Raw(RawType::Array(component)) => {
            check_well_formed(env, &Type::Raw((**component).clone()))
        }
        Type::Raw(RawType::Primitive(_)) => Ok(()),
        Type::Parameterized(p) => {
            let def = class_def(env, p.raw)?;
            if def.type_params.len() != p.args.len() {
                return Err(TypeError::WrongArgumentCount {
                    ty: format_type(env, ty),
                    expected: def.type_params.len(),
                    found: p.args.len(),
                });
            }
            p.args.iter().try_for_each(|arg| check_well_formed(env, arg))
        }
        Type::Variable(id) => type_param_def(env, *id).map(|_| ()),
        Type::Wildcard(w) => {
            check_well_formed(env, &w.upper)?;
            w.lower()
                .map(|lower| check_well_formed(env, lower))
                .unwrap_or(Ok(()))
        }
        Type::GenericArray(component) => check_well_formed(env, component),
    }
}
