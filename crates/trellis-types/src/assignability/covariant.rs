//! Covariant (normal widening) assignability.
//!
//! One function per (target shape, candidate shape) pair. Combinations Java never allows return
//! `false`; only malformed metadata produces an error.

use std::collections::HashSet;

use super::{invariant, AssignabilityRules};
use crate::{
    boxed, canonical_type, erasure, format_type, is_raw_assignable, type_closure,
    type_var_bounds, ParameterizedType, RawType, Result, Type, TypeError, TypeVarId,
    WildcardType,
};

pub(super) fn is_assignable(
    rules: &AssignabilityRules<'_>,
    target: &Type,
    candidate: &Type,
    depth: usize,
) -> Result<bool> {
    let depth = rules.descend(depth, target)?;

    match target {
        Type::Raw(t) => match candidate {
            Type::Raw(c) => raw_from_raw(rules, t, c),
            Type::Parameterized(c) => is_raw_assignable(rules.env(), t, &RawType::Class(c.raw)),
            Type::Variable(c) => from_variable_bounds(rules, target, *c, depth),
            Type::Wildcard(_) => Ok(false),
            Type::GenericArray(c) => raw_from_generic_array(rules, t, c),
        },
        Type::Parameterized(t) => match candidate {
            Type::Raw(c) => parameterized_from_raw(rules, t, c, depth),
            Type::Parameterized(c) => parameterized_from_parameterized(rules, t, c, depth),
            Type::Variable(c) => from_variable_bounds(rules, target, *c, depth),
            Type::Wildcard(_) | Type::GenericArray(_) => Ok(false),
        },
        Type::Variable(t) => match candidate {
            Type::Variable(c) => variable_from_variable(rules, *t, *c),
            Type::Raw(_) | Type::Parameterized(_) | Type::Wildcard(_) | Type::GenericArray(_) => {
                Ok(false)
            }
        },
        Type::Wildcard(t) => match candidate {
            Type::Raw(_) | Type::Parameterized(_) | Type::GenericArray(_) => {
                wildcard_from_actual(rules, t, candidate, depth)
            }
            Type::Variable(_) => wildcard_from_variable(rules, t, candidate, depth),
            Type::Wildcard(c) => wildcard_from_wildcard(rules, t, c, depth),
        },
        Type::GenericArray(t) => match candidate {
            Type::Raw(c) => generic_array_from_raw(rules, t, c),
            Type::GenericArray(c) => is_assignable(rules, t, c, depth),
            // Array types cannot be bounds of type variables.
            Type::Parameterized(_) | Type::Variable(_) | Type::Wildcard(_) => Ok(false),
        },
    }
}

/*
 * Raw target
 */

fn raw_from_raw(rules: &AssignabilityRules<'_>, target: &RawType, candidate: &RawType) -> Result<bool> {
    let env = rules.env();
    is_raw_assignable(env, &boxed(env, target), &boxed(env, candidate))
}

fn raw_from_generic_array(
    rules: &AssignabilityRules<'_>,
    target: &RawType,
    component: &Type,
) -> Result<bool> {
    let env = rules.env();
    if *target == RawType::Class(env.well_known().object) {
        return Ok(true);
    }
    match target.component() {
        Some(target_component) => {
            raw_from_raw(rules, target_component, &erasure(env, component)?)
        }
        None => Ok(false),
    }
}

/// A variable is as good as any of its bounds.
fn from_variable_bounds(
    rules: &AssignabilityRules<'_>,
    target: &Type,
    candidate: TypeVarId,
    depth: usize,
) -> Result<bool> {
    let mut visited = HashSet::new();
    bounds_accept(rules, target, candidate, depth, &mut visited)
}

/// Variable bounds are followed here rather than through the dispatch so a cycle is reported
/// as such instead of exhausting the depth limit.
fn bounds_accept(
    rules: &AssignabilityRules<'_>,
    target: &Type,
    var: TypeVarId,
    depth: usize,
    visited: &mut HashSet<TypeVarId>,
) -> Result<bool> {
    let env = rules.env();
    if !visited.insert(var) {
        return Err(TypeError::CyclicTypeVariable(format_type(env, &Type::Variable(var))));
    }
    for bound in type_var_bounds(env, var)? {
        let accepted = match bound {
            Type::Variable(next) => bounds_accept(rules, target, next, depth, visited)?,
            other => is_assignable(rules, target, &other, depth)?,
        };
        if accepted {
            return Ok(true);
        }
    }
    Ok(false)
}

/*
 * Parameterized target
 */

fn parameterized_from_raw(
    rules: &AssignabilityRules<'_>,
    target: &ParameterizedType,
    candidate: &RawType,
    depth: usize,
) -> Result<bool> {
    let env = rules.env();
    if !raw_from_raw(rules, &RawType::Class(target.raw), candidate)? {
        return Ok(false);
    }
    // A raw use of a generic class is accepted for legacy compatibility.
    let candidate_ty = Type::Raw(candidate.clone());
    if canonical_type(env, candidate)? != candidate_ty {
        return Ok(true);
    }
    matches_in_closure(rules, target, &candidate_ty, depth)
}

fn parameterized_from_parameterized(
    rules: &AssignabilityRules<'_>,
    target: &ParameterizedType,
    candidate: &ParameterizedType,
    depth: usize,
) -> Result<bool> {
    if !raw_from_raw(rules, &RawType::Class(target.raw), &RawType::Class(candidate.raw))? {
        return Ok(false);
    }
    if matches(rules, target, candidate, depth)? {
        return Ok(true);
    }
    matches_in_closure(rules, target, &Type::Parameterized(candidate.clone()), depth)
}

fn matches_in_closure(
    rules: &AssignabilityRules<'_>,
    target: &ParameterizedType,
    candidate: &Type,
    depth: usize,
) -> Result<bool> {
    let closure = type_closure(rules.env(), candidate)?;
    for ty in closure.iter() {
        if let Type::Parameterized(p) = ty {
            if matches(rules, target, p, depth)? {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

/// Same class, arguments pairwise invariant.
fn matches(
    rules: &AssignabilityRules<'_>,
    target: &ParameterizedType,
    candidate: &ParameterizedType,
    depth: usize,
) -> Result<bool> {
    if target.raw != candidate.raw {
        return Ok(false);
    }
    if target.args.len() != candidate.args.len() {
        let env = rules.env();
        return Err(TypeError::ArgumentCountMismatch {
            first: format_type(env, &Type::Parameterized(target.clone())),
            second: format_type(env, &Type::Parameterized(candidate.clone())),
        });
    }
    for (t, c) in target.args.iter().zip(&candidate.args) {
        // A type recursive in `t` (`Enum<E extends Enum<E>>`) accepts any argument there: a
        // candidate that differs would already violate the bound.
        if let Type::Variable(var) = t {
            if is_type_recursive_in(rules, target, *var)? {
                continue;
            }
        }
        if !invariant::is_assignable(rules, t, c, depth)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Whether `ty` is recursive in `var`, one of its type arguments: some uppermost bound of `var`
/// is `ty` itself, or is recursive in one of its own variable arguments.
fn is_type_recursive_in(
    rules: &AssignabilityRules<'_>,
    ty: &ParameterizedType,
    var: TypeVarId,
) -> Result<bool> {
    let mut visited = HashSet::new();
    recursive_in(rules, ty, var, &mut visited)
}

fn recursive_in(
    rules: &AssignabilityRules<'_>,
    ty: &ParameterizedType,
    var: TypeVarId,
    visited: &mut HashSet<(ParameterizedType, TypeVarId)>,
) -> Result<bool> {
    if !visited.insert((ty.clone(), var)) {
        return Ok(false);
    }
    for bound in uppermost_bounds(rules, var)? {
        let Type::Parameterized(bound) = bound else {
            continue;
        };
        if bound == *ty {
            return Ok(true);
        }
        for arg in &bound.args {
            if let Type::Variable(arg) = arg {
                if recursive_in(rules, &bound, *arg, visited)? {
                    return Ok(true);
                }
            }
        }
    }
    Ok(false)
}

/// Bounds of the last variable in a chain `A extends B`, `B extends C`, ...
fn uppermost_bounds(rules: &AssignabilityRules<'_>, var: TypeVarId) -> Result<Vec<Type>> {
    let env = rules.env();
    let mut seen = HashSet::new();
    let mut current = var;
    loop {
        if !seen.insert(current) {
            return Err(TypeError::CyclicTypeVariable(format_type(
                env,
                &Type::Variable(current),
            )));
        }
        let bounds = type_var_bounds(env, current)?;
        match bounds.first() {
            Some(Type::Variable(next)) => current = *next,
            _ => return Ok(bounds),
        }
    }
}

/*
 * Type variable target
 */

/// `candidate` is `target` or (transitively) extends it. A variable bounded by another variable
/// cannot declare further bounds, so only the first bound is followed.
fn variable_from_variable(
    rules: &AssignabilityRules<'_>,
    target: TypeVarId,
    candidate: TypeVarId,
) -> Result<bool> {
    let env = rules.env();
    let mut seen = HashSet::new();
    let mut current = candidate;
    loop {
        if current == target {
            return Ok(true);
        }
        if !seen.insert(current) {
            return Err(TypeError::CyclicTypeVariable(format_type(
                env,
                &Type::Variable(current),
            )));
        }
        match type_var_bounds(env, current)?.first() {
            Some(Type::Variable(next)) => current = *next,
            _ => return Ok(false),
        }
    }
}

/*
 * Wildcard target
 */

/// Shared by raw, parameterized and generic-array candidates.
fn wildcard_from_actual(
    rules: &AssignabilityRules<'_>,
    target: &WildcardType,
    candidate: &Type,
    depth: usize,
) -> Result<bool> {
    if !is_assignable(rules, &target.upper, candidate, depth)? {
        return Ok(false);
    }
    match target.lower() {
        Some(lower) => is_assignable(rules, candidate, lower, depth),
        None => Ok(true),
    }
}

/// With a lower bound, the check is reversed against the variable itself.
fn wildcard_from_variable(
    rules: &AssignabilityRules<'_>,
    target: &WildcardType,
    candidate: &Type,
    depth: usize,
) -> Result<bool> {
    match target.lower() {
        Some(lower) => is_assignable(rules, candidate, lower, depth),
        None => is_assignable(rules, &target.upper, candidate, depth),
    }
}

fn wildcard_from_wildcard(
    rules: &AssignabilityRules<'_>,
    target: &WildcardType,
    candidate: &WildcardType,
    depth: usize,
) -> Result<bool> {
    if !is_assignable(rules, &target.upper, &candidate.upper, depth)? {
        return Ok(false);
    }
    match (target.lower(), candidate.lower()) {
        // Lower bounds are contravariant.
        (Some(target_lower), Some(candidate_lower)) => {
            is_assignable(rules, candidate_lower, target_lower, depth)
        }
        (Some(_), None) => Ok(false),
        (None, Some(_)) => Ok(rules.env().well_known().is_object(&target.upper)),
        (None, None) => Ok(true),
    }
}

/*
 * Generic array target
 */

fn generic_array_from_raw(
    rules: &AssignabilityRules<'_>,
    component: &Type,
    candidate: &RawType,
) -> Result<bool> {
    match candidate.component() {
        Some(candidate_component) => {
            let target_component = erasure(rules.env(), component)?;
            raw_from_raw(rules, &target_component, candidate_component)
        }
        None => Ok(false),
    }
}
