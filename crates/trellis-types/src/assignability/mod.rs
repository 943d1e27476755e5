//! Covariant and invariant assignability.
//!
//! Both relations are pure functions of the [`TypeEnv`]. They recurse into each other: covariant
//! matching of two parameterized types compares their arguments invariantly, and an invariant
//! wildcard argument is checked with the covariant containment rules. Neither relation infers
//! type variables; a variable is only ever replaced by its bounds.

mod covariant;
mod invariant;

use crate::{format_type, Result, Type, TypeEnv, TypeError};

/// Default limit on nested comparisons before a type is declared malformed.
pub const DEFAULT_MAX_TYPE_DEPTH: usize = 64;

/// Entry point for both relations, carrying the environment and the recursion limit.
#[derive(Clone, Copy)]
pub struct AssignabilityRules<'env> {
    env: &'env dyn TypeEnv,
    max_depth: usize,
}

impl<'env> AssignabilityRules<'env> {
    pub fn new(env: &'env dyn TypeEnv) -> Self {
        Self {
            env,
            max_depth: DEFAULT_MAX_TYPE_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    pub fn env(&self) -> &'env dyn TypeEnv {
        self.env
    }

    /// Can a reference of type `target` be assigned a value of type `candidate`?
    pub fn is_assignable_covariant(&self, target: &Type, candidate: &Type) -> Result<bool> {
        covariant::is_assignable(self, target, candidate, 0)
    }

    /// Does type argument `target` match type argument `candidate` under generic invariance?
    pub fn is_assignable_invariant(&self, target: &Type, candidate: &Type) -> Result<bool> {
        invariant::is_assignable(self, target, candidate, 0)
    }

    /// Whether at least one of `candidates` is covariantly assignable to `target`.
    pub fn is_assignable_from_at_least_one<'a>(
        &self,
        target: &Type,
        candidates: impl IntoIterator<Item = &'a Type>,
    ) -> Result<bool> {
        for candidate in candidates {
            if self.is_assignable_covariant(target, candidate)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Account for one more level of nesting while comparing `ty`.
    fn descend(&self, depth: usize, ty: &Type) -> Result<usize> {
        if depth >= self.max_depth {
            return Err(TypeError::RecursionLimit {
                limit: self.max_depth,
                ty: format_type(self.env, ty),
            });
        }
        Ok(depth + 1)
    }
}

impl std::fmt::Debug for AssignabilityRules<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssignabilityRules")
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}

pub fn is_assignable_covariant(env: &dyn TypeEnv, target: &Type, candidate: &Type) -> Result<bool> {
    AssignabilityRules::new(env).is_assignable_covariant(target, candidate)
}

pub fn is_assignable_invariant(env: &dyn TypeEnv, target: &Type, candidate: &Type) -> Result<bool> {
    AssignabilityRules::new(env).is_assignable_invariant(target, candidate)
}

pub fn is_assignable_from_at_least_one<'a>(
    env: &dyn TypeEnv,
    target: &Type,
    candidates: impl IntoIterator<Item = &'a Type>,
) -> Result<bool> {
    AssignabilityRules::new(env).is_assignable_from_at_least_one(target, candidates)
}
