//! Invariant assignability of type arguments.

use super::{covariant, AssignabilityRules};
use crate::{boxed_type, format_type, Result, Type, TypeError};

pub(super) fn is_assignable(
    rules: &AssignabilityRules<'_>,
    target: &Type,
    candidate: &Type,
    depth: usize,
) -> Result<bool> {
    let depth = rules.descend(depth, target)?;

    // Wildcard arguments are containment checks, which the covariant rules implement.
    if target.is_wildcard() {
        return covariant::is_assignable(rules, target, candidate, depth);
    }

    let env = rules.env();
    let target = boxed_type(env, target);
    let candidate = boxed_type(env, candidate);
    if target == candidate {
        return Ok(true);
    }

    match (&target, &candidate) {
        (Type::Parameterized(t), Type::Parameterized(c)) => {
            if t.raw != c.raw {
                return Ok(false);
            }
            if t.args.len() != c.args.len() {
                return Err(TypeError::ArgumentCountMismatch {
                    first: format_type(env, &target),
                    second: format_type(env, &candidate),
                });
            }
            for (t_arg, c_arg) in t.args.iter().zip(&c.args) {
                if !is_assignable(rules, t_arg, c_arg, depth)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        (Type::GenericArray(t), Type::GenericArray(c)) => is_assignable(rules, t, c, depth),
        _ => Ok(false),
    }
}
