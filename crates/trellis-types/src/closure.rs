//! Hierarchy discovery: the set of all supertypes of a type, with type arguments substituted
//! through the subtype's bindings.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use indexmap::IndexSet;
use parking_lot::RwLock;

use crate::{
    class_def, format_type, substitute, type_var_bounds, ClassId, RawType, Result, Substitution,
    Type, TypeEnv, TypeError, TypeVarId,
};

/// Every type a value of some type can be viewed as, in discovery order (the type itself first).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeClosure {
    types: IndexSet<Type>,
}

impl TypeClosure {
    pub fn iter(&self) -> impl Iterator<Item = &Type> + '_ {
        self.types.iter()
    }

    pub fn contains(&self, ty: &Type) -> bool {
        self.types.contains(ty)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl<'a> IntoIterator for &'a TypeClosure {
    type Item = &'a Type;
    type IntoIter = indexmap::set::Iter<'a, Type>;

    fn into_iter(self) -> Self::IntoIter {
        self.types.iter()
    }
}

/// Memoized closures, keyed structurally.
///
/// Concurrent readers share the lock; a racing insert keeps whichever closure landed first.
/// Closures are pure functions of the class metadata, so losing a race only costs the work.
#[derive(Debug, Default)]
pub struct ClosureCache {
    entries: RwLock<HashMap<Type, Arc<TypeClosure>>>,
}

impl ClosureCache {
    pub fn get(&self, ty: &Type) -> Option<Arc<TypeClosure>> {
        self.entries.read().get(ty).cloned()
    }

    /// Insert `closure` unless another thread got there first; returns the stored value.
    pub fn insert(&self, ty: Type, closure: Arc<TypeClosure>) -> Arc<TypeClosure> {
        self.entries.write().entry(ty).or_insert(closure).clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        let mut entries = self.entries.write();
        if !entries.is_empty() {
            tracing::trace!(target: "trellis.types", dropped = entries.len(), "clearing type closures");
            entries.clear();
        }
    }
}

/// All supertypes of `ty`, including `ty` itself and `Object`.
///
/// - Superclass and interface type arguments are substituted through the bindings of the
///   parameterized subtype (`ArrayList<String>` yields `List<String>`).
/// - A raw use of a generic class is walked in its canonical form, so supertype arguments stay
///   the class's own type variables, which only resolve to their bounds.
/// - Interfaces reached through several paths are reported once.
/// - Type variables contribute themselves and the closures of their bounds.
///
/// Wildcards have no closure and produce [`TypeError::NotAType`].
pub fn type_closure(env: &dyn TypeEnv, ty: &Type) -> Result<Arc<TypeClosure>> {
    let cache = env.closure_cache();
    if let Some(hit) = cache.and_then(|cache| cache.get(ty)) {
        return Ok(hit);
    }

    let closure = Arc::new(Discovery::new(env).run(ty)?);
    Ok(match cache {
        Some(cache) => cache.insert(ty.clone(), closure),
        None => closure,
    })
}

struct Discovery<'env> {
    env: &'env dyn TypeEnv,
    types: IndexSet<Type>,
    seen_classes: HashSet<ClassId>,
    seen_vars: HashSet<TypeVarId>,
    queue: VecDeque<Type>,
}

impl<'env> Discovery<'env> {
    fn new(env: &'env dyn TypeEnv) -> Self {
        Self {
            env,
            types: IndexSet::new(),
            seen_classes: HashSet::new(),
            seen_vars: HashSet::new(),
            queue: VecDeque::new(),
        }
    }

    fn run(mut self, ty: &Type) -> Result<TypeClosure> {
        let wk = *self.env.well_known();
        self.queue.push_back(ty.clone());

        while let Some(current) = self.queue.pop_front() {
            match &current {
                Type::Wildcard(_) => {
                    return Err(TypeError::NotAType(format_type(self.env, &current)));
                }
                Type::Raw(RawType::Primitive(_)) | Type::GenericArray(_) => {
                    self.types.insert(current);
                }
                Type::Raw(RawType::Array(_)) => {
                    self.queue.push_back(Type::class(wk.cloneable));
                    self.queue.push_back(Type::class(wk.serializable));
                    self.types.insert(current);
                }
                Type::Variable(id) => {
                    if self.seen_vars.insert(*id) {
                        self.queue.extend(type_var_bounds(self.env, *id)?);
                        self.types.insert(current);
                    }
                }
                Type::Raw(RawType::Class(id)) => {
                    let id = *id;
                    self.expand_class(id, None, current)?;
                }
                Type::Parameterized(p) => {
                    let (id, args) = (p.raw, p.args.clone());
                    self.expand_class(id, Some(args), current)?;
                }
            }
        }

        self.types.insert(wk.object_type());
        Ok(TypeClosure { types: self.types })
    }

    /// Record `current` and queue its direct supertypes.
    fn expand_class(&mut self, id: ClassId, args: Option<Vec<Type>>, current: Type) -> Result<()> {
        // A class occurs at most once in a well-formed hierarchy; the visited set also cuts
        // cyclic declarations.
        if !self.seen_classes.insert(id) {
            return Ok(());
        }
        let def = class_def(self.env, id)?;

        let subst: Substitution = match args {
            Some(args) => {
                if args.len() != def.type_params.len() {
                    return Err(TypeError::WrongArgumentCount {
                        ty: format_type(self.env, &current),
                        expected: def.type_params.len(),
                        found: args.len(),
                    });
                }
                def.type_params.iter().copied().zip(args).collect()
            }
            None => Substitution::new(),
        };

        if let Some(super_class) = &def.super_class {
            self.queue.push_back(substitute(super_class, &subst));
        }
        for interface in &def.interfaces {
            self.queue.push_back(substitute(interface, &subst));
        }
        if def.is_interface() {
            self.queue.push_back(self.env.well_known().object_type());
        }

        self.types.insert(current);
        Ok(())
    }
}
