use std::collections::HashMap;

use crate::closure::ClosureCache;
use crate::{
    ClassDef, ClassId, ClassKind, PrimitiveType, Result, Type, TypeEnv, TypeError, TypeParamDef,
    TypeVarId,
};

/// Ids of the `java.lang` types the assignability rules need to know about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WellKnownTypes {
    pub object: ClassId,
    pub cloneable: ClassId,
    pub serializable: ClassId,
    pub number: ClassId,
    pub string: ClassId,
    pub comparable: ClassId,
    pub enum_: ClassId,
    pub boolean: ClassId,
    pub byte: ClassId,
    pub short: ClassId,
    pub character: ClassId,
    pub integer: ClassId,
    pub long: ClassId,
    pub float: ClassId,
    pub double: ClassId,
    pub void: ClassId,
}

impl WellKnownTypes {
    /// Wrapper class of a primitive.
    pub fn boxed(&self, primitive: PrimitiveType) -> ClassId {
        match primitive {
            PrimitiveType::Boolean => self.boolean,
            PrimitiveType::Byte => self.byte,
            PrimitiveType::Short => self.short,
            PrimitiveType::Char => self.character,
            PrimitiveType::Int => self.integer,
            PrimitiveType::Long => self.long,
            PrimitiveType::Float => self.float,
            PrimitiveType::Double => self.double,
            PrimitiveType::Void => self.void,
        }
    }

    pub fn object_type(&self) -> Type {
        Type::class(self.object)
    }

    pub fn is_object(&self, ty: &Type) -> bool {
        matches!(ty, Type::Raw(crate::RawType::Class(id)) if *id == self.object)
    }

    /// `?`
    pub fn unbounded_wildcard(&self) -> Type {
        Type::wildcard(self.object_type(), None)
    }

    /// `? extends upper`
    pub fn wildcard_extends(&self, upper: Type) -> Type {
        Type::wildcard(upper, None)
    }

    /// `? super lower`
    pub fn wildcard_super(&self, lower: Type) -> Type {
        Type::wildcard(self.object_type(), Some(lower))
    }
}

/// In-memory class metadata.
///
/// Class ids can be reserved before their declaration is known ([`TypeStore::intern_class_id`]),
/// which is how self-referential declarations such as `Enum<E extends Enum<E>>` are built.
/// Every mutation drops the memoized type closures.
#[derive(Debug)]
pub struct TypeStore {
    classes: Vec<Option<ClassDef>>,
    class_names: HashMap<String, ClassId>,
    type_params: Vec<TypeParamDef>,
    well_known: WellKnownTypes,
    closures: ClosureCache,
}

impl Clone for TypeStore {
    fn clone(&self) -> Self {
        Self {
            classes: self.classes.clone(),
            class_names: self.class_names.clone(),
            type_params: self.type_params.clone(),
            well_known: self.well_known,
            closures: ClosureCache::default(),
        }
    }
}

impl Default for TypeStore {
    fn default() -> Self {
        Self::with_core_types()
    }
}

impl TypeStore {
    /// A store pre-populated with `java.lang.Object`, the primitive wrappers and the handful of
    /// core types every bean archive can see.
    pub fn with_core_types() -> Self {
        let placeholder = ClassId::new(0);
        let mut store = TypeStore {
            classes: Vec::new(),
            class_names: HashMap::new(),
            type_params: Vec::new(),
            well_known: WellKnownTypes {
                object: placeholder,
                cloneable: placeholder,
                serializable: placeholder,
                number: placeholder,
                string: placeholder,
                comparable: placeholder,
                enum_: placeholder,
                boolean: placeholder,
                byte: placeholder,
                short: placeholder,
                character: placeholder,
                integer: placeholder,
                long: placeholder,
                float: placeholder,
                double: placeholder,
                void: placeholder,
            },
            closures: ClosureCache::default(),
        };

        let object = store.add_class(ClassDef::new("java.lang.Object", ClassKind::Class));
        let object_ty = Type::class(object);
        let cloneable = store.add_class(ClassDef::new("java.lang.Cloneable", ClassKind::Interface));
        let serializable =
            store.add_class(ClassDef::new("java.io.Serializable", ClassKind::Interface));
        let serializable_ty = Type::class(serializable);

        // interface Comparable<T>
        let comparable_t = store.add_type_param("T", vec![object_ty.clone()]);
        let comparable = store.add_class(
            ClassDef::new("java.lang.Comparable", ClassKind::Interface)
                .with_type_params(vec![comparable_t]),
        );

        let number = store.add_class(
            ClassDef::new("java.lang.Number", ClassKind::Class)
                .extends(object_ty.clone())
                .implements(serializable_ty.clone()),
        );

        let comparable_wrapper = |store: &mut TypeStore, name: &str, super_class: &Type| {
            let id = store.intern_class_id(name);
            store.define_class(
                id,
                ClassDef::new(name, ClassKind::Class)
                    .extends(super_class.clone())
                    .implements(serializable_ty.clone())
                    .implements(Type::parameterized(comparable, vec![Type::class(id)])),
            );
            id
        };

        let number_ty = Type::class(number);
        let string = comparable_wrapper(&mut store, "java.lang.String", &object_ty);
        let boolean = comparable_wrapper(&mut store, "java.lang.Boolean", &object_ty);
        let character = comparable_wrapper(&mut store, "java.lang.Character", &object_ty);
        let byte = comparable_wrapper(&mut store, "java.lang.Byte", &number_ty);
        let short = comparable_wrapper(&mut store, "java.lang.Short", &number_ty);
        let integer = comparable_wrapper(&mut store, "java.lang.Integer", &number_ty);
        let long = comparable_wrapper(&mut store, "java.lang.Long", &number_ty);
        let float = comparable_wrapper(&mut store, "java.lang.Float", &number_ty);
        let double = comparable_wrapper(&mut store, "java.lang.Double", &number_ty);
        let void = store.add_class(
            ClassDef::new("java.lang.Void", ClassKind::Class).extends(object_ty.clone()),
        );

        // abstract class Enum<E extends Enum<E>> implements Comparable<E>, Serializable
        let enum_ = store.intern_class_id("java.lang.Enum");
        let enum_e = store.add_type_param("E", Vec::new());
        if let Some(def) = store.type_params.get_mut(enum_e.to_raw() as usize) {
            def.upper_bounds = vec![Type::parameterized(enum_, vec![Type::Variable(enum_e)])];
        }
        store.define_class(
            enum_,
            ClassDef::new("java.lang.Enum", ClassKind::Class)
                .with_type_params(vec![enum_e])
                .extends(object_ty)
                .implements(Type::parameterized(comparable, vec![Type::Variable(enum_e)]))
                .implements(serializable_ty),
        );

        store.well_known = WellKnownTypes {
            object,
            cloneable,
            serializable,
            number,
            string,
            comparable,
            enum_,
            boolean,
            byte,
            short,
            character,
            integer,
            long,
            float,
            double,
            void,
        };
        store
    }

    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.class_names.get(name).copied()
    }

    /// Reserve an id for `name` without defining it yet. Returns the existing id if the name is
    /// already known.
    pub fn intern_class_id(&mut self, name: &str) -> ClassId {
        if let Some(id) = self.class_names.get(name) {
            return *id;
        }
        let id = ClassId::new(
            self.classes
                .len()
                .try_into()
                .unwrap_or_else(|_| panic!("class table overflow while interning {name}")),
        );
        self.classes.push(None);
        self.class_names.insert(name.to_string(), id);
        id
    }

    /// Define (or redefine) the class behind a reserved id.
    ///
    /// The id is known only under `def.name` afterwards; a different name it was reserved or
    /// previously defined under is forgotten.
    pub fn define_class(&mut self, id: ClassId, def: ClassDef) {
        let idx = id.to_raw() as usize;
        if idx >= self.classes.len() {
            self.classes.resize(idx + 1, None);
        }
        self.class_names
            .retain(|name, existing| *existing != id || *name == def.name);
        self.class_names.insert(def.name.clone(), id);
        self.classes[idx] = Some(def);
        self.closures.clear();
    }

    /// Add a class, replacing any previous declaration with the same name.
    pub fn add_class(&mut self, def: ClassDef) -> ClassId {
        let id = self.intern_class_id(&def.name);
        self.define_class(id, def);
        id
    }

    pub fn add_type_param(&mut self, name: impl Into<String>, upper_bounds: Vec<Type>) -> TypeVarId {
        let id = TypeVarId::new(
            self.type_params
                .len()
                .try_into()
                .unwrap_or_else(|_| panic!("type parameter table overflow")),
        );
        self.type_params.push(TypeParamDef {
            name: name.into(),
            upper_bounds,
        });
        self.closures.clear();
        id
    }

    /// Replace the declaration of an existing type parameter (used for recursive bounds).
    pub fn define_type_param(&mut self, id: TypeVarId, def: TypeParamDef) -> Result<()> {
        let slot = self
            .type_params
            .get_mut(id.to_raw() as usize)
            .ok_or(TypeError::UnknownTypeVariable(id))?;
        *slot = def;
        self.closures.clear();
        Ok(())
    }

    /// Number of declared classes, including reserved but undefined ids.
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Drop memoized closures.
    pub fn clear_caches(&self) {
        self.closures.clear();
    }
}

impl TypeEnv for TypeStore {
    fn class(&self, id: ClassId) -> Option<&ClassDef> {
        self.classes.get(id.to_raw() as usize)?.as_ref()
    }

    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef> {
        self.type_params.get(id.to_raw() as usize)
    }

    fn lookup_class(&self, name: &str) -> Option<ClassId> {
        self.class_id(name)
    }

    fn well_known(&self) -> &WellKnownTypes {
        &self.well_known
    }

    fn closure_cache(&self) -> Option<&ClosureCache> {
        Some(&self.closures)
    }
}
