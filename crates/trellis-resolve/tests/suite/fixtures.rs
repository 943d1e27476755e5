use trellis_config::ResolutionConfig;
use trellis_resolve::{Bean, BeanBuilder, Container, QualifierDef};
use trellis_types::{ClassDef, ClassId, ClassKind, Type, TypeEnv};

pub const SYNCHRONOUS: &str = "com.example.Synchronous";
pub const ASYNCHRONOUS: &str = "com.example.Asynchronous";
pub const COLOR: &str = "com.example.Color";

/// A container with a small class model and the qualifiers the suites use:
///
/// ```java
/// interface Animal {}
/// class Dog implements Animal {}
/// class Cat implements Animal {}
/// class Fish {}
/// interface List<E> {}
///
/// @Qualifier @interface Synchronous {}
/// @Qualifier @interface Asynchronous {}
/// @Qualifier @interface Color { String value() default "red"; @Nonbinding String note() default ""; }
/// ```
pub struct Farm {
    pub container: Container,
    pub animal: ClassId,
    pub dog: ClassId,
    pub cat: ClassId,
    pub fish: ClassId,
    pub list: ClassId,
}

impl Farm {
    pub fn new() -> Self {
        Self::with_config(&ResolutionConfig::default())
    }

    pub fn with_config(config: &ResolutionConfig) -> Self {
        let mut container = Container::with_config(config);

        let env = container.types_mut();
        let object = Type::class(env.well_known().object);
        let animal = env.add_class(ClassDef::new("com.example.Animal", ClassKind::Interface));
        let dog = env.add_class(
            ClassDef::new("com.example.Dog", ClassKind::Class)
                .extends(object.clone())
                .implements(Type::class(animal)),
        );
        let cat = env.add_class(
            ClassDef::new("com.example.Cat", ClassKind::Class)
                .extends(object.clone())
                .implements(Type::class(animal)),
        );
        let fish = env.add_class(ClassDef::new("com.example.Fish", ClassKind::Class).extends(object));
        let list_e = env.add_type_param("E", vec![]);
        let list = env.add_class(
            ClassDef::new("java.util.List", ClassKind::Interface).with_type_params(vec![list_e]),
        );

        container.register_qualifier(QualifierDef::new(SYNCHRONOUS));
        container.register_qualifier(QualifierDef::new(ASYNCHRONOUS));
        container.register_qualifier(
            QualifierDef::new(COLOR)
                .member("value", Some("red".into()))
                .non_binding("note", Some("".into())),
        );

        Self {
            container,
            animal,
            dog,
            cat,
            fish,
            list,
        }
    }

    pub fn string(&self) -> Type {
        Type::class(self.container.types().well_known().string)
    }

    pub fn integer(&self) -> Type {
        Type::class(self.container.types().well_known().integer)
    }

    pub fn list_of(&self, arg: Type) -> Type {
        Type::parameterized(self.list, vec![arg])
    }

    /// A bean of class `class` exposing every type in its hierarchy.
    pub fn bean(&self, name: &str, class: ClassId) -> BeanBuilder {
        Bean::builder(name, class)
            .types_from_hierarchy(self.container.types())
            .unwrap()
    }

    pub fn deploy(&mut self, bean: BeanBuilder) {
        self.container.register_bean(bean.build()).unwrap();
    }

    /// Names of the beans a lookup of `required` ends with.
    pub fn resolve_names(&self, required: &Type) -> Vec<String> {
        self.container
            .resolve(required, &[])
            .unwrap()
            .bean_names()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }
}
