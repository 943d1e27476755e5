use pretty_assertions::assert_eq;
use trellis_config::ResolutionConfig;
use trellis_resolve::{Bean, Resolution, ResolveError};
use trellis_types::{PrimitiveType, Type, TypeEnv, TypeError, DEFAULT_MAX_TYPE_DEPTH};

use super::fixtures::Farm;

fn farm_with_pets() -> Farm {
    let mut farm = Farm::new();
    farm.deploy(farm.bean("dog", farm.dog));
    farm.deploy(farm.bean("cat", farm.cat));
    farm
}

#[test]
fn interface_with_two_implementations_is_ambiguous() {
    let farm = farm_with_pets();
    let result = farm
        .container
        .resolve(&Type::class(farm.animal), &[])
        .unwrap();

    assert!(result.is_ambiguous());
    assert_eq!(result.bean_names(), vec!["dog", "cat"]);
    assert_eq!(result.eligible().len(), 2);
}

#[test]
fn exact_class_resolves() {
    let farm = farm_with_pets();
    let result = farm.container.resolve(&Type::class(farm.dog), &[]).unwrap();

    let bean = result.resolved().expect("dog should resolve");
    assert_eq!(bean.name(), "dog");
    assert_eq!(bean.bean_class(), farm.dog);
}

#[test]
fn type_without_beans_is_unsatisfied() {
    let farm = farm_with_pets();
    let result = farm.container.resolve(&Type::class(farm.fish), &[]).unwrap();

    assert_eq!(result.resolution(), &Resolution::Unsatisfied);
    assert!(result.eligible().is_empty());
}

#[test]
fn object_matches_every_bean() {
    let mut farm = farm_with_pets();
    farm.deploy(farm.bean("fish", farm.fish));
    let object = Type::class(farm.container.types().well_known().object);

    assert_eq!(farm.resolve_names(&object), vec!["dog", "cat", "fish"]);
}

#[test]
fn bean_types_restrict_what_a_bean_is_found_as() {
    let mut farm = Farm::new();
    // @Typed(Dog.class)
    farm.deploy(Bean::builder("dog", farm.dog).bean_type(Type::class(farm.dog)));

    assert_eq!(farm.resolve_names(&Type::class(farm.dog)), vec!["dog"]);
    assert!(farm.resolve_names(&Type::class(farm.animal)).is_empty());
}

#[test]
fn parameterized_types_are_matched_on_their_arguments() {
    let mut farm = Farm::new();
    let object = Type::class(farm.container.types().well_known().object);
    let strings = farm.list_of(farm.string());
    let dogs = farm.list_of(Type::class(farm.dog));
    farm.deploy(
        Bean::builder("strings", farm.list).bean_types([strings.clone(), object.clone()]),
    );
    farm.deploy(Bean::builder("dogs", farm.list).bean_types([dogs.clone(), object]));

    assert_eq!(farm.resolve_names(&strings), vec!["strings"]);
    assert_eq!(farm.resolve_names(&dogs), vec!["dogs"]);
    assert!(farm
        .resolve_names(&farm.list_of(Type::class(farm.animal)))
        .is_empty());

    let wk = *farm.container.types().well_known();
    let animals = farm.list_of(wk.wildcard_extends(Type::class(farm.animal)));
    assert_eq!(farm.resolve_names(&animals), vec!["dogs"]);

    // A raw required type accepts every parameterization.
    assert_eq!(
        farm.resolve_names(&Type::class(farm.list)),
        vec!["strings", "dogs"]
    );
}

#[test]
fn primitive_required_type_finds_wrapper_bean() {
    let mut farm = Farm::new();
    let integer = farm.integer();
    farm.deploy(Bean::builder("answer", farm.container.types().well_known().integer).bean_type(integer));

    assert_eq!(
        farm.resolve_names(&Type::primitive(PrimitiveType::Int)),
        vec!["answer"]
    );
}

#[test]
fn wildcard_required_type_is_rejected() {
    let farm = farm_with_pets();
    let wk = *farm.container.types().well_known();

    let err = farm
        .container
        .resolve(&wk.wildcard_extends(Type::class(farm.animal)), &[])
        .unwrap_err();
    assert_eq!(
        err,
        ResolveError::Type(TypeError::NotAType("? extends com.example.Animal".to_string()))
    );
}

#[test]
fn malformed_required_type_is_rejected() {
    let farm = farm_with_pets();
    let malformed = Type::parameterized(farm.list, vec![farm.string(), farm.integer()]);

    let err = farm.container.resolve(&malformed, &[]).unwrap_err();
    assert_eq!(
        err,
        ResolveError::Type(TypeError::WrongArgumentCount {
            ty: "java.util.List<java.lang.String, java.lang.Integer>".to_string(),
            expected: 1,
            found: 2,
        })
    );
}

#[test]
fn nesting_beyond_the_configured_depth_aborts_the_lookup() {
    let config = ResolutionConfig {
        max_type_depth: 2,
        ..ResolutionConfig::default()
    };
    let mut farm = Farm::with_config(&config);
    let nested = |farm: &Farm, leaf: Type| farm.list_of(farm.list_of(farm.list_of(leaf)));
    let integers = nested(&farm, farm.integer());
    farm.deploy(Bean::builder("integers", farm.list).bean_type(integers));

    let err = farm
        .container
        .resolve(&nested(&farm, farm.string()), &[])
        .unwrap_err();
    assert_eq!(
        err,
        ResolveError::Type(TypeError::RecursionLimit {
            limit: 2,
            ty: "java.util.List<java.lang.String>".to_string(),
        })
    );
}

#[test]
fn shutdown_undeploys_every_bean() {
    let mut farm = farm_with_pets();
    assert_eq!(farm.container.registry().len(), 2);

    farm.container.shutdown();

    assert!(farm.container.registry().is_empty());
    assert!(farm.resolve_names(&Type::class(farm.dog)).is_empty());
    // Class metadata survives.
    farm.deploy(farm.bean("dog", farm.dog));
    assert_eq!(farm.resolve_names(&Type::class(farm.dog)), vec!["dog"]);
}

#[test]
fn configured_depth_defaults_to_the_engine_limit() {
    assert_eq!(
        ResolutionConfig::default().max_type_depth,
        DEFAULT_MAX_TYPE_DEPTH
    );
    assert_eq!(trellis_config::DEFAULT_MAX_TYPE_DEPTH, DEFAULT_MAX_TYPE_DEPTH);
}
