use pretty_assertions::assert_eq;
use trellis_resolve::{DefinitionError, Stereotype};
use trellis_types::Type;

use super::fixtures::Farm;

const MOCK: &str = "com.example.Mock";
const HIGH: &str = "com.example.High";
const LOW: &str = "com.example.Low";
const SERVICE: &str = "com.example.Service";

#[test]
fn stereotype_makes_bean_a_prioritized_alternative() {
    let mut farm = Farm::new();
    farm.container
        .register_stereotype(Stereotype::new(MOCK).alternative().priority(50));
    farm.deploy(farm.bean("dog", farm.dog));
    farm.deploy(farm.bean("mock-dog", farm.dog).stereotype(MOCK));

    let registered = farm.container.registry().get("mock-dog").unwrap();
    assert!(registered.is_alternative());
    assert_eq!(registered.priority(), Some(50));
    assert_eq!(farm.resolve_names(&Type::class(farm.dog)), vec!["mock-dog"]);
}

#[test]
fn nested_stereotypes_contribute() {
    let mut farm = Farm::new();
    farm.container
        .register_stereotype(Stereotype::new(HIGH).priority(100));
    farm.container
        .register_stereotype(Stereotype::new(MOCK).alternative().stereotype(HIGH));
    farm.deploy(farm.bean("mock-dog", farm.dog).stereotype(MOCK));

    let registered = farm.container.registry().get("mock-dog").unwrap();
    assert!(registered.is_alternative());
    assert_eq!(registered.priority(), Some(100));
}

#[test]
fn conflicting_stereotype_priorities_are_an_error() {
    let mut farm = Farm::new();
    farm.container
        .register_stereotype(Stereotype::new(HIGH).priority(100));
    farm.container.register_stereotype(Stereotype::new(LOW).priority(1));
    farm.container
        .register_stereotype(Stereotype::new(MOCK).alternative().stereotype(LOW));

    let err = farm
        .container
        .register_bean(
            farm.bean("dog", farm.dog)
                .stereotype(HIGH)
                .stereotype(MOCK)
                .build(),
        )
        .unwrap_err();
    assert_eq!(
        err,
        DefinitionError::MultiplePriorityValues {
            bean: "dog".to_string(),
            priorities: vec![1, 100],
        }
    );
}

#[test]
fn declared_priority_overrides_stereotypes() {
    let mut farm = Farm::new();
    farm.container
        .register_stereotype(Stereotype::new(HIGH).priority(100));
    farm.container.register_stereotype(Stereotype::new(LOW).priority(1));
    farm.deploy(
        farm.bean("dog", farm.dog)
            .alternative()
            .priority(7)
            .stereotype(HIGH)
            .stereotype(LOW),
    );

    let registered = farm.container.registry().get("dog").unwrap();
    assert_eq!(registered.priority(), Some(7));
}

#[test]
fn same_priority_from_two_stereotypes_is_not_a_conflict() {
    let mut farm = Farm::new();
    farm.container
        .register_stereotype(Stereotype::new(HIGH).priority(100));
    farm.container
        .register_stereotype(Stereotype::new(MOCK).alternative().priority(100));
    farm.deploy(farm.bean("dog", farm.dog).stereotype(HIGH).stereotype(MOCK));

    let registered = farm.container.registry().get("dog").unwrap();
    assert_eq!(registered.priority(), Some(100));
}

#[test]
fn cyclic_stereotypes_terminate() {
    let mut farm = Farm::new();
    farm.container
        .register_stereotype(Stereotype::new(HIGH).priority(100).stereotype(LOW));
    farm.container
        .register_stereotype(Stereotype::new(LOW).stereotype(HIGH));
    farm.deploy(farm.bean("dog", farm.dog).stereotype(LOW));

    let registered = farm.container.registry().get("dog").unwrap();
    assert_eq!(registered.priority(), Some(100));
    assert!(!registered.is_alternative());
}

#[test]
fn required_bean_type_is_enforced() {
    let mut farm = Farm::new();
    let animal = Type::class(farm.animal);
    farm.container
        .register_stereotype(Stereotype::new(SERVICE).requires_type(animal));

    farm.deploy(farm.bean("dog", farm.dog).stereotype(SERVICE));

    let err = farm
        .container
        .register_bean(farm.bean("fish", farm.fish).stereotype(SERVICE).build())
        .unwrap_err();
    assert_eq!(
        err,
        DefinitionError::StereotypeRequiredType {
            bean: "fish".to_string(),
            stereotype: SERVICE.to_string(),
            required: "com.example.Animal".to_string(),
        }
    );
}

#[test]
fn unknown_stereotype_is_an_error() {
    let mut farm = Farm::new();
    let err = farm
        .container
        .register_bean(farm.bean("dog", farm.dog).stereotype(MOCK).build())
        .unwrap_err();

    assert_eq!(
        err,
        DefinitionError::UnknownStereotype {
            stereotype: MOCK.to_string(),
        }
    );
    assert!(farm.container.registry().is_empty());
}
