use pretty_assertions::assert_eq;
use trellis_types::{
    is_assignable_covariant, is_assignable_from_at_least_one, AssignabilityRules, ClassId,
    PrimitiveType, Type, TypeEnv, TypeError, TypeParamDef,
};

use super::fixtures::Zoo;

fn assignable(zoo: &Zoo, target: &Type, candidate: &Type) -> bool {
    is_assignable_covariant(&zoo.env, target, candidate).unwrap()
}

#[test]
fn every_shape_is_assignable_to_itself() {
    let zoo = Zoo::new();
    let wk = *zoo.env.well_known();
    let dog = Type::class(zoo.dog);
    let samples = vec![
        dog.clone(),
        Type::primitive(PrimitiveType::Int),
        Type::array(dog.clone()),
        Type::array(Type::primitive(PrimitiveType::Int)),
        zoo.list_of(zoo.string()),
        zoo.list_of(wk.wildcard_extends(Type::class(zoo.animal))),
        Type::Variable(zoo.t),
        wk.unbounded_wildcard(),
        wk.wildcard_super(dog),
        Type::array(zoo.list_of(zoo.string())),
        Type::class(zoo.array_list),
        zoo.enum_e(),
        Type::class(zoo.weekday),
    ];

    for ty in &samples {
        assert!(
            assignable(&zoo, ty, ty),
            "{} should be assignable to itself",
            ty.display(&zoo.env)
        );
    }
}

#[test]
fn raw_hierarchy_is_transitive() {
    let zoo = Zoo::new();
    let dog = Type::class(zoo.dog);
    let animal = Type::class(zoo.animal);

    assert!(assignable(&zoo, &animal, &dog));
    assert!(assignable(&zoo, &zoo.object(), &animal));
    assert!(assignable(&zoo, &zoo.object(), &dog));
    assert!(!assignable(&zoo, &dog, &animal));
    assert!(!assignable(&zoo, &animal, &Type::class(zoo.fish)));
}

#[test]
fn primitives_are_boxed_before_comparison() {
    let zoo = Zoo::new();
    let wk = *zoo.env.well_known();
    let int = Type::primitive(PrimitiveType::Int);
    let integer = Type::class(wk.integer);

    assert!(assignable(&zoo, &int, &integer));
    assert!(assignable(&zoo, &integer, &int));
    assert!(assignable(&zoo, &Type::class(wk.number), &int));
    assert!(assignable(&zoo, &zoo.object(), &int));
    assert!(!assignable(&zoo, &Type::primitive(PrimitiveType::Long), &int));
}

#[test]
fn object_accepts_generic_arrays() {
    let zoo = Zoo::new();
    let list_string_array = Type::array(zoo.list_of(zoo.string()));
    let t_array = Type::array(Type::Variable(zoo.t));

    assert!(assignable(&zoo, &zoo.object(), &list_string_array));
    assert!(assignable(&zoo, &zoo.object(), &t_array));
    // Raw array classes compare against the erased component.
    assert!(assignable(&zoo, &Type::array(Type::class(zoo.list)), &list_string_array));
    assert!(assignable(&zoo, &Type::array(Type::class(zoo.animal)), &t_array));
    assert!(!assignable(&zoo, &Type::array(zoo.string()), &list_string_array));
}

#[test]
fn generic_array_targets() {
    let zoo = Zoo::new();
    let t_array = Type::array(Type::Variable(zoo.t));

    assert!(assignable(&zoo, &t_array, &Type::array(Type::class(zoo.dog))));
    assert!(!assignable(&zoo, &t_array, &Type::array(Type::class(zoo.fish))));
    assert!(!assignable(&zoo, &t_array, &Type::class(zoo.dog)));
    assert!(assignable(
        &zoo,
        &Type::array(zoo.list_of(zoo.string())),
        &Type::array(zoo.array_list_of(zoo.string())),
    ));
    assert!(!assignable(
        &zoo,
        &Type::array(zoo.list_of(zoo.string())),
        &zoo.list_of(zoo.string()),
    ));
}

#[test]
fn parameterized_types_match_through_the_hierarchy() {
    let zoo = Zoo::new();
    let wk = *zoo.env.well_known();
    let string = zoo.string();
    let integer = Type::class(wk.integer);

    assert!(assignable(&zoo, &zoo.list_of(string.clone()), &zoo.array_list_of(string.clone())));
    assert!(!assignable(&zoo, &zoo.list_of(zoo.object()), &zoo.array_list_of(string.clone())));
    assert!(assignable(
        &zoo,
        &Type::parameterized(zoo.collection, vec![string.clone()]),
        &Type::class(zoo.string_list),
    ));
    assert!(!assignable(
        &zoo,
        &Type::parameterized(zoo.collection, vec![Type::class(zoo.dog)]),
        &Type::class(zoo.string_list),
    ));
    assert!(assignable(
        &zoo,
        &Type::parameterized(zoo.map, vec![string.clone(), integer.clone()]),
        &Type::parameterized(zoo.hash_map, vec![string.clone(), integer]),
    ));
    assert!(!assignable(
        &zoo,
        &Type::parameterized(zoo.map, vec![string.clone(), Type::class(zoo.dog)]),
        &Type::parameterized(zoo.hash_map, vec![string.clone(), Type::class(wk.long)]),
    ));
}

#[test]
fn raw_use_of_generic_class_is_accepted_for_legacy_code() {
    let zoo = Zoo::new();
    let list_string = zoo.list_of(zoo.string());

    assert!(assignable(&zoo, &list_string, &Type::class(zoo.array_list)));
    assert!(assignable(&zoo, &list_string, &Type::class(zoo.list)));
    assert!(!assignable(&zoo, &list_string, &Type::class(zoo.fish)));
}

#[test]
fn type_arguments_are_invariant() {
    let zoo = Zoo::new();
    let animal = Type::class(zoo.animal);
    let dog = Type::class(zoo.dog);

    assert!(!assignable(&zoo, &zoo.list_of(animal.clone()), &zoo.list_of(dog.clone())));
    assert!(!assignable(&zoo, &zoo.list_of(animal), &zoo.array_list_of(dog.clone())));
    // Variables are never inferred, only replaced by their bounds.
    assert!(!assignable(&zoo, &zoo.list_of(Type::Variable(zoo.t)), &zoo.list_of(dog)));
}

#[test]
fn wildcard_arguments_contain_matching_types() {
    let zoo = Zoo::new();
    let wk = *zoo.env.well_known();
    let animal = Type::class(zoo.animal);
    let dog = Type::class(zoo.dog);
    let cat = Type::class(zoo.cat);

    let extends_animal = zoo.list_of(wk.wildcard_extends(animal.clone()));
    assert!(assignable(&zoo, &extends_animal, &zoo.list_of(dog.clone())));
    assert!(assignable(&zoo, &extends_animal, &zoo.array_list_of(cat.clone())));
    assert!(!assignable(&zoo, &extends_animal, &zoo.list_of(Type::class(zoo.fish))));

    let super_dog = zoo.list_of(wk.wildcard_super(dog.clone()));
    assert!(assignable(&zoo, &super_dog, &zoo.list_of(animal.clone())));
    assert!(assignable(&zoo, &super_dog, &zoo.array_list_of(animal)));
    assert!(assignable(&zoo, &super_dog, &zoo.list_of(dog)));
    assert!(!assignable(&zoo, &super_dog, &zoo.list_of(cat)));

    let unbounded = zoo.list_of(wk.unbounded_wildcard());
    assert!(assignable(&zoo, &unbounded, &zoo.list_of(Type::class(zoo.fish))));
    assert!(assignable(&zoo, &unbounded, &zoo.list_of(Type::Variable(zoo.t))));
}

#[test]
fn wildcard_against_wildcard() {
    let zoo = Zoo::new();
    let wk = *zoo.env.well_known();
    let animal = Type::class(zoo.animal);
    let dog = Type::class(zoo.dog);

    let extends_animal = wk.wildcard_extends(animal.clone());
    let extends_dog = wk.wildcard_extends(dog.clone());
    let super_animal = wk.wildcard_super(animal);
    let super_dog = wk.wildcard_super(dog);

    assert!(assignable(&zoo, &extends_animal, &extends_dog));
    assert!(!assignable(&zoo, &extends_dog, &extends_animal));
    // Lower bounds compare contravariantly.
    assert!(assignable(&zoo, &super_dog, &super_animal));
    assert!(!assignable(&zoo, &super_animal, &super_dog));
    // A lower-bounded target needs a lower-bounded candidate.
    assert!(!assignable(&zoo, &super_dog, &wk.unbounded_wildcard()));
    // Without a lower bound of its own, only an unbounded target accepts one.
    assert!(assignable(&zoo, &wk.unbounded_wildcard(), &super_dog));
    assert!(!assignable(&zoo, &extends_animal, &super_dog));
}

#[test]
fn wildcard_against_type_variable() {
    let zoo = Zoo::new();
    let wk = *zoo.env.well_known();
    let t = Type::Variable(zoo.t);

    assert!(assignable(&zoo, &wk.wildcard_extends(Type::class(zoo.animal)), &t));
    assert!(!assignable(&zoo, &wk.wildcard_extends(Type::class(zoo.dog)), &t));
    // With a lower bound the check is reversed: is `Dog` assignable to `T`? Never, since a
    // variable target only accepts variables.
    assert!(!assignable(&zoo, &wk.wildcard_super(Type::class(zoo.dog)), &t));
    assert!(assignable(&zoo, &wk.wildcard_super(Type::Variable(zoo.s)), &t));
}

#[test]
fn type_variables_follow_their_bounds() {
    let zoo = Zoo::new();
    let t = Type::Variable(zoo.t);
    let s = Type::Variable(zoo.s);
    let u = Type::Variable(zoo.u);

    assert!(assignable(&zoo, &t, &s));
    assert!(!assignable(&zoo, &s, &t));
    assert!(!assignable(&zoo, &t, &u));
    assert!(assignable(&zoo, &Type::class(zoo.animal), &s));
    assert!(!assignable(&zoo, &Type::class(zoo.dog), &s));
    // A variable target never accepts a concrete type.
    assert!(!assignable(&zoo, &t, &Type::class(zoo.dog)));
}

#[test]
fn mutually_bounded_variables_are_a_cycle_from_every_entry() {
    let mut zoo = Zoo::new();
    // <P extends Q, Q extends P>
    let p = zoo.env.add_type_param("P", vec![]);
    let q = zoo.env.add_type_param("Q", vec![Type::Variable(p)]);
    zoo.env
        .define_type_param(
            p,
            TypeParamDef {
                name: "P".to_string(),
                upper_bounds: vec![Type::Variable(q)],
            },
        )
        .unwrap();
    let cycle = TypeError::CyclicTypeVariable("P".to_string());
    let p = Type::Variable(p);

    for target in [
        Type::class(zoo.animal),
        zoo.list_of(zoo.string()),
        Type::Variable(zoo.t),
    ] {
        assert_eq!(
            is_assignable_covariant(&zoo.env, &target, &p),
            Err(cycle.clone()),
            "target {}",
            target.display(&zoo.env)
        );
    }
}

#[test]
fn recursive_bounds_accept_any_argument() {
    let zoo = Zoo::new();
    let wk = *zoo.env.well_known();
    let weekday = Type::class(zoo.weekday);
    let enum_e = zoo.enum_e();

    assert!(assignable(&zoo, &enum_e, &weekday));
    assert!(assignable(&zoo, &enum_e, &Type::parameterized(wk.enum_, vec![weekday.clone()])));
    assert!(assignable(
        &zoo,
        &Type::parameterized(wk.enum_, vec![weekday.clone()]),
        &weekday,
    ));
    assert!(assignable(
        &zoo,
        &Type::parameterized(wk.comparable, vec![weekday.clone()]),
        &weekday,
    ));
    assert!(!assignable(
        &zoo,
        &Type::parameterized(wk.comparable, vec![zoo.string()]),
        &weekday,
    ));
    assert!(!assignable(&zoo, &enum_e, &zoo.string()));
}

#[test]
fn mismatched_shapes_are_not_assignable() {
    let zoo = Zoo::new();
    let wk = *zoo.env.well_known();
    let dog = Type::class(zoo.dog);

    assert!(!assignable(&zoo, &dog, &wk.wildcard_extends(dog.clone())));
    assert!(!assignable(&zoo, &zoo.list_of(dog.clone()), &wk.unbounded_wildcard()));
    assert!(!assignable(&zoo, &Type::array(zoo.list_of(dog.clone())), &zoo.list_of(dog)));
}

#[test]
fn at_least_one_candidate() {
    let zoo = Zoo::new();
    let animal = Type::class(zoo.animal);
    let candidates = [Type::class(zoo.fish), Type::class(zoo.cat)];

    assert!(is_assignable_from_at_least_one(&zoo.env, &animal, &candidates).unwrap());
    assert!(!is_assignable_from_at_least_one(&zoo.env, &animal, &candidates[..1]).unwrap());
    assert!(!is_assignable_from_at_least_one(&zoo.env, &animal, std::iter::empty()).unwrap());
}

#[test]
fn dangling_class_id_is_an_error() {
    let zoo = Zoo::new();
    let dangling = Type::class(ClassId::new(9_999));

    let err = is_assignable_covariant(&zoo.env, &Type::class(zoo.animal), &dangling).unwrap_err();
    assert_eq!(err, TypeError::UnknownClass(ClassId::new(9_999)));
}

#[test]
fn argument_count_mismatch_is_an_error() {
    let zoo = Zoo::new();
    let wk = *zoo.env.well_known();
    let target = zoo.list_of(zoo.string());
    let malformed = Type::parameterized(zoo.list, vec![zoo.string(), Type::class(wk.integer)]);

    let err = is_assignable_covariant(&zoo.env, &target, &malformed).unwrap_err();
    assert_eq!(
        err,
        TypeError::ArgumentCountMismatch {
            first: "java.util.List<java.lang.String>".to_string(),
            second: "java.util.List<java.lang.String, java.lang.Integer>".to_string(),
        }
    );
}

#[test]
fn nesting_beyond_the_limit_is_an_error() {
    let zoo = Zoo::new();
    let wk = *zoo.env.well_known();
    let nested = |leaf: Type| zoo.list_of(zoo.list_of(zoo.list_of(leaf)));
    let target = nested(zoo.string());
    let candidate = nested(Type::class(wk.integer));

    let rules = AssignabilityRules::new(&zoo.env).with_max_depth(2);
    let err = rules.is_assignable_covariant(&target, &candidate).unwrap_err();
    assert_eq!(
        err,
        TypeError::RecursionLimit {
            limit: 2,
            ty: "java.util.List<java.lang.String>".to_string(),
        }
    );

    assert!(!assignable(&zoo, &target, &candidate));
}
