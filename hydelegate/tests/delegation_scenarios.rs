//! End-to-end delegation scenarios, written the way an embedding object model would use the
//! delegates: one struct per declaring type, one delegate per property, accessors that pass the
//! property identity.

use std::sync::Arc;

use hydelegate::{
    Alias, DelegateResult, Field, KeyedStore, KeyedView, PropertyIdentity, ReadDelegate,
    RejectReason, SharedCell, WriteDelegate, observable, property_identity, vetoable,
};
use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

struct User {
    name: KeyedView<String>,
    age: KeyedView<i32>,
}

impl User {
    const NAME: PropertyIdentity = property_identity!(User, name);
    const AGE: PropertyIdentity = property_identity!(User, age);

    fn new(map: &KeyedStore) -> Self {
        Self {
            name: map.view(),
            age: map.view(),
        }
    }

    fn name(&self) -> DelegateResult<String> {
        self.name.read(&Self::NAME)
    }

    fn age(&self) -> DelegateResult<i32> {
        self.age.read(&Self::AGE)
    }
}

#[test]
fn map_backed_user() {
    let map = KeyedStore::new()
        .with("name", "John Doe".to_string())
        .with("age", 25_i32);
    let user = User::new(&map);

    assert_eq!(user.name(), Ok("John Doe".to_string()));
    assert_eq!(user.age(), Ok(25));

    // Reordering the declarations in the map changes nothing
    let reordered = KeyedStore::new()
        .with("age", 25_i32)
        .with("name", "John Doe".to_string());
    let user = User::new(&reordered);
    assert_eq!(user.name(), Ok("John Doe".to_string()));
    assert_eq!(user.age(), Ok(25));
}

struct ClassWithDelegate {
    another_class_int: Field<i32>,
}

struct MyClass<'a> {
    member_int: Arc<Field<i32>>,
    delegated_to_member: Alias<Arc<Field<i32>>>,
    delegated_to_top_level: Alias<SharedCell<i32>>,
    delegated_to_another_class: Alias<&'a Field<i32>>,
}

impl<'a> MyClass<'a> {
    const TO_MEMBER: PropertyIdentity = property_identity!(MyClass, delegatedToMember);
    const TO_TOP_LEVEL: PropertyIdentity = property_identity!(MyClass, delegatedToTopLevel);
    const TO_ANOTHER: PropertyIdentity = property_identity!(MyClass, delegatedToAnotherClass);

    fn new(member_int: i32, top_level: &SharedCell<i32>, another: &'a ClassWithDelegate) -> Self {
        let member_int = Field::shared(member_int);
        Self {
            delegated_to_member: Alias::new(Arc::clone(&member_int)),
            member_int,
            delegated_to_top_level: Alias::new(Arc::clone(top_level)),
            delegated_to_another_class: Alias::new(&another.another_class_int),
        }
    }
}

#[test]
fn alias_to_member_of_same_object() {
    let top_level = Field::shared(0);
    let another = ClassWithDelegate {
        another_class_int: Field::new(7),
    };
    let object = MyClass::new(1, &top_level, &another);

    object
        .delegated_to_member
        .write(&MyClass::TO_MEMBER, 42)
        .unwrap();
    assert_eq!(object.member_int.get(), 42);

    object.member_int.set(43);
    assert_eq!(
        object.delegated_to_member.read(&MyClass::TO_MEMBER),
        Ok(43)
    );
}

#[test]
fn alias_to_other_object_and_top_level_cell() {
    let top_level = Field::shared(0);
    let another = ClassWithDelegate {
        another_class_int: Field::new(7),
    };
    let first = MyClass::new(1, &top_level, &another);
    let second = MyClass::new(2, &top_level, &another);

    assert_eq!(
        first
            .delegated_to_another_class
            .read(&MyClass::TO_ANOTHER),
        Ok(7)
    );
    another.another_class_int.set(8);
    assert_eq!(
        second
            .delegated_to_another_class
            .read(&MyClass::TO_ANOTHER),
        Ok(8)
    );

    // One process-wide slot: a write through any object is seen by all of them
    first
        .delegated_to_top_level
        .write(&MyClass::TO_TOP_LEVEL, 99)
        .unwrap();
    assert_eq!(
        second.delegated_to_top_level.read(&MyClass::TO_TOP_LEVEL),
        Ok(99)
    );
    assert_eq!(top_level.get(), 99);
}

#[test]
fn isolated_top_level_cells_do_not_interfere() {
    let another = ClassWithDelegate {
        another_class_int: Field::new(0),
    };
    let cell_a = Field::shared(0);
    let cell_b = Field::shared(0);
    let a = MyClass::new(0, &cell_a, &another);
    let b = MyClass::new(0, &cell_b, &another);

    a.delegated_to_top_level
        .write(&MyClass::TO_TOP_LEVEL, 5)
        .unwrap();
    assert_eq!(b.delegated_to_top_level.read(&MyClass::TO_TOP_LEVEL), Ok(0));
}

/// A property attached to `MyClass` from outside its declaration, aliasing a top-level cell.
fn extension_delegated(cell: &SharedCell<i32>) -> Alias<SharedCell<i32>> {
    Alias::new(Arc::clone(cell))
}

#[test]
fn extension_property_shares_top_level_cell() {
    const EXTENSION: PropertyIdentity = property_identity!(MyClass, extensionDelegated);

    let top_level = Field::shared(3);
    let another = ClassWithDelegate {
        another_class_int: Field::new(0),
    };
    let object = MyClass::new(0, &top_level, &another);

    extension_delegated(&top_level)
        .write(&EXTENSION, 11)
        .unwrap();
    assert_eq!(
        object.delegated_to_top_level.read(&MyClass::TO_TOP_LEVEL),
        Ok(11)
    );
}

#[test]
fn observable_person_records_transitions() {
    const NAME: PropertyIdentity = property_identity!(Person, name);

    let transitions = Mutex::new(Vec::new());
    let name = observable("<no name>".to_string(), |_, old: &String, new: &String| {
        transitions.lock().push(format!("{old} -> {new}"));
    });

    name.write(&NAME, "first".to_string()).unwrap();
    name.write(&NAME, "second".to_string()).unwrap();

    assert_eq!(
        *transitions.lock(),
        ["<no name> -> first", "first -> second"]
    );
}

#[test]
fn observable_reports_each_write_once() {
    const VALUE: PropertyIdentity = property_identity!(Sensor, value);

    let mut rng = ChaCha8Rng::seed_from_u64(0x0b5e);
    let calls = Mutex::new(Vec::new());
    let property = observable(0_i64, |_, old: &i64, new: &i64| {
        calls.lock().push((*old, *new));
    });

    let mut previous = 0;
    for _ in 0..64 {
        let next = rng.random_range(-1000..1000);
        property.write(&VALUE, next).unwrap();
        assert_eq!(property.read(&VALUE), Ok(next));
        assert_eq!(calls.lock().last(), Some(&(previous, next)));
        previous = next;
    }
    assert_eq!(calls.lock().len(), 64);
}

#[test]
fn always_false_veto_never_changes_value() {
    const LOCKED: PropertyIdentity = property_identity!(Vault, locked);

    let mut rng = ChaCha8Rng::seed_from_u64(0xdead);
    let property = vetoable(17_u32, |_, _: &u32, _: &u32| false);

    for _ in 0..64 {
        let attempt = rng.random::<u32>();
        assert_eq!(
            property.write(&LOCKED, attempt),
            Err(RejectReason::VetoedByPolicy { property: LOCKED })
        );
        assert_eq!(property.get(), 17);
    }
}

#[test]
fn increasing_veto_keeps_the_maximum() {
    const MAX: PropertyIdentity = property_identity!(Script, max);

    let max = vetoable(0, |_, old: &i32, new: &i32| new > old);

    assert_eq!(max.get(), 0);
    max.write(&MAX, 10).unwrap();
    assert_eq!(max.get(), 10);
    assert!(max.write(&MAX, 5).is_err());
    assert_eq!(max.get(), 10);

    // Strictly increasing sequences always pass, anything else bounces off the maximum
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
    let mut current = 10;
    for _ in 0..64 {
        let step = rng.random_range(-5..=5);
        let attempt = current + step;
        let outcome = max.write(&MAX, attempt);
        if step > 0 {
            assert_eq!(outcome, Ok(()));
            current = attempt;
        } else {
            assert_eq!(outcome, Err(RejectReason::VetoedByPolicy { property: MAX }));
        }
        assert_eq!(max.get(), current);
    }
}
