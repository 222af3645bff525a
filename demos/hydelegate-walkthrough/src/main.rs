use std::{io::Write, sync::Arc};

use hydelegate::{
    Alias, DelegateResult, DelegatedProperty, Field, KeyedStore, KeyedView, LazyCache,
    Observable, PropertyIdentity, ReadDelegate, Vetoable, WriteDelegate, observable,
    property_identity, vetoable,
};
use log::{Level, LevelFilter, Log, Metadata, Record, info};

/// Minimal `log` sink: level, module, thread name and message on stderr.
struct StderrSink;

impl Log for StderrSink {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= Level::Trace
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let thread = std::thread::current();
        let _ = writeln!(
            std::io::stderr(),
            "[{:<5} {} @{}] {}",
            record.level(),
            record.module_path().unwrap_or("<unknown>"),
            thread.name().unwrap_or("<unnamed>"),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: StderrSink = StderrSink;

// Map-backed properties --------------------------------------------------------------------------

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

// Aliased properties -----------------------------------------------------------------------------

static TOP_LEVEL_INT: Field<i32> = Field::new(0);

struct ClassWithDelegate {
    another_class_int: Field<i32>,
}

struct MyClass<'a> {
    member_int: Arc<Field<i32>>,
    delegated_to_member: Alias<Arc<Field<i32>>>,
    delegated_to_top_level: Alias<&'static Field<i32>>,
    delegated_to_another_class: DelegatedProperty<'a, i32>,
}

impl<'a> MyClass<'a> {
    const TO_MEMBER: PropertyIdentity = property_identity!(MyClass, delegatedToMember);
    const TO_TOP_LEVEL: PropertyIdentity = property_identity!(MyClass, delegatedToTopLevel);
    const TO_ANOTHER: PropertyIdentity = property_identity!(MyClass, delegatedToAnotherClass);

    fn new(member_int: i32, another: &'a ClassWithDelegate) -> Self {
        let member_int = Field::shared(member_int);
        Self {
            delegated_to_member: Alias::new(Arc::clone(&member_int)),
            member_int,
            delegated_to_top_level: Alias::new(&TOP_LEVEL_INT),
            delegated_to_another_class: DelegatedProperty::read_only(
                Self::TO_ANOTHER,
                Alias::new(&another.another_class_int),
            ),
        }
    }

    fn delegated_to_member(&self) -> DelegateResult<i32> {
        self.delegated_to_member.read(&Self::TO_MEMBER)
    }

    fn set_delegated_to_member(&self, value: i32) -> DelegateResult<()> {
        self.delegated_to_member.write(&Self::TO_MEMBER, value)
    }

    fn delegated_to_top_level(&self) -> DelegateResult<i32> {
        self.delegated_to_top_level.read(&Self::TO_TOP_LEVEL)
    }

    fn set_delegated_to_top_level(&self, value: i32) -> DelegateResult<()> {
        self.delegated_to_top_level.write(&Self::TO_TOP_LEVEL, value)
    }
}

/// Extension property on `MyClass`, declared outside it, backed by the same top-level cell.
trait ExtensionDelegated {
    const EXTENSION: PropertyIdentity = property_identity!(MyClass, extensionDelegated);

    fn extension_delegated(&self) -> DelegateResult<i32> {
        Alias::new(&TOP_LEVEL_INT).read(&Self::EXTENSION)
    }

    fn set_extension_delegated(&self, value: i32) -> DelegateResult<()> {
        Alias::new(&TOP_LEVEL_INT).write(&Self::EXTENSION, value)
    }
}

impl ExtensionDelegated for MyClass<'_> {}

// Lazy, observable and vetoable properties -------------------------------------------------------

fn compute_value() -> String {
    println!("init");
    "lazyval".to_string()
}

static VALUE: LazyCache<String> = LazyCache::new(compute_value);

type NameHandler = fn(&PropertyIdentity, &String, &String);

struct Person {
    name: Observable<String, NameHandler>,
}

impl Person {
    const NAME: PropertyIdentity = property_identity!(Person, name);

    fn new() -> Self {
        fn report(_: &PropertyIdentity, old: &String, new: &String) {
            println!("{old} -> {new}");
        }
        Self {
            name: observable("<no name>".to_string(), report as NameHandler),
        }
    }

    fn set_name(&self, value: &str) -> DelegateResult<()> {
        self.name.write(&Self::NAME, value.to_string())
    }
}

fn main() {
    log::set_logger(&LOGGER)
        .map(|()| log::set_max_level(LevelFilter::Debug))
        .expect("logger installed once");

    info!("map-backed properties");
    let map = KeyedStore::new()
        .with("name", "John Doe".to_string())
        .with("age", 25_i32);
    let user = User::new(&map);
    println!("user.name = {:?}", user.name());
    println!("user.age = {:?}", user.age());

    info!("aliased properties");
    let another = ClassWithDelegate {
        another_class_int: Field::new(5),
    };
    let object = MyClass::new(1, &another);
    object
        .set_delegated_to_member(10)
        .expect("member alias is writable");
    println!(
        "memberInt = {}, delegatedToMember = {:?}",
        object.member_int.get(),
        object.delegated_to_member()
    );
    object
        .set_delegated_to_top_level(20)
        .expect("top-level alias is writable");
    println!(
        "topLevelInt = {}, extensionDelegated = {:?}",
        TOP_LEVEL_INT.get(),
        object.extension_delegated()
    );
    object
        .set_extension_delegated(30)
        .expect("extension alias is writable");
    println!("delegatedToTopLevel = {:?}", object.delegated_to_top_level());
    println!(
        "delegatedToAnotherClass = {:?}",
        object.delegated_to_another_class.get()
    );
    if let Err(e) = object.delegated_to_another_class.set(6) {
        println!("rejected: {e}");
    }

    info!("lazy property");
    println!("{}", VALUE.get()); // init, lazyval
    println!("{}", VALUE.get()); // lazyval
    println!("{}", VALUE.get()); // lazyval

    info!("observable property");
    let person = Person::new();
    person.set_name("first").expect("observable accepts writes");
    person.set_name("second").expect("observable accepts writes");

    info!("vetoable property");
    const MAX: PropertyIdentity = property_identity!(Script, max);
    let max: Vetoable<i32, _> = vetoable(0, |_, old: &i32, new: &i32| new > old);
    println!("max = {}", max.get());
    let _ = max.write(&MAX, 10);
    println!("max = {}", max.get());
    if let Err(e) = max.write(&MAX, 5) {
        println!("rejected: {e}");
    }
    println!("max = {}", max.get());
}
