use strand_ioc::{
  Arguments, Container, ContainerConfig, ContainerError, DependencyDescriptor, Injectable, Result,
  TypeDescriptor,
};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc, Weak,
};
use std::thread;

// --- Advanced Test Fixtures ---

struct Transport {
  host: String,
}

struct Logger;

struct Client {
  transport: Arc<Transport>,
}

struct Mailer {
  transport: Arc<Transport>,
  logger: Arc<Logger>,
}

fn define_transport(container: &Container) {
  container.define(TypeDescriptor::new("Transport").constructor(|_| {
    Ok(Transport {
      host: "smtp.local".to_string(),
    })
  }));
}

fn define_logger(container: &Container) {
  container.define(TypeDescriptor::new("Logger").constructor(|_| Ok(Logger)));
}

// --- Builder Tests ---

#[test]
fn test_typed_dependency_is_resolved_through_registered_alias() {
  // Arrange: "b" is registered under an alias that differs from its type name.
  let container = Container::new();
  define_transport(&container);
  container.define(
    TypeDescriptor::new("Client")
      .typed("transport", "Transport")
      .constructor(|args| {
        Ok(Client {
          transport: args.next()?,
        })
      }),
  );
  container.register_type("b", "Transport", true);
  container.register_type("a", "Client", false);

  // Act
  let client = container.resolve_as::<Client>("a").unwrap();
  let from_b = container.resolve_as::<Transport>("b").unwrap();

  // Assert: "b" is shared, so the injected dependency is its cached instance.
  assert!(Arc::ptr_eq(&client.transport, &from_b));
  assert_eq!(client.transport.host, "smtp.local");
}

#[test]
fn test_dependency_chain_is_built_recursively() {
  // Arrange
  let container = Container::new();
  define_transport(&container);
  define_logger(&container);
  container.define(
    TypeDescriptor::new("Mailer")
      .typed("transport", "Transport")
      .typed("logger", "Logger")
      .constructor(|args| {
        Ok(Mailer {
          transport: args.next()?,
          logger: args.next()?,
        })
      }),
  );
  container.register("Transport", None, false);
  container.register("Logger", None, true);
  container.register("Mailer", None, false);

  // Act
  let m1 = container.resolve_as::<Mailer>("Mailer").unwrap();
  let m2 = container.resolve_as::<Mailer>("Mailer").unwrap();

  // Assert
  assert_eq!(m1.transport.host, "smtp.local");
  // Transient transport, shared logger.
  assert!(!Arc::ptr_eq(&m1.transport, &m2.transport));
  assert!(Arc::ptr_eq(&m1.logger, &m2.logger));
}

#[test]
fn test_untyped_parameter_falls_back_to_doc_annotation() {
  // Arrange
  let container = Container::new();
  define_transport(&container);
  define_logger(&container);
  container.define(
    TypeDescriptor::new("Mailer")
      .untyped("transport")
      .typed("logger", "int")
      .doc(
        "/**
          * @param Transport $transport
          * @param Logger    $logger
          */",
      )
      .constructor(|args| {
        Ok(Mailer {
          transport: args.get("transport")?,
          logger: args.get("logger")?,
        })
      }),
  );
  container.register("Transport", None, false);
  container.register("Logger", None, true);
  container.register("mailer", Some(strand_ioc::Concrete::type_name("Mailer")), false);

  // Act
  let mailer = container.resolve_as::<Mailer>("mailer").unwrap();
  let logger = container.resolve_as::<Logger>("Logger").unwrap();

  // Assert: untyped and primitive-typed parameters both came from the annotations.
  assert_eq!(mailer.transport.host, "smtp.local");
  // `logger` was declared as `int`, so the shared Logger must have come from `@param Logger`.
  assert!(Arc::ptr_eq(&mailer.logger, &logger));
}

#[test]
fn test_parameter_without_type_or_annotation_fails_fast() {
  // Arrange
  let container = Container::new();
  define_transport(&container);
  container.define(
    TypeDescriptor::new("Report")
      .typed("transport", "Transport")
      .untyped("title")
      .doc("@param Transport $transport")
      .constructor(|args| args.next::<Transport>()),
  );
  container.register("Transport", None, false);
  container.register("report", Some(strand_ioc::Concrete::type_name("Report")), false);

  // Act
  let err = container.resolve("report").unwrap_err();

  // Assert
  assert_eq!(
    err,
    ContainerError::DependencyResolution {
      parameter: "title".to_string(),
      type_name: "Report".to_string(),
    }
  );
}

#[test]
fn test_annotation_naming_a_primitive_is_not_resolved() {
  let container = Container::new();
  container.define(
    TypeDescriptor::new("Pool")
      .untyped("size")
      .doc("@param int $size")
      .constructor(|_| Ok(())),
  );
  container.register("Pool", None, false);

  assert!(matches!(
    container.resolve("Pool"),
    Err(ContainerError::DependencyResolution { ref parameter, .. }) if parameter == "size"
  ));
}

#[test]
fn test_abstract_type_is_not_instantiable() {
  // Arrange: a descriptor without a constructor.
  let container = Container::new();
  container.define(TypeDescriptor::new("Repository"));
  container.register_type("repo", "Repository", false);

  // Act
  let err = container.resolve("repo").unwrap_err();

  // Assert
  assert_eq!(
    err,
    ContainerError::NonInstantiableType {
      type_name: "Repository".to_string(),
      alias: "repo".to_string(),
    }
  );
}

#[test]
fn test_unknown_type_is_not_instantiable() {
  let container = Container::new();
  container.register("Ghost", None, false);

  assert!(matches!(
    container.resolve("Ghost"),
    Err(ContainerError::NonInstantiableType { .. })
  ));
}

#[test]
fn test_unregistered_dependency_type_is_reported() {
  let container = Container::new();
  container.define(
    TypeDescriptor::new("Client")
      .typed("transport", "Transport")
      .constructor(|args| args.next::<Transport>()),
  );
  container.register("Client", None, false);

  assert_eq!(
    container.resolve("Client").unwrap_err(),
    ContainerError::UnregisteredAlias {
      alias: "Transport".to_string()
    }
  );
}

#[test]
fn test_constructor_asking_for_wrong_type_is_an_invalid_argument() {
  let container = Container::new();
  define_logger(&container);
  container.define(
    TypeDescriptor::new("Client")
      .typed("transport", "Logger")
      .constructor(|args| args.next::<Transport>()),
  );
  container.register("Logger", None, false);
  container.register("Client", None, false);

  assert!(matches!(
    container.resolve("Client"),
    Err(ContainerError::InvalidArgument { ref parameter, .. }) if parameter == "transport"
  ));
}

// --- Binding Tests ---

fn container_with_client() -> Container {
  let container = Container::new();
  container.define(TypeDescriptor::new("Transport").constructor(|_| {
    Ok(Transport {
      host: "smtp.local".to_string(),
    })
  }));
  container.define(
    TypeDescriptor::new("Client")
      .typed("transport", "Transport")
      .constructor(|args| {
        Ok(Client {
          transport: args.next()?,
        })
      }),
  );
  container.register_type("client", "Client", false);
  container
}

#[test]
fn test_last_registered_alias_for_a_type_wins() {
  // Arrange: two shared aliases build the same type.
  let container = container_with_client();
  container.register_type("b1", "Transport", true);
  container.register_type("b2", "Transport", true);

  // Act
  let client = container.resolve_as::<Client>("client").unwrap();

  // Assert
  let b1 = container.resolve_as::<Transport>("b1").unwrap();
  let b2 = container.resolve_as::<Transport>("b2").unwrap();
  assert!(Arc::ptr_eq(&client.transport, &b2));
  assert!(!Arc::ptr_eq(&client.transport, &b1));
}

#[test]
fn test_unregistering_latest_alias_falls_back_to_earlier_one() {
  // Arrange
  let container = container_with_client();
  container.register_type("b1", "Transport", true);
  container.register_type("b2", "Transport", true);

  // Act
  container.unregister("b2");
  let client = container.resolve_as::<Client>("client").unwrap();

  // Assert
  let b1 = container.resolve_as::<Transport>("b1").unwrap();
  assert!(Arc::ptr_eq(&client.transport, &b1));
}

#[test]
fn test_reregistering_latest_alias_as_factory_falls_back_to_earlier_one() {
  // Arrange
  let container = container_with_client();
  container.register_type("b1", "Transport", true);
  container.register_type("b2", "Transport", true);

  // Act: "b2" no longer builds Transport.
  container.register_factory("b2", || 0_u8, false);
  let client = container.resolve_as::<Client>("client").unwrap();

  // Assert
  let b1 = container.resolve_as::<Transport>("b1").unwrap();
  assert!(Arc::ptr_eq(&client.transport, &b1));
}

#[test]
fn test_reregistering_alias_moves_its_binding() {
  // Arrange
  let container = container_with_client();
  container.register_type("b1", "Transport", true);
  container.register_type("b2", "Transport", true);

  // Act: "b1" is registered again, which makes it the newest binding.
  container.register_type("b1", "Transport", true);
  let client = container.resolve_as::<Client>("client").unwrap();

  // Assert
  let b1 = container.resolve_as::<Transport>("b1").unwrap();
  assert!(Arc::ptr_eq(&client.transport, &b1));
}

#[test]
fn test_unregistering_only_bound_alias_leaves_type_unresolvable() {
  let container = container_with_client();
  container.register_type("b1", "Transport", true);

  container.unregister("b1");

  assert_eq!(
    container.resolve("client").unwrap_err(),
    ContainerError::UnregisteredAlias {
      alias: "Transport".to_string()
    }
  );
}

// --- Re-entrant Drop Tests ---

// Calls back into the container when dropped.
struct Reentrant {
  container: Weak<Container>,
  drops: &'static AtomicUsize,
}

impl Drop for Reentrant {
  fn drop(&mut self) {
    if let Some(container) = self.container.upgrade() {
      container.has("anything");
    }
    self.drops.fetch_add(1, Ordering::SeqCst);
  }
}

#[test]
fn test_redefining_type_drops_old_descriptor_outside_borrow() {
  static DROPS: AtomicUsize = AtomicUsize::new(0);

  // Arrange: the first descriptor's constructor owns a value that re-enters on drop.
  let container = Arc::new(Container::new());
  let reentrant = Reentrant {
    container: Arc::downgrade(&container),
    drops: &DROPS,
  };
  container.define(TypeDescriptor::new("Thing").constructor(move |_| {
    let _ = &reentrant;
    Ok(())
  }));

  // Act
  container.define(TypeDescriptor::new("Thing").constructor(|_| Ok(())));

  // Assert
  assert_eq!(DROPS.load(Ordering::SeqCst), 1);
  assert!(container.is_defined("Thing"));
}

#[test]
fn test_caching_drops_displaced_instance_outside_borrow() {
  static DROPS: AtomicUsize = AtomicUsize::new(0);

  // Arrange: building "thing" places an instance under the same alias, which the
  // shared result then displaces.
  let container = Arc::new(Container::new());
  let weak = Arc::downgrade(&container);
  container.define(TypeDescriptor::new("Thing").constructor(move |_| {
    if let Some(container) = weak.upgrade() {
      container.register_instance(
        "thing",
        Reentrant {
          container: weak.clone(),
          drops: &DROPS,
        },
      );
    }
    Ok(7_u32)
  }));
  container.register_type("thing", "Thing", true);

  // Act
  let thing = container.resolve_as::<u32>("thing").unwrap();

  // Assert
  assert_eq!(*thing, 7);
  assert_eq!(DROPS.load(Ordering::SeqCst), 1);
}

// --- Cycle Tests ---

#[test]
fn test_circular_dependency_is_an_error() {
  // Arrange: A -> B -> A
  let container = Container::new();
  container.define(
    TypeDescriptor::new("A")
      .typed("b", "B")
      .constructor(|args| args.next_instance()),
  );
  container.define(
    TypeDescriptor::new("B")
      .typed("a", "A")
      .constructor(|args| args.next_instance()),
  );
  container.register("A", None, false);
  container.register("B", None, false);

  // Act
  let err = container.resolve("A").unwrap_err();

  // Assert
  assert_eq!(
    err,
    ContainerError::CircularDependency {
      alias: "A".to_string(),
      chain: vec!["A".to_string(), "B".to_string(), "A".to_string()],
    }
  );
  assert_eq!(
    err.to_string(),
    "Circular dependency detected while resolving \"A\": A -> B -> A"
  );
}

#[test]
fn test_container_is_usable_after_circular_dependency() {
  let container = Container::new();
  container.define(
    TypeDescriptor::new("Loop")
      .typed("me", "Loop")
      .constructor(|args| args.next_instance()),
  );
  container.register("Loop", None, false);
  container.register_instance("ok", 1_u8);

  assert!(container.resolve("Loop").is_err());
  assert!(container.resolve("Loop").is_err());
  assert_eq!(*container.resolve_as::<u8>("ok").unwrap(), 1);
}

// --- Injectable Tests ---

struct Clock;
impl Injectable for Clock {
  fn construct(_: &mut Arguments) -> Result<Self> {
    Ok(Clock)
  }
}

struct Scheduler {
  clock: Arc<Clock>,
  jobs: usize,
}
impl Injectable for Scheduler {
  fn dependencies() -> Vec<DependencyDescriptor> {
    vec![DependencyDescriptor::of::<Clock>("clock")]
  }
  fn construct(args: &mut Arguments) -> Result<Self> {
    Ok(Scheduler {
      clock: args.next()?,
      jobs: args.len(),
    })
  }
}

#[test]
fn test_injectable_types_are_wired_by_type_name() {
  // Arrange
  let container = Container::new();
  container.define_type::<Clock>();
  container.define_type::<Scheduler>();
  container.register_type("clock", Clock::type_name(), true);
  container.register(Scheduler::type_name(), None, false);

  // Act
  let scheduler = container.resolve_as::<Scheduler>(Scheduler::type_name()).unwrap();
  let clock = container.resolve_as::<Clock>("clock").unwrap();

  // Assert
  assert!(container.is_defined(Scheduler::type_name()));
  assert!(Arc::ptr_eq(&scheduler.clock, &clock));
  assert_eq!(scheduler.jobs, 1);
}

// --- Configuration Tests ---

#[test]
fn test_reregistering_refreshes_shared_instance_by_default() {
  // Arrange
  let container = Container::new();
  container.register_instance("config", "old".to_string());
  container.register_factory("config", || "new".to_string(), false);

  // Act & Assert
  assert_eq!(*container.resolve_as::<String>("config").unwrap(), "new");
}

#[test]
fn test_reregistering_can_keep_stale_shared_instance() {
  // Arrange
  let container = Container::with_config(ContainerConfig::new().refresh_shared_on_register(false));
  container.register_instance("config", "old".to_string());
  container.register_factory("config", || "new".to_string(), false);

  // Act & Assert: the cache still takes precedence until the alias is unregistered.
  assert_eq!(*container.resolve_as::<String>("config").unwrap(), "old");

  container.unregister("config");
  container.register_factory("config", || "new".to_string(), false);
  assert_eq!(*container.resolve_as::<String>("config").unwrap(), "new");
}

#[test]
fn test_share_factories_caches_shared_factory_results() {
  static CALLS: AtomicUsize = AtomicUsize::new(0);

  // Arrange
  let container = Container::with_config(ContainerConfig::new().share_factories(true));
  container.register_factory(
    "shared",
    || CALLS.fetch_add(1, Ordering::SeqCst),
    true,
  );
  container.register_factory("transient", || CALLS.fetch_add(1, Ordering::SeqCst), false);

  // Act
  let s1 = container.resolve_as::<usize>("shared").unwrap();
  let s2 = container.resolve_as::<usize>("shared").unwrap();
  let t1 = container.resolve_as::<usize>("transient").unwrap();
  let t2 = container.resolve_as::<usize>("transient").unwrap();

  // Assert
  assert!(Arc::ptr_eq(&s1, &s2));
  assert!(!Arc::ptr_eq(&t1, &t2));
  assert_eq!(CALLS.load(Ordering::SeqCst), 3);
}

// --- Concurrency Tests ---

#[test]
fn test_shared_type_is_built_once_under_concurrency() {
  static BUILDS: AtomicUsize = AtomicUsize::new(0);

  struct Pool;

  // Arrange
  let container = Container::new();
  container.define(TypeDescriptor::new("Pool").constructor(|_| {
    BUILDS.fetch_add(1, Ordering::SeqCst);
    // Widen the window for a racing second build.
    thread::sleep(std::time::Duration::from_millis(20));
    Ok(Pool)
  }));
  container.register("Pool", None, true);

  // Act
  thread::scope(|s| {
    for _ in 0..16 {
      s.spawn(|| {
        container.resolve_as::<Pool>("Pool").unwrap();
      });
    }
  });

  // Assert
  assert_eq!(BUILDS.load(Ordering::SeqCst), 1);
}

#[test]
fn test_concurrent_registration_and_resolution() {
  let container = Container::new();
  container.register_instance("common", 42_i32);

  thread::scope(|s| {
    for i in 0..8_usize {
      let container = &container;
      s.spawn(move || {
        container.register_instance(format!("thread_{}", i), i);
        for _ in 0..100 {
          assert_eq!(*container.resolve_as::<i32>("common").unwrap(), 42);
        }
        assert_eq!(
          *container.resolve_as::<usize>(&format!("thread_{}", i)).unwrap(),
          i
        );
      });
    }
  });

  assert_eq!(*container.resolve_as::<usize>("thread_5").unwrap(), 5);
}

#[test]
fn test_dropping_container_drops_shared_instances() {
  static DROPS: AtomicUsize = AtomicUsize::new(0);

  struct Connection;
  impl Drop for Connection {
    fn drop(&mut self) {
      DROPS.fetch_add(1, Ordering::SeqCst);
    }
  }

  let container = Container::new();
  container.define(TypeDescriptor::new("Connection").constructor(|_| Ok(Connection)));
  container.register("Connection", None, true);

  let connection = container.resolve("Connection").unwrap();
  drop(connection);
  // The cache still holds the instance.
  assert_eq!(DROPS.load(Ordering::SeqCst), 0);

  drop(container);
  assert_eq!(DROPS.load(Ordering::SeqCst), 1);
}
