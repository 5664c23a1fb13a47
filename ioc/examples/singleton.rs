use strand_ioc::{Container, TypeDescriptor};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

// A simple service that gets a unique ID upon creation.
struct RequestTracker {
  id: usize,
}

// A global, thread-safe counter to generate unique IDs.
static ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn main() {
  let container = Container::new();
  container.define(TypeDescriptor::new("RequestTracker").constructor(|_| {
    println!("Building RequestTracker...");
    Ok(RequestTracker {
      id: ID_COUNTER.fetch_add(1, Ordering::SeqCst),
    })
  }));

  // --- Shared Registration ---
  // The type is built ONCE and cached under this alias.
  container.register_type("shared_tracker", "RequestTracker", true);

  // --- Transient Registration ---
  // The type is built EVERY time the alias is resolved.
  container.register_type("transient_tracker", "RequestTracker", false);

  println!("--- Resolving Shared ---");
  let s1 = container.resolve_as::<RequestTracker>("shared_tracker").unwrap();
  let s2 = container.resolve_as::<RequestTracker>("shared_tracker").unwrap();
  println!("Shared 1 ID: {}, Shared 2 ID: {}", s1.id, s2.id);
  assert_eq!(s1.id, 0);
  assert!(Arc::ptr_eq(&s1, &s2), "Shared instances should be identical");

  println!("--- Resolving Transient ---");
  let t1 = container.resolve_as::<RequestTracker>("transient_tracker").unwrap();
  let t2 = container.resolve_as::<RequestTracker>("transient_tracker").unwrap();
  println!("Transient 1 ID: {}, Transient 2 ID: {}", t1.id, t2.id);
  assert_eq!(t1.id, 1);
  assert_eq!(t2.id, 2);
  assert!(!Arc::ptr_eq(&t1, &t2), "Transient instances should be different");

  println!("--- Resolving Factory ---");
  // Factories are called on every resolution, even when registered as shared.
  container.register_factory(
    "factory_tracker",
    || RequestTracker {
      id: ID_COUNTER.fetch_add(1, Ordering::SeqCst),
    },
    true,
  );
  let f1 = container.resolve_as::<RequestTracker>("factory_tracker").unwrap();
  let f2 = container.resolve_as::<RequestTracker>("factory_tracker").unwrap();
  println!("Factory 1 ID: {}, Factory 2 ID: {}", f1.id, f2.id);
  assert!(!Arc::ptr_eq(&f1, &f2));
}
