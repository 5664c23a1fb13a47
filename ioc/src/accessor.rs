// ioc/src/accessor.rs

//! Map-style access to a container.

use crate::container::Container;
use crate::core::{Concrete, Instance};
use crate::error::Result;

/// A map-like view over a [`Container`], keyed by alias.
///
/// Holds no state of its own: every call is forwarded to the container.
///
/// ```
/// use strand_ioc::{Concrete, Container};
///
/// let container = Container::new();
/// let mut map = container.map();
/// map.set("greeting", Concrete::instance(String::from("hello")));
///
/// assert!(map.contains("greeting"));
/// let greeting = map.get("greeting").unwrap().downcast::<String>().unwrap();
/// assert_eq!(*greeting, "hello");
///
/// map.delete("greeting");
/// assert!(!container.has("greeting"));
/// ```
#[derive(Clone, Copy)]
pub struct MapAccess<'c> {
  container: &'c Container,
}

impl<'c> MapAccess<'c> {
  pub(crate) fn new(container: &'c Container) -> Self {
    Self { container }
  }

  /// Delegates to [`Container::resolve`].
  pub fn get(&self, alias: &str) -> Result<Instance> {
    self.container.resolve(alias)
  }

  /// Delegates to [`Container::register`] as a transient registration.
  pub fn set(&mut self, alias: impl Into<String>, concrete: Concrete) {
    self.container.register(alias, Some(concrete), false);
  }

  /// Delegates to [`Container::unregister`].
  pub fn delete(&mut self, alias: &str) {
    self.container.unregister(alias);
  }

  /// Delegates to [`Container::has`].
  pub fn contains(&self, alias: &str) -> bool {
    self.container.has(alias)
  }
}
