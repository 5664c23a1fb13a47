//! Core, mostly non-public data structures for the IoC container.

use crate::descriptor::TypeDescriptor;
use crate::error::{ContainerError, Result};
use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A type-erased, reference-counted service instance.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// A zero-argument closure producing a fresh instance on every call.
pub type Factory = Arc<dyn Fn() -> Instance + Send + Sync>;

/// Describes how an alias produces its instance.
#[derive(Clone)]
pub enum Concrete {
  /// The name of a type from the container's type catalog, built on demand.
  Type(String),
  /// A closure invoked on resolution.
  Factory(Factory),
  /// A fully configured value. Always shared.
  Instance(Instance),
}

impl Concrete {
  pub fn type_name(name: impl Into<String>) -> Self {
    Concrete::Type(name.into())
  }

  /// Wraps a closure returning a plain value into a `Factory` concrete.
  pub fn factory<T, F>(factory: F) -> Self
  where
    T: Any + Send + Sync,
    F: Fn() -> T + Send + Sync + 'static,
  {
    Concrete::Factory(Arc::new(move || Arc::new(factory()) as Instance))
  }

  pub fn instance<T: Any + Send + Sync>(value: T) -> Self {
    Concrete::Instance(Arc::new(value))
  }
}

impl fmt::Debug for Concrete {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Concrete::Type(name) => write!(f, "Type({})", name),
      Concrete::Factory(_) => write!(f, "Factory(..)"),
      Concrete::Instance(_) => write!(f, "Instance(..)"),
    }
  }
}

/// One registration per alias.
#[derive(Debug, Clone)]
pub struct RegistrationEntry {
  pub(crate) alias: String,
  pub(crate) concrete: Concrete,
  pub(crate) shared: bool,
}

impl RegistrationEntry {
  pub fn alias(&self) -> &str {
    &self.alias
  }

  pub fn concrete(&self) -> &Concrete {
    &self.concrete
  }

  /// Pre-built instances count as shared regardless of the requested flag.
  pub fn is_shared(&self) -> bool {
    self.shared || matches!(self.concrete, Concrete::Instance(_))
  }
}

/// Everything a container guards with its lock.
#[derive(Default)]
pub(crate) struct State {
  pub(crate) entries: HashMap<String, RegistrationEntry>,
  pub(crate) shared: HashMap<String, Instance>,
  pub(crate) types: HashMap<String, Arc<TypeDescriptor>>,
  // type name -> aliases registered for it, oldest first
  pub(crate) bindings: HashMap<String, Vec<String>>,
  pub(crate) resolving: Vec<String>,
}

impl State {
  /// Drops `alias` from every type binding, leaving other aliases in order.
  pub(crate) fn unbind(&mut self, alias: &str) {
    self.bindings.retain(|_, aliases| {
      aliases.retain(|bound| bound != alias);
      !aliases.is_empty()
    });
  }

  /// The alias most recently registered for `type_name` that is still bound.
  pub(crate) fn bound_alias(&self, type_name: &str) -> Option<&str> {
    self
      .bindings
      .get(type_name)
      .and_then(|aliases| aliases.last())
      .map(String::as_str)
  }
}

/// An RAII guard to detect and prevent circular dependencies.
///
/// When created, it pushes an alias onto the container's resolution stack.
/// If the alias is already present the chain is circular and an error is
/// returned instead. When the guard is dropped, it pops the alias again.
pub(crate) struct ResolutionGuard<'a> {
  state: &'a RefCell<State>,
}

impl<'a> ResolutionGuard<'a> {
  pub(crate) fn enter(state: &'a RefCell<State>, alias: &str) -> Result<Self> {
    let mut inner = state.borrow_mut();
    if inner.resolving.iter().any(|a| a == alias) {
      let mut chain = inner.resolving.clone();
      chain.push(alias.to_owned());
      return Err(ContainerError::CircularDependency {
        alias: alias.to_owned(),
        chain,
      });
    }
    inner.resolving.push(alias.to_owned());
    Ok(Self { state })
  }
}

impl Drop for ResolutionGuard<'_> {
  fn drop(&mut self) {
    self.state.borrow_mut().resolving.pop();
  }
}
