//! The main `Container` struct and its registry and resolution methods.

use crate::accessor::MapAccess;
use crate::config::ContainerConfig;
use crate::core::{Concrete, Instance, RegistrationEntry, ResolutionGuard, State};
use crate::descriptor::{Injectable, TypeDescriptor};
use crate::error::{ContainerError, Result};
use parking_lot::ReentrantMutex;
use std::any::{type_name, Any};
use std::cell::RefCell;
use std::sync::Arc;
use tracing::{debug, trace};

/// The Inversion of Control (IoC) container.
///
/// Maps aliases to registrations and resolves them on demand, building typed
/// registrations from the container's type catalog and injecting their
/// constructor dependencies recursively.
///
/// All state sits behind a single re-entrant lock that is held for the whole of
/// an operation, so a shared registration is constructed at most once even when
/// many threads resolve it at the same time. Factories and constructors running
/// on the resolving thread may call back into the container.
#[derive(Default)]
pub struct Container {
  config: ContainerConfig,
  state: ReentrantMutex<RefCell<State>>,
}

impl Container {
  /// Creates a new, empty `Container` with the default configuration.
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates a new, empty `Container` with the given configuration.
  pub fn with_config(config: ContainerConfig) -> Self {
    Self {
      config,
      state: ReentrantMutex::default(),
    }
  }

  pub fn config(&self) -> &ContainerConfig {
    &self.config
  }

  // --- Registration ---

  /// Registers `alias`, replacing any previous registration under the same name.
  ///
  /// With `concrete` omitted the alias doubles as the type name to build.
  /// Pre-built instances are cached straight away and are always shared.
  pub fn register(&self, alias: impl Into<String>, concrete: Option<Concrete>, shared: bool) {
    let alias = alias.into();
    let concrete = concrete.unwrap_or_else(|| Concrete::Type(alias.clone()));
    trace!(alias = %alias, concrete = ?concrete, shared, "registering alias");

    let guard = self.state.lock();
    let mut state = guard.borrow_mut();

    // Replaced values are dropped once the borrow ends since their destructors may re-enter.
    let stale = if self.config.refresh_shared_on_register {
      state.shared.remove(&alias)
    } else {
      None
    };
    state.unbind(&alias);

    let displaced = match &concrete {
      Concrete::Instance(instance) => state.shared.insert(alias.clone(), instance.clone()),
      Concrete::Type(type_name) => {
        state
          .bindings
          .entry(type_name.clone())
          .or_default()
          .push(alias.clone());
        None
      }
      Concrete::Factory(_) => None,
    };

    let replaced = state.entries.insert(
      alias.clone(),
      RegistrationEntry {
        alias,
        concrete,
        shared,
      },
    );
    drop(state);
    drop((stale, displaced, replaced));
  }

  /// Registers `alias` to be built from the catalogued type `type_name`.
  pub fn register_type(&self, alias: impl Into<String>, type_name: impl Into<String>, shared: bool) {
    self.register(alias, Some(Concrete::Type(type_name.into())), shared);
  }

  /// Registers a zero-argument factory.
  ///
  /// Factory results are not cached even when `shared` is true, unless the
  /// container was configured with [`ContainerConfig::share_factories`].
  pub fn register_factory<T, F>(&self, alias: impl Into<String>, factory: F, shared: bool)
  where
    T: Any + Send + Sync,
    F: Fn() -> T + Send + Sync + 'static,
  {
    self.register(alias, Some(Concrete::factory(factory)), shared);
  }

  /// Registers a fully configured value, shared by every resolution.
  pub fn register_instance<T: Any + Send + Sync>(&self, alias: impl Into<String>, value: T) {
    self.register(alias, Some(Concrete::instance(value)), true);
  }

  /// Removes `alias` along with its cached instance. Unknown aliases are ignored.
  pub fn unregister(&self, alias: &str) {
    let guard = self.state.lock();
    let mut state = guard.borrow_mut();
    let removed = (state.entries.remove(alias), state.shared.remove(alias));
    state.unbind(alias);
    drop(state);

    if removed.0.is_some() {
      trace!(alias, "unregistered alias");
    }
  }

  /// Whether `alias` is registered, whether or not it was ever resolved.
  pub fn has(&self, alias: &str) -> bool {
    self.state.lock().borrow().entries.contains_key(alias)
  }

  /// A copy of the registration for `alias`.
  pub fn entry(&self, alias: &str) -> Option<RegistrationEntry> {
    self.state.lock().borrow().entries.get(alias).cloned()
  }

  // --- Type catalog ---

  /// Adds a type to the catalog, replacing any earlier definition of the same name.
  pub fn define(&self, descriptor: TypeDescriptor) {
    trace!(type_name = descriptor.name(), "defining type");
    let guard = self.state.lock();
    let replaced = guard
      .borrow_mut()
      .types
      .insert(descriptor.name().to_owned(), Arc::new(descriptor));
    drop(replaced);
  }

  /// Adds an [`Injectable`] type to the catalog.
  pub fn define_type<T: Injectable>(&self) {
    self.define(TypeDescriptor::of::<T>());
  }

  pub fn is_defined(&self, type_name: &str) -> bool {
    self.state.lock().borrow().types.contains_key(type_name)
  }

  pub(crate) fn descriptor(&self, type_name: &str) -> Option<Arc<TypeDescriptor>> {
    self.state.lock().borrow().types.get(type_name).cloned()
  }

  // --- Resolution ---

  /// Resolves `alias` into an instance.
  pub fn resolve(&self, alias: &str) -> Result<Instance> {
    let guard = self.state.lock();

    let (concrete, shared) = {
      let state = guard.borrow();
      let entry = state
        .entries
        .get(alias)
        .ok_or_else(|| ContainerError::UnregisteredAlias {
          alias: alias.to_owned(),
        })?;

      if let Some(instance) = state.shared.get(alias) {
        trace!(alias, "returning shared instance");
        return Ok(instance.clone());
      }

      (entry.concrete.clone(), entry.shared)
    };

    let _resolving = ResolutionGuard::enter(&guard, alias)?;

    match concrete {
      Concrete::Factory(factory) => {
        let instance = factory();
        if shared && self.config.share_factories {
          self.cache(alias, &instance);
        }
        Ok(instance)
      }
      Concrete::Instance(instance) => Ok(instance),
      Concrete::Type(type_name) => {
        let instance = self.build(alias, &type_name)?;
        if shared {
          self.cache(alias, &instance);
        }
        Ok(instance)
      }
    }
  }

  /// Resolves `alias` and downcasts the instance to `T`.
  pub fn resolve_as<T: Any + Send + Sync>(&self, alias: &str) -> Result<Arc<T>> {
    self
      .resolve(alias)?
      .downcast::<T>()
      .map_err(|_| ContainerError::TypeMismatch {
        alias: alias.to_owned(),
        expected: type_name::<T>(),
      })
  }

  /// Resolves a dependency declared as `type_name`.
  ///
  /// An alias spelled like the type wins; otherwise the alias most recently
  /// registered for that type and still bound to it is used.
  pub(crate) fn resolve_type(&self, type_name: &str) -> Result<Instance> {
    let guard = self.state.lock();
    let alias = {
      let state = guard.borrow();
      if state.entries.contains_key(type_name) {
        type_name.to_owned()
      } else {
        state
          .bound_alias(type_name)
          .map(str::to_owned)
          .ok_or_else(|| ContainerError::UnregisteredAlias {
            alias: type_name.to_owned(),
          })?
      }
    };
    self.resolve(&alias)
  }

  /// A map-style view over this container.
  pub fn map(&self) -> MapAccess<'_> {
    MapAccess::new(self)
  }

  fn cache(&self, alias: &str, instance: &Instance) {
    debug!(alias, "caching shared instance");
    let guard = self.state.lock();
    let displaced = guard
      .borrow_mut()
      .shared
      .insert(alias.to_owned(), instance.clone());
    drop(displaced);
  }
}

impl Extend<(String, Concrete)> for Container {
  fn extend<I: IntoIterator<Item = (String, Concrete)>>(&mut self, iter: I) {
    for (alias, concrete) in iter {
      self.register(alias, Some(concrete), false);
    }
  }
}

impl FromIterator<(String, Concrete)> for Container {
  fn from_iter<I: IntoIterator<Item = (String, Concrete)>>(iter: I) -> Self {
    let mut container = Container::new();
    container.extend(iter);
    container
  }
}
