// ioc/src/descriptor.rs

//! Type descriptors: the container's stand-in for runtime reflection.
//!
//! A [`TypeDescriptor`] tells the builder everything it needs to construct a
//! type: the ordered list of constructor parameters, an optional documentation
//! block carrying `@param` annotations, and the constructor itself.

use crate::core::Instance;
use crate::error::{ContainerError, Result};
use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

/// A constructor receiving its resolved arguments in declaration order.
pub type Constructor = Arc<dyn Fn(&mut Arguments) -> Result<Instance> + Send + Sync>;

/// One constructor parameter: its name and, optionally, the type it was declared with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyDescriptor {
  pub name: String,
  pub declared_type: Option<String>,
}

impl DependencyDescriptor {
  /// A parameter declared with the named type.
  pub fn typed(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      declared_type: Some(declared_type.into()),
    }
  }

  /// A parameter with no declared type. It can only be satisfied through an annotation.
  pub fn untyped(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      declared_type: None,
    }
  }

  /// A parameter declared with an [`Injectable`] type.
  pub fn of<T: Injectable>(name: impl Into<String>) -> Self {
    Self::typed(name, T::type_name())
  }
}

/// Describes how to construct one named type.
#[derive(Clone)]
pub struct TypeDescriptor {
  name: String,
  dependencies: Vec<DependencyDescriptor>,
  doc: Option<String>,
  constructor: Option<Constructor>,
}

impl TypeDescriptor {
  /// Starts a descriptor with no parameters and no constructor.
  ///
  /// Without a constructor the type is abstract and any attempt to build it fails
  /// with [`ContainerError::NonInstantiableType`].
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      dependencies: Vec::new(),
      doc: None,
      constructor: None,
    }
  }

  /// Derives a descriptor from an [`Injectable`] implementation.
  pub fn of<T: Injectable>() -> Self {
    let mut descriptor = Self::new(T::type_name()).constructor(T::construct);
    descriptor.dependencies = T::dependencies();
    descriptor.doc = T::doc().map(str::to_owned);
    descriptor
  }

  /// Appends a constructor parameter.
  pub fn dependency(mut self, dependency: DependencyDescriptor) -> Self {
    self.dependencies.push(dependency);
    self
  }

  /// Appends a parameter declared with the named type.
  pub fn typed(self, name: impl Into<String>, declared_type: impl Into<String>) -> Self {
    self.dependency(DependencyDescriptor::typed(name, declared_type))
  }

  /// Appends a parameter with no declared type.
  pub fn untyped(self, name: impl Into<String>) -> Self {
    self.dependency(DependencyDescriptor::untyped(name))
  }

  /// Sets the documentation block searched for `@param` annotations.
  pub fn doc(mut self, doc: impl Into<String>) -> Self {
    self.doc = Some(doc.into());
    self
  }

  /// Sets the constructor. The returned value is wrapped in an `Arc`.
  pub fn constructor<T, F>(mut self, constructor: F) -> Self
  where
    T: Any + Send + Sync,
    F: Fn(&mut Arguments) -> Result<T> + Send + Sync + 'static,
  {
    self.constructor = Some(Arc::new(move |args: &mut Arguments| {
      constructor(args).map(|value| Arc::new(value) as Instance)
    }));
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn dependencies(&self) -> &[DependencyDescriptor] {
    &self.dependencies
  }

  pub fn doc_block(&self) -> Option<&str> {
    self.doc.as_deref()
  }

  pub fn is_instantiable(&self) -> bool {
    self.constructor.is_some()
  }

  pub(crate) fn constructor_fn(&self) -> Option<&Constructor> {
    self.constructor.as_ref()
  }
}

impl fmt::Debug for TypeDescriptor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TypeDescriptor")
      .field("name", &self.name)
      .field("dependencies", &self.dependencies)
      .field("doc", &self.doc)
      .field("instantiable", &self.is_instantiable())
      .finish()
  }
}

/// A type that can describe and construct itself.
///
/// ```
/// use strand_ioc::{Arguments, Container, DependencyDescriptor, Injectable, Result};
/// use std::sync::Arc;
///
/// struct Clock;
/// impl Injectable for Clock {
///   fn construct(_: &mut Arguments) -> Result<Self> {
///     Ok(Clock)
///   }
/// }
///
/// struct Scheduler {
///   clock: Arc<Clock>,
/// }
/// impl Injectable for Scheduler {
///   fn dependencies() -> Vec<DependencyDescriptor> {
///     vec![DependencyDescriptor::of::<Clock>("clock")]
///   }
///   fn construct(args: &mut Arguments) -> Result<Self> {
///     Ok(Scheduler { clock: args.next()? })
///   }
/// }
///
/// let container = Container::new();
/// container.define_type::<Clock>();
/// container.define_type::<Scheduler>();
/// container.register_type("clock", Clock::type_name(), true);
/// container.register_type("scheduler", Scheduler::type_name(), false);
///
/// let scheduler = container.resolve_as::<Scheduler>("scheduler").unwrap();
/// let clock = container.resolve_as::<Clock>("clock").unwrap();
/// assert!(Arc::ptr_eq(&scheduler.clock, &clock));
/// ```
pub trait Injectable: Any + Send + Sync + Sized {
  /// The name this type is catalogued under.
  fn type_name() -> &'static str {
    type_name::<Self>()
  }

  /// Constructor parameters, in the order `construct` consumes them.
  fn dependencies() -> Vec<DependencyDescriptor> {
    Vec::new()
  }

  /// Documentation block carrying `@param` annotations for untyped parameters.
  fn doc() -> Option<&'static str> {
    None
  }

  fn construct(args: &mut Arguments) -> Result<Self>;
}

/// Resolved constructor arguments, in declaration order.
pub struct Arguments {
  type_name: String,
  values: Vec<(String, Instance)>,
  cursor: usize,
}

impl Arguments {
  pub(crate) fn new(type_name: &str, values: Vec<(String, Instance)>) -> Self {
    Self {
      type_name: type_name.to_owned(),
      values,
      cursor: 0,
    }
  }

  /// Name of the type being constructed.
  pub fn type_name(&self) -> &str {
    &self.type_name
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  /// Takes the next positional argument as an untyped instance.
  pub fn next_instance(&mut self) -> Result<Instance> {
    let (_, value) = self
      .values
      .get(self.cursor)
      .ok_or_else(|| self.invalid(format!("#{}", self.cursor), "an instance"))?;
    let value = value.clone();
    self.cursor += 1;
    Ok(value)
  }

  /// Takes the next positional argument, downcast to `T`.
  pub fn next<T: Any + Send + Sync>(&mut self) -> Result<Arc<T>> {
    let index = self.cursor;
    let (name, value) = self
      .values
      .get(index)
      .ok_or_else(|| self.invalid(format!("#{}", index), type_name::<T>()))?;
    let typed = value
      .clone()
      .downcast::<T>()
      .map_err(|_| self.invalid(name.clone(), type_name::<T>()))?;
    self.cursor += 1;
    Ok(typed)
  }

  /// Looks up an argument by parameter name, downcast to `T`.
  pub fn get<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>> {
    self
      .values
      .iter()
      .find(|(param, _)| param == name)
      .and_then(|(_, value)| value.clone().downcast::<T>().ok())
      .ok_or_else(|| self.invalid(name.to_owned(), type_name::<T>()))
  }

  fn invalid(&self, parameter: String, expected: &'static str) -> ContainerError {
    ContainerError::InvalidArgument {
      type_name: self.type_name.clone(),
      parameter,
      expected,
    }
  }
}
