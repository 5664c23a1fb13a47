use thiserror::Error;

/// Errors produced while resolving services from a [`Container`](crate::Container).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerError {
  /// Resolution was requested for an alias that has no registration.
  #[error("Alias \"{alias}\" is not registered")]
  UnregisteredAlias { alias: String },

  /// The type behind an alias is unknown to the container or has no constructor.
  #[error("Unable to instantiate type \"{type_name}\" attached to alias \"{alias}\"")]
  NonInstantiableType { type_name: String, alias: String },

  /// A constructor parameter has neither a usable declared type nor a matching annotation.
  #[error("Unable to determine a dependency for parameter \"{parameter}\" of type \"{type_name}\"")]
  DependencyResolution { parameter: String, type_name: String },

  /// An alias reappeared while it was still being resolved.
  #[error("Circular dependency detected while resolving \"{alias}\": {}", .chain.join(" -> "))]
  CircularDependency { alias: String, chain: Vec<String> },

  /// The resolved instance is not of the requested Rust type.
  #[error("Alias \"{alias}\" did not resolve to an instance of {expected}")]
  TypeMismatch { alias: String, expected: &'static str },

  /// A constructor asked for an argument that is missing or of another type.
  #[error("Argument \"{parameter}\" for type \"{type_name}\" is not an instance of {expected}")]
  InvalidArgument {
    type_name: String,
    parameter: String,
    expected: &'static str,
  },
}

/// A specialized `Result` type for container operations.
pub type Result<T, E = ContainerError> = std::result::Result<T, E>;
