//! Public macros for ergonomic, typed resolution.

/// Resolves a typed service from the global container.
///
/// # Panics
///
/// Panics if the alias cannot be resolved or the instance is not a `$type`.
/// For a non-panicking version, use [`maybe_resolve!`] or
/// `global().resolve_as(...)` directly.
///
/// # Examples
///
/// ```
/// use strand_ioc::{global, resolve};
///
/// global().register_factory("message", || String::from("hello"), false);
///
/// let message = resolve!(String, "message");
/// assert_eq!(*message, "hello");
/// ```
#[macro_export]
macro_rules! resolve {
  ($type:ty, $alias:expr) => {
    $crate::resolve_from!($crate::global(), $type, $alias)
  };
}

/// Resolves a typed service from a specific container.
///
/// # Panics
///
/// Panics if the alias cannot be resolved or the instance is not a `$type`.
///
/// ```
/// use strand_ioc::{resolve_from, Container};
///
/// let container = Container::new();
/// container.register_instance("port", 8080_u16);
/// assert_eq!(*resolve_from!(container, u16, "port"), 8080);
/// ```
#[macro_export]
macro_rules! resolve_from {
  ($container:expr, $type:ty, $alias:expr) => {{
    let alias: &str = $alias;
    $container
      .resolve_as::<$type>(alias)
      .unwrap_or_else(|err| {
        panic!(
          "Failed to resolve required service '{}' as {}: {}",
          alias,
          std::any::type_name::<$type>(),
          err
        )
      })
  }};
}

/// Resolves a typed service from the global container, returning `None` on failure.
///
/// ```
/// use strand_ioc::maybe_resolve;
///
/// assert!(maybe_resolve!(u32, "never_registered").is_none());
/// ```
#[macro_export]
macro_rules! maybe_resolve {
  ($type:ty, $alias:expr) => {
    $crate::global().resolve_as::<$type>($alias).ok()
  };
}
