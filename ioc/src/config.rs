// ioc/src/config.rs

//! Behavioral switches for a [`Container`](crate::Container).

/// Options controlling how a container treats shared registrations.
///
/// The defaults refresh the shared cache when an alias is re-registered and
/// never cache factory results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ContainerConfig {
  /// Drop any cached shared instance for an alias when that alias is registered again.
  pub refresh_shared_on_register: bool,
  /// Cache the result of a factory registered with `shared = true`.
  pub share_factories: bool,
}

impl Default for ContainerConfig {
  fn default() -> Self {
    Self {
      refresh_shared_on_register: true,
      share_factories: false,
    }
  }
}

impl ContainerConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn refresh_shared_on_register(mut self, enabled: bool) -> Self {
    self.refresh_shared_on_register = enabled;
    self
  }

  pub fn share_factories(mut self, enabled: bool) -> Self {
    self.share_factories = enabled;
    self
  }
}
