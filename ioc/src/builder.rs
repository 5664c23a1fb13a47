// ioc/src/builder.rs

//! Construction of catalogued types with injected constructor arguments.

use crate::annotation;
use crate::container::Container;
use crate::core::Instance;
use crate::descriptor::{Arguments, TypeDescriptor};
use crate::error::{ContainerError, Result};
use tracing::debug;

impl Container {
  /// Instantiates `type_name` on behalf of `alias`, resolving every constructor
  /// dependency through the container first.
  pub(crate) fn build(&self, alias: &str, type_name: &str) -> Result<Instance> {
    let non_instantiable = || ContainerError::NonInstantiableType {
      type_name: type_name.to_owned(),
      alias: alias.to_owned(),
    };

    let descriptor = self.descriptor(type_name).ok_or_else(non_instantiable)?;
    let constructor = descriptor.constructor_fn().ok_or_else(non_instantiable)?;

    let mut arguments = if descriptor.dependencies().is_empty() {
      Arguments::new(type_name, Vec::new())
    } else {
      Arguments::new(type_name, self.resolve_dependencies(&descriptor)?)
    };

    debug!(
      alias,
      type_name,
      arguments = arguments.len(),
      "building instance"
    );
    constructor(&mut arguments)
  }

  /// Resolves each constructor parameter of `descriptor` in declaration order.
  ///
  /// A parameter declared with a service type is resolved by that type. Untyped
  /// and primitive parameters fall back to a `@param` annotation with the same
  /// name in the descriptor's documentation block.
  pub(crate) fn resolve_dependencies(
    &self,
    descriptor: &TypeDescriptor,
  ) -> Result<Vec<(String, Instance)>> {
    let annotations = descriptor
      .doc_block()
      .map(annotation::parse)
      .unwrap_or_default();

    descriptor
      .dependencies()
      .iter()
      .map(|dependency| -> Result<(String, Instance)> {
        let target = dependency
          .declared_type
          .as_deref()
          .filter(|declared| annotation::is_resolvable(declared))
          .or_else(|| {
            annotation::annotated_type(&annotations, &dependency.name)
              .filter(|annotated| annotation::is_resolvable(annotated))
          })
          .ok_or_else(|| ContainerError::DependencyResolution {
            parameter: dependency.name.clone(),
            type_name: descriptor.name().to_owned(),
          })?;

        let value = self.resolve_type(target)?;
        Ok((dependency.name.clone(), value))
      })
      .collect()
  }
}
