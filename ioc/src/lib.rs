//! # Strand IoC
//!
//! A small, thread-safe Inversion of Control (IoC) container keyed by aliases.
//!
//! Each alias is registered with a [`Concrete`]: the name of a catalogued type to
//! build, a zero-argument factory, or a pre-built instance. Resolving a typed
//! registration reads the type's [`TypeDescriptor`], resolves every constructor
//! dependency through the container, and calls the constructor with the results.
//!
//! ## Core Concepts
//!
//! - **Container**: the registry of aliases, the shared-instance cache and the type catalog.
//! - **Shared**: a registration whose first result is cached and handed out again.
//! - **Type catalog**: [`TypeDescriptor`]s, written by hand or derived from [`Injectable`].
//! - **Annotations**: untyped constructor parameters can be matched to a service
//!   type through `@param <Type> $<name>` lines in the descriptor's doc block.
//!
//! ## Quick Start
//!
//! ```
//! use strand_ioc::{Container, TypeDescriptor};
//! use std::sync::Arc;
//!
//! struct Database {
//!   url: String,
//! }
//!
//! struct UserRepository {
//!   db: Arc<Database>,
//! }
//!
//! let container = Container::new();
//!
//! container.define(TypeDescriptor::new("Database").constructor(|_| {
//!   Ok(Database { url: "postgres://localhost/app".to_string() })
//! }));
//! container.define(
//!   TypeDescriptor::new("UserRepository")
//!     .typed("db", "Database")
//!     .constructor(|args| Ok(UserRepository { db: args.next()? })),
//! );
//!
//! container.register_type("db", "Database", true);
//! container.register_type("users", "UserRepository", false);
//!
//! let users = container.resolve_as::<UserRepository>("users").unwrap();
//! assert_eq!(users.db.url, "postgres://localhost/app");
//! ```

mod accessor;
mod annotation;
mod builder;
mod config;
mod container;
mod core;
mod descriptor;
mod error;
mod global;
mod macros;

pub use accessor::MapAccess;
pub use config::ContainerConfig;
pub use container::Container;
pub use crate::core::{Concrete, Factory, Instance, RegistrationEntry};
pub use descriptor::{Arguments, Constructor, DependencyDescriptor, Injectable, TypeDescriptor};
pub use error::{ContainerError, Result};
pub use global::global;
