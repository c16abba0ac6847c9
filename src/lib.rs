//! # bowl
//!
//! A minimal, name-keyed dependency injection container.
//!
//! ## Features
//!
//! - **Lazy services**: factories run on first resolution, never at registration
//! - **Two lifetimes**: `Shared` services are cached until reset, `Factory` services are rebuilt on every `get`
//! - **Extensions**: decorate a service after it is defined; extensions run once per instantiation
//! - **Tags**: group services and resolve them lazily through a [`TaggedServices`] view
//! - **Environments**: named configuration callbacks, of which exactly one may ever be activated
//! - **Parameters**: plain JSON values stored next to services, with dotted keys kept out of the service namespace
//!
//! ## Quick Start
//!
//! ```rust
//! use bowl::Container;
//! use std::sync::Arc;
//!
//! struct Database {
//!     connection_string: String,
//! }
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! let container = Container::new();
//! container.set_parameter("db.dsn", "postgres://localhost");
//! container.share("database", &[], |c| {
//!     let dsn = c.parameter("db.dsn")?;
//!     Ok(Database { connection_string: dsn.as_str().unwrap_or_default().to_string() })
//! }).unwrap();
//! container.factory("users", &[], |c| Ok(UserService { db: c.get("database")? })).unwrap();
//!
//! let users = container.get::<UserService>("users").unwrap();
//! assert_eq!(users.db.connection_string, "postgres://localhost");
//! ```
//!
//! ## Environments
//!
//! ```rust
//! use bowl::Container;
//!
//! let container = Container::new();
//! container.set_parameter("debug", false);
//! container.configure("dev", |c| {
//!     c.set_parameter("debug", true);
//!     c.share("mailer", &[], |_| Ok("null-mailer".to_string()))?;
//!     Ok(())
//! }).unwrap();
//!
//! container.env("dev").unwrap();
//! assert_eq!(container.parameter("debug").unwrap(), true);
//! assert_eq!(*container.get::<String>("mailer").unwrap(), "null-mailer");
//! ```

pub mod config;
pub mod container;
pub mod descriptors;
pub mod error;
pub mod key;
pub mod lifetime;
pub mod observer;
pub mod tagged;

mod environment;
mod registration;

pub use config::{ConfigSource, ContainerConfig, EnvironmentConfigSource};
pub use container::{Container, Entry};
pub use descriptors::ServiceDescriptor;
pub use error::{DiError, DiResult};
pub use key::SEPARATOR;
pub use lifetime::Lifetime;
pub use observer::{ContainerObserver, TracingObserver};
pub use registration::AnyArc;
pub use tagged::TaggedServices;
