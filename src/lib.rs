//! # bean-factory
//!
//! Constructor-injection bean factory for Rust. Given a catalog describing
//! how each component type is constructed and a set of candidate types, it
//! builds a fully wired object graph: every constructor parameter is resolved
//! to another component (recursively, including types that were never listed
//! as candidates) and each type is instantiated at most once.
//!
//! ## Features
//!
//! - **Explicit constructor table**: constructors are registered ahead of time
//!   as typed closures; no runtime reflection
//! - **Injection points**: mark the constructor to use, with a deterministic
//!   first-declared fallback
//! - **Transitive resolution**: dependencies outside the candidate set are
//!   built on demand
//! - **Singletons**: one `Arc` per type, shared by every dependent
//! - **Cycle detection**: circular constructor dependencies fail fast with the
//!   full path
//! - **Diagnostics**: resolution observers, `tracing` events, a recorded
//!   dependency graph and dry-run planning
//!
//! ## Quick Start
//!
//! ```rust
//! use bean_factory::{BeanFactory, ComponentCatalog, ComponentScanner, Marker};
//! use std::sync::Arc;
//!
//! struct UserService;
//!
//! struct UserController {
//!     service: Arc<UserService>,
//! }
//!
//! let mut catalog = ComponentCatalog::new();
//! catalog.component::<UserService>()
//!     .constructor(|()| UserService)
//!     .register();
//! catalog.component::<UserController>()
//!     .marked(Marker::CONTROLLER)
//!     .injected_constructor(|(service,): (Arc<UserService>,)| UserController { service })
//!     .register();
//!
//! // Only the controller is discovered; the service is built because the
//! // controller needs it.
//! let candidates = ComponentScanner::new(&catalog)
//!     .with_marker(Marker::CONTROLLER)
//!     .scan();
//!
//! let factory = BeanFactory::builder(catalog).initialize(candidates).unwrap();
//!
//! let controller = factory.get::<UserController>().unwrap();
//! let service = factory.get::<UserService>().unwrap();
//! assert!(Arc::ptr_eq(&controller.service, &service));
//! ```
//!
//! ## Failures
//!
//! ```rust
//! use bean_factory::{BeanError, BeanFactory, ComponentCatalog, TypeKey};
//! use std::sync::Arc;
//!
//! struct Missing;
//! struct NeedsMissing { missing: Arc<Missing> }
//!
//! let mut catalog = ComponentCatalog::new();
//! catalog.component::<NeedsMissing>()
//!     .constructor(|(missing,): (Arc<Missing>,)| NeedsMissing { missing })
//!     .register();
//!
//! let err = BeanFactory::builder(catalog)
//!     .initialize([TypeKey::of::<NeedsMissing>()])
//!     .unwrap_err();
//! assert!(matches!(err.cause(), BeanError::UnresolvableParameter { position: 0, .. }));
//! ```
//!
//! ## Circular dependencies
//!
//! A type that is requested again while it is still being resolved (A needs B
//! needs A) fails with [`BeanError::CircularDependency`]; cycles are never
//! broken with proxies or partially built instances.

// Module declarations
pub mod catalog;
pub mod constructor;
pub mod descriptors;
pub mod error;
pub mod factory;
pub mod graph;
pub mod key;
pub mod marker;
pub mod observer;
pub mod options;
pub mod scanner;
pub mod selection;
pub mod traits;
pub mod validation;

// Internal modules
mod resolver;

// Re-export core types
pub use catalog::{ComponentBuilder, ComponentCatalog, ComponentModule};
pub use constructor::{AnyArc, ConstructorDescriptor, Dependencies};
pub use descriptors::ComponentDescriptor;
pub use error::{BeanError, BeanResult, BoxError, ConstructorPanic, InitializationError};
pub use factory::{BeanFactory, BeanFactoryBuilder};
pub use graph::{DependencyGraph, GraphEdge, GraphNode, NodeOrigin};
pub use key::{key_of_type, TypeKey};
pub use marker::Marker;
pub use observer::{LoggingObserver, ResolutionObserver};
pub use options::{FactoryOptions, DEFAULT_ENV_PREFIX, DEFAULT_MAX_DEPTH};
pub use scanner::{CandidateSet, ComponentScanner};
pub use selection::{select_constructor, ConstructorPolicy};
pub use traits::ComponentMetadata;
pub use validation::ResolutionPlan;
