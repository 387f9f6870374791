//! Component modules for grouped registration.

use crate::catalog::ComponentCatalog;

/// A group of components registered together.
///
/// ```rust
/// use bean_factory::{ComponentCatalog, ComponentModule, Marker};
/// use std::sync::Arc;
///
/// struct UserRepository;
/// struct UserService { repo: Arc<UserRepository> }
///
/// struct UserModule;
///
/// impl ComponentModule for UserModule {
///     fn register_components(self, catalog: &mut ComponentCatalog) {
///         catalog.component::<UserRepository>()
///             .marked(Marker::REPOSITORY)
///             .constructor(|()| UserRepository)
///             .register();
///         catalog.component::<UserService>()
///             .marked(Marker::SERVICE)
///             .injected_constructor(|(repo,): (Arc<UserRepository>,)| UserService { repo })
///             .register();
///     }
/// }
///
/// let mut catalog = ComponentCatalog::new();
/// catalog.add_module(UserModule);
/// assert!(catalog.contains::<UserService>());
/// ```
pub trait ComponentModule {
    /// Register this module's components with the catalog.
    fn register_components(self, catalog: &mut ComponentCatalog);
}

impl ComponentCatalog {
    /// Registers every component of `module`.
    pub fn add_module<M: ComponentModule>(&mut self, module: M) -> &mut Self {
        module.register_components(self);
        self
    }
}
