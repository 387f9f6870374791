//! Component catalog: the constructor-descriptor registry.
//!
//! The catalog records, ahead of time, how every injectable type is built.
//! It replaces runtime constructor discovery with a table lookup keyed by
//! [`TypeKey`].

use std::collections::HashMap;
use std::marker::PhantomData;

use crate::constructor::{ConstructorDescriptor, Dependencies};
use crate::descriptors::ComponentDescriptor;
use crate::error::BoxError;
use crate::key::TypeKey;
use crate::marker::Marker;
use crate::traits::ComponentMetadata;

pub mod module_system;
pub use module_system::*;

/// Declaration-ordered table of component descriptors.
///
/// # Examples
///
/// ```rust
/// use bean_factory::{ComponentCatalog, ComponentMetadata, Marker, TypeKey};
/// use std::sync::Arc;
///
/// struct UserRepository;
/// struct UserService { repo: Arc<UserRepository> }
///
/// let mut catalog = ComponentCatalog::new();
/// catalog.component::<UserRepository>()
///     .marked(Marker::REPOSITORY)
///     .constructor(|()| UserRepository)
///     .register();
/// catalog.component::<UserService>()
///     .marked(Marker::SERVICE)
///     .injected_constructor(|(repo,): (Arc<UserRepository>,)| UserService { repo })
///     .register();
///
/// assert_eq!(catalog.len(), 2);
/// let service = TypeKey::of::<UserService>();
/// assert!(catalog.has_marker(&service, Marker::SERVICE));
/// assert_eq!(catalog.injection_points(&service).len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ComponentCatalog {
    entries: Vec<ComponentDescriptor>,
    index: HashMap<TypeKey, usize>,
}

impl ComponentCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts describing component `T`. Nothing is stored until
    /// [`ComponentBuilder::register`] is called.
    pub fn component<T: Send + Sync + 'static>(&mut self) -> ComponentBuilder<'_, T> {
        ComponentBuilder {
            catalog: self,
            descriptor: ComponentDescriptor::new(TypeKey::of::<T>()),
            _marker: PhantomData,
        }
    }

    /// Stores a descriptor.
    ///
    /// Registering a type twice replaces the earlier descriptor but keeps its
    /// original declaration position.
    pub fn insert(&mut self, descriptor: ComponentDescriptor) -> &mut Self {
        let key = *descriptor.key();
        match self.index.get(&key) {
            Some(&pos) => self.entries[pos] = descriptor,
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push(descriptor);
            }
        }
        self
    }

    /// Whether `T` is catalogued.
    pub fn contains<T: 'static>(&self) -> bool {
        self.contains_key(&TypeKey::of::<T>())
    }

    /// Whether `key` is catalogued.
    pub fn contains_key(&self, key: &TypeKey) -> bool {
        self.index.contains_key(key)
    }

    /// Number of catalogued components.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Descriptors in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ComponentDescriptor> {
        self.entries.iter()
    }

    /// Snapshot of all descriptors for introspection.
    pub fn descriptors(&self) -> Vec<ComponentDescriptor> {
        self.entries.clone()
    }
}

impl ComponentMetadata for ComponentCatalog {
    fn descriptor(&self, key: &TypeKey) -> Option<&ComponentDescriptor> {
        self.index.get(key).map(|&pos| &self.entries[pos])
    }

    fn component_keys(&self) -> Vec<TypeKey> {
        self.entries.iter().map(|d| *d.key()).collect()
    }
}

/// Fluent description of one component, created by [`ComponentCatalog::component`].
#[must_use = "a component is only catalogued once `register` is called"]
pub struct ComponentBuilder<'a, T> {
    catalog: &'a mut ComponentCatalog,
    descriptor: ComponentDescriptor,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T: Send + Sync + 'static> ComponentBuilder<'a, T> {
    /// Tags the component with a stereotype marker.
    pub fn marked(mut self, marker: Marker) -> Self {
        self.descriptor = self.descriptor.with_marker(marker);
        self
    }

    /// Declares a constructor.
    pub fn constructor<D, F>(self, factory: F) -> Self
    where
        D: Dependencies,
        F: Fn(D) -> T + Send + Sync + 'static,
    {
        self.with(ConstructorDescriptor::new(factory))
    }

    /// Declares the constructor marked as the injection point.
    pub fn injected_constructor<D, F>(self, factory: F) -> Self
    where
        D: Dependencies,
        F: Fn(D) -> T + Send + Sync + 'static,
    {
        self.with(ConstructorDescriptor::new(factory).injection_point())
    }

    /// Declares a constructor that may fail.
    pub fn try_constructor<D, E, F>(self, factory: F) -> Self
    where
        D: Dependencies,
        E: Into<BoxError>,
        F: Fn(D) -> Result<T, E> + Send + Sync + 'static,
    {
        self.with(ConstructorDescriptor::fallible(factory))
    }

    /// Declares a fallible constructor marked as the injection point.
    pub fn try_injected_constructor<D, E, F>(self, factory: F) -> Self
    where
        D: Dependencies,
        E: Into<BoxError>,
        F: Fn(D) -> Result<T, E> + Send + Sync + 'static,
    {
        self.with(ConstructorDescriptor::fallible(factory).injection_point())
    }

    /// Appends an already-built constructor descriptor.
    pub fn with(mut self, constructor: ConstructorDescriptor) -> Self {
        self.descriptor = self.descriptor.with_constructor(constructor);
        self
    }

    /// Stores the component in the catalog.
    pub fn register(self) -> &'a mut ComponentCatalog {
        self.catalog.insert(self.descriptor)
    }
}
