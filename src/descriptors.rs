//! Component descriptors for catalog entries and introspection.

use crate::constructor::ConstructorDescriptor;
use crate::key::TypeKey;
use crate::marker::Marker;

/// Everything the catalog knows about one component type.
///
/// Holds the type's markers and its constructors in declaration order. The
/// declaration order is what the [`FirstDeclared`](crate::ConstructorPolicy::FirstDeclared)
/// fallback relies on.
///
/// # Examples
///
/// ```rust
/// use bean_factory::{ComponentCatalog, Marker};
///
/// struct Database;
///
/// let mut catalog = ComponentCatalog::new();
/// catalog.component::<Database>()
///     .marked(Marker::REPOSITORY)
///     .constructor(|()| Database)
///     .register();
///
/// let descriptors = catalog.descriptors();
/// let db = descriptors.iter()
///     .find(|d| d.type_name().contains("Database"))
///     .unwrap();
/// assert!(db.has_marker(Marker::REPOSITORY));
/// assert_eq!(db.constructors().len(), 1);
/// assert!(db.injection_point().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct ComponentDescriptor {
    key: TypeKey,
    markers: Vec<Marker>,
    constructors: Vec<ConstructorDescriptor>,
}

impl ComponentDescriptor {
    /// Creates an empty descriptor for `key`.
    pub fn new(key: TypeKey) -> Self {
        Self {
            key,
            markers: Vec::new(),
            constructors: Vec::new(),
        }
    }

    /// Adds a marker; duplicates are ignored.
    pub fn with_marker(mut self, marker: Marker) -> Self {
        if !self.markers.contains(&marker) {
            self.markers.push(marker);
        }
        self
    }

    /// Appends a constructor after the ones already declared.
    pub fn with_constructor(mut self, constructor: ConstructorDescriptor) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// The component's type key.
    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    /// Get the type name
    pub fn type_name(&self) -> &'static str {
        self.key.name()
    }

    /// Markers in the order they were added.
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Check if the component carries `marker`
    pub fn has_marker(&self, marker: Marker) -> bool {
        self.markers.contains(&marker)
    }

    /// Constructors in declaration order.
    pub fn constructors(&self) -> &[ConstructorDescriptor] {
        &self.constructors
    }

    /// The constructor marked as injection point, if exactly one is.
    pub fn injection_point(&self) -> Option<&ConstructorDescriptor> {
        let mut marked = self.constructors.iter().filter(|c| c.is_injection_point());
        match (marked.next(), marked.next()) {
            (Some(only), None) => Some(only),
            _ => None,
        }
    }
}
