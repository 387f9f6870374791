//! Marker-metadata query capability.

use crate::constructor::ConstructorDescriptor;
use crate::descriptors::ComponentDescriptor;
use crate::key::TypeKey;
use crate::marker::Marker;

/// Read-only view over component metadata.
///
/// This is the only way the resolver learns about constructors and markers:
/// it never inspects how the metadata was produced. [`ComponentCatalog`](crate::ComponentCatalog)
/// is the provided implementation; generated tables can implement the trait
/// directly by supplying [`descriptor`](Self::descriptor) and
/// [`component_keys`](Self::component_keys).
///
/// The trait is object-safe so the factory can hold any implementation as
/// `Arc<dyn ComponentMetadata + Send + Sync>`.
pub trait ComponentMetadata {
    /// Descriptor for `key`, if the type is catalogued.
    fn descriptor(&self, key: &TypeKey) -> Option<&ComponentDescriptor>;

    /// Every catalogued type, in declaration order.
    fn component_keys(&self) -> Vec<TypeKey>;

    /// Whether `key` is catalogued and carries `marker`.
    fn has_marker(&self, key: &TypeKey, marker: Marker) -> bool {
        self.descriptor(key).is_some_and(|d| d.has_marker(marker))
    }

    /// Constructors declared for `key`, in declaration order.
    fn constructors(&self, key: &TypeKey) -> Option<&[ConstructorDescriptor]> {
        self.descriptor(key).map(|d| d.constructors())
    }

    /// Constructors of `key` marked as injection points.
    fn injection_points(&self, key: &TypeKey) -> Vec<&ConstructorDescriptor> {
        self.constructors(key)
            .map(|ctors| ctors.iter().filter(|c| c.is_injection_point()).collect())
            .unwrap_or_default()
    }

    /// Catalogued types carrying `marker`, in declaration order.
    fn types_marked_with(&self, marker: Marker) -> Vec<TypeKey> {
        self.component_keys()
            .into_iter()
            .filter(|key| self.has_marker(key, marker))
            .collect()
    }
}
