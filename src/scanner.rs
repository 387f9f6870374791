//! Candidate discovery by stereotype marker.

use std::collections::HashSet;

use crate::key::TypeKey;
use crate::marker::Marker;
use crate::traits::ComponentMetadata;

/// Set of types handed to [`BeanFactory::initialize`](crate::BeanFactory::initialize).
///
/// Each key is kept once. Iteration follows insertion order so that a given
/// input always drives the same sequence of recursive resolutions; the
/// resulting registry does not depend on that order.
///
/// ```rust
/// use bean_factory::{CandidateSet, TypeKey};
///
/// struct Controller;
/// struct Service;
///
/// let set = CandidateSet::new().with::<Controller>().with::<Service>().with::<Controller>();
/// assert_eq!(set.len(), 2);
/// assert!(set.contains(&TypeKey::of::<Service>()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    keys: Vec<TypeKey>,
    seen: HashSet<TypeKey>,
}

impl CandidateSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `T`, builder style.
    pub fn with<T: 'static>(mut self) -> Self {
        self.insert(TypeKey::of::<T>());
        self
    }

    /// Adds `key`; returns `false` if it was already present.
    pub fn insert(&mut self, key: TypeKey) -> bool {
        if self.seen.insert(key) {
            self.keys.push(key);
            true
        } else {
            false
        }
    }

    /// Whether `key` is in the set.
    pub fn contains(&self, key: &TypeKey) -> bool {
        self.seen.contains(key)
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Candidates in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, TypeKey> {
        self.keys.iter()
    }
}

impl FromIterator<TypeKey> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = TypeKey>>(iter: I) -> Self {
        let mut set = CandidateSet::new();
        set.extend(iter);
        set
    }
}

impl Extend<TypeKey> for CandidateSet {
    fn extend<I: IntoIterator<Item = TypeKey>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl IntoIterator for CandidateSet {
    type Item = TypeKey;
    type IntoIter = std::vec::IntoIter<TypeKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.into_iter()
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a TypeKey;
    type IntoIter = std::slice::Iter<'a, TypeKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

/// Collects the catalogued types carrying any of a set of markers.
///
/// # Examples
///
/// ```rust
/// use bean_factory::{ComponentCatalog, ComponentScanner, Marker, TypeKey};
/// use std::sync::Arc;
///
/// struct UserService;
/// struct UserController { service: Arc<UserService> }
/// struct Helper;
///
/// let mut catalog = ComponentCatalog::new();
/// catalog.component::<UserService>().marked(Marker::SERVICE).constructor(|()| UserService).register();
/// catalog.component::<UserController>()
///     .marked(Marker::CONTROLLER)
///     .injected_constructor(|(service,): (Arc<UserService>,)| UserController { service })
///     .register();
/// catalog.component::<Helper>().constructor(|()| Helper).register();
///
/// let candidates = ComponentScanner::new(&catalog)
///     .with_marker(Marker::CONTROLLER)
///     .with_marker(Marker::SERVICE)
///     .scan();
///
/// assert_eq!(candidates.len(), 2);
/// assert!(!candidates.contains(&TypeKey::of::<Helper>()));
/// ```
pub struct ComponentScanner<'a> {
    metadata: &'a dyn ComponentMetadata,
    markers: Vec<Marker>,
}

impl<'a> ComponentScanner<'a> {
    /// Creates a scanner over `metadata` with no markers selected.
    pub fn new(metadata: &'a dyn ComponentMetadata) -> Self {
        Self {
            metadata,
            markers: Vec::new(),
        }
    }

    /// Adds a marker to match.
    pub fn with_marker(mut self, marker: Marker) -> Self {
        if !self.markers.contains(&marker) {
            self.markers.push(marker);
        }
        self
    }

    /// Adds several markers to match.
    pub fn with_markers(mut self, markers: impl IntoIterator<Item = Marker>) -> Self {
        for marker in markers {
            self = self.with_marker(marker);
        }
        self
    }

    /// Types carrying at least one selected marker, in catalog declaration
    /// order. An empty marker selection yields an empty set.
    pub fn scan(&self) -> CandidateSet {
        let set: CandidateSet = self
            .metadata
            .component_keys()
            .into_iter()
            .filter(|key| self.markers.iter().any(|&m| self.metadata.has_marker(key, m)))
            .collect();
        tracing::debug!(
            markers = ?self.markers,
            candidates = set.len(),
            "component scan complete"
        );
        set
    }
}
