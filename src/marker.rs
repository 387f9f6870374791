//! Stereotype markers attached to catalogued components.

use std::fmt;

/// Marker metadata carried by a component type.
///
/// Markers are the Rust stand-in for stereotype annotations: a component is
/// tagged with any number of them at registration time, and the
/// [`ComponentScanner`](crate::ComponentScanner) selects candidates by marker.
/// Custom markers are plain string constants.
///
/// ```rust
/// use bean_factory::Marker;
///
/// const HANDLER: Marker = Marker::new("handler");
/// assert_eq!(HANDLER.name(), "handler");
/// assert_ne!(HANDLER, Marker::SERVICE);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Marker(&'static str);

impl Marker {
    /// Generic managed component.
    pub const COMPONENT: Marker = Marker("component");
    /// Business service.
    pub const SERVICE: Marker = Marker("service");
    /// Entry-point controller.
    pub const CONTROLLER: Marker = Marker("controller");
    /// Data access component.
    pub const REPOSITORY: Marker = Marker("repository");

    /// Creates a custom marker.
    pub const fn new(name: &'static str) -> Self {
        Marker(name)
    }

    /// The marker's name.
    pub const fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}
