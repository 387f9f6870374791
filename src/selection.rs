//! Constructor-selection policy.

use std::fmt;
use std::str::FromStr;

use crate::constructor::ConstructorDescriptor;
use crate::error::{BeanError, BeanResult};
use crate::key::TypeKey;

/// How a constructor is chosen for a component.
///
/// A single constructor marked as the injection point always wins. The policy
/// only decides what happens when none is marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "kebab-case"))]
pub enum ConstructorPolicy {
    /// Fall back to the first constructor in declaration order.
    #[default]
    FirstDeclared,
    /// Every component must mark its constructor; unmarked types fail.
    RequireInjectionPoint,
}

impl ConstructorPolicy {
    /// Stable textual name, as accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstructorPolicy::FirstDeclared => "first-declared",
            ConstructorPolicy::RequireInjectionPoint => "require-injection-point",
        }
    }
}

impl fmt::Display for ConstructorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConstructorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "first-declared" => Ok(ConstructorPolicy::FirstDeclared),
            "require-injection-point" => Ok(ConstructorPolicy::RequireInjectionPoint),
            other => Err(format!("unknown constructor policy: {}", other)),
        }
    }
}

/// Picks the constructor used to build `key`.
///
/// # Examples
///
/// ```rust
/// use bean_factory::{select_constructor, ConstructorDescriptor, ConstructorPolicy, TypeKey};
///
/// struct Clock(u64);
///
/// let ctors = vec![
///     ConstructorDescriptor::new(|()| Clock(0)),
///     ConstructorDescriptor::new(|()| Clock(1)).injection_point(),
/// ];
/// let key = TypeKey::of::<Clock>();
///
/// let chosen = select_constructor(&key, &ctors, ConstructorPolicy::FirstDeclared).unwrap();
/// assert!(chosen.is_injection_point());
/// ```
pub fn select_constructor<'a>(
    key: &TypeKey,
    constructors: &'a [ConstructorDescriptor],
    policy: ConstructorPolicy,
) -> BeanResult<&'a ConstructorDescriptor> {
    let mut marked = constructors.iter().filter(|c| c.is_injection_point());
    match (marked.next(), marked.next()) {
        (Some(only), None) => return Ok(only),
        (Some(_), Some(_)) => {
            return Err(BeanError::AmbiguousConstructor {
                component: key.name(),
                count: constructors.iter().filter(|c| c.is_injection_point()).count(),
            });
        }
        _ => {}
    }

    match policy {
        ConstructorPolicy::FirstDeclared => constructors
            .first()
            .ok_or(BeanError::NoConstructor(key.name())),
        ConstructorPolicy::RequireInjectionPoint => Err(BeanError::NoConstructor(key.name())),
    }
}
