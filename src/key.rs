//! Type descriptors used as registry keys.

use std::any::TypeId;
use std::fmt;

/// Key identifying one component type.
///
/// A `TypeKey` pairs the `TypeId` of a concrete type with its
/// `std::any::type_name` for diagnostics. Only the `TypeId` takes part in
/// equality, hashing and ordering, so two keys built for the same type are
/// always interchangeable.
///
/// # Examples
///
/// ```rust
/// use bean_factory::{TypeKey, key_of_type};
///
/// struct UserService;
///
/// let a = TypeKey::of::<UserService>();
/// let b = key_of_type::<UserService>();
/// assert_eq!(a, b);
/// assert!(a.name().ends_with("UserService"));
/// assert_eq!(a.short_name(), "UserService");
/// ```
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Builds the key for `T`.
    #[inline(always)]
    pub fn of<T: 'static + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Key for `T` reported under another name, for exercising name
    /// collisions.
    #[cfg(test)]
    pub(crate) fn renamed<T: 'static + ?Sized>(name: &'static str) -> Self {
        Self {
            id: TypeId::of::<T>(),
            name,
        }
    }

    /// The `TypeId` backing this key.
    #[inline(always)]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Full type name as reported by `std::any::type_name`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name with the module path stripped.
    ///
    /// Generic arguments are left untouched, so `alloc::vec::Vec<u8>` becomes
    /// `Vec<u8>`.
    pub fn short_name(&self) -> &'static str {
        let head = match self.name.find('<') {
            Some(idx) => &self.name[..idx],
            None => self.name,
        };
        match head.rfind("::") {
            Some(idx) => &self.name[idx + 2..],
            None => self.name,
        }
    }
}

// TypeId-only comparison; the name is diagnostic
impl PartialEq for TypeKey {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl PartialOrd for TypeKey {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeKey {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl std::hash::Hash for TypeKey {
    #[inline(always)]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeKey").field(&self.name).finish()
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Helper for creating type keys.
#[inline(always)]
pub fn key_of_type<T: 'static + ?Sized>() -> TypeKey {
    TypeKey::of::<T>()
}
