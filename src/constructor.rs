//! Constructor descriptors and typed dependency lists.
//!
//! A [`ConstructorDescriptor`] is the data record that replaces runtime
//! reflection: an ordered list of parameter type keys plus a factory closure
//! that turns resolved instances (in the same order) into a new component.
//! The typed helpers derive the parameter list from the closure's argument
//! type, so the table can never disagree with the downcasts performed at call
//! time.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::error::{BeanError, BeanResult, BoxError};
use crate::key::TypeKey;

/// Type-erased, shared component instance.
pub type AnyArc = Arc<dyn Any + Send + Sync>;

pub(crate) type FactoryFn = Arc<dyn Fn(&[AnyArc]) -> BeanResult<AnyArc> + Send + Sync>;

/// Ordered list of constructor dependencies.
///
/// Implemented for `()` and for tuples of `Arc<D>` up to eight elements. The
/// tuple's element order is the constructor's parameter order.
///
/// ```rust
/// use bean_factory::{Dependencies, TypeKey};
/// use std::sync::Arc;
///
/// struct Repo;
/// struct Clock;
///
/// let keys = <(Arc<Repo>, Arc<Clock>)>::keys();
/// assert_eq!(keys, vec![TypeKey::of::<Repo>(), TypeKey::of::<Clock>()]);
/// assert!(<()>::keys().is_empty());
/// ```
pub trait Dependencies: Sized + 'static {
    /// Parameter type keys, in declaration order.
    fn keys() -> Vec<TypeKey>;

    /// Rebuilds the typed tuple from resolved instances.
    fn from_args(args: &[AnyArc]) -> BeanResult<Self>;
}

impl Dependencies for () {
    fn keys() -> Vec<TypeKey> {
        Vec::new()
    }

    fn from_args(_args: &[AnyArc]) -> BeanResult<Self> {
        Ok(())
    }
}

fn downcast_arg<T: Send + Sync + 'static>(args: &[AnyArc], index: usize) -> BeanResult<Arc<T>> {
    let arg = args
        .get(index)
        .cloned()
        .ok_or(BeanError::TypeMismatch(std::any::type_name::<T>()))?;
    arg.downcast::<T>()
        .map_err(|_| BeanError::TypeMismatch(std::any::type_name::<T>()))
}

macro_rules! impl_dependencies {
    ($($dep:ident => $idx:tt),+) => {
        impl<$($dep),+> Dependencies for ($(Arc<$dep>,)+)
        where
            $($dep: Send + Sync + 'static),+
        {
            fn keys() -> Vec<TypeKey> {
                vec![$(TypeKey::of::<$dep>()),+]
            }

            fn from_args(args: &[AnyArc]) -> BeanResult<Self> {
                Ok(($(downcast_arg::<$dep>(args, $idx)?,)+))
            }
        }
    };
}

impl_dependencies!(A => 0);
impl_dependencies!(A => 0, B => 1);
impl_dependencies!(A => 0, B => 1, C => 2);
impl_dependencies!(A => 0, B => 1, C => 2, D => 3);
impl_dependencies!(A => 0, B => 1, C => 2, D => 3, E => 4);
impl_dependencies!(A => 0, B => 1, C => 2, D => 3, E => 4, F => 5);
impl_dependencies!(A => 0, B => 1, C => 2, D => 3, E => 4, F => 5, G => 6);
impl_dependencies!(A => 0, B => 1, C => 2, D => 3, E => 4, F => 5, G => 6, H => 7);

/// One way of building a component: parameter types plus a factory.
#[derive(Clone)]
pub struct ConstructorDescriptor {
    params: Vec<TypeKey>,
    injection_point: bool,
    output: Option<TypeId>,
    factory: FactoryFn,
}

impl ConstructorDescriptor {
    /// Describes an infallible constructor producing `T` from `D`.
    ///
    /// ```rust
    /// use bean_factory::{ConstructorDescriptor, TypeKey};
    /// use std::sync::Arc;
    ///
    /// struct Repo;
    /// struct Service { repo: Arc<Repo> }
    ///
    /// let ctor = ConstructorDescriptor::new(|(repo,): (Arc<Repo>,)| Service { repo });
    /// assert_eq!(ctor.params(), &[TypeKey::of::<Repo>()]);
    /// assert!(!ctor.is_injection_point());
    /// ```
    pub fn new<T, D, F>(factory: F) -> Self
    where
        T: Send + Sync + 'static,
        D: Dependencies,
        F: Fn(D) -> T + Send + Sync + 'static,
    {
        Self::from_raw(D::keys(), move |args| {
            let deps = D::from_args(args)?;
            Ok(Arc::new(factory(deps)) as AnyArc)
        })
        .producing::<T>()
    }

    /// Describes a constructor that may fail.
    ///
    /// An `Err` returned by the closure surfaces as
    /// [`BeanError::Instantiation`] for `T`.
    pub fn fallible<T, D, E, F>(factory: F) -> Self
    where
        T: Send + Sync + 'static,
        D: Dependencies,
        E: Into<BoxError>,
        F: Fn(D) -> Result<T, E> + Send + Sync + 'static,
    {
        Self::from_raw(D::keys(), move |args| {
            let deps = D::from_args(args)?;
            factory(deps)
                .map(|value| Arc::new(value) as AnyArc)
                .map_err(|e| BeanError::instantiation(std::any::type_name::<T>(), e))
        })
        .producing::<T>()
    }

    /// Describes a constructor from an explicit parameter list and an untyped
    /// factory. Intended for generated tables; the factory receives exactly
    /// `params.len()` instances in parameter order. The output type is not
    /// known, so the resolver cannot check it against the component's key.
    pub fn from_raw<F>(params: Vec<TypeKey>, factory: F) -> Self
    where
        F: Fn(&[AnyArc]) -> BeanResult<AnyArc> + Send + Sync + 'static,
    {
        Self {
            params,
            injection_point: false,
            output: None,
            factory: Arc::new(factory),
        }
    }

    fn producing<T: 'static>(mut self) -> Self {
        self.output = Some(TypeId::of::<T>());
        self
    }

    /// Marks this constructor as the designated injection point.
    pub fn injection_point(mut self) -> Self {
        self.injection_point = true;
        self
    }

    /// Whether this constructor is the designated injection point.
    pub fn is_injection_point(&self) -> bool {
        self.injection_point
    }

    /// Parameter types, in declaration order.
    pub fn params(&self) -> &[TypeKey] {
        &self.params
    }

    /// Type the factory produces, when built from a typed closure.
    pub fn output(&self) -> Option<TypeId> {
        self.output
    }

    /// Whether this constructor can build a component stored under `key`.
    /// Raw constructors are trusted.
    pub fn produces(&self, key: &TypeKey) -> bool {
        self.output.map_or(true, |id| id == key.id())
    }

    /// Number of parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub(crate) fn invoke(&self, args: &[AnyArc]) -> BeanResult<AnyArc> {
        (self.factory)(args)
    }
}

impl fmt::Debug for ConstructorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDescriptor")
            .field("params", &self.params)
            .field("injection_point", &self.injection_point)
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}
