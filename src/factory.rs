//! The component registry.
//!
//! [`BeanFactory`] owns one instance per component type. It is populated by a
//! single [`initialize`](BeanFactory::initialize) pass and is lookup-only
//! afterwards.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::constructor::AnyArc;
use crate::error::{BeanResult, InitializationError};
use crate::graph::{DependencyGraph, NodeOrigin};
use crate::key::TypeKey;
use crate::observer::{Observers, ResolutionObserver};
use crate::options::FactoryOptions;
use crate::resolver::Resolver;
use crate::scanner::CandidateSet;
use crate::traits::ComponentMetadata;
use crate::validation::ResolutionPlan;

#[cfg(feature = "ahash")]
pub(crate) type BeanMap = HashMap<TypeKey, AnyArc, ahash::RandomState>;
#[cfg(not(feature = "ahash"))]
pub(crate) type BeanMap = HashMap<TypeKey, AnyArc>;

/// Singleton registry built from a component catalog.
///
/// `initialize` takes `&mut self`, so a pass always has exclusive access to
/// the registry map. Once it returns, the factory is `Send + Sync` and every
/// lookup goes through `&self`.
///
/// # Examples
///
/// ```
/// use bean_factory::{BeanFactory, ComponentCatalog, Marker, TypeKey};
/// use std::sync::Arc;
///
/// struct UserService;
/// struct UserController { service: Arc<UserService> }
///
/// let mut catalog = ComponentCatalog::new();
/// catalog.component::<UserService>().marked(Marker::SERVICE).constructor(|()| UserService).register();
/// catalog.component::<UserController>()
///     .marked(Marker::CONTROLLER)
///     .injected_constructor(|(service,): (Arc<UserService>,)| UserController { service })
///     .register();
///
/// let mut factory = BeanFactory::new(catalog);
/// factory.initialize([TypeKey::of::<UserController>()]).unwrap();
///
/// let controller = factory.get::<UserController>().unwrap();
/// let service = factory.get::<UserService>().unwrap();
/// assert!(Arc::ptr_eq(&controller.service, &service));
/// ```
pub struct BeanFactory {
    metadata: Arc<dyn ComponentMetadata + Send + Sync>,
    beans: BeanMap,
    options: FactoryOptions,
    observers: Observers,
    graph: DependencyGraph,
}

impl BeanFactory {
    /// Creates an empty factory over `metadata` with default options.
    pub fn new<M>(metadata: M) -> Self
    where
        M: ComponentMetadata + Send + Sync + 'static,
    {
        Self::builder(metadata).build()
    }

    /// Starts configuring a factory over `metadata`.
    pub fn builder<M>(metadata: M) -> BeanFactoryBuilder
    where
        M: ComponentMetadata + Send + Sync + 'static,
    {
        BeanFactoryBuilder::new(Arc::new(metadata))
    }

    /// Makes sure every candidate has an instance.
    ///
    /// Candidates already present (pre-supplied, or built earlier as another
    /// candidate's dependency) are skipped. The first failure aborts the pass;
    /// the registry is then partially populated and must not be relied upon.
    pub fn initialize<I>(&mut self, candidates: I) -> Result<(), InitializationError>
    where
        I: IntoIterator<Item = TypeKey>,
    {
        let candidates: CandidateSet = candidates.into_iter().collect();
        let span = tracing::info_span!("bean_factory.initialize", candidates = candidates.len());
        let _entered = span.enter();

        let metadata = Arc::clone(&self.metadata);
        let graph = if self.options.record_graph {
            Some(&mut self.graph)
        } else {
            None
        };
        let mut resolver = Resolver::new(
            metadata.as_ref(),
            &mut self.beans,
            graph,
            &self.observers,
            &self.options,
            &candidates,
        );

        for key in &candidates {
            if resolver.is_resolved(key) {
                tracing::debug!(candidate = key.name(), "already resolved");
                continue;
            }
            tracing::debug!(candidate = key.name(), "initializing candidate");
            if let Err(err) = resolver.resolve(key) {
                tracing::warn!(candidate = key.name(), error = %err, "initialization failed");
                return Err(InitializationError::new(key.name(), err));
            }
        }

        tracing::info!(beans = self.beans.len(), "bean factory initialized");
        Ok(())
    }

    /// Instance of `T`, if one was resolved. Never instantiates.
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.get_any(&TypeKey::of::<T>())?.downcast::<T>().ok()
    }

    /// Type-erased instance for `key`, if one was resolved.
    pub fn get_any(&self, key: &TypeKey) -> Option<AnyArc> {
        self.beans.get(key).cloned()
    }

    /// Whether an instance of `T` is stored.
    pub fn contains<T: 'static>(&self) -> bool {
        self.contains_key(&TypeKey::of::<T>())
    }

    /// Whether an instance is stored under `key`.
    pub fn contains_key(&self, key: &TypeKey) -> bool {
        self.beans.contains_key(key)
    }

    /// Number of stored instances, including pre-supplied ones.
    pub fn len(&self) -> usize {
        self.beans.len()
    }

    /// Whether nothing has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.beans.is_empty()
    }

    /// Keys of every stored instance, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &TypeKey> {
        self.beans.keys()
    }

    /// Options this factory was built with.
    pub fn options(&self) -> &FactoryOptions {
        &self.options
    }

    /// The metadata the factory resolves against.
    pub fn metadata(&self) -> &dyn ComponentMetadata {
        self.metadata.as_ref()
    }

    /// Components built so far and their constructor edges. Empty when
    /// `record_graph` is off.
    pub fn dependency_graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Plans `candidates` against the current registry without building
    /// anything.
    pub fn validate<I>(&self, candidates: I) -> BeanResult<ResolutionPlan>
    where
        I: IntoIterator<Item = TypeKey>,
    {
        let candidates: CandidateSet = candidates.into_iter().collect();
        ResolutionPlan::build(
            self.metadata.as_ref(),
            &candidates,
            |key| self.beans.contains_key(key),
            &self.options,
        )
    }
}

impl fmt::Debug for BeanFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&'static str> = self.beans.keys().map(|k| k.name()).collect();
        names.sort_unstable();
        f.debug_struct("BeanFactory")
            .field("beans", &names)
            .field("options", &self.options)
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Configures a [`BeanFactory`] before its first initialization pass.
///
/// ```
/// use bean_factory::{BeanFactory, ComponentCatalog, FactoryOptions, TypeKey};
/// use std::sync::Arc;
///
/// struct DatabaseUrl(String);
/// struct Pool { url: Arc<DatabaseUrl> }
///
/// let mut catalog = ComponentCatalog::new();
/// catalog.component::<Pool>()
///     .injected_constructor(|(url,): (Arc<DatabaseUrl>,)| Pool { url })
///     .register();
///
/// let factory = BeanFactory::builder(catalog)
///     .options(FactoryOptions::default().with_max_depth(32))
///     .instance(DatabaseUrl("postgres://localhost".to_string()))
///     .initialize([TypeKey::of::<Pool>()])
///     .unwrap();
///
/// assert_eq!(factory.get::<Pool>().unwrap().url.0, "postgres://localhost");
/// ```
pub struct BeanFactoryBuilder {
    metadata: Arc<dyn ComponentMetadata + Send + Sync>,
    options: FactoryOptions,
    observers: Observers,
    instances: Vec<(TypeKey, AnyArc)>,
}

impl BeanFactoryBuilder {
    /// Starts from metadata that is already shared.
    pub fn new(metadata: Arc<dyn ComponentMetadata + Send + Sync>) -> Self {
        Self {
            metadata,
            options: FactoryOptions::default(),
            observers: Observers::new(),
            instances: Vec::new(),
        }
    }

    pub fn options(mut self, options: FactoryOptions) -> Self {
        self.options = options;
        self
    }

    pub fn observer(mut self, observer: Arc<dyn ResolutionObserver>) -> Self {
        self.observers.add(observer);
        self
    }

    /// Supplies a ready-made value for `T`.
    ///
    /// Pre-supplied values satisfy constructor parameters of type `T` even
    /// when `T` is not catalogued. Supplying `T` twice keeps the last value.
    pub fn instance<T: Send + Sync + 'static>(self, value: T) -> Self {
        self.instance_arc(Arc::new(value))
    }

    /// Supplies an already shared value for `T`.
    pub fn instance_arc<T: Send + Sync + 'static>(mut self, value: Arc<T>) -> Self {
        let key = TypeKey::of::<T>();
        self.instances.retain(|(k, _)| *k != key);
        self.instances.push((key, value as AnyArc));
        self
    }

    /// Builds an uninitialized factory holding only the supplied values.
    pub fn build(self) -> BeanFactory {
        let mut beans = BeanMap::default();
        let mut graph = DependencyGraph::new();
        for (key, instance) in self.instances {
            if self.options.record_graph {
                graph.add_node(&key, NodeOrigin::External);
            }
            beans.insert(key, instance);
        }
        BeanFactory {
            metadata: self.metadata,
            beans,
            options: self.options,
            observers: self.observers,
            graph,
        }
    }

    /// Builds the factory and runs its initialization pass.
    pub fn initialize<I>(self, candidates: I) -> Result<BeanFactory, InitializationError>
    where
        I: IntoIterator<Item = TypeKey>,
    {
        let mut factory = self.build();
        factory.initialize(candidates)?;
        Ok(factory)
    }
}
