//! Dry-run resolution planning.
//!
//! Walks the same dependency graph the resolver would, using only catalog
//! metadata, and reports the instantiation order or the first error. No
//! constructor is invoked, so a plan can be computed before any side effect
//! happens.

use std::collections::HashSet;

use crate::error::{BeanError, BeanResult};
use crate::key::TypeKey;
use crate::options::FactoryOptions;
use crate::resolver::check_enter;
use crate::scanner::CandidateSet;
use crate::selection::select_constructor;
use crate::traits::ComponentMetadata;

/// Order in which an initialization pass would build its components.
///
/// # Examples
///
/// ```rust
/// use bean_factory::{CandidateSet, ComponentCatalog, FactoryOptions, ResolutionPlan, TypeKey};
/// use std::sync::Arc;
///
/// struct Config;
/// struct Repo { config: Arc<Config> }
/// struct Service { repo: Arc<Repo>, config: Arc<Config> }
///
/// let mut catalog = ComponentCatalog::new();
/// catalog.component::<Config>().constructor(|()| Config).register();
/// catalog.component::<Repo>()
///     .constructor(|(config,): (Arc<Config>,)| Repo { config })
///     .register();
/// catalog.component::<Service>()
///     .injected_constructor(|(repo, config): (Arc<Repo>, Arc<Config>)| Service { repo, config })
///     .register();
///
/// let candidates = CandidateSet::new().with::<Service>();
/// let plan = ResolutionPlan::build(&catalog, &candidates, |_| false, &FactoryOptions::default()).unwrap();
///
/// assert_eq!(plan.order(), &[TypeKey::of::<Config>(), TypeKey::of::<Repo>(), TypeKey::of::<Service>()]);
/// assert_eq!(plan.transitive(), vec![TypeKey::of::<Config>(), TypeKey::of::<Repo>()]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResolutionPlan {
    order: Vec<TypeKey>,
    candidates: CandidateSet,
}

impl ResolutionPlan {
    /// Plans the construction of `candidates`.
    ///
    /// `preresolved` reports types that already have an instance; they are
    /// treated as leaves and left out of the order.
    pub fn build<P>(
        metadata: &dyn ComponentMetadata,
        candidates: &CandidateSet,
        preresolved: P,
        options: &FactoryOptions,
    ) -> BeanResult<Self>
    where
        P: Fn(&TypeKey) -> bool,
    {
        let mut planner = Planner {
            metadata,
            preresolved: &preresolved,
            options,
            visited: HashSet::new(),
            stack: Vec::new(),
            order: Vec::new(),
        };
        for key in candidates {
            planner.visit(key)?;
        }
        Ok(Self {
            order: planner.order,
            candidates: candidates.clone(),
        })
    }

    /// Components to build, dependencies before dependents.
    pub fn order(&self) -> &[TypeKey] {
        &self.order
    }

    /// Planned components that are not in the candidate set.
    pub fn transitive(&self) -> Vec<TypeKey> {
        self.order
            .iter()
            .filter(|key| !self.candidates.contains(key))
            .copied()
            .collect()
    }

    pub fn contains(&self, key: &TypeKey) -> bool {
        self.order.contains(key)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

struct Planner<'a> {
    metadata: &'a dyn ComponentMetadata,
    preresolved: &'a dyn Fn(&TypeKey) -> bool,
    options: &'a FactoryOptions,
    visited: HashSet<TypeKey>,
    stack: Vec<TypeKey>,
    order: Vec<TypeKey>,
}

impl Planner<'_> {
    fn is_done(&self, key: &TypeKey) -> bool {
        self.visited.contains(key) || (self.preresolved)(key)
    }

    fn visit(&mut self, key: &TypeKey) -> BeanResult<()> {
        if self.is_done(key) {
            return Ok(());
        }
        check_enter(&self.stack, key, self.options.max_depth)?;

        let metadata = self.metadata;
        let constructors = metadata
            .constructors(key)
            .ok_or(BeanError::NoConstructor(key.name()))?;
        let ctor = select_constructor(key, constructors, self.options.constructor_policy)?;
        if !ctor.produces(key) {
            return Err(BeanError::TypeMismatch(key.name()));
        }

        self.stack.push(*key);
        for (position, param) in ctor.params().iter().enumerate() {
            if self.is_done(param) {
                continue;
            }
            if metadata.descriptor(param).is_none() {
                return Err(BeanError::UnresolvableParameter {
                    component: key.name(),
                    parameter: param.name(),
                    position,
                });
            }
            self.visit(param)?;
        }
        self.stack.pop();

        self.visited.insert(*key);
        self.order.push(*key);
        Ok(())
    }
}
