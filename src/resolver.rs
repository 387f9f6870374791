//! Recursive resolver/instantiator.
//!
//! For a requested type the resolver returns the memoized instance if one
//! exists; otherwise it selects a constructor, resolves every parameter in
//! declaration order (recursing into types outside the candidate set when
//! needed), invokes the constructor and stores the result before returning.
//! A per-pass stack of types currently being resolved turns dependency cycles
//! into [`BeanError::CircularDependency`] instead of unbounded recursion.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use crate::constructor::{AnyArc, ConstructorDescriptor};
use crate::error::{BeanError, BeanResult, ConstructorPanic};
use crate::factory::BeanMap;
use crate::graph::{DependencyGraph, NodeOrigin};
use crate::key::TypeKey;
use crate::observer::Observers;
use crate::options::FactoryOptions;
use crate::scanner::CandidateSet;
use crate::selection::select_constructor;
use crate::traits::ComponentMetadata;

/// Fails if `key` is already being resolved or the chain is too deep.
///
/// The reported path is the whole chain from the outermost request down to
/// the repeated type.
pub(crate) fn check_enter(stack: &[TypeKey], key: &TypeKey, max_depth: usize) -> BeanResult<()> {
    if stack.contains(key) {
        let mut path: Vec<&'static str> = stack.iter().map(|k| k.name()).collect();
        path.push(key.name());
        return Err(BeanError::CircularDependency(path));
    }
    if stack.len() >= max_depth {
        return Err(BeanError::DepthExceeded(stack.len()));
    }
    Ok(())
}

/// One initialization pass over a registry map.
pub(crate) struct Resolver<'a> {
    metadata: &'a dyn ComponentMetadata,
    beans: &'a mut BeanMap,
    graph: Option<&'a mut DependencyGraph>,
    observers: &'a Observers,
    options: &'a FactoryOptions,
    candidates: &'a CandidateSet,
    stack: Vec<TypeKey>,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(
        metadata: &'a dyn ComponentMetadata,
        beans: &'a mut BeanMap,
        graph: Option<&'a mut DependencyGraph>,
        observers: &'a Observers,
        options: &'a FactoryOptions,
        candidates: &'a CandidateSet,
    ) -> Self {
        Self {
            metadata,
            beans,
            graph,
            observers,
            options,
            candidates,
            stack: Vec::new(),
        }
    }

    #[inline]
    pub(crate) fn is_resolved(&self, key: &TypeKey) -> bool {
        self.beans.contains_key(key)
    }

    /// Returns the instance for `key`, building it and its dependencies if
    /// needed.
    pub(crate) fn resolve(&mut self, key: &TypeKey) -> BeanResult<AnyArc> {
        if let Some(existing) = self.beans.get(key) {
            return Ok(existing.clone());
        }

        check_enter(&self.stack, key, self.options.max_depth)?;
        self.stack.push(*key);

        let started = Instant::now();
        if self.observers.has_observers() {
            self.observers.resolving(key);
        }

        let built = self.build(key);
        self.stack.pop();

        match built {
            Ok(instance) => {
                self.beans.insert(*key, instance.clone());
                if self.observers.has_observers() {
                    self.observers.resolved(key, started.elapsed());
                }
                Ok(instance)
            }
            Err(err) => {
                if self.observers.has_observers() {
                    self.observers.failed(key, &err);
                }
                Err(err)
            }
        }
    }

    fn build(&mut self, key: &TypeKey) -> BeanResult<AnyArc> {
        let metadata = self.metadata;
        let constructors = metadata
            .constructors(key)
            .ok_or(BeanError::NoConstructor(key.name()))?;
        let ctor = select_constructor(key, constructors, self.options.constructor_policy)?;
        if !ctor.produces(key) {
            return Err(BeanError::TypeMismatch(key.name()));
        }

        let mut args: Vec<AnyArc> = Vec::with_capacity(ctor.arity());
        for (position, param) in ctor.params().iter().enumerate() {
            args.push(self.resolve_parameter(key, param, position)?);
        }

        let instance = self.instantiate(key, ctor, &args)?;
        self.record(key, ctor);
        Ok(instance)
    }

    fn resolve_parameter(&mut self, owner: &TypeKey, param: &TypeKey, position: usize) -> BeanResult<AnyArc> {
        if let Some(existing) = self.beans.get(param) {
            return Ok(existing.clone());
        }
        if self.metadata.descriptor(param).is_none() {
            return Err(BeanError::UnresolvableParameter {
                component: owner.name(),
                parameter: param.name(),
                position,
            });
        }
        self.resolve(param)
    }

    fn instantiate(&self, key: &TypeKey, ctor: &ConstructorDescriptor, args: &[AnyArc]) -> BeanResult<AnyArc> {
        match panic::catch_unwind(AssertUnwindSafe(|| ctor.invoke(args))) {
            Ok(result) => result,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                if self.observers.has_observers() {
                    self.observers.factory_panic(key, &message);
                }
                Err(BeanError::instantiation(key.name(), ConstructorPanic::new(message)))
            }
        }
    }

    fn record(&mut self, key: &TypeKey, ctor: &ConstructorDescriptor) {
        let origin = if self.candidates.contains(key) {
            NodeOrigin::Candidate
        } else {
            NodeOrigin::Transitive
        };
        if let Some(graph) = self.graph.as_deref_mut() {
            graph.add_node(key, origin);
            for (position, param) in ctor.params().iter().enumerate() {
                graph.add_edge(key, param, position);
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
