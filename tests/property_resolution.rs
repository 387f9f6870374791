/// Property-based tests for bean resolution
///
/// Random acyclic dependency graphs over eight slot types are catalogued and
/// initialized from random candidate subsets. The properties must hold for
/// every shape: completeness, singleton instantiation, transitive closure and
/// failure propagation.

use bean_factory::{
    AnyArc, BeanError, BeanFactory, ComponentCatalog, ComponentDescriptor, ConstructorDescriptor, TypeKey,
};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const SLOTS: usize = 8;

/// Distinct key per index; every slot stores a `NodeData`.
struct Slot<const I: usize>;

struct NodeData {
    index: usize,
    deps: Vec<AnyArc>,
}

fn keys() -> [TypeKey; SLOTS] {
    [
        TypeKey::of::<Slot<0>>(),
        TypeKey::of::<Slot<1>>(),
        TypeKey::of::<Slot<2>>(),
        TypeKey::of::<Slot<3>>(),
        TypeKey::of::<Slot<4>>(),
        TypeKey::of::<Slot<5>>(),
        TypeKey::of::<Slot<6>>(),
        TypeKey::of::<Slot<7>>(),
    ]
}

/// Parameter indices of slot `i`: the lower slots selected by its mask.
fn params_of(i: usize, masks: &[u8]) -> Vec<usize> {
    (0..i).filter(|j| masks[i] & (1 << j) != 0).collect()
}

fn build_catalog(masks: &[u8], broken: Option<usize>, builds: &Arc<Vec<AtomicUsize>>) -> ComponentCatalog {
    let keys = keys();
    let mut catalog = ComponentCatalog::new();
    for i in 0..SLOTS {
        let params: Vec<TypeKey> = params_of(i, masks).into_iter().map(|j| keys[j]).collect();
        let builds = Arc::clone(builds);
        let name = keys[i].name();
        let ctor = ConstructorDescriptor::from_raw(params, move |args| {
            builds[i].fetch_add(1, Ordering::SeqCst);
            if broken == Some(i) {
                return Err(BeanError::instantiation(name, "broken slot"));
            }
            Ok(Arc::new(NodeData {
                index: i,
                deps: args.to_vec(),
            }) as AnyArc)
        });
        catalog.insert(ComponentDescriptor::new(keys[i]).with_constructor(ctor));
    }
    catalog
}

fn candidates_of(mask: u8) -> Vec<usize> {
    (0..SLOTS).filter(|i| mask & (1 << i) != 0).collect()
}

fn reachable(candidates: &[usize], masks: &[u8]) -> HashSet<usize> {
    let mut seen = HashSet::new();
    let mut todo: Vec<usize> = candidates.to_vec();
    while let Some(i) = todo.pop() {
        if seen.insert(i) {
            todo.extend(params_of(i, masks));
        }
    }
    seen
}

fn counters() -> Arc<Vec<AtomicUsize>> {
    Arc::new((0..SLOTS).map(|_| AtomicUsize::new(0)).collect())
}

fn graph_strategy() -> impl Strategy<Value = (Vec<u8>, u8)> {
    (prop::collection::vec(any::<u8>(), SLOTS), any::<u8>())
}

proptest! {
    #[test]
    fn initialization_builds_exact_closure((masks, candidate_mask) in graph_strategy()) {
        let builds = counters();
        let catalog = build_catalog(&masks, None, &builds);
        let keys = keys();
        let candidates = candidates_of(candidate_mask);
        let expected = reachable(&candidates, &masks);

        let factory = BeanFactory::builder(catalog)
            .initialize(candidates.iter().map(|&i| keys[i]))
            .unwrap();

        // Every candidate and everything it needs is present, nothing else
        prop_assert_eq!(factory.len(), expected.len());
        for i in 0..SLOTS {
            prop_assert_eq!(factory.contains_key(&keys[i]), expected.contains(&i));
        }

        // Each type was instantiated at most once
        for i in 0..SLOTS {
            let count = builds[i].load(Ordering::SeqCst);
            prop_assert_eq!(count, usize::from(expected.contains(&i)));
        }
    }
}

proptest! {
    #[test]
    fn dependents_share_the_registered_instance((masks, candidate_mask) in graph_strategy()) {
        let builds = counters();
        let catalog = build_catalog(&masks, None, &builds);
        let keys = keys();
        let candidates = candidates_of(candidate_mask);

        let factory = BeanFactory::builder(catalog)
            .initialize(candidates.iter().map(|&i| keys[i]))
            .unwrap();

        for key in factory.keys() {
            let node = factory.get_any(key).unwrap().downcast::<NodeData>().unwrap();
            let params = params_of(node.index, &masks);
            prop_assert_eq!(node.deps.len(), params.len());
            for (arg, j) in node.deps.iter().zip(params) {
                let registered = factory.get_any(&keys[j]).unwrap();
                prop_assert!(Arc::ptr_eq(arg, &registered));
            }
        }

        // Lookup is idempotent
        for key in factory.keys() {
            let first = factory.get_any(key).unwrap();
            let second = factory.get_any(key).unwrap();
            prop_assert!(Arc::ptr_eq(&first, &second));
        }
    }
}

proptest! {
    #[test]
    fn candidate_order_does_not_change_registry((masks, candidate_mask) in graph_strategy()) {
        let keys = keys();
        let candidates = candidates_of(candidate_mask);

        let forward = BeanFactory::builder(build_catalog(&masks, None, &counters()))
            .initialize(candidates.iter().map(|&i| keys[i]))
            .unwrap();
        let backward = BeanFactory::builder(build_catalog(&masks, None, &counters()))
            .initialize(candidates.iter().rev().map(|&i| keys[i]))
            .unwrap();

        let a: HashSet<TypeKey> = forward.keys().copied().collect();
        let b: HashSet<TypeKey> = backward.keys().copied().collect();
        prop_assert_eq!(a, b);
    }
}

proptest! {
    #[test]
    fn failure_propagates_iff_reachable(
        (masks, candidate_mask) in graph_strategy(),
        broken in 0usize..SLOTS
    ) {
        let keys = keys();
        let candidates = candidates_of(candidate_mask);
        let expected = reachable(&candidates, &masks);

        let result = BeanFactory::builder(build_catalog(&masks, Some(broken), &counters()))
            .initialize(candidates.iter().map(|&i| keys[i]));

        if expected.contains(&broken) {
            let err = result.unwrap_err();
            let is_broken_slot = matches!(
                err.cause(),
                BeanError::Instantiation { component, .. } if *component == keys[broken].name()
            );
            prop_assert!(is_broken_slot);
        } else {
            prop_assert!(result.is_ok());
        }
    }
}

proptest! {
    #[test]
    fn plan_is_topological((masks, candidate_mask) in graph_strategy()) {
        let keys = keys();
        let candidates = candidates_of(candidate_mask);
        let expected = reachable(&candidates, &masks);
        let builds = counters();

        let factory = BeanFactory::new(build_catalog(&masks, None, &builds));
        let plan = factory.validate(candidates.iter().map(|&i| keys[i])).unwrap();

        prop_assert_eq!(plan.len(), expected.len());
        let position = |key: &TypeKey| plan.order().iter().position(|k| k == key);
        for &i in &expected {
            let at = position(&keys[i]).unwrap();
            for j in params_of(i, &masks) {
                prop_assert!(position(&keys[j]).unwrap() < at);
            }
        }

        // Planning never instantiates
        prop_assert!(builds.iter().all(|c| c.load(Ordering::SeqCst) == 0));
        prop_assert!(factory.is_empty());
    }
}
