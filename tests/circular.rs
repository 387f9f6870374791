use bean_factory::{BeanError, BeanFactory, ComponentCatalog, FactoryOptions, TypeKey};
use std::sync::Arc;

fn short(names: &[&'static str]) -> Vec<String> {
    names
        .iter()
        .map(|n| n.rsplit("::").next().unwrap_or(n).to_string())
        .collect()
}

#[test]
fn test_two_level_circular() {
    struct A {
        _b: Arc<B>,
    }
    struct B {
        _a: Arc<A>,
    }

    let mut catalog = ComponentCatalog::new();
    catalog.component::<A>().constructor(|(b,): (Arc<B>,)| A { _b: b }).register();
    catalog.component::<B>().constructor(|(a,): (Arc<A>,)| B { _a: a }).register();

    let err = BeanFactory::builder(catalog)
        .initialize([TypeKey::of::<A>()])
        .unwrap_err();

    assert!(err.candidate().ends_with("A"));
    match err.cause() {
        BeanError::CircularDependency(path) => assert_eq!(short(path), vec!["A", "B", "A"]),
        other => panic!("Expected CircularDependency, got {:?}", other),
    }
}

#[test]
fn test_three_level_circular() {
    struct X {
        _y: Arc<Y>,
    }
    struct Y {
        _z: Arc<Z>,
    }
    struct Z {
        _x: Arc<X>,
    }

    let mut catalog = ComponentCatalog::new();
    catalog.component::<X>().constructor(|(y,): (Arc<Y>,)| X { _y: y }).register();
    catalog.component::<Y>().constructor(|(z,): (Arc<Z>,)| Y { _z: z }).register();
    catalog.component::<Z>().constructor(|(x,): (Arc<X>,)| Z { _x: x }).register();

    let err = BeanFactory::builder(catalog)
        .initialize([TypeKey::of::<X>()])
        .unwrap_err();

    match err.into_cause() {
        BeanError::CircularDependency(path) => assert_eq!(short(&path), vec!["X", "Y", "Z", "X"]),
        other => panic!("Expected CircularDependency, got {:?}", other),
    }
}

#[test]
fn test_self_circular_dependency() {
    struct SelfReferencing {
        _me: Arc<SelfReferencing>,
    }

    let mut catalog = ComponentCatalog::new();
    catalog
        .component::<SelfReferencing>()
        .injected_constructor(|(me,): (Arc<SelfReferencing>,)| SelfReferencing { _me: me })
        .register();

    let err = BeanFactory::builder(catalog)
        .initialize([TypeKey::of::<SelfReferencing>()])
        .unwrap_err();

    match err.cause() {
        BeanError::CircularDependency(path) => {
            assert_eq!(path.len(), 2);
            assert!(path[0].contains("SelfReferencing"));
            assert!(path[1].contains("SelfReferencing"));
        }
        other => panic!("Expected CircularDependency, got {:?}", other),
    }
}

#[test]
fn test_cycle_reached_through_acyclic_prefix() {
    struct Root {
        _a: Arc<A>,
    }
    struct A {
        _b: Arc<B>,
    }
    struct B {
        _a: Arc<A>,
    }

    let mut catalog = ComponentCatalog::new();
    catalog.component::<Root>().constructor(|(a,): (Arc<A>,)| Root { _a: a }).register();
    catalog.component::<A>().constructor(|(b,): (Arc<B>,)| A { _b: b }).register();
    catalog.component::<B>().constructor(|(a,): (Arc<A>,)| B { _a: a }).register();

    let err = BeanFactory::builder(catalog)
        .initialize([TypeKey::of::<Root>()])
        .unwrap_err();

    match err.cause() {
        BeanError::CircularDependency(path) => assert_eq!(short(path), vec!["Root", "A", "B", "A"]),
        other => panic!("Expected CircularDependency, got {:?}", other),
    }
}

#[test]
fn test_cycle_detected_by_validation() {
    struct A {
        _b: Arc<B>,
    }
    struct B {
        _a: Arc<A>,
    }

    let mut catalog = ComponentCatalog::new();
    catalog.component::<A>().constructor(|(b,): (Arc<B>,)| A { _b: b }).register();
    catalog.component::<B>().constructor(|(a,): (Arc<A>,)| B { _a: a }).register();

    let factory = BeanFactory::new(catalog);
    let result = factory.validate([TypeKey::of::<B>()]);
    match result {
        Err(BeanError::CircularDependency(path)) => assert_eq!(short(&path), vec!["B", "A", "B"]),
        other => panic!("Expected CircularDependency, got {:?}", other),
    }
}

#[test]
fn test_depth_exceeded() {
    struct L0;
    struct L1 {
        _d: Arc<L0>,
    }
    struct L2 {
        _d: Arc<L1>,
    }
    struct L3 {
        _d: Arc<L2>,
    }

    let mut catalog = ComponentCatalog::new();
    catalog.component::<L0>().constructor(|()| L0).register();
    catalog.component::<L1>().constructor(|(d,): (Arc<L0>,)| L1 { _d: d }).register();
    catalog.component::<L2>().constructor(|(d,): (Arc<L1>,)| L2 { _d: d }).register();
    catalog.component::<L3>().constructor(|(d,): (Arc<L2>,)| L3 { _d: d }).register();

    // Four levels fit a limit of four
    let ok = BeanFactory::builder(catalog.clone())
        .options(FactoryOptions::default().with_max_depth(4))
        .initialize([TypeKey::of::<L3>()]);
    assert!(ok.is_ok());

    let err = BeanFactory::builder(catalog)
        .options(FactoryOptions::default().with_max_depth(3))
        .initialize([TypeKey::of::<L3>()])
        .unwrap_err();
    assert!(matches!(err.cause(), BeanError::DepthExceeded(3)));
}
