use bean_factory::{BeanError, BeanFactory, ComponentCatalog, LoggingObserver, ResolutionObserver, TypeKey};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Resolving(&'static str),
    Resolved(&'static str),
    Panic(&'static str, String),
    Failed(&'static str),
}

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<Event>>,
}

impl Recorder {
    fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

impl ResolutionObserver for Recorder {
    fn resolving(&self, key: &TypeKey) {
        self.events.lock().unwrap().push(Event::Resolving(key.short_name()));
    }

    fn resolved(&self, key: &TypeKey, _duration: Duration) {
        self.events.lock().unwrap().push(Event::Resolved(key.short_name()));
    }

    fn factory_panic(&self, key: &TypeKey, message: &str) {
        self.events
            .lock()
            .unwrap()
            .push(Event::Panic(key.short_name(), message.to_string()));
    }

    fn failed(&self, key: &TypeKey, _error: &BeanError) {
        self.events.lock().unwrap().push(Event::Failed(key.short_name()));
    }
}

struct ServiceA;
struct ControllerB {
    _service: Arc<ServiceA>,
}

fn controller_catalog() -> ComponentCatalog {
    let mut catalog = ComponentCatalog::new();
    catalog.component::<ServiceA>().constructor(|()| ServiceA).register();
    catalog
        .component::<ControllerB>()
        .injected_constructor(|(service,): (Arc<ServiceA>,)| ControllerB { _service: service })
        .register();
    catalog
}

#[test]
fn test_events_nest_with_dependencies() {
    let recorder = Arc::new(Recorder::default());
    let factory = BeanFactory::builder(controller_catalog())
        .observer(recorder.clone())
        .initialize([TypeKey::of::<ControllerB>(), TypeKey::of::<ServiceA>()])
        .unwrap();

    assert_eq!(factory.len(), 2);
    // The service is built inside the controller's resolution and then skipped
    assert_eq!(
        recorder.events(),
        vec![
            Event::Resolving("ControllerB"),
            Event::Resolving("ServiceA"),
            Event::Resolved("ServiceA"),
            Event::Resolved("ControllerB"),
        ]
    );
}

#[test]
fn test_every_observer_is_notified() {
    let first = Arc::new(Recorder::default());
    let second = Arc::new(Recorder::default());
    BeanFactory::builder(controller_catalog())
        .observer(first.clone())
        .observer(second.clone())
        .initialize([TypeKey::of::<ServiceA>()])
        .unwrap();

    assert_eq!(first.events(), second.events());
    assert_eq!(first.events().len(), 2);
}

#[test]
fn test_failure_events_innermost_first() {
    struct Broken;
    struct Middle {
        _broken: Arc<Broken>,
    }
    struct Top {
        _middle: Arc<Middle>,
    }

    let mut catalog = ComponentCatalog::new();
    catalog
        .component::<Broken>()
        .try_constructor(|()| -> Result<Broken, String> { Err("nope".to_string()) })
        .register();
    catalog
        .component::<Middle>()
        .constructor(|(broken,): (Arc<Broken>,)| Middle { _broken: broken })
        .register();
    catalog
        .component::<Top>()
        .constructor(|(middle,): (Arc<Middle>,)| Top { _middle: middle })
        .register();

    let recorder = Arc::new(Recorder::default());
    let result = BeanFactory::builder(catalog)
        .observer(recorder.clone())
        .initialize([TypeKey::of::<Top>()]);
    assert!(result.is_err());

    assert_eq!(
        recorder.events(),
        vec![
            Event::Resolving("Top"),
            Event::Resolving("Middle"),
            Event::Resolving("Broken"),
            Event::Failed("Broken"),
            Event::Failed("Middle"),
            Event::Failed("Top"),
        ]
    );
}

#[test]
fn test_panic_event_precedes_failure() {
    struct Fragile;

    let mut catalog = ComponentCatalog::new();
    catalog
        .component::<Fragile>()
        .constructor(|()| -> Fragile { panic!("bad wiring") })
        .register();

    let recorder = Arc::new(Recorder::default());
    let result = BeanFactory::builder(catalog)
        .observer(recorder.clone())
        .initialize([TypeKey::of::<Fragile>()]);
    assert!(result.is_err());

    assert_eq!(
        recorder.events(),
        vec![
            Event::Resolving("Fragile"),
            Event::Panic("Fragile", "bad wiring".to_string()),
            Event::Failed("Fragile"),
        ]
    );
}

#[test]
fn test_supplied_instances_produce_no_events() {
    let recorder = Arc::new(Recorder::default());
    BeanFactory::builder(controller_catalog())
        .observer(recorder.clone())
        .instance(ServiceA)
        .initialize([TypeKey::of::<ControllerB>()])
        .unwrap();

    assert_eq!(
        recorder.events(),
        vec![Event::Resolving("ControllerB"), Event::Resolved("ControllerB")]
    );
}

/// Shared in-memory sink for formatted log lines.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn capture_logs<F: FnOnce()>(f: F) -> String {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("bean_factory=debug"))
        .with_writer(buffer.clone())
        .with_ansi(false)
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    buffer.contents()
}

#[test]
fn test_logging_observer_emits_tracing_events() {
    let logs = capture_logs(|| {
        BeanFactory::builder(controller_catalog())
            .observer(Arc::new(LoggingObserver::with_prefix("app")))
            .initialize([TypeKey::of::<ControllerB>()])
            .unwrap();
    });

    assert!(logs.contains("resolving"));
    assert!(logs.contains("resolved"));
    assert!(logs.contains("elapsed_us"));
    assert!(logs.contains("ServiceA"));
    assert!(logs.contains("app"));
    assert!(logs.contains("bean factory initialized"));
}

#[test]
fn test_logging_observer_reports_panics() {
    struct Fragile;

    let mut catalog = ComponentCatalog::new();
    catalog
        .component::<Fragile>()
        .constructor(|()| -> Fragile { panic!("bad wiring") })
        .register();

    let logs = capture_logs(|| {
        let result = BeanFactory::builder(catalog)
            .observer(Arc::new(LoggingObserver::default()))
            .initialize([TypeKey::of::<Fragile>()]);
        assert!(result.is_err());
    });

    assert!(logs.contains("ERROR"));
    assert!(logs.contains("constructor panicked"));
    assert!(logs.contains("bad wiring"));
    assert!(logs.contains("resolution failed"));
    assert!(logs.contains("initialization failed"));
}

#[test]
fn test_logging_observer_prefix() {
    assert_eq!(LoggingObserver::new().prefix(), "bean-factory");
    assert_eq!(LoggingObserver::with_prefix("svc").prefix(), "svc");
}
