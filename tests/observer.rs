use bowl::{Container, ContainerObserver, Lifetime, TracingObserver};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl RecordingObserver {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl ContainerObserver for RecordingObserver {
    fn resolving(&self, name: &str) {
        self.events.lock().unwrap().push(format!("resolving {name}"));
    }

    fn resolved(&self, name: &str, lifetime: Lifetime, cache_hit: bool, _duration: Duration) {
        self.events
            .lock()
            .unwrap()
            .push(format!("resolved {name} {lifetime} hit={cache_hit}"));
    }

    fn environment_activated(&self, name: &str) {
        self.events.lock().unwrap().push(format!("env {name}"));
    }
}

#[test]
fn test_observer_sees_nested_resolution() {
    let observer = Arc::new(RecordingObserver::default());
    let container = Container::new();
    container.add_observer(observer.clone());

    container.share("child", &[], |_| Ok(1u8)).unwrap();
    container
        .factory("parent", &[], |c| Ok(*c.get::<u8>("child")? + 1))
        .unwrap();

    container.get::<u8>("parent").unwrap();
    container.get::<u8>("parent").unwrap();

    assert_eq!(
        observer.events(),
        vec![
            "resolving parent",
            "resolving child",
            "resolved child shared hit=false",
            "resolved parent factory hit=false",
            "resolving parent",
            "resolving child",
            "resolved child shared hit=true",
            "resolved parent factory hit=false",
        ]
    );
}

#[test]
fn test_observer_sees_environment_once() {
    let observer = Arc::new(RecordingObserver::default());
    let container = Container::new();
    container.add_observer(observer.clone());
    container.configure("prod", |_| Ok(())).unwrap();

    container.env("prod").unwrap();
    container.env("prod").unwrap();

    assert_eq!(observer.events(), vec!["env prod"]);
}

#[test]
fn test_tracing_observer_emits_events() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("bowl=trace")
        .with_test_writer()
        .try_init();

    let container = Container::new();
    container.add_observer(Arc::new(TracingObserver::new()));
    container.share("svc", &[], |_| Ok(1u8)).unwrap();
    container.configure("prod", |_| Ok(())).unwrap();

    assert_eq!(*container.get::<u8>("svc").unwrap(), 1);
    container.env("prod").unwrap();
}
