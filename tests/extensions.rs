use bowl::{Container, DiError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn mark(list: &Arc<Vec<String>>, marker: &str) -> Arc<Vec<String>> {
    let mut next = (**list).clone();
    next.push(marker.to_string());
    Arc::new(next)
}

#[test]
fn test_extension_modifies_service() {
    let container = Container::new();
    container.share("test", &[], |_| Ok(Vec::<String>::new())).unwrap();
    container
        .extend::<Vec<String>, _>("test", |list, _| mark(&list, "foo"))
        .unwrap();

    let list = container.get::<Vec<String>>("test").unwrap();
    assert_eq!(*list, vec!["foo"]);
}

#[test]
fn test_extension_runs_once_per_shared_instance() {
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = runs.clone();

    let container = Container::new();
    container.share("test", &[], |_| Ok(Vec::<String>::new())).unwrap();
    container
        .extend::<Vec<String>, _>("test", move |list, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            mark(&list, "x")
        })
        .unwrap();

    let first = container.get::<Vec<String>>("test").unwrap();
    let second = container.get::<Vec<String>>("test").unwrap();

    assert_eq!(*first, vec!["x"]);
    assert_eq!(*second, vec!["x"]);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[test]
fn test_extension_runs_for_every_factory_instance() {
    let container = Container::new();
    container.factory("test", &[], |_| Ok(Vec::<String>::new())).unwrap();
    container
        .extend::<Vec<String>, _>("test", |list, _| mark(&list, "x"))
        .unwrap();

    let first = container.get::<Vec<String>>("test").unwrap();
    let second = container.get::<Vec<String>>("test").unwrap();

    assert_eq!(*first, vec!["x"]);
    assert_eq!(*second, vec!["x"]);
    assert!(!Arc::ptr_eq(&first, &second));
}

#[test]
fn test_extensions_chain_in_registration_order() {
    let container = Container::new();
    container.share("test", &[], |_| Ok(Vec::<String>::new())).unwrap();
    container
        .extend::<Vec<String>, _>("test", |list, _| mark(&list, "first"))
        .unwrap()
        .extend::<Vec<String>, _>("test", |list, _| mark(&list, "second"))
        .unwrap();

    let list = container.get::<Vec<String>>("test").unwrap();
    assert_eq!(*list, vec!["first", "second"]);
}

#[test]
fn test_extension_can_replace_instance_and_resolve_dependencies() {
    struct Mailer {
        transport: String,
    }

    let container = Container::new();
    container.share("transport", &[], |_| Ok("smtp".to_string())).unwrap();
    container
        .share("mailer", &[], |_| Ok(Mailer { transport: "null".to_string() }))
        .unwrap();
    container
        .extend::<Mailer, _>("mailer", |_, c| {
            let transport = c.get::<String>("transport").map(|t| (*t).clone()).unwrap_or_default();
            Arc::new(Mailer { transport })
        })
        .unwrap();

    assert_eq!(container.get::<Mailer>("mailer").unwrap().transport, "smtp");
}

#[test]
fn test_reset_reapplies_extensions() {
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = runs.clone();

    let container = Container::new();
    container.share("test", &[], |_| Ok(Vec::<String>::new())).unwrap();
    container
        .extend::<Vec<String>, _>("test", move |list, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            mark(&list, "x")
        })
        .unwrap();

    container.get::<Vec<String>>("test").unwrap();
    let rebuilt = container.reset("test").unwrap().get::<Vec<String>>("test").unwrap();

    assert_eq!(*rebuilt, vec!["x"]);
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

#[test]
fn test_extend_unknown_service_fails() {
    let container = Container::new();
    let result = container.extend::<u8, _>("missing", |n, _| n);
    assert_eq!(result.unwrap_err(), DiError::UnknownService("missing".to_string()));
}

#[test]
fn test_extension_with_wrong_type_fails_resolution() {
    let container = Container::new();
    container.share("number", &[], |_| Ok(1u32)).unwrap();
    container.extend::<String, _>("number", |s, _| s).unwrap();

    assert!(matches!(
        container.get_any("number"),
        Err(DiError::TypeMismatch { .. })
    ));
    assert!(!container.descriptor("number").unwrap().cached);
}
