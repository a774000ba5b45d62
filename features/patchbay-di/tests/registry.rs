use std::sync::Arc;

use patchbay_di::{
    DirectPlugin, FactoryPlugin, Host, LazyPlugin, Plug, ProvidingPlug, Registry, RegistryPlugin,
    ResolveError,
};

#[derive(Debug, PartialEq)]
struct Sample<T>(T);

fn sample_registry() -> Registry {
    let plugins: Vec<Arc<dyn RegistryPlugin>> = vec![
        Arc::new(LazyPlugin::new(
            ProvidingPlug::new(|| Sample(10i64)),
            Host::new(),
        )),
        Arc::new(FactoryPlugin::new(
            ProvidingPlug::new(|| Sample("abc".to_string())),
            Host::new(),
        )),
    ];
    Registry::new(plugins).unwrap()
}

#[test]
fn registry_resolves_each_host_by_its_policy() {
    let registry = sample_registry();

    let ten = registry.resolve(&Host::<Sample<i64>>::new()).unwrap();
    let abc = registry.resolve(&Host::<Sample<String>>::new()).unwrap();

    assert_eq!(*ten, Sample(10));
    assert_eq!(*abc, Sample("abc".to_string()));

    // The lazy host stays a singleton, the factory host does not
    let ten_again = registry.resolve(&Host::<Sample<i64>>::new()).unwrap();
    assert!(Arc::ptr_eq(&ten, &ten_again));

    let abc_again = registry.resolve(&Host::<Sample<String>>::new()).unwrap();
    assert_eq!(*abc, *abc_again);
    assert!(!Arc::ptr_eq(&abc, &abc_again));
}

#[test]
fn registry_can_be_hosted_inside_another_registry() {
    let reg1 = sample_registry();

    let plugins: Vec<Arc<dyn RegistryPlugin>> = vec![
        Arc::new(DirectPlugin::new(
            Plug::new(reg1.clone()),
            Host::marked("reg1"),
        )),
        // For the same subjects as reg1, different plugins
        Arc::new(DirectPlugin::new(Plug::new(Sample(100i64)), Host::new())),
        Arc::new(DirectPlugin::new(
            Plug::new(Sample("abcdef".to_string())),
            Host::new(),
        )),
        Arc::new(DirectPlugin::new(
            Plug::new("Scott".to_string()),
            Host::marked("FIRST_NAME"),
        )),
        Arc::new(DirectPlugin::new(
            Plug::new("Tiger".to_string()),
            Host::marked("LAST_NAME"),
        )),
    ];
    let reg2 = Registry::new(plugins).unwrap();

    assert_eq!(
        *reg2
            .resolve(&Host::<String>::marked("FIRST_NAME"))
            .unwrap(),
        "Scott"
    );
    assert_eq!(
        *reg2.resolve(&Host::<String>::marked("LAST_NAME")).unwrap(),
        "Tiger"
    );
    assert_eq!(
        *reg2.resolve(&Host::<Sample<i64>>::new()).unwrap(),
        Sample(100)
    );
    assert_eq!(
        *reg2.resolve(&Host::<Sample<String>>::new()).unwrap(),
        Sample("abcdef".to_string())
    );

    // An unmarked String host was never registered in reg2
    let err = reg2.resolve(&Host::<String>::new()).unwrap_err();
    assert!(matches!(err, ResolveError::MissingPlugin { .. }));

    // Resolving the marked host yields reg1 itself, with its own
    // bindings independently resolvable through the returned reference
    let nested = reg2.resolve(&Host::<Registry>::marked("reg1")).unwrap();
    assert_eq!(*nested.resolve(&Host::<Sample<i64>>::new()).unwrap(), Sample(10));
    assert_eq!(
        *nested.resolve(&Host::<Sample<String>>::new()).unwrap(),
        Sample("abc".to_string())
    );

    // Same identity: the nested handle shares reg1's lazy cache
    let through_nested = nested.resolve(&Host::<Sample<i64>>::new()).unwrap();
    let through_reg1 = reg1.resolve(&Host::<Sample<i64>>::new()).unwrap();
    assert!(Arc::ptr_eq(&through_nested, &through_reg1));
}
