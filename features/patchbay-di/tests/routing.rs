use std::sync::Arc;

use patchbay_di::{
    hosted, hosted_marked, BoundArgs, CallArgs, DirectPlugin, Host, Managed, Param, Plug, Registry,
    RegistryPlugin, Router, Signature,
};

#[derive(Debug, Clone, PartialEq)]
struct Count(usize);

#[derive(Debug, Clone, PartialEq)]
struct Suffix(String);

fn managed_repeat(router: &Router) -> Managed<impl Fn(&BoundArgs) -> String> {
    let signature = Signature::of("repeat")
        .param(Param::required("x"))
        .param(Param::hosted::<Count>("count", hosted()));

    Managed::new(router.manage(signature).unwrap(), |args: &BoundArgs| {
        let x = args.get::<String>("x").unwrap();
        let count = args.get::<Count>("count").unwrap();
        x.repeat(count.0)
    })
}

fn managed_append(router: &Router) -> Managed<impl Fn(&BoundArgs) -> String> {
    let signature = Signature::of("append")
        .param(Param::required("x"))
        .param(Param::hosted::<Suffix>("suffix", hosted()));

    Managed::new(router.manage(signature).unwrap(), |args: &BoundArgs| {
        let x = args.get::<String>("x").unwrap();
        let suffix = args.get::<Suffix>("suffix").unwrap();
        format!("{x}{}", suffix.0)
    })
}

#[test]
fn managed_callables_resolve_their_hosted_params() {
    // Managed code knows nothing about plugins, only the router is used.
    // Declaring managed callables before the mount must not crash.
    let router = Router::new();
    let mut repeat = managed_repeat(&router);
    let mut append = managed_append(&router);

    // Plugins are created and registered afterwards
    let plugins: Vec<Arc<dyn RegistryPlugin>> = vec![
        Arc::new(DirectPlugin::new(Plug::new(Count(3)), Host::new())),
        Arc::new(DirectPlugin::new(
            Plug::new(Suffix("!".to_string())),
            Host::new(),
        )),
    ];
    router.mount(Registry::new(plugins).unwrap()).unwrap();

    let out = repeat
        .call(CallArgs::new().positional("ab".to_string()))
        .unwrap();
    assert_eq!(out, "ababab");

    // An explicitly supplied argument passes through untouched
    let out = repeat
        .call(
            CallArgs::new()
                .positional("ab".to_string())
                .keyword("count", Count(2)),
        )
        .unwrap();
    assert_eq!(out, "abab");

    let out = append
        .call(CallArgs::new().positional("oh".to_string()))
        .unwrap();
    assert_eq!(out, "oh!");
}

#[test]
fn managed_constructor_builds_a_value_from_bound_args() {
    #[derive(Debug, PartialEq)]
    struct Report {
        title: String,
        count: Count,
    }

    let router = Router::new();
    let signature = Signature::of("Report")
        .param(Param::required("title"))
        .param(Param::hosted::<Count>("count", hosted()));
    let mut build_report = Managed::new(router.manage(signature).unwrap(), |args: &BoundArgs| {
        Report {
            title: args.get::<String>("title").unwrap().as_ref().clone(),
            count: args.get::<Count>("count").unwrap().as_ref().clone(),
        }
    });

    let plugins: Vec<Arc<dyn RegistryPlugin>> =
        vec![Arc::new(DirectPlugin::new(Plug::new(Count(3)), Host::new()))];
    router.mount(Registry::new(plugins).unwrap()).unwrap();

    let report = build_report
        .call(CallArgs::new().positional("daily".to_string()))
        .unwrap();
    assert_eq!(
        report,
        Report {
            title: "daily".to_string(),
            count: Count(3),
        }
    );

    let report = build_report
        .call(
            CallArgs::new()
                .positional("weekly".to_string())
                .keyword("count", Count(7)),
        )
        .unwrap();
    assert_eq!(report.count, Count(7));
}

#[test]
fn marked_hosts_route_to_their_own_plugins() {
    let router = Router::new();

    let signature = Signature::of("full_name")
        .param(Param::hosted::<String>("first", hosted_marked("FIRST_NAME")))
        .param(Param::hosted::<String>("last", hosted_marked("LAST_NAME")));
    let mut full_name = Managed::new(router.manage(signature).unwrap(), |args: &BoundArgs| {
        format!(
            "{} {}",
            args.get::<String>("first").unwrap(),
            args.get::<String>("last").unwrap()
        )
    });

    let plugins: Vec<Arc<dyn RegistryPlugin>> = vec![
        Arc::new(DirectPlugin::new(
            Plug::new("Scott".to_string()),
            Host::marked("FIRST_NAME"),
        )),
        Arc::new(DirectPlugin::new(
            Plug::new("Tiger".to_string()),
            Host::marked("LAST_NAME"),
        )),
    ];
    router.mount(Registry::new(plugins).unwrap()).unwrap();

    assert_eq!(full_name.call(CallArgs::new()).unwrap(), "Scott Tiger");
}
