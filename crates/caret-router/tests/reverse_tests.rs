//! Reverse routing: URL generation from controller references, query/fragment
//! accumulation, encoding, and the bind∘unbind identity.

use caret_router::{
    parse_routes, BoundParams, BoundValue, ControllerRegistry, Method, Outcome, ParamType,
    ParameterBinders, QueryString, ReverseRouteError, ReverseRoutes, RouteTable, UnbindingError,
};
use pretty_assertions::assert_eq;

fn respond(name: &'static str) -> impl Fn(&BoundParams) -> Outcome + Send + Sync + 'static {
    move |_: &BoundParams| Outcome::ok(name)
}

fn demo_registry() -> ControllerRegistry {
    let mut registry = ControllerRegistry::new();
    registry.register("demo::Pages", "about", vec![], respond("about"));
    registry.register(
        "demo::Pages",
        "show",
        vec![ParamType::STRING],
        respond("show"),
    );
    registry.register(
        "demo::Pages",
        "wild",
        vec![ParamType::STRING],
        respond("wild"),
    );
    registry.register(
        "demo::Pages",
        "files",
        vec![ParamType::STRING],
        respond("files"),
    );
    registry.register(
        "demo::Posts",
        "entry",
        vec![ParamType::I64, ParamType::STRING],
        respond("entry"),
    );
    registry
}

fn demo_table(registry: &ControllerRegistry, binders: &ParameterBinders) -> RouteTable {
    let text = "\
        GET /about demo::Pages.about()\n\
        GET /simple/:param/foo demo::Pages.show( String param )\n\
        GET /wild/*card demo::Pages.wild( String card )\n\
        GET /post/:id/c/:slug demo::Posts.entry( i64 id, String slug )\n\
        GET /files demo::Pages.files( String dir = 'root' )";
    RouteTable::new(parse_routes(text, registry, binders).unwrap())
}

fn string_arg(value: &str) -> BoundValue {
    BoundValue::new(value.to_string())
}

#[test]
fn resolves_zero_argument_methods() {
    let registry = demo_registry();
    let binders = ParameterBinders::new();
    let table = demo_table(&registry, &binders);
    let reverse = ReverseRoutes::new(&table, &binders);

    let url = reverse.route_to("demo::Pages", "about", vec![]).unwrap();
    assert_eq!(url.uri(), "/about");
    assert_eq!(*url.method(), Method::GET);
}

#[test]
fn substitutes_arguments_into_path_positions() {
    let registry = demo_registry();
    let binders = ParameterBinders::new();
    let table = demo_table(&registry, &binders);
    let reverse = ReverseRoutes::new(&table, &binders);

    let url = reverse
        .route_to("demo::Pages", "show", vec![string_arg("test")])
        .unwrap();
    assert_eq!(url.uri(), "/simple/test/foo");
}

#[test]
fn percent_encodes_substituted_values() {
    let registry = demo_registry();
    let binders = ParameterBinders::new();
    let table = demo_table(&registry, &binders);
    let reverse = ReverseRoutes::new(&table, &binders);

    let url = reverse
        .route_to("demo::Pages", "show", vec![string_arg("sp ace/slash")])
        .unwrap();
    assert_eq!(url.uri(), "/simple/sp%20ace%2Fslash/foo");
}

#[test]
fn wildcard_values_keep_their_slashes() {
    let registry = demo_registry();
    let binders = ParameterBinders::new();
    let table = demo_table(&registry, &binders);
    let reverse = ReverseRoutes::new(&table, &binders);

    let url = reverse
        .route_to("demo::Pages", "wild", vec![string_arg("wild/wild card/here")])
        .unwrap();
    assert_eq!(url.uri(), "/wild/wild/wild%20card/here");
}

#[test]
fn params_not_in_the_path_render_as_query_string() {
    let registry = demo_registry();
    let binders = ParameterBinders::new();
    let table = demo_table(&registry, &binders);
    let reverse = ReverseRoutes::new(&table, &binders);

    let url = reverse
        .route_to("demo::Pages", "files", vec![string_arg("top")])
        .unwrap();
    assert_eq!(url.uri(), "/files?dir=top");
}

#[test]
fn unbinding_falls_back_to_declared_defaults() {
    let registry = demo_registry();
    let binders = ParameterBinders::new();
    let table = demo_table(&registry, &binders);

    let route = table.route(&Method::GET, "/files").unwrap();
    let uri = route.unbind_parameters(&binders, &BoundParams::new()).unwrap();
    assert_eq!(uri, "/files?dir=root");
}

#[test]
fn bind_after_unbind_returns_the_original_values() {
    let registry = demo_registry();
    let binders = ParameterBinders::new();
    let table = demo_table(&registry, &binders);
    let reverse = ReverseRoutes::new(&table, &binders);

    let url = reverse
        .route_to(
            "demo::Posts",
            "entry",
            vec![BoundValue::new(42i64), string_arg("hello-world")],
        )
        .unwrap();
    assert_eq!(url.uri(), "/post/42/c/hello-world");

    let matched = table.route(url.method(), "/post/42/c/hello-world").unwrap();
    let bound = matched
        .bind_parameters(&binders, "/post/42/c/hello-world", &QueryString::new())
        .unwrap();
    assert_eq!(*bound.get("id").unwrap().downcast_ref::<i64>().unwrap(), 42);
    assert_eq!(
        bound.get("slug").unwrap().downcast_ref::<String>().unwrap(),
        "hello-world"
    );
}

#[test]
fn appended_query_parameters_render_sorted_by_key() {
    let registry = demo_registry();
    let binders = ParameterBinders::new();
    let table = demo_table(&registry, &binders);
    let reverse = ReverseRoutes::new(&table, &binders);

    let url = reverse
        .route_to("demo::Pages", "about", vec![])
        .unwrap()
        .append_query("foo", "bar")
        .append_query("bar", "bazar");
    assert_eq!(url.uri(), "/about?bar=bazar&foo=bar");
}

#[test]
fn appended_parameters_extend_an_existing_query_string() {
    let registry = demo_registry();
    let binders = ParameterBinders::new();
    let table = demo_table(&registry, &binders);
    let reverse = ReverseRoutes::new(&table, &binders);

    let url = reverse
        .route_to("demo::Pages", "files", vec![string_arg("top")])
        .unwrap()
        .append_query("page", "2");
    assert_eq!(url.uri(), "/files?dir=top&page=2");
}

#[test]
fn repeated_appends_keep_every_value() {
    let registry = demo_registry();
    let binders = ParameterBinders::new();
    let table = demo_table(&registry, &binders);
    let reverse = ReverseRoutes::new(&table, &binders);

    let url = reverse
        .route_to("demo::Pages", "about", vec![])
        .unwrap()
        .append_query_values("tag", ["a", "b"]);
    assert_eq!(url.uri(), "/about?tag=a&tag=b");
}

#[test]
fn fragment_renders_last() {
    let registry = demo_registry();
    let binders = ParameterBinders::new();
    let table = demo_table(&registry, &binders);
    let reverse = ReverseRoutes::new(&table, &binders);

    let url = reverse
        .route_to("demo::Pages", "about", vec![])
        .unwrap()
        .append_query("q", "x")
        .with_fragment("bazar");
    assert_eq!(url.uri(), "/about?q=x#bazar");
}

#[test]
fn absolute_urls_take_explicit_host_context_and_elide_default_ports() {
    let registry = demo_registry();
    let binders = ParameterBinders::new();
    let table = demo_table(&registry, &binders);
    let reverse = ReverseRoutes::new(&table, &binders);

    let url = reverse.route_to("demo::Pages", "about", vec![]).unwrap();
    assert_eq!(url.http_url(false, "localhost", 80), "http://localhost/about");
    assert_eq!(
        url.http_url(false, "localhost", 8080),
        "http://localhost:8080/about"
    );
    assert_eq!(
        url.http_url(true, "example.com", 443),
        "https://example.com/about"
    );
    assert_eq!(
        url.http_url(true, "example.com", 8443),
        "https://example.com:8443/about"
    );
    assert_eq!(
        url.web_socket_url(false, "localhost", 80),
        "ws://localhost/about"
    );
    assert_eq!(
        url.web_socket_url(true, "localhost", 443),
        "wss://localhost/about"
    );
}

#[test]
fn zero_matches_is_an_error() {
    let registry = demo_registry();
    let binders = ParameterBinders::new();
    let table = demo_table(&registry, &binders);
    let reverse = ReverseRoutes::new(&table, &binders);

    assert!(matches!(
        reverse.route_to("demo::Pages", "nope", vec![]),
        Err(ReverseRouteError::NotFound { .. })
    ));
    // Arity participates in matching.
    assert!(matches!(
        reverse.route_to("demo::Pages", "show", vec![]),
        Err(ReverseRouteError::NotFound { .. })
    ));
}

#[test]
fn several_matches_are_ambiguous_not_silently_resolved() {
    let registry = demo_registry();
    let binders = ParameterBinders::new();
    let text = "\
        GET /about demo::Pages.about()\n\
        POST /about-form demo::Pages.about()";
    let table = RouteTable::new(parse_routes(text, &registry, &binders).unwrap());
    let reverse = ReverseRoutes::new(&table, &binders);

    let error = reverse.route_to("demo::Pages", "about", vec![]).unwrap_err();
    match error {
        ReverseRouteError::Ambiguous { matches, .. } => assert_eq!(matches.len(), 2),
        other => panic!("expected Ambiguous, got {other:?}"),
    }
}

#[test]
fn wrongly_typed_arguments_fail_loudly() {
    let registry = demo_registry();
    let binders = ParameterBinders::new();
    let table = demo_table(&registry, &binders);
    let reverse = ReverseRoutes::new(&table, &binders);

    let error = reverse
        .route_to("demo::Pages", "show", vec![BoundValue::new(42i64)])
        .unwrap_err();
    assert!(matches!(
        error,
        ReverseRouteError::Unbinding(UnbindingError::TypeMismatch { .. })
    ));
}
