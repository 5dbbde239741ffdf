//! Route definition parsing: the text format, its error cases, and the
//! round trip through `Display`.

use caret_router::{
    parse_route, parse_routes, BoundParams, ControllerRegistry, Method, Outcome, ParamType,
    ParameterBinders,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn respond(name: &'static str) -> impl Fn(&BoundParams) -> Outcome + Send + Sync + 'static {
    move |_: &BoundParams| Outcome::ok(name)
}

fn demo_registry() -> ControllerRegistry {
    let mut registry = ControllerRegistry::new();
    registry.register("demo::Pages", "index", vec![], respond("index"));
    registry.register("demo::Pages", "foo", vec![], respond("foo"));
    registry.register("demo::Pages", "bar", vec![], respond("bar"));
    registry.register("demo::Pages", "test", vec![], respond("test"));
    registry.register(
        "demo::Pages",
        "another",
        vec![ParamType::STRING, ParamType::I32],
        respond("another"),
    );
    registry.register(
        "demo::Pages",
        "wild",
        vec![ParamType::STRING],
        respond("wild"),
    );
    registry
}

#[rstest]
#[case::root("GET / demo::Pages.test()", Method::GET, "/", "test", 0, 0)]
#[case::extra_whitespace(
    "  POST    /foo/bar    demo::Pages.test()",
    Method::POST,
    "/foo/bar",
    "test",
    0,
    0
)]
#[case::modifier_transient("GET / demo::Pages.test() transient", Method::GET, "/", "test", 0, 1)]
#[case::modifier_service("GET / demo::Pages.test() service", Method::GET, "/", "test", 0, 1)]
#[case::params(
    "GET /foo/:id/bar/:slug demo::Pages.another(String    id ,i32 slug   )",
    Method::GET,
    "/foo/:id/bar/:slug",
    "another",
    2,
    0
)]
#[case::params_reordered(
    "GET /foo/bar/:slug/cathedral/:id demo::Pages.another( String id, i32 slug )",
    Method::GET,
    "/foo/bar/:slug/cathedral/:id",
    "another",
    2,
    0
)]
#[case::wildcard(
    "GET /static/*path demo::Pages.wild( String path )",
    Method::GET,
    "/static/*path",
    "wild",
    1,
    0
)]
#[case::wildcard_mid_path(
    "GET /d/*path/:slug demo::Pages.another( String path, i32 slug )",
    Method::GET,
    "/d/*path/:slug",
    "another",
    2,
    0
)]
#[case::defaulted(
    "GET /foo/:id/bar demo::Pages.another( String id, i32 slug = '42' )",
    Method::GET,
    "/foo/:id/bar",
    "another",
    2,
    0
)]
#[case::no_parenthesis(
    "  POST    /foo/bar    demo::Pages.test",
    Method::POST,
    "/foo/bar",
    "test",
    0,
    0
)]
#[case::no_parenthesis_with_modifier(
    "  POST    /foo/bar    demo::Pages.test transient",
    Method::POST,
    "/foo/bar",
    "test",
    0,
    1
)]
fn parses_valid_definitions(
    #[case] line: &str,
    #[case] method: Method,
    #[case] path: &str,
    #[case] action: &str,
    #[case] params: usize,
    #[case] modifiers: usize,
) {
    let registry = demo_registry();
    let binders = ParameterBinders::new();
    let route = parse_route(line, &registry, &binders).unwrap();
    assert_eq!(*route.method(), method);
    assert_eq!(route.path(), path);
    assert_eq!(route.controller(), "demo::Pages");
    assert_eq!(route.controller_method(), action);
    assert_eq!(route.params().len(), params);
    assert_eq!(route.modifiers().len(), modifiers);
}

#[rstest]
#[case::unknown_method("WRONG /route demo::Pages.test()")]
#[case::missing_action("WRONG /route")]
#[case::empty("")]
#[case::comment("# GET / demo::Pages.test()")]
#[case::relative_path("GET foo/bar demo::Pages.test()")]
#[case::space_in_controller("GET /foo /bar demo::Pages.test()")]
#[case::unknown_controller("GET / demo::Unknown.test()")]
#[case::unknown_controller_method("GET / demo::Pages.unknown()")]
#[case::no_method_separator("GET / demoPages()")]
#[case::unknown_param_type("GET /:param demo::Pages.test( WhatTheHeck param )")]
#[case::signature_mismatch("GET /:id demo::Pages.test( String id )")]
#[case::path_param_undeclared("GET /foo/:id/bar/:slugf demo::Pages.another( String id, i32 slug )")]
#[case::declared_param_not_in_path(
    "GET /foo/:idf/bar/:slug demo::Pages.another( String id, i32 slug )"
)]
#[case::param_on_zero_arg_method("GET /:wrong demo::Pages.test()")]
#[case::query_only_params_without_default(
    "GET /nothing/at/all demo::Pages.another( String id, i32 slug )"
)]
#[case::missing_param_type("GET /a/*path demo::Pages.wild( path )")]
#[case::duplicate_declared_param("GET /a/:x demo::Pages.another( String x, i32 x )")]
#[case::wildcard_and_undeclared_params(
    "GET /a/*path/:id/:slug demo::Pages.another( String id, i32 slug )"
)]
#[case::unbalanced_parenthesis("GET / demo::Pages.test( String id")]
#[case::unquoted_default("GET /foo/:id/bar demo::Pages.another( String id, i32 slug = 42 )")]
#[case::default_does_not_bind(
    "GET /foo/:id/bar demo::Pages.another( String id, i32 slug = 'abc' )"
)]
fn rejects_invalid_definitions(#[case] line: &str) {
    let registry = demo_registry();
    let binders = ParameterBinders::new();
    let error = parse_route(line, &registry, &binders).unwrap_err();
    assert_eq!(error.definition, line);
}

#[test]
fn parses_multiple_lines_skipping_comments_and_blanks() {
    let registry = demo_registry();
    let binders = ParameterBinders::new();
    let text = "\nGET / demo::Pages.test()\n\n \n# ignore me\n  # me too  \n  POST    /foo/bar    demo::Pages.test()\n";
    let routes = parse_routes(text, &registry, &binders).unwrap();
    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0].path(), "/");
    assert_eq!(*routes[1].method(), Method::POST);
    assert_eq!(routes[1].path(), "/foo/bar");
}

#[test]
fn a_single_bad_line_fails_the_whole_text() {
    let registry = demo_registry();
    let binders = ParameterBinders::new();
    let text = "GET / demo::Pages.test()\nGET /broken demo::Unknown.test()";
    assert!(parse_routes(text, &registry, &binders).is_err());
}

#[test]
fn parsed_defaults_keep_their_literal() {
    let registry = demo_registry();
    let binders = ParameterBinders::new();
    let route = parse_route(
        "GET /foo/:id/bar demo::Pages.another( String id, i32 slug = '42' )",
        &registry,
        &binders,
    )
    .unwrap();
    let slug = route.params().get("slug").unwrap();
    assert_eq!(slug.default(), Some("42"));
    assert_eq!(*slug.ty(), ParamType::I32);
}

#[test]
fn default_literals_may_contain_separators() {
    let mut registry = demo_registry();
    registry.register(
        "demo::Pages",
        "tree",
        vec![ParamType::STRING, ParamType::STRING],
        respond("tree"),
    );
    let binders = ParameterBinders::new();
    let route = parse_route(
        "GET /tree/*path demo::Pages.tree( String root = 'var/data', String path )",
        &registry,
        &binders,
    )
    .unwrap();
    assert_eq!(route.params().get("root").unwrap().default(), Some("var/data"));
}

#[rstest]
#[case("GET / demo::Pages.test()")]
#[case("GET /foo/:id/bar/:slug demo::Pages.another( String id, i32 slug )")]
#[case("GET /foo/:id/bar demo::Pages.another( String id, i32 slug = '42' )")]
#[case("GET /static/*path demo::Pages.wild( String path )")]
#[case("POST /foo/bar demo::Pages.test() service transient")]
fn display_round_trips(#[case] line: &str) {
    let registry = demo_registry();
    let binders = ParameterBinders::new();
    let route = parse_route(line, &registry, &binders).unwrap();
    let reparsed = parse_route(&route.to_string(), &registry, &binders).unwrap();
    assert_eq!(route, reparsed);
    assert_eq!(route.to_string(), reparsed.to_string());
}

#[test]
fn display_normalizes_declaration_whitespace() {
    let registry = demo_registry();
    let binders = ParameterBinders::new();
    let route = parse_route(
        "GET /foo/:id/bar/:slug demo::Pages.another(String    id ,i32 slug   )",
        &registry,
        &binders,
    )
    .unwrap();
    assert_eq!(
        route.to_string(),
        "GET /foo/:id/bar/:slug demo::Pages.another( String id, i32 slug )"
    );
}
