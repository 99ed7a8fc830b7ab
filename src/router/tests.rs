use super::{Params, RouteError, Router};
use http::Method;

fn resolve<'r>(router: &'r Router<&'static str>, method: Method, path: &str) -> Option<&'r &'static str> {
    let mut params = Params::new();
    router.resolve(&method, path, &mut params)
}

#[test]
fn test_root_path() {
    let mut router = Router::new();
    router.add_route(Method::GET, "/", "root").unwrap();
    assert_eq!(resolve(&router, Method::GET, "/"), Some(&"root"));
    assert_eq!(resolve(&router, Method::GET, "/x"), None);
}

#[test]
fn test_pattern_must_start_with_slash() {
    let mut router: Router<&str> = Router::new();
    let err = router.add_route(Method::GET, "users", "x").unwrap_err();
    assert_eq!(err, RouteError::InvalidPath { path: "users".into() });
    assert_eq!(err.path(), "users");
    assert!(router.is_empty());
}

#[test]
fn test_methods_are_isolated() {
    let mut router = Router::new();
    router.add_route(Method::GET, "/items/:id", "get").unwrap();
    router.add_route(Method::POST, "/items", "create").unwrap();

    assert_eq!(resolve(&router, Method::GET, "/items/1"), Some(&"get"));
    assert_eq!(resolve(&router, Method::POST, "/items/1"), None);
    assert_eq!(resolve(&router, Method::POST, "/items"), Some(&"create"));
    assert_eq!(resolve(&router, Method::GET, "/items"), None);
    assert_eq!(resolve(&router, Method::DELETE, "/items/1"), None);
}

#[test]
fn test_same_pattern_on_two_methods() {
    let mut router = Router::new();
    router.add_route(Method::GET, "/a", "get").unwrap();
    router.add_route(Method::PUT, "/a", "put").unwrap();
    assert_eq!(resolve(&router, Method::PUT, "/a"), Some(&"put"));
    assert_eq!(router.methods().count(), 2);
}

#[test]
fn test_routes_listed_in_registration_order() {
    let mut router = Router::new();
    router.add_route(Method::GET, "/b", "b").unwrap();
    router.add_route(Method::POST, "/a", "a").unwrap();
    assert!(router.add_route(Method::GET, "/b", "dup").is_err());

    let listed: Vec<(String, &str)> = router
        .routes()
        .iter()
        .map(|r| (r.method.to_string(), r.pattern.as_str()))
        .collect();
    assert_eq!(listed, [("GET".to_string(), "/b"), ("POST".to_string(), "/a")]);
    assert_eq!(router.len(), 2);
}

#[test]
fn test_error_display() {
    let mut router: Router<&str> = Router::new();
    router.add_route(Method::GET, "/users/:id", "x").unwrap();
    let err = router.add_route(Method::GET, "/users/:name", "y").unwrap_err();
    let message = err.to_string();
    assert!(message.contains(":name"), "{}", message);
    assert!(message.contains(":id"), "{}", message);
    assert_eq!(err.path(), "/users/:name");
}

#[test]
fn test_route_list_holds_values_once() {
    let mut router = Router::new();
    router.add_route(Method::GET, "/users/:id", "show").unwrap();
    router.add_route(Method::GET, "/users", "index").unwrap();
    router.add_route(Method::DELETE, "/users/:id", "remove").unwrap();

    let values: Vec<&str> = router.routes().iter().map(|r| r.value).collect();
    assert_eq!(values, ["show", "index", "remove"]);

    // Lookups hand back the value stored in the route list
    let mut params = Params::new();
    let found = router.resolve(&Method::DELETE, "/users/9", &mut params);
    assert!(std::ptr::eq(found.unwrap(), &router.routes()[2].value));
    // The tree stores the position of "/users" in the list
    assert_eq!(router.tree(&Method::GET).and_then(|t| t.value()), Some(&1));
}
