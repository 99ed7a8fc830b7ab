use http::Method;
use rum::router::{Params, RouteError, Router};

fn verb_zoo() -> Router<&'static str> {
    let routes = [
        (Method::GET, "/", "root_handler"),
        (Method::GET, "/zoo/animals", "get_animals"),
        (Method::POST, "/zoo/animals", "create_animal"),
        (Method::GET, "/zoo/animals/:id", "get_animal"),
        (Method::PUT, "/zoo/animals/:id", "update_animal"),
        (Method::PATCH, "/zoo/animals/:id", "patch_animal"),
        (Method::DELETE, "/zoo/animals/:id", "delete_animal"),
        (Method::GET, "/zoo/animals/:id/keepers/:keeper", "get_keeper"),
        (Method::HEAD, "/zoo/health", "health_check"),
        (Method::OPTIONS, "/zoo/health", "supported_ops"),
        (Method::TRACE, "/zoo/health", "trace_route"),
        (Method::GET, "/zoo/files/*path", "zoo_files"),
    ];
    let mut router = Router::new();
    for (method, pattern, handler) in routes {
        router
            .add_route(method, pattern, handler)
            .unwrap_or_else(|e| panic!("failed to add {}: {}", pattern, e));
    }
    router
}

fn assert_route_match(router: &Router<&'static str>, method: Method, path: &str, expected_handler: &str) {
    let mut params = Params::new();
    match router.resolve(&method, path, &mut params) {
        Some(handler) => {
            println!("✅ {} {} → {} | params: {:?}", method, path, handler, params);
            assert_eq!(
                *handler, expected_handler,
                "Handler mismatch for {} {}: expected '{}', got '{}'",
                method, path, expected_handler, handler
            );
        }
        None => {
            println!("❌ {} {} → no match", method, path);
            assert_eq!(
                expected_handler, "<none>",
                "Expected route to match for {} {}",
                method, path
            );
        }
    }
}

#[test]
fn test_router_get_animals() {
    assert_route_match(&verb_zoo(), Method::GET, "/zoo/animals", "get_animals");
}

#[test]
fn test_router_post_animals() {
    assert_route_match(&verb_zoo(), Method::POST, "/zoo/animals", "create_animal");
}

#[test]
fn test_router_verbs_on_animal_by_id() {
    let router = verb_zoo();
    assert_route_match(&router, Method::GET, "/zoo/animals/123", "get_animal");
    assert_route_match(&router, Method::PUT, "/zoo/animals/123", "update_animal");
    assert_route_match(&router, Method::PATCH, "/zoo/animals/123", "patch_animal");
    assert_route_match(&router, Method::DELETE, "/zoo/animals/123", "delete_animal");
    assert_route_match(&router, Method::POST, "/zoo/animals/123", "<none>");
}

#[test]
fn test_router_health_verbs() {
    let router = verb_zoo();
    assert_route_match(&router, Method::HEAD, "/zoo/health", "health_check");
    assert_route_match(&router, Method::OPTIONS, "/zoo/health", "supported_ops");
    assert_route_match(&router, Method::TRACE, "/zoo/health", "trace_route");
    assert_route_match(&router, Method::GET, "/zoo/health", "<none>");
}

#[test]
fn test_router_unknown_path() {
    let router = verb_zoo();
    assert_route_match(&router, Method::GET, "/unknown", "<none>");
    assert_route_match(&router, Method::GET, "/zoo", "<none>");
    assert_route_match(&router, Method::GET, "/zoo/animals/1/keepers", "<none>");
    assert_route_match(&router, Method::GET, "/zoo/animals/", "<none>");
}

#[test]
fn test_router_root_path() {
    assert_route_match(&verb_zoo(), Method::GET, "/", "root_handler");
}

#[test]
fn test_router_nested_params_and_catch_all() {
    let router = verb_zoo();
    let mut params = Params::new();
    assert_eq!(
        router.resolve(&Method::GET, "/zoo/animals/7/keepers/amy", &mut params),
        Some(&"get_keeper")
    );
    assert_eq!(params.get("id"), Some("7"));
    assert_eq!(params.get("keeper"), Some("amy"));

    params.clear();
    assert_eq!(
        router.resolve(&Method::GET, "/zoo/files/maps/north.png", &mut params),
        Some(&"zoo_files")
    );
    assert_eq!(params.get("path"), Some("maps/north.png"));
}

/// Replace every `:name` / `*name` with a concrete value.
fn substitute(pattern: &str) -> String {
    pattern
        .split('/')
        .map(|segment| {
            if let Some(name) = segment.strip_prefix(':') {
                format!("v-{}", name)
            } else if let Some(name) = segment.strip_prefix('*') {
                format!("rest/of/{}", name)
            } else if let Some(pos) = segment.find(':') {
                format!("{}v-{}", &segment[..pos], &segment[pos + 1..])
            } else {
                segment.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

const GITHUB_API: &[&str] = &[
    "/authorizations",
    "/authorizations/:id",
    "/applications/:client_id/tokens/:access_token",
    "/events",
    "/repos/:owner/:repo/events",
    "/networks/:owner/:repo/events",
    "/orgs/:org/events",
    "/users/:user/received_events",
    "/users/:user/received_events/public",
    "/users/:user/events",
    "/users/:user/events/public",
    "/users/:user/events/orgs/:org",
    "/feeds",
    "/notifications",
    "/repos/:owner/:repo/notifications",
    "/notifications/threads/:id",
    "/notifications/threads/:id/subscription",
    "/repos/:owner/:repo/stargazers",
    "/users/:user/starred",
    "/user/starred",
    "/user/starred/:owner/:repo",
    "/repos/:owner/:repo/subscribers",
    "/users/:user/subscriptions",
    "/user/subscriptions",
    "/repos/:owner/:repo/subscription",
    "/user/subscriptions/:owner/:repo",
    "/users/:user/gists",
    "/gists",
    "/gists/:id",
    "/gists/:id/star",
    "/repos/:owner/:repo/git/blobs/:sha",
    "/repos/:owner/:repo/git/commits/:sha",
    "/repos/:owner/:repo/git/refs",
    "/repos/:owner/:repo/git/tags/:sha",
    "/repos/:owner/:repo/git/trees/:sha",
    "/issues",
    "/user/issues",
    "/orgs/:org/issues",
    "/repos/:owner/:repo/issues",
    "/repos/:owner/:repo/issues/:number",
    "/repos/:owner/:repo/assignees",
    "/repos/:owner/:repo/assignees/:assignee",
    "/repos/:owner/:repo/issues/:number/comments",
    "/repos/:owner/:repo/issues/:number/events",
    "/repos/:owner/:repo/labels",
    "/repos/:owner/:repo/labels/:name",
    "/repos/:owner/:repo/issues/:number/labels",
    "/repos/:owner/:repo/milestones/:number/labels",
    "/repos/:owner/:repo/milestones",
    "/repos/:owner/:repo/milestones/:number",
    "/emojis",
    "/gitignore/templates",
    "/gitignore/templates/:name",
    "/meta",
    "/rate_limit",
    "/users/:user/orgs",
    "/user/orgs",
    "/orgs/:org",
    "/orgs/:org/members",
    "/orgs/:org/members/:user",
    "/orgs/:org/public_members",
    "/orgs/:org/public_members/:user",
    "/orgs/:org/teams",
    "/teams/:id",
    "/teams/:id/members",
    "/teams/:id/members/:user",
    "/teams/:id/repos",
    "/teams/:id/repos/:owner/:repo",
    "/user/teams",
    "/repos/:owner/:repo/pulls",
    "/repos/:owner/:repo/pulls/:number",
    "/repos/:owner/:repo/pulls/:number/commits",
    "/repos/:owner/:repo/pulls/:number/files",
    "/repos/:owner/:repo/pulls/:number/merge",
    "/repos/:owner/:repo/pulls/:number/comments",
    "/user/repos",
    "/users/:user/repos",
    "/orgs/:org/repos",
    "/repositories",
    "/repos/:owner/:repo",
    "/repos/:owner/:repo/contributors",
    "/repos/:owner/:repo/languages",
    "/repos/:owner/:repo/teams",
    "/repos/:owner/:repo/tags",
    "/repos/:owner/:repo/branches",
    "/repos/:owner/:repo/branches/:branch",
    "/repos/:owner/:repo/collaborators",
    "/repos/:owner/:repo/collaborators/:user",
    "/repos/:owner/:repo/comments",
    "/repos/:owner/:repo/commits/:sha/comments",
    "/repos/:owner/:repo/comments/:id",
    "/repos/:owner/:repo/commits",
    "/repos/:owner/:repo/commits/:sha",
    "/repos/:owner/:repo/readme",
    "/repos/:owner/:repo/keys",
    "/repos/:owner/:repo/keys/:id",
    "/repos/:owner/:repo/downloads",
    "/repos/:owner/:repo/downloads/:id",
    "/repos/:owner/:repo/forks",
    "/repos/:owner/:repo/hooks",
    "/repos/:owner/:repo/hooks/:id",
    "/repos/:owner/:repo/releases",
    "/repos/:owner/:repo/releases/:id",
    "/repos/:owner/:repo/releases/:id/assets",
    "/repos/:owner/:repo/stats/contributors",
    "/repos/:owner/:repo/stats/commit_activity",
    "/repos/:owner/:repo/stats/code_frequency",
    "/repos/:owner/:repo/stats/participation",
    "/repos/:owner/:repo/stats/punch_card",
    "/repos/:owner/:repo/statuses/:ref",
    "/search/repositories",
    "/search/code",
    "/search/issues",
    "/search/users",
    "/legacy/issues/search/:owner/:repository/:state/:keyword",
    "/legacy/repos/search/:keyword",
    "/legacy/user/search/:keyword",
    "/legacy/user/email/:email",
    "/users/:user",
    "/user",
    "/users",
    "/user/emails",
    "/users/:user/followers",
    "/user/followers",
    "/users/:user/following",
    "/user/following",
    "/user/following/:user",
    "/users/:user/following/:target_user",
    "/users/:user/keys",
    "/user/keys",
    "/user/keys/:id",
    "/static/*filepath",
];

#[test]
fn test_every_registered_pattern_resolves() {
    let mut router = Router::new();
    for pattern in GITHUB_API {
        router.add_route(Method::GET, pattern, *pattern).unwrap();
    }

    let mut params = Params::new();
    for pattern in GITHUB_API {
        let path = substitute(pattern);
        params.clear();
        let found = router.resolve(&Method::GET, &path, &mut params);
        assert_eq!(found, Some(pattern), "{} (from {})", path, pattern);

        let expected: Vec<String> = pattern
            .split('/')
            .filter_map(|s| {
                s.strip_prefix(':')
                    .map(|n| format!("v-{}", n))
                    .or_else(|| s.strip_prefix('*').map(|n| format!("rest/of/{}", n)))
            })
            .collect();
        let captured: Vec<&str> = params.iter().map(|p| p.value.as_str()).collect();
        assert_eq!(captured, expected, "captures for {}", path);
    }
}

#[test]
fn test_static_sibling_of_param_wins() {
    let mut router = Router::new();
    for pattern in GITHUB_API {
        router.add_route(Method::GET, pattern, *pattern).unwrap();
    }
    let mut params = Params::new();
    // "/user/keys" is static while "/users/:user/keys" needs a param
    assert_eq!(router.resolve(&Method::GET, "/user/keys", &mut params), Some(&"/user/keys"));
    assert!(params.is_empty());
    assert_eq!(
        router.resolve(&Method::GET, "/users/keys", &mut params),
        Some(&"/users/:user")
    );
    assert_eq!(params.get("user"), Some("keys"));
}

#[test]
fn test_registration_errors_are_reported() {
    let mut router = Router::new();
    router.add_route(Method::GET, "/users/:id", "a").unwrap();

    let err = router.add_route(Method::GET, "/users/:id", "b").unwrap_err();
    assert!(matches!(err, RouteError::DuplicateRoute { .. }));

    let err = router.add_route(Method::GET, "/users/:name/posts", "c").unwrap_err();
    assert!(matches!(err, RouteError::WildcardConflict { .. }));

    let err = router.add_route(Method::GET, "no-slash", "d").unwrap_err();
    assert!(matches!(err, RouteError::InvalidPath { .. }));

    // Other methods are unaffected by GET's table
    router.add_route(Method::POST, "/users/:name", "e").unwrap();
    assert_eq!(router.len(), 2);
}
