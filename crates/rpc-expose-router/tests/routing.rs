// crates/rpc-expose-router/tests/routing.rs
//
// Integration tests for dispatch planning over a domain built from both a
// TOML manifest and the builder API.

use rpc_expose_core::{
    ActionKind, Expose, Manifest, ProcedureDescriptor, ResourceBuilder, RpcMethod,
};
use rpc_expose_router::{CallShape, Domain, RouteError, Router};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const MANIFEST: &str = r#"
[[resources]]
name = "post"
actions = [
    { name = "read", kind = "read" },
    { name = "create", kind = "create" },
    { name = "archive_post", kind = "update" },
]

[resources.rpc]
expose = ["read", "create", "listPosts"]
resource_name = "posts"
methods = { archive_post = "mutation" }

[[resources.rpc.procedures]]
name = "listPosts"
method = "query"
paginatable = true
relationships = ["author"]

[[resources.rpc.procedures]]
name = "createPost"
action = "create"
filterable = false
sortable = false

[[resources.rpc.procedures]]
name = "archivePost"
action = "archive_post"

[[resources]]
name = "user"
opt_in = "all"
"#;

fn blog_router() -> Router {
    let manifest = Manifest::from_toml_str(MANIFEST).unwrap();
    Router::new(Domain::from_manifest(manifest).unwrap())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn test_declared_procedure_plan() {
    let router = blog_router();
    let plan = router.plan("posts", "listPosts").unwrap();

    assert_eq!(plan.resource, "post");
    assert_eq!(plan.external_resource, "posts");
    assert_eq!(plan.action, "listPosts");
    assert_eq!(plan.method, RpcMethod::Query);
    assert!(!plan.implicit);
    assert!(plan.capabilities.relationships.contains("author"));
}

#[test]
fn test_procedure_with_explicit_action() {
    let router = blog_router();
    let plan = router.plan("post", "createPost").unwrap();

    assert_eq!(plan.action, "create");
    // Action kind decides when no override or descriptor method exists.
    assert_eq!(plan.method, RpcMethod::Mutation);
    assert!(!plan.capabilities.filter);
    assert!(plan.capabilities.select);
}

#[test]
fn test_declared_procedure_still_needs_exposure() {
    let router = blog_router();
    let err = router.plan("posts", "archivePost").unwrap_err();
    assert_eq!(
        err,
        RouteError::NotExposed {
            resource: "post".to_string(),
            action: "archive_post".to_string(),
        }
    );
}

#[test]
fn test_implicit_procedure_for_exposed_action() {
    let router = blog_router();
    let plan = router.plan("posts", "read").unwrap();

    assert!(plan.implicit);
    assert_eq!(plan.action, "read");
    assert_eq!(plan.method, RpcMethod::Query);
}

#[test]
fn test_unknown_resource_and_unexposed_action() {
    let router = blog_router();
    assert_eq!(
        router.plan("comments", "read").unwrap_err(),
        RouteError::UnknownResource("comments".to_string())
    );
    assert!(matches!(
        router.plan("posts", "destroy"),
        Err(RouteError::NotExposed { .. })
    ));
}

#[test]
fn test_opt_in_does_not_open_the_gate() {
    let router = blog_router();
    let user = router.domain().resource("user").unwrap();
    assert!(rpc_expose_core::info::is_opted_in(user));
    assert!(matches!(
        router.plan("user", "read"),
        Err(RouteError::NotExposed { .. })
    ));
}

#[test]
fn test_plan_call_gates_capabilities() {
    let router = blog_router();

    let filtered = CallShape {
        filter: true,
        ..CallShape::default()
    };
    assert!(router.plan_call("posts", "listPosts", &filtered).is_ok());
    assert!(matches!(
        router.plan_call("posts", "createPost", &filtered),
        Err(RouteError::CapabilityDisabled { capability: "filter", .. })
    ));

    let loads_comments = CallShape {
        load: vec!["comments".to_string()],
        ..CallShape::default()
    };
    assert!(matches!(
        router.plan_call("posts", "listPosts", &loads_comments),
        Err(RouteError::RelationshipNotAllowed { .. })
    ));
}

#[test]
fn test_action_behind_declared_procedure_is_not_callable_directly() {
    let router = blog_router();
    let filtered = CallShape {
        filter: true,
        ..CallShape::default()
    };

    let expected = RouteError::UseDeclaredProcedure {
        resource: "post".to_string(),
        action: "create".to_string(),
        procedure: "createPost".to_string(),
    };
    assert_eq!(
        router.plan_call("posts", "create", &filtered).unwrap_err(),
        expected
    );
    assert_eq!(router.plan("posts", "create").unwrap_err(), expected);
    // The declared procedure still applies its own limits.
    assert!(matches!(
        router.plan_call("posts", "createPost", &filtered),
        Err(RouteError::CapabilityDisabled { capability: "filter", .. })
    ));
}

#[test]
fn test_unreadable_procedure_entry_is_not_callable() {
    let manifest = Manifest::from_toml_str(
        r#"
[[resources]]
name = "post"
actions = [{ name = "read", kind = "read" }]

[resources.rpc]
expose = "all"

[[resources.rpc.procedures]]
name = "getPost"
action = "read"
method = "fetch"
filterable = false
"#,
    )
    .unwrap();
    let router = Router::new(Domain::from_manifest(manifest).unwrap());

    assert_eq!(
        router.plan("post", "getPost").unwrap_err(),
        RouteError::UnreadableProcedure {
            resource: "post".to_string(),
            procedure: "getPost".to_string(),
        }
    );
    assert!(matches!(
        router.plan("post", "read"),
        Err(RouteError::UnreadableProcedure { .. })
    ));
    // Names no entry mentions still fall back to the action.
    assert!(router.plan("post", "publish").unwrap().implicit);
}

#[test]
fn test_routes_listing() {
    let router = blog_router();
    let routes = router.routes();

    let summary: Vec<_> = routes
        .iter()
        .map(|r| (r.procedure.as_str(), r.method, r.exposed))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("listPosts", RpcMethod::Query, true),
            ("createPost", RpcMethod::Mutation, true),
            ("archivePost", RpcMethod::Mutation, false),
        ]
    );
    // Same naming as DispatchPlan: internal name plus external alias.
    assert!(routes
        .iter()
        .all(|r| r.resource == "post" && r.external_resource == "posts"));
}

#[test]
fn test_builder_domain_with_expose_all() {
    let post = ResourceBuilder::new("post")
        .action("read", ActionKind::Read)
        .action("publish", ActionKind::Update)
        .rpc(|rpc| {
            rpc.expose(Expose::All)
                .method("publish", RpcMethod::Mutation)
                .procedure(ProcedureDescriptor::new("getPost").with_action("read"))
        })
        .build()
        .unwrap();
    let router = Router::new(Domain::builder().resource(post).build().unwrap());

    assert_eq!(router.plan("post", "getPost").unwrap().method, RpcMethod::Query);
    assert_eq!(router.plan("post", "publish").unwrap().method, RpcMethod::Mutation);
    // Expose-all admits actions the resource never declared.
    let plan = router.plan("post", "searchPosts").unwrap();
    assert!(plan.implicit);
    assert_eq!(plan.method, RpcMethod::Query);
}

#[test]
fn test_demo_manifest_loads() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/blog.toml");
    let domain = Domain::from_manifest(Manifest::load(path).unwrap()).unwrap();
    assert_eq!(domain.len(), 3);

    let router = Router::new(domain);
    let plan = router.plan("posts", "listPosts").unwrap();
    assert_eq!(plan.action, "read");
    assert!(plan.capabilities.metadata);
    assert_eq!(router.plan("posts", "archivePost").unwrap().method, RpcMethod::Mutation);
}
