// crates/rpc-expose-core/src/manifest.rs
//
// TOML manifest format for declaring resources and their RPC exposure.
//
// Example:
//
//   [[resources]]
//   name = "post"
//   actions = [{ name = "read", kind = "read" }, { name = "create", kind = "create" }]
//
//   [resources.rpc]
//   expose = "all"
//   resource_name = "posts"
//   methods = { create = "mutation" }
//
//   [[resources.rpc.procedures]]
//   name = "listPosts"
//   action = "read"
//
// Option values under `[resources.rpc]` are stored raw; a malformed value is
// not a load error; the accessors simply ignore it.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::builder::ResourceBuilder;
use crate::error::ExposeError;
use crate::procedure::ProcedureDescriptor;
use crate::resource::{
    ActionDef, Entity, Expose, Resource, EXPOSE_OPTION, METHODS_OPTION, RESOURCE_NAME_OPTION,
};

/// A parsed manifest file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub resources: Vec<ResourceManifest>,
}

/// One `[[resources]]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceManifest {
    pub name: String,
    #[serde(default)]
    pub actions: Vec<ActionDef>,
    /// Lightweight opt-in: `"all"` or a list of action names.
    #[serde(default)]
    pub opt_in: Option<Expose>,
    #[serde(default)]
    pub rpc: Option<RpcManifest>,
}

/// The `[resources.rpc]` table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RpcManifest {
    #[serde(default)]
    pub expose: Option<Value>,
    #[serde(default)]
    pub resource_name: Option<Value>,
    #[serde(default)]
    pub methods: Option<Value>,
    #[serde(default)]
    pub procedures: Vec<Value>,
}

impl Manifest {
    /// Load a manifest from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ExposeError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let manifest = Self::from_toml_str(&contents)?;
        tracing::info!(
            "Loaded manifest {} ({} resources)",
            path.display(),
            manifest.resources.len()
        );
        Ok(manifest)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ExposeError> {
        Ok(toml::from_str(contents)?)
    }

    /// Build every declared resource, in file order.
    pub fn into_resources(self) -> Result<Vec<Resource>, ExposeError> {
        self.resources
            .into_iter()
            .map(|r| r.into_builder().build())
            .collect()
    }
}

impl ResourceManifest {
    /// Translate this table into builder calls.
    pub fn into_builder(self) -> ResourceBuilder {
        let mut builder = ResourceBuilder::new(self.name.clone()).actions(self.actions);

        if let Some(opt_in) = self.opt_in {
            builder = builder.opt_in(opt_in);
        }

        let Some(rpc) = self.rpc else {
            return builder;
        };

        let resource = self.name;
        builder.rpc(move |mut section| {
            if let Some(expose) = rpc.expose {
                section = section.raw_option(EXPOSE_OPTION, expose);
            }
            if let Some(name) = rpc.resource_name {
                section = section.raw_option(RESOURCE_NAME_OPTION, name);
            }
            if let Some(methods) = rpc.methods {
                section = section.raw_option(METHODS_OPTION, methods);
            }
            for entry in rpc.procedures {
                section = match serde_json::from_value::<ProcedureDescriptor>(entry.clone()) {
                    Ok(desc) => section.procedure(desc),
                    Err(e) => {
                        tracing::warn!(
                            resource = %resource,
                            "Skipping procedure entry that is not a descriptor: {}",
                            e
                        );
                        section.entity(Entity::Unrecognized(entry))
                    }
                };
            }
            section
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info;
    use crate::procedure::RpcMethod;

    const BLOG: &str = r#"
[[resources]]
name = "post"
actions = [
    { name = "read", kind = "read" },
    { name = "create", kind = "create" },
    { name = "archive_post" },
]

[resources.rpc]
expose = "all"
resource_name = "posts"
methods = { create_post = "mutation", get_post = "query" }

[[resources.rpc.procedures]]
name = "listPosts"
method = "query"
relationships = ["author"]

[[resources.rpc.procedures]]
name = "createPost"
action = "create"
filterable = false

[[resources]]
name = "user"
opt_in = ["read"]

[resources.rpc]
expose = ["read", "register_with_password"]

[[resources]]
name = "audit_log"
"#;

    /// Temporary file path that will not collide between test runs.
    fn temp_manifest_path(label: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!(
            "rpc_expose_test_{}_{}.toml",
            label,
            uuid::Uuid::now_v7()
        ))
    }

    #[test]
    fn test_parse_and_build_blog_manifest() {
        let resources = Manifest::from_toml_str(BLOG).unwrap().into_resources().unwrap();
        assert_eq!(resources.len(), 3);

        let post = &resources[0];
        assert_eq!(info::expose(post), Some(Expose::All));
        assert_eq!(info::resource_name(post), Some("posts"));
        assert_eq!(
            info::method_override(post, "create_post"),
            Some(RpcMethod::Mutation)
        );
        assert_eq!(info::method_override(post, "archive_post"), None);

        let list = info::find_procedure(post, "listPosts").unwrap();
        assert_eq!(list.action.as_deref(), Some("listPosts"));
        assert!(list.allows_relationship("author"));

        let create = info::find_procedure(post, "createPost").unwrap();
        assert_eq!(create.action.as_deref(), Some("create"));
        assert!(!create.filterable);
        assert!(create.sortable);

        let user = &resources[1];
        assert!(info::is_exposed(user, "read"));
        assert!(!info::is_exposed(user, "update"));
        assert!(info::opt_in_allows(user, "read"));

        let audit = &resources[2];
        assert_eq!(info::expose(audit), None);
        assert!(info::procedures(audit).is_empty());
    }

    #[test]
    fn test_malformed_options_load_but_fail_soft() {
        let manifest = r#"
[[resources]]
name = "post"

[resources.rpc]
expose = 12
resource_name = ["posts"]
methods = { get_post = "read" }
"#;
        let resources = Manifest::from_toml_str(manifest).unwrap().into_resources().unwrap();
        let post = &resources[0];
        assert_eq!(info::expose(post), None);
        assert!(!info::is_exposed(post, "get_post"));
        assert_eq!(info::resource_name(post), None);
        assert_eq!(info::method_override(post, "get_post"), None);
    }

    #[test]
    fn test_non_descriptor_entries_are_skipped() {
        let manifest = r#"
[[resources]]
name = "post"

[resources.rpc]
expose = "all"

[[resources.rpc.procedures]]
topic = "post_updates"

[[resources.rpc.procedures]]
name = "getPost"
method = "fetch"

[[resources.rpc.procedures]]
name = "listPosts"
"#;
        let resources = Manifest::from_toml_str(manifest).unwrap().into_resources().unwrap();
        let post = &resources[0];
        let names: Vec<_> = info::procedures(post).iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["listPosts"]);
        assert_eq!(post.entities(crate::resource::RPC_SECTION).unwrap().len(), 3);
    }

    #[test]
    fn test_duplicate_procedure_fails_build() {
        let manifest = r#"
[[resources]]
name = "post"

[[resources.rpc.procedures]]
name = "listPosts"

[[resources.rpc.procedures]]
name = "listPosts"
action = "read"
"#;
        let err = Manifest::from_toml_str(manifest)
            .unwrap()
            .into_resources()
            .unwrap_err();
        assert!(matches!(err, ExposeError::DuplicateProcedure { .. }));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = Manifest::from_toml_str("[[resources]\nname = ").unwrap_err();
        assert!(matches!(err, ExposeError::Config(_)));
    }

    #[test]
    fn test_invalid_opt_in_is_config_error() {
        let err = Manifest::from_toml_str("[[resources]]\nname = \"post\"\nopt_in = 3\n").unwrap_err();
        assert!(matches!(err, ExposeError::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let path = temp_manifest_path("load");
        std::fs::write(&path, BLOG).unwrap();

        let manifest = Manifest::load(&path).unwrap();
        assert_eq!(manifest.resources.len(), 3);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = Manifest::load(temp_manifest_path("missing")).unwrap_err();
        assert!(matches!(err, ExposeError::Io(_)));
    }
}
