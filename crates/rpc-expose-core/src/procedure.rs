// crates/rpc-expose-core/src/procedure.rs
//
// Procedure descriptors: one exposed remote procedure per descriptor,
// mapping an external name onto a resource action.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// RPC classification of a procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RpcMethod {
    /// Read-only procedure.
    Query,
    /// State-changing procedure.
    Mutation,
}

impl RpcMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RpcMethod::Query => "query",
            RpcMethod::Mutation => "mutation",
        }
    }

    /// Interpret a raw configuration value as a method.
    ///
    /// Only the exact strings `"query"` and `"mutation"` are accepted.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        match value.as_str()? {
            "query" => Some(RpcMethod::Query),
            "mutation" => Some(RpcMethod::Mutation),
            _ => None,
        }
    }
}

impl fmt::Display for RpcMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RpcMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "query" => Ok(RpcMethod::Query),
            "mutation" => Ok(RpcMethod::Mutation),
            other => Err(format!("Unknown RPC method: {}", other)),
        }
    }
}

/// Which response metadata a procedure includes.
///
/// Either a plain on/off flag or an explicit set of metadata field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataSelection {
    Flag(bool),
    Fields(BTreeSet<String>),
}

impl MetadataSelection {
    /// Whether any metadata is included in responses.
    pub fn is_enabled(&self) -> bool {
        match self {
            MetadataSelection::Flag(enabled) => *enabled,
            MetadataSelection::Fields(fields) => !fields.is_empty(),
        }
    }
}

/// Describes one remote procedure exposed by a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureDescriptor {
    /// External-facing procedure name. Unique within the owning resource.
    pub name: String,
    /// Resource action to invoke. Filled from `name` during normalization.
    #[serde(default)]
    pub action: Option<String>,
    /// Explicit classification; unset defers to the resolution policy.
    #[serde(default)]
    pub method: Option<RpcMethod>,
    /// Response metadata selection.
    #[serde(default)]
    pub metadata: Option<MetadataSelection>,
    /// Whether filter parameters are accepted.
    #[serde(default = "default_enabled")]
    pub filterable: bool,
    /// Whether sort parameters are accepted.
    #[serde(default = "default_enabled")]
    pub sortable: bool,
    /// Whether field-selection parameters are accepted.
    #[serde(default = "default_enabled")]
    pub selectable: bool,
    /// Whether pagination parameters are accepted.
    #[serde(default = "default_enabled")]
    pub paginatable: bool,
    /// Relationships that may be loaded. Unset means none.
    #[serde(default)]
    pub relationships: Option<BTreeSet<String>>,
}

fn default_enabled() -> bool {
    true
}

impl ProcedureDescriptor {
    /// Create a descriptor with the given external name and default flags.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            action: None,
            method: None,
            metadata: None,
            filterable: default_enabled(),
            sortable: default_enabled(),
            selectable: default_enabled(),
            paginatable: default_enabled(),
            relationships: None,
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_method(mut self, method: RpcMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn with_metadata(mut self, metadata: MetadataSelection) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn filterable(mut self, enabled: bool) -> Self {
        self.filterable = enabled;
        self
    }

    pub fn sortable(mut self, enabled: bool) -> Self {
        self.sortable = enabled;
        self
    }

    pub fn selectable(mut self, enabled: bool) -> Self {
        self.selectable = enabled;
        self
    }

    pub fn paginatable(mut self, enabled: bool) -> Self {
        self.paginatable = enabled;
        self
    }

    /// Allow loading the given relationships.
    pub fn with_relationships<I, S>(mut self, relationships: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relationships = Some(relationships.into_iter().map(Into::into).collect());
        self
    }

    /// The action this procedure invokes.
    ///
    /// Falls back to `name` for descriptors that have not been normalized yet,
    /// so callers see the same answer before and after the transform.
    pub fn action(&self) -> &str {
        self.action.as_deref().unwrap_or(&self.name)
    }

    pub fn includes_metadata(&self) -> bool {
        self.metadata.as_ref().is_some_and(MetadataSelection::is_enabled)
    }

    pub fn allows_relationship(&self, relationship: &str) -> bool {
        self.relationships
            .as_ref()
            .is_some_and(|set| set.contains(relationship))
    }

    /// Snapshot of the parameter families this procedure accepts.
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            metadata: self.includes_metadata(),
            filter: self.filterable,
            sort: self.sortable,
            select: self.selectable,
            page: self.paginatable,
            relationships: self.relationships.clone().unwrap_or_default(),
        }
    }
}

/// Parameter families accepted by a procedure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub metadata: bool,
    pub filter: bool,
    pub sort: bool,
    pub select: bool,
    pub page: bool,
    pub relationships: BTreeSet<String>,
}
