// crates/rpc-expose-core/src/resource.rs
//
// The constructed, per-resource configuration object.
//
// A Resource carries its declared actions, a set of named configuration
// sections (options + entities), and the lightweight RPC opt-in flag. It is
// built once by `ResourceBuilder` or the manifest loader and is immutable
// afterwards.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::procedure::{ProcedureDescriptor, RpcMethod};

/// Name of the section holding the RPC exposure configuration.
pub const RPC_SECTION: &str = "rpc";

/// Option keys within the RPC section.
pub const EXPOSE_OPTION: &str = "expose";
pub const RESOURCE_NAME_OPTION: &str = "resource_name";
pub const METHODS_OPTION: &str = "methods";

/// Kind of a resource action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Read,
    Create,
    Update,
    Destroy,
    /// Generic action with no fixed semantics.
    #[default]
    Action,
}

impl ActionKind {
    /// Classification implied by the action kind alone.
    pub fn implied_method(&self) -> RpcMethod {
        match self {
            ActionKind::Read => RpcMethod::Query,
            _ => RpcMethod::Mutation,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Read => "read",
            ActionKind::Create => "create",
            ActionKind::Update => "update",
            ActionKind::Destroy => "destroy",
            ActionKind::Action => "action",
        }
    }
}

/// An action declared on a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDef {
    pub name: String,
    #[serde(default)]
    pub kind: ActionKind,
}

/// Which actions are exposed: every action, or an explicit set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expose {
    All,
    Only(BTreeSet<String>),
}

impl Expose {
    /// Build an explicit action set.
    pub fn only<I, S>(actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Expose::Only(actions.into_iter().map(Into::into).collect())
    }

    pub fn allows(&self, action: &str) -> bool {
        match self {
            Expose::All => true,
            Expose::Only(actions) => actions.contains(action),
        }
    }

    /// Interpret a raw option value.
    ///
    /// Accepts the string `"all"` or an array of strings. Anything else is
    /// malformed and yields `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if s == "all" => Some(Expose::All),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<BTreeSet<_>>>()
                .map(Expose::Only),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Expose::All => Value::String("all".to_string()),
            Expose::Only(actions) => {
                Value::Array(actions.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

impl Serialize for Expose {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Expose {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Expose::from_value(&value).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "expected \"all\" or a list of action names, got {}",
                value
            ))
        })
    }
}

/// A declared entry in a configuration section.
///
/// Sections may hold entries of several shapes; readers pick out the ones
/// they understand.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entity {
    Procedure(ProcedureDescriptor),
    /// An entry that did not match any known shape. Kept verbatim.
    Unrecognized(Value),
}

impl Entity {
    pub fn as_procedure(&self) -> Option<&ProcedureDescriptor> {
        match self {
            Entity::Procedure(desc) => Some(desc),
            Entity::Unrecognized(_) => None,
        }
    }
}

/// A named configuration section: scalar options plus declared entities.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Section {
    pub(crate) options: BTreeMap<String, Value>,
    pub(crate) entities: Vec<Entity>,
}

impl Section {
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    pub fn options(&self) -> &BTreeMap<String, Value> {
        &self.options
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }
}

/// A resource and its declarative configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    pub(crate) name: String,
    pub(crate) actions: Vec<ActionDef>,
    pub(crate) sections: BTreeMap<String, Section>,
    /// Lightweight opt-in, independent of the RPC section.
    pub(crate) opt_in: Option<Expose>,
}

impl Resource {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn actions(&self) -> &[ActionDef] {
        &self.actions
    }

    pub fn action(&self, name: &str) -> Option<&ActionDef> {
        self.actions.iter().find(|a| a.name == name)
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Look up one option of a named section.
    ///
    /// `None` covers both "resource has no such section" and "section has no
    /// such option".
    pub fn option(&self, section: &str, key: &str) -> Option<&Value> {
        self.section(section)?.option(key)
    }

    /// All entities declared in a named section, if the section exists.
    pub fn entities(&self, section: &str) -> Option<&[Entity]> {
        self.section(section).map(Section::entities)
    }

    pub fn opt_in(&self) -> Option<&Expose> {
        self.opt_in.as_ref()
    }
}
