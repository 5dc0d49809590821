// crates/rpc-expose-router/src/router.rs
//
// Dispatch planning: decide whether a (resource, procedure) call may be
// dispatched, which action it invokes, how it is classified, and which
// parameter families it accepts. No request is parsed or executed here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use rpc_expose_core::{
    info, normalize, Capabilities, Entity, ProcedureDescriptor, Resource, RpcMethod, RPC_SECTION,
};

use crate::domain::{external_name, Domain};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a call cannot be dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    #[error("Action `{action}` of resource `{resource}` is not exposed")]
    NotExposed { resource: String, action: String },

    #[error("Action `{action}` of resource `{resource}` must be called through procedure `{procedure}`")]
    UseDeclaredProcedure {
        resource: String,
        action: String,
        procedure: String,
    },

    #[error("Procedure `{procedure}` of resource `{resource}` is declared but could not be read")]
    UnreadableProcedure { resource: String, procedure: String },

    #[error("Procedure `{procedure}` does not accept {capability} parameters")]
    CapabilityDisabled {
        procedure: String,
        capability: &'static str,
    },

    #[error("Procedure `{procedure}` may not load relationship `{relationship}`")]
    RelationshipNotAllowed {
        procedure: String,
        relationship: String,
    },

    #[error("Procedure `{procedure}` is a {actual}, not a {expected}")]
    MethodMismatch {
        procedure: String,
        expected: RpcMethod,
        actual: RpcMethod,
    },
}

// ---------------------------------------------------------------------------
// Plans
// ---------------------------------------------------------------------------

/// Which parameter families a call uses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallShape {
    /// Classification the caller expects, if it declared one.
    #[serde(default)]
    pub expected_method: Option<RpcMethod>,
    #[serde(default)]
    pub filter: bool,
    #[serde(default)]
    pub sort: bool,
    #[serde(default)]
    pub select: bool,
    #[serde(default)]
    pub page: bool,
    /// Relationships the call asks to load.
    #[serde(default)]
    pub load: Vec<String>,
}

/// The router's decision for one call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchPlan {
    /// Internal resource name.
    pub resource: String,
    /// Name the resource is exposed under.
    pub external_resource: String,
    /// External procedure name.
    pub procedure: String,
    /// Resource action to invoke.
    pub action: String,
    pub method: RpcMethod,
    pub capabilities: Capabilities,
    /// True when no procedure was declared and the action was called directly.
    pub implicit: bool,
}

impl DispatchPlan {
    /// Reject a call that uses a parameter family this procedure disables.
    pub fn check(&self, call: &CallShape) -> Result<(), RouteError> {
        if let Some(expected) = call.expected_method {
            if expected != self.method {
                return Err(RouteError::MethodMismatch {
                    procedure: self.procedure.clone(),
                    expected,
                    actual: self.method,
                });
            }
        }

        let caps = &self.capabilities;
        let gates = [
            (call.filter, caps.filter, "filter"),
            (call.sort, caps.sort, "sort"),
            (call.select, caps.select, "select"),
            (call.page, caps.page, "pagination"),
        ];
        for (used, enabled, capability) in gates {
            if used && !enabled {
                return Err(RouteError::CapabilityDisabled {
                    procedure: self.procedure.clone(),
                    capability,
                });
            }
        }

        if let Some(rel) = call.load.iter().find(|rel| !caps.relationships.contains(*rel)) {
            return Err(RouteError::RelationshipNotAllowed {
                procedure: self.procedure.clone(),
                relationship: rel.clone(),
            });
        }

        Ok(())
    }
}

/// One declared procedure, as listed for introspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    /// Internal resource name.
    pub resource: String,
    /// Name the resource is exposed under.
    pub external_resource: String,
    pub procedure: String,
    pub action: String,
    pub method: RpcMethod,
    /// Whether the procedure's action currently passes the exposure gate.
    pub exposed: bool,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Plans dispatches against a [`Domain`].
#[derive(Debug, Clone)]
pub struct Router {
    domain: Domain,
}

impl Router {
    pub fn new(domain: Domain) -> Self {
        Self { domain }
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Plan a call to `procedure` on the resource referenced by
    /// `resource_ref` (external alias or internal name).
    ///
    /// A declared procedure is matched by external name. Without one, the
    /// procedure name is taken as an action name, unless a declared
    /// procedure already targets that action or an unreadable entry carries
    /// that name. In both cases the action must pass the exposure gate.
    pub fn plan(&self, resource_ref: &str, procedure: &str) -> Result<DispatchPlan, RouteError> {
        let resource = self
            .domain
            .resolve(resource_ref)
            .ok_or_else(|| RouteError::UnknownResource(resource_ref.to_string()))?;

        let (descriptor, implicit) = match info::find_procedure(resource, procedure) {
            Some(desc) => (desc.clone(), false),
            None => (implicit_procedure(resource, procedure)?, true),
        };

        let action = descriptor.action().to_string();
        if !info::is_exposed(resource, &action) {
            tracing::warn!(
                resource = %resource.name(),
                procedure = %procedure,
                action = %action,
                "Refusing dispatch of unexposed action"
            );
            return Err(RouteError::NotExposed {
                resource: resource.name().to_string(),
                action,
            });
        }

        let method = info::resolve_method(resource, &descriptor);
        tracing::debug!(
            resource = %resource.name(),
            procedure = %procedure,
            action = %action,
            method = %method,
            implicit,
            "Planned dispatch"
        );

        Ok(DispatchPlan {
            resource: resource.name().to_string(),
            external_resource: external_name(resource).to_string(),
            procedure: descriptor.name.clone(),
            action,
            method,
            capabilities: descriptor.capabilities(),
            implicit,
        })
    }

    /// Plan and check a call in one step.
    pub fn plan_call(
        &self,
        resource_ref: &str,
        procedure: &str,
        call: &CallShape,
    ) -> Result<DispatchPlan, RouteError> {
        let plan = self.plan(resource_ref, procedure)?;
        plan.check(call)?;
        Ok(plan)
    }

    /// Every declared procedure in the domain, resource by resource.
    pub fn routes(&self) -> Vec<RouteEntry> {
        self.domain.iter().flat_map(resource_routes).collect()
    }
}

/// Descriptor for a bare action call. Refused when it would sidestep the
/// limits of a declared procedure.
fn implicit_procedure(
    resource: &Resource,
    name: &str,
) -> Result<ProcedureDescriptor, RouteError> {
    if let Some(declared) = info::procedures(resource)
        .into_iter()
        .find(|desc| desc.action() == name)
    {
        tracing::warn!(
            resource = %resource.name(),
            action = %name,
            procedure = %declared.name,
            "Refusing direct call of an action behind a declared procedure"
        );
        return Err(RouteError::UseDeclaredProcedure {
            resource: resource.name().to_string(),
            action: name.to_string(),
            procedure: declared.name.clone(),
        });
    }

    let unreadable = resource
        .entities(RPC_SECTION)
        .unwrap_or_default()
        .iter()
        .any(|entity| match entity {
            Entity::Unrecognized(raw) => ["name", "action"]
                .iter()
                .any(|key| raw.get(*key).and_then(|v| v.as_str()) == Some(name)),
            Entity::Procedure(_) => false,
        });
    if unreadable {
        tracing::warn!(
            resource = %resource.name(),
            procedure = %name,
            "Refusing call matching an unreadable procedure entry"
        );
        return Err(RouteError::UnreadableProcedure {
            resource: resource.name().to_string(),
            procedure: name.to_string(),
        });
    }

    Ok(normalize(ProcedureDescriptor::new(name)))
}

fn resource_routes(resource: &Resource) -> Vec<RouteEntry> {
    let external = external_name(resource);
    info::procedures(resource)
        .into_iter()
        .map(|desc| RouteEntry {
            resource: resource.name().to_string(),
            external_resource: external.to_string(),
            procedure: desc.name.clone(),
            action: desc.action().to_string(),
            method: info::resolve_method(resource, desc),
            exposed: info::is_exposed(resource, desc.action()),
        })
        .collect()
}
