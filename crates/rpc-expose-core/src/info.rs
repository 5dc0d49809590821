// crates/rpc-expose-core/src/info.rs
//
// Read-only metadata queries over a resource's RPC configuration.
//
// Every query here is fail-soft: a resource without an `rpc` section, or with
// a malformed option value, yields `None` / `false` / an empty list. Nothing
// in this module returns an error.

use serde_json::Value;

use crate::procedure::{ProcedureDescriptor, RpcMethod};
use crate::resource::{
    Entity, Expose, Resource, EXPOSE_OPTION, METHODS_OPTION, RESOURCE_NAME_OPTION, RPC_SECTION,
};

/// Action-name prefixes that classify as queries when nothing else decides.
const QUERY_PREFIXES: &[&str] = &["get", "list", "read", "fetch", "find", "search", "count"];

/// The declared `expose` option.
pub fn expose(resource: &Resource) -> Option<Expose> {
    let value = resource.option(RPC_SECTION, EXPOSE_OPTION)?;
    let parsed = Expose::from_value(value);
    if parsed.is_none() {
        tracing::debug!(
            resource = %resource.name(),
            value = %value,
            "Ignoring malformed expose option"
        );
    }
    parsed
}

/// The external alias of the resource, if one is declared.
pub fn resource_name(resource: &Resource) -> Option<&str> {
    resource
        .option(RPC_SECTION, RESOURCE_NAME_OPTION)
        .and_then(Value::as_str)
}

/// Whether `action` may be dispatched as a procedure.
pub fn is_exposed(resource: &Resource, action: &str) -> bool {
    match expose(resource) {
        Some(expose) => expose.allows(action),
        None => false,
    }
}

/// Explicit query/mutation override for `action`.
pub fn method_override(resource: &Resource, action: &str) -> Option<RpcMethod> {
    resource
        .option(RPC_SECTION, METHODS_OPTION)
        .and_then(Value::as_object)
        .and_then(|methods| methods.get(action))
        .and_then(RpcMethod::from_value)
}

/// All procedure descriptors declared on the resource, in declaration order.
pub fn procedures(resource: &Resource) -> Vec<&ProcedureDescriptor> {
    resource
        .entities(RPC_SECTION)
        .unwrap_or_default()
        .iter()
        .filter_map(Entity::as_procedure)
        .collect()
}

/// The procedure whose external name is `name`.
pub fn find_procedure<'a>(resource: &'a Resource, name: &str) -> Option<&'a ProcedureDescriptor> {
    resource
        .entities(RPC_SECTION)?
        .iter()
        .filter_map(Entity::as_procedure)
        .find(|desc| desc.name == name)
}

// ---------------------------------------------------------------------------
// Opt-in flag
// ---------------------------------------------------------------------------

/// The lightweight opt-in declared on the resource.
pub fn opt_in(resource: &Resource) -> Option<&Expose> {
    resource.opt_in()
}

pub fn is_opted_in(resource: &Resource) -> bool {
    resource.opt_in().is_some()
}

/// Whether the opt-in flag covers `action`.
pub fn opt_in_allows(resource: &Resource, action: &str) -> bool {
    resource.opt_in().is_some_and(|expose| expose.allows(action))
}

// ---------------------------------------------------------------------------
// Method resolution
// ---------------------------------------------------------------------------

/// Effective classification of a procedure.
///
/// Order: the resource's `methods` override for the procedure's action, the
/// descriptor's own `method`, the kind of the declared action, then the
/// action name's prefix.
pub fn resolve_method(resource: &Resource, procedure: &ProcedureDescriptor) -> RpcMethod {
    let action = procedure.action();

    if let Some(method) = method_override(resource, action) {
        return method;
    }
    if let Some(method) = procedure.method {
        return method;
    }
    if let Some(def) = resource.action(action) {
        return def.kind.implied_method();
    }
    method_from_name(action)
}

/// Classify by naming convention: query-like prefixes are queries.
///
/// The prefix is matched case-insensitively and must be the whole name or be
/// followed by `_` or an uppercase letter, so `get_post`, `getPost` and
/// `GetPost` are queries while `getaway` is not.
pub fn method_from_name(action: &str) -> RpcMethod {
    let lower = action.to_ascii_lowercase();
    let is_query = QUERY_PREFIXES.iter().any(|prefix| {
        lower == *prefix
            || (lower.starts_with(prefix)
                && action
                    .get(prefix.len()..)
                    .and_then(|rest| rest.chars().next())
                    .is_some_and(|c| c == '_' || c.is_ascii_uppercase()))
    });

    if is_query {
        RpcMethod::Query
    } else {
        RpcMethod::Mutation
    }
}
