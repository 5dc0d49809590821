// crates/rpc-expose-cli/src/commands/mod.rs
//
// Command module declarations for the rpc-expose CLI.

pub mod check;
pub mod procedures;
pub mod resources;
pub mod route;

use rpc_expose_core::Resource;
use rpc_expose_router::Router;
use thiserror::Error;

/// Errors raised by CLI commands themselves.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Unknown resource: {0}")]
    UnknownResource(String),
}

/// Resolve a resource reference (alias or name) or fail.
pub fn lookup<'a>(router: &'a Router, reference: &str) -> Result<&'a Resource, CliError> {
    router
        .domain()
        .resolve(reference)
        .ok_or_else(|| CliError::UnknownResource(reference.to_string()))
}
