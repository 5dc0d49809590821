// crates/rpc-expose-cli/src/commands/check.rs
//
// `rpc-expose check <resource> <action>` — report how the exposure metadata
// treats one action.

use serde::Serialize;

use rpc_expose_core::{info, RpcMethod};
use rpc_expose_router::Router;

use crate::commands::lookup;
use crate::output::{format_json, yes_no, OutputFormat};

#[derive(Debug, Serialize)]
struct ActionReport {
    resource: String,
    action: String,
    exposed: bool,
    method_override: Option<RpcMethod>,
    opt_in: bool,
    procedures: Vec<String>,
}

/// Run the check command.
pub fn run(
    router: &Router,
    resource_ref: &str,
    action: &str,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let resource = lookup(router, resource_ref)?;

    let report = ActionReport {
        resource: resource.name().to_string(),
        action: action.to_string(),
        exposed: info::is_exposed(resource, action),
        method_override: info::method_override(resource, action),
        opt_in: info::opt_in_allows(resource, action),
        procedures: info::procedures(resource)
            .into_iter()
            .filter(|desc| desc.action() == action)
            .map(|desc| desc.name.clone())
            .collect(),
    };

    match format {
        OutputFormat::Json => println!("{}", format_json(&report)),
        OutputFormat::Table => {
            println!("Resource:        {}", report.resource);
            println!("Action:          {}", report.action);
            println!("Exposed:         {}", yes_no(report.exposed));
            println!(
                "Method override: {}",
                report
                    .method_override
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "-".to_string())
            );
            println!("Opt-in:          {}", yes_no(report.opt_in));
            if report.procedures.is_empty() {
                println!("Procedures:      -");
            } else {
                println!("Procedures:      {}", report.procedures.join(", "));
            }
        }
    }

    Ok(())
}
