// crates/rpc-expose-cli/src/commands/procedures.rs
//
// `rpc-expose procedures <resource>` — list the procedures declared on one
// resource with their effective method and capabilities.

use serde::Serialize;
use tabled::Tabled;

use rpc_expose_core::{info, ProcedureDescriptor, Resource};
use rpc_expose_router::Router;

use crate::commands::lookup;
use crate::output::{format_json, format_table, yes_no, OutputFormat};

/// A row in the procedures table.
#[derive(Tabled)]
struct ProcedureRow {
    #[tabled(rename = "Procedure")]
    name: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Method")]
    method: String,
    #[tabled(rename = "Exposed")]
    exposed: String,
    #[tabled(rename = "Filter")]
    filter: String,
    #[tabled(rename = "Sort")]
    sort: String,
    #[tabled(rename = "Select")]
    select: String,
    #[tabled(rename = "Page")]
    page: String,
    #[tabled(rename = "Metadata")]
    metadata: String,
    #[tabled(rename = "Relationships")]
    relationships: String,
}

impl ProcedureRow {
    fn new(resource: &Resource, desc: &ProcedureDescriptor) -> Self {
        let relationships = desc
            .relationships
            .as_ref()
            .map(|set| set.iter().cloned().collect::<Vec<_>>().join(", "))
            .unwrap_or_else(|| "-".to_string());

        Self {
            name: desc.name.clone(),
            action: desc.action().to_string(),
            method: info::resolve_method(resource, desc).to_string(),
            exposed: yes_no(info::is_exposed(resource, desc.action())),
            filter: yes_no(desc.filterable),
            sort: yes_no(desc.sortable),
            select: yes_no(desc.selectable),
            page: yes_no(desc.paginatable),
            metadata: yes_no(desc.includes_metadata()),
            relationships,
        }
    }
}

/// Descriptor plus its resolved classification, for JSON output.
#[derive(Serialize)]
struct ProcedureJson<'a> {
    #[serde(flatten)]
    descriptor: &'a ProcedureDescriptor,
    resolved_method: rpc_expose_core::RpcMethod,
    exposed: bool,
}

/// Run the procedures command.
pub fn run(
    router: &Router,
    resource_ref: &str,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let resource = lookup(router, resource_ref)?;
    let procedures = info::procedures(resource);

    match format {
        OutputFormat::Json => {
            let items: Vec<ProcedureJson<'_>> = procedures
                .iter()
                .map(|desc| ProcedureJson {
                    descriptor: desc,
                    resolved_method: info::resolve_method(resource, desc),
                    exposed: info::is_exposed(resource, desc.action()),
                })
                .collect();
            println!("{}", format_json(&items));
        }
        OutputFormat::Table => {
            if procedures.is_empty() {
                println!("Resource `{}` declares no procedures.", resource.name());
                return Ok(());
            }
            let rows: Vec<ProcedureRow> = procedures
                .iter()
                .map(|desc| ProcedureRow::new(resource, desc))
                .collect();
            println!("{}", format_table(&rows));
        }
    }

    Ok(())
}
