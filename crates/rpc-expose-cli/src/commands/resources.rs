// crates/rpc-expose-cli/src/commands/resources.rs
//
// `rpc-expose resources` — list every resource in the manifest with its
// exposure summary.

use serde::Serialize;
use tabled::Tabled;

use rpc_expose_core::{info, Expose, Resource};
use rpc_expose_router::{external_name, Router};

use crate::output::{format_json, format_table, OutputFormat};

/// A row in the resources table.
#[derive(Debug, Serialize, Tabled)]
pub struct ResourceRow {
    #[tabled(rename = "Resource")]
    pub name: String,
    #[tabled(rename = "External")]
    pub external: String,
    #[tabled(rename = "Expose")]
    pub expose: String,
    #[tabled(rename = "Opt-in")]
    pub opt_in: String,
    #[tabled(rename = "Procedures")]
    pub procedures: usize,
}

impl ResourceRow {
    pub fn from_resource(resource: &Resource) -> Self {
        Self {
            name: resource.name().to_string(),
            external: external_name(resource).to_string(),
            expose: describe_expose(info::expose(resource).as_ref()),
            opt_in: describe_expose(info::opt_in(resource)),
            procedures: info::procedures(resource).len(),
        }
    }
}

/// Human-readable form of an exposure setting.
pub fn describe_expose(expose: Option<&Expose>) -> String {
    match expose {
        None => "-".to_string(),
        Some(Expose::All) => "all".to_string(),
        Some(Expose::Only(actions)) => actions.iter().cloned().collect::<Vec<_>>().join(", "),
    }
}

/// Run the resources command.
pub fn run(router: &Router, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let rows: Vec<ResourceRow> = router.domain().iter().map(ResourceRow::from_resource).collect();

    match format {
        OutputFormat::Json => println!("{}", format_json(&rows)),
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("No resources declared.");
            } else {
                println!("{}", format_table(&rows));
            }
        }
    }

    Ok(())
}
