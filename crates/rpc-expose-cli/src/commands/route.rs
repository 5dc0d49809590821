// crates/rpc-expose-cli/src/commands/route.rs
//
// `rpc-expose route <resource> <procedure>` — show the dispatch plan the
// router would produce, optionally checked against a call shape.

use clap::Args;

use rpc_expose_core::RpcMethod;
use rpc_expose_router::{CallShape, DispatchPlan, Router};

use crate::output::{format_json, yes_no, OutputFormat};

/// Arguments for the route command.
#[derive(Debug, Args)]
pub struct RouteCmd {
    /// Resource name or external alias.
    pub resource: String,

    /// External procedure name, or an action name.
    pub procedure: String,

    /// The call expects this classification.
    #[arg(long, value_parser = parse_method)]
    pub expect: Option<RpcMethod>,

    /// The call uses filter parameters.
    #[arg(long)]
    pub filter: bool,

    /// The call uses sort parameters.
    #[arg(long)]
    pub sort: bool,

    /// The call uses field selection.
    #[arg(long)]
    pub select: bool,

    /// The call uses pagination.
    #[arg(long)]
    pub page: bool,

    /// Relationship to load (repeatable).
    #[arg(long = "load")]
    pub load: Vec<String>,
}

impl RouteCmd {
    fn call_shape(&self) -> CallShape {
        CallShape {
            expected_method: self.expect,
            filter: self.filter,
            sort: self.sort,
            select: self.select,
            page: self.page,
            load: self.load.clone(),
        }
    }
}

fn parse_method(s: &str) -> Result<RpcMethod, String> {
    s.parse()
}

/// Run the route command.
pub fn run(
    router: &Router,
    cmd: &RouteCmd,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let plan = router.plan_call(&cmd.resource, &cmd.procedure, &cmd.call_shape())?;

    match format {
        OutputFormat::Json => println!("{}", format_json(&plan)),
        OutputFormat::Table => print_plan(&plan),
    }

    Ok(())
}

fn print_plan(plan: &DispatchPlan) {
    let caps = &plan.capabilities;
    println!("Resource:      {} (exposed as {})", plan.resource, plan.external_resource);
    println!(
        "Procedure:     {}{}",
        plan.procedure,
        if plan.implicit { " (implicit)" } else { "" }
    );
    println!("Action:        {}", plan.action);
    println!("Method:        {}", plan.method);
    println!("Filter:        {}", yes_no(caps.filter));
    println!("Sort:          {}", yes_no(caps.sort));
    println!("Select:        {}", yes_no(caps.select));
    println!("Page:          {}", yes_no(caps.page));
    println!("Metadata:      {}", yes_no(caps.metadata));
    if caps.relationships.is_empty() {
        println!("Relationships: -");
    } else {
        let rels: Vec<&str> = caps.relationships.iter().map(String::as_str).collect();
        println!("Relationships: {}", rels.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_shape_from_flags() {
        let cmd = RouteCmd {
            resource: "posts".to_string(),
            procedure: "listPosts".to_string(),
            expect: Some(RpcMethod::Query),
            filter: true,
            sort: false,
            select: false,
            page: true,
            load: vec!["author".to_string()],
        };
        let shape = cmd.call_shape();
        assert_eq!(shape.expected_method, Some(RpcMethod::Query));
        assert!(shape.filter && shape.page);
        assert!(!shape.sort);
        assert_eq!(shape.load, vec!["author".to_string()]);
    }

    #[test]
    fn test_parse_method_flag() {
        assert_eq!(parse_method("mutation"), Ok(RpcMethod::Mutation));
        assert!(parse_method("write").is_err());
    }
}
