// crates/rpc-expose-router/src/lib.rs
//
// rpc-expose-router: resource registry and dispatch planning.
//
// Consults the rpc-expose-core metadata accessors to decide whether a call
// may be dispatched and how it is interpreted. Transport, request parsing
// and execution belong to the host application.

pub mod domain;
pub mod router;

pub use domain::{external_name, Domain, DomainBuilder};
pub use router::{CallShape, DispatchPlan, RouteEntry, RouteError, Router};
