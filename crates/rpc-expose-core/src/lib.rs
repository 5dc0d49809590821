// crates/rpc-expose-core/src/lib.rs
//
// rpc-expose-core: declarative RPC exposure metadata for resources.
//
// Defines procedure descriptors, the per-resource configuration object and
// its builder, the one-shot normalization transform, the fail-soft metadata
// accessors, and the TOML manifest loader. This is the leaf crate that the
// router and CLI depend on.

pub mod builder;
pub mod error;
pub mod info;
pub mod manifest;
pub mod procedure;
pub mod resource;
pub mod transform;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use rpc_expose_core::ProcedureDescriptor;`

// Procedure types
pub use procedure::{Capabilities, MetadataSelection, ProcedureDescriptor, RpcMethod};

// Resource types
pub use resource::{ActionDef, ActionKind, Entity, Expose, Resource, Section, RPC_SECTION};

// Builder
pub use builder::{ResourceBuilder, RpcSectionBuilder};

// Transforms
pub use transform::{normalize, DefaultAction, Transformer};

// Manifest
pub use manifest::Manifest;

// Error type
pub use error::ExposeError;
