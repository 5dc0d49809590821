// crates/rpc-expose-core/src/transform.rs
//
// Definition-time transforms applied to each procedure descriptor exactly
// once, while a resource is being built.

use crate::error::ExposeError;
use crate::procedure::ProcedureDescriptor;

/// Fill an unset `action` with the procedure's `name`.
///
/// Descriptors that already carry an action are returned unchanged.
pub fn normalize(mut descriptor: ProcedureDescriptor) -> ProcedureDescriptor {
    if descriptor.action.is_none() {
        descriptor.action = Some(descriptor.name.clone());
    }
    descriptor
}

/// A definition-time rewrite of a procedure descriptor.
///
/// Transformers run in order during `ResourceBuilder::build`; any error
/// aborts the build.
pub trait Transformer: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn transform(&self, descriptor: ProcedureDescriptor) -> Result<ProcedureDescriptor, ExposeError>;
}

/// Defaults `action` to `name`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAction;

impl Transformer for DefaultAction {
    fn name(&self) -> &'static str {
        "default_action"
    }

    fn transform(&self, descriptor: ProcedureDescriptor) -> Result<ProcedureDescriptor, ExposeError> {
        Ok(normalize(descriptor))
    }
}

/// The transformer pipeline used by the builder and the manifest loader.
pub fn default_transformers() -> Vec<Box<dyn Transformer>> {
    vec![Box::new(DefaultAction)]
}

/// Run `descriptor` through every transformer in order.
pub fn apply_transformers(
    transformers: &[Box<dyn Transformer>],
    descriptor: ProcedureDescriptor,
) -> Result<ProcedureDescriptor, ExposeError> {
    transformers.iter().try_fold(descriptor, |desc, transformer| {
        tracing::trace!(
            transformer = transformer.name(),
            procedure = %desc.name,
            "Applying procedure transformer"
        );
        transformer.transform(desc)
    })
}
