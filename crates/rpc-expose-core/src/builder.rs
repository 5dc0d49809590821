// crates/rpc-expose-core/src/builder.rs
//
// Explicit registration step for resources.
//
// `ResourceBuilder` collects a resource's actions and configuration sections,
// then `build()` validates identifiers, runs the procedure transformer
// pipeline exactly once per descriptor, and rejects duplicate procedure names.

use std::collections::{BTreeMap, HashSet};

use serde_json::{Map, Value};

use crate::error::ExposeError;
use crate::procedure::{ProcedureDescriptor, RpcMethod};
use crate::resource::{
    ActionDef, ActionKind, Entity, Expose, Resource, Section, EXPOSE_OPTION, METHODS_OPTION,
    RESOURCE_NAME_OPTION, RPC_SECTION,
};
use crate::transform::{self, Transformer};

// ---------------------------------------------------------------------------
// RpcSectionBuilder
// ---------------------------------------------------------------------------

/// Typed writer for the `rpc` section of a resource.
#[derive(Debug, Clone, Default)]
pub struct RpcSectionBuilder {
    section: Section,
}

impl RpcSectionBuilder {
    /// Which actions may be dispatched as procedures.
    pub fn expose(mut self, expose: Expose) -> Self {
        self.section
            .options
            .insert(EXPOSE_OPTION.to_string(), expose.to_value());
        self
    }

    /// External alias for the resource.
    pub fn resource_name(mut self, name: impl Into<String>) -> Self {
        self.section
            .options
            .insert(RESOURCE_NAME_OPTION.to_string(), Value::String(name.into()));
        self
    }

    /// Override the classification of one action.
    pub fn method(mut self, action: impl Into<String>, method: RpcMethod) -> Self {
        let entry = self
            .section
            .options
            .entry(METHODS_OPTION.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        if let Value::Object(methods) = entry {
            methods.insert(action.into(), Value::String(method.as_str().to_string()));
        }
        self
    }

    /// Declare a procedure.
    pub fn procedure(mut self, descriptor: ProcedureDescriptor) -> Self {
        self.section.entities.push(Entity::Procedure(descriptor));
        self
    }

    /// Store a raw option value without interpretation.
    pub fn raw_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.section.options.insert(key.into(), value);
        self
    }

    /// Store an arbitrary entity.
    pub fn entity(mut self, entity: Entity) -> Self {
        self.section.entities.push(entity);
        self
    }
}

// ---------------------------------------------------------------------------
// ResourceBuilder
// ---------------------------------------------------------------------------

/// Builds an immutable [`Resource`].
pub struct ResourceBuilder {
    name: String,
    actions: Vec<ActionDef>,
    sections: BTreeMap<String, Section>,
    opt_in: Option<Expose>,
    transformers: Vec<Box<dyn Transformer>>,
}

impl std::fmt::Debug for ResourceBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceBuilder")
            .field("name", &self.name)
            .field("actions", &self.actions)
            .field("sections", &self.sections.keys().collect::<Vec<_>>())
            .field("transformers", &self.transformers.len())
            .finish()
    }
}

impl ResourceBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            actions: Vec::new(),
            sections: BTreeMap::new(),
            opt_in: None,
            transformers: transform::default_transformers(),
        }
    }

    /// Declare an action on the resource.
    pub fn action(mut self, name: impl Into<String>, kind: ActionKind) -> Self {
        self.actions.push(ActionDef {
            name: name.into(),
            kind,
        });
        self
    }

    /// Declare several actions at once.
    pub fn actions<I>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = ActionDef>,
    {
        self.actions.extend(actions);
        self
    }

    /// Set the lightweight opt-in flag.
    pub fn opt_in(mut self, expose: Expose) -> Self {
        self.opt_in = Some(expose);
        self
    }

    /// Configure the `rpc` section. Calling this marks the resource as a
    /// participant even if the closure sets nothing.
    pub fn rpc<F>(mut self, configure: F) -> Self
    where
        F: FnOnce(RpcSectionBuilder) -> RpcSectionBuilder,
    {
        let existing = self.sections.remove(RPC_SECTION).unwrap_or_default();
        let configured = configure(RpcSectionBuilder { section: existing });
        self.sections.insert(RPC_SECTION.to_string(), configured.section);
        self
    }

    /// Set an option in an arbitrary section.
    pub fn section_option(
        mut self,
        section: impl Into<String>,
        key: impl Into<String>,
        value: Value,
    ) -> Self {
        self.sections
            .entry(section.into())
            .or_default()
            .options
            .insert(key.into(), value);
        self
    }

    /// Add an entity to an arbitrary section.
    pub fn section_entity(mut self, section: impl Into<String>, entity: Entity) -> Self {
        self.sections
            .entry(section.into())
            .or_default()
            .entities
            .push(entity);
        self
    }

    /// Replace the procedure transformer pipeline.
    pub fn with_transformers(mut self, transformers: Vec<Box<dyn Transformer>>) -> Self {
        self.transformers = transformers;
        self
    }

    /// Validate and freeze the resource.
    pub fn build(self) -> Result<Resource, ExposeError> {
        if self.name.trim().is_empty() {
            return Err(ExposeError::EmptyIdentifier("resource name".to_string()));
        }
        if let Some(action) = self.actions.iter().find(|a| a.name.trim().is_empty()) {
            return Err(ExposeError::EmptyIdentifier(format!(
                "{} action on resource `{}`",
                action.kind.as_str(),
                self.name
            )));
        }

        let mut sections = BTreeMap::new();
        for (section_name, section) in self.sections {
            let mut seen = HashSet::new();
            let mut entities = Vec::with_capacity(section.entities.len());

            for entity in section.entities {
                let desc = match entity {
                    Entity::Procedure(desc) => desc,
                    other => {
                        entities.push(other);
                        continue;
                    }
                };

                if desc.name.trim().is_empty() {
                    return Err(ExposeError::EmptyIdentifier(format!(
                        "procedure name on resource `{}`",
                        self.name
                    )));
                }
                if desc.action.as_deref().is_some_and(|a| a.trim().is_empty()) {
                    return Err(ExposeError::EmptyIdentifier(format!(
                        "action of procedure `{}` on resource `{}`",
                        desc.name, self.name
                    )));
                }
                if !seen.insert(desc.name.clone()) {
                    return Err(ExposeError::DuplicateProcedure {
                        resource: self.name.clone(),
                        name: desc.name,
                    });
                }

                let desc = transform::apply_transformers(&self.transformers, desc)?;

                if !self.actions.is_empty() && !self.actions.iter().any(|a| a.name == desc.action()) {
                    tracing::warn!(
                        resource = %self.name,
                        procedure = %desc.name,
                        action = %desc.action(),
                        "Procedure targets an action the resource does not declare"
                    );
                }

                entities.push(Entity::Procedure(desc));
            }

            sections.insert(
                section_name,
                Section {
                    options: section.options,
                    entities,
                },
            );
        }

        tracing::debug!(
            resource = %self.name,
            actions = self.actions.len(),
            sections = sections.len(),
            "Built resource"
        );

        Ok(Resource {
            name: self.name,
            actions: self.actions,
            sections,
            opt_in: self.opt_in,
        })
    }
}
