// crates/rpc-expose-router/src/domain.rs
//
// Domain: the ordered registry of built resources.
//
// Resources are registered once at startup and looked up by internal name or
// by their external alias (`resource_name` in the rpc section).

use std::collections::HashMap;

use rpc_expose_core::{info, ExposeError, Manifest, Resource};

/// An immutable set of resources.
#[derive(Debug, Clone, Default)]
pub struct Domain {
    resources: Vec<Resource>,
    by_name: HashMap<String, usize>,
    by_external: HashMap<String, usize>,
}

impl Domain {
    pub fn builder() -> DomainBuilder {
        DomainBuilder::default()
    }

    /// Build a domain from every resource declared in a manifest.
    pub fn from_manifest(manifest: Manifest) -> Result<Self, ExposeError> {
        Self::builder().resources(manifest.into_resources()?).build()
    }

    /// Look up a resource by its internal name.
    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.by_name.get(name).map(|&idx| &self.resources[idx])
    }

    /// Resolve a reference from a caller: external alias first, then the
    /// internal name.
    pub fn resolve(&self, reference: &str) -> Option<&Resource> {
        self.by_external
            .get(reference)
            .or_else(|| self.by_name.get(reference))
            .map(|&idx| &self.resources[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// The name callers see for a resource: its alias, or its own name.
pub fn external_name(resource: &Resource) -> &str {
    info::resource_name(resource).unwrap_or_else(|| resource.name())
}

/// Collects resources and checks name collisions.
#[derive(Debug, Default)]
pub struct DomainBuilder {
    resources: Vec<Resource>,
}

impl DomainBuilder {
    pub fn resource(mut self, resource: Resource) -> Self {
        self.resources.push(resource);
        self
    }

    pub fn resources<I>(mut self, resources: I) -> Self
    where
        I: IntoIterator<Item = Resource>,
    {
        self.resources.extend(resources);
        self
    }

    /// Freeze the registry.
    ///
    /// Fails when two resources share a name, two aliases collide, or an alias
    /// shadows another resource's internal name.
    pub fn build(self) -> Result<Domain, ExposeError> {
        let mut by_name = HashMap::new();
        for (idx, resource) in self.resources.iter().enumerate() {
            if by_name.insert(resource.name().to_string(), idx).is_some() {
                return Err(ExposeError::DuplicateResource(resource.name().to_string()));
            }
        }

        let mut by_external = HashMap::new();
        for (idx, resource) in self.resources.iter().enumerate() {
            let Some(alias) = info::resource_name(resource) else {
                continue;
            };
            if by_name.get(alias).is_some_and(|&other| other != idx) {
                return Err(ExposeError::DuplicateResource(format!(
                    "alias `{}` of `{}` shadows another resource",
                    alias,
                    resource.name()
                )));
            }
            if by_external.insert(alias.to_string(), idx).is_some() {
                return Err(ExposeError::DuplicateResource(format!(
                    "alias `{}` used more than once",
                    alias
                )));
            }
        }

        tracing::info!("Domain built with {} resources", self.resources.len());

        Ok(Domain {
            resources: self.resources,
            by_name,
            by_external,
        })
    }
}
