//! Many resources, one policy.

use tracing::debug;

use super::error::ConfigError;
use super::module::CrudModule;
use super::resource_name::ResourceName;

/// Stamps out [`CrudModule`]s sharing one base configuration.
///
/// Each created module is an independent copy: reconfiguring it leaves the
/// factory and its siblings untouched. Hooks and the HTTP client are shared
/// by reference, since they are immutable.
#[derive(Debug, Clone)]
pub struct CrudModuleFactory {
    base: CrudModule,
}

impl CrudModuleFactory {
    pub fn new(base: CrudModule) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &CrudModule {
        &self.base
    }

    pub fn create(&self, resource: &str) -> Result<CrudModule, ConfigError> {
        let name = ResourceName::new(resource)?;
        debug!(from = %self.base.resource().original, to = %name.original, "Cloning module");
        Ok(self.base.clone().renamed(name))
    }
}
