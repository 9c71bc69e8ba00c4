use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{ConfigError, ConfigResult};
use crate::service::ServiceConfig;

/// Holds one [`ServiceConfig`] per registered service, keyed by name.
///
/// Reads and writes never cross an `.await`, so a plain `std::sync::RwLock`
/// is the right tool here; reaching for `tokio::sync::RwLock` would add an
/// async dependency this leaf crate has no use for.
#[derive(Default)]
pub struct ServiceRegistry {
    services: RwLock<HashMap<String, Arc<ServiceConfig>>>,
}

impl ServiceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `config`. Rejects a second registration under the same
    /// name rather than silently overwriting it.
    pub fn register(&self, config: ServiceConfig) -> ConfigResult<()> {
        let mut services = self.services.write().expect("service registry lock poisoned");
        if services.contains_key(&config.name) {
            return Err(ConfigError::DuplicateService { name: config.name });
        }
        services.insert(config.name.clone(), Arc::new(config));
        Ok(())
    }

    pub fn get(&self, name: &str) -> ConfigResult<Arc<ServiceConfig>> {
        self.services
            .read()
            .expect("service registry lock poisoned")
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownService { name: name.to_string() })
    }

    #[must_use]
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .services
            .read()
            .expect("service registry lock poisoned")
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}
