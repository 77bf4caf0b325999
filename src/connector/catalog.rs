use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::{ConnectorRegistry, DatasourceConnector};
use crate::connector::{StreamConnector, TableConnector};
use crate::domain::ConnectorError;

/// Produces a fresh connector instance for one catalog entry.
pub type ConnectorFactory = fn() -> Arc<dyn DatasourceConnector>;

/// Startup configuration naming the connectors to enable, in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_sources")]
    pub sources: Vec<String>,
}

fn default_sources() -> Vec<String> {
    vec![
        TableConnector::TYPE_TAG.to_string(),
        StreamConnector::TYPE_TAG.to_string(),
    ]
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
        }
    }
}

/// Table of named connector factories used to assemble a [`ConnectorRegistry`]
/// at startup.
///
/// The catalog decides what CAN be registered; a [`SourceConfig`] decides what
/// IS. Embedders extend the builtin catalog with their own factories and then
/// build once from configuration:
///
/// ```
/// use quarry::{ConnectorCatalog, SourceConfig};
///
/// let registry = ConnectorCatalog::builtin()
///     .build(&SourceConfig::default())
///     .unwrap();
/// assert!(registry.contains("table"));
/// ```
pub struct ConnectorCatalog {
    factories: IndexMap<String, ConnectorFactory>,
}

impl ConnectorCatalog {
    pub fn new() -> Self {
        Self {
            factories: IndexMap::new(),
        }
    }

    /// Catalog holding every connector shipped with this crate.
    pub fn builtin() -> Self {
        Self::new()
            .register(TableConnector::TYPE_TAG, || Arc::new(TableConnector::new()))
            .register(StreamConnector::TYPE_TAG, || {
                Arc::new(StreamConnector::new())
            })
    }

    /// Adds a factory under `name`, replacing any previous entry.
    pub fn register(mut self, name: impl Into<String>, factory: ConnectorFactory) -> Self {
        self.factories.insert(name.into(), factory);
        self
    }

    /// Registered names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Instantiates the configured connectors and assembles the registry.
    ///
    /// A name the catalog cannot resolve is a startup error, reported as
    /// [`ConnectorError::UnknownDatasourceType`]; nothing is registered
    /// partially.
    pub fn build(&self, config: &SourceConfig) -> Result<ConnectorRegistry, ConnectorError> {
        let mut builder = ConnectorRegistry::builder();
        for name in &config.sources {
            let factory = self
                .factories
                .get(name)
                .ok_or_else(|| ConnectorError::unknown_type(name))?;
            debug!("Enabling datasource connector: {}", name);
            builder = builder.register(factory());
        }
        Ok(builder.build())
    }
}

impl Default for ConnectorCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
