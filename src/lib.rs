pub mod application;
pub mod connector;
pub mod domain;

pub use application::{ConnectorRegistry, DatasourceConnector, DatasourceSession, RegistryBuilder};

pub use connector::{
    ConnectorCatalog, ConnectorFactory, InMemorySession, SourceConfig, StreamConnector,
    TableConnector,
};

pub use domain::{
    Column, ConnectorError, Database, Datasource, DatasourceFilter, DatasourceRelation, Metric,
    SessionError,
};
