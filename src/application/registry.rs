use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::application::{DatasourceConnector, DatasourceSession};
use crate::domain::{
    ConnectorError, Database, Datasource, DatasourceFilter, DatasourceRelation, SessionError,
};

/// Central registry of datasource connectors, keyed by type tag.
///
/// Built once at startup and read-only afterwards; wrap in an [`Arc`] to
/// share across tasks. Iteration follows registration order, which is what
/// the type-agnostic lookups dispatch in.
pub struct ConnectorRegistry {
    sources: IndexMap<String, Arc<dyn DatasourceConnector>>,
}

impl ConnectorRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn get(&self, type_tag: &str) -> Option<Arc<dyn DatasourceConnector>> {
        self.sources.get(type_tag).cloned()
    }

    pub fn contains(&self, type_tag: &str) -> bool {
        self.sources.contains_key(type_tag)
    }

    pub fn type_tags(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    fn source(&self, type_tag: &str) -> Result<&Arc<dyn DatasourceConnector>, ConnectorError> {
        self.sources
            .get(type_tag)
            .ok_or_else(|| ConnectorError::unknown_type(type_tag))
    }

    /// Look up a single datasource of a known type by id.
    ///
    /// Zero matching rows and an ambiguous (more than one row) match are
    /// both reported as [`ConnectorError::DatasourceNotFound`]; no row is
    /// ever picked out of an ambiguous result.
    pub async fn get_datasource(
        &self,
        session: &dyn DatasourceSession,
        type_tag: &str,
        datasource_id: i64,
    ) -> Result<Datasource, ConnectorError> {
        let source = self.source(type_tag)?;
        match session.fetch_by_id(source.table(), datasource_id).await {
            Ok(Some(datasource)) => Ok(datasource),
            Ok(None) | Err(SessionError::AmbiguousId { .. }) => Err(ConnectorError::not_found(
                format!("type '{}' id {}", type_tag, datasource_id),
            )),
            Err(e) => Err(e.into()),
        }
    }

    /// List every datasource across all registered types, each type scoped
    /// by its own default filter, concatenated in registration order.
    pub async fn get_all_datasources(
        &self,
        session: &dyn DatasourceSession,
    ) -> Result<Vec<Datasource>, ConnectorError> {
        let mut datasources = Vec::new();
        for source in self.sources.values() {
            let filter = source.default_filter();
            let mut rows = session.fetch_all(source.table(), &filter).await?;
            datasources.append(&mut rows);
        }
        Ok(datasources)
    }

    /// Find a datasource by id without knowing its type.
    ///
    /// Sequential probe over registered connectors, O(registered types) per
    /// call; acceptable because the set of connector types is small and
    /// static. Returns the first connector whose table yields exactly one
    /// match; a probe yielding zero or ambiguous matches is passed over.
    /// A session failure aborts the scan immediately.
    pub async fn get_datasource_by_id(
        &self,
        session: &dyn DatasourceSession,
        datasource_id: i64,
    ) -> Result<Datasource, ConnectorError> {
        for source in self.sources.values() {
            match session.fetch_by_id(source.table(), datasource_id).await {
                Ok(Some(datasource)) => return Ok(datasource),
                Ok(None) | Err(SessionError::AmbiguousId { .. }) => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(ConnectorError::not_found(format!("id {}", datasource_id)))
    }

    /// Look up a single datasource by name, delegating the matching
    /// semantics entirely to the connector registered under `type_tag`.
    pub async fn get_datasource_by_name(
        &self,
        session: &dyn DatasourceSession,
        type_tag: &str,
        name: &str,
        schema: Option<&str>,
        database_name: &str,
    ) -> Result<Option<Datasource>, ConnectorError> {
        let source = self.source(type_tag)?;
        source
            .get_datasource_by_name(session, name, schema, database_name)
            .await
    }

    /// List the datasources of `database`'s type that the supplied
    /// permission decision grants access to: rows owned by `database` whose
    /// `perm` is in `permissions` or whose `schema_perm` is in
    /// `schema_perms`.
    pub async fn query_datasources_by_permissions(
        &self,
        session: &dyn DatasourceSession,
        database: &Database,
        permissions: &HashSet<String>,
        schema_perms: &HashSet<String>,
    ) -> Result<Vec<Datasource>, ConnectorError> {
        let source = self.source(&database.type_tag)?;
        let filter = DatasourceFilter::new()
            .with_database_id(database.id)
            .with_permissions(permissions.clone(), schema_perms.clone());
        Ok(session.fetch_all(source.table(), &filter).await?)
    }

    /// Like [`ConnectorRegistry::get_datasource`], but with the `columns`
    /// and `metrics` relations loaded in the same session round trip.
    pub async fn get_eager_datasource(
        &self,
        session: &dyn DatasourceSession,
        type_tag: &str,
        datasource_id: i64,
    ) -> Result<Datasource, ConnectorError> {
        let source = self.source(type_tag)?;
        let relations = [DatasourceRelation::Columns, DatasourceRelation::Metrics];
        match session
            .fetch_eager_by_id(source.table(), datasource_id, &relations)
            .await
        {
            Ok(Some(datasource)) => Ok(datasource),
            Ok(None) | Err(SessionError::AmbiguousId { .. }) => Err(ConnectorError::not_found(
                format!("type '{}' id {}", type_tag, datasource_id),
            )),
            Err(e) => Err(e.into()),
        }
    }

    /// Query datasources by name within `database`, delegating to the
    /// connector registered under the database's type.
    pub async fn query_datasources_by_name(
        &self,
        session: &dyn DatasourceSession,
        database: &Database,
        name: &str,
        schema: Option<&str>,
    ) -> Result<Vec<Datasource>, ConnectorError> {
        let source = self.source(&database.type_tag)?;
        source
            .query_datasources_by_name(session, database, name, schema)
            .await
    }
}

impl std::fmt::Debug for ConnectorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectorRegistry")
            .field("type_tags", &self.type_tags().collect::<Vec<_>>())
            .finish()
    }
}

/// Collects connectors for a [`ConnectorRegistry`]. Registering a second
/// connector under an already-used tag silently replaces the first; the tag
/// keeps its original iteration position.
pub struct RegistryBuilder {
    sources: IndexMap<String, Arc<dyn DatasourceConnector>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            sources: IndexMap::new(),
        }
    }

    pub fn register(mut self, connector: Arc<dyn DatasourceConnector>) -> Self {
        self.sources
            .insert(connector.type_tag().to_string(), connector);
        self
    }

    pub fn build(self) -> ConnectorRegistry {
        debug!(
            "built connector registry with {} registered types",
            self.sources.len()
        );
        ConnectorRegistry {
            sources: self.sources,
        }
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;

    struct StubConnector {
        tag: &'static str,
        table: &'static str,
    }

    #[async_trait]
    impl DatasourceConnector for StubConnector {
        fn type_tag(&self) -> &'static str {
            self.tag
        }

        fn table(&self) -> &'static str {
            self.table
        }

        async fn get_datasource_by_name(
            &self,
            _session: &dyn DatasourceSession,
            _name: &str,
            _schema: Option<&str>,
            _database_name: &str,
        ) -> Result<Option<Datasource>, ConnectorError> {
            Ok(None)
        }

        async fn query_datasources_by_name(
            &self,
            _session: &dyn DatasourceSession,
            _database: &Database,
            _name: &str,
            _schema: Option<&str>,
        ) -> Result<Vec<Datasource>, ConnectorError> {
            Ok(Vec::new())
        }
    }

    fn stub(tag: &'static str, table: &'static str) -> Arc<dyn DatasourceConnector> {
        Arc::new(StubConnector { tag, table })
    }

    #[test]
    fn test_registered_tag_resolves_to_its_connector() {
        let registry = ConnectorRegistry::builder()
            .register(stub("table", "tables"))
            .register(stub("stream", "streams"))
            .build();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("table"));
        assert_eq!(registry.get("stream").expect("registered").table(), "streams");
        assert!(registry.get("druid").is_none());
    }

    #[test]
    fn test_last_registration_wins_and_keeps_position() {
        let registry = ConnectorRegistry::builder()
            .register(stub("table", "tables_v1"))
            .register(stub("stream", "streams"))
            .register(stub("table", "tables_v2"))
            .build();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("table").expect("registered").table(), "tables_v2");
        // Overwriting does not move the tag to the back.
        let tags: Vec<&str> = registry.type_tags().collect();
        assert_eq!(tags, vec!["table", "stream"]);
    }

    #[test]
    fn test_type_tags_follow_registration_order() {
        let registry = ConnectorRegistry::builder()
            .register(stub("c", "cs"))
            .register(stub("a", "as"))
            .register(stub("b", "bs"))
            .build();

        let tags: Vec<&str> = registry.type_tags().collect();
        assert_eq!(tags, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_empty_registry() {
        let registry = ConnectorRegistry::builder().build();
        assert!(registry.is_empty());
        assert_eq!(registry.type_tags().count(), 0);
    }
}
