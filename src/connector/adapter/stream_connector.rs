use async_trait::async_trait;

use crate::application::{DatasourceConnector, DatasourceSession};
use crate::domain::{ConnectorError, Database, Datasource, DatasourceFilter};

/// Connector for streaming datasources, registered under `"stream"`.
/// Streams have no schema concept, so schema arguments are ignored.
pub struct StreamConnector;

impl StreamConnector {
    pub const TYPE_TAG: &'static str = "stream";

    pub fn new() -> Self {
        Self
    }
}

impl Default for StreamConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatasourceConnector for StreamConnector {
    fn type_tag(&self) -> &'static str {
        Self::TYPE_TAG
    }

    fn table(&self) -> &'static str {
        "streams"
    }

    async fn get_datasource_by_name(
        &self,
        session: &dyn DatasourceSession,
        name: &str,
        _schema: Option<&str>,
        database_name: &str,
    ) -> Result<Option<Datasource>, ConnectorError> {
        let database = match session.find_database_by_name(database_name).await? {
            Some(database) => database,
            None => return Ok(None),
        };

        let filter = DatasourceFilter::new()
            .with_name(name)
            .with_database_id(database.id);
        let rows = session.fetch_all(self.table(), &filter).await?;
        Ok(rows.into_iter().next())
    }

    async fn query_datasources_by_name(
        &self,
        session: &dyn DatasourceSession,
        database: &Database,
        name: &str,
        _schema: Option<&str>,
    ) -> Result<Vec<Datasource>, ConnectorError> {
        let filter = DatasourceFilter::new()
            .with_database_id(database.id)
            .with_name(name);
        Ok(session.fetch_all(self.table(), &filter).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::InMemorySession;

    #[tokio::test]
    async fn test_schema_is_ignored_for_streams() {
        let session = InMemorySession::new();
        session.add_database(Database::new(5, "events", "stream")).await;
        session
            .add_datasource("streams", Datasource::new("stream", 7, "clicks", 5))
            .await;

        let connector = StreamConnector::new();
        let found = connector
            .get_datasource_by_name(&session, "clicks", Some("ignored"), "events")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, 7);

        let database = Database::new(5, "events", "stream");
        let rows = connector
            .query_datasources_by_name(&session, &database, "clicks", Some("ignored"))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_default_filter_is_unscoped() {
        let connector = StreamConnector::new();
        assert!(connector.default_filter().is_unscoped());
    }
}
