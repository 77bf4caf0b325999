use async_trait::async_trait;

use crate::application::{DatasourceConnector, DatasourceSession};
use crate::domain::{ConnectorError, Database, Datasource, DatasourceFilter};

/// Connector for physical SQL-table datasources, registered under `"table"`.
///
/// Name lookups resolve the owning database by display name and compare
/// schemas after normalization, so an empty schema and an absent schema are
/// the same thing on both sides of the comparison.
pub struct TableConnector;

impl TableConnector {
    pub const TYPE_TAG: &'static str = "table";

    pub fn new() -> Self {
        Self
    }
}

impl Default for TableConnector {
    fn default() -> Self {
        Self::new()
    }
}

/// Empty schemas come in from callers that render "no schema" as `""`.
fn normalize_schema(schema: Option<&str>) -> Option<&str> {
    schema.filter(|s| !s.is_empty())
}

#[async_trait]
impl DatasourceConnector for TableConnector {
    fn type_tag(&self) -> &'static str {
        Self::TYPE_TAG
    }

    fn table(&self) -> &'static str {
        "tables"
    }

    /// Listings show first-class datasets only; ad-hoc rows saved out of a
    /// query editor stay out of the default scope.
    fn default_filter(&self) -> DatasourceFilter {
        DatasourceFilter::new().with_adhoc(false)
    }

    async fn get_datasource_by_name(
        &self,
        session: &dyn DatasourceSession,
        name: &str,
        schema: Option<&str>,
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

        let wanted = normalize_schema(schema);
        Ok(rows
            .into_iter()
            .find(|row| normalize_schema(row.schema.as_deref()) == wanted))
    }

    async fn query_datasources_by_name(
        &self,
        session: &dyn DatasourceSession,
        database: &Database,
        name: &str,
        schema: Option<&str>,
    ) -> Result<Vec<Datasource>, ConnectorError> {
        let mut filter = DatasourceFilter::new()
            .with_database_id(database.id)
            .with_name(name);
        if let Some(schema) = normalize_schema(schema) {
            filter = filter.with_schema(schema);
        }
        Ok(session.fetch_all(self.table(), &filter).await?)
    }
}
