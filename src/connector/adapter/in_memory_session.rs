use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::DatasourceSession;
use crate::domain::{Database, Datasource, DatasourceFilter, DatasourceRelation, SessionError};

/// In-process [`DatasourceSession`] backed by plain maps. Used by the test
/// suite and by embedders that run without a database.
///
/// Rows are stored complete; plain fetches return them with the `columns`
/// and `metrics` relations stripped, and eager fetches attach exactly the
/// requested relations.
pub struct InMemorySession {
    tables: Arc<Mutex<HashMap<String, Vec<Datasource>>>>,
    databases: Arc<Mutex<Vec<Database>>>,
}

impl InMemorySession {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(Mutex::new(HashMap::new())),
            databases: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn add_database(&self, database: Database) {
        let mut databases = self.databases.lock().await;
        databases.push(database);
    }

    pub async fn add_datasource(&self, table: &str, datasource: Datasource) {
        let mut tables = self.tables.lock().await;
        tables
            .entry(table.to_string())
            .or_default()
            .push(datasource);
        debug!("stored datasource in '{}'", table);
    }

    pub async fn datasource_count(&self, table: &str) -> usize {
        let tables = self.tables.lock().await;
        tables.get(table).map(Vec::len).unwrap_or(0)
    }
}

impl Default for InMemorySession {
    fn default() -> Self {
        Self::new()
    }
}

fn strip_relations(mut datasource: Datasource) -> Datasource {
    datasource.columns.clear();
    datasource.metrics.clear();
    datasource
}

fn attach_requested(mut datasource: Datasource, relations: &[DatasourceRelation]) -> Datasource {
    if !relations.contains(&DatasourceRelation::Columns) {
        datasource.columns.clear();
    }
    if !relations.contains(&DatasourceRelation::Metrics) {
        datasource.metrics.clear();
    }
    datasource
}

#[async_trait]
impl DatasourceSession for InMemorySession {
    async fn fetch_by_id(
        &self,
        table: &str,
        id: i64,
    ) -> Result<Option<Datasource>, SessionError> {
        let tables = self.tables.lock().await;
        let mut matches = tables
            .get(table)
            .into_iter()
            .flatten()
            .filter(|row| row.id == id);

        let first = matches.next().cloned();
        if first.is_some() && matches.next().is_some() {
            return Err(SessionError::ambiguous_id(table, id));
        }
        Ok(first.map(strip_relations))
    }

    async fn fetch_all(
        &self,
        table: &str,
        filter: &DatasourceFilter,
    ) -> Result<Vec<Datasource>, SessionError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .get(table)
            .into_iter()
            .flatten()
            .filter(|row| filter.matches(row))
            .cloned()
            .map(strip_relations)
            .collect())
    }

    async fn fetch_eager_by_id(
        &self,
        table: &str,
        id: i64,
        relations: &[DatasourceRelation],
    ) -> Result<Option<Datasource>, SessionError> {
        let tables = self.tables.lock().await;
        let mut matches = tables
            .get(table)
            .into_iter()
            .flatten()
            .filter(|row| row.id == id);

        let first = matches.next().cloned();
        if first.is_some() && matches.next().is_some() {
            return Err(SessionError::ambiguous_id(table, id));
        }
        Ok(first.map(|row| attach_requested(row, relations)))
    }

    async fn find_database_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Database>, SessionError> {
        let databases = self.databases.lock().await;
        Ok(databases.iter().find(|db| db.name == name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Column, Metric};

    fn seeded_row() -> Datasource {
        Datasource::new("table", 1, "orders", 10)
            .with_columns(vec![Column::new(1, "created_at", "TIMESTAMP").temporal()])
            .with_metrics(vec![Metric::new(1, "count", "COUNT(*)")])
    }

    #[tokio::test]
    async fn test_fetch_by_id_one_or_none() {
        let session = InMemorySession::new();
        session.add_datasource("tables", seeded_row()).await;

        let found = session.fetch_by_id("tables", 1).await.unwrap();
        assert_eq!(found.as_ref().map(|ds| ds.id), Some(1));

        let missing = session.fetch_by_id("tables", 2).await.unwrap();
        assert!(missing.is_none());

        let other_table = session.fetch_by_id("streams", 1).await.unwrap();
        assert!(other_table.is_none());
    }

    #[tokio::test]
    async fn test_fetch_by_id_reports_ambiguity() {
        let session = InMemorySession::new();
        session.add_datasource("tables", seeded_row()).await;
        session
            .add_datasource("tables", Datasource::new("table", 1, "orders_dup", 10))
            .await;

        let err = session.fetch_by_id("tables", 1).await.unwrap_err();
        assert!(err.is_ambiguous());
    }

    #[tokio::test]
    async fn test_plain_fetch_strips_relations() {
        let session = InMemorySession::new();
        session.add_datasource("tables", seeded_row()).await;

        let found = session.fetch_by_id("tables", 1).await.unwrap().unwrap();
        assert!(found.columns.is_empty());
        assert!(found.metrics.is_empty());

        let listed = session
            .fetch_all("tables", &DatasourceFilter::new())
            .await
            .unwrap();
        assert!(!listed[0].relations_loaded());
    }

    #[tokio::test]
    async fn test_eager_fetch_attaches_requested_relations() {
        let session = InMemorySession::new();
        session.add_datasource("tables", seeded_row()).await;

        let both = session
            .fetch_eager_by_id(
                "tables",
                1,
                &[DatasourceRelation::Columns, DatasourceRelation::Metrics],
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(both.columns.len(), 1);
        assert_eq!(both.metrics.len(), 1);

        let columns_only = session
            .fetch_eager_by_id("tables", 1, &[DatasourceRelation::Columns])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(columns_only.columns.len(), 1);
        assert!(columns_only.metrics.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_all_applies_filter() {
        let session = InMemorySession::new();
        session.add_datasource("tables", seeded_row()).await;
        session
            .add_datasource(
                "tables",
                Datasource::new("table", 2, "scratch", 10).with_adhoc(true),
            )
            .await;

        assert_eq!(session.datasource_count("tables").await, 2);
        let first_class = session
            .fetch_all("tables", &DatasourceFilter::new().with_adhoc(false))
            .await
            .unwrap();
        assert_eq!(first_class.len(), 1);
        assert_eq!(first_class[0].name, "orders");
    }

    #[tokio::test]
    async fn test_find_database_by_name() {
        let session = InMemorySession::new();
        session.add_database(Database::new(10, "analytics", "table")).await;

        let found = session.find_database_by_name("analytics").await.unwrap();
        assert_eq!(found.map(|db| db.id), Some(10));

        let missing = session.find_database_by_name("warehouse").await.unwrap();
        assert!(missing.is_none());
    }
}
