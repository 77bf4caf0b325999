use async_trait::async_trait;

use crate::domain::{Database, Datasource, DatasourceFilter, DatasourceRelation, SessionError};

/// Persistence session the registry and connectors query through. Supplied
/// by the caller per call; never owned or retained by the registry.
#[async_trait]
pub trait DatasourceSession: Send + Sync {
    /// One-or-none lookup by primary id against one connector's table.
    /// More than one matching row is a [`SessionError::AmbiguousId`].
    async fn fetch_by_id(&self, table: &str, id: i64)
        -> Result<Option<Datasource>, SessionError>;

    /// Predicate-filtered multi-row fetch, in the store's natural row order.
    async fn fetch_all(
        &self,
        table: &str,
        filter: &DatasourceFilter,
    ) -> Result<Vec<Datasource>, SessionError>;

    /// One-or-none lookup by primary id with the named relations loaded in
    /// the same round trip.
    async fn fetch_eager_by_id(
        &self,
        table: &str,
        id: i64,
        relations: &[DatasourceRelation],
    ) -> Result<Option<Datasource>, SessionError>;

    /// Resolve an owning database by its display name. Connectors whose
    /// name-lookup semantics are scoped by database name go through this.
    async fn find_database_by_name(&self, name: &str)
        -> Result<Option<Database>, SessionError>;
}
