use async_trait::async_trait;

use crate::application::DatasourceSession;
use crate::domain::{ConnectorError, Database, Datasource, DatasourceFilter};

/// Capability contract every registered datasource kind satisfies. The
/// registry is polymorphic over this trait: any implementation can be
/// registered without registry changes.
#[async_trait]
pub trait DatasourceConnector: Send + Sync {
    /// Constant type tag; doubles as the registry key.
    fn type_tag(&self) -> &'static str;

    /// Backing table the session resolves this kind's rows from.
    fn table(&self) -> &'static str;

    /// Scoping applied before listing every datasource of this kind.
    /// Unscoped by default.
    fn default_filter(&self) -> DatasourceFilter {
        DatasourceFilter::new()
    }

    /// Single-row lookup by name. Matching semantics (schema handling,
    /// database resolution) are implementation-specific; "no match" is an
    /// empty result, not a failure.
    async fn get_datasource_by_name(
        &self,
        session: &dyn DatasourceSession,
        name: &str,
        schema: Option<&str>,
        database_name: &str,
    ) -> Result<Option<Datasource>, ConnectorError>;

    /// Multi-row name query scoped to one database. `schema` is
    /// implementation-defined when absent.
    async fn query_datasources_by_name(
        &self,
        session: &dyn DatasourceSession,
        database: &Database,
        name: &str,
        schema: Option<&str>,
    ) -> Result<Vec<Datasource>, ConnectorError>;
}
