use thiserror::Error;

/// Failures surfaced by a persistence session collaborator.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A one-or-none lookup matched more than one row. Distinct from a
    /// transport failure: the store answered, but the answer is ambiguous.
    #[error("more than one row in '{table}' matched id {id}")]
    AmbiguousId { table: String, id: i64 },

    #[error("backend error: {0}")]
    Backend(String),
}

impl SessionError {
    pub fn ambiguous_id(table: impl Into<String>, id: i64) -> Self {
        Self::AmbiguousId {
            table: table.into(),
            id,
        }
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::AmbiguousId { .. })
    }
}

#[derive(Debug, Error)]
pub enum ConnectorError {
    /// The type tag has no registered connector. Retrying without
    /// re-registering cannot change the outcome.
    #[error("unknown datasource type: {0}")]
    UnknownDatasourceType(String),

    /// No row matched, or an id-based single lookup was ambiguous. Both
    /// conditions are reported as this one failure.
    #[error("datasource not found: {0}")]
    DatasourceNotFound(String),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ConnectorError {
    pub fn unknown_type(tag: impl Into<String>) -> Self {
        Self::UnknownDatasourceType(tag.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::DatasourceNotFound(msg.into())
    }

    pub fn is_unknown_type(&self) -> bool {
        matches!(self, Self::UnknownDatasourceType(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DatasourceNotFound(_))
    }
}
