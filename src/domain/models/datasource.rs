use serde::{Deserialize, Serialize};

/// A single datasource row as returned by a lookup. Every connector kind
/// produces this shape; the per-kind behavior lives in the connector, not
/// in the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datasource {
    pub type_tag: String,
    pub id: i64,
    pub name: String,
    pub database_id: i64,
    pub schema: Option<String>,
    pub perm: Option<String>,
    pub schema_perm: Option<String>,
    /// Created ad hoc (e.g. saved out of a query editor) rather than
    /// registered as a first-class dataset.
    pub is_adhoc: bool,
    /// Empty until eagerly loaded.
    pub columns: Vec<Column>,
    /// Empty until eagerly loaded.
    pub metrics: Vec<Metric>,
}

impl Datasource {
    pub fn new(
        type_tag: impl Into<String>,
        id: i64,
        name: impl Into<String>,
        database_id: i64,
    ) -> Self {
        Self {
            type_tag: type_tag.into(),
            id,
            name: name.into(),
            database_id,
            schema: None,
            perm: None,
            schema_perm: None,
            is_adhoc: false,
            columns: Vec::new(),
            metrics: Vec::new(),
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_perm(mut self, perm: impl Into<String>) -> Self {
        self.perm = Some(perm.into());
        self
    }

    pub fn with_schema_perm(mut self, schema_perm: impl Into<String>) -> Self {
        self.schema_perm = Some(schema_perm.into());
        self
    }

    pub fn with_adhoc(mut self, is_adhoc: bool) -> Self {
        self.is_adhoc = is_adhoc;
        self
    }

    pub fn with_columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_metrics(mut self, metrics: Vec<Metric>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Cross-type unique handle, `"{id}__{type_tag}"`.
    pub fn uid(&self) -> String {
        format!("{}__{}", self.id, self.type_tag)
    }

    /// Schema-qualified display name.
    pub fn full_name(&self) -> String {
        match self.schema.as_deref() {
            Some(schema) if !schema.is_empty() => format!("{}.{}", schema, self.name),
            _ => self.name.clone(),
        }
    }

    pub fn relations_loaded(&self) -> bool {
        !self.columns.is_empty() || !self.metrics.is_empty()
    }
}

/// A column owned by a datasource, loaded through an eager fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: i64,
    pub name: String,
    pub data_type: String,
    pub is_temporal: bool,
}

impl Column {
    pub fn new(id: i64, name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            data_type: data_type.into(),
            is_temporal: false,
        }
    }

    pub fn temporal(mut self) -> Self {
        self.is_temporal = true;
        self
    }
}

/// A metric owned by a datasource, loaded through an eager fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub id: i64,
    pub name: String,
    pub expression: String,
    pub description: Option<String>,
}

impl Metric {
    pub fn new(id: i64, name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            expression: expression.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Relations a session can load alongside a primary datasource fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasourceRelation {
    Columns,
    Metrics,
}

impl DatasourceRelation {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasourceRelation::Columns => "columns",
            DatasourceRelation::Metrics => "metrics",
        }
    }
}

impl std::fmt::Display for DatasourceRelation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
