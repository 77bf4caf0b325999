use std::collections::HashSet;

use super::Datasource;

/// Predicate vocabulary for datasource queries. Present predicates combine
/// with AND, except the two permission sets which combine with OR between
/// themselves. Sessions evaluate the filter against their store; the
/// in-memory session uses [`DatasourceFilter::matches`] directly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasourceFilter {
    pub database_id: Option<i64>,
    pub name: Option<String>,
    pub schema: Option<String>,
    pub adhoc: Option<bool>,
    pub perm_in: Option<HashSet<String>>,
    pub schema_perm_in: Option<HashSet<String>>,
}

impl DatasourceFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_database_id(mut self, database_id: i64) -> Self {
        self.database_id = Some(database_id);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_adhoc(mut self, adhoc: bool) -> Self {
        self.adhoc = Some(adhoc);
        self
    }

    /// Restrict to rows whose `perm` is in `permissions` OR whose
    /// `schema_perm` is in `schema_perms`. The two sets are always applied
    /// as one OR-ed clause.
    pub fn with_permissions(
        mut self,
        permissions: HashSet<String>,
        schema_perms: HashSet<String>,
    ) -> Self {
        self.perm_in = Some(permissions);
        self.schema_perm_in = Some(schema_perms);
        self
    }

    pub fn is_unscoped(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, datasource: &Datasource) -> bool {
        if let Some(database_id) = self.database_id {
            if datasource.database_id != database_id {
                return false;
            }
        }

        if let Some(name) = &self.name {
            if &datasource.name != name {
                return false;
            }
        }

        if let Some(schema) = &self.schema {
            if datasource.schema.as_deref() != Some(schema.as_str()) {
                return false;
            }
        }

        if let Some(adhoc) = self.adhoc {
            if datasource.is_adhoc != adhoc {
                return false;
            }
        }

        if self.perm_in.is_some() || self.schema_perm_in.is_some() {
            // A row with no perm set never satisfies the membership test,
            // mirroring SQL `IN` semantics over NULL.
            let perm_hit = match (&self.perm_in, &datasource.perm) {
                (Some(set), Some(perm)) => set.contains(perm),
                _ => false,
            };
            let schema_perm_hit = match (&self.schema_perm_in, &datasource.schema_perm) {
                (Some(set), Some(perm)) => set.contains(perm),
                _ => false,
            };
            if !perm_hit && !schema_perm_hit {
                return false;
            }
        }

        true
    }
}
