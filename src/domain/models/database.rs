use serde::{Deserialize, Serialize};

/// Owning database/connection descriptor. `type_tag` names the datasource
/// kind this database serves, which is what the registry dispatches on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Database {
    pub id: i64,
    pub name: String,
    pub type_tag: String,
}

impl Database {
    pub fn new(id: i64, name: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            type_tag: type_tag.into(),
        }
    }
}
