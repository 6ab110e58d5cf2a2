use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::ir::types::ValueType;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ColumnSchema {
    pub name: String,
    pub val_type: ValueType,
    #[serde(default)]
    pub nullable: bool,
}

/// Foreign-key description of one navigation property.
///
/// `from_keys[i]` on the source entity's table equals `to_keys[i]` on the
/// target entity's table.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NavigationSchema {
    pub target_entity: String,
    pub from_keys: Vec<String>,
    pub to_keys: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EntitySchema {
    pub name: String,
    pub table_name: String,
    pub primary_keys: Vec<String>,
    pub columns: Vec<ColumnSchema>,
    #[serde(default)]
    pub navigations: HashMap<String, NavigationSchema>,
}

impl EntitySchema {
    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name == name)
    }
}
