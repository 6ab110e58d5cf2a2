//! Entity-to-table metadata.
//!
//! The IR engine never owns mapping metadata; it asks an [`EntityCatalog`] for
//! an entity's table and columns and for a navigation's foreign keys.
//! [`InMemoryCatalog`] is the stock implementation, loaded from YAML:
//!
//! ```yaml
//! entities:
//!   - name: Blog
//!     table_name: blogs
//!     primary_keys: [BlogId]
//!     columns:
//!       - { name: BlogId, val_type: integer }
//!       - { name: UserId, val_type: integer }
//!     navigations:
//!       User: { target_entity: User, from_keys: [UserId], to_keys: [UserId] }
//! ```

pub mod entity_schema;
pub mod errors;

pub use entity_schema::{ColumnSchema, EntitySchema, NavigationSchema};
pub use errors::CatalogError;

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

/// Metadata lookups the engine performs while building the IR.
pub trait EntityCatalog {
    fn entity(&self, name: &str) -> Result<&EntitySchema, CatalogError>;

    fn navigation(&self, entity: &str, navigation: &str) -> Result<&NavigationSchema, CatalogError> {
        self.entity(entity)?
            .navigations
            .get(navigation)
            .ok_or_else(|| CatalogError::UnknownNavigation {
                entity: entity.to_string(),
                navigation: navigation.to_string(),
            })
    }
}

/// Catalog document as it appears on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub entities: Vec<EntitySchema>,
}

impl CatalogConfig {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path).map_err(|e| CatalogError::ConfigReadError {
            error: e.to_string(),
        })?;

        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        serde_yaml::from_str(yaml).map_err(|e| CatalogError::ConfigParseError {
            error: e.to_string(),
        })
    }

    /// Structural validation: unique names, known navigation targets,
    /// matching key arities.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.entities.is_empty() {
            return Err(CatalogError::InvalidConfig {
                message: "Catalog must contain at least one entity".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for entity in &self.entities {
            if !seen.insert(entity.name.as_str()) {
                return Err(CatalogError::InvalidConfig {
                    message: format!("Duplicate entity: {}", entity.name),
                });
            }
        }

        for entity in &self.entities {
            for key in &entity.primary_keys {
                if entity.column(key).is_none() {
                    return Err(CatalogError::InvalidConfig {
                        message: format!(
                            "Primary key `{}` is not a column of `{}`",
                            key, entity.name
                        ),
                    });
                }
            }

            for (nav_name, nav) in &entity.navigations {
                if !seen.contains(nav.target_entity.as_str()) {
                    return Err(CatalogError::InvalidConfig {
                        message: format!(
                            "Navigation `{}.{}` targets unknown entity `{}`",
                            entity.name, nav_name, nav.target_entity
                        ),
                    });
                }
                if nav.from_keys.is_empty() || nav.from_keys.len() != nav.to_keys.len() {
                    return Err(CatalogError::InvalidConfig {
                        message: format!(
                            "Navigation `{}.{}` has {} source keys and {} target keys",
                            entity.name,
                            nav_name,
                            nav.from_keys.len(),
                            nav.to_keys.len()
                        ),
                    });
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    entities: HashMap<String, EntitySchema>,
}

impl InMemoryCatalog {
    pub fn from_config(config: CatalogConfig) -> Result<Self, CatalogError> {
        config.validate()?;
        let entities = config
            .entities
            .into_iter()
            .map(|e| (e.name.clone(), e))
            .collect::<HashMap<_, _>>();
        log::debug!("Loaded entity catalog with {} entities", entities.len());
        Ok(Self { entities })
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        Self::from_config(CatalogConfig::from_yaml_str(yaml)?)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        Self::from_config(CatalogConfig::from_yaml_file(path)?)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl EntityCatalog for InMemoryCatalog {
    fn entity(&self, name: &str) -> Result<&EntitySchema, CatalogError> {
        self.entities
            .get(name)
            .ok_or_else(|| CatalogError::UnknownEntity {
                entity: name.to_string(),
            })
    }
}
