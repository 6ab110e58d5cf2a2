//! # Entity Catalog Error Types
//!
//! - **Lookup Errors**: an entity or navigation the walker asked for is not mapped
//! - **Configuration Errors**: file I/O, parsing and structural validation while
//!   loading the YAML catalog
//!
//! Lookups during a translation run surface through
//! [`IrBuildError::Catalog`](crate::ir::errors::IrBuildError::Catalog).

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("No entity mapping found for `{entity}`")]
    UnknownEntity { entity: String },
    #[error("Entity `{entity}` has no navigation named `{navigation}`")]
    UnknownNavigation { entity: String, navigation: String },
    #[error("Failed to read catalog file: {error}")]
    ConfigReadError { error: String },
    #[error("Failed to parse catalog: {error}")]
    ConfigParseError { error: String },
    #[error("Invalid catalog: {message}")]
    InvalidConfig { message: String },
}

impl CatalogError {
    /// Create an UnknownEntity error with context information
    ///
    /// # Example
    /// ```ignore
    /// CatalogError::entity_error_with_context("Blog", "Resolving navigation Post.Blog")
    /// ```
    pub fn entity_error_with_context(entity: impl Into<String>, context: impl Into<String>) -> Self {
        CatalogError::UnknownEntity {
            entity: format!("{}\n  Context: {}", entity.into(), context.into()),
        }
    }
}
