//! Relir - relational IR for query translators
//!
//! This crate builds the intermediate representation a query translator
//! produces before SQL rendering:
//! - Selects, references and joins in a per-run arena
//! - Navigation joins driven by an entity catalog
//! - Reference resolution across nested subqueries
//! - Join-type promotion and join-key propagation

pub mod utils;

pub mod catalog;
pub mod config;
pub mod ir;

pub use catalog::{CatalogError, EntityCatalog, InMemoryCatalog};
pub use config::{ConfigError, TranslatorConfig};
pub use ir::{IrBuildError, IrFactory, IrGraph};
