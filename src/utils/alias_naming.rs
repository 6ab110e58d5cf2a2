//! Centralized alias generation for references, subqueries and join keys.
//!
//! All generated aliases MUST come from here so two parts of a run never
//! disagree about the name of the same reference.
//!
//! ## Naming Convention
//! - Table references: `{first letter of table, lowercased}{counter}` (`blogs` → `b0`)
//! - Subqueries: `{prefix}{counter}` (`sq0`, `sq1`)
//! - Join keys: `{column}{suffix}` (`UserId` → `UserId_jk`)
//!
//! Counters are per base name and start at zero.

use std::collections::HashMap;

/// Base alias for a table reference.
///
/// # Examples
/// ```
/// use relir::utils::alias_naming::table_alias_base;
///
/// assert_eq!(table_alias_base("blogs"), "b");
/// assert_eq!(table_alias_base("Users"), "u");
/// assert_eq!(table_alias_base("_audit"), "t");
/// ```
pub fn table_alias_base(table_name: &str) -> String {
    match table_name.chars().next() {
        Some(c) if c.is_ascii_alphabetic() => c.to_ascii_lowercase().to_string(),
        _ => "t".to_string(),
    }
}

/// Output name of a materialized join-key column.
///
/// # Examples
/// ```
/// use relir::utils::alias_naming::join_key_alias;
///
/// assert_eq!(join_key_alias("UserId", "_jk"), "UserId_jk");
/// ```
pub fn join_key_alias(column: &str, suffix: &str) -> String {
    format!("{}{}", column, suffix)
}

/// Hands out `{base}{n}` aliases, one counter per base.
#[derive(Debug, Clone, Default)]
pub struct AliasGenerator {
    counters: HashMap<String, usize>,
}

impl AliasGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_alias(&mut self, base: &str) -> String {
        let counter = self.counters.entry(base.to_string()).or_insert(0);
        let alias = format!("{}{}", base, counter);
        *counter += 1;
        alias
    }

    pub fn next_table_alias(&mut self, table_name: &str) -> String {
        let base = table_alias_base(table_name);
        self.next_alias(&base)
    }
}
