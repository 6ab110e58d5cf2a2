//! Join-key propagation along chained navigations.
//!
//! When a navigation is reached through one or more subquery levels, every
//! level must expose the columns the outer levels join on, even though nobody
//! selected them. Each link of a [`RefColumn`] chain gets its own column in its
//! reference's resolution cache: the innermost link carries the real column
//! name and requested alias, and every outer link refers to the name the link
//! below exposes.
//!
//! Join-key entries are cached under the name they expose, every other entry
//! under its column name, so a join key never shadows the entity column it
//! was derived from.

use super::errors::IrBuildError;
use super::factory::IrFactory;
use super::nodes::{Column, RefColumn};
use super::types::ValueType;
use crate::utils::alias_naming::join_key_alias;

/// Materializes `column_name` on every link of `ref_column`'s chain and
/// returns the column built on the outermost link.
///
/// Re-running with the same arguments rewrites identical cache entries.
pub fn add_ref_selection(
    factory: &mut IrFactory,
    ref_column: &RefColumn,
    column_name: &str,
    val_type: ValueType,
    alias: Option<String>,
    is_join_key: bool,
) -> Result<Column, IrBuildError> {
    let mut name = column_name.to_string();
    let mut alias = alias;
    let mut outermost = None;

    for link in ref_column.chain().into_iter().rev() {
        let mut column = factory.build_column(link.reference, name.clone(), val_type, alias.take())?;
        column.is_join_key = is_join_key;
        log::debug!(
            "Resolved `{}` on {} (join key: {})",
            column.alias_or_name(),
            factory.graph().describe_reference(link.reference),
            is_join_key
        );

        factory.graph_mut()[link.reference]
            .ref_selection
            .insert(cache_key(&column).to_string(), column.clone());

        name = column.alias_or_name().to_string();
        outermost = Some(column);
    }

    outermost.ok_or_else(|| {
        IrBuildError::InvariantViolation("ref column chain has no links".to_string())
    })
}

fn cache_key(column: &Column) -> &str {
    if column.is_join_key {
        column.alias_or_name()
    } else {
        &column.name
    }
}

/// Surfaces the given key columns through `ref_column`'s chain, aliased with
/// the configured join-key suffix.
pub fn add_join_key_selections(
    factory: &mut IrFactory,
    ref_column: &RefColumn,
    keys: &[(&str, ValueType)],
) -> Result<Vec<Column>, IrBuildError> {
    let suffix = factory.config().join_key_suffix.clone();
    keys.iter()
        .map(|(key, val_type)| {
            add_ref_selection(
                factory,
                ref_column,
                key,
                *val_type,
                Some(join_key_alias(key, &suffix)),
                true,
            )
        })
        .collect()
}
