//! Navigation joins.
//!
//! Walking `post.Blog.User` adds one reference and one join per step to the
//! select being built. A select joins a given (source, navigation) pair at
//! most once; later walks over the same step reuse the reference created the
//! first time.

use super::errors::IrBuildError;
use super::factory::IrFactory;
use super::nodes::{DbExpr, Referee};
use super::operators::ExprToken;
use super::types::{RefId, SelectId};
use crate::catalog::{CatalogError, EntityCatalog};

/// Returns the reference `navigation` leads to from `source`, joining it into
/// `select` on first use.
///
/// The join condition is the conjunction of `source.from_key = target.to_key`
/// over the navigation's key pairs. The join starts as an inner join.
pub fn get_or_create_navigation(
    factory: &mut IrFactory,
    catalog: &dyn EntityCatalog,
    select: SelectId,
    source: RefId,
    navigation: &str,
) -> Result<RefId, IrBuildError> {
    let cache_key = (source, navigation.to_string());
    if let Some(join) = factory.graph()[select].navigation_joins.get(&cache_key) {
        let target = factory.graph()[*join].target();
        log::trace!("Reusing {} for navigation `{}`", join, navigation);
        return Ok(target);
    }

    let source_ref = &factory.graph()[source];
    if source_ref.owner_select() != Some(select) {
        return Err(IrBuildError::InvalidNavigationSource {
            reference: factory.graph().describe_reference(source),
            navigation: navigation.to_string(),
            reason: format!("reference does not belong to {}", select),
        });
    }
    let source_entity = match source_ref.referee() {
        Referee::Table { entity, .. } => entity.clone(),
        Referee::Select(_) => {
            return Err(IrBuildError::InvalidNavigationSource {
                reference: factory.graph().describe_reference(source),
                navigation: navigation.to_string(),
                reason: "subquery references expose no navigations".to_string(),
            })
        }
    };

    let nav = catalog.navigation(&source_entity, navigation)?;
    let source_schema = catalog.entity(&source_entity)?;
    let target_schema = catalog.entity(&nav.target_entity).map_err(|_| {
        CatalogError::entity_error_with_context(
            nav.target_entity.as_str(),
            format!("Resolving navigation {}.{}", source_entity, navigation),
        )
    })?;

    if nav.from_keys.is_empty() || nav.from_keys.len() != nav.to_keys.len() {
        return Err(CatalogError::InvalidConfig {
            message: format!(
                "navigation {}.{} pairs {} source keys with {} target keys",
                source_entity,
                navigation,
                nav.from_keys.len(),
                nav.to_keys.len()
            ),
        }
        .into());
    }

    let mut key_pairs = Vec::with_capacity(nav.from_keys.len());
    for (from_key, to_key) in nav.from_keys.iter().zip(&nav.to_keys) {
        let from_type = source_schema
            .column(from_key)
            .ok_or_else(|| unmapped_key(&source_entity, from_key))?
            .val_type;
        let to_type = target_schema
            .column(to_key)
            .ok_or_else(|| unmapped_key(&target_schema.name, to_key))?
            .val_type;
        key_pairs.push((from_key.as_str(), from_type, to_key.as_str(), to_type));
    }

    let target = factory.build_table_reference(select, &target_schema.name, &target_schema.table_name);

    let mut condition: Option<DbExpr> = None;
    for (from_key, from_type, to_key, to_type) in key_pairs {
        let left = factory.build_column(source, from_key, from_type, None)?;
        let right = factory.build_column(target, to_key, to_type, None)?;
        let equal = factory.build_binary(ExprToken::Equal, left.into(), right.into())?;
        condition = Some(match condition {
            Some(existing) => existing.and(equal),
            None => equal,
        });
    }
    let condition = condition.ok_or_else(|| {
        IrBuildError::InvariantViolation(format!("navigation `{}` built no condition", navigation))
    })?;

    let join = factory.build_join(select, source, target, condition)?;
    factory.graph_mut()[select]
        .navigation_joins
        .insert(cache_key, join);
    log::debug!(
        "Navigation {}.{} joined as {}",
        source_entity,
        navigation,
        factory.graph().describe_reference(target)
    );
    Ok(target)
}

/// Follows `path` from `root`, one navigation per element, and returns the
/// reference the last step reaches. An empty path returns `root`.
pub fn navigate_path(
    factory: &mut IrFactory,
    catalog: &dyn EntityCatalog,
    select: SelectId,
    root: RefId,
    path: &[&str],
) -> Result<RefId, IrBuildError> {
    path.iter().try_fold(root, |current, navigation| {
        get_or_create_navigation(factory, catalog, select, current, navigation)
    })
}

fn unmapped_key(entity: &str, column: &str) -> CatalogError {
    CatalogError::InvalidConfig {
        message: format!("key column `{}` is not mapped on `{}`", column, entity),
    }
}
