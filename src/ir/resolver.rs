//! Reference resolution.
//!
//! Three jobs:
//! - flatten object-shaped selections (anonymous shapes, whole entities,
//!   group keys) into leaf selectables
//! - carry a selectable across a select boundary so an outer select can use a
//!   column or navigation produced by its subquery
//! - expand a navigation access into the columns of the entity it reaches,
//!   reusing columns already resolved on the reference

use super::errors::IrBuildError;
use super::factory::IrFactory;
use super::join_keys::add_ref_selection;
use super::nodes::{Column, KeyValue, Referee, RefColumn, Selectable};
use super::types::{RefId, SelectId};
use crate::catalog::EntityCatalog;

/// Flattens `selectable` into leaves (columns, ref columns, constants), in order.
///
/// A bare reference becomes one unexpanded [`RefColumn`]; which of its columns
/// are needed is decided later. A key/value pair stamps its key as the alias of
/// every leaf its value produces.
pub fn process_selection(factory: &IrFactory, selectable: &Selectable) -> Vec<Selectable> {
    match selectable {
        Selectable::KeyValues(key_values) => key_values
            .iter()
            .flat_map(|kv| process_key_value(factory, kv))
            .collect(),
        Selectable::GroupBy(group_by) => group_by
            .iter()
            .flat_map(|s| process_selection(factory, s))
            .collect(),
        Selectable::Reference(reference) => {
            vec![Selectable::RefColumn(
                factory.build_ref_column(*reference, None, None),
            )]
        }
        Selectable::KeyValue(kv) => process_key_value(factory, kv),
        Selectable::Column(_) | Selectable::RefColumn(_) | Selectable::Constant(_) => {
            vec![selectable.clone()]
        }
    }
}

fn process_key_value(factory: &IrFactory, kv: &KeyValue) -> Vec<Selectable> {
    let mut leaves = process_selection(factory, &kv.value);
    for leaf in &mut leaves {
        leaf.set_alias(Some(kv.key.clone()));
    }
    leaves
}

/// Flattens `selectable` into `select`'s SELECT list, skipping leaves that are
/// already there. Flattening the same shape twice adds nothing the second time.
pub fn add_flattened_selection(
    factory: &mut IrFactory,
    select: SelectId,
    selectable: &Selectable,
) -> Vec<Selectable> {
    let leaves = process_selection(factory, selectable);
    let target = &mut factory.graph_mut()[select];
    for leaf in &leaves {
        target.add_selection_if_absent(leaf.clone());
    }
    leaves
}

/// Rebinds `selectable` under `target` so it can be used one select level out.
///
/// Only columns, ref columns and references may cross a select boundary.
/// A column is first registered in the SELECT list of the subquery `target`
/// wraps; a column from any deeper level must be promoted one level at a time.
pub fn get_or_create_selectable(
    factory: &mut IrFactory,
    selectable: &Selectable,
    target: Option<RefId>,
) -> Result<Selectable, IrBuildError> {
    let Some(target) = target else {
        return Ok(selectable.clone());
    };

    match selectable {
        Selectable::Column(column) => promote_column(factory, column, target).map(Selectable::Column),
        Selectable::RefColumn(ref_column) => {
            let owner = owning_select(factory, ref_column.reference)?;
            if let Referee::Select(inner) = factory.graph()[target].referee() {
                ensure_one_level(factory, "ref column", owner, target, *inner)?;
            }
            factory.graph_mut()[owner]
                .add_selection_if_absent(Selectable::RefColumn(ref_column.clone()));
            Ok(Selectable::RefColumn(factory.build_ref_column(
                target,
                ref_column.alias.clone(),
                Some(ref_column),
            )))
        }
        Selectable::Reference(reference) => {
            let alias = factory.graph()[*reference].alias.clone();
            Ok(Selectable::RefColumn(
                factory.build_ref_column(target, alias, None),
            ))
        }
        Selectable::KeyValue(_)
        | Selectable::KeyValues(_)
        | Selectable::GroupBy(_)
        | Selectable::Constant(_) => Err(IrBuildError::UnexpectedSelectable {
            kind: selectable.kind_name().to_string(),
            context: format!(
                "promoting into {}",
                factory.graph().describe_reference(target)
            ),
        }),
    }
}

fn promote_column(
    factory: &mut IrFactory,
    column: &Column,
    target: RefId,
) -> Result<Column, IrBuildError> {
    let inner = match factory.graph()[target].referee() {
        Referee::Select(inner) => *inner,
        Referee::Table { .. } => {
            return factory.build_column(
                target,
                column.name.clone(),
                column.val_type,
                column.alias.clone(),
            )
        }
    };

    let owner = owning_select(factory, column.reference)?;
    ensure_one_level(factory, &format!("column `{}`", column.name), owner, target, inner)?;

    let inner_select = &mut factory.graph_mut()[inner];
    let exposed_name = if inner_select.contains_selection(&Selectable::Column(column.clone())) {
        column.alias_or_name().to_string()
    } else {
        let mut registered = column.clone();
        registered.alias = None;
        inner_select.add_selection_if_absent(Selectable::Column(registered));
        column.name.clone()
    };
    log::debug!(
        "Promoted column `{}` from {} as `{}`",
        column.name,
        inner,
        exposed_name
    );

    factory.build_column(target, exposed_name, column.val_type, column.alias.clone())
}

/// Promotion moves a selectable out exactly one level: from the select
/// `target` wraps.
fn ensure_one_level(
    factory: &IrFactory,
    what: &str,
    owner: SelectId,
    target: RefId,
    inner: SelectId,
) -> Result<(), IrBuildError> {
    if owner == inner {
        return Ok(());
    }
    Err(IrBuildError::InvariantViolation(format!(
        "{} of {} cannot be promoted into {}, which wraps {}",
        what,
        owner,
        factory.graph().describe_reference(target),
        inner
    )))
}

fn owning_select(factory: &IrFactory, reference: RefId) -> Result<SelectId, IrBuildError> {
    factory.graph()[reference]
        .owner_select()
        .ok_or_else(|| IrBuildError::DetachedReference {
            reference: factory.graph().describe_reference(reference),
        })
}

/// Expands a navigation access into every column of the entity it reaches.
///
/// The entity is the one behind the innermost link's table. Columns already
/// resolved for projection on every link are reused as they are; the rest go
/// through [`add_ref_selection`] so every link of the chain gets them. Join-key
/// entries of the same columns are left untouched.
pub fn expand_ref_column(
    factory: &mut IrFactory,
    catalog: &dyn EntityCatalog,
    ref_column: &RefColumn,
) -> Result<Vec<Column>, IrBuildError> {
    let innermost = ref_column.innermost();
    let entity_name = match &factory.graph()[innermost.reference].referee {
        Referee::Table { entity, .. } => entity.clone(),
        Referee::Select(select) => {
            return Err(IrBuildError::InvariantViolation(format!(
                "navigation chain ends at subquery {} instead of a table",
                select
            )))
        }
    };
    let entity = catalog.entity(&entity_name)?;

    let mut columns = Vec::with_capacity(entity.columns.len());
    for column in &entity.columns {
        if let Some(cached) = reusable_column(factory, ref_column, &column.name) {
            log::trace!("Reusing resolved column `{}`", column.name);
            columns.push(cached);
            continue;
        }
        columns.push(add_ref_selection(
            factory,
            ref_column,
            &column.name,
            column.val_type,
            None,
            false,
        )?);
    }
    Ok(columns)
}

/// Projection column already resolved on both ends of the chain. Join keys
/// are never handed out as entity columns.
fn reusable_column(factory: &IrFactory, ref_column: &RefColumn, name: &str) -> Option<Column> {
    let graph = factory.graph();
    let outer = graph[ref_column.reference]
        .resolved_column(name)
        .filter(|c| !c.is_join_key)?;
    let innermost = ref_column.innermost();
    graph[innermost.reference]
        .resolved_column(name)
        .filter(|c| !c.is_join_key)?;
    Some(outer.clone())
}
