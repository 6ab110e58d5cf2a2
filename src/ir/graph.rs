use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::{Index, IndexMut};

use super::errors::IrBuildError;
use super::nodes::{Join, Reference, Select, Selectable};
use super::types::{JoinId, RefId, SelectId};

/// Arena owning every node built during one translation run.
///
/// Handles are only minted by this arena, so indexing with them cannot go out
/// of bounds. The graph is dropped as a unit when the run ends.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct IrGraph {
    pub(crate) selects: Vec<Select>,
    pub(crate) references: Vec<Reference>,
    pub(crate) joins: Vec<Join>,
}

impl IrGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selects(&self) -> impl Iterator<Item = &Select> {
        self.selects.iter()
    }

    pub fn references(&self) -> impl Iterator<Item = &Reference> {
        self.references.iter()
    }

    /// Selects that are not nested inside another select.
    pub fn root_selects(&self) -> impl Iterator<Item = &Select> {
        self.selects.iter().filter(|s| s.owner.is_none())
    }

    /// Joins of `select`, in construction order.
    pub fn joins_of(&self, select: SelectId) -> impl Iterator<Item = &Join> {
        self[select].joins.iter().map(move |j| &self[*j])
    }

    /// Human readable name for error messages and logs.
    pub fn describe_reference(&self, reference: RefId) -> String {
        match self[reference].alias() {
            Some(alias) => format!("{} ({})", reference, alias),
            None => reference.to_string(),
        }
    }

    /// Checks the structural invariants a renderer relies on: every join
    /// targets a reference of its own select, and no two selectables share an
    /// alias.
    pub fn validate_select(&self, select: SelectId) -> Result<(), IrBuildError> {
        for join in self.joins_of(select) {
            if self[join.target].owner_select != Some(select) {
                return Err(IrBuildError::JoinTargetNotOwned {
                    target: self.describe_reference(join.target),
                    select: select.to_string(),
                });
            }
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for alias in self[select].selection.iter().filter_map(Selectable::alias) {
            if !seen.insert(alias) {
                return Err(IrBuildError::InvariantViolation(format!(
                    "alias `{}` is used twice in {}",
                    alias, select
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn push_select(&mut self, build: impl FnOnce(SelectId) -> Select) -> SelectId {
        let id = SelectId(self.selects.len());
        self.selects.push(build(id));
        id
    }

    pub(crate) fn push_reference(
        &mut self,
        build: impl FnOnce(RefId) -> Reference,
    ) -> RefId {
        let id = RefId(self.references.len());
        self.references.push(build(id));
        id
    }

    pub(crate) fn push_join(&mut self, build: impl FnOnce(JoinId) -> Join) -> JoinId {
        let id = JoinId(self.joins.len());
        self.joins.push(build(id));
        id
    }
}

impl Index<SelectId> for IrGraph {
    type Output = Select;

    fn index(&self, id: SelectId) -> &Select {
        &self.selects[id.0]
    }
}

impl IndexMut<SelectId> for IrGraph {
    fn index_mut(&mut self, id: SelectId) -> &mut Select {
        &mut self.selects[id.0]
    }
}

impl Index<RefId> for IrGraph {
    type Output = Reference;

    fn index(&self, id: RefId) -> &Reference {
        &self.references[id.0]
    }
}

impl IndexMut<RefId> for IrGraph {
    fn index_mut(&mut self, id: RefId) -> &mut Reference {
        &mut self.references[id.0]
    }
}

impl Index<JoinId> for IrGraph {
    type Output = Join;

    fn index(&self, id: JoinId) -> &Join {
        &self.joins[id.0]
    }
}

impl IndexMut<JoinId> for IrGraph {
    fn index_mut(&mut self, id: JoinId) -> &mut Join {
        &mut self.joins[id.0]
    }
}
