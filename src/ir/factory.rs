//! IR construction.
//!
//! [`IrFactory`] owns the arena of one translation run and is the only place
//! nodes are created. Defaults are fixed here: joins start as inner joins,
//! references start with an empty resolution cache, and every construction
//! that would produce a dangling relation fails instead.
//!
//! Concurrent translations each build their own factory; nothing here is
//! shared between runs except the (cloned) configuration.

use std::collections::HashMap;

use super::errors::IrBuildError;
use super::graph::IrGraph;
use super::nodes::{
    Column, DbExpr, GroupByCollection, Join, OperatorApplication, OrderByItem, RefColumn,
    Referee, Reference, Select, Selectable,
};
use super::operators::{DbOperator, ExprToken, OperatorMapper};
use super::types::{JoinId, JoinType, RefId, SelectId, SortDirection, ValueType};
use crate::config::TranslatorConfig;
use crate::utils::alias_naming::{join_key_alias, AliasGenerator};

#[derive(Debug)]
pub struct IrFactory {
    graph: IrGraph,
    config: TranslatorConfig,
    operators: OperatorMapper,
    aliases: AliasGenerator,
}

impl Default for IrFactory {
    fn default() -> Self {
        Self::new(TranslatorConfig::default())
    }
}

impl IrFactory {
    pub fn new(config: TranslatorConfig) -> Self {
        Self {
            graph: IrGraph::new(),
            operators: OperatorMapper::new(&config),
            config,
            aliases: AliasGenerator::new(),
        }
    }

    pub fn graph(&self) -> &IrGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut IrGraph {
        &mut self.graph
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Ends the run; the returned graph is what the renderer reads.
    pub fn finish(self) -> IrGraph {
        log::debug!(
            "IR run finished: {} selects, {} references, {} joins",
            self.graph.selects.len(),
            self.graph.references.len(),
            self.graph.joins.len()
        );
        self.graph
    }

    /// Select over an entity's table. The FROM reference gets a generated alias.
    pub fn build_table_select(&mut self, entity: &str, table_name: &str) -> SelectId {
        let alias = self.aliases.next_table_alias(table_name);
        let referee = Referee::Table {
            entity: entity.to_string(),
            table_name: table_name.to_string(),
        };
        self.build_select_over(referee, alias)
    }

    /// Wraps `inner` as a subquery of a new select. The inner select's owner
    /// becomes the new select.
    pub fn build_sub_select(&mut self, inner: SelectId) -> Result<SelectId, IrBuildError> {
        if let Some(owner) = self.graph[inner].owner {
            return Err(IrBuildError::InvariantViolation(format!(
                "{} is already nested inside {}",
                inner, owner
            )));
        }
        let alias = self.aliases.next_alias(&self.config.sub_select_prefix);
        let outer = self.build_select_over(Referee::Select(inner), alias);
        self.graph[inner].owner = Some(outer);
        Ok(outer)
    }

    fn build_select_over(&mut self, referee: Referee, alias: String) -> SelectId {
        let from = self.graph.push_reference(|id| Reference {
            id,
            owner_select: None,
            alias: Some(alias),
            referee,
            ref_selection: HashMap::new(),
        });
        let select = self.graph.push_select(|id| Select {
            id,
            owner: None,
            from,
            selection: Vec::new(),
            joins: Vec::new(),
            group_bys: None,
            filter: None,
            order_bys: Vec::new(),
            navigation_joins: HashMap::new(),
        });
        self.graph[from].owner_select = Some(select);
        log::debug!("Built {} from {}", select, self.graph.describe_reference(from));
        select
    }

    /// A new reference with no alias and an empty resolution cache. `owner`
    /// may be `None`; such a reference cannot have columns built on it.
    pub fn build_reference(&mut self, referee: Referee, owner: Option<SelectId>) -> RefId {
        self.graph.push_reference(|id| Reference {
            id,
            owner_select: owner,
            alias: None,
            referee,
            ref_selection: HashMap::new(),
        })
    }

    /// A reference to an entity's table inside `owner`, with a generated alias.
    pub fn build_table_reference(
        &mut self,
        owner: SelectId,
        entity: &str,
        table_name: &str,
    ) -> RefId {
        let alias = self.aliases.next_table_alias(table_name);
        let reference = self.build_reference(
            Referee::Table {
                entity: entity.to_string(),
                table_name: table_name.to_string(),
            },
            Some(owner),
        );
        self.graph[reference].alias = Some(alias);
        reference
    }

    pub fn build_column(
        &self,
        reference: RefId,
        name: impl Into<String>,
        val_type: ValueType,
        alias: Option<String>,
    ) -> Result<Column, IrBuildError> {
        if self.graph[reference].owner_select.is_none() {
            return Err(IrBuildError::DetachedReference {
                reference: self.graph.describe_reference(reference),
            });
        }
        Ok(Column {
            reference,
            name: name.into(),
            val_type,
            alias,
            is_join_key: false,
        })
    }

    /// Column used only to express a join; aliased with the configured suffix.
    pub fn build_join_key_column(
        &self,
        reference: RefId,
        name: &str,
        val_type: ValueType,
    ) -> Result<Column, IrBuildError> {
        let alias = join_key_alias(name, &self.config.join_key_suffix);
        let mut column = self.build_column(reference, name, val_type, Some(alias))?;
        column.is_join_key = true;
        Ok(column)
    }

    /// Unexpanded navigation access on `reference`. When `template` is given it
    /// becomes the next link of the chain.
    pub fn build_ref_column(
        &self,
        reference: RefId,
        alias: Option<String>,
        template: Option<&RefColumn>,
    ) -> RefColumn {
        RefColumn {
            reference,
            alias,
            ref_to: template.map(|t| Box::new(t.clone())),
        }
    }

    /// Appends an inner join to `owner`. Joins are kept in construction order:
    /// the source and every reference in the condition other than the target
    /// must already be the FROM reference or the target of an earlier join.
    pub fn build_join(
        &mut self,
        owner: SelectId,
        source: RefId,
        target: RefId,
        condition: DbExpr,
    ) -> Result<JoinId, IrBuildError> {
        if self.graph[target].owner_select != Some(owner) {
            return Err(IrBuildError::JoinTargetNotOwned {
                target: self.graph.describe_reference(target),
                select: owner.to_string(),
            });
        }
        for reference in std::iter::once(source).chain(condition.references()) {
            if self.graph[reference].owner_select != Some(owner) {
                return Err(IrBuildError::ForeignConditionReference {
                    reference: self.graph.describe_reference(reference),
                    select: owner.to_string(),
                });
            }
            if reference != target && !self.is_joined(owner, reference) {
                return Err(IrBuildError::ReferenceNotYetJoined {
                    reference: self.graph.describe_reference(reference),
                    select: owner.to_string(),
                });
            }
        }

        let join = self.graph.push_join(|id| Join {
            id,
            owner_select: owner,
            source,
            target,
            kind: JoinType::Inner,
            condition,
        });
        self.graph[owner].joins.push(join);
        log::debug!(
            "Built {} in {}: {} -> {}",
            join,
            owner,
            self.graph.describe_reference(source),
            self.graph.describe_reference(target)
        );
        Ok(join)
    }

    /// True once `reference` is the FROM of `select` or the target of one of
    /// its joins.
    fn is_joined(&self, select: SelectId, reference: RefId) -> bool {
        let select = &self.graph[select];
        select.from == reference
            || select
                .joins
                .iter()
                .any(|j| self.graph[*j].target == reference)
    }

    /// Binary expression from an upstream token. Equality against the null
    /// literal becomes `is` / `is not`.
    pub fn build_binary(
        &self,
        token: ExprToken,
        left: DbExpr,
        right: DbExpr,
    ) -> Result<DbExpr, IrBuildError> {
        let against_null = [&left, &right]
            .iter()
            .any(|e| matches!(e, DbExpr::Selectable(s) if s.is_null_constant()));
        let operator = self.operators.comparison_operator(token, against_null)?;
        self.build_operator_application(operator, vec![left, right])
    }

    pub fn build_unary(&self, token: ExprToken, operand: DbExpr) -> Result<DbExpr, IrBuildError> {
        let operator = self.operators.db_operator(token)?;
        self.build_operator_application(operator, vec![operand])
    }

    pub fn build_operator_application(
        &self,
        operator: DbOperator,
        operands: Vec<DbExpr>,
    ) -> Result<DbExpr, IrBuildError> {
        if operands.len() != operator.arity() {
            return Err(IrBuildError::OperatorArity {
                operator: operator.to_string(),
                expected: operator.arity(),
                actual: operands.len(),
            });
        }
        Ok(DbExpr::OperatorApplicationExp(OperatorApplication { operator, operands }))
    }

    /// Starts grouping on `select`. Entries already selected are not copied
    /// into the new collection.
    pub fn set_group_by(&mut self, select: SelectId, is_single_key: bool) {
        self.graph[select].group_bys = Some(GroupByCollection::new(is_single_key));
    }

    /// ANDs `predicate` onto the select's filter.
    pub fn add_filter(&mut self, select: SelectId, predicate: DbExpr) {
        let select = &mut self.graph[select];
        select.filter = Some(match select.filter.take() {
            Some(existing) => existing.and(predicate),
            None => predicate,
        });
    }

    pub fn add_order_by(
        &mut self,
        select: SelectId,
        selectable: Selectable,
        direction: SortDirection,
    ) {
        self.graph[select].order_bys.push(OrderByItem {
            selectable,
            direction,
        });
    }
}
