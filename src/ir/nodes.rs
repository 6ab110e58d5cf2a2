//! IR node types.
//!
//! Selects, References and Joins live in the [`IrGraph`](super::graph::IrGraph)
//! arena and point at each other through handles. Selectables and expressions
//! are plain values that carry handles.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::operators::DbOperator;
use super::types::{JoinId, JoinType, Literal, RefId, SelectId, SortDirection, ValueType};

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum Referee {
    /// A physical table backing a catalog entity
    Table { entity: String, table_name: String },
    /// A nested select, rendered as a parenthesized subquery
    Select(SelectId),
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Reference {
    pub(crate) id: RefId,
    pub(crate) owner_select: Option<SelectId>,
    pub(crate) alias: Option<String>,
    pub(crate) referee: Referee,
    /// Navigation columns resolved against this reference, keyed by column name.
    /// Entries are overwritten but never removed.
    pub(crate) ref_selection: HashMap<String, Column>,
}

impl Reference {
    pub fn owner_select(&self) -> Option<SelectId> {
        self.owner_select
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn referee(&self) -> &Referee {
        &self.referee
    }

    pub fn resolved_column(&self, name: &str) -> Option<&Column> {
        self.ref_selection.get(name)
    }

    pub fn resolved_columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.ref_selection.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Column {
    pub reference: RefId,
    pub name: String,
    pub val_type: ValueType,
    pub alias: Option<String>,
    pub is_join_key: bool,
}

impl Column {
    /// Name the column is visible under once selected.
    pub fn alias_or_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// Navigation access that has not been expanded into columns yet.
///
/// `ref_to` is the same access one select level further in; the chain ends at
/// the reference that actually owns the columns.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct RefColumn {
    pub reference: RefId,
    pub alias: Option<String>,
    pub ref_to: Option<Box<RefColumn>>,
}

impl RefColumn {
    /// Links from this one to the innermost, outermost first.
    pub fn chain(&self) -> Vec<&RefColumn> {
        let mut links = vec![self];
        let mut current = self;
        while let Some(next) = current.ref_to.as_deref() {
            links.push(next);
            current = next;
        }
        links
    }

    pub fn innermost(&self) -> &RefColumn {
        let mut current = self;
        while let Some(next) = current.ref_to.as_deref() {
            current = next;
        }
        current
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: Box<Selectable>,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: Selectable) -> Self {
        Self {
            key: key.into(),
            value: Box::new(value),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Constant {
    pub value: Literal,
    pub alias: Option<String>,
}

#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct GroupByCollection {
    items: Vec<Selectable>,
    pub is_single_key: bool,
}

impl GroupByCollection {
    pub fn new(is_single_key: bool) -> Self {
        Self {
            items: Vec::new(),
            is_single_key,
        }
    }

    pub fn add(&mut self, selectable: Selectable) {
        self.items.push(selectable);
    }

    /// Columns are the same key when they read the same reference and name,
    /// whatever they are aliased as.
    pub fn contains(&self, selectable: &Selectable) -> bool {
        self.items.iter().any(|item| match (item, selectable) {
            (Selectable::Column(a), Selectable::Column(b)) => {
                a.reference == b.reference && a.name == b.name
            }
            _ => item == selectable,
        })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Selectable> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a GroupByCollection {
    type Item = &'a Selectable;
    type IntoIter = std::slice::Iter<'a, Selectable>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Anything that can be placed in a SELECT list.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum Selectable {
    Column(Column),
    RefColumn(RefColumn),
    Reference(RefId),
    KeyValue(KeyValue),
    /// Anonymous shape: an ordered list of named members
    KeyValues(Vec<KeyValue>),
    GroupBy(GroupByCollection),
    Constant(Constant),
}

impl Selectable {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Selectable::Column(_) => "column",
            Selectable::RefColumn(_) => "ref column",
            Selectable::Reference(_) => "reference",
            Selectable::KeyValue(_) => "key/value pair",
            Selectable::KeyValues(_) => "key/value list",
            Selectable::GroupBy(_) => "group by collection",
            Selectable::Constant(_) => "constant",
        }
    }

    pub fn alias(&self) -> Option<&str> {
        match self {
            Selectable::Column(c) => c.alias.as_deref(),
            Selectable::RefColumn(rc) => rc.alias.as_deref(),
            Selectable::Constant(c) => c.alias.as_deref(),
            Selectable::KeyValue(kv) => Some(kv.key.as_str()),
            Selectable::Reference(_) | Selectable::KeyValues(_) | Selectable::GroupBy(_) => None,
        }
    }

    /// Stamps an alias on a leaf. Composite selectables are left unchanged.
    pub(crate) fn set_alias(&mut self, alias: Option<String>) {
        match self {
            Selectable::Column(c) => c.alias = alias,
            Selectable::RefColumn(rc) => rc.alias = alias,
            Selectable::Constant(c) => c.alias = alias,
            Selectable::Reference(_)
            | Selectable::KeyValue(_)
            | Selectable::KeyValues(_)
            | Selectable::GroupBy(_) => {}
        }
    }

    pub fn is_null_constant(&self) -> bool {
        matches!(self, Selectable::Constant(c) if c.value.is_null())
    }

    /// References this selectable touches directly, in order of appearance.
    pub fn references(&self) -> Vec<RefId> {
        let mut refs = Vec::new();
        let mut pending = vec![self];
        while let Some(current) = pending.pop() {
            match current {
                Selectable::Column(c) => refs.push(c.reference),
                Selectable::RefColumn(rc) => refs.push(rc.reference),
                Selectable::Reference(r) => refs.push(*r),
                Selectable::KeyValue(kv) => pending.push(&kv.value),
                Selectable::KeyValues(kvs) => {
                    pending.extend(kvs.iter().rev().map(|kv| kv.value.as_ref()))
                }
                Selectable::GroupBy(group_by) => pending.extend(group_by.items.iter().rev()),
                Selectable::Constant(_) => {}
            }
        }
        refs
    }
}

impl From<Column> for Selectable {
    fn from(column: Column) -> Self {
        Selectable::Column(column)
    }
}

impl From<RefColumn> for Selectable {
    fn from(ref_column: RefColumn) -> Self {
        Selectable::RefColumn(ref_column)
    }
}

impl From<Literal> for Selectable {
    fn from(value: Literal) -> Self {
        Selectable::Constant(Constant { value, alias: None })
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct OperatorApplication {
    pub operator: DbOperator,
    pub operands: Vec<DbExpr>,
}

/// Boolean or scalar expression used by join conditions and filters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum DbExpr {
    Selectable(Selectable),
    OperatorApplicationExp(OperatorApplication),
}

impl DbExpr {
    /// Every reference the expression touches, deduplicated, in order of appearance.
    pub fn references(&self) -> Vec<RefId> {
        let mut refs: Vec<RefId> = Vec::new();
        let mut pending = vec![self];
        while let Some(expr) = pending.pop() {
            match expr {
                DbExpr::Selectable(s) => {
                    for r in s.references() {
                        if !refs.contains(&r) {
                            refs.push(r);
                        }
                    }
                }
                DbExpr::OperatorApplicationExp(app) => pending.extend(app.operands.iter().rev()),
            }
        }
        refs
    }

    pub fn and(self, other: DbExpr) -> DbExpr {
        DbExpr::OperatorApplicationExp(OperatorApplication {
            operator: DbOperator::And,
            operands: vec![self, other],
        })
    }
}

impl From<Selectable> for DbExpr {
    fn from(selectable: Selectable) -> Self {
        DbExpr::Selectable(selectable)
    }
}

impl From<Column> for DbExpr {
    fn from(column: Column) -> Self {
        DbExpr::Selectable(Selectable::Column(column))
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Join {
    pub(crate) id: JoinId,
    pub(crate) owner_select: SelectId,
    pub(crate) source: RefId,
    pub(crate) target: RefId,
    pub(crate) kind: JoinType,
    pub(crate) condition: DbExpr,
}

impl Join {
    pub fn owner_select(&self) -> SelectId {
        self.owner_select
    }

    pub fn source(&self) -> RefId {
        self.source
    }

    pub fn target(&self) -> RefId {
        self.target
    }

    /// Only the join-type promoter upgrades this.
    pub fn kind(&self) -> JoinType {
        self.kind
    }

    pub fn condition(&self) -> &DbExpr {
        &self.condition
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct OrderByItem {
    pub selectable: Selectable,
    pub direction: SortDirection,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Select {
    pub(crate) id: SelectId,
    pub(crate) owner: Option<SelectId>,
    pub(crate) from: RefId,
    pub(crate) selection: Vec<Selectable>,
    pub(crate) joins: Vec<JoinId>,
    pub(crate) group_bys: Option<GroupByCollection>,
    pub(crate) filter: Option<DbExpr>,
    pub(crate) order_bys: Vec<OrderByItem>,
    /// (source reference, navigation name) -> join created for it
    #[serde(skip)]
    pub(crate) navigation_joins: HashMap<(RefId, String), JoinId>,
}

impl Select {
    pub fn id(&self) -> SelectId {
        self.id
    }

    /// Enclosing select when this one is a subquery.
    pub fn owner(&self) -> Option<SelectId> {
        self.owner
    }

    pub fn from(&self) -> RefId {
        self.from
    }

    pub fn selection(&self) -> &[Selectable] {
        &self.selection
    }

    /// Joins in construction order.
    pub fn joins(&self) -> &[JoinId] {
        &self.joins
    }

    pub fn group_by(&self) -> Option<&GroupByCollection> {
        self.group_bys.as_ref()
    }

    pub fn filter(&self) -> Option<&DbExpr> {
        self.filter.as_ref()
    }

    pub fn order_by(&self) -> &[OrderByItem] {
        &self.order_bys
    }
}
