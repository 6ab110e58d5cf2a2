pub mod errors;
pub mod factory;
pub mod graph;
pub mod join_keys;
pub mod join_promoter;
pub mod navigation;
pub mod nodes;
pub mod operators;
pub mod resolver;
mod selection;
pub mod types;

// Re-export commonly used types
pub use errors::{IrBuildError, IrErrorKind};
pub use factory::IrFactory;
pub use graph::IrGraph;
pub use join_keys::{add_join_key_selections, add_ref_selection};
pub use join_promoter::update_join_type;
pub use navigation::{get_or_create_navigation, navigate_path};
pub use nodes::{
    Column, Constant, DbExpr, GroupByCollection, Join, KeyValue, OperatorApplication,
    OrderByItem, RefColumn, Referee, Reference, Select, Selectable,
};
pub use operators::{DbOperator, ExprToken, OperatorMapper};
pub use resolver::{
    add_flattened_selection, expand_ref_column, get_or_create_selectable, process_selection,
};
pub use types::{JoinId, JoinType, Literal, RefId, SelectId, SortDirection, ValueType};
