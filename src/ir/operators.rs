//! Operator mapping.
//!
//! The upstream walker speaks in [`ExprToken`]s, a superset of what the IR can
//! express. [`OperatorMapper`] narrows a token to a [`DbOperator`] or fails with
//! [`IrBuildError::UnsupportedOperator`]; [`DbOperator::sql`] gives the SQL text.
//! Nothing here is silently approximated: modulo, bitwise operators, shifts,
//! concatenation, coalesce and power are rejected.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::IrBuildError;
use crate::config::TranslatorConfig;

/// Operator tokens produced by the upstream expression walker.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum ExprToken {
    AndAlso,
    OrElse,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
    Equal,
    NotEqual,
    Not,
    Negate,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    BitwiseAnd,
    BitwiseOr,
    ExclusiveOr,
    LeftShift,
    RightShift,
    Coalesce,
    Concat,
}

/// The fixed operator set the IR carries.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum DbOperator {
    And,
    Or,
    Add,
    Subtract,
    Multiply,
    Divide,
    Equal,
    NotEqual,
    Not,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Is,
    IsNot,
}

impl DbOperator {
    pub const ALL: [DbOperator; 15] = [
        DbOperator::And,
        DbOperator::Or,
        DbOperator::Add,
        DbOperator::Subtract,
        DbOperator::Multiply,
        DbOperator::Divide,
        DbOperator::Equal,
        DbOperator::NotEqual,
        DbOperator::Not,
        DbOperator::GreaterThan,
        DbOperator::GreaterThanOrEqual,
        DbOperator::LessThan,
        DbOperator::LessThanOrEqual,
        DbOperator::Is,
        DbOperator::IsNot,
    ];

    pub fn sql(self) -> &'static str {
        match self {
            DbOperator::And => "and",
            DbOperator::Or => "or",
            DbOperator::Add => "+",
            DbOperator::Subtract => "-",
            DbOperator::Multiply => "*",
            DbOperator::Divide => "/",
            DbOperator::Is => "is",
            DbOperator::IsNot => "is not",
            DbOperator::Equal => "=",
            DbOperator::NotEqual => "!=",
            DbOperator::Not => "not",
            DbOperator::GreaterThan => ">",
            DbOperator::GreaterThanOrEqual => ">=",
            DbOperator::LessThan => "<",
            DbOperator::LessThanOrEqual => "<=",
        }
    }

    /// Number of operands the operator takes.
    pub fn arity(self) -> usize {
        match self {
            DbOperator::Not => 1,
            _ => 2,
        }
    }
}

impl fmt::Display for DbOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperatorMapper {
    legacy_greater_than_or_equal: bool,
}

impl OperatorMapper {
    pub fn new(config: &TranslatorConfig) -> Self {
        if config.legacy_greater_than_or_equal {
            log::warn!("Legacy operator mode: `>=` will be emitted as `>`");
        }
        Self {
            legacy_greater_than_or_equal: config.legacy_greater_than_or_equal,
        }
    }

    pub fn db_operator(&self, token: ExprToken) -> Result<DbOperator, IrBuildError> {
        let op = match token {
            ExprToken::AndAlso => DbOperator::And,
            ExprToken::OrElse => DbOperator::Or,
            ExprToken::Add => DbOperator::Add,
            ExprToken::Subtract => DbOperator::Subtract,
            ExprToken::Multiply => DbOperator::Multiply,
            ExprToken::Divide => DbOperator::Divide,
            ExprToken::Equal => DbOperator::Equal,
            ExprToken::NotEqual => DbOperator::NotEqual,
            ExprToken::Not => DbOperator::Not,
            ExprToken::GreaterThan => DbOperator::GreaterThan,
            ExprToken::GreaterThanOrEqual if self.legacy_greater_than_or_equal => {
                DbOperator::GreaterThan
            }
            ExprToken::GreaterThanOrEqual => DbOperator::GreaterThanOrEqual,
            ExprToken::LessThan => DbOperator::LessThan,
            ExprToken::LessThanOrEqual => DbOperator::LessThanOrEqual,
            ExprToken::Modulo
            | ExprToken::Power
            | ExprToken::Negate
            | ExprToken::BitwiseAnd
            | ExprToken::BitwiseOr
            | ExprToken::ExclusiveOr
            | ExprToken::LeftShift
            | ExprToken::RightShift
            | ExprToken::Coalesce
            | ExprToken::Concat => {
                return Err(IrBuildError::UnsupportedOperator(format!("{:?}", token)))
            }
        };
        Ok(op)
    }

    /// Comparison against the null literal becomes `is` / `is not`.
    pub fn comparison_operator(
        &self,
        token: ExprToken,
        against_null: bool,
    ) -> Result<DbOperator, IrBuildError> {
        let op = self.db_operator(token)?;
        Ok(match (op, against_null) {
            (DbOperator::Equal, true) => DbOperator::Is,
            (DbOperator::NotEqual, true) => DbOperator::IsNot,
            (op, _) => op,
        })
    }

    pub fn sql_operator(&self, token: ExprToken) -> Result<&'static str, IrBuildError> {
        self.db_operator(token).map(DbOperator::sql)
    }
}
