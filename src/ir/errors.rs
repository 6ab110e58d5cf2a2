use thiserror::Error;

use crate::catalog::CatalogError;

/// Broad class of an [`IrBuildError`]. None of them is transient; every class
/// aborts the current translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrErrorKind {
    Construction,
    UnsupportedOperator,
    InvariantViolation,
    Catalog,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum IrBuildError {
    #[error("Reference {reference} has no owning select")]
    DetachedReference { reference: String },

    #[error("Join target {target} does not belong to {select}")]
    JoinTargetNotOwned { target: String, select: String },

    #[error("Join condition on {select} touches {reference}, which belongs to another select")]
    ForeignConditionReference { reference: String, select: String },

    #[error("Join in {select} uses {reference} before it is joined")]
    ReferenceNotYetJoined { reference: String, select: String },

    #[error("Cannot navigate `{navigation}` from {reference}: {reason}")]
    InvalidNavigationSource {
        reference: String,
        navigation: String,
        reason: String,
    },

    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),

    #[error("Operator `{operator}` expects {expected} operand(s), got {actual}")]
    OperatorArity {
        operator: String,
        expected: usize,
        actual: usize,
    },

    #[error("Unexpected {kind} while {context}")]
    UnexpectedSelectable { kind: String, context: String },

    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl IrBuildError {
    pub fn kind(&self) -> IrErrorKind {
        match self {
            IrBuildError::DetachedReference { .. }
            | IrBuildError::JoinTargetNotOwned { .. }
            | IrBuildError::ForeignConditionReference { .. }
            | IrBuildError::ReferenceNotYetJoined { .. }
            | IrBuildError::InvalidNavigationSource { .. }
            | IrBuildError::OperatorArity { .. } => IrErrorKind::Construction,
            IrBuildError::UnsupportedOperator(_) => IrErrorKind::UnsupportedOperator,
            IrBuildError::UnexpectedSelectable { .. } | IrBuildError::InvariantViolation(_) => {
                IrErrorKind::InvariantViolation
            }
            IrBuildError::Catalog(_) => IrErrorKind::Catalog,
        }
    }
}
