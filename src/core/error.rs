use crate::core::money::Money;
use crate::core::person::PersonId;
use thiserror::Error;

/// Errors raised by the ledger engine.
///
/// Every operation either returns a complete result or one of these;
/// nothing is left half-computed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("invalid amount '{0}': must be a positive, finite number")]
    InvalidAmount(String),

    #[error("an expense needs at least one participant besides the payer")]
    EmptyParticipants,

    #[error("an expense must name who paid")]
    MissingPayer,

    #[error("an expense must have a description")]
    MissingDescription,

    #[error("custom split names {0}, who is not a participant of this expense")]
    UnknownParticipant(PersonId),

    #[error("expense {id} is malformed: {reason}")]
    InvalidExpense { id: String, reason: String },

    #[error("balances do not sum to zero (residual {residual})")]
    InputContractViolation { residual: Money },
}

pub type LedgerResult<T> = Result<T, LedgerError>;
