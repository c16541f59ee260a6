//! # split-ledger
//!
//! Shared-expense ledger and settlement engine.
//!
//! Given who paid for what within a group, this engine works out each
//! person's share of every expense, each person's net balance across the
//! whole history, and a short list of payments that brings everyone back
//! to zero.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: people, money, expenses, balances
//! - **allocation** — Splitting an expense into per-person shares
//! - **optimization** — Balance aggregation and settlement planning
//! - **simulation** — Random expense histories for stress testing
//!
//! Every computation is a pure function of its inputs; the engine keeps no
//! state between calls and persists nothing.

pub mod allocation;
pub mod core;
pub mod optimization;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::allocation::draft::{create_expense, ExpenseDraft};
    pub use crate::allocation::split::{SplitCalculator, SplitMode};
    pub use crate::core::error::{LedgerError, LedgerResult};
    pub use crate::core::expense::{Expense, ExpenseId, ParticipantSet};
    pub use crate::core::ledger::Balances;
    pub use crate::core::money::Money;
    pub use crate::core::person::{Person, PersonId, Roster};
    pub use crate::optimization::balance::{BalanceCalculator, BalanceReport};
    pub use crate::optimization::settlement::{
        plan_settlements, PlannerConfig, Settlement, SettlementPlan, SettlementPlanner,
    };
    pub use crate::optimization::summary::BalanceSummary;
}
