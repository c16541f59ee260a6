use crate::core::expense::Expense;
use crate::core::ledger::Balances;
use crate::core::money::Money;
use crate::core::person::Roster;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Balances for a whole expense history, with the totals behind them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceReport {
    balances: Balances,
    /// Number of expenses processed.
    expense_count: usize,
    /// Sum of every expense amount.
    expense_total: Money,
    /// Sum of every share owed to someone else before netting.
    gross_debt: Money,
}

impl BalanceReport {
    pub fn balances(&self) -> &Balances {
        &self.balances
    }

    pub fn into_balances(self) -> Balances {
        self.balances
    }

    pub fn expense_count(&self) -> usize {
        self.expense_count
    }

    pub fn expense_total(&self) -> Money {
        self.expense_total
    }

    /// What would change hands if every share were paid back individually.
    pub fn gross_debt(&self) -> Money {
        self.gross_debt
    }

    /// What has to change hands once debts are netted per person.
    pub fn net_debt(&self) -> Money {
        self.balances.total_owed()
    }

    /// Portion of the gross debt removed by netting, as a percentage.
    pub fn netting_percent(&self) -> f64 {
        if self.gross_debt.is_zero() {
            return 0.0;
        }
        let saved = (self.gross_debt - self.net_debt()).cents() as f64;
        saved * 100.0 / self.gross_debt.cents() as f64
    }

    /// Money is conserved: balances sum to zero.
    pub fn is_valid(&self) -> bool {
        self.balances.is_balanced()
    }
}

/// Aggregates an expense history into one net balance per person.
pub struct BalanceCalculator;

impl BalanceCalculator {
    /// Net balance of every person across `expenses`.
    ///
    /// Everyone on the roster gets a position, zero if they never shared
    /// an expense. For each expense, every share owed by someone other
    /// than the payer is credited to the payer and debited from the
    /// sharer; the payer's own share moves nothing.
    ///
    /// The result is a plain sum, so it does not depend on the order of
    /// `expenses`, and it is exact: nothing is rounded or filtered here.
    ///
    /// A share owed by someone missing from the roster is still counted,
    /// so the balances keep summing to zero.
    pub fn compute_balances(expenses: &[Expense], roster: &Roster) -> Balances {
        Self::report(expenses, roster).into_balances()
    }

    /// Same as [`compute_balances`](Self::compute_balances), with totals.
    pub fn report(expenses: &[Expense], roster: &Roster) -> BalanceReport {
        let mut balances = Balances::new();
        for id in roster.ids() {
            balances.open(id);
        }

        let mut expense_total = Money::ZERO;
        let mut gross_debt = Money::ZERO;

        for expense in expenses {
            let payer = expense.paid_by();
            expense_total += expense.amount();

            if !roster.is_empty() && !roster.contains(payer) {
                warn!("expense {} was paid by {}, who is not on the roster", expense.id(), payer);
            }

            for (sharer, owed) in expense.splits() {
                if sharer == payer {
                    continue;
                }
                if !roster.is_empty() && !roster.contains(sharer) {
                    warn!(
                        "expense {} has a share for {}, who is not on the roster",
                        expense.id(),
                        sharer
                    );
                }
                balances.credit(payer, *owed);
                balances.debit(sharer, *owed);
                gross_debt += *owed;
            }
        }

        debug!(
            "computed {} balances from {} expenses (gross debt {}, net {})",
            balances.len(),
            expenses.len(),
            gross_debt,
            balances.total_owed()
        );

        BalanceReport {
            balances,
            expense_count: expenses.len(),
            expense_total,
            gross_debt,
        }
    }
}

impl std::fmt::Display for BalanceReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Balance Report ===")?;
        writeln!(f, "Expenses:       {}", self.expense_count)?;
        writeln!(f, "Total Spent:    {}", self.expense_total)?;
        writeln!(f, "Gross Debt:     {}", self.gross_debt)?;
        writeln!(f, "Net Debt:       {}", self.net_debt())?;
        writeln!(f, "Netted:         {:.1}%", self.netting_percent())?;
        writeln!(f, "Valid:          {}", self.is_valid())?;
        Ok(())
    }
}
