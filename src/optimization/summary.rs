use crate::core::ledger::Balances;
use crate::core::money::Money;
use crate::core::person::{PersonId, Roster};
use serde::{Deserialize, Serialize};

/// One person's line in a [`BalanceSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryLine {
    pub person: PersonId,
    pub name: String,
    /// Always positive; which side of the summary the line is on says who
    /// owes whom.
    pub amount: Money,
}

/// Display-ready view of group balances.
///
/// Unlike [`Balances`], this hides everyone within one cent of zero and
/// orders people by how much is at stake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSummary {
    /// People the group owes money to, largest first.
    pub owed: Vec<SummaryLine>,
    /// People who owe the group money, largest debt first.
    pub owing: Vec<SummaryLine>,
    pub total_owed: Money,
    pub total_owing: Money,
}

impl BalanceSummary {
    pub fn from_balances(balances: &Balances, roster: &Roster) -> Self {
        let mut visible: Vec<(&PersonId, Money)> = balances
            .iter()
            .filter(|(_, amount)| amount.abs() > Money::CENT)
            .collect();
        visible.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        let line = |id: &PersonId, amount: Money| SummaryLine {
            person: id.clone(),
            name: roster.display_name(id).to_string(),
            amount: amount.abs(),
        };

        let owed: Vec<SummaryLine> = visible
            .iter()
            .filter(|(_, amount)| amount.is_positive())
            .map(|(id, amount)| line(*id, *amount))
            .collect();
        let mut debts: Vec<&(&PersonId, Money)> =
            visible.iter().filter(|(_, amount)| amount.is_negative()).collect();
        debts.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        let owing: Vec<SummaryLine> = debts.iter().map(|(id, amount)| line(*id, *amount)).collect();

        BalanceSummary {
            total_owed: owed.iter().map(|l| l.amount).sum(),
            total_owing: owing.iter().map(|l| l.amount).sum(),
            owed,
            owing,
        }
    }

    /// Nobody is more than a cent away from even.
    pub fn is_square(&self) -> bool {
        self.owed.is_empty() && self.owing.is_empty()
    }
}

impl std::fmt::Display for BalanceSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Balances ===")?;
        if self.is_square() {
            writeln!(f, "No balances to settle. Everyone is square!")?;
            return Ok(());
        }

        writeln!(f, "Owed money ({}):", self.total_owed)?;
        if self.owed.is_empty() {
            writeln!(f, "  nobody")?;
        }
        for line in &self.owed {
            writeln!(f, "  {:<20} {:>12}", line.name, line.amount.to_string())?;
        }

        writeln!(f, "\nOwes money ({}):", self.total_owing)?;
        if self.owing.is_empty() {
            writeln!(f, "  nobody")?;
        }
        for line in &self.owing {
            writeln!(f, "  {:<20} {:>12}", line.name, line.amount.to_string())?;
        }
        Ok(())
    }
}
