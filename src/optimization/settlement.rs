use crate::core::error::LedgerResult;
use crate::core::expense::{Expense, ExpenseId};
use crate::core::ledger::Balances;
use crate::core::money::Money;
use crate::core::person::PersonId;
use chrono::NaiveDate;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A proposed payment from a debtor to a creditor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub from: PersonId,
    pub to: PersonId,
    pub amount: Money,
}

impl Settlement {
    pub fn new(from: PersonId, to: PersonId, amount: Money) -> Self {
        Self { from, to, amount }
    }

    /// Record this payment as an expense, so that it shows up in the
    /// history and balances move accordingly.
    ///
    /// The debtor is the payer and the creditor owes the whole amount,
    /// which credits the debtor and debits the creditor by `amount`.
    pub fn to_expense(&self, date: NaiveDate) -> LedgerResult<Expense> {
        let participants: BTreeSet<PersonId> = [self.to.clone()].into_iter().collect();
        let splits: BTreeMap<PersonId, Money> = [(self.to.clone(), self.amount)].into_iter().collect();
        Expense::from_parts(
            ExpenseId::generate(),
            format!("Settlement: {} paid {}", self.from, self.to),
            self.amount,
            self.from.clone(),
            date,
            participants,
            splits,
        )
    }
}

impl std::fmt::Display for Settlement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} → {}: {}", self.from, self.to, self.amount)
    }
}

/// Planner settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Balances whose absolute value is at or below this are treated as
    /// already settled.
    pub epsilon: Money,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            epsilon: Money::CENT,
        }
    }
}

/// The payments proposed for a set of balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementPlan {
    settlements: Vec<Settlement>,
    /// Positions still beyond epsilon once matching stopped. Empty unless
    /// the input balances did not sum to zero or unmatched sub-epsilon
    /// amounts piled up on one side.
    residual: Balances,
}

impl SettlementPlan {
    pub fn settlements(&self) -> &[Settlement] {
        &self.settlements
    }

    pub fn into_settlements(self) -> Vec<Settlement> {
        self.settlements
    }

    pub fn len(&self) -> usize {
        self.settlements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settlements.is_empty()
    }

    pub fn residual(&self) -> &Balances {
        &self.residual
    }

    /// Every creditor and debtor was matched.
    pub fn is_complete(&self) -> bool {
        self.residual.is_empty()
    }

    pub fn total_transferred(&self) -> Money {
        self.settlements.iter().map(|s| s.amount).sum()
    }

    /// Per person, what the plan pays them minus what it has them pay.
    ///
    /// For a complete plan this reproduces the original balances within
    /// epsilon.
    pub fn net_flows(&self) -> Balances {
        let mut flows = Balances::new();
        for s in &self.settlements {
            flows.credit(&s.to, s.amount);
            flows.debit(&s.from, s.amount);
        }
        flows
    }

    /// The balances that remain once every payment in the plan is made.
    pub fn apply_to(&self, balances: &Balances) -> Balances {
        let mut remaining = balances.clone();
        for s in &self.settlements {
            remaining.apply_payment(&s.from, &s.to, s.amount);
        }
        remaining
    }

    /// Record every payment of the plan as an expense dated `date`.
    pub fn record(&self, date: NaiveDate) -> LedgerResult<Vec<Expense>> {
        self.settlements.iter().map(|s| s.to_expense(date)).collect()
    }
}

/// Plans the payments that bring every balance back to zero.
///
/// # Algorithm
///
/// 1. Split people into creditors (balance above epsilon) and debtors
///    (balance below minus epsilon).
/// 2. Sort creditors by balance descending and debtors by balance
///    ascending, so the largest on each side come first. Equal balances
///    keep id order.
/// 3. Walk both lists with one cursor each. At every step the current
///    debtor pays the current creditor the smaller of the two outstanding
///    amounts.
/// 4. Move past a creditor once what they are owed is within epsilon, and
///    past a debtor once what they owe is within epsilon.
/// 5. Stop when either list runs out.
///
/// Every step settles at least one person, so a plan has at most
/// `creditors + debtors - 1` payments and is built in linear time after
/// sorting. This greedy matching is an approximation: finding the true
/// minimum number of payments is NP-hard in general (it requires
/// partitioning people into zero-sum groups), and some inputs admit
/// shorter plans than the one produced here.
#[derive(Debug, Clone, Default)]
pub struct SettlementPlanner {
    config: PlannerConfig,
}

impl SettlementPlanner {
    /// A negative epsilon is treated as zero.
    pub fn new(config: PlannerConfig) -> Self {
        if config.epsilon.is_negative() {
            warn!("negative settlement epsilon {} clamped to zero", config.epsilon);
        }
        Self {
            config: PlannerConfig {
                epsilon: config.epsilon.max(Money::ZERO),
            },
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan payments for `balances`. Never fails.
    ///
    /// If the balances do not sum to zero the plan cannot clear everyone;
    /// whatever is left over is reported in [`SettlementPlan::residual`]
    /// and logged.
    pub fn plan(&self, balances: &Balances) -> SettlementPlan {
        let epsilon = self.config.epsilon;

        let mut creditors: Vec<(PersonId, Money)> = balances
            .iter()
            .filter(|(_, b)| *b > epsilon)
            .map(|(id, b)| (id.clone(), b))
            .collect();
        let mut debtors: Vec<(PersonId, Money)> = balances
            .iter()
            .filter(|(_, b)| *b < -epsilon)
            .map(|(id, b)| (id.clone(), b))
            .collect();

        creditors.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        debtors.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

        let mut settlements = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < creditors.len() && j < debtors.len() {
            let amount = creditors[i].1.min(-debtors[j].1);
            if !amount.is_positive() {
                break;
            }

            settlements.push(Settlement::new(
                debtors[j].0.clone(),
                creditors[i].0.clone(),
                amount,
            ));
            creditors[i].1 -= amount;
            debtors[j].1 += amount;

            if creditors[i].1 <= epsilon {
                i += 1;
            }
            if debtors[j].1 >= -epsilon {
                j += 1;
            }
        }

        let residual: Balances = creditors
            .into_iter()
            .chain(debtors)
            .filter(|(_, remaining)| remaining.abs() > epsilon)
            .collect();

        if !balances.is_balanced() {
            warn!(
                "balances sum to {} instead of zero; {} people left unsettled",
                balances.total(),
                residual.len()
            );
        } else if !residual.is_empty() {
            debug!("{} people left with unmatched sub-epsilon remainders", residual.len());
        }
        debug!(
            "planned {} settlements moving {} across {} balances",
            settlements.len(),
            settlements.iter().map(|s| s.amount).sum::<Money>(),
            balances.len()
        );

        SettlementPlan {
            settlements,
            residual,
        }
    }

    /// Like [`plan`](Self::plan), but rejects balances that do not sum to
    /// zero instead of planning around them.
    pub fn plan_checked(&self, balances: &Balances) -> LedgerResult<SettlementPlan> {
        balances.validate()?;
        Ok(self.plan(balances))
    }
}

/// Plan settlements with the default epsilon of one cent.
pub fn plan_settlements(balances: &Balances) -> Vec<Settlement> {
    SettlementPlanner::default().plan(balances).into_settlements()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::LedgerError;

    fn p(id: &str) -> PersonId {
        PersonId::new(id)
    }

    fn balances(entries: &[(&str, i64)]) -> Balances {
        entries
            .iter()
            .map(|(id, cents)| (p(id), Money::from_cents(*cents)))
            .collect()
    }

    fn transfers(plan: &[Settlement]) -> Vec<(&str, &str, i64)> {
        plan.iter()
            .map(|s| (s.from.as_str(), s.to.as_str(), s.amount.cents()))
            .collect()
    }

    #[test]
    fn test_one_creditor_two_debtors() {
        let input = balances(&[("A", 6000), ("B", -4000), ("C", -2000)]);
        let plan = plan_settlements(&input);
        assert_eq!(transfers(&plan), vec![("B", "A", 4000), ("C", "A", 2000)]);
    }

    #[test]
    fn test_largest_matched_first() {
        let input = balances(&[("A", 3000), ("B", 7000), ("C", -5000), ("D", -5000)]);
        let plan = plan_settlements(&input);
        assert_eq!(
            transfers(&plan),
            vec![("C", "B", 5000), ("D", "B", 2000), ("D", "A", 3000)]
        );
    }

    #[test]
    fn test_ties_broken_by_id() {
        let input = balances(&[("Z", 1000), ("A", 1000), ("M", -1000), ("B", -1000)]);
        let plan = plan_settlements(&input);
        assert_eq!(transfers(&plan), vec![("B", "A", 1000), ("M", "Z", 1000)]);
    }

    #[test]
    fn test_settled_balances_produce_no_payments() {
        assert!(plan_settlements(&Balances::new()).is_empty());
        assert!(plan_settlements(&balances(&[("A", 0), ("B", 0)])).is_empty());
        // One cent either way is already settled.
        assert!(plan_settlements(&balances(&[("A", 1), ("B", -1)])).is_empty());
    }

    #[test]
    fn test_plan_clears_every_balance() {
        let input = balances(&[
            ("A", 8000),
            ("B", -1600),
            ("C", -1517),
            ("D", -3216),
            ("E", 1250),
            ("F", -2917),
        ]);
        assert!(input.is_balanced());

        let plan = SettlementPlanner::default().plan(&input);
        assert!(plan.is_complete());
        assert!(plan.apply_to(&input).is_settled(Money::CENT));
        assert!(plan.len() <= 5);

        for (person, original) in input.iter() {
            let flow = plan.net_flows().balance(person);
            assert!((flow - original).abs() <= Money::CENT);
        }
    }

    #[test]
    fn test_unbalanced_input_reports_residual() {
        let input = balances(&[("A", 6000), ("B", -4000)]);
        let plan = SettlementPlanner::default().plan(&input);
        assert_eq!(transfers(plan.settlements()), vec![("B", "A", 4000)]);
        assert!(!plan.is_complete());
        assert_eq!(plan.residual().balance(&p("A")), Money::from_cents(2000));
    }

    #[test]
    fn test_plan_checked_rejects_unbalanced_input() {
        let input = balances(&[("A", 6000), ("B", -4000)]);
        let result = SettlementPlanner::default().plan_checked(&input);
        assert_eq!(
            result,
            Err(LedgerError::InputContractViolation {
                residual: Money::from_cents(2000)
            })
        );
    }

    #[test]
    fn test_zero_epsilon_settles_single_cents() {
        let planner = SettlementPlanner::new(PlannerConfig {
            epsilon: Money::ZERO,
        });
        let plan = planner.plan(&balances(&[("A", 1), ("B", -1)]));
        assert_eq!(transfers(plan.settlements()), vec![("B", "A", 1)]);
    }

    #[test]
    fn test_negative_epsilon_treated_as_zero() {
        let planner = SettlementPlanner::new(PlannerConfig {
            epsilon: Money::from_cents(-1),
        });
        assert_eq!(planner.config().epsilon, Money::ZERO);

        let plan = planner.plan(&balances(&[("A", 0), ("B", 0)]));
        assert!(plan.is_empty());
        assert!(plan.is_complete());

        let plan = planner.plan(&balances(&[("A", 1), ("B", 0), ("C", -1)]));
        assert_eq!(transfers(plan.settlements()), vec![("C", "A", 1)]);
    }

    #[test]
    fn test_sub_epsilon_dust_left_on_one_person() {
        let input = balances(&[("A", 3), ("B", -1), ("C", -1), ("D", -1)]);
        let plan = SettlementPlanner::default().plan(&input);
        assert!(plan.is_empty());
        assert!(plan.apply_to(&input).is_settled(Money::from_cents(3)));
        assert!(!plan.apply_to(&input).is_settled(Money::CENT));
    }

    #[test]
    fn test_recorded_settlement_moves_balances() {
        let date = NaiveDate::from_ymd_opt(2023, 7, 1).unwrap();
        let settlement = Settlement::new(p("B"), p("A"), Money::from_cents(4000));
        let expense = settlement.to_expense(date).unwrap();

        assert_eq!(expense.paid_by(), &p("B"));
        assert_eq!(expense.share_of(&p("A")), Money::from_cents(4000));
        assert_eq!(expense.share_of(&p("B")), Money::ZERO);
        assert!(expense.validate().is_ok());
    }

    #[test]
    fn test_settlement_display() {
        let s = Settlement::new(p("B"), p("A"), Money::from_cents(4000));
        assert_eq!(s.to_string(), "B → A: 40.00");
    }
}
