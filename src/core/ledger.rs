use crate::core::error::{LedgerError, LedgerResult};
use crate::core::money::Money;
use crate::core::person::PersonId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Net position of each person in the group.
///
/// A positive balance means the person is owed money (net creditor).
/// A negative balance means the person owes money (net debtor).
///
/// Positions are kept in id order so that anything emitted from a
/// `Balances` has a stable, documented ordering. For any well-formed
/// expense history the positions sum to exactly zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balances {
    positions: BTreeMap<PersonId, Money>,
}

impl Balances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `person` has a position, starting at zero.
    pub fn open(&mut self, person: &PersonId) {
        self.positions.entry(person.clone()).or_insert(Money::ZERO);
    }

    pub fn credit(&mut self, person: &PersonId, amount: Money) {
        *self.positions.entry(person.clone()).or_insert(Money::ZERO) += amount;
    }

    pub fn debit(&mut self, person: &PersonId, amount: Money) {
        *self.positions.entry(person.clone()).or_insert(Money::ZERO) -= amount;
    }

    /// Move `amount` from `from`'s position to `to`'s.
    ///
    /// `from` is credited and `to` is debited: paying someone you owe
    /// raises your own balance toward zero and lowers theirs.
    pub fn apply_payment(&mut self, from: &PersonId, to: &PersonId, amount: Money) {
        self.credit(from, amount);
        self.debit(to, amount);
    }

    /// Net position of `person`, zero if they have none.
    pub fn balance(&self, person: &PersonId) -> Money {
        self.positions.get(person).copied().unwrap_or(Money::ZERO)
    }

    /// All positions in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&PersonId, Money)> {
        self.positions.iter().map(|(id, amount)| (id, *amount))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Sum of every position. Zero when money is conserved.
    pub fn total(&self) -> Money {
        self.positions.values().sum()
    }

    pub fn is_balanced(&self) -> bool {
        self.total().is_zero()
    }

    /// Optional validation pass for balances built from outside data.
    pub fn validate(&self) -> LedgerResult<()> {
        let residual = self.total();
        if residual.is_zero() {
            Ok(())
        } else {
            Err(LedgerError::InputContractViolation { residual })
        }
    }

    /// Whether every position is within `tolerance` of zero.
    pub fn is_settled(&self, tolerance: Money) -> bool {
        self.positions.values().all(|b| b.abs() <= tolerance)
    }

    /// Sum of positive positions: the total that has to change hands.
    pub fn total_owed(&self) -> Money {
        self.positions.values().filter(|b| b.is_positive()).sum()
    }
}

impl FromIterator<(PersonId, Money)> for Balances {
    fn from_iter<T: IntoIterator<Item = (PersonId, Money)>>(iter: T) -> Self {
        let mut balances = Balances::new();
        for (person, amount) in iter {
            balances.credit(&person, amount);
        }
        balances
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(id: &str) -> PersonId {
        PersonId::new(id)
    }

    #[test]
    fn test_balances_basic() {
        let mut balances = Balances::new();
        balances.credit(&p("A"), Money::from_cents(10000));
        balances.debit(&p("B"), Money::from_cents(10000));

        assert_eq!(balances.balance(&p("A")), Money::from_cents(10000));
        assert_eq!(balances.balance(&p("B")), Money::from_cents(-10000));
        assert_eq!(balances.balance(&p("C")), Money::ZERO);
        assert!(balances.is_balanced());
        assert_eq!(balances.total_owed(), Money::from_cents(10000));
    }

    #[test]
    fn test_open_keeps_existing_position() {
        let mut balances = Balances::new();
        balances.credit(&p("A"), Money::from_cents(500));
        balances.open(&p("A"));
        balances.open(&p("B"));
        assert_eq!(balances.len(), 2);
        assert_eq!(balances.balance(&p("A")), Money::from_cents(500));
    }

    #[test]
    fn test_payment_settles_debt() {
        let mut balances: Balances = [
            (p("A"), Money::from_cents(4000)),
            (p("B"), Money::from_cents(-4000)),
        ]
        .into_iter()
        .collect();
        balances.apply_payment(&p("B"), &p("A"), Money::from_cents(4000));
        assert!(balances.is_settled(Money::ZERO));
    }

    #[test]
    fn test_validate_reports_residual() {
        let balances: Balances = [
            (p("A"), Money::from_cents(6000)),
            (p("B"), Money::from_cents(-4000)),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            balances.validate(),
            Err(LedgerError::InputContractViolation {
                residual: Money::from_cents(2000)
            })
        );
    }

    #[test]
    fn test_iteration_in_id_order() {
        let balances: Balances = [
            (p("C"), Money::from_cents(-1)),
            (p("A"), Money::from_cents(2)),
            (p("B"), Money::from_cents(-1)),
        ]
        .into_iter()
        .collect();
        let order: Vec<&str> = balances.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C"]);
    }
}
