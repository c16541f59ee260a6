use crate::core::error::{LedgerError, LedgerResult};
use crate::core::money::Money;
use crate::core::person::PersonId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use uuid::Uuid;

/// Unique identifier of an expense record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(String);

impl ExpenseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everyone who shares an expense: the listed participants plus the payer.
///
/// The payer always takes part in an expense whether or not the caller
/// listed them. This type is the one place that union is formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantSet {
    payer: PersonId,
    members: BTreeSet<PersonId>,
}

impl ParticipantSet {
    pub fn new<'a>(payer: &PersonId, participants: impl IntoIterator<Item = &'a PersonId>) -> Self {
        let mut members: BTreeSet<PersonId> = participants.into_iter().cloned().collect();
        members.insert(payer.clone());
        Self {
            payer: payer.clone(),
            members,
        }
    }

    pub fn payer(&self) -> &PersonId {
        &self.payer
    }

    pub fn contains(&self, id: &PersonId) -> bool {
        self.members.contains(id)
    }

    /// Members in id order.
    pub fn iter(&self) -> impl Iterator<Item = &PersonId> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// A shared expense: who paid, how much, and who owes what share of it.
///
/// Expenses are immutable once created. They are produced by
/// [`ExpenseDraft::create`](crate::allocation::draft::ExpenseDraft::create)
/// or loaded from an external store, and the balance calculator reads them
/// without modification.
///
/// `splits` maps each participant to the share of `amount` they owe,
/// including the payer's own share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    id: ExpenseId,
    description: String,
    amount: Money,
    paid_by: PersonId,
    date: NaiveDate,
    participants: BTreeSet<PersonId>,
    splits: BTreeMap<PersonId, Money>,
}

impl Expense {
    /// Assemble an expense from stored parts.
    ///
    /// The record is checked with [`Expense::validate`] before it is
    /// returned.
    pub fn from_parts(
        id: ExpenseId,
        description: impl Into<String>,
        amount: Money,
        paid_by: PersonId,
        date: NaiveDate,
        participants: BTreeSet<PersonId>,
        splits: BTreeMap<PersonId, Money>,
    ) -> LedgerResult<Self> {
        let expense = Self {
            id,
            description: description.into(),
            amount,
            paid_by,
            date,
            participants,
            splits,
        };
        expense.validate()?;
        Ok(expense)
    }

    /// Replace the identifier, e.g. with one assigned by the store.
    pub fn with_id(mut self, id: ExpenseId) -> Self {
        self.id = id;
        self
    }

    /// Check the record invariants:
    ///
    /// - `amount` is positive and someone paid it,
    /// - at least one participant is listed,
    /// - no split is negative and every split belongs to a participant or
    ///   the payer,
    /// - the splits add up to `amount` within one cent.
    pub fn validate(&self) -> LedgerResult<()> {
        let invalid = |reason: String| LedgerError::InvalidExpense {
            id: self.id.to_string(),
            reason,
        };

        if !self.amount.is_positive() {
            return Err(invalid(format!("amount {} is not positive", self.amount)));
        }
        if self.paid_by.is_blank() {
            return Err(invalid("payer is blank".to_string()));
        }
        if self.participants.is_empty() {
            return Err(invalid("no participants".to_string()));
        }

        let sharers = self.effective_participants();
        for (person, share) in &self.splits {
            if !sharers.contains(person) {
                return Err(invalid(format!("{} has a split but is not a participant", person)));
            }
            if share.is_negative() {
                return Err(invalid(format!("{} has a negative split {}", person, share)));
            }
        }

        let split_total = self.split_total();
        if (split_total - self.amount).abs() > Money::CENT {
            return Err(invalid(format!(
                "splits sum to {} but amount is {}",
                split_total, self.amount
            )));
        }
        Ok(())
    }

    /// The listed participants plus the payer.
    pub fn effective_participants(&self) -> ParticipantSet {
        ParticipantSet::new(&self.paid_by, &self.participants)
    }

    /// Sum of all split shares, the payer's included.
    pub fn split_total(&self) -> Money {
        self.splits.values().sum()
    }

    /// Share owed by `person`, zero if they have none.
    pub fn share_of(&self, person: &PersonId) -> Money {
        self.splits.get(person).copied().unwrap_or(Money::ZERO)
    }

    // --- Accessors ---

    pub fn id(&self) -> &ExpenseId {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn paid_by(&self) -> &PersonId {
        &self.paid_by
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn participants(&self) -> &BTreeSet<PersonId> {
        &self.participants
    }

    pub fn splits(&self) -> &BTreeMap<PersonId, Money> {
        &self.splits
    }
}
