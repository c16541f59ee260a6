use crate::allocation::split::{SplitCalculator, SplitMode};
use crate::core::error::{LedgerError, LedgerResult};
use crate::core::expense::{Expense, ExpenseId, ParticipantSet};
use crate::core::money::Money;
use crate::core::person::PersonId;
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

/// Input for a new expense, before its shares are worked out.
///
/// `participants` lists the people the payer is splitting with. The payer
/// may be listed or not; they always take part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDraft {
    pub description: String,
    pub amount: Money,
    pub paid_by: PersonId,
    pub date: NaiveDate,
    pub participants: Vec<PersonId>,
    #[serde(default = "default_split_mode")]
    pub split_mode: SplitMode,
}

fn default_split_mode() -> SplitMode {
    SplitMode::Equal
}

impl ExpenseDraft {
    pub fn new(
        description: impl Into<String>,
        amount: Money,
        paid_by: PersonId,
        date: NaiveDate,
        participants: Vec<PersonId>,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            paid_by,
            date,
            participants,
            split_mode: SplitMode::Equal,
        }
    }

    pub fn with_split_mode(mut self, mode: SplitMode) -> Self {
        self.split_mode = mode;
        self
    }

    /// Turn the draft into a complete expense record with a fresh id.
    ///
    /// Nothing is persisted; the caller hands the record to its store.
    ///
    /// # Errors
    ///
    /// Rejects a blank description or payer, an empty participant list, a
    /// non-positive amount, and any custom split the calculator refuses.
    pub fn create(self) -> LedgerResult<Expense> {
        if self.description.trim().is_empty() {
            return Err(LedgerError::MissingDescription);
        }
        if self.paid_by.is_blank() {
            return Err(LedgerError::MissingPayer);
        }
        if self.participants.is_empty() {
            return Err(LedgerError::EmptyParticipants);
        }
        let amount = self.amount.ensure_positive()?;

        let sharers = ParticipantSet::new(&self.paid_by, &self.participants);
        let splits = SplitCalculator::split_among(amount, &sharers, &self.split_mode)?;
        let id = ExpenseId::generate();
        debug!(
            "created expense {} '{}' for {} split {} ways",
            id,
            self.description,
            amount,
            sharers.len()
        );

        Expense::from_parts(
            id,
            self.description,
            amount,
            self.paid_by,
            self.date,
            sharers.iter().cloned().collect(),
            splits,
        )
    }
}

/// Convenience form of [`ExpenseDraft::create`].
pub fn create_expense(draft: ExpenseDraft) -> LedgerResult<Expense> {
    draft.create()
}

/// Amount entered as text, as a form would supply it.
pub fn parse_amount(input: &str) -> LedgerResult<Money> {
    Money::parse(input)?.ensure_positive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(id: &str) -> PersonId {
        PersonId::new(id)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 6, 5).unwrap()
    }

    fn groceries() -> ExpenseDraft {
        ExpenseDraft::new(
            "Groceries",
            Money::from_cents(7550),
            p("3"),
            date(),
            vec![p("1"), p("4")],
        )
    }

    #[test]
    fn test_create_fills_in_splits_and_payer() {
        let expense = groceries().create().unwrap();
        assert_eq!(expense.description(), "Groceries");
        assert_eq!(expense.paid_by(), &p("3"));
        assert_eq!(expense.participants().len(), 3);
        assert!(expense.participants().contains(&p("3")));
        assert_eq!(expense.split_total(), Money::from_cents(7550));
        assert!(!expense.id().as_str().is_empty());
        assert!(expense.validate().is_ok());
    }

    #[test]
    fn test_create_assigns_distinct_ids() {
        let a = groceries().create().unwrap();
        let b = groceries().create().unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_create_rejects_empty_participants() {
        let mut draft = groceries();
        draft.participants.clear();
        assert_eq!(draft.create(), Err(LedgerError::EmptyParticipants));
    }

    #[test]
    fn test_create_rejects_missing_description() {
        let mut draft = groceries();
        draft.description = "  ".to_string();
        assert_eq!(draft.create(), Err(LedgerError::MissingDescription));
    }

    #[test]
    fn test_create_rejects_missing_payer() {
        let mut draft = groceries();
        draft.paid_by = p("");
        assert_eq!(draft.create(), Err(LedgerError::MissingPayer));
    }

    #[test]
    fn test_create_rejects_bad_amount() {
        let mut draft = groceries();
        draft.amount = Money::ZERO;
        assert!(matches!(draft.create(), Err(LedgerError::InvalidAmount(_))));
    }

    #[test]
    fn test_create_with_custom_split() {
        let raw = [(p("1"), Money::from_cents(1000)), (p("3"), Money::from_cents(1000))]
            .into_iter()
            .collect();
        let expense = ExpenseDraft::new(
            "Concert",
            Money::from_cents(10000),
            p("3"),
            date(),
            vec![p("1")],
        )
        .with_split_mode(SplitMode::Custom(raw))
        .create()
        .unwrap();
        assert_eq!(expense.share_of(&p("1")), Money::from_cents(5000));
        assert_eq!(expense.share_of(&p("3")), Money::from_cents(5000));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("48").unwrap(), Money::from_cents(4800));
        assert!(parse_amount("-3").is_err());
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn test_draft_json_defaults_to_equal() {
        let json = r#"{
            "description": "Movie Tickets",
            "amount": 48,
            "paidBy": "2",
            "date": "2023-06-10",
            "participants": ["1", "4"]
        }"#;
        let draft: ExpenseDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.split_mode, SplitMode::Equal);
        let expense = create_expense(draft).unwrap();
        assert_eq!(expense.share_of(&p("4")), Money::from_cents(1600));
    }
}
