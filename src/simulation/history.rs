//! Random expense histories for stress tests and benchmarks.
//!
//! Every generated expense goes through [`ExpenseDraft::create`], so the
//! records obey the same invariants as real ones.

use crate::allocation::draft::ExpenseDraft;
use crate::allocation::split::SplitMode;
use crate::core::error::LedgerResult;
use crate::core::expense::Expense;
use crate::core::money::Money;
use crate::core::person::{Person, PersonId, Roster};
use chrono::{Days, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;

/// Configuration for generating a random group and its expenses.
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    /// Number of people in the group.
    pub people: usize,
    /// Number of expenses to generate.
    pub expenses: usize,
    /// Smallest expense amount.
    pub min_amount: Money,
    /// Largest expense amount.
    pub max_amount: Money,
    /// Fraction of expenses split with custom amounts, 0.0 to 1.0.
    pub custom_ratio: f64,
    /// Date of the first expense; later ones follow day by day.
    pub start_date: NaiveDate,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            people: 6,
            expenses: 30,
            min_amount: Money::from_cents(100),
            max_amount: Money::from_cents(50_000),
            custom_ratio: 0.25,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
        }
    }
}

/// Generate a roster of `P-000`, `P-001`, ... and a random history.
///
/// Needs at least two people; with fewer an empty history is returned.
pub fn generate_random_history(config: &HistoryConfig) -> LedgerResult<(Roster, Vec<Expense>)> {
    let mut rng = rand::thread_rng();

    let people: Vec<PersonId> = (0..config.people)
        .map(|i| PersonId::new(format!("P-{:03}", i)))
        .collect();
    let roster: Roster = people
        .iter()
        .enumerate()
        .map(|(i, id)| Person::new(id.clone(), format!("Person {}", i)))
        .collect();

    if people.len() < 2 {
        return Ok((roster, Vec::new()));
    }

    let min = config.min_amount.cents().max(1);
    let max = config.max_amount.cents().max(min);
    let custom_ratio = if config.custom_ratio.is_finite() {
        config.custom_ratio.clamp(0.0, 1.0)
    } else {
        0.0
    };

    let mut expenses = Vec::with_capacity(config.expenses);
    for n in 0..config.expenses {
        let payer = people[rng.gen_range(0..people.len())].clone();
        let others: Vec<PersonId> = people.iter().filter(|p| **p != payer).cloned().collect();
        let count = rng.gen_range(1..=others.len());
        let participants: Vec<PersonId> = others.choose_multiple(&mut rng, count).cloned().collect();

        let amount = Money::from_cents(rng.gen_range(min..=max));
        let mode = if rng.gen_bool(custom_ratio) {
            let mut raw = BTreeMap::new();
            for person in participants.iter().chain(std::iter::once(&payer)) {
                raw.insert(person.clone(), Money::from_cents(rng.gen_range(0..=max)));
            }
            SplitMode::Custom(raw)
        } else {
            SplitMode::Equal
        };

        let date = config
            .start_date
            .checked_add_days(Days::new(n as u64))
            .unwrap_or(config.start_date);
        let expense = ExpenseDraft::new(format!("Expense #{}", n + 1), amount, payer, date, participants)
            .with_split_mode(mode)
            .create()?;
        expenses.push(expense);
    }

    Ok((roster, expenses))
}
