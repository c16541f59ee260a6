use crate::allocation::apportion::{equal_shares, proportional_shares};
use crate::core::error::{LedgerError, LedgerResult};
use crate::core::expense::ParticipantSet;
use crate::core::money::Money;
use crate::core::person::PersonId;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How an expense is divided among its participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "amounts", rename_all = "lowercase")]
pub enum SplitMode {
    /// Everyone pays the same share, to the cent.
    Equal,
    /// The caller names each person's share. Anyone left out owes nothing
    /// and still gets an explicit zero entry in the computed splits, so the
    /// result always has one entry per sharer.
    Custom(BTreeMap<PersonId, Money>),
}

/// Computes the per-person shares of a single expense.
///
/// Shares are always whole cents and always add up to the expense amount
/// exactly. Where a division does not come out even, the leftover cents
/// go to the earliest people in id order (equal mode) or to the largest
/// fractional remainders (rescaled custom mode).
pub struct SplitCalculator;

impl SplitCalculator {
    /// Split `amount` paid by `payer` among `participants`.
    ///
    /// The payer always takes a share, listed or not.
    ///
    /// # Custom mode
    ///
    /// - Entries summing to zero fall back to an equal split.
    /// - Entries summing to anything other than `amount` are rescaled in
    ///   proportion so they do.
    /// - Entries summing to exactly `amount` are used unchanged.
    /// - Sharers without an entry get a zero share.
    ///
    /// # Errors
    ///
    /// `InvalidAmount` if `amount` is not positive, exceeds [`Money::MAX`],
    /// or a custom entry is negative or exceeds [`Money::MAX`], or the
    /// entries overflow when added up, `MissingPayer` if the payer id is blank, and
    /// `UnknownParticipant` if a custom entry names someone who is not
    /// sharing the expense.
    ///
    /// # Examples
    ///
    /// ```
    /// use split_ledger::allocation::split::{SplitCalculator, SplitMode};
    /// use split_ledger::core::money::Money;
    /// use split_ledger::core::person::PersonId;
    ///
    /// let splits = SplitCalculator::compute_splits(
    ///     Money::parse("75.50").unwrap(),
    ///     &PersonId::new("3"),
    ///     &[PersonId::new("1"), PersonId::new("4")],
    ///     &SplitMode::Equal,
    /// )
    /// .unwrap();
    ///
    /// let shares: Vec<String> = splits.values().map(|m| m.to_string()).collect();
    /// assert_eq!(shares, vec!["25.17", "25.17", "25.16"]);
    /// ```
    pub fn compute_splits(
        amount: Money,
        payer: &PersonId,
        participants: &[PersonId],
        mode: &SplitMode,
    ) -> LedgerResult<BTreeMap<PersonId, Money>> {
        let amount = amount.ensure_positive()?;
        if payer.is_blank() {
            return Err(LedgerError::MissingPayer);
        }
        let sharers = ParticipantSet::new(payer, participants);
        Self::split_among(amount, &sharers, mode)
    }

    /// Split `amount` among an already-formed participant set.
    pub fn split_among(
        amount: Money,
        sharers: &ParticipantSet,
        mode: &SplitMode,
    ) -> LedgerResult<BTreeMap<PersonId, Money>> {
        let amount = amount.ensure_positive()?;
        if sharers.is_empty() {
            return Err(LedgerError::EmptyParticipants);
        }

        match mode {
            SplitMode::Equal => Ok(Self::equal(amount, sharers)),
            SplitMode::Custom(raw) => Self::custom(amount, sharers, raw),
        }
    }

    fn equal(amount: Money, sharers: &ParticipantSet) -> BTreeMap<PersonId, Money> {
        let shares = equal_shares(amount, sharers.len());
        sharers.iter().cloned().zip(shares).collect()
    }

    fn custom(
        amount: Money,
        sharers: &ParticipantSet,
        raw: &BTreeMap<PersonId, Money>,
    ) -> LedgerResult<BTreeMap<PersonId, Money>> {
        for (person, value) in raw {
            if !sharers.contains(person) {
                return Err(LedgerError::UnknownParticipant(person.clone()));
            }
            if value.is_negative() || *value > Money::MAX {
                return Err(LedgerError::InvalidAmount(value.to_string()));
            }
        }

        let entered: Vec<Money> = sharers
            .iter()
            .map(|id| raw.get(id).copied().unwrap_or(Money::ZERO))
            .collect();
        let entered_total = entered
            .iter()
            .try_fold(Money::ZERO, |total, value| total.checked_add(*value))
            .ok_or_else(|| LedgerError::InvalidAmount("custom split total".to_string()))?;

        if entered_total.is_zero() {
            debug!("custom split for {} is empty, splitting equally", amount);
            return Ok(Self::equal(amount, sharers));
        }

        let shares = if entered_total == amount {
            entered
        } else {
            debug!(
                "custom split sums to {} instead of {}, rescaling",
                entered_total, amount
            );
            proportional_shares(amount, &entered)
        };
        Ok(sharers.iter().cloned().zip(shares).collect())
    }
}
