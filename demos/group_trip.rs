//! A weekend trip shared by four friends.
//!
//! Shows how expenses are split, how balances net out across the whole
//! trip, and which payments settle everyone up.

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use split_ledger::prelude::*;
use std::collections::BTreeMap;

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║    split-ledger: Group Trip Example      ║");
    println!("╚══════════════════════════════════════════╝\n");

    let roster: Roster = [
        Person::new("1", "Alex"),
        Person::new("2", "Taylor"),
        Person::new("3", "Jordan"),
        Person::new("4", "Casey"),
    ]
    .into_iter()
    .collect();

    let alex = PersonId::new("1");
    let taylor = PersonId::new("2");
    let jordan = PersonId::new("3");
    let casey = PersonId::new("4");
    let date = |d| NaiveDate::from_ymd_opt(2023, 6, d).unwrap();
    let money = |v| Money::from_decimal(v).unwrap();

    // --- Step 1: Record the expenses ---
    println!("━━━ Step 1: Expenses ━━━\n");

    let mut cabin_shares = BTreeMap::new();
    cabin_shares.insert(alex.clone(), money(dec!(2)));
    cabin_shares.insert(taylor.clone(), money(dec!(1)));
    cabin_shares.insert(jordan.clone(), money(dec!(1)));
    cabin_shares.insert(casey.clone(), money(dec!(1)));

    let drafts = vec![
        ExpenseDraft::new(
            "Dinner at Italian Restaurant",
            money(dec!(120.00)),
            alex.clone(),
            date(15),
            vec![taylor.clone(), jordan.clone()],
        ),
        ExpenseDraft::new(
            "Movie tickets",
            money(dec!(48.00)),
            taylor.clone(),
            date(10),
            vec![alex.clone(), casey.clone()],
        ),
        ExpenseDraft::new(
            "Groceries",
            money(dec!(75.50)),
            jordan.clone(),
            date(5),
            vec![alex.clone(), casey.clone()],
        ),
        // Alex had the big room: weights 2:1:1:1, rescaled to the amount
        ExpenseDraft::new(
            "Cabin",
            money(dec!(410.00)),
            casey.clone(),
            date(16),
            vec![alex.clone(), taylor.clone(), jordan.clone()],
        )
        .with_split_mode(SplitMode::Custom(cabin_shares)),
    ];

    let mut expenses = Vec::new();
    for draft in drafts {
        let expense = create_expense(draft).unwrap();
        println!(
            "  {:<30} {:>8}  paid by {}",
            expense.description(),
            expense.amount().to_string(),
            roster.display_name(expense.paid_by())
        );
        for (person, share) in expense.splits() {
            println!("      {:<10} {:>8}", roster.display_name(person), share.to_string());
        }
        expenses.push(expense);
    }
    println!();

    // --- Step 2: Net balances ---
    println!("━━━ Step 2: Balances ━━━\n");

    let report = BalanceCalculator::report(&expenses, &roster);
    println!("{}", report);
    println!("{}", BalanceSummary::from_balances(report.balances(), &roster));

    // --- Step 3: Settle up ---
    println!("━━━ Step 3: Settlements ━━━\n");

    let plan = SettlementPlanner::default().plan(report.balances());
    for s in plan.settlements() {
        println!(
            "  {:<8} pays {:<8} {:>8}",
            roster.display_name(&s.from),
            roster.display_name(&s.to),
            s.amount.to_string()
        );
    }
    println!(
        "\n  {} payments instead of {} individual debts",
        plan.len(),
        expenses.iter().map(|e| e.splits().len() - 1).sum::<usize>()
    );

    // --- Step 4: Record the payments ---
    println!("\n━━━ Step 4: After Recording Payments ━━━\n");

    expenses.extend(plan.record(date(30)).unwrap());
    let after = BalanceCalculator::compute_balances(&expenses, &roster);
    println!("{}", BalanceSummary::from_balances(&after, &roster));
}
