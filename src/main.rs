//! split-ledger CLI
//!
//! Compute balances and settlements for a group's shared expenses.
//!
//! # Usage
//!
//! ```bash
//! # Show who owes what
//! split-ledger balances --input ledger.json
//!
//! # Suggest the payments that settle everyone up
//! split-ledger settle --input ledger.json --format json
//!
//! # Work out the shares of a new expense
//! split-ledger split --amount 75.50 --payer 3 --with 1,4
//!
//! # Generate a random ledger for testing
//! split-ledger generate --people 8 --expenses 40
//! ```
//!
//! Set `RUST_LOG=debug` for a trace of each computation.

use chrono::NaiveDate;
use split_ledger::allocation::draft::{parse_amount, ExpenseDraft};
use split_ledger::allocation::split::SplitMode;
use split_ledger::core::expense::Expense;
use split_ledger::core::money::Money;
use split_ledger::core::person::{Person, PersonId, Roster};
use split_ledger::optimization::balance::BalanceCalculator;
use split_ledger::optimization::settlement::{PlannerConfig, SettlementPlanner};
use split_ledger::optimization::summary::BalanceSummary;
use split_ledger::simulation::history::{generate_random_history, HistoryConfig};
use std::collections::BTreeMap;
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"split-ledger — shared expense balances and settlement planning

USAGE:
    split-ledger <COMMAND> [OPTIONS]

COMMANDS:
    balances    Show each person's net balance
    settle      Suggest payments that bring every balance to zero
    split       Compute the shares of a new expense
    generate    Generate a random ledger (for testing)
    help        Show this message

OPTIONS (balances, settle):
    --input <FILE>      Path to JSON ledger file
    --format <FORMAT>   Output format: text (default) or json
    --epsilon <AMOUNT>  (settle) Balances at or below this count as settled (default: 0.01)

OPTIONS (split):
    --amount <AMOUNT>       Total amount paid
    --payer <ID>            Who paid
    --with <LIST>           Comma-separated ids of the people sharing it
    --custom <LIST>         Custom shares as ID=AMOUNT pairs, e.g. 1=10,2=20
    --description <TEXT>    Description (default: Expense)
    --date <YYYY-MM-DD>     Date of the expense (default: today)

OPTIONS (generate):
    --people <N>        Number of people (default: 6)
    --expenses <N>      Number of expenses (default: 30)
    --output <FILE>     Write to file instead of stdout

EXAMPLES:
    split-ledger balances --input ledger.json
    split-ledger settle --input ledger.json --format json
    split-ledger split --amount 100 --payer 1 --with 2 --custom 1=10,2=10
    split-ledger generate --people 10 --expenses 60 --output test.json"#
    );
}

/// JSON schema for a ledger file.
#[derive(serde::Deserialize, serde::Serialize)]
struct LedgerFile {
    friends: Vec<Person>,
    #[serde(default)]
    expenses: Vec<Expense>,
}

/// JSON output schema for balances.
#[derive(serde::Serialize)]
struct BalancesOutput {
    expense_count: usize,
    expense_total: String,
    gross_debt: String,
    net_debt: String,
    valid: bool,
    balances: Vec<BalanceOutput>,
}

#[derive(serde::Serialize)]
struct BalanceOutput {
    person: String,
    name: String,
    balance: String,
    status: String,
}

#[derive(serde::Serialize)]
struct SettleOutput {
    settlements: Vec<SettlementOutput>,
    total: String,
    complete: bool,
    residual: BTreeMap<String, String>,
}

#[derive(serde::Serialize)]
struct SettlementOutput {
    from: String,
    from_name: String,
    to: String,
    to_name: String,
    amount: String,
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| fail(format!("serializing output: {}", e)))
}

fn load_ledger(path: &str) -> (Roster, Vec<Expense>) {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });

    let file: LedgerFile = serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "friends": [ {{ "id": "1", "name": "Alex" }}, {{ "id": "2", "name": "Taylor" }} ],
  "expenses": [
    {{ "id": "1", "description": "Dinner", "amount": 120, "paidBy": "1", "date": "2023-06-15",
      "participants": ["1", "2"], "splits": {{ "1": 60, "2": 60 }} }}
  ]
}}"#
        );
        process::exit(1);
    });

    for expense in &file.expenses {
        if let Err(e) = expense.validate() {
            fail(e);
        }
    }

    (file.friends.into_iter().collect(), file.expenses)
}

/// Parse `--input` and `--format` plus any extra flags `extra` accepts.
fn parse_input_args(
    args: &[String],
    mut extra: impl FnMut(&str, Option<&String>) -> bool,
) -> (String, String) {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--input requires a file path");
                    process::exit(1);
                }));
            }
            "--format" => {
                i += 1;
                format = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--format requires 'text' or 'json'");
                    process::exit(1);
                });
            }
            other => {
                if !extra(other, args.get(i + 1)) {
                    eprintln!("Unknown option: {}", other);
                    process::exit(1);
                }
                i += 1;
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });
    (path, format)
}

fn cmd_balances(args: &[String]) {
    let (path, format) = parse_input_args(args, |_, _| false);
    let (roster, expenses) = load_ledger(&path);
    let report = BalanceCalculator::report(&expenses, &roster);

    if format == "json" {
        let balances = report
            .balances()
            .iter()
            .map(|(id, amount)| BalanceOutput {
                person: id.to_string(),
                name: roster.display_name(id).to_string(),
                balance: amount.to_string(),
                status: if amount > Money::CENT {
                    "OWED".to_string()
                } else if amount < -Money::CENT {
                    "OWES".to_string()
                } else {
                    "SETTLED".to_string()
                },
            })
            .collect();

        let output = BalancesOutput {
            expense_count: report.expense_count(),
            expense_total: report.expense_total().to_string(),
            gross_debt: report.gross_debt().to_string(),
            net_debt: report.net_debt().to_string(),
            valid: report.is_valid(),
            balances,
        };
        println!("{}", to_json(&output));
    } else {
        println!("{}", report);
        println!("{}", BalanceSummary::from_balances(report.balances(), &roster));
    }
}

fn cmd_settle(args: &[String]) {
    let mut epsilon = PlannerConfig::default().epsilon;
    let (path, format) = parse_input_args(args, |flag, value| {
        if flag != "--epsilon" {
            return false;
        }
        let value = value.unwrap_or_else(|| fail("--epsilon requires an amount"));
        epsilon = Money::parse(value).unwrap_or_else(|e| fail(e));
        if epsilon.is_negative() {
            fail("--epsilon must not be negative");
        }
        true
    });

    let (roster, expenses) = load_ledger(&path);
    let balances = BalanceCalculator::compute_balances(&expenses, &roster);
    let planner = SettlementPlanner::new(PlannerConfig { epsilon });
    let plan = planner.plan_checked(&balances).unwrap_or_else(|e| fail(e));

    if format == "json" {
        let output = SettleOutput {
            settlements: plan
                .settlements()
                .iter()
                .map(|s| SettlementOutput {
                    from: s.from.to_string(),
                    from_name: roster.display_name(&s.from).to_string(),
                    to: s.to.to_string(),
                    to_name: roster.display_name(&s.to).to_string(),
                    amount: s.amount.to_string(),
                })
                .collect(),
            total: plan.total_transferred().to_string(),
            complete: plan.is_complete(),
            residual: plan
                .residual()
                .iter()
                .map(|(id, amount)| (id.to_string(), amount.to_string()))
                .collect(),
        };
        println!("{}", to_json(&output));
    } else if plan.is_empty() {
        println!("No settlements needed. Everyone is square!");
    } else {
        println!("=== Settlements ===");
        for s in plan.settlements() {
            println!(
                "  {:<20} pays {:<20} {:>12}",
                roster.display_name(&s.from),
                roster.display_name(&s.to),
                s.amount.to_string()
            );
        }
        println!("\n{} payments, {} in total", plan.len(), plan.total_transferred());
    }
}

fn parse_ids(list: &str) -> Vec<PersonId> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PersonId::new)
        .collect()
}

fn parse_custom(list: &str) -> BTreeMap<PersonId, Money> {
    let mut shares = BTreeMap::new();
    for pair in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (id, amount) = pair
            .split_once('=')
            .unwrap_or_else(|| fail(format!("custom share '{}' must look like ID=AMOUNT", pair)));
        let amount = Money::parse(amount).unwrap_or_else(|e| fail(e));
        shares.insert(PersonId::new(id.trim()), amount);
    }
    shares
}

fn cmd_split(args: &[String]) {
    let mut amount = None;
    let mut payer = None;
    let mut participants = Vec::new();
    let mut mode = SplitMode::Equal;
    let mut description = "Expense".to_string();
    let mut date = chrono::Local::now().date_naive();
    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        i += 1;
        let value = args
            .get(i)
            .cloned()
            .unwrap_or_else(|| fail(format!("{} requires a value", flag)));
        match flag {
            "--amount" => amount = Some(parse_amount(&value).unwrap_or_else(|e| fail(e))),
            "--payer" => payer = Some(PersonId::new(value)),
            "--with" => participants = parse_ids(&value),
            "--custom" => mode = SplitMode::Custom(parse_custom(&value)),
            "--description" => description = value,
            "--date" => {
                date = NaiveDate::parse_from_str(&value, "%Y-%m-%d")
                    .unwrap_or_else(|e| fail(format!("invalid date '{}': {}", value, e)))
            }
            _ => {
                eprintln!("Unknown option: {}", flag);
                process::exit(1);
            }
        }
        i += 1;
    }

    let amount = amount.unwrap_or_else(|| fail("--amount <AMOUNT> is required"));
    let payer = payer.unwrap_or_else(|| fail("--payer <ID> is required"));

    let expense = ExpenseDraft::new(description, amount, payer, date, participants)
        .with_split_mode(mode)
        .create()
        .unwrap_or_else(|e| fail(e));
    println!("{}", to_json(&expense));
}

fn cmd_generate(args: &[String]) {
    let mut config = HistoryConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--people" => {
                i += 1;
                config.people = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("--people requires a number");
                        process::exit(1);
                    });
            }
            "--expenses" => {
                i += 1;
                config.expenses = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("--expenses requires a number");
                        process::exit(1);
                    });
            }
            "--output" => {
                i += 1;
                output_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--output requires a file path");
                    process::exit(1);
                }));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let (roster, expenses) = generate_random_history(&config).unwrap_or_else(|e| fail(e));
    let file = LedgerFile {
        friends: roster.people().cloned().collect(),
        expenses,
    };
    let json = to_json(&file);

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!(
            "Generated {} expenses across {} people → {}",
            file.expenses.len(),
            file.friends.len(),
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "balances" => cmd_balances(rest),
        "settle" => cmd_settle(rest),
        "split" => cmd_split(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
