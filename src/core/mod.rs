pub mod error;
pub mod expense;
pub mod ledger;
pub mod money;
pub mod person;
