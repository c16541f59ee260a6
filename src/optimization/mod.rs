pub mod balance;
pub mod settlement;
pub mod summary;
