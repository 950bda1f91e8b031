pub mod balance;
pub mod participant;
pub mod transaction;
