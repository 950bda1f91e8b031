pub mod ledger;
pub mod split;
pub mod statement;
