pub mod ledger;
pub mod outcome;
pub mod portfolio;
pub mod position;
pub mod search;
pub mod settings;
pub mod summary;
