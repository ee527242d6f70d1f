pub mod gain_service;
pub mod input;
pub mod ledger_service;
