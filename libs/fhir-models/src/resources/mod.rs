pub mod bundle;
pub mod capability_statement;
pub mod patient;
