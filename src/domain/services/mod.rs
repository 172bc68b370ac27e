pub mod symbol_reconciliation;
pub mod table;
