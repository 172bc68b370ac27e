pub mod exchange;
pub mod instrument;
