pub mod credit_loan;
pub mod dsr;
pub mod government;
