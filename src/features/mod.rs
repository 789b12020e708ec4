pub mod checkout;
pub mod tools;
