pub mod bus;
pub mod records;
pub mod validate;
pub mod views;
