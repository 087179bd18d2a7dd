pub mod alert;
pub mod status;
pub mod table;
