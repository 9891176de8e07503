pub mod aircraft;
pub mod fee;
pub mod order;
pub mod receipt;
pub mod tier;
