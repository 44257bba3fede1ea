pub mod amount;
pub mod category;
pub mod period;
pub mod transaction;
