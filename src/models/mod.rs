pub mod chart;
pub mod quote;
pub mod stock;
pub mod ticker;
