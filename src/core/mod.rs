pub mod energy_balance;
pub mod indices;
pub mod properties;
pub mod solar;
pub mod units;
pub mod wbgt;
pub mod wind;
