pub mod api;
pub mod energy;
