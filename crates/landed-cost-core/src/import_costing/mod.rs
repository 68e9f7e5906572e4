pub mod advisories;
mod checked;
pub mod insurance;
pub mod landed_cost;
pub mod tax;
