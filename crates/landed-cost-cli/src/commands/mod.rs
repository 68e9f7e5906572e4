pub mod import_costing;
pub mod scenarios;
