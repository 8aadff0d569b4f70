pub mod lifetime;
pub mod report;
