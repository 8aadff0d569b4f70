pub mod reports;

pub mod system;

pub use reports::configure_report_routes;
pub use system::configure_system_routes;
