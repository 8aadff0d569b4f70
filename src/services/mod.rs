pub mod reports;
pub mod system;

pub use reports::ReportService;
pub use system::SystemService;
