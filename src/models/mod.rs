pub mod common;
pub mod reports;
pub mod seed;

pub use common::ApiResponse;

/// 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,
    InvalidArgument = 1001,
    InternalServerError = 5000,
    DatabaseUnavailable = 5001,
    QueryTimeout = 5002,
}
