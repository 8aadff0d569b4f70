//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_app_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum AppError {
            $($variant(String),)*
        }

        impl AppError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(AppError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(AppError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(AppError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl AppError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        AppError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_app_errors! {
    DatabaseConfig("E001", "Database Configuration Error"),
    DatabaseConnection("E002", "Database Connection Error"),
    DatabaseOperation("E003", "Database Operation Error"),
    QueryTimeout("E004", "Query Timeout"),
    InvalidArgument("E005", "Invalid Argument"),
    Seeding("E006", "Seeding Error"),
    Serialization("E007", "Serialization Error"),
    Configuration("E008", "Configuration Error"),
}

impl AppError {
    /// 终端输出的错误标签，存储不可达与普通失败分开显示
    #[cfg(debug_assertions)]
    fn label(&self) -> &'static str {
        match self {
            AppError::DatabaseConnection(_) => "STORE UNREACHABLE",
            AppError::QueryTimeout(_) => "TIMEOUT",
            AppError::InvalidArgument(_) => "BAD FILTER",
            _ => "ERROR",
        }
    }

    /// 针对本服务配置项的处理建议
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            AppError::DatabaseConfig(_) => Some(
                "set DATABASE_URL (sqlite://, postgres://, mysql:// or a .db path) or DB_HOST/DB_PORT/DB_NAME/DB_USER/DB_PASSWORD",
            ),
            AppError::DatabaseConnection(_) => {
                Some("check that the database in DATABASE_URL is running and reachable")
            }
            AppError::QueryTimeout(_) => {
                Some("raise ACADEMIC__DATABASE__QUERY_TIMEOUT or set it to 0 to disable")
            }
            AppError::Seeding(_) => {
                Some("check the [seed] section: students need groups, subjects need teachers")
            }
            _ => None,
        }
    }

    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        let mut out = format!(
            "\x1b[1;31m[{}]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.label(),
            self.code(),
            self.error_type(),
            self.message()
        );
        if let Some(hint) = self.hint() {
            out.push_str(&format!("\n  \x1b[36mhint:\x1b[0m {hint}"));
        }
        out
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// 是否属于连接类错误（存储不可达）
    pub fn is_connectivity(&self) -> bool {
        matches!(self, AppError::DatabaseConnection(_))
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err {
            sea_orm::DbErr::Conn(_) | sea_orm::DbErr::ConnectionAcquire(_) => {
                AppError::DatabaseConnection(err.to_string())
            }
            _ => AppError::DatabaseOperation(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
