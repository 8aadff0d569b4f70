use serde::{Deserialize, Serialize};

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub seed: SeedConfig,
}

/// 应用设置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub system_name: String,
    pub environment: String,
    pub log_level: String,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub max_workers: usize,
    pub timeouts: TimeoutConfig,
}

/// 超时配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    pub client_request: u64,
    pub client_disconnect: u64,
    pub keep_alive: u64,
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,          // 数据库连接 URL（从 scheme 自动推断类型）
    pub pool_size: u32,       // 连接池大小
    pub timeout: u64,         // 连接超时 (秒)
    pub query_timeout: u64,   // 单次查询超时 (秒)，0 表示不限制
    pub run_migrations: bool, // 启动时是否执行迁移
}

/// CORS 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub max_age: usize,
}

/// 数据填充配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    pub groups: usize,
    pub teachers: usize,
    pub subjects: usize,
    pub students: usize,
    pub max_grades_per_student: usize,
    pub history_days: i64, // 成绩日期回溯天数
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            groups: 3,
            teachers: 5,
            subjects: 8,
            students: 50,
            max_grades_per_student: 20,
            history_days: 730,
        }
    }
}
