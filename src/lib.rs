//! Academic Records - 教务成绩记录与统计服务
//!
//! 基于 SeaORM 的成绩数据库，提供七个只读聚合报表，
//! 通过 Actix Web JSON 接口和命令行对外提供。
//!
//! # 架构
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `models`: 报表与填充结果数据模型
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理与命令行报表
//! - `seed`: 数据填充计划生成
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod config;
pub mod entity;
pub mod errors;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod seed;
pub mod services;
pub mod storage;
pub mod utils;
