//! SkillLink - 以班期为单位的学习管理平台后端
//!
//! 学员按班期学习，讲师布置和批改作业、记录考勤、在论坛答疑，
//! 学习行为会累积积分和徽章。
//!
//! # 架构
//! - `cache`: 缓存层（Moka/Redis）
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 认证、角色、班期权限与限流中间件
//! - `models`: 接口数据模型
//! - `routes`: API 路由层
//! - `runtime`: 启动与关闭流程
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
