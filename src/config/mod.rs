//! 配置管理
//!
//! 配置来源（优先级从低到高）：`config.toml` → `config.{APP_ENV}.toml` →
//! `SKILLLINK_*` 环境变量 → 常用环境变量覆盖（`DATABASE_URL`、`JWT_SECRET` 等）。

mod r#impl;
mod structs;

pub use structs::*;
