//! roast-env - roast 应用的环境配置层
//!
//! 解析 dotenv 风格的环境文件，做 `${VAR}` 展开，
//! 并把合并后的环境映射为类型化的应用配置。

// 基础类型与错误
pub mod error;
pub mod types;

// 文件格式与展开
pub mod dotenv;
pub mod expand;

// 存储引擎
pub mod core;

// 类型化配置
pub mod settings;

// CLI 定义
pub mod cli;

// 工具
pub mod utils;

// 重新导出常用类型
pub use crate::core::EnvStore;
pub use crate::error::{ConfigError, Result};
pub use crate::settings::RoastSettings;
pub use crate::types::{AppConfig, EnvEntry, EnvSource, OutputFormat};
