//! 类型化的应用配置
//!
//! 把展开后的环境映射为各配置段。文件格式本身不做任何约束，
//! 所有校验都发生在这一层（消费端）。

pub mod aws;
pub mod database;
pub mod keys;

pub use aws::AwsSettings;
pub use database::{DatabaseSettings, SslMode};

use crate::core::EnvStore;
use crate::error::{ConfigError, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// 随发行版携带的示例环境文件，init 命令写出同一份内容
pub const EXAMPLE_ENV: &str = include_str!("../../.env.example");

/// GitHub 配置段
#[derive(Debug, Clone, Default, Serialize)]
pub struct GithubSettings {
    #[serde(skip)]
    pub token: Option<String>,
}

impl GithubSettings {
    pub fn load(resolved: &HashMap<String, String>) -> Self {
        Self {
            token: lookup(resolved, keys::GITHUB_TOKEN),
        }
    }
}

/// 并行运行时配置段
#[derive(Debug, Clone, Default, Serialize)]
pub struct RuntimeSettings {
    /// rayon 工作线程数上限，None 表示自动
    pub rayon_threads: Option<usize>,
}

impl RuntimeSettings {
    pub fn load(resolved: &HashMap<String, String>) -> Result<Self> {
        let rayon_threads = match lookup(resolved, keys::RAYON_NUM_THREADS) {
            Some(raw) => {
                let threads = raw.parse::<usize>().map_err(|_| {
                    ConfigError::InvalidValue(format!(
                        "{} 应为正整数，当前为 '{}'",
                        keys::RAYON_NUM_THREADS,
                        raw
                    ))
                })?;
                if threads == 0 {
                    return Err(ConfigError::InvalidValue(format!(
                        "{} 应为正整数，当前为 '0'",
                        keys::RAYON_NUM_THREADS
                    )));
                }
                Some(threads)
            }
            None => None,
        };

        Ok(Self { rayon_threads })
    }
}

/// 日志配置段
#[derive(Debug, Clone, Default, Serialize)]
pub struct LogSettings {
    /// RUST_LOG 过滤串，原样传给日志实现
    pub filter: Option<String>,
}

impl LogSettings {
    pub fn load(resolved: &HashMap<String, String>) -> Self {
        Self {
            filter: lookup(resolved, keys::RUST_LOG),
        }
    }
}

/// 导出配置段
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportSettings {
    pub path: Option<PathBuf>,
}

impl ExportSettings {
    pub fn load(resolved: &HashMap<String, String>) -> Self {
        Self {
            path: lookup(resolved, keys::ROAST_EXPORT_PATH).map(PathBuf::from),
        }
    }
}

/// 全部配置段
#[derive(Debug, Clone, Serialize)]
pub struct RoastSettings {
    pub github: GithubSettings,
    pub runtime: RuntimeSettings,
    pub log: LogSettings,
    pub aws: AwsSettings,
    pub database: DatabaseSettings,
    pub export: ExportSettings,
}

impl RoastSettings {
    /// 从存储引擎加载（合并 + 展开 + 类型化）
    pub fn load(store: &EnvStore) -> Result<Self> {
        Self::from_resolved(&store.resolved()?)
    }

    /// 从已展开的环境映射加载
    pub fn from_resolved(resolved: &HashMap<String, String>) -> Result<Self> {
        Ok(Self {
            github: GithubSettings::load(resolved),
            runtime: RuntimeSettings::load(resolved)?,
            log: LogSettings::load(resolved),
            aws: AwsSettings::load(resolved),
            database: DatabaseSettings::load(resolved)?,
            export: ExportSettings::load(resolved),
        })
    }
}

/// 取值，空串视为未设置
pub(crate) fn lookup(resolved: &HashMap<String, String>, key: &str) -> Option<String> {
    resolved.get(key).filter(|v| !v.is_empty()).cloned()
}

/// 掩码敏感值：长值保留前 4 个字符便于辨认，其余隐藏
pub fn mask_secret(value: &str) -> String {
    if value.chars().count() > 8 {
        let prefix: String = value.chars().take(4).collect();
        format!("{}****", prefix)
    } else {
        "****".to_string()
    }
}
