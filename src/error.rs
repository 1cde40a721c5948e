//! 错误处理模块

use std::error::Error;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("文件IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("解析错误: {0}")]
    Parse(String),

    #[error("变量未找到: {0}")]
    NotFound(String),

    #[error("文件不存在: {0}")]
    FileNotFound(PathBuf),

    #[error("文件已存在: {0} (使用 --force 覆盖)")]
    AlreadyExists(PathBuf),

    #[error("未定义的变量引用: ${{{0}}}")]
    MissingVariable(String),

    #[error("检测到循环引用: {0}")]
    CircularReference(String),

    #[error("配置值无效: {0}")]
    InvalidValue(String),

    #[error("无效的环境层级: {0}")]
    InvalidSource(String),

    #[error("无效的参数: {0}")]
    InvalidArgument(String),

    #[error("JSON序列化错误: {0}")]
    Json(#[from] serde_json::Error),

    #[error("环境检查未通过: 发现 {0} 个错误")]
    CheckFailed(usize),

    // === run 命令相关错误 ===
    #[error("命令未找到: {0}")]
    CommandNotFound(String),

    #[error("命令执行失败: {0}")]
    CommandExecutionFailed(String),
}

impl ConfigError {
    /// 报告错误，支持详细/安静模式
    /// verbose = true: 详细错误链
    /// verbose = false: 关键信息，安静模式
    pub fn report(&self, verbose: bool) {
        if verbose {
            // 详细模式：打印完整错误链
            eprintln!("❌ 错误: {}", self);

            // (thiserror 支持自动的 source() 链)
            if let Some(source) = self.source() {
                eprintln!("  └─ 原因: {}", source);
                let mut current = source.source();
                while let Some(next) = current {
                    eprintln!("     └─ {}", next);
                    current = next.source();
                }
            }
        } else {
            // 安静模式：只打印关键信息
            match self {
                ConfigError::NotFound(key) => eprintln!("未找到变量: {}", key),
                ConfigError::Io(err) => eprintln!("文件错误: {}", err),
                ConfigError::FileNotFound(path) => eprintln!("文件不存在: {}", path.display()),
                ConfigError::MissingVariable(name) => {
                    eprintln!("未定义的变量引用: ${{{}}}", name)
                }
                ConfigError::InvalidSource(src) => eprintln!("无效层级: {}", src),
                _ => eprintln!("错误: {}", self),
            }
        }
    }
}

/// 简化 Result 类型别名
pub type Result<T> = std::result::Result<T, ConfigError>;
