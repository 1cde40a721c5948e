//! 路径与文件工具

use crate::error::{ConfigError, Result};
use std::path::{Path, PathBuf};

/// 环境文件名
pub const ENV_FILE_NAME: &str = ".env";

/// 示例文件名
pub const EXAMPLE_FILE_NAME: &str = ".env.example";

/// 默认环境文件路径：当前目录下的 .env
pub fn default_env_file() -> Result<PathBuf> {
    let current_dir = std::env::current_dir()
        .map_err(|e| ConfigError::InvalidArgument(format!("无法获取当前目录: {}", e)))?;
    Ok(current_dir.join(ENV_FILE_NAME))
}

/// 检查文件是否存在
pub fn file_exists(path: &Path) -> bool {
    path.exists() && path.is_file()
}

/// 读取文件内容，返回错误时提供详细信息
pub fn read_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }
    std::fs::read_to_string(path).map_err(|e| {
        ConfigError::Io(std::io::Error::other(format!(
            "读取文件 {} 失败: {}",
            path.display(),
            e
        )))
    })
}

/// 安全写入文件 (使用临时文件 + 原子替换)
pub fn write_file_safe(path: &Path, content: &str) -> Result<()> {
    // 确保父目录存在
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // 写入临时文件
    let temp_path = path.with_extension("tmp");
    std::fs::write(&temp_path, content)?;

    // 原子替换
    std::fs::rename(&temp_path, path)?;

    Ok(())
}
