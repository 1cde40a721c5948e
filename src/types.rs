//! 核心数据结构定义

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// 环境变量来源层级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnvSource {
    /// 进程环境变量 (只读，优先级高)
    Process,
    /// 环境文件 ./.env (可写)
    File,
}

impl fmt::Display for EnvSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvSource::Process => write!(f, "process"),
            EnvSource::File => write!(f, "file"),
        }
    }
}

impl EnvSource {
    /// 从字符串转换
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "process" | "env" => Some(EnvSource::Process),
            "file" | "dotenv" => Some(EnvSource::File),
            _ => None,
        }
    }

    /// 是否可写
    pub fn is_writable(&self) -> bool {
        matches!(self, EnvSource::File)
    }
}

/// 环境变量条目
///
/// `value` 保存未展开的原始值；`literal` 为 true 时该值不参与 `${VAR}` 展开
/// (进程环境变量、单引号值)。`line` 仅对文件来源有意义。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvEntry {
    pub key: String,
    pub value: String,
    pub source: EnvSource,
    pub literal: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl EnvEntry {
    pub fn new(key: String, value: String, source: EnvSource) -> Self {
        Self {
            key,
            value,
            source,
            literal: source == EnvSource::Process,
            line: None,
        }
    }

    /// 文件条目，带行号
    pub fn in_file(key: String, value: String, literal: bool, line: usize) -> Self {
        Self {
            key,
            value,
            source: EnvSource::File,
            literal,
            line: Some(line),
        }
    }
}

/// 运行配置 (全局 CLI 选项)
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// 是否详细输出
    pub verbose: bool,
    /// 环境文件路径覆盖，None 时使用 ./.env
    pub env_file: Option<PathBuf>,
}

/// 输出格式类型
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Env,
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Env
    }
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" | "j" => OutputFormat::Json,
            _ => OutputFormat::Env,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_parse() {
        assert_eq!(EnvSource::parse("process"), Some(EnvSource::Process));
        assert_eq!(EnvSource::parse("FILE"), Some(EnvSource::File));
        assert_eq!(EnvSource::parse("local"), None);
    }

    #[test]
    fn test_source_writable() {
        assert!(EnvSource::File.is_writable());
        assert!(!EnvSource::Process.is_writable());
    }

    #[test]
    fn test_process_entry_is_literal() {
        let entry = EnvEntry::new("K".to_string(), "${X}".to_string(), EnvSource::Process);
        assert!(entry.literal);
        assert!(entry.line.is_none());
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!(OutputFormat::from("json"), OutputFormat::Json);
        assert_eq!(OutputFormat::from("env"), OutputFormat::Env);
        assert_eq!(OutputFormat::from("anything"), OutputFormat::Env);
    }
}
