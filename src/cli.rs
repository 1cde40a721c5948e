//! CLI 参数定义

use crate::error::{ConfigError, Result};
use crate::types::{EnvSource, OutputFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// roast-env - roast 应用的环境配置工具
#[derive(Parser)]
#[command(
    name = "roast-env",
    version,
    about = "roast 应用的环境配置工具",
    long_about = "管理 roast 应用的 .env 环境文件：解析、${VAR} 展开、类型化校验与诊断"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 详细输出模式
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 环境文件路径 (默认 ./.env)
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 获取变量（合并与展开后的值）
    Get {
        /// 变量名称
        key: String,
    },

    /// 设置变量（写入环境文件）
    Set {
        /// 变量名称
        key: String,
        /// 变量值
        value: String,
    },

    /// 删除变量（从环境文件移除）
    Unset {
        /// 变量名称
        key: String,
    },

    /// 列出变量（原始值）
    List {
        /// 指定来源 (process/file)
        #[arg(short, long)]
        source: Option<String>,
        /// 输出格式 (env/json)
        #[arg(long, default_value = "env")]
        format: String,
    },

    /// 导出变量为 .env 格式（原始值）
    Export {
        /// 指定来源 (process/file)
        #[arg(short, long)]
        source: Option<String>,
        /// 输出格式 (env/json)
        #[arg(long, default_value = "env")]
        format: String,
    },

    /// 输出完全展开后的 roast 环境
    Render {
        /// 输出格式 (env/json)
        #[arg(long, default_value = "env")]
        format: String,
    },

    /// 显示类型化配置总览（敏感值掩码）
    Show,

    /// 检查环境配置问题
    Check,

    /// 生成 .env.example 模板
    Init {
        /// 覆盖已存在的文件
        #[arg(long)]
        force: bool,
    },

    /// 注入 roast 环境并运行命令
    Run {
        /// 临时环境变量 (KEY=VALUE)
        #[arg(long = "var")]
        var: Vec<String>,
        /// 要执行的命令
        #[arg(required = true, last = true)]
        command: Vec<String>,
    },
}

/// 解析来源参数
pub fn parse_source(source: Option<&str>) -> Result<Option<EnvSource>> {
    match source {
        None => Ok(None),
        Some(s) => EnvSource::parse(s)
            .map(Some)
            .ok_or_else(|| ConfigError::InvalidSource(s.to_string())),
    }
}

/// 解析格式参数
pub fn parse_format(format: &str) -> OutputFormat {
    OutputFormat::from(format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source_valid() {
        assert_eq!(parse_source(Some("file")).unwrap(), Some(EnvSource::File));
        assert_eq!(
            parse_source(Some("process")).unwrap(),
            Some(EnvSource::Process)
        );
        assert_eq!(parse_source(None).unwrap(), None);
    }

    #[test]
    fn test_parse_source_invalid() {
        assert!(parse_source(Some("cloud")).is_err());
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["roast-env", "get", "ROAST_DB_HOST"]).unwrap();
        assert!(matches!(cli.command, Commands::Get { .. }));

        let cli = Cli::try_parse_from(["roast-env", "--file", "/tmp/x.env", "check"]).unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("/tmp/x.env")));
    }

    #[test]
    fn test_cli_run_collects_trailing_command() {
        let cli = Cli::try_parse_from([
            "roast-env",
            "run",
            "--var",
            "A=1",
            "--",
            "echo",
            "hello",
        ])
        .unwrap();

        match cli.command {
            Commands::Run { var, command } => {
                assert_eq!(var, vec!["A=1".to_string()]);
                assert_eq!(command, vec!["echo".to_string(), "hello".to_string()]);
            }
            _ => panic!("应解析为 run 命令"),
        }
    }
}
