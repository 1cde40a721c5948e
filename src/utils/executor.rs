//! 命令执行器
//!
//! run 命令的子进程启动。子进程继承父进程的 stdin/stdout/stderr，
//! 注入的变量覆盖继承的同名环境变量。

use crate::error::{ConfigError, Result};
use std::collections::HashMap;
use std::process::{Command, Stdio};

/// 命令执行器
pub struct CommandExecutor;

impl CommandExecutor {
    /// 执行命令并注入环境变量
    ///
    /// # 参数
    /// - `command`: 命令和参数，如 `["psql", "-c", "select 1"]`
    /// - `env_vars`: 要注入的环境变量
    ///
    /// # 返回
    /// 子进程的退出码
    pub fn exec_with_env(command: &[String], env_vars: &HashMap<String, String>) -> Result<i32> {
        let Some((program, args)) = command.split_first() else {
            return Err(ConfigError::CommandExecutionFailed("命令不能为空".to_string()));
        };

        let mut cmd = Command::new(program);
        cmd.args(args);

        // 注入变量（覆盖继承的同名变量）
        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        // 继承标准流
        cmd.stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let status = cmd.status().map_err(|e| {
            ConfigError::CommandNotFound(format!(
                "{}: {} (请确保命令在 PATH 中或使用完整路径)",
                program, e
            ))
        })?;

        Ok(status.code().unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_command_error() {
        let result = CommandExecutor::exec_with_env(&[], &HashMap::new());
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_passes_exit_code() {
        let command = vec!["sh".to_string(), "-c".to_string(), "exit 7".to_string()];
        let code = CommandExecutor::exec_with_env(&command, &HashMap::new()).unwrap();
        assert_eq!(code, 7);
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_injects_env() {
        let mut env = HashMap::new();
        env.insert("ROAST_TEST_INJECTED".to_string(), "yes".to_string());

        let command = vec![
            "sh".to_string(),
            "-c".to_string(),
            "test \"$ROAST_TEST_INJECTED\" = yes".to_string(),
        ];
        let code = CommandExecutor::exec_with_env(&command, &env).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn test_command_not_found() {
        let command = vec!["roast-definitely-not-a-command".to_string()];
        let result = CommandExecutor::exec_with_env(&command, &HashMap::new());
        assert!(matches!(result, Err(ConfigError::CommandNotFound(_))));
    }
}
