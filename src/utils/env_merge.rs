//! 环境变量合并器
//!
//! run 命令的环境构建。优先级（从低到高）：
//! 1. 环境文件 ./.env
//! 2. 进程环境变量
//! 3. 临时变量 --var（最高）

use crate::core::EnvStore;
use crate::error::{ConfigError, Result};
use std::collections::HashMap;

/// 环境变量合并器
pub struct EnvMerger;

impl EnvMerger {
    /// 解析临时环境变量参数
    ///
    /// # 输入
    /// `["ROAST_DB_HOST=localhost", "ROAST_DB_PORT=5432"]`
    ///
    /// # 输出
    /// `[("ROAST_DB_HOST", "localhost"), ("ROAST_DB_PORT", "5432")]`
    pub fn parse_temp_vars(var_args: &[String]) -> Result<Vec<(String, String)>> {
        let mut vars = Vec::new();

        for arg in var_args {
            match arg.split_once('=') {
                Some((key, value)) if !key.trim().is_empty() => {
                    // trim 键，trim 值的左边空格但保留右边空格
                    vars.push((key.trim().to_string(), value.trim_start().to_string()));
                }
                _ => {
                    return Err(ConfigError::InvalidArgument(format!(
                        "无效的环境变量格式 '{}'，应为 KEY=VALUE",
                        arg
                    )));
                }
            }
        }

        Ok(vars)
    }

    /// 构建注入用的环境变量映射（完全展开后按优先级合并）
    pub fn merge_environment(
        store: &EnvStore,
        temp_vars: &[(String, String)],
    ) -> Result<HashMap<String, String>> {
        // 文件 + 进程环境，已展开
        let mut env = store.resolved()?;

        // 临时变量覆盖一切
        for (key, value) in temp_vars {
            env.insert(key.clone(), value.clone());
        }

        Ok(env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AppConfig;
    use tempfile::TempDir;

    fn store_with_file(content: &str) -> (TempDir, EnvStore) {
        let temp_dir = TempDir::new().unwrap();
        let env_file = temp_dir.path().join(".env");
        std::fs::write(&env_file, content).unwrap();

        let store = EnvStore::new(AppConfig {
            verbose: false,
            env_file: Some(env_file),
        });
        (temp_dir, store)
    }

    mod parse_temp_vars_tests {
        use super::*;

        #[test]
        fn test_single_var() {
            let args = vec!["KEY=VALUE".to_string()];
            let result = EnvMerger::parse_temp_vars(&args).unwrap();

            assert_eq!(result.len(), 1);
            assert_eq!(result[0], ("KEY".to_string(), "VALUE".to_string()));
        }

        #[test]
        fn test_multiple_vars() {
            let args = vec![
                "ROAST_DB_HOST=localhost".to_string(),
                "ROAST_DB_PORT=5432".to_string(),
            ];

            let result = EnvMerger::parse_temp_vars(&args).unwrap();

            assert_eq!(result.len(), 2);
            assert_eq!(result[0], ("ROAST_DB_HOST".to_string(), "localhost".to_string()));
        }

        #[test]
        fn test_spaces_around_key() {
            let args = vec!["KEY = VALUE".to_string(), "KEY2=  V2  ".to_string()];

            let result = EnvMerger::parse_temp_vars(&args).unwrap();

            assert_eq!(result[0], ("KEY".to_string(), "VALUE".to_string()));
            assert_eq!(result[1], ("KEY2".to_string(), "V2  ".to_string()));
        }

        #[test]
        fn test_empty_key_error() {
            assert!(EnvMerger::parse_temp_vars(&["=VALUE".to_string()]).is_err());
        }

        #[test]
        fn test_missing_equals_error() {
            assert!(EnvMerger::parse_temp_vars(&["INVALID".to_string()]).is_err());
        }

        #[test]
        fn test_empty_value_ok() {
            let result = EnvMerger::parse_temp_vars(&["KEY=".to_string()]).unwrap();
            assert_eq!(result[0], ("KEY".to_string(), "".to_string()));
        }
    }

    mod merge_environment_tests {
        use super::*;

        #[test]
        fn test_file_vars_present() {
            let (_tmp, store) = store_with_file("ROAST_DB_HOST=localhost");

            let env = EnvMerger::merge_environment(&store, &[]).unwrap();
            assert_eq!(env.get("ROAST_DB_HOST"), Some(&"localhost".to_string()));
        }

        #[test]
        fn test_temp_vars_override_file() {
            let (_tmp, store) = store_with_file("ROAST_DB_HOST=from_file");

            let temp = vec![("ROAST_DB_HOST".to_string(), "from_cli".to_string())];
            let env = EnvMerger::merge_environment(&store, &temp).unwrap();

            assert_eq!(env.get("ROAST_DB_HOST"), Some(&"from_cli".to_string()));
        }

        #[test]
        fn test_merged_env_is_expanded() {
            let (_tmp, store) = store_with_file(
                "ROAST_DB_HOST=localhost\nROAST_DATABASE_URL=postgres://${ROAST_DB_HOST}/roast",
            );

            let env = EnvMerger::merge_environment(&store, &[]).unwrap();
            assert_eq!(
                env.get("ROAST_DATABASE_URL"),
                Some(&"postgres://localhost/roast".to_string())
            );
        }
    }
}
