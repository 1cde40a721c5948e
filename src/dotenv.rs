//! .env 格式解析器
//!
//! 规则：
//! - 忽略空行和以 # 开头的注释行
//! - 格式：KEY=VALUE，键前可带 `export ` 前缀
//! - VALUE 两侧空白被裁剪；成对的双引号或单引号被剥除
//! - 单引号值不参与 `${VAR}` 展开
//! - 以 \ 结尾的行与下一行拼接（多行值）
//! - 非赋值行被跳过，行号记录在解析结果中供诊断使用

use crate::error::{ConfigError, Result};
use crate::types::EnvEntry;
use log::debug;

/// .env 格式解析器
pub struct DotenvParser;

/// 解析结果：条目 + 被跳过的非赋值行
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    pub entries: Vec<EnvEntry>,
    /// (行号, 行内容)
    pub skipped: Vec<(usize, String)>,
}

impl DotenvParser {
    /// 解析 .env 文件内容，只返回变量条目
    ///
    /// # Errors
    ///
    /// 空键名 (`=value`) 返回带行号的解析错误。
    pub fn parse(content: &str) -> Result<Vec<EnvEntry>> {
        Ok(Self::parse_detailed(content)?.entries)
    }

    /// 解析 .env 文件内容，同时收集被跳过的行
    pub fn parse_detailed(content: &str) -> Result<ParseOutcome> {
        let lines: Vec<&str> = content.lines().collect();
        let mut entries = Vec::new();
        let mut skipped = Vec::new();
        let mut line_num = 0;

        while line_num < lines.len() {
            let start_line = line_num + 1;
            let line = lines[line_num].trim();

            // 跳过空行和注释
            if line.is_empty() || line.starts_with('#') {
                line_num += 1;
                continue;
            }

            // 多行值（以 \ 结尾）
            let mut complete_line = line.to_string();
            while complete_line.ends_with('\\') && line_num + 1 < lines.len() {
                complete_line.pop();
                line_num += 1;
                complete_line.push_str(lines[line_num].trim());
            }
            line_num += 1;

            // 解析 KEY=VALUE
            let Some((key, value)) = complete_line.split_once('=') else {
                debug!("[dotenv] 第 {} 行不是赋值，跳过: {}", start_line, complete_line);
                skipped.push((start_line, complete_line));
                continue;
            };

            let mut key = key.trim();
            // 容忍 shell 风格的 export 前缀
            if let Some(stripped) = key.strip_prefix("export ") {
                key = stripped.trim();
            }

            if key.is_empty() {
                return Err(ConfigError::Parse(format!("第 {} 行键名为空", start_line)));
            }

            let (value, literal) = unquote(value.trim());
            entries.push(EnvEntry::in_file(key.to_string(), value, literal, start_line));
        }

        Ok(ParseOutcome { entries, skipped })
    }

    /// 序列化 `EnvEntry` 列表为 .env 格式
    ///
    /// 字面值条目 (单引号来源) 重新用单引号包裹，保持不展开语义。
    #[must_use]
    pub fn serialize(entries: &[EnvEntry]) -> String {
        entries
            .iter()
            .map(|e| {
                if e.literal {
                    format!("{}='{}'", e.key, e.value)
                } else {
                    format!("{}={}", e.key, e.value)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// 剥除成对引号，返回 (值, 是否字面值)
fn unquote(value: &str) -> (String, bool) {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        if bytes[0] == b'"' && bytes[bytes.len() - 1] == b'"' {
            return (value[1..value.len() - 1].to_string(), false);
        }
        if bytes[0] == b'\'' && bytes[bytes.len() - 1] == b'\'' {
            return (value[1..value.len() - 1].to_string(), true);
        }
    }
    (value.to_string(), false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let content = r"
# 注释会被忽略
ROAST_DB_HOST=localhost
ROAST_DB_PORT=5432
        ";

        let result = DotenvParser::parse(content).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].key, "ROAST_DB_HOST");
        assert_eq!(result[0].value, "localhost");
        assert_eq!(result[0].line, Some(3));
        assert_eq!(result[1].line, Some(4));
    }

    #[test]
    fn test_parse_empty_value() {
        let content = "ROAST_DB_PWD=\nROAST_DB_NAME=roast";
        let result = DotenvParser::parse(content).unwrap();
        assert_eq!(result[0].value, "");
    }

    #[test]
    fn test_parse_export_prefix() {
        let content = "export GITHUB_TOKEN=abc123";
        let result = DotenvParser::parse(content).unwrap();
        assert_eq!(result[0].key, "GITHUB_TOKEN");
        assert_eq!(result[0].value, "abc123");
    }

    #[test]
    fn test_parse_double_quoted() {
        let content = r#"ROAST_EXPORT_PATH="/data/roast out""#;
        let result = DotenvParser::parse(content).unwrap();
        assert_eq!(result[0].value, "/data/roast out");
        assert!(!result[0].literal);
    }

    #[test]
    fn test_parse_single_quoted_is_literal() {
        let content = "ROAST_DB_PWD='p${a}ss'";
        let result = DotenvParser::parse(content).unwrap();
        assert_eq!(result[0].value, "p${a}ss");
        assert!(result[0].literal);
    }

    #[test]
    fn test_parse_empty_key_error() {
        let content = "KEY=value\n=orphan";
        let result = DotenvParser::parse(content);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("第 2 行"));
    }

    #[test]
    fn test_parse_skips_non_assignment() {
        let content = "KEY=value\nNOT AN ASSIGNMENT\nOTHER=x";
        let outcome = DotenvParser::parse_detailed(content).unwrap();
        assert_eq!(outcome.entries.len(), 2);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].0, 2);
    }

    #[test]
    fn test_parse_multiline_value() {
        let content = "MULTI=part1\\\npart2\nKEY=value";
        let result = DotenvParser::parse(content).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].value, "part1part2");
        // 后续条目的行号按源文件计
        assert_eq!(result[1].line, Some(3));
    }

    #[test]
    fn test_parse_interpolation_kept_raw() {
        let content =
            "ROAST_DATABASE_URL=postgres://${ROAST_DB_USR}:${ROAST_DB_PWD}@${ROAST_DB_HOST}:${ROAST_DB_PORT}/${ROAST_DB_NAME}";
        let result = DotenvParser::parse(content).unwrap();
        // 解析阶段不展开，原样保留
        assert!(result[0].value.contains("${ROAST_DB_USR}"));
    }

    #[test]
    fn test_serialize_roundtrip() {
        let content = "A=1\nB='${raw}'\nC=hello world";
        let entries = DotenvParser::parse(content).unwrap();
        let serialized = DotenvParser::serialize(&entries);
        assert_eq!(serialized, "A=1\nB='${raw}'\nC=hello world");

        let reparsed = DotenvParser::parse(&serialized).unwrap();
        assert_eq!(
            entries.iter().map(|e| (&e.key, &e.value, e.literal)).collect::<Vec<_>>(),
            reparsed.iter().map(|e| (&e.key, &e.value, e.literal)).collect::<Vec<_>>()
        );
    }
}
