//! 变量引用扫描
//!
//! 从原始值中提取 `${NAME}` / `${NAME:-default}` 引用

use crate::expand::VarRef;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// 严格形式：${NAME} 或 ${NAME:-default}
pub(crate) fn ref_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}$").unwrap()
    })
}

/// 候选形式：任何 ${...} 片段
pub(crate) fn candidate_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{[^}]*\}").unwrap())
}

/// 扫描一个原始值中的变量引用（按出现顺序去重，保留第一个）
pub fn scan(value: &str) -> Vec<VarRef> {
    let mut refs = Vec::new();
    let mut seen = HashSet::new();

    for candidate in candidate_pattern().find_iter(value) {
        let Some(cap) = ref_pattern().captures(candidate.as_str()) else {
            continue;
        };
        let name = cap.get(1).map(|m| m.as_str().to_string()).unwrap_or_default();
        if seen.insert(name.clone()) {
            refs.push(VarRef {
                name,
                default: cap.get(2).map(|m| m.as_str().to_string()),
            });
        }
    }

    refs
}

/// 扫描无法识别为合法引用的 ${...} 片段
pub fn malformed(value: &str) -> Vec<String> {
    candidate_pattern()
        .find_iter(value)
        .filter(|m| !ref_pattern().is_match(m.as_str()))
        .map(|m| m.as_str().to_string())
        .collect()
}
