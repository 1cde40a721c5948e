//! 核心存储引擎
//!
//! 合并进程环境与环境文件两个层级。
//! 优先级：进程环境 > 环境文件（文件为缺失的变量补位，不覆盖已有环境）。

use crate::dotenv::DotenvParser;
use crate::error::{ConfigError, Result};
use crate::expand;
use crate::types::{AppConfig, EnvEntry, EnvSource};
use crate::utils::paths::{self, file_exists, read_file, write_file_safe};
use log::debug;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;

// ==================== 文件内容缓存 ====================

/// 文件缓存条目
#[derive(Clone)]
struct FileCacheEntry {
    entries: Vec<EnvEntry>,
    last_modified: SystemTime,
}

/// 全局文件缓存（读多写少，用 RwLock）
static FILE_CACHE: OnceLock<RwLock<HashMap<PathBuf, FileCacheEntry>>> = OnceLock::new();

fn file_cache() -> &'static RwLock<HashMap<PathBuf, FileCacheEntry>> {
    FILE_CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// 核心存储引擎
#[derive(Clone)]
pub struct EnvStore {
    config: AppConfig,
}

impl EnvStore {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// 当前生效的环境文件路径
    pub fn env_file_path(&self) -> Result<PathBuf> {
        match &self.config.env_file {
            Some(path) => Ok(path.clone()),
            None => paths::default_env_file(),
        }
    }

    // ==================== 读取 ====================

    /// 读取环境文件条目（带缓存；文件不存在时返回空）
    pub fn file_entries(&self) -> Result<Vec<EnvEntry>> {
        let path = self.env_file_path()?;

        if !file_exists(&path) {
            return Ok(vec![]);
        }

        if let Some(cached) = self.cached_entries(&path)? {
            return Ok(cached);
        }

        debug!("[store] 读取环境文件: {}", path.display());
        let content = read_file(&path)?;
        let entries = DotenvParser::parse(&content)?;
        self.update_cache(&path, entries.clone())?;

        Ok(entries)
    }

    /// 进程环境变量条目（字面值，不参与展开）
    pub fn process_entries(&self) -> Vec<EnvEntry> {
        let mut entries: Vec<EnvEntry> = std::env::vars()
            .map(|(k, v)| EnvEntry::new(k, v, EnvSource::Process))
            .collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        entries
    }

    /// 列出变量（原始值，不展开）
    pub fn list(&self, source_filter: Option<EnvSource>) -> Result<Vec<EnvEntry>> {
        match source_filter {
            Some(EnvSource::Process) => Ok(self.process_entries()),
            Some(EnvSource::File) => self.file_entries(),
            None => {
                let mut merged: Vec<EnvEntry> = self.raw_map()?.into_values().collect();
                merged.sort_by(|a, b| a.key.cmp(&b.key));
                Ok(merged)
            }
        }
    }

    /// 按优先级合并后的原始变量表（进程环境覆盖文件）
    pub fn raw_map(&self) -> Result<HashMap<String, EnvEntry>> {
        let mut map = HashMap::new();

        for entry in self.file_entries()? {
            map.insert(entry.key.clone(), entry);
        }
        for entry in self.process_entries() {
            map.insert(entry.key.clone(), entry);
        }

        Ok(map)
    }

    /// 完全展开后的环境
    pub fn resolved(&self) -> Result<HashMap<String, String>> {
        expand::expand_all(&self.raw_map()?)
    }

    /// 获取单个变量（合并 + 展开后）
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        expand::expand_one(key, &self.raw_map()?)
    }

    // ==================== 写入（仅文件层） ====================

    /// 设置变量（写入环境文件）
    pub fn set(&self, key: String, value: String) -> Result<()> {
        let path = self.env_file_path()?;

        let mut entries = if file_exists(&path) {
            let content = read_file(&path)?;
            DotenvParser::parse(&content)?
        } else {
            Vec::new()
        };

        // 更新或追加
        if let Some(existing) = entries.iter_mut().find(|e| e.key == key) {
            existing.value = value.clone();
        } else {
            entries.push(EnvEntry::new(key.clone(), value.clone(), EnvSource::File));
        }

        write_file_safe(&path, &DotenvParser::serialize(&entries))?;
        self.invalidate_cache(&path);

        if self.config.verbose {
            println!("✓ 设置变量 {} = {}", key, value);
        }

        Ok(())
    }

    /// 删除变量（从环境文件中移除）
    pub fn unset(&self, key: &str) -> Result<bool> {
        let path = self.env_file_path()?;

        if !file_exists(&path) {
            return Ok(false);
        }

        let content = read_file(&path)?;
        let entries = DotenvParser::parse(&content)?;
        let remaining: Vec<EnvEntry> = entries.iter().filter(|e| e.key != key).cloned().collect();

        if remaining.len() == entries.len() {
            return Ok(false);
        }

        if remaining.is_empty() {
            std::fs::remove_file(&path)?;
        } else {
            write_file_safe(&path, &DotenvParser::serialize(&remaining))?;
        }
        self.invalidate_cache(&path);

        if self.config.verbose {
            println!("✓ 删除变量 {}", key);
        }

        Ok(true)
    }

    /// 导出为 .env 格式（原始值）
    pub fn export(&self, source_filter: Option<EnvSource>) -> Result<String> {
        Ok(DotenvParser::serialize(&self.list(source_filter)?))
    }

    // ==================== 缓存 ====================

    fn cached_entries(&self, path: &PathBuf) -> Result<Option<Vec<EnvEntry>>> {
        let cache = file_cache()
            .read()
            .map_err(|_| ConfigError::Parse("文件缓存锁中毒".to_string()))?;

        if let Some(entry) = cache.get(path) {
            let current_modified = std::fs::metadata(path)?.modified()?;
            if entry.last_modified == current_modified {
                return Ok(Some(entry.entries.clone()));
            }
        }

        Ok(None)
    }

    fn update_cache(&self, path: &PathBuf, entries: Vec<EnvEntry>) -> Result<()> {
        let current_modified = std::fs::metadata(path)?.modified()?;

        let mut cache = file_cache()
            .write()
            .map_err(|_| ConfigError::Parse("文件缓存锁中毒".to_string()))?;

        cache.insert(
            path.clone(),
            FileCacheEntry {
                entries,
                last_modified: current_modified,
            },
        );

        Ok(())
    }

    /// 清除指定路径的缓存
    pub fn invalidate_cache(&self, path: &PathBuf) {
        if let Ok(mut cache) = file_cache().write() {
            cache.remove(path);
        }
    }
}
