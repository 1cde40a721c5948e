//! 云存储凭据配置
//!
//! 仅承载与校验配置完整性，不发起任何上传。

use crate::settings::{keys, lookup};
use serde::Serialize;
use std::collections::HashMap;

/// AWS 配置段
#[derive(Debug, Clone, Default, Serialize)]
pub struct AwsSettings {
    pub access_key_id: Option<String>,
    #[serde(skip)]
    pub secret_access_key: Option<String>,
    pub region: Option<String>,
    pub bucket: Option<String>,
}

impl AwsSettings {
    pub fn load(resolved: &HashMap<String, String>) -> Self {
        Self {
            access_key_id: lookup(resolved, keys::AWS_ACCESS_KEY_ID),
            secret_access_key: lookup(resolved, keys::AWS_SECRET_ACCESS_KEY),
            region: lookup(resolved, keys::AWS_REGION),
            bucket: lookup(resolved, keys::AWS_S3_BUCKET),
        }
    }

    /// 是否有任意一项被设置
    pub fn any_set(&self) -> bool {
        self.access_key_id.is_some()
            || self.secret_access_key.is_some()
            || self.region.is_some()
            || self.bucket.is_some()
    }

    /// 上传所必需但缺失的变量（密钥对 + 桶；region 可走默认链）
    pub fn missing_for_upload(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.access_key_id.is_none() {
            missing.push(keys::AWS_ACCESS_KEY_ID);
        }
        if self.secret_access_key.is_none() {
            missing.push(keys::AWS_SECRET_ACCESS_KEY);
        }
        if self.bucket.is_none() {
            missing.push(keys::AWS_S3_BUCKET);
        }
        missing
    }

    /// 配置完整，可以上传
    pub fn is_configured(&self) -> bool {
        self.any_set() && self.missing_for_upload().is_empty()
    }
}
