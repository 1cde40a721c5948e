//! 应用识别的全部环境变量名

// GitHub
pub const GITHUB_TOKEN: &str = "GITHUB_TOKEN";

// Rayon 线程池
pub const RAYON_NUM_THREADS: &str = "RAYON_NUM_THREADS";

// 日志
pub const RUST_LOG: &str = "RUST_LOG";

// AWS
pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const AWS_REGION: &str = "AWS_REGION";
pub const AWS_S3_BUCKET: &str = "AWS_S3_BUCKET";

// 数据库
pub const ROAST_DB_HOST: &str = "ROAST_DB_HOST";
pub const ROAST_DB_PORT: &str = "ROAST_DB_PORT";
pub const ROAST_DB_NAME: &str = "ROAST_DB_NAME";
pub const ROAST_DB_USR: &str = "ROAST_DB_USR";
pub const ROAST_DB_PWD: &str = "ROAST_DB_PWD";
pub const ROAST_DATABASE_URL: &str = "ROAST_DATABASE_URL";
pub const ROAST_DB_SSL_MODE: &str = "ROAST_DB_SSL_MODE";
pub const ROAST_DB_SSL_ROOT_CERT: &str = "ROAST_DB_SSL_ROOT_CERT";
pub const ROAST_DB_SSL_CERT: &str = "ROAST_DB_SSL_CERT";
pub const ROAST_DB_SSL_KEY: &str = "ROAST_DB_SSL_KEY";

// 导出
pub const ROAST_EXPORT_PATH: &str = "ROAST_EXPORT_PATH";

/// 全部识别的变量名
pub const ALL: &[&str] = &[
    GITHUB_TOKEN,
    RAYON_NUM_THREADS,
    RUST_LOG,
    AWS_ACCESS_KEY_ID,
    AWS_SECRET_ACCESS_KEY,
    AWS_REGION,
    AWS_S3_BUCKET,
    ROAST_DB_HOST,
    ROAST_DB_PORT,
    ROAST_DB_NAME,
    ROAST_DB_USR,
    ROAST_DB_PWD,
    ROAST_DATABASE_URL,
    ROAST_DB_SSL_MODE,
    ROAST_DB_SSL_ROOT_CERT,
    ROAST_DB_SSL_CERT,
    ROAST_DB_SSL_KEY,
    ROAST_EXPORT_PATH,
];

/// 值应被掩码的敏感变量
pub const SECRETS: &[&str] = &[
    GITHUB_TOKEN,
    AWS_SECRET_ACCESS_KEY,
    ROAST_DB_PWD,
    ROAST_DATABASE_URL,
];

/// 是否为应用识别的变量
pub fn is_recognized(key: &str) -> bool {
    ALL.contains(&key)
}

/// 是否为敏感变量
pub fn is_secret(key: &str) -> bool {
    SECRETS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognized_keys() {
        assert!(is_recognized("ROAST_DB_HOST"));
        assert!(is_recognized("GITHUB_TOKEN"));
        assert!(!is_recognized("ROAST_DB_HSOT"));
    }

    #[test]
    fn test_secret_keys() {
        assert!(is_secret("ROAST_DB_PWD"));
        assert!(is_secret("AWS_SECRET_ACCESS_KEY"));
        assert!(!is_secret("ROAST_DB_HOST"));
        assert!(!is_secret("AWS_ACCESS_KEY_ID"));
    }
}
