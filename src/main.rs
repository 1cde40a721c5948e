//! roast-env 主程序入口
//!
//! 设计原则：
//! - 入口代码简洁，逻辑委托给各模块
//! - 安静模式：默认无输出，成功静默
//! - 错误处理：详细/安静错误模式，通过 --verbose 切换

use clap::Parser;
use roast_env::cli::{self, Cli, Commands};
use roast_env::core::EnvStore;
use roast_env::dotenv::DotenvParser;
use roast_env::error::{ConfigError, Result};
use roast_env::expand::parser as refs;
use roast_env::settings::{
    self, AwsSettings, DatabaseSettings, ExportSettings, RoastSettings, RuntimeSettings, keys,
    mask_secret,
};
use roast_env::types::{AppConfig, OutputFormat};
use roast_env::utils::env_merge::EnvMerger;
use roast_env::utils::executor::CommandExecutor;
use roast_env::utils::paths;
use std::collections::{BTreeMap, HashMap};

fn main() {
    let cli = Cli::parse();

    let config = AppConfig {
        verbose: cli.verbose,
        env_file: cli.file.clone(),
    };

    // 创建存储引擎
    let store = EnvStore::new(config.clone());

    // 日志初始化要在任何命令逻辑之前
    init_logger(&store);

    let result = run_command(cli.command, store, config.verbose);

    match result {
        Ok(_) => {
            // 静默成功
        }
        Err(e) => {
            e.report(config.verbose);
            std::process::exit(1);
        }
    }
}

/// 初始化日志
///
/// 进程环境里的 RUST_LOG 由 env_logger 自行读取；
/// 缺失时回退到环境文件里的过滤串。
fn init_logger(store: &EnvStore) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default());

    if std::env::var_os(keys::RUST_LOG).is_none() {
        if let Ok(Some(filter)) = store.get(keys::RUST_LOG) {
            builder.parse_filters(&filter);
        }
    }

    let _ = builder.try_init();
}

/// 运行具体命令
fn run_command(command: Commands, store: EnvStore, verbose: bool) -> Result<()> {
    match command {
        // 读取系列
        Commands::Get { key } => match store.get(&key)? {
            Some(value) => println!("{}", value),
            None => {
                return Err(ConfigError::NotFound(key));
            }
        },

        // 写入系列
        Commands::Set { key, value } => store.set(key, value)?,

        Commands::Unset { key } => {
            let deleted = store.unset(&key)?;
            if verbose && deleted {
                println!("✓ 已删除");
            } else if !deleted {
                return Err(ConfigError::NotFound(key));
            }
        }

        // 列出系列
        Commands::List { source, format } => {
            let source_filter = cli::parse_source(source.as_deref())?;
            let entries = store.list(source_filter)?;

            match cli::parse_format(&format) {
                OutputFormat::Env => {
                    for entry in &entries {
                        println!("{}={}", entry.key, entry.value);
                    }
                }
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&entries)?);
                }
            }
        }

        // 导出系列
        Commands::Export { source, format } => {
            let source_filter = cli::parse_source(source.as_deref())?;

            match cli::parse_format(&format) {
                OutputFormat::Env => {
                    println!("{}", store.export(source_filter)?);
                }
                OutputFormat::Json => {
                    let entries = store.list(source_filter)?;
                    println!("{}", serde_json::to_string_pretty(&entries)?);
                }
            }
        }

        Commands::Render { format } => {
            let resolved = store.resolved()?;
            // 只输出应用识别的变量，机器可读，不掩码
            let roast_env: BTreeMap<&str, &String> = keys::ALL
                .iter()
                .filter_map(|key| resolved.get(*key).map(|v| (*key, v)))
                .collect();

            match cli::parse_format(&format) {
                OutputFormat::Env => {
                    for (key, value) in &roast_env {
                        println!("{}={}", key, value);
                    }
                }
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&roast_env)?);
                }
            }
        }

        // 状态显示
        Commands::Show => {
            show_settings(&store, verbose)?;
        }

        // 问题诊断
        Commands::Check => {
            diagnose(&store, verbose)?;
        }

        // 模板生成
        Commands::Init { force } => {
            init_example(force, verbose)?;
        }

        // 注入环境并运行命令
        Commands::Run { var, command: cmd } => {
            // 1. 解析临时变量
            let temp_vars = EnvMerger::parse_temp_vars(&var)?;

            // 2. 构建完整环境（展开 + 按优先级合并）
            let final_env = EnvMerger::merge_environment(&store, &temp_vars)?;

            // 3. 执行命令，退出码透传
            let exit_code = CommandExecutor::exec_with_env(&cmd, &final_env)?;
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

/// 显示类型化配置总览（敏感值掩码）
fn show_settings(store: &EnvStore, verbose: bool) -> Result<()> {
    let settings = RoastSettings::load(store)?;

    println!("环境文件: {}", store.env_file_path()?.display());
    println!();

    // GitHub
    match &settings.github.token {
        Some(token) => println!("GitHub token:     {}", mask_secret(token)),
        None => println!("GitHub token:     未设置 (API 请求将受到更严格的限流)"),
    }

    // 并行
    match settings.runtime.rayon_threads {
        Some(threads) => println!("Rayon 线程数:     {}", threads),
        None => println!("Rayon 线程数:     自动"),
    }

    // 日志
    match &settings.log.filter {
        Some(filter) => println!("日志过滤:         {}", filter),
        None => println!("日志过滤:         未设置"),
    }

    // AWS
    if settings.aws.is_configured() {
        println!(
            "S3 上传:          {} ({})",
            settings.aws.bucket.as_deref().unwrap_or_default(),
            settings.aws.region.as_deref().unwrap_or("默认区域")
        );
    } else if settings.aws.any_set() {
        println!(
            "S3 上传:          配置不完整，缺少 {}",
            settings.aws.missing_for_upload().join(", ")
        );
    } else {
        println!("S3 上传:          未配置");
    }

    // 数据库
    match settings.database.display_url() {
        Some(url) => println!("数据库:           {} (sslmode={})", url, settings.database.ssl_mode),
        None => println!("数据库:           未配置"),
    }

    // 导出
    match &settings.export.path {
        Some(path) => println!("导出目录:         {}", path.display()),
        None => println!("导出目录:         未设置"),
    }

    if verbose {
        let file_vars = store.list(Some(roast_env::EnvSource::File))?;
        println!();
        println!("环境文件内共 {} 个变量", file_vars.len());
    }

    Ok(())
}

/// 诊断环境配置问题
fn diagnose(store: &EnvStore, verbose: bool) -> Result<()> {
    println!("🔍 roast 环境检查\n");

    let mut errors = 0;
    let mut warnings = 0;
    let mut file_ok = true;
    let mut refs_ok = true;

    // 1. 环境文件解析
    let path = store.env_file_path()?;
    if paths::file_exists(&path) {
        let content = paths::read_file(&path)?;
        match DotenvParser::parse_detailed(&content) {
            Ok(outcome) => {
                println!(
                    "✓ 环境文件 {} ({} 个变量)",
                    path.display(),
                    outcome.entries.len()
                );

                // 非赋值行
                for (line, text) in &outcome.skipped {
                    println!("⚠️  第 {} 行不是 KEY=VALUE 赋值: {}", line, text);
                    warnings += 1;
                }

                // 重复定义
                let mut occurrences: HashMap<&str, Vec<usize>> = HashMap::new();
                for entry in &outcome.entries {
                    occurrences
                        .entry(entry.key.as_str())
                        .or_default()
                        .push(entry.line.unwrap_or(0));
                }
                for (key, lines) in &occurrences {
                    if lines.len() > 1 {
                        println!("⚠️  变量 {} 重复定义 (行 {:?})，最后一次生效", key, lines);
                        warnings += 1;
                    }
                }

                // 残缺引用与未定义引用
                let raw = store.raw_map()?;
                for entry in &outcome.entries {
                    if entry.literal {
                        continue;
                    }
                    for fragment in refs::malformed(&entry.value) {
                        println!(
                            "⚠️  变量 {} 含无法识别的引用片段 {}，将原样保留",
                            entry.key, fragment
                        );
                        warnings += 1;
                    }
                    for var_ref in refs::scan(&entry.value) {
                        if var_ref.required() && !raw.contains_key(&var_ref.name) {
                            println!(
                                "❌ 变量 {} 引用了未定义的 ${{{}}}",
                                entry.key, var_ref.name
                            );
                            errors += 1;
                            refs_ok = false;
                        }
                    }
                }

                // 疑似拼写错误的 ROAST_ 前缀变量
                for entry in &outcome.entries {
                    if entry.key.starts_with("ROAST_") && !keys::is_recognized(&entry.key) {
                        println!("⚠️  未识别的变量 {} (拼写错误？)", entry.key);
                        warnings += 1;
                    }
                }
            }
            Err(e) => {
                println!("❌ 环境文件解析失败: {}", e);
                errors += 1;
                file_ok = false;
            }
        }
    } else {
        println!("ℹ️  环境文件不存在: {} (仅使用进程环境)", path.display());
    }

    // 2. 展开与类型化校验（未定义引用已单独报告，避免重复）
    if file_ok && refs_ok {
        match store.resolved() {
            Ok(resolved) => {
                match RuntimeSettings::load(&resolved) {
                    Ok(_) => {}
                    Err(e) => {
                        println!("❌ {}", e);
                        errors += 1;
                    }
                }

                match DatabaseSettings::load(&resolved) {
                    Ok(db) => {
                        if let Some(url) = db.display_url() {
                            println!("✓ 数据库连接串: {}", url);
                        } else if db.host.is_some() != db.name.is_some() {
                            println!("⚠️  数据库配置不完整 (host 和 name 需要同时给出)");
                            warnings += 1;
                        }

                        for (key, cert) in [
                            (keys::ROAST_DB_SSL_ROOT_CERT, &db.ssl_root_cert),
                            (keys::ROAST_DB_SSL_CERT, &db.ssl_cert),
                            (keys::ROAST_DB_SSL_KEY, &db.ssl_key),
                        ] {
                            if let Some(cert_path) = cert {
                                if !cert_path.exists() {
                                    println!(
                                        "⚠️  {} 指向的文件不存在: {}",
                                        key,
                                        cert_path.display()
                                    );
                                    warnings += 1;
                                }
                            }
                        }
                    }
                    Err(e) => {
                        println!("❌ {}", e);
                        errors += 1;
                    }
                }

                let aws = AwsSettings::load(&resolved);
                if aws.any_set() && !aws.is_configured() {
                    println!(
                        "⚠️  AWS 配置不完整，缺少 {}",
                        aws.missing_for_upload().join(", ")
                    );
                    warnings += 1;
                }

                let export = ExportSettings::load(&resolved);
                if let Some(export_path) = &export.path {
                    if !export_path.exists() {
                        println!("⚠️  导出目录不存在: {}", export_path.display());
                        warnings += 1;
                    } else if !export_path.is_dir() {
                        println!("❌ 导出路径不是目录: {}", export_path.display());
                        errors += 1;
                    }
                }
            }
            Err(e) => {
                println!("❌ 变量展开失败: {}", e);
                errors += 1;
            }
        }
    }

    // 3. 汇总
    println!();
    if errors == 0 && warnings == 0 {
        println!("✅ 未发现问题");
    } else {
        println!("发现 {} 个错误，{} 个警告", errors, warnings);
        if !verbose {
            println!("提示：使用 --verbose 查看详细信息");
        }
    }

    if errors > 0 {
        return Err(ConfigError::CheckFailed(errors));
    }

    Ok(())
}

/// 写出 .env.example 模板
fn init_example(force: bool, verbose: bool) -> Result<()> {
    let current_dir = std::env::current_dir()
        .map_err(|e| ConfigError::InvalidArgument(format!("无法获取当前目录: {}", e)))?;
    let path = current_dir.join(paths::EXAMPLE_FILE_NAME);

    if paths::file_exists(&path) && !force {
        return Err(ConfigError::AlreadyExists(path));
    }

    paths::write_file_safe(&path, settings::EXAMPLE_ENV)?;

    if verbose {
        println!("✓ 已生成 {}", path.display());
    }

    Ok(())
}
