// main.rs - 程序入口
// 负责初始化运行时、日志和语言，解析命令行参数并分发

mod app;
mod cli;
mod config;
mod fetch;
mod logging;
mod resolve;
mod setter;
mod source;
mod store;

// 初始化多语言支持，嵌入 locales 目录下的所有翻译
rust_i18n::i18n!("locales", fallback = "en");

use clap::{CommandFactory, Parser};
use clap_complete::generate; // 引入补全脚本生成函数
use cli::{Cli, Commands, ConfigAction};
use config::AppConfig;
use fetch::HttpFetcher;
use rust_i18n::t;
use setter::SystemApplier;

/// `#[tokio::main]` 宏将 async main 转换为同步 main + tokio 运行时
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 自动检测系统语言并设置
    let locale = std::env::var("LANG").unwrap_or_else(|_| "en".to_string());
    if locale.starts_with("zh") {
        rust_i18n::set_locale("zh-CN");
    } else {
        rust_i18n::set_locale("en");
    }

    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    // 和下载流程一样，读不到配置时只打印原因
    let mut config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            println!("{}", t!("failed", reason => e));
            return Ok(());
        }
    };

    match &cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            generate(*shell, &mut cmd, "bingwall", &mut std::io::stdout());
        }
        Some(Commands::Config { action }) => handle_config(&mut config, action)?,
        Some(Commands::List) => handle_list(&config)?,
        None => {
            let fetcher = HttpFetcher::new();
            let today = chrono::Local::now().date_naive();

            // 失败时只打印原因，进程照常退出
            if let Err(e) = app::run(
                &fetcher,
                &SystemApplier,
                &config,
                cli.date.as_deref(),
                today,
                !cli.no_apply,
            )
            .await
            {
                println!("{}", t!("failed", reason => e));
            }
        }
    }

    Ok(())
}

/// 处理 list 子命令：列出缓存目录中的壁纸
fn handle_list(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let files = store::list_cached(&config.cache_dir)?;
    let path = config.cache_dir.display();
    println!("{}", t!("list_title", path => path, count => files.len()));
    for file in &files {
        if let Some(name) = file.file_name() {
            println!("  {}", name.to_string_lossy());
        }
    }
    Ok(())
}

/// 处理 config 子命令：查看或修改配置
fn handle_config(
    config: &mut AppConfig,
    action: &ConfigAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config_path = config.config_path.display();
            let cache_dir = config.cache_dir.display();
            let source = &config.source;

            println!("{}", t!("config_title"));
            println!("{}", t!("config_path", path => config_path));
            println!("{}", t!("config_cache_dir", path => cache_dir));
            println!("{}", t!("config_today_size", size => config.today_size));
            println!("{}", t!("config_archive_size", size => config.archive_size));
            println!("{}", t!("config_homepage", url => source.homepage_url));
            println!("{}", t!("config_archive", url => source.archive_url));
        }
        ConfigAction::Schema => {
            println!("{}", AppConfig::get_schema()?);
        }
        ConfigAction::Dump => {
            println!("{}", config.to_toml());
        }
        ConfigAction::Set { key, value } => {
            let value = config.set(key, value)?;
            config.save()?;
            println!("{}", t!("config_updated", key => key, value => value));
        }
    }
    Ok(())
}
