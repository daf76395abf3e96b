// cli.rs - 命令行接口定义模块
// 使用 clap 的 derive 模式定义参数和子命令

use clap::{Parser, Subcommand}; // Parser: 解析命令行参数的 trait; Subcommand: 定义子命令的 trait
use clap_complete::Shell; // Shell 枚举：Bash, Zsh, Fish, Elvish, PowerShell

/// 必应每日壁纸工具
///
/// 不带参数时下载必应主页今天的背景图并设置为桌面壁纸；
/// 带日期参数（如 20240101）时从历史壁纸列表中查找那一天的图片。
#[derive(Parser)]
#[command(name = "bingwall")]
#[command(version)] // 自动从 Cargo.toml 读取 version 字段
#[command(author)]
#[command(about = "必应每日壁纸下载与设置工具")]
pub struct Cli {
    /// 目标日期 (YYYYMMDD)，超过 8 位会被截断，不足 8 位则使用今天
    pub date: Option<String>,

    /// 只下载，不设置为桌面壁纸
    #[arg(long)]
    pub no_apply: bool,

    /// 输出调试日志
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 列出已缓存的壁纸
    ///
    /// 用法示例:
    ///   bingwall list
    List,

    /// 配置管理操作
    ///
    /// 用法示例:
    ///   bingwall config show
    ///   bingwall config set today_size 2k
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// 生成 shell 补全脚本（支持 bash, zsh, fish, elvish, powershell）
    ///
    /// 用法示例：
    ///   bingwall completions zsh > ~/.zsh/completions/_bingwall
    Completions {
        /// 目标 shell 类型
        shell: Shell,
    },
}

/// 配置管理操作
#[derive(Subcommand)]
pub enum ConfigAction {
    /// 查看当前所有配置简报
    Show,
    /// 生成配置文件对应的 JSON Schema
    Schema,
    /// 以 TOML 格式打印当前完整配置内容
    Dump,
    /// 设置配置项 (支持: dir, today_size, archive_size)
    Set {
        /// 要设置的键
        key: String,
        /// 要设置的值
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_arguments_means_today() {
        let cli = Cli::try_parse_from(["bingwall"]).unwrap();
        assert!(cli.date.is_none());
        assert!(cli.command.is_none());
        assert!(!cli.no_apply);
    }

    #[test]
    fn positional_date_is_captured() {
        let cli = Cli::try_parse_from(["bingwall", "20240101", "--no-apply"])
            .unwrap();
        assert_eq!(cli.date.as_deref(), Some("20240101"));
        assert!(cli.no_apply);
    }

    #[test]
    fn subcommands_parse() {
        let cli = Cli::try_parse_from(["bingwall", "config", "set", "today_size", "2k"])
            .unwrap();
        match cli.command {
            Some(Commands::Config {
                action: ConfigAction::Set { key, value },
            }) => {
                assert_eq!(key, "today_size");
                assert_eq!(value, "2k");
            }
            _ => panic!("expected config set"),
        }

        let cli = Cli::try_parse_from(["bingwall", "list", "-v"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::List)));
        assert!(cli.verbose);
    }
}
