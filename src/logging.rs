// logging.rs - 日志初始化
// 诊断日志写到 stderr，面向用户的进度信息仍然用 println! 输出到 stdout

use tracing_subscriber::EnvFilter;

/// 初始化 tracing
///
/// 优先使用 RUST_LOG，未设置时默认只输出 warn 及以上，`--verbose` 时输出 debug。
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "info,bingwall=debug"
    } else {
        "warn"
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
