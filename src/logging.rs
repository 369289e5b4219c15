//! 日志系统初始化
//!
//! 控制台输出默认开启（stderr，不污染命令输出）；文件输出经
//! `WXVAULT_LOG_FILE=1` 开启，按天滚动写入 ~/.wxvault/logs。
//! 过滤规则取自 `WXVAULT_LOG`，默认 `wxvault=info`。

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 持有文件日志的 worker guard，drop 时刷新缓冲
pub struct LogGuard {
    _file: Option<tracing_appender::non_blocking::WorkerGuard>,
}

/// 初始化全局日志订阅器
pub fn init() -> Result<LogGuard> {
    let filter = EnvFilter::try_from_env("WXVAULT_LOG")
        .unwrap_or_else(|_| EnvFilter::new("wxvault=info"));

    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let file_enabled = std::env::var("WXVAULT_LOG_FILE")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let mut guard = None;
    let file_layer = if file_enabled {
        let dir = std::env::var("WXVAULT_LOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .unwrap_or_default()
                    .join(".wxvault")
                    .join("logs")
            });
        std::fs::create_dir_all(&dir).with_context(|| format!("无法创建日志目录: {dir:?}"))?;

        let appender = tracing_appender::rolling::daily(dir, "wxvault.log");
        let (writer, worker_guard) = tracing_appender::non_blocking(appender);
        guard = Some(worker_guard);

        Some(
            fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(writer),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(LogGuard { _file: guard })
}
