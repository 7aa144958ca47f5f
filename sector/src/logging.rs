//! Logging 日志模块
//!
//! 基于 `tracing-subscriber` 的默认日志初始化器。日志级别默认为 `INFO`，
//! 可通过 `RUST_LOG` 环境变量覆盖，例如 `RUST_LOG=sector=debug`。

use tracing_subscriber::{
    EnvFilter,
    filter::LevelFilter,
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// 初始化人类可读格式的默认日志。
///
/// # Panics
///
/// 如果全局默认订阅者已经被设置，此函数会 panic。
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer())
        .init()
}

/// 初始化 JSON 格式的日志，每个事件一行，事件字段被展平到顶层。
///
/// # Panics
///
/// 如果全局默认订阅者已经被设置，此函数会 panic。
pub fn init_json_logging() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .flatten_event(true),
        )
        .init()
}

fn env_filter() -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy()
}
