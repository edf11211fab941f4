//! 日志目标与订阅器安装入口。
//!
//! # 教案式说明
//! - **意图（Why）**：库内部只通过 `tracing` 宏发事件，是否输出、输出到哪里由宿主决定；
//!   基准与演示程序需要一个“一行装好”的入口，测试则使用 `tracing-test` 捕获；
//! - **逻辑（How）**：[`targets`] 集中声明各策略的日志目标，便于用 `RUST_LOG=spark_seq::channel=debug`
//!   之类的过滤表达式精确开启；[`install_fmt_subscriber`] 组装 `fmt + EnvFilter` 并设为全局默认；
//! - **契约（What）**：全局 Subscriber 只能设置一次，重复安装返回 [`InstallError`]。

use tracing_subscriber::{EnvFilter, layer::SubscriberExt};

/// 各模块使用的 `tracing` 目标名。
pub mod targets {
    pub const BOUNDS: &str = "spark_seq::bounds";
    pub const CHANNEL: &str = "spark_seq::channel";
    pub const CLOSURE: &str = "spark_seq::closure";
    pub const OBJECT: &str = "spark_seq::object";
}

/// 未设置 `RUST_LOG` 时的过滤级别。
pub const DEFAULT_FILTER: &str = "info";

/// 全局 Subscriber 已被其他组件设置。
#[derive(Debug, thiserror::Error)]
#[error("global tracing subscriber already installed: {0}")]
pub struct InstallError(#[from] tracing::subscriber::SetGlobalDefaultError);

/// 安装 `fmt` 输出层与环境变量过滤器作为全局 Subscriber。
pub fn install_fmt_subscriber() -> Result<(), InstallError> {
    let subscriber = tracing_subscriber::registry()
        .with(build_env_filter())
        .with(tracing_subscriber::fmt::layer());
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn build_env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
