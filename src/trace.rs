//! Logging hooks
//!
//! 日志钩子
//!
//! Enable with `--features tracing`. Without the feature every macro expands
//! to nothing, so the blocking paths carry no logging cost.
//!
//! 通过 `--features tracing` 启用。未启用时所有宏都展开为空，阻塞路径没有日志开销。

/// Install a `tracing-subscriber` formatter on the current process.
///
/// Reads `RUST_LOG`, falling back to `syncring=trace`. Call it at the start of
/// a test or a benchmark binary. Does nothing without the `tracing` feature.
///
/// 安装 `tracing-subscriber` 格式化输出。读取 `RUST_LOG`，默认为 `syncring=trace`。
#[cfg(feature = "tracing")]
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("syncring=trace"));

    // A second call (another test in the same binary) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_file(false)
                .with_line_number(false)
                .with_timer(fmt::time::uptime()),
        )
        .with(filter)
        .try_init();
}

#[cfg(not(feature = "tracing"))]
pub const fn init_tracing() {}

#[cfg(feature = "tracing")]
pub(crate) use tracing::{debug, trace};

#[cfg(not(feature = "tracing"))]
macro_rules! trace_noop {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug_noop {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub(crate) use debug_noop as debug;
#[cfg(not(feature = "tracing"))]
pub(crate) use trace_noop as trace;
