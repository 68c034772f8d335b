//! 把 log 记录转发给 tracing（宿主使用 tracing 订阅器时开启 `tracing` feature）

use crate::error::{IdResult, ImplicitDepsError};

/// 安装 LogTracer；重复安装返回错误
pub fn init_log_tracer() -> IdResult<()> {
    tracing_log::LogTracer::init().map_err(|e| {
        ImplicitDepsError::PluginInitError(format!("LogTracer install failed: {}", e))
    })?;
    tracing::debug!("log records are now forwarded to tracing");
    Ok(())
}
