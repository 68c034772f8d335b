//! 全局错误类型定义
use implicit_deps_engine::CoreError;
use std::io::Error as IoError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImplicitDepsError {
    // 规则相关错误
    #[error("规则加载失败：{0}")]
    RuleLoadError(String),
    #[error("规则处理失败：{0}")]
    CoreError(#[from] CoreError),

    // 插件相关错误
    #[error("插件未初始化: {0}")]
    PluginNotInitialized(String),
    #[error("插件初始化失败: {0}")]
    PluginInitError(String),
    #[error("功能未启用: {0}")]
    FeatureDisabled(String),

    // 基础错误
    #[error("IO操作失败：{0}")]
    IoError(#[from] IoError),
}

// 全局Result类型
pub type IdResult<T> = Result<T, ImplicitDepsError>;
