//! implicit-deps-engine 内核错误定义
//! 只覆盖规则表加载/校验阶段，四个宿主入口本身不返回错误
use thiserror::Error;

use regex::Error as RegexError;

/// 内核核心错误枚举
#[derive(Error, Debug)]
pub enum CoreError {
    // ===================== 规则相关错误 =====================
    /// 规则表解析失败（JSON 结构错误）
    #[error("Rule table parse failed: {0}")]
    RuleParseError(#[from] serde_json::Error),

    /// 模块名非法（空串或含空分量）
    #[error("Invalid module name: {0:?}")]
    InvalidModuleName(String),

    /// 版本号非法（期望 "X.Y"）
    #[error("Invalid python version: {0:?}")]
    InvalidVersion(String),

    /// 同一规则文档内别名键重复
    #[error("Duplicate module alias: {0}")]
    DuplicateAlias(String),

    /// 补丁规则非幂等或为空
    #[error("Invalid source patch for module {module}: {reason}")]
    InvalidPatch { module: String, reason: String },

    /// 规则族没有任何匹配键
    #[error("Rule family #{0} has an empty match key")]
    EmptyMatchKey(usize),

    // ===================== 编译相关错误 =====================
    /// 正则表达式编译失败
    #[error("Regex compilation failed: {0}")]
    RegexCompileError(#[from] RegexError),
}

/// 内核层全局Result类型别名
pub type CoreResult<T> = Result<T, CoreError>;
