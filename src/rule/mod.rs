//! 规则加载模块

pub mod loader;

pub use loader::RuleLoader;
