//! implicit-deps - 静态导入分析的隐式依赖知识库插件
//!
//! 为提前编译器补充静态分析看不到的运行时依赖：
//! 隐式导入、源码补丁、历史别名、导入告警抑制。

pub mod config;
pub mod error;
pub mod plugin;
pub mod rule;
pub mod utils;

// 导出全局错误类型
pub use self::error::{IdResult, ImplicitDepsError};

// 导出配置模块核心结构体与构建器
pub use crate::config::rule::{CustomConfigBuilder, RuleConfig, RuleOptions, RuleOrigin};

// 导出规则加载接口
pub use crate::rule::RuleLoader;

// 导出插件契约与实现
pub use crate::plugin::{
    global_plugin, global_plugin_or_init, init_global_plugin, init_global_plugin_with_table,
    ImplicitImportsPlugin, ModuleResolutionPlugin, SourceRef,
};

// 导出内核常用类型
pub use implicit_deps_engine::{
    AliasMap, CompiledRuleTable, ImplicitImports, ModuleName, PythonVersion, RuleProcessor,
    RuleTable, TableStats,
};

// 嵌入式固化规则表 - 仅在开启embedded-rules特性时编译
#[cfg(feature = "embedded-rules")]
pub mod implicit_rules {
    use super::*;
    use once_cell::sync::OnceCell;
    use std::sync::Arc;

    // 文件名由build_config.json配置，build.rs注入环境变量
    static EMBEDDED_RULES_JSON: &[u8] =
        include_bytes!(concat!(env!("OUT_DIR"), "/", env!("COMPILED_RULES_FILENAME")));

    static EMBEDDED_COMPILED_TABLE: OnceCell<Arc<CompiledRuleTable>> = OnceCell::new();

    /// 内置规则表（原始数据形态），每次调用重新解析
    pub fn embedded_rule_table() -> IdResult<RuleTable> {
        RuleTable::from_json_slice(EMBEDDED_RULES_JSON).map_err(|e| {
            ImplicitDepsError::RuleLoadError(format!(
                "内置规则表反序列化失败: {}, 字节长度: {}",
                e,
                EMBEDDED_RULES_JSON.len()
            ))
        })
    }

    /// 编译后的内置规则表 - 首次访问时编译，进程内仅一份实例
    pub fn embedded_compiled_table() -> IdResult<Arc<CompiledRuleTable>> {
        EMBEDDED_COMPILED_TABLE
            .get_or_try_init(|| -> IdResult<Arc<CompiledRuleTable>> {
                let table = embedded_rule_table()?;
                let compiled = RuleProcessor::default().compile(&table)?;
                Ok(Arc::new(compiled))
            })
            .cloned()
    }
}
