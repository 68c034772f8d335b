//! 隐式导入插件核心
//! 核心职责：
//! 1. 按配置装载规则表（内置/本地文件 + 用户叠加）
//! 2. 对宿主暴露四个只读入口

use std::borrow::Cow;
use std::sync::Arc;

use implicit_deps_engine::{
    AliasMap, CompiledRuleTable, ImplicitImports, PythonVersion, RuleProcessor, RuleTable,
};

use super::contract::{ModuleResolutionPlugin, SourceRef};
use crate::error::IdResult;
use crate::utils::log_format::preview_imports;
use crate::{RuleConfig, RuleLoader};

/// 隐式导入插件
/// - table: 编译后的规则表（Arc共享，内置表进程内只编译一次）
/// - config: 规则配置（目标运行时版本等）
#[derive(Debug, Clone)]
pub struct ImplicitImportsPlugin {
    table: Arc<CompiledRuleTable>,
    config: RuleConfig,
}

impl ImplicitImportsPlugin {
    pub const NAME: &'static str = "implicit-imports";

    /// 按配置创建插件
    pub fn new(config: RuleConfig) -> IdResult<Self> {
        #[cfg(feature = "embedded-rules")]
        if config.uses_embedded_only() {
            return Self::with_embedded_rules(config);
        }

        let compiled = RuleLoader::new().load_compiled(&config)?;
        Ok(Self::with_compiled(Arc::new(compiled), config))
    }

    /// 使用内置规则创建插件，复用进程内共享的编译表
    #[cfg(feature = "embedded-rules")]
    pub fn with_embedded_rules(config: RuleConfig) -> IdResult<Self> {
        let table = crate::implicit_rules::embedded_compiled_table()?;
        Ok(Self::with_compiled(table, config))
    }

    /// 使用内存中的规则表创建插件（校验 + 编译）
    pub fn with_table(table: &RuleTable, config: RuleConfig) -> IdResult<Self> {
        let compiled = RuleProcessor::default().compile(table)?;
        Ok(Self::with_compiled(Arc::new(compiled), config))
    }

    /// 使用已编译的规则表创建插件
    pub fn with_compiled(table: Arc<CompiledRuleTable>, config: RuleConfig) -> Self {
        log::info!(
            "ImplicitImportsPlugin ready: python={}, families={}, patches={}, aliases={}, suppressions={}",
            config.options.python_version,
            table.dispatch().families().len(),
            table.patches().len(),
            table.aliases().len(),
            table.suppressions().len()
        );
        Self { table, config }
    }

    pub fn python_version(&self) -> PythonVersion {
        self.config.options.python_version
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    pub fn table(&self) -> &Arc<CompiledRuleTable> {
        &self.table
    }
}

impl ModuleResolutionPlugin for ImplicitImportsPlugin {
    fn plugin_name(&self) -> &str {
        Self::NAME
    }

    fn implicit_imports<'a>(&'a self, full_name: &'a str) -> ImplicitImports<'a> {
        let imports = self.table.implicit_imports(full_name, self.python_version());
        if log::log_enabled!(log::Level::Trace) {
            log::trace!("Implicit imports of {}: {}", full_name, preview_imports(imports.clone()));
        }
        imports
    }

    fn on_module_source_code<'a>(&self, module_name: &str, source_code: &'a str) -> Cow<'a, str> {
        let patched = self.table.patch_source(module_name, source_code);
        if let Cow::Owned(_) = patched {
            log::debug!("Patched source of module {}", module_name);
        }
        patched
    }

    fn suppress_builtin_import_warning(&self, module_name: &str, source_ref: &SourceRef) -> bool {
        let suppressed = self.table.is_suppressed(module_name);
        if suppressed {
            log::debug!(
                "Suppressed unresolved import warning | Module: {} | At: {}",
                module_name,
                source_ref
            );
        }
        suppressed
    }

    fn module_aliases(&self) -> &AliasMap {
        self.table.aliases()
    }
}
