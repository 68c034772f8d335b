//! 全局插件单例管理
//! 核心职责：
//! 1. 维护进程生命周期内唯一的ImplicitImportsPlugin实例
//! 2. 支持按配置初始化、手动注入规则表、懒加载默认配置

use implicit_deps_engine::RuleTable;
use once_cell::sync::OnceCell;

use super::implicit_imports::ImplicitImportsPlugin;
use crate::error::{IdResult, ImplicitDepsError};
use crate::RuleConfig;

/// 全局插件实例 - 线程安全单例，只初始化一次
static GLOBAL_PLUGIN: OnceCell<ImplicitImportsPlugin> = OnceCell::new();

/// 初始化全局插件
/// 幂等：已初始化则直接返回Ok(())，新配置被忽略
pub fn init_global_plugin(config: RuleConfig) -> IdResult<()> {
    if GLOBAL_PLUGIN.get().is_some() {
        log::debug!("Global plugin already initialized, skip reinitialization");
        return Ok(());
    }

    GLOBAL_PLUGIN
        .get_or_try_init(|| {
            ImplicitImportsPlugin::new(config).map_err(|e| {
                ImplicitDepsError::PluginInitError(format!(
                    "Failed to create ImplicitImportsPlugin instance: {}",
                    e
                ))
            })
        })
        .map(|_| ())?;

    log::info!("Global ImplicitImportsPlugin initialized successfully");
    Ok(())
}

/// 手动注入规则表，初始化全局插件
pub fn init_global_plugin_with_table(table: &RuleTable, config: RuleConfig) -> IdResult<()> {
    if GLOBAL_PLUGIN.get().is_some() {
        log::debug!("Global plugin already initialized, skip reinitialization with custom rules");
        return Ok(());
    }

    GLOBAL_PLUGIN
        .get_or_try_init(|| {
            ImplicitImportsPlugin::with_table(table, config).map_err(|e| {
                ImplicitDepsError::PluginInitError(format!(
                    "Failed to create ImplicitImportsPlugin with custom rules: {}",
                    e
                ))
            })
        })
        .map(|_| ())?;

    log::info!("Global ImplicitImportsPlugin initialized with custom rule table");
    Ok(())
}

/// 获取全局插件实例（无自动初始化）
pub fn global_plugin() -> IdResult<&'static ImplicitImportsPlugin> {
    GLOBAL_PLUGIN.get().ok_or_else(|| {
        ImplicitDepsError::PluginNotInitialized(
            "call init_global_plugin before global_plugin".to_string(),
        )
    })
}

/// 获取全局插件实例，未初始化时使用默认配置懒加载
pub fn global_plugin_or_init() -> IdResult<&'static ImplicitImportsPlugin> {
    if GLOBAL_PLUGIN.get().is_none() {
        log::debug!("Lazy initializing global plugin with default config");
        init_global_plugin(RuleConfig::default())?;
    }
    global_plugin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ModuleResolutionPlugin;
    use implicit_deps_engine::PythonVersion;

    // 全局单例在整个测试进程共享，生命周期相关断言集中在一个用例里
    #[test]
    fn test_global_lifecycle() {
        let _ = env_logger::builder().is_test(true).try_init();
        let table = RuleTable::from_json_str(
            r#"{"implicit_imports": [
                {"pattern": {"kind": "full_name", "names": ["ctypes"]},
                 "imports": [{"kind": "module", "name": "_ctypes"}]}
            ]}"#,
        )
        .unwrap();
        let config = crate::CustomConfigBuilder::new()
            .python_version(PythonVersion::new(3, 8))
            .build();

        init_global_plugin_with_table(&table, config).unwrap();
        let plugin = global_plugin().unwrap();
        assert_eq!(plugin.python_version(), PythonVersion::new(3, 8));
        assert_eq!(plugin.implicit_imports("ctypes").count(), 1);

        // 二次初始化被忽略
        init_global_plugin(RuleConfig::local_file("/nonexistent.json")).unwrap();
        let again = global_plugin_or_init().unwrap();
        assert!(std::ptr::eq(plugin, again));
        assert_eq!(again.python_version(), PythonVersion::new(3, 8));
    }
}
