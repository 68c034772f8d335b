//! 插件契约：宿主编译器在各流水线阶段调用的四个入口
//! 默认实现即"什么都不做"的插件

use std::borrow::Cow;
use std::fmt::{Display, Formatter};

use implicit_deps_engine::{AliasMap, ImplicitImports};
use once_cell::sync::Lazy;

static EMPTY_ALIASES: Lazy<AliasMap> = Lazy::new(AliasMap::default);

/// 诊断位置引用（无法解析的导入出现在哪里）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceRef {
    pub filename: String,
    pub line: u32,
}

impl SourceRef {
    pub fn new(filename: impl Into<String>, line: u32) -> Self {
        Self {
            filename: filename.into(),
            line,
        }
    }
}

impl Display for SourceRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.filename, self.line)
    }
}

/// 模块解析插件
/// 四个入口都是全函数：无匹配时分别返回空序列 / 原文 / false / None
pub trait ModuleResolutionPlugin: Send + Sync {
    fn plugin_name(&self) -> &str;

    /// 静态导入图发现模块时调用，返回需要一并解析的模块
    fn implicit_imports<'a>(&'a self, _full_name: &'a str) -> ImplicitImports<'a> {
        ImplicitImports::empty()
    }

    /// 加载模块源码后、编译前调用；未修改时返回借用的原文
    fn on_module_source_code<'a>(&self, _module_name: &str, source_code: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(source_code)
    }

    /// 导入无法静态解析时调用，返回 true 表示不报告
    fn suppress_builtin_import_warning(&self, _module_name: &str, _source_ref: &SourceRef) -> bool {
        false
    }

    /// 别名表，由宿主直接读取
    fn module_aliases(&self) -> &AliasMap {
        &EMPTY_ALIASES
    }

    fn resolve_alias(&self, dotted_path: &str) -> Option<&str> {
        self.module_aliases().get(dotted_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BarePlugin;

    impl ModuleResolutionPlugin for BarePlugin {
        fn plugin_name(&self) -> &str {
            "bare"
        }
    }

    #[test]
    fn test_default_methods_are_neutral() {
        let plugin = BarePlugin;
        let source = "import os";
        let location = SourceRef::new("main.py", 3);

        assert_eq!(plugin.plugin_name(), "bare");
        assert_eq!(plugin.implicit_imports("PyQt5.QtWidgets").count(), 0);
        assert!(matches!(
            plugin.on_module_source_code("numexpr.cpuinfo", source),
            Cow::Borrowed(s) if std::ptr::eq(s, source)
        ));
        assert!(!plugin.suppress_builtin_import_warning("setuptools", &location));
        assert!(plugin.module_aliases().is_empty());
        assert_eq!(plugin.resolve_alias("requests.packages.urllib3"), None);
    }

    #[test]
    fn test_source_ref_display() {
        assert_eq!(SourceRef::new("pkg/mod.py", 42).to_string(), "pkg/mod.py:42");
    }

    #[test]
    fn test_trait_object() {
        let plugins: Vec<Box<dyn ModuleResolutionPlugin>> = vec![Box::new(BarePlugin)];
        assert_eq!(plugins[0].plugin_name(), "bare");
    }
}
