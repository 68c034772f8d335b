//! 全局规则配置管理

use std::path::PathBuf;

use implicit_deps_engine::PythonVersion;

/// 规则来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOrigin {
    Embedded,           // 内置规则（编译期 embed）
    LocalFile(PathBuf), // 本地文件规则（运行时，替代内置规则）
}

/// 核心规则选项
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleOptions {
    /// 目标运行时版本，决定带版本条件的隐式导入是否产出
    pub python_version: PythonVersion,
    /// 叠加在基础规则之后的用户规则文件（按顺序合并）
    pub extra_rule_files: Vec<PathBuf>,
}

/// 完整规则配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleConfig {
    pub origin: RuleOrigin,
    pub options: RuleOptions,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            origin: RuleOrigin::Embedded,
            options: RuleOptions::default(),
        }
    }
}

impl RuleConfig {
    /// 内置规则
    pub fn embedded() -> Self {
        Self::default()
    }

    /// 本地规则文件
    pub fn local_file(path: impl Into<PathBuf>) -> Self {
        Self {
            origin: RuleOrigin::LocalFile(path.into()),
            options: RuleOptions::default(),
        }
    }

    /// 是否可直接复用进程内共享的内置编译表
    pub fn uses_embedded_only(&self) -> bool {
        self.origin == RuleOrigin::Embedded && self.options.extra_rule_files.is_empty()
    }
}

/// 自定义构建器（链式 API）
#[derive(Debug, Clone, Default)]
pub struct CustomConfigBuilder {
    config: RuleConfig,
}

impl CustomConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn origin(mut self, origin: RuleOrigin) -> Self {
        self.config.origin = origin;
        self
    }

    pub fn python_version(mut self, version: PythonVersion) -> Self {
        self.config.options.python_version = version;
        self
    }

    /// 追加一个用户规则文件
    pub fn extra_rule_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.options.extra_rule_files.push(path.into());
        self
    }

    pub fn extra_rule_files<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.config
            .options
            .extra_rule_files
            .extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> RuleConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RuleConfig::default();
        assert_eq!(config.origin, RuleOrigin::Embedded);
        assert_eq!(config.options.python_version, PythonVersion::default());
        assert!(config.uses_embedded_only());
        assert_eq!(RuleConfig::embedded(), config);
    }

    #[test]
    fn test_builder() {
        let config = CustomConfigBuilder::new()
            .origin(RuleOrigin::LocalFile(PathBuf::from("rules/base.json")))
            .python_version(PythonVersion::new(2, 7))
            .extra_rule_file("rules/a.json")
            .extra_rule_files(["rules/b.json", "rules/c.json"])
            .build();

        assert_eq!(config.origin, RuleOrigin::LocalFile("rules/base.json".into()));
        assert_eq!(config.options.python_version, PythonVersion::new(2, 7));
        assert_eq!(config.options.extra_rule_files.len(), 3);
        assert_eq!(config.options.extra_rule_files[2], PathBuf::from("rules/c.json"));
        assert!(!config.uses_embedded_only());
    }

    #[test]
    fn test_embedded_with_overlay_is_not_shared() {
        let config = CustomConfigBuilder::new().extra_rule_file("user.json").build();
        assert_eq!(config.origin, RuleOrigin::Embedded);
        assert!(!config.uses_embedded_only());
        assert!(!RuleConfig::local_file("x.json").uses_embedded_only());
    }
}
