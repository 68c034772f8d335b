use std::borrow::Cow;

use rustc_hash::{FxHashMap, FxHashSet};

use super::dispatch::{ImplicitImports, ImportDispatch};
use super::patch::PatchSet;
use crate::core::{AliasEntry, ModuleName, PythonVersion, RuleTable};
use crate::error::{CoreError, CoreResult};

/// 别名表：旧导入路径 → 规范模块名（精确、大小写敏感）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasMap {
    entries: FxHashMap<String, String>,
}

impl AliasMap {
    /// 构建别名表，同一文档内键重复视为错误
    pub fn build(entries: &[AliasEntry]) -> CoreResult<Self> {
        let mut map = Self::default();
        for entry in entries {
            let previous = map
                .entries
                .insert(entry.from.to_string(), entry.to.to_string());
            if previous.is_some() {
                return Err(CoreError::DuplicateAlias(entry.from.to_string()));
            }
        }
        Ok(map)
    }

    #[inline]
    pub fn get(&self, dotted_path: &str) -> Option<&str> {
        self.entries.get(dotted_path).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 告警抑制集合（精确匹配，不做前缀/子串判断）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuppressionSet {
    modules: FxHashSet<String>,
}

impl SuppressionSet {
    pub fn build(modules: &[ModuleName]) -> Self {
        Self {
            modules: modules.iter().map(ModuleName::to_string).collect(),
        }
    }

    #[inline]
    pub fn contains(&self, module_name: &str) -> bool {
        self.modules.contains(module_name)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// 编译后规则表：四类能力的只读运行时形态
#[derive(Debug, Clone, Default)]
pub struct CompiledRuleTable {
    dispatch: ImportDispatch,
    patches: PatchSet,
    aliases: AliasMap,
    suppressions: SuppressionSet,
}

impl CompiledRuleTable {
    /// 直接编译（不做额外校验，校验见 RuleProcessor::compile）
    pub fn from_rule_table(table: &RuleTable) -> CoreResult<Self> {
        Ok(Self {
            dispatch: ImportDispatch::build(&table.implicit_imports),
            patches: PatchSet::build(&table.source_patches)?,
            aliases: AliasMap::build(&table.module_aliases)?,
            suppressions: SuppressionSet::build(&table.suppressed_warnings),
        })
    }

    #[inline]
    pub fn implicit_imports<'a>(
        &'a self,
        full_name: &'a str,
        runtime: PythonVersion,
    ) -> ImplicitImports<'a> {
        self.dispatch.resolve(full_name, runtime)
    }

    #[inline]
    pub fn patch_source<'a>(&self, module_name: &str, source: &'a str) -> Cow<'a, str> {
        self.patches.apply(module_name, source)
    }

    #[inline]
    pub fn resolve_alias(&self, dotted_path: &str) -> Option<&str> {
        self.aliases.get(dotted_path)
    }

    #[inline]
    pub fn is_suppressed(&self, module_name: &str) -> bool {
        self.suppressions.contains(module_name)
    }

    pub fn dispatch(&self) -> &ImportDispatch {
        &self.dispatch
    }

    pub fn patches(&self) -> &PatchSet {
        &self.patches
    }

    pub fn aliases(&self) -> &AliasMap {
        &self.aliases
    }

    pub fn suppressions(&self) -> &SuppressionSet {
        &self.suppressions
    }
}
