use rustc_hash::FxHashSet;

use crate::core::{MatchKey, Production, RuleTable};
use crate::error::{CoreError, CoreResult};
use crate::indexer::{AliasMap, CompiledRuleTable, PatchSet};

/// 规则表统计信息
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TableStats {
    /// 规则族数量
    pub families: usize,
    /// 匹配键总数
    pub match_keys: usize,
    /// 产出规则总数
    pub productions: usize,
    /// 带运行时条件的产出数
    pub conditional_productions: usize,
    /// 补丁条数
    pub patches: usize,
    /// 别名条数
    pub aliases: usize,
    /// 告警抑制条数
    pub suppressions: usize,
}

impl TableStats {
    pub fn log_summary(&self) {
        log::debug!(
            "Rule table: families={}, keys={}, productions={} (conditional={}), patches={}, aliases={}, suppressions={}",
            self.families,
            self.match_keys,
            self.productions,
            self.conditional_productions,
            self.patches,
            self.aliases,
            self.suppressions
        );
    }
}

/// 规则处理器，核心职责：校验 + 合并 + 编译 + 统计
#[derive(Default)]
pub struct RuleProcessor;

impl RuleProcessor {
    /// 校验规则表，任何非法项都在加载阶段报错
    pub fn validate(&self, table: &RuleTable) -> CoreResult<()> {
        for (idx, family) in table.implicit_imports.iter().enumerate() {
            if family.pattern.key_count() == 0 {
                return Err(CoreError::EmptyMatchKey(idx));
            }
            if let MatchKey::TopLevel { names } = &family.pattern {
                for name in names {
                    check_component(name)?;
                }
            }
            for production in &family.imports {
                if let Production::Sibling { child, sibling } = production {
                    check_component(child)?;
                    check_component(sibling)?;
                }
            }
        }

        PatchSet::build(&table.source_patches)?;

        AliasMap::build(&table.module_aliases)?;

        Ok(())
    }

    /// 叠加规则表：overlay 的规则族/补丁追加在 base 之后，别名按键覆盖，抑制项去重合并
    pub fn merge(&self, base: &RuleTable, overlay: &RuleTable) -> RuleTable {
        let mut merged = base.clone();

        merged
            .implicit_imports
            .extend(overlay.implicit_imports.iter().cloned());
        merged
            .source_patches
            .extend(overlay.source_patches.iter().cloned());

        for entry in &overlay.module_aliases {
            match merged
                .module_aliases
                .iter_mut()
                .find(|existing| existing.from == entry.from)
            {
                Some(existing) => {
                    if existing.to != entry.to {
                        log::warn!(
                            "Module alias overridden: {} ({} -> {})",
                            entry.from,
                            existing.to,
                            entry.to
                        );
                    }
                    existing.to = entry.to.clone();
                }
                None => merged.module_aliases.push(entry.clone()),
            }
        }

        let mut seen: FxHashSet<_> = merged.suppressed_warnings.iter().cloned().collect();
        for module in &overlay.suppressed_warnings {
            if seen.insert(module.clone()) {
                merged.suppressed_warnings.push(module.clone());
            }
        }

        merged
    }

    /// 校验 + 编译 + 统计日志
    pub fn compile(&self, table: &RuleTable) -> CoreResult<CompiledRuleTable> {
        self.validate(table)?;
        let compiled = CompiledRuleTable::from_rule_table(table)?;
        self.stats(table).log_summary();
        Ok(compiled)
    }

    pub fn stats(&self, table: &RuleTable) -> TableStats {
        let productions = table.implicit_imports.iter().flat_map(|f| f.imports.iter());
        let conditional_productions = productions
            .clone()
            .filter(|p| matches!(p, Production::Module { when, .. } if !when.is_always()))
            .count();

        TableStats {
            families: table.implicit_imports.len(),
            match_keys: table
                .implicit_imports
                .iter()
                .map(|f| f.pattern.key_count())
                .sum(),
            productions: productions.count(),
            conditional_productions,
            patches: table.source_patches.len(),
            aliases: table.module_aliases.len(),
            suppressions: table.suppressed_warnings.len(),
        }
    }
}

/// 单个名字分量：非空且不含点
fn check_component(name: &str) -> CoreResult<()> {
    if name.is_empty() || name.contains('.') {
        return Err(CoreError::InvalidModuleName(name.to_string()));
    }
    Ok(())
}
