use std::borrow::Cow;

use regex::Regex;
use rustc_hash::FxHashMap;

use crate::core::{PatchKind, PatchRule};
use crate::error::{CoreError, CoreResult};
use crate::utils::preview::preview_compact;

/// 编译后的单条补丁
#[derive(Debug, Clone)]
pub enum CompiledPatch {
    /// 精确子串替换
    Literal { find: String, replace: String },
    /// 正则替换（replace 支持 `$1` 形式的分组引用）
    Regex { regex: Regex, replace: String },
}

impl CompiledPatch {
    /// 编译并校验幂等性：替换结果与任意上下文拼接后不得再次命中查找条件
    pub fn compile(rule: &PatchRule) -> CoreResult<Self> {
        if rule.find.is_empty() {
            return Err(invalid_patch(rule, "empty search text".to_string()));
        }

        let compiled = match rule.kind {
            PatchKind::Literal => CompiledPatch::Literal {
                find: rule.find.clone(),
                replace: rule.replace.clone(),
            },
            PatchKind::Regex => CompiledPatch::Regex {
                regex: Regex::new(&rule.find)?,
                replace: rule.replace.clone(),
            },
        };

        if compiled.may_rematch(&rule.replace) {
            return Err(invalid_patch(
                rule,
                "replacement can recreate the search text".to_string(),
            ));
        }
        Ok(compiled)
    }

    /// 替换文本写回源码后，是否可能再次命中本补丁
    /// 正则只检查未展开的模板，漏网情况由 PatchSet::apply 的二次校验兜底
    pub fn may_rematch(&self, inserted: &str) -> bool {
        match self {
            CompiledPatch::Literal { find, .. } => literal_may_recreate(find, inserted),
            CompiledPatch::Regex { regex, .. } => regex.is_match(inserted),
        }
    }

    pub fn replacement(&self) -> &str {
        match self {
            CompiledPatch::Literal { replace, .. } => replace,
            CompiledPatch::Regex { replace, .. } => replace,
        }
    }

    /// 应用补丁；目标不存在时原样返回（不分配）
    pub fn apply<'a>(&self, source: Cow<'a, str>) -> Cow<'a, str> {
        match self {
            CompiledPatch::Literal { find, replace } => {
                if source.contains(find.as_str()) {
                    Cow::Owned(source.replace(find.as_str(), replace))
                } else {
                    source
                }
            }
            CompiledPatch::Regex { regex, replace } => {
                let replaced = match regex.replace_all(&source, replace.as_str()) {
                    Cow::Owned(text) => Some(text),
                    Cow::Borrowed(_) => None,
                };
                match replaced {
                    Some(text) => Cow::Owned(text),
                    None => source,
                }
            }
        }
    }

    pub fn describe(&self) -> String {
        match self {
            CompiledPatch::Literal { find, .. } => format!("literal: {}", find),
            CompiledPatch::Regex { regex, .. } => format!("regex: {}", regex.as_str()),
        }
    }
}

/// 模块名 → 有序补丁列表
#[derive(Debug, Clone, Default)]
pub struct PatchSet {
    by_module: FxHashMap<String, Vec<CompiledPatch>>,
}

impl PatchSet {
    pub fn build(rules: &[PatchRule]) -> CoreResult<Self> {
        let mut set = Self::default();
        for rule in rules {
            let compiled = CompiledPatch::compile(rule)?;
            let patches = set
                .by_module
                .entry(rule.module.as_str().to_string())
                .or_default();

            // 同一模块的补丁两两之间也不能互相触发，否则第二次应用会继续改写
            if let Some(other) = patches.iter().find(|p| {
                p.may_rematch(compiled.replacement()) || compiled.may_rematch(p.replacement())
            }) {
                return Err(invalid_patch(
                    rule,
                    format!("chains with another patch ({})", other.describe()),
                ));
            }
            patches.push(compiled);
        }
        Ok(set)
    }

    /// 对模块源码应用全部补丁
    /// 未命中的模块、目标子串已不存在的模块、以及二次应用结果仍会变化的模块，
    /// 都返回借用的原文
    pub fn apply<'a>(&self, module_name: &str, source: &'a str) -> Cow<'a, str> {
        let Some(patches) = self.by_module.get(module_name) else {
            return Cow::Borrowed(source);
        };

        match apply_all(patches, source) {
            Cow::Borrowed(_) => {
                log::debug!(
                    "Stale patch target, source left unchanged | Module: {} | Rules: {} | Source preview: {}",
                    module_name,
                    describe_all(patches),
                    preview_compact(source, 80)
                );
                Cow::Borrowed(source)
            }
            Cow::Owned(patched) => {
                if apply_all(patches, &patched) != patched.as_str() {
                    log::warn!(
                        "Patch is not idempotent, source left unchanged | Module: {} | Rules: {}",
                        module_name,
                        describe_all(patches)
                    );
                    return Cow::Borrowed(source);
                }
                Cow::Owned(patched)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.by_module.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_module.is_empty()
    }
}

fn invalid_patch(rule: &PatchRule, reason: String) -> CoreError {
    CoreError::InvalidPatch {
        module: rule.module.to_string(),
        reason,
    }
}

/// 字面量 find 能否由 inserted 与其前后文本拼出：
/// inserted 含 find；find 以 inserted 为真子串；或 find 的真后缀/真前缀与 inserted 首尾重叠
fn literal_may_recreate(find: &str, inserted: &str) -> bool {
    if inserted.contains(find) || (inserted.len() < find.len() && find.contains(inserted)) {
        return true;
    }
    (1..find.len())
        .filter(|&k| find.is_char_boundary(k))
        .any(|k| inserted.starts_with(&find[k..]) || inserted.ends_with(&find[..k]))
}

fn apply_all<'a>(patches: &[CompiledPatch], source: &'a str) -> Cow<'a, str> {
    patches
        .iter()
        .fold(Cow::Borrowed(source), |text, patch| patch.apply(text))
}

fn describe_all(patches: &[CompiledPatch]) -> String {
    patches
        .iter()
        .map(CompiledPatch::describe)
        .collect::<Vec<_>>()
        .join(", ")
}
