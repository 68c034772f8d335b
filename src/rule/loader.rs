use std::fs;
use std::path::Path;

use implicit_deps_engine::{CompiledRuleTable, RuleProcessor, RuleTable};
use log::{debug, info};

use crate::error::{IdResult, ImplicitDepsError};
use crate::{RuleConfig, RuleOrigin};

/// 规则加载器：按配置取基础规则表，再按顺序叠加用户规则文件
#[derive(Default)]
pub struct RuleLoader {
    rule_processor: RuleProcessor,
}

impl RuleLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// 加载合并后的规则表（原始数据形态）
    pub fn load(&self, config: &RuleConfig) -> IdResult<RuleTable> {
        let base = self.load_from_source(&config.origin)?;

        config
            .options
            .extra_rule_files
            .iter()
            .try_fold(base, |merged, path| -> IdResult<RuleTable> {
                let overlay = self.load_file(path)?;
                // 每层单独校验，错误能定位到具体文件
                self.rule_processor.validate(&overlay).map_err(|e| {
                    ImplicitDepsError::RuleLoadError(format!("{}: {}", path.display(), e))
                })?;
                debug!("Merging user rule file: {}", path.display());
                Ok(self.rule_processor.merge(&merged, &overlay))
            })
    }

    /// 加载并编译
    pub fn load_compiled(&self, config: &RuleConfig) -> IdResult<CompiledRuleTable> {
        let table = self.load(config)?;
        let compiled = self.rule_processor.compile(&table)?;
        info!(
            "Rule table compiled: origin={:?}, extra_files={}",
            config.origin,
            config.options.extra_rule_files.len()
        );
        Ok(compiled)
    }

    /// 读取单个 JSON 规则文件
    pub fn load_file(&self, path: &Path) -> IdResult<RuleTable> {
        let bytes = fs::read(path).map_err(|e| {
            ImplicitDepsError::RuleLoadError(format!("本地路径[{}]读取失败: {}", path.display(), e))
        })?;
        RuleTable::from_json_slice(&bytes).map_err(|e| {
            ImplicitDepsError::RuleLoadError(format!("本地路径[{}]解析失败: {}", path.display(), e))
        })
    }

    fn load_from_source(&self, origin: &RuleOrigin) -> IdResult<RuleTable> {
        match origin {
            RuleOrigin::Embedded => {
                #[cfg(feature = "embedded-rules")]
                {
                    crate::implicit_rules::embedded_rule_table()
                }
                #[cfg(not(feature = "embedded-rules"))]
                {
                    Err(ImplicitDepsError::FeatureDisabled(
                        "embedded-rules feature is disabled, use RuleOrigin::LocalFile instead".to_string(),
                    ))
                }
            }
            RuleOrigin::LocalFile(path) => self.load_file(path),
        }
    }
}
