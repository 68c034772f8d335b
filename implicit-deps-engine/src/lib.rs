// 错误定义
pub mod error;
// 核心公共结构体+枚举（规则表数据模型）
pub mod core;
// 规则表编译+调度索引
pub mod indexer;
// 规则校验+合并+统计
pub mod processor;
// 日志辅助
pub mod utils;

// 顶层导出常用类型
pub use core::{
    AliasEntry, MatchKey, ModuleName, PatchKind, PatchRule, Production, PythonVersion, RuleFamily,
    RuleTable, RuntimeCondition,
};
pub use error::{CoreError, CoreResult};
pub use indexer::{AliasMap, CompiledPatch, CompiledRuleTable, ImplicitImports, SuppressionSet};
pub use processor::{RuleProcessor, TableStats};
pub use utils::preview;
