mod module_name;
mod rule;
mod version;

// 导出常用项
pub use module_name::{split_top_and_child, ModuleName};
pub use rule::{AliasEntry, MatchKey, PatchKind, PatchRule, Production, RuleFamily, RuleTable};
pub use version::{PythonVersion, RuntimeCondition};
