pub mod dispatch;
pub mod library;
pub mod patch;

pub use dispatch::{ImplicitImports, ImportDispatch};
pub use library::{AliasMap, CompiledRuleTable, SuppressionSet};
pub use patch::{CompiledPatch, PatchSet};
