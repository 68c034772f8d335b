//! 宿主编译器调用的插件层

pub mod contract;
pub mod global;
pub mod implicit_imports;

pub use contract::{ModuleResolutionPlugin, SourceRef};
pub use global::{
    global_plugin, global_plugin_or_init, init_global_plugin, init_global_plugin_with_table,
};
pub use implicit_imports::ImplicitImportsPlugin;
