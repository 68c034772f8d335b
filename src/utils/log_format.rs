use implicit_deps_engine::preview::compress_module_list;
use implicit_deps_engine::ModuleName;

/// 隐式导入序列日志格式化：[a, b, ...] (total: N)
pub fn preview_imports<I>(imports: I) -> String
where
    I: IntoIterator<Item = ModuleName>,
{
    let modules: Vec<ModuleName> = imports.into_iter().collect();
    compress_module_list(&modules)
}
