//! implicit-deps 命令行：查询/校验隐式依赖规则表

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use implicit_deps::{
    CustomConfigBuilder, IdResult, ImplicitImportsPlugin, ModuleResolutionPlugin, PythonVersion,
    RuleLoader, RuleOrigin, RuleProcessor, SourceRef,
};

#[derive(Debug, Parser)]
#[command(name = "implicit-deps", version, about = "Query implicit import knowledge for Python modules")]
struct Cli {
    /// 替代内置规则的基础规则文件
    #[arg(long)]
    base: Option<PathBuf>,

    /// 叠加的用户规则文件（可多次指定）
    #[arg(long = "rules", value_name = "FILE")]
    rules: Vec<PathBuf>,

    /// 目标运行时版本（X.Y）
    #[arg(long, default_value_t = PythonVersion::default())]
    python: PythonVersion,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 打印模块的隐式导入，每行一个
    Imports { module: String },
    /// 打印补丁后的源码
    Patch { module: String, file: PathBuf },
    /// 打印别名对应的规范模块名
    Alias { path: String },
    /// 打印是否抑制该模块的无法解析告警
    Suppress { module: String },
    /// 校验规则文件并打印统计
    Check { file: PathBuf },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> IdResult<ExitCode> {
    let origin = match cli.base {
        Some(path) => RuleOrigin::LocalFile(path),
        None => RuleOrigin::Embedded,
    };
    let config = CustomConfigBuilder::new()
        .origin(origin)
        .python_version(cli.python)
        .extra_rule_files(cli.rules)
        .build();

    match cli.command {
        Command::Check { file } => {
            let table = RuleLoader::new().load_file(&file)?;
            let processor = RuleProcessor::default();
            processor.validate(&table)?;
            println!("{}: ok", file.display());
            println!("{:#?}", processor.stats(&table));
        }
        Command::Imports { module } => {
            let plugin = ImplicitImportsPlugin::new(config)?;
            for name in plugin.implicit_imports(&module) {
                println!("{}", name);
            }
        }
        Command::Patch { module, file } => {
            let plugin = ImplicitImportsPlugin::new(config)?;
            let source = fs::read_to_string(&file)?;
            print!("{}", plugin.on_module_source_code(&module, &source));
        }
        Command::Alias { path } => {
            let plugin = ImplicitImportsPlugin::new(config)?;
            match plugin.resolve_alias(&path) {
                Some(canonical) => println!("{}", canonical),
                None => return Ok(ExitCode::FAILURE),
            }
        }
        Command::Suppress { module } => {
            let plugin = ImplicitImportsPlugin::new(config)?;
            let location = SourceRef::new("<cli>", 0);
            println!("{}", plugin.suppress_builtin_import_warning(&module, &location));
        }
    }

    Ok(ExitCode::SUCCESS)
}
