// build.rs
// 1. 读取JSON格式构建配置
// 2. 读取隐式导入规则文件并用内核校验
// 3. 规范化后写入 OUT_DIR，供 lib.rs 通过 include_bytes! 固化
use implicit_deps_engine::{RuleProcessor, RuleTable};
use serde::Deserialize;
use std::error::Error;
use std::{fs, path::Path};

/// 构建期配置结构体
#[derive(Debug, Deserialize)]
struct BuildConfig {
    /// 原始规则文件路径
    raw_rules_json_path: String,
    /// 规范化后产物文件名
    compiled_rules_output_name: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    // 未开启嵌入式规则feature时不执行构建逻辑
    if std::env::var("CARGO_FEATURE_EMBEDDED_RULES").is_err() {
        return Ok(());
    }

    println!("cargo:rerun-if-changed=build_config.json");
    println!("cargo:rerun-if-changed=build.rs");

    let config_path = Path::new("build_config.json");
    let config_content = fs::read_to_string(config_path)
        .map_err(|e| format!("读取构建配置文件失败: {} - {}", config_path.display(), e))?;
    let cfg = serde_json::from_str::<BuildConfig>(&config_content)
        .map_err(|e| format!("解析build_config.json失败: {}", e))?;

    println!("cargo:rerun-if-changed={}", cfg.raw_rules_json_path);

    let json_path = Path::new(&cfg.raw_rules_json_path);
    let json_content = fs::read_to_string(json_path)
        .map_err(|e| format!("读取规则文件失败: {} - {}", json_path.display(), e))?;

    let table = RuleTable::from_json_str(&json_content)
        .map_err(|e| format!("解析JSON规则失败: {}", e))?;

    // 校验失败直接中止构建，运行期不会再遇到非法内置规则
    RuleProcessor::default()
        .validate(&table)
        .map_err(|e| format!("规则校验失败: {}", e))?;

    let normalized = table
        .to_json_vec()
        .map_err(|e| format!("JSON序列化规则表失败: {}", e))?;

    let out_dir = std::env::var("OUT_DIR")?;
    let out_path = Path::new(&out_dir).join(&cfg.compiled_rules_output_name);
    fs::write(&out_path, &normalized)
        .map_err(|e| format!("写入规则产物失败: {} - {}", out_path.display(), e))?;

    println!(
        "cargo:rustc-env=COMPILED_RULES_FILENAME={}",
        cfg.compiled_rules_output_name
    );

    Ok(())
}
