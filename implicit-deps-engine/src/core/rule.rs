use serde::{Deserialize, Serialize};

use super::module_name::ModuleName;
use super::version::{PythonVersion, RuntimeCondition};
use crate::error::CoreResult;

/// 规则表（原始数据形态），业务层统一标准结构
/// 进程内构建一次后只读
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleTable {
    /// 隐式导入规则族（按声明顺序，先匹配者生效）
    #[serde(default)]
    pub implicit_imports: Vec<RuleFamily>,
    /// 源码补丁（同一模块可有多条，按顺序应用）
    #[serde(default)]
    pub source_patches: Vec<PatchRule>,
    /// 历史导入路径 → 规范模块名
    #[serde(default)]
    pub module_aliases: Vec<AliasEntry>,
    /// 抑制 "无法解析导入" 告警的模块
    #[serde(default)]
    pub suppressed_warnings: Vec<ModuleName>,
}

impl RuleTable {
    pub fn from_json_str(content: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_json_slice(bytes: &[u8]) -> CoreResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn to_json_vec(&self) -> CoreResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn is_empty(&self) -> bool {
        self.implicit_imports.is_empty()
            && self.source_patches.is_empty()
            && self.module_aliases.is_empty()
            && self.suppressed_warnings.is_empty()
    }
}

/// 规则族：一个匹配键 + 一组有序产出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleFamily {
    pub pattern: MatchKey,
    #[serde(default)]
    pub imports: Vec<Production>,
}

/// 匹配键
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchKey {
    /// 顶层包名命中其一（如 PyQt4 / PyQt5）
    TopLevel { names: Vec<String> },
    /// 完整模块名命中其一（如 lxml.etree）
    FullName { names: Vec<ModuleName> },
}

impl MatchKey {
    pub fn key_count(&self) -> usize {
        match self {
            MatchKey::TopLevel { names } => names.len(),
            MatchKey::FullName { names } => names.len(),
        }
    }
}

/// 产出规则（tagged variant）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Production {
    /// 固定模块，可带运行时版本条件
    Module {
        name: ModuleName,
        #[serde(default, skip_serializing_if = "RuntimeCondition::is_always")]
        when: RuntimeCondition,
    },
    /// 第二分量等于 child 时产出同包兄弟子模块 `<top>.<sibling>`
    Sibling { child: String, sibling: String },
}

impl Production {
    pub fn module(name: ModuleName) -> Self {
        Production::Module {
            name,
            when: RuntimeCondition::default(),
        }
    }

    /// 对一次调度求值：命中返回要追加的模块
    #[inline]
    pub fn emit(
        &self,
        top: &str,
        child: Option<&str>,
        runtime: PythonVersion,
    ) -> Option<ModuleName> {
        match self {
            Production::Module { name, when } => when.holds(runtime).then(|| name.clone()),
            Production::Sibling {
                child: wanted,
                sibling,
            } => (child == Some(wanted.as_str())).then(|| ModuleName::join_unchecked(top, sibling)),
        }
    }
}

/// 补丁匹配方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchKind {
    #[default]
    Literal,
    Regex,
}

/// 源码补丁规则：模块名精确匹配时做 find → replace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchRule {
    pub module: ModuleName,
    pub find: String,
    pub replace: String,
    #[serde(default)]
    pub kind: PatchKind,
}

/// 别名条目（旧路径 → 规范模块名），键大小写敏感
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasEntry {
    pub from: ModuleName,
    pub to: ModuleName,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "implicit_imports": [
            {
                "pattern": {"kind": "top_level", "names": ["PyQt4", "PyQt5"]},
                "imports": [
                    {"kind": "module", "name": "atexit", "when": {"below": "3.0"}},
                    {"kind": "module", "name": "sip"},
                    {"kind": "sibling", "child": "QtGui", "sibling": "QtCore"}
                ]
            }
        ],
        "module_aliases": [{"from": "requests.packages.chardet", "to": "chardet"}]
    }"#;

    #[test]
    fn test_parse_table() {
        let table = RuleTable::from_json_str(SAMPLE).unwrap();
        assert_eq!(table.implicit_imports.len(), 1);
        assert_eq!(table.implicit_imports[0].pattern.key_count(), 2);
        assert_eq!(table.implicit_imports[0].imports.len(), 3);
        assert!(table.source_patches.is_empty());
        assert_eq!(table.module_aliases[0].to, "chardet");
        assert!(!table.is_empty());
        assert!(RuleTable::default().is_empty());
    }

    #[test]
    fn test_emit() {
        let py2 = PythonVersion::new(2, 7);
        let py3 = PythonVersion::new(3, 12);
        let atexit = Production::Module {
            name: ModuleName::new("atexit").unwrap(),
            when: RuntimeCondition::below(PythonVersion::new(3, 0)),
        };
        assert_eq!(atexit.emit("PyQt5", None, py2).unwrap(), "atexit");
        assert!(atexit.emit("PyQt5", None, py3).is_none());

        let sibling = Production::Sibling {
            child: "QtWidgets".into(),
            sibling: "QtGui".into(),
        };
        assert_eq!(sibling.emit("PyQt4", Some("QtWidgets"), py3).unwrap(), "PyQt4.QtGui");
        assert!(sibling.emit("PyQt4", Some("QtGui"), py3).is_none());
        assert!(sibling.emit("PyQt4", None, py3).is_none());
    }

    #[test]
    fn test_roundtrip_keeps_conditions_compact() {
        let table = RuleTable::from_json_str(SAMPLE).unwrap();
        let bytes = table.to_json_vec().unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(!text.contains("at_least"));
        assert_eq!(RuleTable::from_json_slice(&bytes).unwrap(), table);
    }
}
