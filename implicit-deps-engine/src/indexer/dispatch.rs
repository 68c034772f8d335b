use rustc_hash::FxHashMap;

use crate::core::{split_top_and_child, MatchKey, ModuleName, Production, PythonVersion, RuleFamily};

/// 隐式导入调度索引
/// 顶层包名/完整模块名 → 规则族下标；多个候选时取下标最小者（声明靠前者优先）
#[derive(Debug, Clone, Default)]
pub struct ImportDispatch {
    families: Vec<RuleFamily>,
    by_top_level: FxHashMap<String, usize>,
    by_full_name: FxHashMap<String, usize>,
}

impl ImportDispatch {
    /// 按声明顺序建索引；同一键重复出现时保留最早的规则族
    pub fn build(families: &[RuleFamily]) -> Self {
        let mut dispatch = Self {
            families: families.to_vec(),
            ..Self::default()
        };

        for (idx, family) in families.iter().enumerate() {
            match &family.pattern {
                MatchKey::TopLevel { names } => {
                    for name in names {
                        dispatch.by_top_level.entry(name.clone()).or_insert(idx);
                    }
                }
                MatchKey::FullName { names } => {
                    for name in names {
                        dispatch
                            .by_full_name
                            .entry(name.as_str().to_string())
                            .or_insert(idx);
                    }
                }
            }
        }

        log::debug!(
            "Import dispatch built: families={}, top_level_keys={}, full_name_keys={}",
            dispatch.families.len(),
            dispatch.by_top_level.len(),
            dispatch.by_full_name.len()
        );

        dispatch
    }

    /// 找到对该模块生效的规则族（至多一个）
    pub fn lookup(&self, full_name: &str) -> Option<&RuleFamily> {
        let (top, _) = split_top_and_child(full_name);
        let by_top = self.by_top_level.get(top).copied();
        let by_full = self.by_full_name.get(full_name).copied();

        let idx = match (by_top, by_full) {
            (Some(a), Some(b)) => a.min(b),
            (a, b) => a.or(b)?,
        };
        self.families.get(idx)
    }

    /// 惰性产出隐式导入；无匹配时为空序列
    pub fn resolve<'a>(
        &'a self,
        full_name: &'a str,
        runtime: PythonVersion,
    ) -> ImplicitImports<'a> {
        match self.lookup(full_name) {
            Some(family) => {
                log::debug!(
                    "Implicit import rule hit | Module: {} | Productions: {}",
                    full_name,
                    family.imports.len()
                );
                ImplicitImports::new(&family.imports, full_name, runtime)
            }
            None => ImplicitImports::empty(),
        }
    }

    pub fn families(&self) -> &[RuleFamily] {
        &self.families
    }
}

/// 单次调度的惰性结果序列
/// 纯函数：同样的输入每次产出相同的序列
#[derive(Debug, Clone)]
pub struct ImplicitImports<'a> {
    productions: std::slice::Iter<'a, Production>,
    top: &'a str,
    child: Option<&'a str>,
    runtime: PythonVersion,
}

impl<'a> ImplicitImports<'a> {
    fn new(productions: &'a [Production], full_name: &'a str, runtime: PythonVersion) -> Self {
        let (top, child) = split_top_and_child(full_name);
        Self {
            productions: productions.iter(),
            top,
            child,
            runtime,
        }
    }

    pub fn empty() -> Self {
        Self {
            productions: <&[Production]>::default().iter(),
            top: "",
            child: None,
            runtime: PythonVersion::default(),
        }
    }
}

impl Iterator for ImplicitImports<'_> {
    type Item = ModuleName;

    fn next(&mut self) -> Option<Self::Item> {
        for production in self.productions.by_ref() {
            if let Some(module) = production.emit(self.top, self.child, self.runtime) {
                return Some(module);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.productions.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RuntimeCondition;

    fn module(name: &str) -> Production {
        Production::module(ModuleName::new(name).unwrap())
    }

    fn families() -> Vec<RuleFamily> {
        vec![
            RuleFamily {
                pattern: MatchKey::TopLevel {
                    names: vec!["PyQt4".into(), "PyQt5".into()],
                },
                imports: vec![
                    Production::Module {
                        name: ModuleName::new("atexit").unwrap(),
                        when: RuntimeCondition::below(PythonVersion::new(3, 0)),
                    },
                    module("sip"),
                    Production::Sibling {
                        child: "QtGui".into(),
                        sibling: "QtCore".into(),
                    },
                    Production::Sibling {
                        child: "QtWidgets".into(),
                        sibling: "QtGui".into(),
                    },
                ],
            },
            RuleFamily {
                pattern: MatchKey::FullName {
                    names: vec![ModuleName::new("lxml.etree").unwrap()],
                },
                imports: vec![module("gzip"), module("lxml._elementpath")],
            },
            // 与第一族冲突的完整名键，永远不会生效
            RuleFamily {
                pattern: MatchKey::FullName {
                    names: vec![ModuleName::new("PyQt5.QtGui").unwrap()],
                },
                imports: vec![module("shadowed")],
            },
        ]
    }

    fn collect(dispatch: &ImportDispatch, name: &str, runtime: PythonVersion) -> Vec<String> {
        dispatch.resolve(name, runtime).map(String::from).collect()
    }

    #[test]
    fn test_qt_chain() {
        let dispatch = ImportDispatch::build(&families());
        let py3 = PythonVersion::new(3, 12);
        let py2 = PythonVersion::new(2, 7);

        assert_eq!(collect(&dispatch, "PyQt5.QtWidgets", py3), vec!["sip", "PyQt5.QtGui"]);
        assert_eq!(
            collect(&dispatch, "PyQt5.QtWidgets", py2),
            vec!["atexit", "sip", "PyQt5.QtGui"]
        );
        assert_eq!(collect(&dispatch, "PyQt4.QtGui", py3), vec!["sip", "PyQt4.QtCore"]);
        assert_eq!(collect(&dispatch, "PyQt4", py3), vec!["sip"]);
        assert_eq!(collect(&dispatch, "PyQt4.QtCore", py3), vec!["sip"]);
    }

    #[test]
    fn test_first_family_wins() {
        let dispatch = ImportDispatch::build(&families());
        let out = collect(&dispatch, "PyQt5.QtGui", PythonVersion::new(3, 12));
        assert_eq!(out, vec!["sip", "PyQt5.QtCore"]);
    }

    #[test]
    fn test_full_name_and_miss() {
        let dispatch = ImportDispatch::build(&families());
        let py3 = PythonVersion::default();
        assert_eq!(collect(&dispatch, "lxml.etree", py3), vec!["gzip", "lxml._elementpath"]);
        assert!(collect(&dispatch, "lxml", py3).is_empty());
        assert!(collect(&dispatch, "lxml.etree.sub", py3).is_empty());
        assert!(collect(&dispatch, "", py3).is_empty());
        assert!(collect(&dispatch, "PyQt6.QtWidgets", py3).is_empty());
    }

    #[test]
    fn test_reiterate_is_stable() {
        let dispatch = ImportDispatch::build(&families());
        let runtime = PythonVersion::new(2, 7);
        let first = collect(&dispatch, "PyQt4.QtWidgets", runtime);
        let second = collect(&dispatch, "PyQt4.QtWidgets", runtime);
        assert_eq!(first, second);

        let iter = dispatch.resolve("PyQt4.QtWidgets", runtime);
        let cloned: Vec<_> = iter.clone().collect();
        assert_eq!(iter.collect::<Vec<_>>(), cloned);
    }
}
