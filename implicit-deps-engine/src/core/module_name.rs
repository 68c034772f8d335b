use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::error::{CoreError, CoreResult};

/// 完全限定模块名（点分路径，如 `PyQt5.QtWidgets`）
/// 不变量：非空，且每个分量非空；第一个分量即顶层包名
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModuleName(String);

impl ModuleName {
    /// 校验并构造模块名
    pub fn new(name: impl Into<String>) -> CoreResult<Self> {
        let name = name.into();
        if name.is_empty() || name.split('.').any(str::is_empty) {
            return Err(CoreError::InvalidModuleName(name));
        }
        Ok(Self(name))
    }

    /// 拼接 `<parent>.<child>`，调用方保证两段都是合法分量
    pub(crate) fn join_unchecked(parent: &str, child: &str) -> Self {
        Self(format!("{}.{}", parent, child))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 按点拆分后的各分量
    pub fn components(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.split('.')
    }

    /// 顶层包名（调度主键）
    pub fn top_level(&self) -> &str {
        split_top_and_child(&self.0).0
    }

    /// 第二个分量（子模块名），单分量模块返回 None
    pub fn child(&self) -> Option<&str> {
        split_top_and_child(&self.0).1
    }
}

/// 拆出前两个分量：`a.b.c` → (`a`, Some(`b`))
/// 宿主传入的原始字符串不做合法性校验，空串得到 ("", None)
#[inline]
pub fn split_top_and_child(name: &str) -> (&str, Option<&str>) {
    let mut parts = name.split('.');
    let top = parts.next().unwrap_or_default();
    (top, parts.next())
}

impl Display for ModuleName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ModuleName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ModuleName {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ModuleName {
    type Error = CoreError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ModuleName> for String {
    fn from(name: ModuleName) -> Self {
        name.0
    }
}

impl PartialEq<str> for ModuleName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ModuleName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_components() {
        let name = ModuleName::new("PyQt5.QtWidgets.QWidget").unwrap();
        assert_eq!(name.top_level(), "PyQt5");
        assert_eq!(name.child(), Some("QtWidgets"));
        assert_eq!(name.components().count(), 3);

        let single = ModuleName::new("ctypes").unwrap();
        assert_eq!(single.top_level(), "ctypes");
        assert_eq!(single.child(), None);
    }

    #[test]
    fn test_rejects_empty_components() {
        for bad in ["", ".", "a..b", ".a", "a."] {
            assert!(ModuleName::new(bad).is_err(), "{:?} should be rejected", bad);
        }
    }

    #[test]
    fn test_serde_validates() {
        let ok: ModuleName = serde_json::from_str("\"lxml.etree\"").unwrap();
        assert_eq!(ok, "lxml.etree");
        assert!(serde_json::from_str::<ModuleName>("\"lxml..etree\"").is_err());
    }

    #[test]
    fn test_split_raw() {
        assert_eq!(split_top_and_child(""), ("", None));
        assert_eq!(split_top_and_child("gi._gi"), ("gi", Some("_gi")));
    }
}
