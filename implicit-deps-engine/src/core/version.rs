use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// 目标 Python 运行时版本（major.minor）
/// 字段顺序即比较顺序：先 major 后 minor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PythonVersion {
    pub major: u8,
    pub minor: u8,
}

impl PythonVersion {
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// 解析 "3" / "3.11" / "2.7.18"（补丁号忽略）
    pub fn parse(text: &str) -> CoreResult<Self> {
        let invalid = || CoreError::InvalidVersion(text.to_string());
        let mut parts = text.trim().split('.');

        let major = parts
            .next()
            .and_then(|p| p.parse::<u8>().ok())
            .ok_or_else(invalid)?;
        let minor = match parts.next() {
            Some(p) => p.parse::<u8>().map_err(|_| invalid())?,
            None => 0,
        };
        if let Some(micro) = parts.next() {
            micro.parse::<u8>().map_err(|_| invalid())?;
        }
        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self { major, minor })
    }
}

impl Default for PythonVersion {
    fn default() -> Self {
        Self::new(3, 12)
    }
}

impl Display for PythonVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for PythonVersion {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PythonVersion {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PythonVersion> for String {
    fn from(version: PythonVersion) -> Self {
        version.to_string()
    }
}

/// 运行时版本条件：`at_least <= v < below`，两端均可省略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RuntimeCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub below: Option<PythonVersion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at_least: Option<PythonVersion>,
}

impl RuntimeCondition {
    /// 仅在低于指定版本的运行时生效
    pub fn below(version: PythonVersion) -> Self {
        Self {
            below: Some(version),
            at_least: None,
        }
    }

    pub fn is_always(&self) -> bool {
        self.below.is_none() && self.at_least.is_none()
    }

    #[inline]
    pub fn holds(&self, runtime: PythonVersion) -> bool {
        self.below.map_or(true, |b| runtime < b) && self.at_least.map_or(true, |a| runtime >= a)
    }
}
