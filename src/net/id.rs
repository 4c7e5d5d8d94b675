//! 标识符类型
//!
//! 定义节点、链路和端口的标识符。

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::TopoError;

/// 节点标识符（在拓扑内按创建顺序分配）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// 链路标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkId(pub usize);

/// 端口号（每个节点内唯一）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortNo(pub u16);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl fmt::Display for PortNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<usize> for PortNo {
    type Error = TopoError;

    fn try_from(v: usize) -> Result<Self, Self::Error> {
        u16::try_from(v)
            .map(PortNo)
            .map_err(|_| TopoError::invalid_param("port", format!("{v} exceeds {}", u16::MAX)))
    }
}
