//! 节点类型
//!
//! 定义拓扑中的节点：按层级区分的交换机，以及挂在边缘交换机下的主机。

use std::collections::BTreeMap;
use std::fmt;
use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use super::hwid::{HwId, MacAddr};
use super::id::{LinkId, NodeId, PortNo};

/// 交换机层级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Core,
    Aggregation,
    Edge,
}

impl Tier {
    /// 写入硬件标识的层级编码
    pub(crate) fn code(self) -> u8 {
        match self {
            Tier::Core => 3,
            Tier::Aggregation => 2,
            Tier::Edge => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::Core => "core",
            Tier::Aggregation => "aggregation",
            Tier::Edge => "edge",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 节点类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Switch(Tier),
    Host,
}

/// 交换机节点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Switch {
    pub id: NodeId,
    pub name: String,
    pub tier: Tier,
    /// 所在 pod；核心交换机没有 pod
    pub pod: Option<usize>,
    /// 层内序号：核心交换机为全局序号，汇聚/边缘交换机为 pod 内序号
    pub index: usize,
    pub hw_id: HwId,
    pub ports: BTreeMap<PortNo, LinkId>,
}

/// 主机节点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    pub id: NodeId,
    pub name: String,
    pub pod: usize,
    /// 所属边缘交换机在 pod 内的序号
    pub edge: usize,
    /// 在边缘交换机下的序号
    pub index: usize,
    pub ip: Ipv4Addr,
    pub mac: MacAddr,
    pub ports: BTreeMap<PortNo, LinkId>,
}

impl Host {
    /// 主机唯一的上行链路
    pub fn uplink(&self) -> Option<LinkId> {
        self.ports.values().next().copied()
    }
}

/// 拓扑节点
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Switch(Switch),
    Host(Host),
}

impl Node {
    pub fn id(&self) -> NodeId {
        match self {
            Node::Switch(s) => s.id,
            Node::Host(h) => h.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Node::Switch(s) => &s.name,
            Node::Host(h) => &h.name,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Switch(s) => NodeKind::Switch(s.tier),
            Node::Host(_) => NodeKind::Host,
        }
    }

    pub fn pod(&self) -> Option<usize> {
        match self {
            Node::Switch(s) => s.pod,
            Node::Host(h) => Some(h.pod),
        }
    }

    pub fn ports(&self) -> &BTreeMap<PortNo, LinkId> {
        match self {
            Node::Switch(s) => &s.ports,
            Node::Host(h) => &h.ports,
        }
    }

    pub(crate) fn ports_mut(&mut self) -> &mut BTreeMap<PortNo, LinkId> {
        match self {
            Node::Switch(s) => &mut s.ports,
            Node::Host(h) => &mut h.ports,
        }
    }

    pub fn as_switch(&self) -> Option<&Switch> {
        match self {
            Node::Switch(s) => Some(s),
            Node::Host(_) => None,
        }
    }

    pub fn as_host(&self) -> Option<&Host> {
        match self {
            Node::Host(h) => Some(h),
            Node::Switch(_) => None,
        }
    }
}
