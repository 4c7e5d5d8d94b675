//! 仿真器接口
//!
//! 拓扑只通过两个操作交给外部仿真器：创建节点、创建链路。
//! [`export`] 按固定顺序把只读拓扑逐个交给实现了 [`EmulatorDriver`] 的驱动。

mod json;
mod mininet;
mod recorder;

pub use json::{JsonDriver, LinkDoc, NodeDoc, TopologyDoc};
pub use mininet::MininetDriver;
pub use recorder::{EmuCall, RecordingDriver};

use std::net::Ipv4Addr;

use tracing::debug;

use crate::net::{LinkOpts, Node, NodeKind, PortNo, Tier, TopologyGraph};

/// 节点属性
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeAttrs {
    pub pod: Option<usize>,
    /// 交换机 dpid（16 位十六进制）
    pub dpid: Option<String>,
    pub ip: Option<Ipv4Addr>,
    pub mac: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NodeSpec<'a> {
    pub name: &'a str,
    pub kind: NodeKind,
    pub attrs: NodeAttrs,
}

#[derive(Debug, Clone)]
pub struct LinkSpec<'a> {
    pub node_a: &'a str,
    pub port_a: PortNo,
    pub node_b: &'a str,
    pub port_b: PortNo,
    pub opts: &'a LinkOpts,
}

/// 外部仿真器驱动
pub trait EmulatorDriver {
    type Error;

    fn create_node(&mut self, spec: &NodeSpec<'_>) -> Result<(), Self::Error>;

    fn create_link(&mut self, spec: &LinkSpec<'_>) -> Result<(), Self::Error>;
}

impl<'a> NodeSpec<'a> {
    pub fn from_node(node: &'a Node) -> Self {
        let attrs = match node {
            Node::Switch(s) => NodeAttrs {
                pod: s.pod,
                dpid: Some(s.hw_id.dpid()),
                ..NodeAttrs::default()
            },
            Node::Host(h) => NodeAttrs {
                pod: Some(h.pod),
                ip: Some(h.ip),
                mac: Some(h.mac.to_string()),
                ..NodeAttrs::default()
            },
        };
        Self {
            name: node.name(),
            kind: node.kind(),
            attrs,
        }
    }
}

/// 导出顺序：核心、汇聚、边缘交换机，然后是主机，最后按创建顺序导出链路
fn export_order(graph: &TopologyGraph) -> Vec<&Node> {
    let rank = |n: &&Node| match n.kind() {
        NodeKind::Switch(Tier::Core) => 0,
        NodeKind::Switch(Tier::Aggregation) => 1,
        NodeKind::Switch(Tier::Edge) => 2,
        NodeKind::Host => 3,
    };
    let mut nodes: Vec<&Node> = graph.nodes().iter().collect();
    // 稳定排序，同层内保持创建顺序
    nodes.sort_by_key(rank);
    nodes
}

/// 把拓扑交给仿真器驱动
pub fn export<D: EmulatorDriver>(graph: &TopologyGraph, driver: &mut D) -> Result<(), D::Error> {
    for node in export_order(graph) {
        driver.create_node(&NodeSpec::from_node(node))?;
    }
    for link in graph.links() {
        // 冻结前 connect 已校验过两端节点，索引必然有效
        let a = &graph.nodes()[link.a.node.0];
        let b = &graph.nodes()[link.b.node.0];
        driver.create_link(&LinkSpec {
            node_a: a.name(),
            port_a: link.a.port,
            node_b: b.name(),
            port_b: link.b.port,
            opts: &link.opts,
        })?;
    }
    debug!(
        nodes = graph.nodes().len(),
        links = graph.links().len(),
        "拓扑已导出到仿真器驱动"
    );
    Ok(())
}
