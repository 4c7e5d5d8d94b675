//! 只读拓扑
//!
//! 构建完成后的节点与链路集合，交给仿真器或可视化组件消费。
//! 冻结后不再提供任何修改接口，可以在多个线程间无锁共享。

use std::collections::HashMap;

use super::id::{LinkId, NodeId, PortNo};
use super::link::{Endpoint, Link};
use super::node::{Host, Node, Switch, Tier};
use crate::topo::{Counts, TopoKind};

/// 某个节点的一个邻居
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbor {
    /// 本端端口
    pub port: PortNo,
    pub peer: NodeId,
    pub peer_port: PortNo,
    pub link: LinkId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopologyGraph {
    kind: TopoKind,
    param: usize,
    counts: Counts,
    core_links: bool,
    nodes: Vec<Node>,
    links: Vec<Link>,
    by_name: HashMap<String, NodeId>,
}

impl TopologyGraph {
    pub(crate) fn new(
        kind: TopoKind,
        param: usize,
        counts: Counts,
        core_links: bool,
        nodes: Vec<Node>,
        links: Vec<Link>,
    ) -> Self {
        let by_name = nodes
            .iter()
            .map(|n| (n.name().to_string(), n.id()))
            .collect();
        Self {
            kind,
            param,
            counts,
            core_links,
            nodes,
            links,
            by_name,
        }
    }

    pub fn kind(&self) -> TopoKind {
        self.kind
    }

    /// 构建参数（fat-tree 的 `k` 或 tree 的 `fan_out`）
    pub fn param(&self) -> usize {
        self.param
    }

    pub fn counts(&self) -> &Counts {
        &self.counts
    }

    /// 核心层与汇聚层之间是否已连线
    pub fn core_links_wired(&self) -> bool {
        self.core_links
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        self.by_name.get(name).and_then(|id| self.node(*id))
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.get(id.0)
    }

    /// 按创建顺序枚举某一层的交换机
    pub fn switches(&self, tier: Tier) -> impl Iterator<Item = &Switch> + '_ {
        self.nodes
            .iter()
            .filter_map(Node::as_switch)
            .filter(move |s| s.tier == tier)
    }

    pub fn switches_in_pod(&self, tier: Tier, pod: usize) -> impl Iterator<Item = &Switch> + '_ {
        self.switches(tier).filter(move |s| s.pod == Some(pod))
    }

    pub fn hosts(&self) -> impl Iterator<Item = &Host> + '_ {
        self.nodes.iter().filter_map(Node::as_host)
    }

    /// 节点的邻居列表（按本端端口排序）
    pub fn neighbors(&self, id: NodeId) -> Vec<Neighbor> {
        let Some(node) = self.node(id) else {
            return Vec::new();
        };
        node.ports()
            .iter()
            .filter_map(|(port, link_id)| {
                let link = self.link(*link_id)?;
                let (_, Endpoint { node: peer, port: peer_port }) = link.side_of(id)?;
                Some(Neighbor {
                    port: *port,
                    peer,
                    peer_port,
                    link: *link_id,
                })
            })
            .collect()
    }

    pub fn degree(&self, id: NodeId) -> usize {
        self.node(id).map(|n| n.ports().len()).unwrap_or(0)
    }
}
