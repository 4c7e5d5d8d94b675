//! 构建上下文
//!
//! 拓扑构建期间独占的可变状态：节点表、名字/硬件标识命名空间、
//! 已占用的 (节点, 端口) 以及已连接的节点对。构建完成后通过
//! [`BuildCtx::freeze`] 转成只读的 [`TopologyGraph`]。

use std::collections::{BTreeMap, HashMap, HashSet};
use std::net::Ipv4Addr;

use tracing::trace;

use super::error::TopoError;
use super::graph::TopologyGraph;
use super::hwid::{HwId, MacAddr};
use super::id::{LinkId, NodeId, PortNo};
use super::link::{Endpoint, Link, LinkOpts};
use super::node::{Host, Node, Switch, Tier};
use crate::topo::{Counts, TopoKind};

#[derive(Debug)]
pub struct BuildCtx {
    kind: TopoKind,
    param: usize,
    counts: Counts,
    nodes: Vec<Node>,
    links: Vec<Link>,
    names: HashMap<String, NodeId>,
    hw_ids: HashSet<HwId>,
    addrs: HashSet<Ipv4Addr>,
    pairs: HashSet<(NodeId, NodeId)>,
    wired: bool,
    core_links: bool,
}

impl BuildCtx {
    pub fn new(kind: TopoKind, param: usize, counts: Counts) -> Self {
        Self {
            kind,
            param,
            counts,
            nodes: Vec::with_capacity(counts.node_count()),
            links: Vec::with_capacity(counts.link_count()),
            names: HashMap::new(),
            hw_ids: HashSet::new(),
            addrs: HashSet::new(),
            pairs: HashSet::new(),
            wired: false,
            core_links: false,
        }
    }

    pub fn counts(&self) -> &Counts {
        &self.counts
    }

    pub fn is_wired(&self) -> bool {
        self.wired
    }

    /// 标记交换机之间的链路已经布好
    pub(crate) fn mark_wired(&mut self, core_links: bool) {
        self.wired = true;
        self.core_links = core_links;
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    fn claim_name(&mut self, name: &str) -> Result<NodeId, TopoError> {
        if self.names.contains_key(name) {
            return Err(TopoError::DuplicateIdentifier {
                ident: name.to_string(),
            });
        }
        let id = NodeId(self.nodes.len());
        self.names.insert(name.to_string(), id);
        Ok(id)
    }

    /// 添加交换机节点
    pub fn add_switch(
        &mut self,
        name: impl Into<String>,
        tier: Tier,
        pod: Option<usize>,
        index: usize,
        hw_id: HwId,
    ) -> Result<NodeId, TopoError> {
        let name = name.into();
        if self.hw_ids.contains(&hw_id) {
            return Err(TopoError::DuplicateIdentifier {
                ident: hw_id.to_string(),
            });
        }
        let id = self.claim_name(&name)?;
        self.hw_ids.insert(hw_id);
        trace!(node = %name, ?tier, ?pod, dpid = %hw_id, "添加交换机");
        self.nodes.push(Node::Switch(Switch {
            id,
            name,
            tier,
            pod,
            index,
            hw_id,
            ports: BTreeMap::new(),
        }));
        Ok(id)
    }

    /// 添加主机节点
    pub fn add_host(
        &mut self,
        name: impl Into<String>,
        pod: usize,
        edge: usize,
        index: usize,
        ip: Ipv4Addr,
    ) -> Result<NodeId, TopoError> {
        let name = name.into();
        if self.addrs.contains(&ip) {
            return Err(TopoError::DuplicateIdentifier {
                ident: ip.to_string(),
            });
        }
        let id = self.claim_name(&name)?;
        self.addrs.insert(ip);
        trace!(node = %name, %ip, "添加主机");
        self.nodes.push(Node::Host(Host {
            id,
            name,
            pod,
            edge,
            index,
            ip,
            mac: MacAddr::from_ip(ip),
            ports: BTreeMap::new(),
        }));
        Ok(id)
    }

    fn node_name(&self, id: NodeId) -> String {
        self.nodes
            .get(id.0)
            .map(|n| n.name().to_string())
            .unwrap_or_else(|| id.to_string())
    }

    /// 连接两个节点（创建一条双向链路）
    ///
    /// 两端端口必须都未被占用，同一对节点之间只能有一条链路。
    /// 检查全部通过之后才修改状态，失败时上下文保持不变。
    pub fn connect(
        &mut self,
        a: NodeId,
        port_a: PortNo,
        b: NodeId,
        port_b: PortNo,
        opts: &LinkOpts,
    ) -> Result<LinkId, TopoError> {
        for n in [a, b] {
            if n.0 >= self.nodes.len() {
                return Err(TopoError::UnknownNode(n));
            }
        }
        let pair = if a <= b { (a, b) } else { (b, a) };
        if a == b || self.pairs.contains(&pair) {
            return Err(TopoError::DuplicateLink {
                a: self.node_name(a),
                b: self.node_name(b),
            });
        }
        for (n, port) in [(a, port_a), (b, port_b)] {
            if self.nodes[n.0].ports().contains_key(&port) {
                return Err(TopoError::PortCollision {
                    node: self.node_name(n),
                    port,
                });
            }
        }

        let id = LinkId(self.links.len());
        self.nodes[a.0].ports_mut().insert(port_a, id);
        self.nodes[b.0].ports_mut().insert(port_b, id);
        self.pairs.insert(pair);
        self.links.push(Link {
            id,
            a: Endpoint { node: a, port: port_a },
            b: Endpoint { node: b, port: port_b },
            opts: opts.clone(),
        });
        Ok(id)
    }

    /// 撤销 `len` 之后创建的链路，释放它们占用的端口和节点对
    pub(crate) fn truncate_links(&mut self, len: usize) {
        while self.links.len() > len {
            let Some(link) = self.links.pop() else { break };
            for end in [link.a, link.b] {
                self.nodes[end.node.0].ports_mut().remove(&end.port);
            }
            let pair = if link.a.node <= link.b.node {
                (link.a.node, link.b.node)
            } else {
                (link.b.node, link.a.node)
            };
            self.pairs.remove(&pair);
            trace!(link = link.id.0, "撤销链路");
        }
    }

    /// 冻结为只读拓扑
    pub fn freeze(self) -> TopologyGraph {
        TopologyGraph::new(
            self.kind,
            self.param,
            self.counts,
            self.core_links,
            self.nodes,
            self.links,
        )
    }
}
