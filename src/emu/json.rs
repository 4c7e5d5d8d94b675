//! JSON 拓扑文档
//!
//! 与仿真器无关的中间格式，便于离线检查或交给其他工具。

use std::convert::Infallible;

use serde::{Deserialize, Serialize};

use super::{EmulatorDriver, LinkSpec, NodeSpec};
use crate::net::{LinkOpts, NodeKind, PortNo, TopologyGraph};
use crate::topo::TopoKind;

pub const DOC_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDoc {
    pub name: String,
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dpid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkDoc {
    pub node_a: String,
    pub port_a: PortNo,
    pub node_b: String,
    pub port_b: PortNo,
    #[serde(default, skip_serializing_if = "LinkOpts::is_empty")]
    pub opts: LinkOpts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologyDoc {
    pub schema_version: u32,
    pub kind: TopoKind,
    pub param: usize,
    pub core_links: bool,
    pub nodes: Vec<NodeDoc>,
    pub links: Vec<LinkDoc>,
}

/// 把导出调用收集成 [`TopologyDoc`] 的驱动
#[derive(Debug)]
pub struct JsonDriver {
    doc: TopologyDoc,
}

impl JsonDriver {
    pub fn new(graph: &TopologyGraph) -> Self {
        Self {
            doc: TopologyDoc {
                schema_version: DOC_SCHEMA_VERSION,
                kind: graph.kind(),
                param: graph.param(),
                core_links: graph.core_links_wired(),
                nodes: Vec::with_capacity(graph.nodes().len()),
                links: Vec::with_capacity(graph.links().len()),
            },
        }
    }

    pub fn into_doc(self) -> TopologyDoc {
        self.doc
    }
}

impl EmulatorDriver for JsonDriver {
    type Error = Infallible;

    fn create_node(&mut self, spec: &NodeSpec<'_>) -> Result<(), Self::Error> {
        self.doc.nodes.push(NodeDoc {
            name: spec.name.to_string(),
            kind: spec.kind,
            pod: spec.attrs.pod,
            dpid: spec.attrs.dpid.clone(),
            ip: spec.attrs.ip.map(|ip| ip.to_string()),
            mac: spec.attrs.mac.clone(),
        });
        Ok(())
    }

    fn create_link(&mut self, spec: &LinkSpec<'_>) -> Result<(), Self::Error> {
        self.doc.links.push(LinkDoc {
            node_a: spec.node_a.to_string(),
            port_a: spec.port_a,
            node_b: spec.node_b.to_string(),
            port_b: spec.port_b,
            opts: spec.opts.clone(),
        });
        Ok(())
    }
}

impl TopologyDoc {
    pub fn from_graph(graph: &TopologyGraph) -> Self {
        let mut driver = JsonDriver::new(graph);
        match super::export(graph, &mut driver) {
            Ok(()) => driver.into_doc(),
            Err(never) => match never {},
        }
    }
}
