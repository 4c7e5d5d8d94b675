//! 节点构建
//!
//! 创建核心、汇聚、边缘交换机与主机，并把每台主机接到它的边缘交换机上。

use std::net::Ipv4Addr;

use tracing::{debug, info};

use super::params::Counts;
use crate::net::{BuildCtx, HwId, LinkOpts, NodeId, PortNo, Tier, TopoError};

/// 主机侧固定使用的端口
pub const HOST_PORT: PortNo = PortNo(0);
/// 主机地址第四个字节的偏移（避开网络地址和网关）
const HOST_ADDR_OFFSET: usize = 2;

/// 按坐标索引的节点布局
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    counts: Counts,
    pub core_switches: Vec<NodeId>,
    pub agg_switches: Vec<NodeId>,
    pub edge_switches: Vec<NodeId>,
    pub hosts: Vec<NodeId>,
}

impl Layout {
    pub fn counts(&self) -> &Counts {
        &self.counts
    }

    /// 核心交换机的 (row, col) 坐标
    ///
    /// 每组 `core_per_agg` 台核心交换机共用一个 row，对应各 pod 中同序号的汇聚交换机。
    pub fn core_coords(&self, core: usize) -> (usize, usize) {
        let per = self.counts.core_per_agg;
        (core / per, core % per)
    }

    pub fn core(&self, row: usize, col: usize) -> NodeId {
        self.core_switches[row * self.counts.core_per_agg + col]
    }

    pub fn agg(&self, pod: usize, agg: usize) -> NodeId {
        self.agg_switches[pod * self.counts.agg_per_pod + agg]
    }

    pub fn edge(&self, pod: usize, edge: usize) -> NodeId {
        self.edge_switches[pod * self.counts.edge_per_pod + edge]
    }

    pub fn host(&self, pod: usize, edge: usize, host: usize) -> NodeId {
        let c = &self.counts;
        self.hosts[(pod * c.edge_per_pod + edge) * c.hosts_per_edge + host]
    }
}

/// 主机地址：`10.{pod}.{edge}.{host+2}`
pub(crate) fn host_ip(pod: usize, edge: usize, host: usize) -> Result<Ipv4Addr, TopoError> {
    let octet = |name: &str, v: usize| {
        u8::try_from(v)
            .map_err(|_| TopoError::invalid_param(name, format!("{v} does not fit an address octet")))
    };
    Ok(Ipv4Addr::new(
        10,
        octet("pod", pod)?,
        octet("edge", edge)?,
        octet("host", host + HOST_ADDR_OFFSET)?,
    ))
}

fn coord(v: usize) -> Result<u16, TopoError> {
    u16::try_from(v)
        .map_err(|_| TopoError::invalid_param("coordinate", format!("{v} exceeds {}", u16::MAX)))
}

/// 创建全部节点，并连好主机到边缘交换机的链路
#[tracing::instrument(skip(ctx, counts, host_link), fields(pods = counts.pods, core = counts.core))]
pub fn build_nodes(
    ctx: &mut BuildCtx,
    counts: &Counts,
    host_link: &LinkOpts,
) -> Result<Layout, TopoError> {
    let mut layout = Layout {
        counts: *counts,
        core_switches: Vec::with_capacity(counts.core),
        agg_switches: Vec::with_capacity(counts.agg_count()),
        edge_switches: Vec::with_capacity(counts.edge_count()),
        hosts: Vec::with_capacity(counts.host_count()),
    };

    for core in 0..counts.core {
        let (row, col) = layout.core_coords(core);
        let hw_id = HwId::new(Tier::Core, coord(row)?, coord(col)?);
        let id = ctx.add_switch(format!("c{}", core), Tier::Core, None, core, hw_id)?;
        layout.core_switches.push(id);
    }
    debug!(core = layout.core_switches.len(), "核心交换机创建完成");

    for pod in 0..counts.pods {
        for agg in 0..counts.agg_per_pod {
            let global = pod * counts.agg_per_pod + agg;
            let hw_id = HwId::new(Tier::Aggregation, coord(pod)?, coord(agg)?);
            let id = ctx.add_switch(
                format!("a{}", global),
                Tier::Aggregation,
                Some(pod),
                agg,
                hw_id,
            )?;
            layout.agg_switches.push(id);
        }

        for edge in 0..counts.edge_per_pod {
            let global = pod * counts.edge_per_pod + edge;
            let hw_id = HwId::new(Tier::Edge, coord(pod)?, coord(edge)?);
            let edge_id = ctx.add_switch(format!("e{}", global), Tier::Edge, Some(pod), edge, hw_id)?;
            layout.edge_switches.push(edge_id);

            for host in 0..counts.hosts_per_edge {
                let name = format!("h{}", layout.hosts.len());
                let host_id = ctx.add_host(name, pod, edge, host, host_ip(pod, edge, host)?)?;
                // 边缘交换机的低位端口留给主机
                ctx.connect(host_id, HOST_PORT, edge_id, PortNo::try_from(host)?, host_link)?;
                layout.hosts.push(host_id);
            }
        }
        debug!(pod, "pod 节点创建完成");
    }

    info!(
        switches = counts.switch_count(),
        hosts = layout.hosts.len(),
        "🏗️  节点创建完成"
    );
    Ok(layout)
}
