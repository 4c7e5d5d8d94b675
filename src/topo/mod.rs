//! 拓扑生成
//!
//! 参数推导 → 创建节点 → 交换机连线 → 冻结，全部在一次同步调用中完成。

mod params;
mod builder;
mod wirer;
mod config;

pub use params::{Counts, TopoKind, derive};
pub use builder::{HOST_PORT, Layout, build_nodes};
pub(crate) use builder::host_ip;
pub use wirer::{WireOpts, wire};
pub use config::{ConfigError, TopoConfig, TopologySpec};

use tracing::info;

use crate::net::{BuildCtx, LinkOpts, TopoError, TopologyGraph};

/// 拓扑生成选项
#[derive(Debug, Clone)]
pub struct TopoOpts {
    pub kind: TopoKind,
    /// fat-tree 的 `k` 或 tree 的 `fan_out`
    pub param: i64,
    /// 是否连接核心层与汇聚层
    pub core_links: bool,
    pub link: LinkOpts,
}

impl Default for TopoOpts {
    fn default() -> Self {
        Self {
            kind: TopoKind::FatTree,
            param: 4,
            core_links: true,
            link: LinkOpts::default(),
        }
    }
}

impl TopoOpts {
    pub fn fat_tree(k: i64) -> Self {
        Self {
            kind: TopoKind::FatTree,
            param: k,
            ..Self::default()
        }
    }

    pub fn tree(fan_out: i64) -> Self {
        Self {
            kind: TopoKind::Tree,
            param: fan_out,
            ..Self::default()
        }
    }
}

/// 构建拓扑
///
/// 任何一步失败都直接返回错误，不会留下部分构建的拓扑。
#[tracing::instrument(skip(opts), fields(kind = %opts.kind, param = opts.param))]
pub fn build_topology(opts: &TopoOpts) -> Result<TopologyGraph, TopoError> {
    opts.link.validate()?;
    let counts = derive(opts.kind, opts.param)?;
    // derive 已保证参数为正
    let param = opts.param as usize;

    let mut ctx = BuildCtx::new(opts.kind, param, counts);
    let layout = build_nodes(&mut ctx, &counts, &opts.link)?;
    wire(
        &mut ctx,
        &layout,
        &WireOpts {
            core_links: opts.core_links,
            link: opts.link.clone(),
        },
    )?;

    let graph = ctx.freeze();
    info!(
        nodes = graph.nodes().len(),
        links = graph.links().len(),
        "✅ 拓扑构建完成"
    );
    Ok(graph)
}
