//! 交换机连线
//!
//! 端口分配：
//! - 边缘交换机：`0..hosts_per_edge` 接主机，`hosts_per_edge + a` 接本 pod 第 a 台汇聚交换机
//! - 汇聚交换机：`e` 接本 pod 第 e 台边缘交换机，`edge_per_pod + col` 接同 row 的核心交换机
//! - 核心交换机：`p` 接第 p 个 pod 中的汇聚交换机

use tracing::{debug, info, warn};

use super::builder::Layout;
use crate::net::{BuildCtx, LinkOpts, PortNo, TopoError};

/// 连线选项
#[derive(Debug, Clone)]
pub struct WireOpts {
    /// 是否连接核心层与汇聚层；关闭时得到核心层孤立的拓扑（用于测试局部拓扑）
    pub core_links: bool,
    pub link: LinkOpts,
}

impl Default for WireOpts {
    fn default() -> Self {
        Self {
            core_links: true,
            link: LinkOpts::default(),
        }
    }
}

/// 连接交换机
///
/// 同一个上下文只能连线一次，重复调用返回 [`TopoError::AlreadyWired`]。
/// 中途失败时撤销本次已经创建的链路，上下文回到调用前的状态。
#[tracing::instrument(skip_all, fields(core_links = opts.core_links))]
pub fn wire(ctx: &mut BuildCtx, layout: &Layout, opts: &WireOpts) -> Result<(), TopoError> {
    if ctx.is_wired() {
        return Err(TopoError::AlreadyWired);
    }

    let mark = ctx.links().len();
    if let Err(e) = wire_switches(ctx, layout, opts) {
        warn!(error = %e, undone = ctx.links().len() - mark, "连线失败，撤销本次链路");
        ctx.truncate_links(mark);
        return Err(e);
    }

    ctx.mark_wired(opts.core_links);
    info!(links = ctx.links().len(), "🔗 连线完成");
    Ok(())
}

fn wire_switches(ctx: &mut BuildCtx, layout: &Layout, opts: &WireOpts) -> Result<(), TopoError> {
    wire_agg_edge(ctx, layout, &opts.link)?;
    if opts.core_links {
        wire_core_agg(ctx, layout, &opts.link)?;
    } else {
        info!("跳过核心层与汇聚层之间的连线");
    }
    Ok(())
}

/// 每个 pod 内汇聚层与边缘层完全二分连接
fn wire_agg_edge(ctx: &mut BuildCtx, layout: &Layout, link: &LinkOpts) -> Result<(), TopoError> {
    let c = *layout.counts();
    for pod in 0..c.pods {
        for agg in 0..c.agg_per_pod {
            let agg_id = layout.agg(pod, agg);
            for edge in 0..c.edge_per_pod {
                let edge_id = layout.edge(pod, edge);
                ctx.connect(
                    agg_id,
                    PortNo::try_from(edge)?,
                    edge_id,
                    PortNo::try_from(c.hosts_per_edge + agg)?,
                    link,
                )?;
            }
        }
        debug!(pod, "pod 内连线完成");
    }
    Ok(())
}

/// 核心交换机 (row, col) 连接每个 pod 中序号为 row 的汇聚交换机
fn wire_core_agg(ctx: &mut BuildCtx, layout: &Layout, link: &LinkOpts) -> Result<(), TopoError> {
    let c = *layout.counts();
    for (core, core_id) in layout.core_switches.iter().copied().enumerate() {
        let (row, col) = layout.core_coords(core);
        for pod in 0..c.pods {
            let agg_id = layout.agg(pod, row);
            ctx.connect(
                core_id,
                PortNo::try_from(pod)?,
                agg_id,
                PortNo::try_from(c.edge_per_pod + col)?,
                link,
            )?;
        }
    }
    debug!(core = c.core, "核心层连线完成");
    Ok(())
}
