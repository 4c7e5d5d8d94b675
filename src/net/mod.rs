//! 拓扑图模型
//!
//! 此模块包含拓扑的基础组件：节点、链路、硬件标识、构建上下文和只读拓扑。

// 子模块声明
mod id;
mod hwid;
mod node;
mod link;
mod error;
mod build_ctx;
mod graph;

// 重新导出公共接口
pub use id::{LinkId, NodeId, PortNo};
pub use hwid::{HwId, MacAddr};
pub use node::{Host, Node, NodeKind, Switch, Tier};
pub use link::{Endpoint, Link, LinkOpts};
pub use error::TopoError;
pub use build_ctx::BuildCtx;
pub use graph::{Neighbor, TopologyGraph};
