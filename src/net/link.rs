//! 链路类型
//!
//! 定义双向链路、链路端点和透传给仿真器的链路参数。

use serde::{Deserialize, Serialize};

use super::error::TopoError;
use super::id::{LinkId, NodeId, PortNo};

/// 链路端点：某个节点上的某个端口
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub node: NodeId,
    pub port: PortNo,
}

/// 链路参数
///
/// 拓扑本身不解释这些值，只在导出时原样交给仿真器。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkOpts {
    /// 带宽（Mbps）
    #[serde(default, rename = "bw", skip_serializing_if = "Option::is_none")]
    pub bandwidth_mbps: Option<f64>,
    /// 时延，例如 `"5ms"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<String>,
    /// 丢包率（百分比）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loss: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_queue_size: Option<u32>,
    /// 是否使用流量控制（tc/htb）整形
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_tc: Option<bool>,
}

impl LinkOpts {
    pub fn is_empty(&self) -> bool {
        *self == LinkOpts::default()
    }

    /// 逐字段合并，`other` 中已设置的字段覆盖当前值
    pub fn merge(&mut self, other: &LinkOpts) {
        if other.bandwidth_mbps.is_some() {
            self.bandwidth_mbps = other.bandwidth_mbps;
        }
        if other.delay.is_some() {
            self.delay = other.delay.clone();
        }
        if other.loss.is_some() {
            self.loss = other.loss;
        }
        if other.max_queue_size.is_some() {
            self.max_queue_size = other.max_queue_size;
        }
        if other.use_tc.is_some() {
            self.use_tc = other.use_tc;
        }
    }

    /// 只做基本取值范围检查，不解释语义
    pub fn validate(&self) -> Result<(), TopoError> {
        if let Some(bw) = self.bandwidth_mbps {
            if !(bw > 0.0 && bw.is_finite()) {
                return Err(TopoError::InvalidLinkOpts(format!(
                    "bandwidth must be a positive number of Mbps, got {bw}"
                )));
            }
        }
        if let Some(loss) = self.loss {
            if !(0.0..=100.0).contains(&loss) {
                return Err(TopoError::InvalidLinkOpts(format!(
                    "loss must be a percentage in [0, 100], got {loss}"
                )));
            }
        }
        if let Some(delay) = &self.delay {
            if delay.trim().is_empty() {
                return Err(TopoError::InvalidLinkOpts("delay must not be empty".into()));
            }
        }
        Ok(())
    }
}

/// 双向链路
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: LinkId,
    pub a: Endpoint,
    pub b: Endpoint,
    pub opts: LinkOpts,
}

impl Link {
    pub fn touches(&self, node: NodeId) -> bool {
        self.a.node == node || self.b.node == node
    }

    /// 从 `node` 一侧看：(本端端口, 对端)
    pub fn side_of(&self, node: NodeId) -> Option<(PortNo, Endpoint)> {
        if self.a.node == node {
            Some((self.a.port, self.b))
        } else if self.b.node == node {
            Some((self.b.port, self.a))
        } else {
            None
        }
    }
}
