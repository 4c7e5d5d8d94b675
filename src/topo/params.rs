//! 拓扑参数推导
//!
//! 由单个整数参数推导出各层交换机数量与主机数量。两种拓扑共用同一组字段：
//! tree 拓扑中一个“pod”就是一台汇聚交换机及其下的 `fan_out` 台边缘交换机。

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::net::TopoError;

/// 主机地址 `10.{pod}.{edge}.{host+2}` 中第二、三个字节的上限
const MAX_OCTET_SLOTS: usize = 256;
/// 第四个字节从 2 开始，最大 254（避开 255 广播地址）
const MAX_HOSTS_PER_EDGE: usize = 253;

/// 拓扑类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopoKind {
    /// 单核心、三层的简单树（参数 `fan_out`）
    Tree,
    /// k 叉 fat-tree（参数 `k`）
    FatTree,
}

impl TopoKind {
    /// 参数名
    pub fn param_name(self) -> &'static str {
        match self {
            TopoKind::Tree => "fan_out",
            TopoKind::FatTree => "k",
        }
    }
}

impl fmt::Display for TopoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopoKind::Tree => f.write_str("tree"),
            TopoKind::FatTree => f.write_str("fat_tree"),
        }
    }
}

/// 推导出的各层规模
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub core: usize,
    pub pods: usize,
    pub agg_per_pod: usize,
    pub edge_per_pod: usize,
    pub hosts_per_edge: usize,
    /// 每台汇聚交换机连接的核心交换机数
    pub core_per_agg: usize,
}

impl Counts {
    pub fn agg_count(&self) -> usize {
        self.pods * self.agg_per_pod
    }

    pub fn edge_count(&self) -> usize {
        self.pods * self.edge_per_pod
    }

    pub fn host_count(&self) -> usize {
        self.edge_count() * self.hosts_per_edge
    }

    pub fn switch_count(&self) -> usize {
        self.core + self.agg_count() + self.edge_count()
    }

    pub fn node_count(&self) -> usize {
        self.switch_count() + self.host_count()
    }

    pub fn core_link_count(&self) -> usize {
        self.agg_count() * self.core_per_agg
    }

    /// 完整连线时的链路总数
    pub fn link_count(&self) -> usize {
        self.core_link_count()
            + self.pods * self.agg_per_pod * self.edge_per_pod
            + self.host_count()
    }

    fn check_address_space(&self, kind: TopoKind) -> Result<(), TopoError> {
        let param = kind.param_name();
        if self.pods > MAX_OCTET_SLOTS {
            return Err(TopoError::invalid_param(
                param,
                format!("{} pods do not fit the second address octet", self.pods),
            ));
        }
        if self.edge_per_pod > MAX_OCTET_SLOTS {
            return Err(TopoError::invalid_param(
                param,
                format!(
                    "{} edge switches per pod do not fit the third address octet",
                    self.edge_per_pod
                ),
            ));
        }
        if self.hosts_per_edge > MAX_HOSTS_PER_EDGE {
            return Err(TopoError::invalid_param(
                param,
                format!(
                    "{} hosts per edge switch do not fit the fourth address octet",
                    self.hosts_per_edge
                ),
            ));
        }
        Ok(())
    }
}

/// 由参数推导各层规模
///
/// 参数必须为正；fat-tree 的 `k` 还必须为偶数，且主机地址要放得进 `10.0.0.0/8`。
pub fn derive(kind: TopoKind, param: i64) -> Result<Counts, TopoError> {
    let name = kind.param_name();
    if param < 1 {
        return Err(TopoError::invalid_param(
            name,
            format!("must be a positive integer, got {param}"),
        ));
    }
    let n = usize::try_from(param)
        .map_err(|_| TopoError::invalid_param(name, format!("{param} is out of range")))?;
    // 两种拓扑的 pod 数都等于参数本身，先拦住过大的值再做乘法
    if n > MAX_OCTET_SLOTS {
        return Err(TopoError::invalid_param(
            name,
            format!("{n} pods do not fit the second address octet"),
        ));
    }

    let counts = match kind {
        TopoKind::FatTree => {
            if n % 2 != 0 {
                return Err(TopoError::invalid_param(
                    name,
                    format!("must be even, got {n}"),
                ));
            }
            let half = n / 2;
            Counts {
                core: half * half,
                pods: n,
                agg_per_pod: half,
                edge_per_pod: half,
                hosts_per_edge: half,
                core_per_agg: half,
            }
        }
        TopoKind::Tree => Counts {
            core: 1,
            pods: n,
            agg_per_pod: 1,
            edge_per_pod: n,
            hosts_per_edge: n,
            core_per_agg: 1,
        },
    };
    counts.check_address_space(kind)?;
    Ok(counts)
}
