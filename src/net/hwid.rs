//! 硬件标识
//!
//! 交换机的 datapath id（dpid）和主机 MAC 地址。两者都由拓扑坐标直接编码，
//! 每个字段占固定宽度，因此不同坐标不可能拼出同一个字符串。

use std::fmt;
use std::net::Ipv4Addr;

use super::node::Tier;

/// 64 位交换机硬件标识
///
/// 布局（高位到低位）：`00 00 00 | tier | a_hi a_lo | b_hi b_lo`。
/// 核心交换机 `(a, b) = (row, col)`，汇聚/边缘交换机 `(a, b) = (pod, index)`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HwId(pub u64);

impl HwId {
    pub fn new(tier: Tier, a: u16, b: u16) -> Self {
        HwId((u64::from(tier.code()) << 32) | (u64::from(a) << 16) | u64::from(b))
    }

    /// 16 位十六进制 dpid（不带分隔符），供仿真器使用
    pub fn dpid(&self) -> String {
        format!("{:016x}", self.0)
    }
}

impl fmt::Display for HwId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.0.to_be_bytes();
        for (i, b) in bytes.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

/// 以太网 MAC 地址
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddr(pub [u8; 6]);

impl MacAddr {
    /// 由主机 IPv4 地址派生：`00:00` + 四个地址字节
    pub fn from_ip(ip: Ipv4Addr) -> Self {
        let o = ip.octets();
        MacAddr([0, 0, o[0], o[1], o[2], o[3]])
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}
