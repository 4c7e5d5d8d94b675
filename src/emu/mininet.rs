//! Mininet 拓扑脚本
//!
//! 生成一个 `Topo` 子类，可直接用 `mn --custom <file> --topo generated --link tc` 加载。

use std::fmt::{self, Write as _};

use super::{EmulatorDriver, LinkSpec, NodeSpec};
use crate::net::{LinkOpts, NodeKind, TopologyGraph};

const INDENT: &str = "        ";

#[derive(Debug)]
pub struct MininetDriver {
    header: String,
    body: String,
}

impl MininetDriver {
    pub fn new(graph: &TopologyGraph) -> Self {
        Self {
            header: format!(
                "{} {}={} ({} switches, {} hosts, {} links)",
                graph.kind(),
                graph.kind().param_name(),
                graph.param(),
                graph.counts().switch_count(),
                graph.counts().host_count(),
                graph.links().len()
            ),
            body: String::new(),
        }
    }

    /// 完整脚本
    pub fn finish(self) -> String {
        let mut out = String::new();
        out.push_str("from mininet.topo import Topo\n\n\n");
        out.push_str("class GeneratedTopo(Topo):\n");
        let _ = writeln!(out, "    \"\"\"{}\"\"\"\n", self.header);
        out.push_str("    def build(self):\n");
        if self.body.is_empty() {
            let _ = writeln!(out, "{INDENT}pass");
        } else {
            out.push_str(&self.body);
        }
        out.push_str("\n\ntopos = {'generated': (lambda: GeneratedTopo())}\n");
        out
    }
}

/// 单引号 Python 字符串字面量
fn py_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn py_bool(v: bool) -> &'static str {
    if v { "True" } else { "False" }
}

fn link_kwargs(opts: &LinkOpts) -> String {
    let mut kw = String::new();
    if let Some(bw) = opts.bandwidth_mbps {
        let _ = write!(kw, ", bw={bw}");
    }
    if let Some(delay) = &opts.delay {
        let _ = write!(kw, ", delay={}", py_str(delay));
    }
    if let Some(loss) = opts.loss {
        let _ = write!(kw, ", loss={loss}");
    }
    if let Some(q) = opts.max_queue_size {
        let _ = write!(kw, ", max_queue_size={q}");
    }
    if let Some(tc) = opts.use_tc {
        let _ = write!(kw, ", use_htb={}", py_bool(tc));
    }
    kw
}

impl EmulatorDriver for MininetDriver {
    type Error = fmt::Error;

    fn create_node(&mut self, spec: &NodeSpec<'_>) -> Result<(), Self::Error> {
        match spec.kind {
            NodeKind::Switch(_) => {
                write!(self.body, "{INDENT}self.addSwitch({}", py_str(spec.name))?;
                if let Some(dpid) = &spec.attrs.dpid {
                    write!(self.body, ", dpid={}", py_str(dpid))?;
                }
            }
            NodeKind::Host => {
                write!(self.body, "{INDENT}self.addHost({}", py_str(spec.name))?;
                if let Some(ip) = spec.attrs.ip {
                    write!(self.body, ", ip={}", py_str(&format!("{ip}/8")))?;
                }
                if let Some(mac) = &spec.attrs.mac {
                    write!(self.body, ", mac={}", py_str(mac))?;
                }
            }
        }
        writeln!(self.body, ")")
    }

    fn create_link(&mut self, spec: &LinkSpec<'_>) -> Result<(), Self::Error> {
        writeln!(
            self.body,
            "{INDENT}self.addLink({}, {}, port1={}, port2={}{})",
            py_str(spec.node_a),
            py_str(spec.node_b),
            spec.port_a,
            spec.port_b,
            link_kwargs(spec.opts)
        )
    }
}
