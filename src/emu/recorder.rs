use std::convert::Infallible;

use super::{EmulatorDriver, LinkSpec, NodeAttrs, NodeSpec};
use crate::net::{LinkOpts, NodeKind, PortNo};

/// 记录下来的一次驱动调用
#[derive(Debug, Clone, PartialEq)]
pub enum EmuCall {
    CreateNode {
        name: String,
        kind: NodeKind,
        attrs: NodeAttrs,
    },
    CreateLink {
        node_a: String,
        port_a: PortNo,
        node_b: String,
        port_b: PortNo,
        opts: LinkOpts,
    },
}

/// 把所有调用按顺序存在内存里的驱动
#[derive(Debug, Default)]
pub struct RecordingDriver {
    pub calls: Vec<EmuCall>,
}

impl RecordingDriver {
    pub fn node_calls(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, EmuCall::CreateNode { .. }))
            .count()
    }

    pub fn link_calls(&self) -> usize {
        self.calls.len() - self.node_calls()
    }
}

impl EmulatorDriver for RecordingDriver {
    type Error = Infallible;

    fn create_node(&mut self, spec: &NodeSpec<'_>) -> Result<(), Self::Error> {
        self.calls.push(EmuCall::CreateNode {
            name: spec.name.to_string(),
            kind: spec.kind,
            attrs: spec.attrs.clone(),
        });
        Ok(())
    }

    fn create_link(&mut self, spec: &LinkSpec<'_>) -> Result<(), Self::Error> {
        self.calls.push(EmuCall::CreateLink {
            node_a: spec.node_a.to_string(),
            port_a: spec.port_a,
            node_b: spec.node_b.to_string(),
            port_b: spec.port_b,
            opts: spec.opts.clone(),
        });
        Ok(())
    }
}
