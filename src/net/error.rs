//! 拓扑构建错误

use super::id::{NodeId, PortNo};

/// 拓扑构建过程中的错误
///
/// 所有错误都在违反约束的位置同步返回；出错时不会产出任何部分拓扑。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopoError {
    #[error("invalid parameter {param}: {constraint}")]
    InvalidParameter { param: String, constraint: String },
    #[error("duplicate identifier: {ident}")]
    DuplicateIdentifier { ident: String },
    #[error("port collision on {node} port {port}")]
    PortCollision { node: String, port: PortNo },
    #[error("topology is already wired")]
    AlreadyWired,
    #[error("duplicate link between {a} and {b}")]
    DuplicateLink { a: String, b: String },
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
    #[error("invalid link options: {0}")]
    InvalidLinkOpts(String),
}

impl TopoError {
    pub(crate) fn invalid_param(param: impl Into<String>, constraint: impl Into<String>) -> Self {
        TopoError::InvalidParameter {
            param: param.into(),
            constraint: constraint.into(),
        }
    }
}
