use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{TopoKind, TopoOpts};
use crate::net::{LinkOpts, TopoError};

pub const SCHEMA_VERSION: u32 = 1;

/// 拓扑配置文件（JSON）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopoConfig {
    pub schema_version: u32,
    pub topology: TopologySpec,
    #[serde(default)]
    pub link: Option<LinkOpts>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TopologySpec {
    Tree {
        fan_out: i64,
        #[serde(default)]
        core_links: Option<bool>,
    },
    FatTree {
        k: i64,
        /// Leave the core tier unconnected when false.
        #[serde(default)]
        core_links: Option<bool>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse topology config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported schema_version {0} (expected {SCHEMA_VERSION})")]
    UnsupportedSchema(u32),
    #[error(transparent)]
    Topo(#[from] TopoError),
}

impl TopoConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let cfg: TopoConfig = serde_json::from_str(raw)?;
        if cfg.schema_version != SCHEMA_VERSION {
            return Err(ConfigError::UnsupportedSchema(cfg.schema_version));
        }
        if let Some(link) = &cfg.link {
            link.validate()?;
        }
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn to_opts(&self) -> TopoOpts {
        let (kind, param, core_links) = match self.topology {
            TopologySpec::Tree { fan_out, core_links } => (TopoKind::Tree, fan_out, core_links),
            TopologySpec::FatTree { k, core_links } => (TopoKind::FatTree, k, core_links),
        };
        let core_links = core_links.unwrap_or(true);
        TopoOpts {
            kind,
            param,
            core_links,
            link: self.link.clone().unwrap_or_default(),
        }
    }
}
