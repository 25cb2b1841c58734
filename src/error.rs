use std::path::PathBuf;

use crate::engine::scene::NodeId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown key name `{0}`")]
    UnknownKey(String),
    #[error("scene node {0:?} does not exist")]
    MissingNode(NodeId),
    #[error("failed to read config {}: {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
