use fitview_core::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("serialize layout: {0}")]
    Serialize(#[from] serde_json::Error),
}
