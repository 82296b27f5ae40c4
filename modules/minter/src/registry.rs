//! Record of contexts that already have a submitted mint

use std::io;
use std::path::{Path, PathBuf};

use minter_common::TxHash;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Invalid context id '{0}'")]
    InvalidContextId(String),

    #[error("Mint registry I/O error: {0}")]
    Io(#[from] io::Error),
}

/// One `tx_<context id>` file per minted context, holding the transaction id
pub struct MintRegistry {
    dir: PathBuf,
}

impl MintRegistry {
    pub fn new(dir: &Path) -> Result<Self, RegistryError> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn entry(&self, context_id: &str) -> Result<PathBuf, RegistryError> {
        let valid = !context_id.is_empty()
            && context_id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(RegistryError::InvalidContextId(context_id.to_string()));
        }
        Ok(self.dir.join(format!("tx_{context_id}")))
    }

    pub async fn already_minted(&self, context_id: &str) -> Result<bool, RegistryError> {
        Ok(tokio::fs::try_exists(self.entry(context_id)?).await?)
    }

    /// Transaction id recorded for the context, if any
    pub async fn minted_id(&self, context_id: &str) -> Result<Option<String>, RegistryError> {
        match tokio::fs::read_to_string(self.entry(context_id)?).await {
            Ok(id) => Ok(Some(id.trim().to_string())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn record(&self, context_id: &str, id: &TxHash) -> Result<(), RegistryError> {
        let path = self.entry(context_id)?;
        tokio::fs::write(&path, id.to_string()).await?;
        info!("Recorded mint {id} for context {context_id}");
        Ok(())
    }
}
