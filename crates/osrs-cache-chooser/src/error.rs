//! Error types for the chooser

use osrs_cache_protocol::ProtocolError;
use osrs_cache_storage::StorageError;
use thiserror::Error;

use crate::acquisition::AcquisitionState;

#[derive(Debug, Error)]
pub enum ChooserError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A fatal failure during an acquisition attempt
    #[error("{source}")]
    Acquisition {
        stage: AcquisitionState,
        #[source]
        source: Box<ChooserError>,
    },

    #[error("No snapshot matching {0}")]
    SnapshotNotFound(String),

    #[error("An acquisition is already running")]
    Busy,

    #[error("Background task failed: {0}")]
    TaskFailed(String),
}

impl ChooserError {
    /// Wrap a failure with the acquisition state it happened in
    pub fn at_stage(stage: AcquisitionState, source: impl Into<Self>) -> Self {
        Self::Acquisition {
            stage,
            source: Box::new(source.into()),
        }
    }

    /// State a failed acquisition stopped in
    pub fn stage(&self) -> Option<AcquisitionState> {
        match self {
            Self::Acquisition { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Short message for the person who picked the cache
    ///
    /// Missing archive files and unreadable key files get a "Bad cache" prefix;
    /// everything else is the underlying message unchanged.
    pub fn user_message(&self) -> String {
        match self {
            Self::Storage(StorageError::MissingRequiredFile(path)) => {
                format!("Bad cache: Missing required file: {}", path.display())
            }
            Self::Storage(StorageError::InvalidKeys { source, .. }) => {
                format!("Bad cache: Could not decode xteas file: {source}")
            }
            Self::Acquisition { source, .. } => source.user_message(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ChooserError>;
