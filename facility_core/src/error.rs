use std::path::PathBuf;

/// Session-level failures. Configuration failures surface before any
/// partial state is committed; the caller decides whether to retry with
/// different parameters.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("map dimensions {width}x{height} are below the minimum room size {min}")]
    MapTooSmall { width: i32, height: i32, min: i32 },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to decode save state: {0}")]
    SnapshotDecode(#[from] bincode::Error),
    #[error("save state contains no controlled entity")]
    SnapshotInvalid,
}

/// Entity store failures. Capacity exhaustion is fatal for the creating
/// call and is never silently absorbed.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("entity capacity {capacity} exhausted")]
    CapacityExhausted { capacity: u32 },
}

/// Configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
