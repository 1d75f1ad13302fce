// Errors only come from the host edge: window, config file, snapshots and the
// loop thread. The animation core itself never fails; it clamps instead.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String),

    #[error("Window update error: {0}")]
    WindowUpdate(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] image::ImageError),

    #[error("Animation loop error: {0}")]
    LoopSpawn(String),
}

pub type Result<T> = std::result::Result<T, Error>;
