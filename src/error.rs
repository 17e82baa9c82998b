use amidakuji_core::{CodecError, LANE_COUNT_MAX, LANE_COUNT_MIN};
use thiserror::Error;

use crate::store::StoreError;
use crate::tasks::TaskError;

pub(crate) type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("snapshot codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Task(#[from] TaskError),

    #[error(
        "lane count must be between {min} and {max}, got {0}",
        min = LANE_COUNT_MIN,
        max = LANE_COUNT_MAX
    )]
    InvalidLaneCount(u32),

    #[error("no ladder yet; run `ladder new` first")]
    NoRound,

    #[error("invalid seed '{0}'")]
    InvalidSeed(String),
}
