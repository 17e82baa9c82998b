use std::fmt;

use rkyv::{Archive, Deserialize, Serialize};

pub const RUNG_ID_PREFIX: &str = "h-";

/// Stable rung identifier, rendered as `h-{left_lane}-{seq}` where `seq` is
/// the rung's position in generation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Archive, Serialize, Deserialize)]
pub struct RungId {
    pub left_lane: u32,
    pub seq: u32,
}

impl RungId {
    pub fn new(left_lane: u32, seq: u32) -> Self {
        Self { left_lane, seq }
    }

    pub fn parse(value: &str) -> Result<Self, RungIdError> {
        let trimmed = value.trim();
        let rest = trimmed
            .strip_prefix(RUNG_ID_PREFIX)
            .ok_or_else(|| RungIdError::MissingPrefix(trimmed.to_string()))?;
        let (lane, seq) = rest
            .split_once('-')
            .ok_or_else(|| RungIdError::MissingSeparator(trimmed.to_string()))?;
        Ok(Self {
            left_lane: parse_component("lane", lane)?,
            seq: parse_component("seq", seq)?,
        })
    }
}

/// Digits only; `u32::from_str` would also take a leading `+`.
fn parse_component(field: &'static str, value: &str) -> Result<u32, RungIdError> {
    let invalid = || RungIdError::InvalidNumber {
        field,
        value: value.to_string(),
    };
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    value.parse::<u32>().map_err(|_| invalid())
}

impl fmt::Display for RungId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{RUNG_ID_PREFIX}{}-{}", self.left_lane, self.seq)
    }
}

impl std::str::FromStr for RungId {
    type Err = RungIdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RungIdError {
    #[error("rung id must start with 'h-': {0}")]
    MissingPrefix(String),
    #[error("rung id must look like h-<lane>-<seq>: {0}")]
    MissingSeparator(String),
    #[error("invalid {field} in rung id: '{value}'")]
    InvalidNumber { field: &'static str, value: String },
}
