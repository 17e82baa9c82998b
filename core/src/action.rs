use crate::rung_id::RungId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundAction {
    Toggle { rung_id: RungId },
    ClearLines,
    Regenerate { seed: u32 },
}
