use std::collections::HashMap;
use std::fmt::Write;

use amidakuji_core::{goal_label, player_label, Resolution, RoundState, RungId};

pub(crate) const VIEW_ROWS_DEFAULT: usize = 16;
const LANE_GAP: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RungCell {
    pub(crate) row: usize,
    pub(crate) left_lane: u32,
}

/// Character-grid view of a round. The view owns its rung-to-cell lookup;
/// the round itself carries no presentation state.
pub(crate) struct TextView {
    lane_count: u32,
    rows: usize,
    cells: HashMap<RungId, RungCell>,
}

impl TextView {
    pub(crate) fn for_round(round: &RoundState, rows: usize) -> Self {
        let rows = rows.max(2);
        let top = round.layout.lane_top();
        let span = (round.layout.lane_bottom() - top).max(1.0);
        let cells = round
            .ladder
            .rungs()
            .iter()
            .map(|rung| {
                let t = ((rung.y - top) / span).clamp(0.0, 1.0);
                let row = (t * (rows - 1) as f32).round() as usize;
                (
                    rung.id,
                    RungCell {
                        row,
                        left_lane: rung.left_lane,
                    },
                )
            })
            .collect();
        Self {
            lane_count: round.lane_count(),
            rows,
            cells,
        }
    }

    pub(crate) fn cell_of(&self, id: RungId) -> Option<RungCell> {
        self.cells.get(&id).copied()
    }

    /// Rung drawn in the gap right of `left_lane` on `row`. Overlapping rungs
    /// resolve to the lowest id.
    pub(crate) fn rung_at(&self, row: usize, left_lane: u32) -> Option<RungId> {
        self.cells
            .iter()
            .filter(|(_, cell)| cell.row == row && cell.left_lane == left_lane)
            .map(|(id, _)| *id)
            .min()
    }

    pub(crate) fn render(&self, round: &RoundState) -> String {
        let mut out = String::new();
        let width = LANE_GAP + 1;
        let header: String = (0..self.lane_count)
            .map(|lane| format!("{:<width$}", format!("P{}", lane + 1)))
            .collect();
        let _ = writeln!(out, "     {}", header.trim_end());
        for row in 0..self.rows {
            let mut line = format!("{row:>3}  ");
            for lane in 0..self.lane_count {
                line.push('|');
                if lane + 1 == self.lane_count {
                    break;
                }
                let fill = self.gap_fill(round, row, lane);
                line.extend(std::iter::repeat(fill).take(LANE_GAP));
            }
            let _ = writeln!(out, "{}", line.trim_end());
        }
        let footer: String = (0..self.lane_count)
            .map(|lane| format!("{:<width$}", format!("G{}", lane + 1)))
            .collect();
        let _ = writeln!(out, "     {}", footer.trim_end());
        out
    }

    fn gap_fill(&self, round: &RoundState, row: usize, left_lane: u32) -> char {
        let mut fill = ' ';
        for (id, cell) in &self.cells {
            if cell.row != row || cell.left_lane != left_lane {
                continue;
            }
            if round.active.contains(*id) {
                return '=';
            }
            fill = '.';
        }
        fill
    }
}

/// One line per rung in height order with its id, lanes and draw state.
pub(crate) fn render_rung_legend(round: &RoundState, view: &TextView) -> String {
    let mut rungs: Vec<_> = round.ladder.rungs().iter().collect();
    rungs.sort_by(|a, b| a.y.total_cmp(&b.y));
    let mut out = String::new();
    for rung in rungs {
        let row = view.cell_of(rung.id).map(|cell| cell.row).unwrap_or_default();
        let state = if round.active.contains(rung.id) {
            "drawn"
        } else {
            "-"
        };
        let _ = writeln!(
            out,
            "{:<8} row {:>2}  P{}-P{}  y={:>6.1}  {}",
            rung.id.to_string(),
            row,
            rung.left_lane + 1,
            rung.right_lane() + 1,
            rung.y,
            state
        );
    }
    out
}

pub(crate) fn render_results(resolution: &Resolution) -> String {
    let mut out = String::new();
    for (start, end) in resolution.pairs() {
        let _ = writeln!(out, "{} -> {}", player_label(start), goal_label(end));
    }
    out
}
