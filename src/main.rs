mod app_core;
mod error;
mod logging;
mod persisted;
mod persisted_store;
mod store;
mod tasks;
mod text_view;

use std::path::PathBuf;
use std::process::ExitCode;

use amidakuji_core::layout::{DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH};
use amidakuji_core::{LadderLayout, RoundState, RungId, DEFAULT_LANE_COUNT};
use clap::{Parser, Subcommand};
use tracing::error;

use crate::app_core::AppCore;
use crate::error::{AppError, Result};
use crate::store::{FileStore, KeyValueStore};
use crate::tasks::{Priority, TaskFilter};
use crate::text_view::{render_results, render_rung_legend, TextView, VIEW_ROWS_DEFAULT};

#[derive(Parser)]
#[command(name = "amidakuji", version, about = "Amidakuji ladder lottery and task board")]
struct Cli {
    /// Directory holding the saved round and task list.
    #[arg(long, global = true, env = "AMIDAKUJI_DATA_DIR", default_value = ".amidakuji")]
    data_dir: PathBuf,
    /// Raise log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Ladder {
        #[command(subcommand)]
        command: LadderCommand,
    },
    Tasks {
        #[command(subcommand)]
        command: TaskCommand,
    },
}

#[derive(Subcommand)]
enum LadderCommand {
    /// Generate a fresh ladder, discarding the current round.
    New {
        #[arg(long, default_value_t = DEFAULT_LANE_COUNT)]
        lanes: u32,
        /// Decimal or 0x-prefixed hex seed; random when omitted.
        #[arg(long)]
        seed: Option<String>,
        #[arg(long, default_value_t = DEFAULT_BOARD_WIDTH)]
        width: f32,
        #[arg(long, default_value_t = DEFAULT_BOARD_HEIGHT)]
        height: f32,
    },
    /// Draw the ladder with every rung id.
    Show {
        #[arg(long, default_value_t = VIEW_ROWS_DEFAULT)]
        rows: usize,
    },
    /// Draw or erase a rung, by id or by its cell in `show`.
    Toggle {
        #[arg(required_unless_present = "row", conflicts_with_all = ["row", "lane"])]
        rung_id: Option<RungId>,
        #[arg(long, requires = "lane")]
        row: Option<usize>,
        /// Left player of the gap, 1-based as printed by `show`.
        #[arg(long, requires = "row", value_parser = clap::value_parser!(u32).range(1..))]
        lane: Option<u32>,
        /// Rows of the view `--row` refers to. Pass the same value given to
        /// `show --rows`; rows are not remembered between commands.
        #[arg(long, default_value_t = VIEW_ROWS_DEFAULT)]
        rows: usize,
    },
    /// Erase every drawn rung.
    Clear,
    /// Regenerate the ladder with the same number of lanes.
    Reset {
        #[arg(long)]
        seed: Option<String>,
    },
    /// Print where every player ends up.
    Result,
}

#[derive(Subcommand)]
enum TaskCommand {
    Add {
        text: String,
        #[arg(long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
    },
    Toggle {
        id: u64,
    },
    Delete {
        id: u64,
    },
    List {
        #[arg(long, value_enum, default_value_t = TaskFilter::All)]
        filter: TaskFilter,
    },
    ClearCompleted,
    Stats,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "command failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let store = FileStore::open(&cli.data_dir)?;
    tracing::debug!(data_dir = %store.root().display(), "using data directory");
    let mut app = AppCore::open(store)?;
    match cli.command {
        Commands::Ladder { command } => run_ladder(&mut app, command),
        Commands::Tasks { command } => run_tasks(&mut app, command),
    }
}

fn run_ladder<S: KeyValueStore>(app: &mut AppCore<S>, command: LadderCommand) -> Result<()> {
    match command {
        LadderCommand::New {
            lanes,
            seed,
            width,
            height,
        } => {
            let seed = seed.as_deref().map(parse_seed_arg).transpose()?;
            let round = app.new_round(lanes, seed, LadderLayout::new(width, height))?;
            let view = TextView::for_round(round, VIEW_ROWS_DEFAULT);
            println!("seed: {:#010x}", round.seed);
            print!("{}", view.render(round));
            print!("{}", render_rung_legend(round, &view));
        }
        LadderCommand::Show { rows } => {
            let round = app.round()?;
            let view = TextView::for_round(round, rows);
            print!("{}", view.render(round));
            print!("{}", render_rung_legend(round, &view));
        }
        LadderCommand::Toggle {
            rung_id,
            row,
            lane,
            rows,
        } => {
            let rung_id = match (rung_id, row, lane) {
                (Some(id), _, _) => id,
                (None, Some(row), Some(lane)) => {
                    match rung_at_cell(app.round()?, rows, row, lane) {
                        Some(id) => id,
                        None => {
                            println!("no rung at row {row}, right of P{lane}");
                            return Ok(());
                        }
                    }
                }
                _ => return Ok(()),
            };
            let drawn = app.toggle_rung(rung_id)?;
            let known = app.round()?.ladder.contains(rung_id);
            match (drawn, known) {
                (true, true) => println!("{rung_id}: drawn"),
                (false, true) => println!("{rung_id}: erased"),
                (true, false) => println!("{rung_id}: marked, but no such rung on this ladder"),
                (false, false) => println!("{rung_id}: unmarked"),
            }
        }
        LadderCommand::Clear => {
            app.clear_lines()?;
            println!("all rungs erased");
        }
        LadderCommand::Reset { seed } => {
            let seed = seed.as_deref().map(parse_seed_arg).transpose()?;
            let round = app.reset_round(seed)?;
            let view = TextView::for_round(round, VIEW_ROWS_DEFAULT);
            println!("seed: {:#010x}", round.seed);
            print!("{}", view.render(round));
            print!("{}", render_rung_legend(round, &view));
        }
        LadderCommand::Result => {
            print!("{}", render_results(&app.results()?));
        }
    }
    Ok(())
}

/// Rung in the gap right of 1-based `lane` on `row` of a `rows`-row view.
/// The last lane has no gap to its right.
fn rung_at_cell(round: &RoundState, rows: usize, row: usize, lane: u32) -> Option<RungId> {
    if lane == 0 || lane >= round.lane_count() {
        return None;
    }
    TextView::for_round(round, rows).rung_at(row, lane - 1)
}

fn run_tasks<S: KeyValueStore>(app: &mut AppCore<S>, command: TaskCommand) -> Result<()> {
    match command {
        TaskCommand::Add { text, priority } => {
            let task = app.add_task(&text, priority)?;
            println!("added #{} [{}] {}", task.id, task.priority.label(), task.text);
        }
        TaskCommand::Toggle { id } => {
            let completed = app.toggle_task(id)?;
            let state = if completed { "completed" } else { "pending" };
            println!("#{id} is now {state}");
        }
        TaskCommand::Delete { id } => {
            let task = app.delete_task(id)?;
            println!("deleted #{} {}", task.id, task.text);
        }
        TaskCommand::List { filter } => {
            let mut empty = true;
            for task in app.tasks().filtered(filter) {
                empty = false;
                let mark = if task.completed { 'x' } else { ' ' };
                println!(
                    "[{mark}] #{:<4} {:<6} {}  {}",
                    task.id,
                    task.priority.label(),
                    task.text,
                    task.created_at.format("%m-%d %H:%M")
                );
            }
            if empty {
                println!("no tasks");
            }
        }
        TaskCommand::ClearCompleted => match app.clear_completed_tasks()? {
            0 => println!("no completed tasks"),
            removed => println!("removed {removed} completed task(s)"),
        },
        TaskCommand::Stats => {
            let stats = app.tasks().stats();
            println!(
                "total: {}  pending: {}  completed: {}",
                stats.total, stats.pending, stats.completed
            );
        }
    }
    Ok(())
}

fn parse_seed_arg(raw: &str) -> Result<u32> {
    let trimmed = raw.trim();
    let parsed = if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X"))
    {
        u32::from_str_radix(hex, 16)
    } else {
        trimmed.parse::<u32>()
    };
    parsed.map_err(|_| AppError::InvalidSeed(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn seeds_accept_decimal_and_hex() {
        assert_eq!(parse_seed_arg("42").ok(), Some(42));
        assert_eq!(parse_seed_arg(" 0x5EED ").ok(), Some(0x5EED));
        assert_eq!(parse_seed_arg("0XfF").ok(), Some(255));
        assert!(matches!(parse_seed_arg("seed"), Err(AppError::InvalidSeed(_))));
    }

    #[test]
    fn toggle_accepts_id_or_cell() {
        let cli = Cli::try_parse_from(["amidakuji", "ladder", "toggle", "h-1-4"]).expect("parse");
        match cli.command {
            Commands::Ladder {
                command: LadderCommand::Toggle { rung_id, row, .. },
            } => {
                assert_eq!(rung_id, Some(RungId::new(1, 4)));
                assert_eq!(row, None);
            }
            _ => panic!("unexpected command"),
        }
        let cli = Cli::try_parse_from(["amidakuji", "ladder", "toggle", "--row", "3", "--lane", "2"])
            .expect("parse");
        assert!(matches!(
            cli.command,
            Commands::Ladder {
                command: LadderCommand::Toggle {
                    rung_id: None,
                    row: Some(3),
                    lane: Some(2),
                    ..
                }
            }
        ));
        assert!(Cli::try_parse_from(["amidakuji", "ladder", "toggle", "bogus"]).is_err());
        assert!(Cli::try_parse_from(["amidakuji", "ladder", "toggle"]).is_err());
        assert!(
            Cli::try_parse_from(["amidakuji", "ladder", "toggle", "--row", "3", "--lane", "0"])
                .is_err()
        );
    }

    fn file_app(dir: &tempfile::TempDir) -> AppCore<FileStore> {
        AppCore::open(FileStore::open(dir.path()).expect("store")).expect("open")
    }

    fn toggle_cell(row: usize, lane: u32, rows: usize) -> LadderCommand {
        LadderCommand::Toggle {
            rung_id: None,
            row: Some(row),
            lane: Some(lane),
            rows,
        }
    }

    fn new_ladder(lanes: u32, seed: &str) -> LadderCommand {
        LadderCommand::New {
            lanes,
            seed: Some(seed.to_string()),
            width: DEFAULT_BOARD_WIDTH,
            height: DEFAULT_BOARD_HEIGHT,
        }
    }

    #[test]
    fn toggle_by_cell_ignores_lanes_without_a_gap() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = file_app(&dir);
        run_ladder(&mut app, new_ladder(3, "1")).expect("new");
        let round = app.round().expect("round").clone();
        let rung = round.ladder.rungs()[0];
        let row = TextView::for_round(&round, VIEW_ROWS_DEFAULT)
            .cell_of(rung.id)
            .expect("cell")
            .row;

        for lane in [0, 3, 7] {
            run_ladder(&mut app, toggle_cell(row, lane, VIEW_ROWS_DEFAULT)).expect("toggle");
        }
        assert!(app.round().expect("round").active.is_empty());

        let expected = rung_at_cell(&round, VIEW_ROWS_DEFAULT, row, rung.left_lane + 1)
            .expect("rung in cell");
        run_ladder(
            &mut app,
            toggle_cell(row, rung.left_lane + 1, VIEW_ROWS_DEFAULT),
        )
        .expect("toggle");
        let reopened = file_app(&dir);
        let active: Vec<RungId> = reopened.round().expect("round").active.iter().collect();
        assert_eq!(active, vec![expected]);
    }

    #[test]
    fn toggle_by_cell_uses_the_given_row_count() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = file_app(&dir);
        run_ladder(&mut app, new_ladder(5, "0x5EED")).expect("new");
        let round = app.round().expect("round").clone();
        let rung = round.ladder.rungs()[round.ladder.rungs().len() - 1];
        let cell = TextView::for_round(&round, 40)
            .cell_of(rung.id)
            .expect("cell");
        let expected = rung_at_cell(&round, 40, cell.row, cell.left_lane + 1).expect("rung");

        run_ladder(&mut app, toggle_cell(cell.row, cell.left_lane + 1, 40)).expect("toggle");
        assert!(app.round().expect("round").active.contains(expected));
        assert_eq!(app.round().expect("round").active.len(), 1);
    }

    #[test]
    fn ladder_handlers_persist_through_the_file_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = file_app(&dir);
        assert!(matches!(
            run_ladder(&mut app, LadderCommand::Result),
            Err(AppError::NoRound)
        ));
        assert!(matches!(
            run_ladder(&mut app, new_ladder(11, "1")),
            Err(AppError::InvalidLaneCount(11))
        ));
        assert!(matches!(
            run_ladder(&mut app, new_ladder(4, "seed")),
            Err(AppError::InvalidSeed(_))
        ));

        run_ladder(&mut app, new_ladder(4, "9")).expect("new");
        let id = app.round().expect("round").ladder.rungs()[0].id;
        let by_id = LadderCommand::Toggle {
            rung_id: Some(id),
            row: None,
            lane: None,
            rows: VIEW_ROWS_DEFAULT,
        };
        run_ladder(&mut app, by_id).expect("toggle");
        run_ladder(&mut app, LadderCommand::Result).expect("result");
        assert!(file_app(&dir).round().expect("round").active.contains(id));

        run_ladder(&mut app, LadderCommand::Clear).expect("clear");
        assert!(file_app(&dir).results().expect("results").is_identity());

        run_ladder(&mut app, LadderCommand::Reset { seed: Some("0x10".into()) }).expect("reset");
        let reopened = file_app(&dir);
        let round = reopened.round().expect("round");
        assert_eq!(round.seed, 16);
        assert_eq!(round.lane_count(), 4);
    }
}
