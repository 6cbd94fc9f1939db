//! Minimum-cost container relocation plans that balance a ship's port and
//! starboard weight.
//!
//! The ship is a fixed [`grid::ROWS`] x [`grid::COLS`] grid worked by a single
//! crane. Only the top container of a column can be lifted, and it always
//! comes to rest on the lowest free cell of its new column. [`solve`] runs a
//! best-first search over such relocations until port and starboard are
//! within ten percent of the total weight.
//!
//! ```
//! use ship_balance::{manifest::parse_manifest, solve, SearchConfig, SolveOutcome};
//!
//! let manifest = parse_manifest("\
//! [01,05], {00100}, Alpha
//! [01,06], {00100}, Beta
//! ").unwrap();
//!
//! let report = solve(manifest.grid().clone(), &SearchConfig::default());
//! let SolveOutcome::Solved(plan) = report.outcome else { panic!() };
//! assert_eq!(plan.moves.len(), 1);
//! ```

pub mod config;
pub mod error;
pub mod grid;
pub mod heuristic;
pub mod manifest;
pub mod moves;
pub mod node;
pub mod search;
pub mod session;
pub mod solution;

pub use config::SearchConfig;
pub use error::BalanceError;
pub use grid::{Coord, Grid, Slot};
pub use search::{BalanceSearch, SearchStats};
pub use solution::{Exhaustion, PlannedMove, Solution, SolveOutcome, SolveReport};

/// Runs one balancing search on `grid`.
pub fn solve(grid: Grid, config: &SearchConfig) -> SolveReport {
    BalanceSearch::new(grid, *config).solve()
}
