//! Remaining-cost estimates for the best-first search.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::grid::{Container, PORT_COLS};
use crate::node::SideWeights;

/// How the search estimates the cost still needed to balance a state.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Heuristic {
    /// Column distance the heaviest containers must cover to cross the
    /// centerline. Fast, but not proven to be a lower bound.
    #[default]
    Greedy,
    /// Always zero, which turns the search into uniform-cost search.
    Zero,
}

impl Heuristic {
    #[inline]
    pub fn estimate(self, containers: &[Container]) -> u32 {
        match self {
            Heuristic::Greedy => greedy_crossing_distance(containers),
            Heuristic::Zero => 0,
        }
    }
}

/// Columns between `col` and the nearest column of the opposite side.
#[inline(always)]
pub fn distance_to_other_side(col: usize) -> u32 {
    if col < PORT_COLS {
        (PORT_COLS - col) as u32
    } else {
        (col + 1 - PORT_COLS) as u32
    }
}

fn greedy_crossing_distance(containers: &[Container]) -> u32 {
    let sides = SideWeights::of(containers);
    if sides.port == sides.starboard {
        return 0;
    }

    let heavy_is_port = sides.port > sides.starboard;
    // Each unit of weight moved across shrinks the difference by two.
    let deficit = sides.difference().div_ceil(2);

    let mut heavy: SmallVec<[&Container; 48]> = containers
        .iter()
        .filter(|c| c.coord.is_port() == heavy_is_port)
        .collect();
    heavy.sort_by(|a, b| b.weight.cmp(&a.weight));

    let mut covered = 0u64;
    let mut estimate = 0u32;
    for container in heavy {
        if covered >= deficit {
            break;
        }
        covered += container.weight as u64;
        estimate += distance_to_other_side(container.coord.col as usize);
    }
    estimate
}
