//! Turning a goal node back into an ordered list of crane moves.

use crate::grid::{ContainerId, Coord, Grid, PARK};
use crate::node::{NodeId, StateNode};
use crate::search::SearchStats;

/// One crane move of a solved plan.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PlannedMove {
    pub from: Coord,
    pub to: Coord,
    pub container: ContainerId,
    pub weight: u32,
    /// Cost of this move alone: crane travel plus transfer.
    pub step_cost: u32,
    /// Cost of every move up to and including this one.
    pub cumulative_cost: u32,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Solution {
    pub moves: Vec<PlannedMove>,
    /// Sum of all move costs.
    pub move_cost: u32,
    /// Crane trip from the last drop back to its parked position.
    pub park_cost: u32,
    pub total_cost: u32,
    /// Grid after the last move.
    pub final_grid: Grid,
}

/// Why a search ended without reaching a balanced state.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Exhaustion {
    /// Every reachable state was expanded.
    SearchSpace,
    /// The configured expansion cap was hit first.
    ExpansionLimit,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SolveOutcome {
    AlreadyBalanced,
    Solved(Solution),
    NoSolution(Exhaustion),
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SolveReport {
    pub outcome: SolveOutcome,
    pub stats: SearchStats,
}

/// Walks parent links from `goal` to the root and replays them in order.
pub fn reconstruct(arena: &[StateNode], goal: NodeId) -> Solution {
    let mut path = Vec::new();
    let mut cursor = Some(goal);
    while let Some(id) = cursor {
        let node = &arena[id.index()];
        path.push(node);
        cursor = node.parent();
    }
    path.reverse();

    let moves: Vec<PlannedMove> = path
        .windows(2)
        .filter_map(|pair| {
            let (before, after) = (pair[0], pair[1]);
            let relocation = after.relocation()?;
            let moved = after.grid().container_at(relocation.to)?;
            Some(PlannedMove {
                from: relocation.from,
                to: relocation.to,
                container: moved.id,
                weight: moved.weight,
                step_cost: after.g_cost() - before.g_cost(),
                cumulative_cost: after.g_cost(),
            })
        })
        .collect();
    debug_assert_eq!(moves.len(), path.len() - 1, "every non-root node records its move");

    let goal_node = &arena[goal.index()];
    let move_cost = goal_node.g_cost();
    let park_cost = goal_node.crane().manhattan(PARK);

    Solution {
        moves,
        move_cost,
        park_cost,
        total_cost: move_cost + park_cost,
        final_grid: goal_node.grid().clone(),
    }
}
