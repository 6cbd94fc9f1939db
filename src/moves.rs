//! Physically legal relocations and their crane cost.
//!
//! Only the top container of a column can be picked up, and a container can
//! only be set down on the lowest empty cell of another column.

use arrayvec::ArrayVec;
use smallvec::SmallVec;

use crate::grid::{Container, Coord, Grid, COLS, ROWS};
use crate::heuristic::Heuristic;
use crate::node::{NodeId, Relocation, StateNode};

pub type RelocationVec = SmallVec<[Relocation; COLS * (COLS - 1)]>;

/// Cost breakdown of a single relocation.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct MoveCost {
    /// Empty crane travel from its current position to the container.
    pub travel: u32,
    pub lift: u32,
    pub horizontal: u32,
    pub drop: u32,
}

impl MoveCost {
    #[inline(always)]
    pub fn transfer(self) -> u32 {
        self.lift + self.horizontal + self.drop
    }

    #[inline(always)]
    pub fn total(self) -> u32 {
        self.travel + self.transfer()
    }
}

/// Top container of every non-empty column.
pub fn movable_containers(grid: &Grid) -> ArrayVec<Container, COLS> {
    (0..COLS)
        .filter_map(|col| {
            grid.top_occupied(col)
                .and_then(|row| grid.container_at(Coord::new(row as u8, col as u8)))
        })
        .collect()
}

/// Lowest empty cell of every column that still has room.
pub fn landing_cells(grid: &Grid) -> ArrayVec<Coord, COLS> {
    (0..COLS)
        .filter_map(|col| {
            grid.lowest_empty(col)
                .map(|row| Coord::new(row as u8, col as u8))
        })
        .collect()
}

/// All legal relocations, ordered by source column then destination column.
pub fn legal_relocations(grid: &Grid) -> RelocationVec {
    let landings = landing_cells(grid);
    let mut relocations = RelocationVec::new();
    for container in movable_containers(grid) {
        for &to in &landings {
            if to.col != container.coord.col {
                relocations.push(Relocation {
                    from: container.coord,
                    to,
                });
            }
        }
    }
    relocations
}

/// Highest occupied row among the columns strictly between `a` and `b`.
#[inline]
fn tallest_between(grid: &Grid, a: usize, b: usize) -> Option<usize> {
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    (lo + 1..hi).filter_map(|col| grid.top_occupied(col)).max()
}

/// Cost of carrying a container from `from` to `to` with the crane starting at `crane`.
///
/// The load is raised until it clears every stack between the two columns,
/// moved across, then lowered onto the landing cell.
pub fn move_cost(grid: &Grid, crane: Coord, from: Coord, to: Coord) -> MoveCost {
    let clearance = tallest_between(grid, from.col as usize, to.col as usize)
        .map_or(0, |row| row + 1);
    let carry = (from.row as usize).max(clearance).max(to.row as usize);
    debug_assert!(carry <= ROWS);

    MoveCost {
        travel: crane.manhattan(from),
        lift: (carry - from.row as usize) as u32,
        horizontal: from.col.abs_diff(to.col) as u32,
        drop: (carry - to.row as usize) as u32,
    }
}

/// Every state reachable from `node` by relocating one container.
pub fn successors<'a>(
    node: &'a StateNode,
    id: NodeId,
    heuristic: Heuristic,
) -> impl Iterator<Item = (StateNode, MoveCost)> + 'a {
    legal_relocations(node.grid())
        .into_iter()
        .map(move |relocation| {
            let cost = move_cost(node.grid(), node.crane(), relocation.from, relocation.to);
            let grid = node.grid().with_relocation(relocation.from, relocation.to);
            let next = StateNode::new(
                grid,
                relocation.to,
                node.g_cost() + cost.total(),
                Some(id),
                Some(relocation),
                heuristic,
            );
            (next, cost)
        })
}
