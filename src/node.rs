//! Search states: one grid snapshot plus the crane and cost bookkeeping.

use smallvec::SmallVec;

use crate::grid::{Container, Coord, Grid, PARK};
use crate::heuristic::Heuristic;

pub type ContainerVec = SmallVec<[Container; 24]>;

/// Index of a node in the search arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One container relocation, source to destination.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Relocation {
    pub from: Coord,
    pub to: Coord,
}

/// Aggregate weight per side of the centerline.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct SideWeights {
    pub port: u64,
    pub starboard: u64,
}

impl SideWeights {
    pub fn of(containers: &[Container]) -> Self {
        containers
            .iter()
            .fold(SideWeights::default(), |mut sides, c| {
                if c.coord.is_port() {
                    sides.port += c.weight as u64;
                } else {
                    sides.starboard += c.weight as u64;
                }
                sides
            })
    }

    #[inline(always)]
    pub fn total(self) -> u64 {
        self.port + self.starboard
    }

    #[inline(always)]
    pub fn difference(self) -> u64 {
        self.port.abs_diff(self.starboard)
    }
}

/// Order-independent fingerprint of a state's occupancy.
///
/// Sorted `(weight, row, col)` entries packed into `u64`s. The crane
/// position is only part of the key when the search is configured for it.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct StateKey(SmallVec<[u64; 24]>);

const CRANE_TAG: u64 = 1 << 48;

impl StateKey {
    pub fn new(containers: &[Container], crane: Option<Coord>) -> Self {
        let mut entries: SmallVec<[u64; 24]> = containers
            .iter()
            .map(|c| ((c.weight as u64) << 16) | c.coord.pack() as u64)
            .collect();
        entries.sort_unstable();
        if let Some(crane) = crane {
            entries.push(CRANE_TAG | crane.pack() as u64);
        }
        StateKey(entries)
    }
}

#[derive(Clone, Debug)]
pub struct StateNode {
    grid: Grid,
    containers: ContainerVec,
    crane: Coord,
    g_cost: u32,
    h_cost: u32,
    parent: Option<NodeId>,
    relocation: Option<Relocation>,
}

impl StateNode {
    /// The starting state, crane parked.
    pub fn root(grid: Grid, heuristic: Heuristic) -> Self {
        Self::new(grid, PARK, 0, None, None, heuristic)
    }

    pub fn new(
        grid: Grid,
        crane: Coord,
        g_cost: u32,
        parent: Option<NodeId>,
        relocation: Option<Relocation>,
        heuristic: Heuristic,
    ) -> Self {
        let containers: ContainerVec = grid.containers().collect();
        let h_cost = heuristic.estimate(&containers);
        StateNode {
            grid,
            containers,
            crane,
            g_cost,
            h_cost,
            parent,
            relocation,
        }
    }

    #[inline(always)]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline(always)]
    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    #[inline(always)]
    pub fn crane(&self) -> Coord {
        self.crane
    }

    #[inline(always)]
    pub fn g_cost(&self) -> u32 {
        self.g_cost
    }

    #[inline(always)]
    pub fn h_cost(&self) -> u32 {
        self.h_cost
    }

    #[inline(always)]
    pub fn f_cost(&self) -> u32 {
        self.g_cost + self.h_cost
    }

    #[inline(always)]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline(always)]
    pub fn relocation(&self) -> Option<Relocation> {
        self.relocation
    }

    pub fn key(&self, include_crane: bool) -> StateKey {
        StateKey::new(&self.containers, include_crane.then_some(self.crane))
    }

    pub fn side_weights(&self) -> SideWeights {
        SideWeights::of(&self.containers)
    }

    /// Goal test: port and starboard within 10% of the total weight.
    pub fn is_balanced(&self) -> bool {
        match self.containers.as_slice() {
            [] | [_] => true,
            [a, b] if a.coord.is_port() != b.coord.is_port() => true,
            _ => {
                let sides = self.side_weights();
                // |port - starboard| < 0.10 * total, in integers.
                sides.difference() * 10 < sides.total()
            }
        }
    }
}
