//! Fixed-size cargo grid.
//!
//! Row 0 is the deck level and rows grow upward, so "top" of a column is the
//! highest occupied row index. Columns `0..PORT_COLS` are port side, the rest
//! starboard.

use std::fmt;

use crate::error::BalanceError;

pub const ROWS: usize = 8;
pub const COLS: usize = 12;
pub const PORT_COLS: usize = COLS / 2;

/// Crane rest position, one row above the grid over the first column.
pub const PARK: Coord = Coord::new(ROWS as u8, 0);

/// Zero-indexed grid coordinate.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[repr(C)]
pub struct Coord {
    pub row: u8,
    pub col: u8,
}

impl Coord {
    #[inline(always)]
    pub const fn new(row: u8, col: u8) -> Self {
        Coord { row, col }
    }

    #[inline(always)]
    pub fn manhattan(self, other: Coord) -> u32 {
        self.row.abs_diff(other.row) as u32 + self.col.abs_diff(other.col) as u32
    }

    #[inline(always)]
    pub fn is_port(self) -> bool {
        (self.col as usize) < PORT_COLS
    }

    #[inline(always)]
    pub(crate) fn pack(self) -> u16 {
        ((self.row as u16) << 8) | self.col as u16
    }
}

/// Prints the 1-indexed manifest form, e.g. `[01,07]`.
impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:02},{:02}]", self.row as u32 + 1, self.col as u32 + 1)
    }
}

/// Handle to a container name held by the manifest that produced the grid.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct ContainerId(pub u16);

/// State of one grid cell. Only `Occupied` carries weight.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Slot {
    Blocked,
    #[default]
    Empty,
    Occupied { weight: u32, id: ContainerId },
}

impl Slot {
    #[inline(always)]
    pub fn weight(self) -> u32 {
        match self {
            Slot::Occupied { weight, .. } => weight,
            Slot::Blocked | Slot::Empty => 0,
        }
    }

    #[inline(always)]
    pub fn is_occupied(self) -> bool {
        matches!(self, Slot::Occupied { .. })
    }

    #[inline(always)]
    pub fn is_empty(self) -> bool {
        matches!(self, Slot::Empty)
    }
}

/// An occupied cell together with its position.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Container {
    pub coord: Coord,
    pub weight: u32,
    pub id: ContainerId,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Grid {
    cells: [[Slot; COLS]; ROWS],
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    /// An all-empty grid.
    pub fn new() -> Self {
        Grid {
            cells: [[Slot::Empty; COLS]; ROWS],
        }
    }

    /// Builds a grid from explicit cells; anything not supplied stays empty.
    pub fn from_slots<I>(slots: I) -> Result<Self, BalanceError>
    where
        I: IntoIterator<Item = (Coord, Slot)>,
    {
        let mut grid = Grid::new();
        for (coord, slot) in slots {
            if !Self::contains(coord) {
                return Err(BalanceError::SlotOutOfBounds {
                    row: coord.row as usize,
                    col: coord.col as usize,
                });
            }
            grid.cells[coord.row as usize][coord.col as usize] = slot;
        }
        Ok(grid)
    }

    #[inline(always)]
    pub fn contains(coord: Coord) -> bool {
        (coord.row as usize) < ROWS && (coord.col as usize) < COLS
    }

    /// Panics if `coord` lies outside the grid.
    #[inline(always)]
    pub fn slot(&self, coord: Coord) -> Slot {
        self.cells[coord.row as usize][coord.col as usize]
    }

    /// Every cell in row-major order, deck row first.
    pub fn slots(&self) -> impl Iterator<Item = (Coord, Slot)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, &slot)| (Coord::new(row as u8, col as u8), slot))
        })
    }

    #[inline]
    pub fn container_at(&self, coord: Coord) -> Option<Container> {
        match self.slot(coord) {
            Slot::Occupied { weight, id } => Some(Container { coord, weight, id }),
            Slot::Blocked | Slot::Empty => None,
        }
    }

    /// Occupied cells in row-major order.
    pub fn containers(&self) -> impl Iterator<Item = Container> + '_ {
        self.slots()
            .filter_map(move |(coord, _)| self.container_at(coord))
    }

    /// Row of the container with nothing stacked above it in `col`.
    #[inline]
    pub fn top_occupied(&self, col: usize) -> Option<usize> {
        (0..ROWS).rev().find(|&row| self.cells[row][col].is_occupied())
    }

    /// Row a container dropped into `col` would come to rest in.
    #[inline]
    pub fn lowest_empty(&self, col: usize) -> Option<usize> {
        (0..ROWS).find(|&row| self.cells[row][col].is_empty())
    }

    /// Copy of this grid with the container at `from` relocated to `to`.
    pub(crate) fn with_relocation(&self, from: Coord, to: Coord) -> Grid {
        let moved = self.slot(from);
        debug_assert!(moved.is_occupied());
        debug_assert!(self.slot(to).is_empty());

        let mut next = self.clone();
        next.cells[from.row as usize][from.col as usize] = Slot::Empty;
        next.cells[to.row as usize][to.col as usize] = moved;
        next
    }

    pub fn total_weight(&self) -> u64 {
        self.containers().map(|c| c.weight as u64).sum()
    }
}
