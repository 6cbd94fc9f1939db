use proptest::prelude::*;

use ship_balance::grid::{ContainerId, COLS, PORT_COLS, ROWS};
use ship_balance::heuristic::Heuristic;
use ship_balance::moves::{legal_relocations, successors};
use ship_balance::node::{NodeId, StateNode};
use ship_balance::{solve, Coord, Grid, SearchConfig, Slot};

/// Per column: blocked cells at the bottom, then a stack of containers.
fn column() -> impl Strategy<Value = (usize, Vec<u32>)> {
    (0usize..=2, prop::collection::vec(0u32..=2000, 0..=3))
}

fn gravity_grid() -> impl Strategy<Value = Grid> {
    prop::collection::vec(column(), COLS).prop_map(|columns| {
        let mut cells = Vec::new();
        let mut next_id = 0u16;
        for (col, (blocked, weights)) in columns.into_iter().enumerate() {
            for row in 0..blocked {
                cells.push((Coord::new(row as u8, col as u8), Slot::Blocked));
            }
            for (offset, weight) in weights.into_iter().enumerate() {
                let row = blocked + offset;
                if row < ROWS {
                    cells.push((
                        Coord::new(row as u8, col as u8),
                        Slot::Occupied {
                            weight,
                            id: ContainerId(next_id),
                        },
                    ));
                    next_id += 1;
                }
            }
        }
        Grid::from_slots(cells).unwrap()
    })
}

fn small_grid() -> impl Strategy<Value = Grid> {
    prop::collection::vec((0u8..COLS as u8, 1u32..500), 2..=4).prop_map(|items| {
        let mut grid_cells: Vec<(Coord, Slot)> = Vec::new();
        let mut heights = [0u8; COLS];
        for (i, (col, weight)) in items.into_iter().enumerate() {
            let row = heights[col as usize];
            heights[col as usize] += 1;
            grid_cells.push((
                Coord::new(row, col),
                Slot::Occupied {
                    weight,
                    id: ContainerId(i as u16),
                },
            ));
        }
        Grid::from_slots(grid_cells).unwrap()
    })
}

proptest! {
    #[test]
    fn balance_matches_ten_percent_rule(grid in gravity_grid()) {
        let node = StateNode::root(grid.clone(), Heuristic::Greedy);
        let containers: Vec<_> = grid.containers().collect();

        let port: u64 = containers.iter().filter(|c| (c.coord.col as usize) < PORT_COLS).map(|c| c.weight as u64).sum();
        let starboard: u64 = containers.iter().filter(|c| (c.coord.col as usize) >= PORT_COLS).map(|c| c.weight as u64).sum();

        let expected = match containers.as_slice() {
            [] | [_] => true,
            [a, b] if ((a.coord.col as usize) < PORT_COLS) != ((b.coord.col as usize) < PORT_COLS) => true,
            _ => port.abs_diff(starboard) * 10 < port + starboard,
        };
        prop_assert_eq!(node.is_balanced(), expected);
    }

    #[test]
    fn opposite_pair_is_always_balanced(
        port_col in 0u8..PORT_COLS as u8,
        starboard_col in PORT_COLS as u8..COLS as u8,
        a in 0u32..100_000,
        b in 0u32..100_000,
    ) {
        let grid = Grid::from_slots([
            (Coord::new(0, port_col), Slot::Occupied { weight: a, id: ContainerId(0) }),
            (Coord::new(0, starboard_col), Slot::Occupied { weight: b, id: ContainerId(1) }),
        ]).unwrap();
        prop_assert!(StateNode::root(grid, Heuristic::Greedy).is_balanced());
    }

    #[test]
    fn relocations_are_physically_legal(grid in gravity_grid()) {
        for relocation in legal_relocations(&grid) {
            let (from, to) = (relocation.from, relocation.to);
            prop_assert_ne!(from.col, to.col);
            prop_assert!(grid.slot(from).is_occupied());
            for row in from.row as usize + 1..ROWS {
                prop_assert!(!grid.slot(Coord::new(row as u8, from.col)).is_occupied());
            }
            prop_assert!(grid.slot(to).is_empty());
            for row in 0..to.row as usize {
                prop_assert!(!grid.slot(Coord::new(row as u8, to.col)).is_empty());
            }
        }
    }

    #[test]
    fn successors_change_two_cells_and_keep_weight(grid in gravity_grid()) {
        let root = StateNode::root(grid.clone(), Heuristic::Greedy);
        for (child, cost) in successors(&root, NodeId(0), Heuristic::Greedy) {
            let changed = grid
                .slots()
                .zip(child.grid().slots())
                .filter(|(before, after)| before != after)
                .count();
            prop_assert_eq!(changed, 2);
            prop_assert_eq!(child.grid().total_weight(), grid.total_weight());
            prop_assert_eq!(child.g_cost(), cost.total());
            prop_assert!(cost.horizontal >= 1);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn solving_twice_gives_the_same_answer(grid in small_grid()) {
        let config = SearchConfig {
            max_expansions: Some(300),
            ..SearchConfig::default()
        };
        let first = solve(grid.clone(), &config);
        let second = solve(grid, &config);
        prop_assert_eq!(first, second);
    }
}
