use pretty_assertions::assert_eq;

use ship_balance::grid::{ContainerId, COLS, ROWS};
use ship_balance::manifest::{load_manifest, outbound_path, parse_manifest, write_manifest};
use ship_balance::{solve, Coord, Exhaustion, Grid, SearchConfig, Slot, SolveOutcome};

fn occupied(weight: u32, id: u16) -> Slot {
    Slot::Occupied {
        weight,
        id: ContainerId(id),
    }
}

/// Blocks every cell not listed in `open`.
fn grid_with_open_cells(open: &[(Coord, Slot)]) -> Grid {
    let mut cells = Vec::with_capacity(ROWS * COLS);
    for row in 0..ROWS as u8 {
        for col in 0..COLS as u8 {
            let coord = Coord::new(row, col);
            let slot = open
                .iter()
                .find(|(c, _)| *c == coord)
                .map_or(Slot::Blocked, |&(_, slot)| slot);
            cells.push((coord, slot));
        }
    }
    Grid::from_slots(cells).unwrap()
}

#[test]
fn empty_ship_is_already_balanced() {
    let report = solve(Grid::new(), &SearchConfig::default());
    assert_eq!(report.outcome, SolveOutcome::AlreadyBalanced);
}

#[test]
fn single_container_is_already_balanced() {
    let grid = Grid::from_slots([(Coord::new(0, 2), occupied(5000, 0))]).unwrap();
    assert_eq!(
        solve(grid, &SearchConfig::default()).outcome,
        SolveOutcome::AlreadyBalanced
    );
}

#[test]
fn two_usable_rows_with_equal_sides_is_already_balanced() {
    let mut open = Vec::new();
    for row in 0..2u8 {
        for col in 0..COLS as u8 {
            open.push((Coord::new(row, col), Slot::Empty));
        }
    }
    open[0].1 = occupied(100, 0);
    open[COLS - 1].1 = occupied(100, 1);

    let report = solve(grid_with_open_cells(&open), &SearchConfig::default());
    assert_eq!(report.outcome, SolveOutcome::AlreadyBalanced);
}

#[test]
fn single_column_pair_needs_exactly_one_move() {
    let grid = grid_with_open_cells(&[
        (Coord::new(0, 5), occupied(100, 0)),
        (Coord::new(1, 5), occupied(100, 1)),
        (Coord::new(0, 6), Slot::Empty),
    ]);

    let report = solve(grid, &SearchConfig::default());
    let SolveOutcome::Solved(solution) = report.outcome else {
        panic!("expected one move, got {:?}", report.outcome);
    };

    assert_eq!(solution.moves.len(), 1);
    let step = solution.moves[0];
    assert_eq!((step.from, step.to), (Coord::new(1, 5), Coord::new(0, 6)));
    assert_eq!(step.container, ContainerId(1));
    // Travel (8,0)->(1,5) = 12; transfer: no lift, one column, one down.
    assert_eq!(step.step_cost, 12 + 2);
    assert_eq!(solution.move_cost, 14);
    assert_eq!(solution.park_cost, 14);
    assert_eq!(solution.total_cost, 28);
}

#[test]
fn full_ship_without_room_has_no_solution() {
    let mut cells = Vec::new();
    for row in 0..ROWS as u8 {
        for col in 0..COLS as u8 {
            let slot = match (row, (col as usize) < COLS / 2) {
                (0, _) => Slot::Blocked,
                (_, true) => occupied(900, 0),
                (_, false) => occupied(10, 0),
            };
            cells.push((Coord::new(row, col), slot));
        }
    }
    let report = solve(Grid::from_slots(cells).unwrap(), &SearchConfig::default());
    assert_eq!(report.outcome, SolveOutcome::NoSolution(Exhaustion::SearchSpace));
}

#[test]
fn repeated_solves_return_the_same_plan() {
    let grid = Grid::from_slots([
        (Coord::new(0, 0), occupied(100, 0)),
        (Coord::new(1, 0), occupied(30, 1)),
        (Coord::new(0, 3), occupied(60, 2)),
        (Coord::new(0, 8), occupied(10, 3)),
    ])
    .unwrap();

    let first = solve(grid.clone(), &SearchConfig::default());
    let second = solve(grid, &SearchConfig::default());
    assert!(matches!(first.outcome, SolveOutcome::Solved(_)));
    assert_eq!(first, second);
}

#[test]
fn manifest_file_round_trip_through_a_solve() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("ShipCase.txt");
    write_manifest(
        &input,
        "[01,01], {00000}, NAN\n\
         [01,02], {00300}, Steel\n\
         [01,03], {00100}, Wood\n\
         [02,02], {00200}, Glass\n\
         [01,12], {00000}, NAN\n",
    )
    .unwrap();

    let manifest = load_manifest(&input).unwrap();
    let report = solve(manifest.grid().clone(), &SearchConfig::default());
    let SolveOutcome::Solved(solution) = &report.outcome else {
        panic!("expected a plan, got {:?}", report.outcome);
    };

    let out = outbound_path(&input);
    write_manifest(&out, &manifest.render(&solution.final_grid)).unwrap();
    assert_eq!(out.file_name().unwrap(), "ShipCaseOUTBOUND.txt");

    let balanced = parse_manifest(&std::fs::read_to_string(&out).unwrap()).unwrap();
    let named = |m: &ship_balance::manifest::Manifest, grid: &Grid| {
        grid.containers()
            .map(|c| (c.coord, c.weight, m.name(c.id).to_owned()))
            .collect::<Vec<_>>()
    };
    assert_eq!(
        named(&balanced, balanced.grid()),
        named(&manifest, &solution.final_grid)
    );
    assert_eq!(balanced.grid().total_weight(), 600);
    assert_eq!(
        balanced.grid().slot(Coord::new(0, 0)),
        Slot::Blocked,
        "structural cells survive the rewrite"
    );
}

#[test]
fn missing_manifest_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_manifest(dir.path().join("absent.txt")).unwrap_err();
    assert!(err.to_string().starts_with("failed to read"));
}
