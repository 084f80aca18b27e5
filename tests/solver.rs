use std::rc::Rc;

use npuzzle::{
    generate, parse_board, solve, Board, Direction, GoalLayout, Heuristic, KeyTable, Outcome,
    SearchOptions, Tiles,
};
use pathfinding::directed::bfs::bfs;
use rand::{rngs::StdRng, SeedableRng};

fn neighbours(size: usize, tiles: &[u16]) -> Vec<Vec<u16>> {
    let blank = tiles.iter().position(|&t| t == 0).unwrap();
    let (x, y) = (blank % size, blank / size);
    let mut out = Vec::new();
    if x > 0 {
        out.push(blank - 1);
    }
    if x + 1 < size {
        out.push(blank + 1);
    }
    if y > 0 {
        out.push(blank - size);
    }
    if y + 1 < size {
        out.push(blank + size);
    }

    out.into_iter()
        .map(|target| {
            let mut next = tiles.to_vec();
            next.swap(blank, target);
            next
        })
        .collect()
}

fn shortest(initial: &Tiles, goal: &Tiles) -> usize {
    let path = bfs(
        &initial.tiles,
        |t| neighbours(initial.size, t),
        |t| *t == goal.tiles,
    )
    .unwrap();
    path.len() - 1
}

fn boards(initial: &Tiles, goal: &Tiles, seed: u64) -> (Board, Board) {
    let keys = Rc::new(KeyTable::with_seed(initial.size, seed));
    (
        Board::from_tiles(initial, &keys),
        Board::from_tiles(goal, &keys),
    )
}

fn replay(initial: &Board, moves: &[Direction]) -> Board {
    let mut board = initial.clone();
    for &m in moves {
        assert!(board.apply(m), "illegal move {} on\n{}", m, board);
    }
    board
}

fn solved_moves(initial: &Board, goal: &Board, options: &SearchOptions) -> Vec<Direction> {
    match solve(initial, goal, options).unwrap().outcome {
        Outcome::Solved(moves) => moves,
        other => panic!("expected a solution, got {:?}", other),
    }
}

#[test]
fn solutions_reach_the_goal_for_every_heuristic() {
    let mut rng = StdRng::seed_from_u64(17);
    let cases = [
        (3, GoalLayout::Snail, 60),
        (3, GoalLayout::Ordered, 60),
        (4, GoalLayout::Snail, 12),
    ];
    for (size, layout, scramble) in cases {
        let goal = generate::solved(size, layout).unwrap();
        let initial = generate::scrambled(&goal, scramble, &mut rng);
        let (initial, goal) = boards(&initial, &goal, 5);

        for heuristic in [Heuristic::Manhattan, Heuristic::Hamming, Heuristic::LinearConflict] {
            for greedy in [false, true] {
                let options = SearchOptions::default()
                    .with_heuristic(heuristic)
                    .with_greedy(greedy);
                let moves = solved_moves(&initial, &goal, &options);
                let end = replay(&initial, &moves);
                assert_eq!(end, goal, "{} greedy={}", heuristic, greedy);
                assert!(end.same_tiles(&goal));
            }
        }
    }
}

#[test]
fn admissible_search_matches_breadth_first() {
    let mut rng = StdRng::seed_from_u64(99);
    let goal = generate::solved(3, GoalLayout::Ordered).unwrap();

    for round in 0..4 {
        let initial = generate::scrambled(&goal, 30, &mut rng);
        let expected = shortest(&initial, &goal);
        let (initial, goal) = boards(&initial, &goal, round);

        for heuristic in [Heuristic::None, Heuristic::Manhattan, Heuristic::Hamming] {
            let options = SearchOptions::default().with_heuristic(heuristic);
            let moves = solved_moves(&initial, &goal, &options);
            assert_eq!(moves.len(), expected, "{} on\n{}", heuristic, initial);
            assert_eq!(replay(&initial, &moves), goal);
        }
    }
}

#[test]
fn pruning_keeps_optimal_length() {
    let mut rng = StdRng::seed_from_u64(4);
    let goal = generate::solved(3, GoalLayout::Snail).unwrap();

    for round in 0..8 {
        let initial = generate::scrambled(&goal, 50, &mut rng);
        let (initial, goal) = boards(&initial, &goal, round);

        let pruned = SearchOptions::default();
        let unpruned = SearchOptions::default().with_pruning(false);
        assert_eq!(
            solved_moves(&initial, &goal, &pruned).len(),
            solved_moves(&initial, &goal, &unpruned).len()
        );
    }
}

#[test]
fn random_boards_are_solved_or_rejected_by_parity() {
    let mut rng = StdRng::seed_from_u64(2024);
    let goal = generate::solved(3, GoalLayout::Ordered).unwrap();

    for round in 0..6 {
        let initial = generate::random(3, &mut rng).unwrap();
        let (initial, goal) = boards(&initial, &goal, round);
        let report = solve(&initial, &goal, &SearchOptions::default()).unwrap();

        if initial.is_solvable() == goal.is_solvable() {
            let moves = report.moves().unwrap();
            assert_eq!(replay(&initial, moves), goal);
            assert!(report.expanded_count() > 0);
            assert!(report.peak_resource_usage() >= report.expanded_count());
        } else {
            assert_eq!(report.outcome, Outcome::Unsolvable);
            assert_eq!(report.expanded_count(), 0);
        }
    }
}

#[test]
fn single_adjacent_swap_is_one_move() {
    let goal = generate::solved(3, GoalLayout::Ordered).unwrap();
    // blank exchanged with the 6 above it
    let initial = Tiles {
        size: 3,
        tiles: vec![1, 2, 3, 4, 5, 0, 7, 8, 6],
    };
    let (initial, goal) = boards(&initial, &goal, 1);

    let moves = solved_moves(&initial, &goal, &SearchOptions::default());
    assert_eq!(moves, vec![Direction::Down]);
}

#[test]
fn transposed_tiles_are_unsolvable() {
    let goal = generate::solved(3, GoalLayout::Ordered).unwrap();
    let initial = Tiles {
        size: 3,
        tiles: vec![2, 1, 3, 4, 5, 6, 7, 8, 0],
    };
    let (initial, goal) = boards(&initial, &goal, 1);

    for heuristic in Heuristic::ALL {
        let options = SearchOptions::default().with_heuristic(heuristic);
        let report = solve(&initial, &goal, &options).unwrap();
        assert_eq!(report.outcome, Outcome::Unsolvable);
        assert_eq!(report.expanded_count(), 0);
    }
}

#[test]
fn parsed_map_solves_to_snail_goal() {
    let initial = parse_board(
        "
# This puzzle is solvable
3
0 2 3
1 6 4
8 7 5
",
    )
    .unwrap();
    let goal = generate::solved(3, GoalLayout::Snail).unwrap();
    let expected = shortest(&initial, &goal);
    let (initial, goal) = boards(&initial, &goal, 8);

    let options = SearchOptions::default().with_heuristic(Heuristic::Manhattan);
    let moves = solved_moves(&initial, &goal, &options);
    assert_eq!(moves.len(), expected);
    assert_eq!(replay(&initial, &moves), goal);
}
