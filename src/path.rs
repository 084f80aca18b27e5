use rustc_hash::FxHashMap;

use crate::board::{Board, Direction};

/// Walks `predecessor` back from `goal` until the board hashes to `initial`,
/// returning the forward move sequence.
///
/// Returns `None` if the chain is broken: a hash with no recorded move, a
/// step that would leave the board, or a chain longer than the table.
pub fn reconstruct(
    goal: &Board,
    initial: u64,
    predecessor: &FxHashMap<u64, Direction>,
) -> Option<Vec<Direction>> {
    let mut current = goal.clone();
    let mut moves = Vec::new();

    while current.hash() != initial {
        if moves.len() > predecessor.len() {
            return None;
        }

        let forward = *predecessor.get(&current.hash())?;
        if !current.apply(forward.opposite()) {
            return None;
        }
        moves.push(forward);
    }

    moves.reverse();
    Some(moves)
}

/// Every board from `initial` through the end of `moves`, or `None` if a
/// move would leave the board.
pub fn replay(initial: &Board, moves: &[Direction]) -> Option<Vec<Board>> {
    let mut boards = Vec::with_capacity(moves.len() + 1);
    boards.push(initial.clone());

    for &m in moves {
        let mut next = boards[boards.len() - 1].clone();
        if !next.apply(m) {
            return None;
        }
        boards.push(next);
    }

    Some(boards)
}
