use std::{fmt, str::FromStr};

use itertools::Itertools;
use smallvec::SmallVec;

use crate::board::{Board, BLANK};

/// Distance estimates towards a goal board.
///
/// Every variant has a from-scratch `full` and an incremental `update`; for
/// any legal move `full(after) == full(before) + update(before, target)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Heuristic {
    None,
    #[default]
    Manhattan,
    /// Tiles that are out of both their goal row and their goal column.
    Hamming,
    LinearConflict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Row,
    Column,
}

#[auto_enums::auto_enum(Iterator)]
fn line(size: usize, axis: Axis, index: usize) -> impl Iterator<Item = usize> {
    match axis {
        Axis::Row => index * size..(index + 1) * size,
        Axis::Column => (index..size * size).step_by(size),
    }
}

fn assert_same_size(board: &Board, goal: &Board) {
    assert_eq!(board.size(), goal.size(), "incompatible board sizes");
}

fn distance((ax, ay): (usize, usize), (bx, by): (usize, usize)) -> i32 {
    (ax.abs_diff(bx) + ay.abs_diff(by)) as i32
}

fn goal_of(goal: &Board, tile: u16) -> (usize, usize) {
    goal.coords(goal.find(tile))
}

fn manhattan(board: &Board, goal: &Board) -> i32 {
    board
        .tiles()
        .iter()
        .enumerate()
        .filter(|&(_, &tile)| tile != BLANK)
        .map(|(ix, &tile)| distance(board.coords(ix), goal_of(goal, tile)))
        .sum()
}

fn out_of_row_and_column(at: (usize, usize), target: (usize, usize)) -> i32 {
    (at.0 != target.0 && at.1 != target.1) as i32
}

fn hamming(board: &Board, goal: &Board) -> i32 {
    board
        .tiles()
        .iter()
        .enumerate()
        .filter(|&(_, &tile)| tile != BLANK)
        .map(|(ix, &tile)| out_of_row_and_column(board.coords(ix), goal_of(goal, tile)))
        .sum()
}

/// For tiles on `axis` line `index` whose goal is on the same line: their
/// goal coordinate along the line, in board order.
fn goal_order(board: &Board, goal: &Board, axis: Axis, index: usize) -> SmallVec<[usize; 8]> {
    line(board.size(), axis, index)
        .map(|ix| board.tiles()[ix])
        .filter(|&tile| tile != BLANK)
        .filter_map(|tile| {
            let (gx, gy) = goal_of(goal, tile);
            match axis {
                Axis::Row => (gy == index).then_some(gx),
                Axis::Column => (gx == index).then_some(gy),
            }
        })
        .collect()
}

fn conflicts(board: &Board, goal: &Board) -> i32 {
    let mut total = 0;
    for axis in [Axis::Row, Axis::Column] {
        for index in 0..board.size() {
            total += goal_order(board, goal, axis, index)
                .iter()
                .tuple_combinations()
                .filter(|(a, b)| a > b)
                .count();
        }
    }

    total as i32
}

/// Conflicts `tile` would have if it sat at `at`, counted on the `axis` line
/// through `at` only.
fn conflicts_of(board: &Board, goal: &Board, tile: u16, at: (usize, usize), axis: Axis) -> i32 {
    let (gx, gy) = goal_of(goal, tile);
    let (index, along, goal_along) = match axis {
        Axis::Row => (at.1, at.0, gx),
        Axis::Column => (at.0, at.1, gy),
    };
    let goal_index = match axis {
        Axis::Row => gy,
        Axis::Column => gx,
    };
    if goal_index != index {
        return 0;
    }

    let mut count = 0;
    for ix in line(board.size(), axis, index) {
        let other = board.tiles()[ix];
        if other == BLANK || other == tile {
            continue;
        }

        let (ox, oy) = board.coords(ix);
        let (ogx, ogy) = goal_of(goal, other);
        let (other_index, other_along, other_goal_along) = match axis {
            Axis::Row => (ogy, ox, ogx),
            Axis::Column => (ogx, oy, ogy),
        };
        if other_index == index && (other_along < along) != (other_goal_along < goal_along) {
            count += 1;
        }
    }

    count
}

impl Heuristic {
    pub const ALL: [Heuristic; 4] = [
        Heuristic::None,
        Heuristic::Manhattan,
        Heuristic::Hamming,
        Heuristic::LinearConflict,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Heuristic::None => "none",
            Heuristic::Manhattan => "manhattan",
            Heuristic::Hamming => "hamming",
            Heuristic::LinearConflict => "linear-conflict",
        }
    }

    /// Evaluates `board` against `goal` from scratch.
    ///
    /// Panics if the boards differ in size.
    pub fn full(self, board: &Board, goal: &Board) -> i32 {
        assert_same_size(board, goal);
        match self {
            Heuristic::None => 0,
            Heuristic::Manhattan => manhattan(board, goal),
            Heuristic::Hamming => hamming(board, goal),
            Heuristic::LinearConflict => manhattan(board, goal) + 2 * conflicts(board, goal),
        }
    }

    /// Change in `full` caused by sliding the tile at `target` into the blank.
    /// Must be called before the swap is applied.
    ///
    /// Panics if the boards differ in size.
    pub fn update(self, board: &Board, goal: &Board, target: usize) -> i32 {
        assert_same_size(board, goal);
        let tile = board.tiles()[target];
        let from = board.coords(target);
        let to = board.coords(board.blank());
        let wanted = goal_of(goal, tile);

        match self {
            Heuristic::None => 0,
            Heuristic::Manhattan => distance(to, wanted) - distance(from, wanted),
            Heuristic::Hamming => {
                out_of_row_and_column(to, wanted) - out_of_row_and_column(from, wanted)
            }
            Heuristic::LinearConflict => {
                // a horizontal slide keeps the tile's order within its row,
                // so only the two columns change, and vice versa
                let axis = if from.1 == to.1 { Axis::Column } else { Axis::Row };
                let before = conflicts_of(board, goal, tile, from, axis);
                let after = conflicts_of(board, goal, tile, to, axis);
                distance(to, wanted) - distance(from, wanted) + 2 * (after - before)
            }
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Heuristic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" | "nh" => Ok(Heuristic::None),
            "manhattan" | "mh" => Ok(Heuristic::Manhattan),
            "hamming" | "rc" => Ok(Heuristic::Hamming),
            "linear-conflict" | "lc" => Ok(Heuristic::LinearConflict),
            _ => Err(format!(
                "unknown heuristic `{}`, expected one of: {}",
                s,
                Heuristic::ALL.iter().map(|h| h.name()).join(", ")
            )),
        }
    }
}

#[cfg(test)]
mod test {
    use std::rc::Rc;

    use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

    use super::*;
    use crate::{board::Direction, keys::KeyTable};

    fn boards(size: usize, seed: u64, count: usize) -> (Rc<KeyTable>, Vec<Board>) {
        let keys = Rc::new(KeyTable::with_seed(size, seed));
        let mut rng = StdRng::seed_from_u64(seed);
        let mut tiles: Vec<u16> = (0..(size * size) as u16).collect();
        let boards = (0..count)
            .map(|_| {
                tiles.shuffle(&mut rng);
                Board::new(tiles.clone(), &keys)
            })
            .collect();
        (keys, boards)
    }

    #[test]
    fn incremental_update_matches_full() {
        for (size, seed) in [(3, 1), (4, 2), (5, 3)] {
            let (_, mut all) = boards(size, seed, 60);
            let goal = all.pop().unwrap();

            for board in &all {
                for heuristic in Heuristic::ALL {
                    let before = heuristic.full(board, &goal);
                    for d in Direction::ALL {
                        let target = board.neighbor(d);
                        if !board.in_bounds(target) {
                            continue;
                        }
                        let target = target.index(size);

                        let delta = heuristic.update(board, &goal, target);
                        let mut next = board.clone();
                        next.swap(target);
                        assert_eq!(
                            heuristic.full(&next, &goal),
                            before + delta,
                            "{} on\n{}moving {}",
                            heuristic,
                            board,
                            d
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn scores_for_known_board() {
        let keys = Rc::new(KeyTable::with_seed(3, 0));
        let goal = Board::new(vec![1, 2, 3, 4, 5, 6, 7, 8, 0], &keys);
        let board = Board::new(vec![3, 2, 1, 4, 5, 6, 7, 8, 0], &keys);

        assert_eq!(Heuristic::None.full(&board, &goal), 0);
        assert_eq!(Heuristic::Manhattan.full(&board, &goal), 4);
        // 1 and 3 keep their row, so neither is out of both
        assert_eq!(Heuristic::Hamming.full(&board, &goal), 0);
        // (3,2) (3,1) (2,1)
        assert_eq!(Heuristic::LinearConflict.full(&board, &goal), 4 + 2 * 3);

        for heuristic in Heuristic::ALL {
            assert_eq!(heuristic.full(&goal, &goal), 0);
        }
    }

    #[test]
    fn hamming_counts_tiles_out_of_row_and_column() {
        let keys = Rc::new(KeyTable::with_seed(3, 0));
        let goal = Board::new(vec![1, 2, 3, 4, 5, 6, 7, 8, 0], &keys);
        let board = Board::new(vec![5, 2, 3, 4, 1, 6, 7, 8, 0], &keys);
        assert_eq!(Heuristic::Hamming.full(&board, &goal), 2);
    }

    #[test]
    #[should_panic(expected = "incompatible board sizes")]
    fn mismatched_sizes_panic() {
        let (_, small) = boards(3, 1, 1);
        let (_, large) = boards(4, 1, 1);
        Heuristic::Manhattan.full(&small[0], &large[0]);
    }

    #[test]
    fn parses_names_and_short_flags() {
        for heuristic in Heuristic::ALL {
            assert_eq!(heuristic.name().parse::<Heuristic>(), Ok(heuristic));
        }
        assert_eq!("lc".parse::<Heuristic>(), Ok(Heuristic::LinearConflict));
        assert!("euclid".parse::<Heuristic>().is_err());
    }
}
