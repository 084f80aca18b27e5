use std::{
    fmt::{self, Display},
    ops::Index,
    rc::Rc,
};

use itertools::Itertools;

use crate::{keys::KeyTable, parse::Tiles};

pub const BLANK: u16 = 0;

/// The direction the blank travels in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit vector as `(dx, dy)`, `y` growing downwards.
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Left => "Left",
            Direction::Right => "Right",
        };
        f.write_str(s)
    }
}

/// A grid coordinate that may lie off the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: isize,
    pub y: isize,
}

impl Point {
    pub fn in_bounds(self, size: usize) -> bool {
        (0..size as isize).contains(&self.x) && (0..size as isize).contains(&self.y)
    }

    /// Flat index; only meaningful when `in_bounds`.
    pub fn index(self, size: usize) -> usize {
        self.y as usize * size + self.x as usize
    }
}

/// One configuration of the puzzle plus the bookkeeping the search needs.
///
/// `positions` is the inverse of `tiles` and `hash` always equals the XOR of
/// the keys of every non-blank tile at its current cell; `swap` keeps both in
/// step without rescanning the grid.
#[derive(Debug, Clone)]
pub struct Board {
    size: usize,
    tiles: Vec<u16>,
    positions: Vec<usize>,
    blank: usize,
    hash: u64,
    keys: Rc<KeyTable>,
    pub(crate) depth: u32,
    pub(crate) score: i32,
    pub(crate) last_reverse: Option<Direction>,
}

impl Board {
    /// Wraps a flat permutation of `0..size²`. The permutation itself is
    /// trusted; see `parse` for validation.
    pub fn new(tiles: Vec<u16>, keys: &Rc<KeyTable>) -> Board {
        let size = keys.size();
        assert_eq!(tiles.len(), size * size, "tile count does not match key table");

        let mut positions = vec![0; tiles.len()];
        for (ix, &tile) in tiles.iter().enumerate() {
            positions[tile as usize] = ix;
        }

        let mut result = Board {
            size,
            blank: positions[BLANK as usize],
            tiles,
            positions,
            hash: 0,
            keys: Rc::clone(keys),
            depth: 0,
            score: 0,
            last_reverse: None,
        };
        result.hash = result.recompute_hash();
        result
    }

    pub fn from_tiles(tiles: &Tiles, keys: &Rc<KeyTable>) -> Board {
        assert_eq!(tiles.size, keys.size(), "board size does not match key table");
        Board::new(tiles.tiles.clone(), keys)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn tiles(&self) -> &[u16] {
        &self.tiles
    }

    pub fn keys(&self) -> &Rc<KeyTable> {
        &self.keys
    }

    pub fn hash(&self) -> u64 {
        self.hash
    }

    pub fn blank(&self) -> usize {
        self.blank
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn heuristic_score(&self) -> i32 {
        self.score
    }

    pub fn last_reverse_move(&self) -> Option<Direction> {
        self.last_reverse
    }

    /// `(x, y)` of a flat index.
    #[inline]
    pub fn coords(&self, position: usize) -> (usize, usize) {
        (position % self.size, position / self.size)
    }

    #[inline]
    pub fn find(&self, tile: u16) -> usize {
        self.positions[tile as usize]
    }

    /// The blank's position shifted by `direction`; not bounds checked.
    pub fn neighbor(&self, direction: Direction) -> Point {
        let (x, y) = self.coords(self.blank);
        let (dx, dy) = direction.offset();
        Point {
            x: x as isize + dx,
            y: y as isize + dy,
        }
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.in_bounds(self.size)
    }

    /// Moves the tile at `target` into the blank. `target` must be adjacent
    /// to the blank.
    pub fn swap(&mut self, target: usize) {
        let tile = self.tiles[target];
        let (tx, ty) = self.coords(target);
        let (bx, by) = self.coords(self.blank);

        self.hash ^= self.keys.key(tile, tx, ty);
        self.hash ^= self.keys.key(tile, bx, by);

        self.tiles[self.blank] = tile;
        self.tiles[target] = BLANK;
        self.positions[tile as usize] = self.blank;
        self.positions[BLANK as usize] = target;
        self.blank = target;
        self.depth += 1;
    }

    /// Slides the blank one step; returns false if that would leave the board.
    pub fn apply(&mut self, direction: Direction) -> bool {
        let target = self.neighbor(direction);
        if !self.in_bounds(target) {
            return false;
        }

        self.swap(target.index(self.size));
        true
    }

    pub fn recompute_hash(&self) -> u64 {
        self.tiles
            .iter()
            .enumerate()
            .filter(|&(_, &tile)| tile != BLANK)
            .fold(0, |hash, (ix, &tile)| {
                let (x, y) = self.coords(ix);
                hash ^ self.keys.key(tile, x, y)
            })
    }

    pub fn inversions(&self) -> usize {
        self.tiles
            .iter()
            .filter(|&&tile| tile != BLANK)
            .tuple_combinations()
            .filter(|(a, b)| a > b)
            .count()
    }

    /// Parity invariant of the configuration. Legal moves never change it,
    /// so two boards are mutually reachable iff their bits agree.
    ///
    /// Odd sizes: the inversion count must be even. Even sizes: every
    /// vertical move flips the inversion parity and the blank's row, so the
    /// inversion count plus the blank's distance from the last row must be
    /// even.
    pub fn is_solvable(&self) -> bool {
        let mut parity = self.inversions();
        if self.size % 2 == 0 {
            let (_, y) = self.coords(self.blank);
            parity += self.size - 1 - y;
        }

        parity % 2 == 0
    }

    pub fn same_tiles(&self, other: &Board) -> bool {
        self.size == other.size && self.tiles.iter().zip_eq(&other.tiles).all(|(a, b)| a == b)
    }

    /// Frontier priority, lowest first: `f` then `h`.
    pub fn priority(&self, greedy: bool) -> (i32, i32) {
        let g = if greedy { 0 } else { self.depth as i32 };
        (self.score + g, self.score)
    }
}

/// Hash first, tiles only on a hash match.
impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.same_tiles(other)
    }
}

impl Eq for Board {}

impl Index<(usize, usize)> for Board {
    type Output = u16;
    fn index(&self, (x, y): (usize, usize)) -> &Self::Output {
        &self.tiles[y * self.size + x]
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.tiles.chunks(self.size) {
            for tile in row {
                write!(f, "{:>4}", tile)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
