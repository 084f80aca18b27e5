//! Board acquisition: text maps and generated boards.
//!
//! ```text
//! # comments start with a hash
//! 3
//! 1 2 3   # trailing comments are fine too
//! 8 0 4
//! 7 6 5
//! ```

use std::{fs, path::Path};

use rand::{seq::SliceRandom, Rng};
use smallvec::SmallVec;

use crate::{board::Direction, error::ParseError};

/// A validated flat permutation of `0..size²`, ready for `Board::new`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tiles {
    pub size: usize,
    pub tiles: Vec<u16>,
}

// tiles are stored as u16
const MAX_CELLS: usize = u16::MAX as usize + 1;

/// Largest tile value of a `size`×`size` board, if that board fits in u16 tiles.
fn last_tile(size: usize) -> Result<u16, ParseError> {
    if size < 2 {
        return Err(ParseError::SizeTooSmall(size));
    }

    size.checked_mul(size)
        .filter(|&cells| cells <= MAX_CELLS)
        .and_then(|cells| u16::try_from(cells - 1).ok())
        .ok_or(ParseError::SizeTooLarge(size))
}

fn parse_number(token: &str) -> Result<usize, ParseError> {
    if token.starts_with('-') && token[1..].parse::<u64>().is_ok() {
        return Err(ParseError::Negative);
    }

    token
        .parse()
        .map_err(|_| ParseError::InvalidToken(token.to_string()))
}

pub fn parse_board(text: &str) -> Result<Tiles, ParseError> {
    let mut size = None;
    let mut tiles = Vec::new();
    let mut seen = Vec::new();
    let mut line_count = 0;

    for raw in text.lines() {
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }

        let numbers = line
            .split_whitespace()
            .map(parse_number)
            .collect::<Result<Vec<_>, _>>()?;

        let size = match size {
            None => {
                if numbers.len() != 1 {
                    return Err(ParseError::SizeLine);
                }
                let last = last_tile(numbers[0])?;
                size = Some(numbers[0]);
                seen = vec![false; last as usize + 1];
                continue;
            }
            Some(size) => size,
        };

        line_count += 1;
        if line_count > size {
            return Err(ParseError::TooManyLines);
        }
        if numbers.len() > size {
            return Err(ParseError::TooManyValues(line_count));
        }
        if numbers.len() < size {
            return Err(ParseError::MissingValues(line_count));
        }

        for nb in numbers {
            let tile = match u16::try_from(nb) {
                Ok(tile) if nb < seen.len() => tile,
                _ => return Err(ParseError::TooLarge(nb)),
            };
            if seen[nb] {
                return Err(ParseError::Duplicate(nb));
            }
            seen[nb] = true;
            tiles.push(tile);
        }
    }

    match size {
        None => Err(ParseError::Empty),
        Some(size) if line_count < size => Err(ParseError::MissingLines),
        Some(size) => Ok(Tiles { size, tiles }),
    }
}

pub fn from_file(path: impl AsRef<Path>) -> Result<Tiles, ParseError> {
    parse_board(&fs::read_to_string(path)?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GoalLayout {
    /// Numbers spiral clockwise from the top-left corner, blank last.
    #[default]
    Snail,
    /// Row-major, blank in the bottom-right corner.
    Ordered,
}

impl std::str::FromStr for GoalLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "snail" => Ok(GoalLayout::Snail),
            "ordered" => Ok(GoalLayout::Ordered),
            _ => Err(format!("unknown goal layout `{}`, expected snail or ordered", s)),
        }
    }
}

pub mod generate {
    use super::*;

    /// Fails for sizes below 2 or above 256.
    pub fn solved(size: usize, layout: GoalLayout) -> Result<Tiles, ParseError> {
        let last = last_tile(size)?;
        let tiles = match layout {
            GoalLayout::Ordered => (1..=last).chain([0]).collect(),
            GoalLayout::Snail => snail(size, last),
        };

        Ok(Tiles { size, tiles })
    }

    fn snail(size: usize, last: u16) -> Vec<u16> {
        const TURNS: [Direction; 4] = [
            Direction::Right,
            Direction::Down,
            Direction::Left,
            Direction::Up,
        ];

        let mut tiles = vec![0; size * size];
        let (mut x, mut y) = (0isize, 0isize);
        let mut turn = 0;

        for value in 1..=last {
            tiles[y as usize * size + x as usize] = value;

            let free = |(dx, dy): (isize, isize)| {
                let (nx, ny) = (x + dx, y + dy);
                (0..size as isize).contains(&nx)
                    && (0..size as isize).contains(&ny)
                    && tiles[ny as usize * size + nx as usize] == 0
            };
            if !free(TURNS[turn].offset()) {
                turn = (turn + 1) % TURNS.len();
            }

            let (dx, dy) = TURNS[turn].offset();
            x += dx;
            y += dy;
        }

        tiles
    }

    /// Any permutation, solvable or not. Same size limits as `solved`.
    pub fn random(size: usize, rng: &mut impl Rng) -> Result<Tiles, ParseError> {
        let mut tiles: Vec<u16> = (0..=last_tile(size)?).collect();
        tiles.shuffle(rng);
        Ok(Tiles { size, tiles })
    }

    /// `moves` random legal blank moves away from `goal`, never undoing the
    /// previous move. Always reachable from `goal`.
    pub fn scrambled(goal: &Tiles, moves: usize, rng: &mut impl Rng) -> Tiles {
        let size = goal.size as isize;
        let mut tiles = goal.tiles.clone();
        let mut blank = tiles.iter().position(|&t| t == 0).unwrap_or_default();
        let mut last: Option<Direction> = None;

        for _ in 0..moves {
            let (x, y) = ((blank % goal.size) as isize, (blank / goal.size) as isize);
            let options: SmallVec<[(Direction, usize); 4]> = Direction::ALL
                .iter()
                .copied()
                .filter(|&d| last != Some(d.opposite()))
                .filter_map(|d| {
                    let (dx, dy) = d.offset();
                    let (nx, ny) = (x + dx, y + dy);
                    ((0..size).contains(&nx) && (0..size).contains(&ny))
                        .then_some((d, (ny * size + nx) as usize))
                })
                .collect();

            if let Some(&(d, target)) = options.choose(rng) {
                tiles.swap(blank, target);
                blank = target;
                last = Some(d);
            }
        }

        Tiles {
            size: goal.size,
            tiles,
        }
    }
}
