//! Optimal solver for the n×n sliding tile puzzle.
//!
//! Boards carry a Zobrist hash and a heuristic score that are both updated
//! in O(1) per move, and `solve` runs A* (or greedy best-first) over them.

pub mod board;
pub mod error;
pub mod heuristic;
pub mod keys;
pub mod parse;
pub mod path;
pub mod search;

pub use board::{Board, Direction};
pub use error::{ParseError, SolveError};
pub use heuristic::Heuristic;
pub use keys::KeyTable;
pub use parse::{generate, parse_board, GoalLayout, Tiles};
pub use path::replay;
pub use search::{solve, Outcome, Report, SearchOptions};
