use std::io;

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid character in table: {0:?}")]
    InvalidToken(String),
    #[error("negative number in table")]
    Negative,
    #[error("first line should only contain the size of the table")]
    SizeLine,
    #[error("table size should be at least 2, got {0}")]
    SizeTooSmall(usize),
    #[error("table size {0} is too large, at most 256 is supported")]
    SizeTooLarge(usize),
    #[error("number too large in table: {0}")]
    TooLarge(usize),
    #[error("duplicate number {0} in table")]
    Duplicate(usize),
    #[error("too many values on line {0} of table")]
    TooManyValues(usize),
    #[error("missing values on line {0} of table")]
    MissingValues(usize),
    #[error("too many lines in table")]
    TooManyLines,
    #[error("missing lines in table")]
    MissingLines,
    #[error("empty table")]
    Empty,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SolveError {
    #[error("incompatible board sizes: {initial} and {goal}")]
    IncompatibleSizes { initial: usize, goal: usize },
    #[error("boards were hashed with different key tables")]
    KeyTableMismatch,
    #[error("greedy search needs a heuristic other than `none`")]
    GreedyWithoutHeuristic,
    #[error("predecessor chain does not lead back to the initial board")]
    BrokenPath,
}
