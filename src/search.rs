use std::{
    cmp::Ordering,
    collections::BinaryHeap,
    rc::Rc,
    time::{Duration, Instant},
};

use log::{debug, info, trace, warn};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::{
    board::{Board, Direction},
    error::SolveError,
    heuristic::Heuristic,
    path::reconstruct,
};

const TRACE_EVERY: usize = 100_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    pub heuristic: Heuristic,
    /// Order the frontier by heuristic alone; faster, no longer optimal.
    pub greedy: bool,
    /// Never generate the move that undoes the parent's move.
    pub prune_reversals: bool,
    pub max_expansions: Option<usize>,
    pub time_limit: Option<Duration>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            heuristic: Heuristic::default(),
            greedy: false,
            prune_reversals: true,
            max_expansions: None,
            time_limit: None,
        }
    }
}

impl SearchOptions {
    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn with_greedy(mut self, greedy: bool) -> Self {
        self.greedy = greedy;
        self
    }

    pub fn with_pruning(mut self, prune_reversals: bool) -> Self {
        self.prune_reversals = prune_reversals;
        self
    }

    pub fn with_max_expansions(mut self, max: usize) -> Self {
        self.max_expansions = Some(max);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Solved(Vec<Direction>),
    /// The boards have different parity, or (should not happen) the
    /// frontier ran dry.
    Unsolvable,
    /// Expansion or time budget ran out first.
    Aborted,
}

#[derive(Debug, Clone)]
pub struct Report {
    pub outcome: Outcome,
    expanded: usize,
    peak: usize,
}

impl Report {
    pub fn moves(&self) -> Option<&[Direction]> {
        match &self.outcome {
            Outcome::Solved(moves) => Some(moves),
            _ => None,
        }
    }

    /// Nodes popped and expanded.
    pub fn expanded_count(&self) -> usize {
        self.expanded
    }

    /// Largest `frontier + visited` size seen.
    pub fn peak_resource_usage(&self) -> usize {
        self.peak
    }
}

// BinaryHeap is a max-heap; invert so the lowest (f, h) pops first.
struct Node {
    priority: (i32, i32),
    board: Board,
}

impl Node {
    fn new(board: Board, greedy: bool) -> Node {
        Node {
            priority: board.priority(greedy),
            board,
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority
    }
}

impl Eq for Node {}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        other.priority.cmp(&self.priority)
    }
}

fn successors(board: &Board, prune_reversals: bool, out: &mut SmallVec<[(Direction, usize); 4]>) {
    for d in Direction::ALL {
        if prune_reversals && board.last_reverse_move() == Some(d) {
            continue;
        }

        let target = board.neighbor(d);
        if board.in_bounds(target) {
            out.push((d, target.index(board.size())));
        }
    }
}

fn check(initial: &Board, goal: &Board, options: &SearchOptions) -> Result<(), SolveError> {
    if initial.size() != goal.size() {
        return Err(SolveError::IncompatibleSizes {
            initial: initial.size(),
            goal: goal.size(),
        });
    }

    if !Rc::ptr_eq(initial.keys(), goal.keys()) {
        return Err(SolveError::KeyTableMismatch);
    }

    if options.greedy && options.heuristic == Heuristic::None {
        return Err(SolveError::GreedyWithoutHeuristic);
    }

    Ok(())
}

/// A* from `initial` to `goal`.
///
/// Both boards must share one key table. An unsolvable pair is reported as
/// `Outcome::Unsolvable` without expanding anything.
pub fn solve(initial: &Board, goal: &Board, options: &SearchOptions) -> Result<Report, SolveError> {
    check(initial, goal, options)?;

    let mut report = Report {
        outcome: Outcome::Unsolvable,
        expanded: 0,
        peak: 0,
    };

    if initial.is_solvable() != goal.is_solvable() {
        info!("parity of initial and goal boards differ, not searching");
        return Ok(report);
    }

    let heuristic = options.heuristic;
    let started = Instant::now();

    let mut start = initial.clone();
    start.depth = 0;
    start.last_reverse = None;
    start.score = heuristic.full(&start, goal);
    debug!(
        "searching with {} (greedy: {}), initial score {}",
        heuristic, options.greedy, start.score
    );

    let mut frontier = BinaryHeap::new();
    let mut visited: FxHashMap<u64, u32> = FxHashMap::default();
    let mut predecessor: FxHashMap<u64, Direction> = FxHashMap::default();

    visited.insert(start.hash(), 0);
    frontier.push(Node::new(start, options.greedy));
    report.peak = 2;

    let mut moves = SmallVec::<[(Direction, usize); 4]>::new();

    while let Some(Node { board: current, .. }) = frontier.pop() {
        if current == *goal {
            let path = reconstruct(&current, initial.hash(), &predecessor)
                .ok_or(SolveError::BrokenPath)?;
            info!(
                "solved in {} moves, expanded {}, peak {}, {:?}",
                path.len(),
                report.expanded,
                report.peak,
                started.elapsed()
            );
            report.outcome = Outcome::Solved(path);
            return Ok(report);
        }

        // a cheaper route to this board was queued after this one
        if matches!(visited.get(&current.hash()), Some(&best) if best < current.depth) {
            continue;
        }
        visited.insert(current.hash(), current.depth);

        if options.max_expansions.map_or(false, |max| report.expanded >= max)
            || options.time_limit.map_or(false, |limit| started.elapsed() >= limit)
        {
            warn!(
                "search budget exhausted after {} expansions, {:?}",
                report.expanded,
                started.elapsed()
            );
            report.outcome = Outcome::Aborted;
            return Ok(report);
        }

        report.expanded += 1;
        if report.expanded % TRACE_EVERY == 0 {
            trace!(
                "expanded {}, frontier {}, visited {}, depth {}, score {}",
                report.expanded,
                frontier.len(),
                visited.len(),
                current.depth(),
                current.heuristic_score()
            );
        }

        moves.clear();
        successors(&current, options.prune_reversals, &mut moves);

        for &(d, target) in &moves {
            let mut next = current.clone();
            next.score += heuristic.update(&current, goal, target);
            next.swap(target);

            if matches!(visited.get(&next.hash()), Some(&best) if best <= next.depth) {
                continue;
            }

            visited.insert(next.hash(), next.depth);
            predecessor.insert(next.hash(), d);
            next.last_reverse = Some(d.opposite());
            frontier.push(Node::new(next, options.greedy));
        }

        report.peak = report.peak.max(frontier.len() + visited.len());
    }

    warn!(
        "frontier exhausted after {} expansions without reaching the goal",
        report.expanded
    );
    Ok(report)
}
