//! Perft: exhaustive move-path counting over a [`LegalityOracle`].
//!
//! Every entry point takes the position by exclusive borrow, mutates it with
//! strictly nested apply/undo pairs and hands it back unchanged, on the error
//! paths too. Transpositions are counted separately: this is a path count,
//! not a distinct-position count.

use std::time::Instant;

use log::{debug, warn};
use rayon::prelude::*;

use crate::error::{PerftError, Result};
use crate::oracle::LegalityOracle;

/// Best-effort early exit for long runs. A completed count is exact whether
/// or not a deadline was set.
#[derive(Clone, Copy, Debug, Default)]
pub struct Limits {
    pub deadline: Option<Instant>,
}

impl Limits {
    pub fn with_deadline(deadline: Instant) -> Self { Self { deadline: Some(deadline) } }

    fn expired(&self) -> bool {
        matches!(self.deadline, Some(d) if Instant::now() >= d)
    }
}

/// Number of move paths of exactly `depth` plies from `position`.
pub fn count<P: LegalityOracle>(position: &mut P, depth: i32) -> Result<u64> {
    count_with_limits(position, depth, &Limits::default())
}

pub fn count_with_limits<P: LegalityOracle>(position: &mut P, depth: i32, limits: &Limits) -> Result<u64> {
    let depth = checked_depth(depth, 0)?;
    position.validate()?;
    debug!("perft depth {depth} started");
    let nodes = walk(position, depth, limits)?;
    debug!("perft depth {depth} finished: {nodes} nodes");
    Ok(nodes)
}

fn walk<P: LegalityOracle>(position: &mut P, depth: u32, limits: &Limits) -> Result<u64> {
    if depth == 0 { return Ok(1); }
    if depth == 1 { return Ok(position.legal_move_count() as u64); }
    if limits.expired() { return Err(PerftError::DeadlineExceeded); }
    let mut nodes = 0u64;
    for mv in position.legal_moves() {
        nodes += descend(position, mv, depth - 1, limits)?;
    }
    Ok(nodes)
}

/// Apply `mv`, count the subtree below it, then undo `mv` whatever happened
/// in between.
fn descend<P: LegalityOracle>(position: &mut P, mv: P::Move, depth: u32, limits: &Limits) -> Result<u64> {
    position.apply(mv).map_err(|e| violation("apply", mv, e))?;
    let subtree = walk(position, depth, limits);
    let restored = position.undo(mv).map_err(|e| violation("undo", mv, e));
    match (subtree, restored) {
        (Ok(nodes), Ok(())) => Ok(nodes),
        (Err(e), Ok(())) | (Ok(_), Err(e)) => Err(e),
        (Err(e), Err(undo_err)) => {
            warn!("position left unrestored while unwinding: {undo_err}");
            Err(e)
        }
    }
}

/// Same result as [`count`], walking the tree with an explicit frame stack
/// instead of recursion. Moves are applied and undone in the same order.
pub fn count_iterative<P: LegalityOracle>(position: &mut P, depth: i32) -> Result<u64> {
    count_iterative_with_limits(position, depth, &Limits::default())
}

/// [`count_iterative`] with the same deadline checks as [`count_with_limits`]:
/// once per interior node, before its moves are listed.
pub fn count_iterative_with_limits<P: LegalityOracle>(position: &mut P, depth: i32, limits: &Limits) -> Result<u64> {
    let depth = checked_depth(depth, 0)?;
    position.validate()?;
    if depth <= 1 { return walk(position, depth, limits); }
    if limits.expired() { return Err(PerftError::DeadlineExceeded); }

    struct Frame<M> {
        moves: Vec<M>,
        next: usize,
    }

    let depth = depth as usize;
    let mut frames = vec![Frame { moves: position.legal_moves(), next: 0 }];
    // applied[i] is the move that led from frame i to frame i + 1
    let mut applied: Vec<P::Move> = Vec::with_capacity(depth);
    let mut nodes = 0u64;

    while let Some(frame) = frames.last_mut() {
        if frame.next == frame.moves.len() {
            frames.pop();
            if let Some(mv) = applied.pop() {
                if let Err(e) = position.undo(mv) {
                    let e = violation("undo", mv, e);
                    unwind(position, &mut applied);
                    return Err(e);
                }
            }
            continue;
        }
        let mv = frame.moves[frame.next];
        frame.next += 1;
        if let Err(e) = position.apply(mv) {
            let e = violation("apply", mv, e);
            unwind(position, &mut applied);
            return Err(e);
        }
        applied.push(mv);
        // plies still to play below the position just reached
        let remaining = depth - frames.len();
        if remaining == 1 {
            nodes += position.legal_move_count() as u64;
            applied.pop();
            if let Err(e) = position.undo(mv) {
                let e = violation("undo", mv, e);
                unwind(position, &mut applied);
                return Err(e);
            }
        } else if limits.expired() {
            unwind(position, &mut applied);
            return Err(PerftError::DeadlineExceeded);
        } else {
            frames.push(Frame { moves: position.legal_moves(), next: 0 });
        }
    }
    Ok(nodes)
}

fn unwind<P: LegalityOracle>(position: &mut P, applied: &mut Vec<P::Move>) {
    while let Some(mv) = applied.pop() {
        if let Err(e) = position.undo(mv) {
            warn!("position left unrestored while unwinding: {e}");
            return;
        }
    }
}

/// Root-split count: every root move is searched on its own clone of
/// `position`, on the current rayon pool. Wrap the call in
/// `ThreadPool::install` to choose the thread count.
pub fn count_parallel<P>(position: &P, depth: i32) -> Result<u64>
where
    P: LegalityOracle + Clone + Send + Sync,
    P::Move: Send + Sync,
{
    count_parallel_with_limits(position, depth, &Limits::default())
}

/// [`count_parallel`] where every worker honours `limits`. The first worker
/// to see the deadline pass fails the whole count.
pub fn count_parallel_with_limits<P>(position: &P, depth: i32, limits: &Limits) -> Result<u64>
where
    P: LegalityOracle + Clone + Send + Sync,
    P::Move: Send + Sync,
{
    let depth = checked_depth(depth, 0)?;
    position.validate()?;
    if depth <= 1 {
        return walk(&mut position.clone(), depth, limits);
    }
    if limits.expired() { return Err(PerftError::DeadlineExceeded); }
    let root_moves = position.legal_moves();
    debug!("parallel perft depth {depth}: {} root moves on {} threads", root_moves.len(), rayon::current_num_threads());
    root_moves
        .par_iter()
        .map(|&mv| {
            let mut child = position.clone();
            child.apply(mv).map_err(|e| violation("apply", mv, e))?;
            walk(&mut child, depth - 1, limits)
        })
        .try_reduce(|| 0, |a, b| Ok(a + b))
}

/// Per-root-move counts in oracle order. The counts sum to
/// `count(position, depth)`.
pub fn divide<P: LegalityOracle>(position: &mut P, depth: i32) -> Result<Vec<(P::Move, u64)>> {
    let depth = checked_depth(depth, 1)?;
    position.validate()?;
    let limits = Limits::default();
    let mut out = Vec::new();
    for mv in position.legal_moves() {
        let nodes = descend(position, mv, depth - 1, &limits)?;
        out.push((mv, nodes));
    }
    Ok(out)
}

/// Legal moves at `position`, unsorted.
pub fn enumerate_moves<P: LegalityOracle>(position: &mut P) -> Result<Vec<P::Move>> {
    position.validate()?;
    Ok(position.legal_moves())
}

/// Legal moves rendered as `piece from square to square`.
pub fn describe_moves<P: LegalityOracle>(position: &mut P) -> Result<Vec<String>> {
    let moves = enumerate_moves(position)?;
    Ok(moves.into_iter().map(|mv| position.describe_from_to(mv)).collect())
}

/// Legal moves rendered in coordinate notation.
pub fn enumerate_moves_algebraic<P: LegalityOracle>(position: &mut P) -> Result<Vec<String>> {
    let moves = enumerate_moves(position)?;
    Ok(moves.into_iter().map(|mv| position.describe_algebraic(mv)).collect())
}

fn checked_depth(depth: i32, min: i32) -> Result<u32> {
    if depth < min { return Err(PerftError::InvalidDepth { depth, min }); }
    Ok(depth as u32)
}

fn violation<M: std::fmt::Debug>(op: &str, mv: M, cause: PerftError) -> PerftError {
    match cause {
        PerftError::OracleContractViolation(_) => cause,
        other => PerftError::OracleContractViolation(format!("{op} {mv:?} failed: {other}")),
    }
}
