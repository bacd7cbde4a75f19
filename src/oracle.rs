//! Legality oracle capability interface.
//!
//! The perft engine never looks inside a position or a move. Everything it
//! needs from the rules of the game goes through [`LegalityOracle`], which is
//! implemented by the position type itself: the value *is* the handle the
//! engine mutates and restores.

use std::fmt::Debug;

use crate::error::Result;

pub trait LegalityOracle {
    type Move: Copy + Eq + Debug;

    /// Reports a malformed or inconsistent position. Checked once before a
    /// traversal starts.
    fn validate(&self) -> Result<()>;

    /// All legal moves in the backend's native order. Empty means terminal.
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// Depth-1 fast path; backends that can count without materialising the
    /// list should override this.
    fn legal_move_count(&self) -> usize {
        self.legal_moves().len()
    }

    /// Plays `mv`. On `Err` the position must be left unchanged.
    fn apply(&mut self, mv: Self::Move) -> Result<()>;

    /// Takes back `mv`, which must be the most recently applied move.
    fn undo(&mut self, mv: Self::Move) -> Result<()>;

    /// Piece and squares, e.g. `P from e2 to e4`.
    fn describe_from_to(&self, mv: Self::Move) -> String;

    /// Coordinate notation, e.g. `e2e4`, `e1g1`, `a7a8q`.
    fn describe_algebraic(&self, mv: Self::Move) -> String;
}
