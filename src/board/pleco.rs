#![cfg(feature = "board-pleco")]
use std::fmt;

use pleco::{BitMove, Board as PlecoBoard, Piece, PieceType, Player};

use crate::board::{check_kings, piece_letter, setup_error, Setup};
use crate::error::{PerftError, Result};
use crate::oracle::LegalityOracle;

/// Pleco board with native make/unmake. The move stack mirrors pleco's own
/// undo history so out-of-order undos can be caught before they corrupt it.
#[derive(Clone)]
pub struct PlecoPosition {
    board: PlecoBoard,
    stack: Vec<BitMove>,
}

impl PlecoPosition {
    pub fn new(board: PlecoBoard) -> Self { Self { board, stack: Vec::with_capacity(128) } }

    pub fn inner(&self) -> &PlecoBoard { &self.board }

    pub fn fen(&self) -> String { self.board.fen() }

    pub fn hash(&self) -> u64 { self.board.zobrist() }

    pub fn side_to_move(&self) -> Player { self.board.turn() }

    pub fn plies_applied(&self) -> usize { self.stack.len() }

    pub fn make_move_uci(&mut self, mv_uci: &str) -> Result<()> {
        let found = self.legal_moves().into_iter().find(|&m| self.describe_algebraic(m) == mv_uci);
        match found {
            Some(m) => self.apply(m),
            None => Err(PerftError::Setup { input: mv_uci.to_string(), reason: format!("illegal move in {}", self.fen()) }),
        }
    }

    /// Castling moves are reported with the king's two-square destination.
    fn destination(&self, mv: BitMove) -> String {
        let src = mv.get_src().to_string();
        let dst = mv.get_dest().to_string();
        if !mv.is_castle() { return dst; }
        let file = if dst[..1] > src[..1] { 'g' } else { 'c' };
        format!("{file}{}", &src[1..])
    }
}

impl Setup for PlecoPosition {
    fn startpos() -> Self { Self::new(PlecoBoard::start_pos()) }

    fn from_fen(fen: &str) -> Result<Self> {
        // pleco panics on a missing king instead of returning a FenBuildError
        let placement = fen.split_whitespace().next().unwrap_or_default();
        let kings = |letter| placement.chars().filter(|&c| c == letter).count();
        check_kings(kings('K'), kings('k'), || fen.trim().to_string())
            .map_err(|e| PerftError::Setup { input: fen.to_string(), reason: e.to_string() })?;
        PlecoBoard::from_fen(fen.trim()).map(Self::new).map_err(|e| setup_error(fen, e))
    }
}

impl fmt::Display for PlecoPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.board.fen()) }
}

impl fmt::Debug for PlecoPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlecoPosition").field("fen", &self.board.fen()).field("stack", &self.stack).finish()
    }
}

impl LegalityOracle for PlecoPosition {
    type Move = BitMove;

    fn validate(&self) -> Result<()> {
        let kings = |player| self.board.count_piece(player, PieceType::K) as usize;
        check_kings(kings(Player::White), kings(Player::Black), || self.fen())
    }

    fn legal_moves(&self) -> Vec<BitMove> { self.board.generate_moves().iter().copied().collect() }

    fn legal_move_count(&self) -> usize { self.board.generate_moves().len() }

    fn apply(&mut self, mv: BitMove) -> Result<()> {
        if !self.board.legal_move(mv) {
            return Err(PerftError::OracleContractViolation(format!("{} rejected in {}", mv.stringify(), self.fen())));
        }
        self.board.apply_move(mv);
        self.stack.push(mv);
        Ok(())
    }

    fn undo(&mut self, mv: BitMove) -> Result<()> {
        match self.stack.last() {
            Some(&last) if last == mv => {
                self.stack.pop();
                self.board.undo_move();
                Ok(())
            }
            Some(&last) => Err(PerftError::OracleContractViolation(format!(
                "undo {} but last applied move is {}",
                mv.stringify(),
                last.stringify()
            ))),
            None => Err(PerftError::OracleContractViolation(format!("undo {} with no move applied", mv.stringify()))),
        }
    }

    fn describe_from_to(&self, mv: BitMove) -> String {
        let white = self.board.turn() == Player::White;
        let piece = self.board.piece_at_sq(mv.get_src());
        let letter = if piece == Piece::None { '?' } else { piece_letter(lower_char(piece.type_of()), white) };
        format!("{letter} from {} to {}", mv.get_src(), self.destination(mv))
    }

    fn describe_algebraic(&self, mv: BitMove) -> String {
        let mut s = format!("{}{}", mv.get_src(), self.destination(mv));
        if mv.is_promo() { s.push(lower_char(mv.promo_piece())); }
        s
    }
}

fn lower_char(pt: PieceType) -> char {
    match pt {
        PieceType::P => 'p',
        PieceType::N => 'n',
        PieceType::B => 'b',
        PieceType::R => 'r',
        PieceType::Q => 'q',
        PieceType::K => 'k',
        _ => '?',
    }
}
