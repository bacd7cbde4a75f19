use std::fmt;

use cozy_chess::{Board as CozyBoard, Color, File, Move, Piece, Square};

use crate::board::{check_kings, piece_letter, setup_error, Setup};
use crate::error::{PerftError, Result};
use crate::oracle::LegalityOracle;

/// cozy-chess has no unmake, so every applied move keeps the board it was
/// played from.
#[derive(Clone, Debug)]
pub struct CozyPosition {
    board: CozyBoard,
    history: Vec<(Move, CozyBoard)>,
}

impl CozyPosition {
    pub fn new(board: CozyBoard) -> Self { Self { board, history: Vec::with_capacity(128) } }

    pub fn board(&self) -> &CozyBoard { &self.board }

    pub fn fen(&self) -> String { self.board.to_string() }

    pub fn hash(&self) -> u64 { self.board.hash() }

    pub fn side_to_move(&self) -> Color { self.board.side_to_move() }

    pub fn plies_applied(&self) -> usize { self.history.len() }

    /// Finds a legal move by its coordinate notation and plays it.
    pub fn make_move_uci(&mut self, mv_uci: &str) -> Result<()> {
        let found = self.legal_moves().into_iter().find(|&m| self.describe_algebraic(m) == mv_uci);
        match found {
            Some(m) => self.apply(m),
            None => Err(PerftError::Setup { input: mv_uci.to_string(), reason: format!("illegal move in {}", self.fen()) }),
        }
    }

    /// cozy encodes castling as the king capturing its own rook; report the
    /// king's real destination instead.
    fn king_destination(&self, mv: Move) -> Square {
        let castles = self.board.piece_on(mv.from) == Some(Piece::King)
            && self.board.color_on(mv.to) == Some(self.board.side_to_move());
        if !castles { return mv.to; }
        let file = if (mv.to.file() as u8) > (mv.from.file() as u8) { File::G } else { File::C };
        Square::new(file, mv.from.rank())
    }
}

impl Setup for CozyPosition {
    fn startpos() -> Self { Self::new(CozyBoard::default()) }

    fn from_fen(fen: &str) -> Result<Self> {
        CozyBoard::from_fen(fen.trim(), false).map(Self::new).map_err(|e| setup_error(fen, e))
    }
}

impl fmt::Display for CozyPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.board) }
}

impl LegalityOracle for CozyPosition {
    type Move = Move;

    fn validate(&self) -> Result<()> {
        let kings = |color| (self.board.colors(color) & self.board.pieces(Piece::King)).into_iter().count();
        check_kings(kings(Color::White), kings(Color::Black), || self.fen())
    }

    fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        self.board.generate_moves(|ml| { moves.extend(ml); false });
        moves
    }

    fn legal_move_count(&self) -> usize {
        let mut ct = 0usize;
        self.board.generate_moves(|ml| { ct += ml.len(); false });
        ct
    }

    fn apply(&mut self, mv: Move) -> Result<()> {
        let prev = self.board.clone();
        self.board
            .try_play(mv)
            .map_err(|e| PerftError::OracleContractViolation(format!("{mv} rejected in {prev}: {e:?}")))?;
        self.history.push((mv, prev));
        Ok(())
    }

    fn undo(&mut self, mv: Move) -> Result<()> {
        match self.history.last() {
            Some(&(last, _)) if last == mv => {
                if let Some((_, prev)) = self.history.pop() { self.board = prev; }
                Ok(())
            }
            Some(&(last, _)) => Err(PerftError::OracleContractViolation(format!("undo {mv} but last applied move is {last}"))),
            None => Err(PerftError::OracleContractViolation(format!("undo {mv} with no move applied"))),
        }
    }

    fn describe_from_to(&self, mv: Move) -> String {
        let white = self.board.side_to_move() == Color::White;
        let piece = self.board.piece_on(mv.from).map(|p| piece_letter(lower_char(p), white)).unwrap_or('?');
        format!("{piece} from {} to {}", mv.from, self.king_destination(mv))
    }

    fn describe_algebraic(&self, mv: Move) -> String {
        let mut s = format!("{}{}", mv.from, self.king_destination(mv));
        if let Some(p) = mv.promotion { s.push(lower_char(p)); }
        s
    }
}

fn lower_char(piece: Piece) -> char {
    match piece {
        Piece::Pawn => 'p',
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        Piece::Queen => 'q',
        Piece::King => 'k',
    }
}
