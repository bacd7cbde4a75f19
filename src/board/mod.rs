//! Rules backends implementing [`LegalityOracle`](crate::oracle::LegalityOracle).

use std::fmt;
use std::str::FromStr;

use crate::error::{PerftError, Result};

pub mod cozy;
#[cfg(feature = "board-pleco")]
pub mod pleco;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Construction from text, shared by every backend.
pub trait Setup: Sized {
    fn startpos() -> Self;

    fn from_fen(fen: &str) -> Result<Self>;

    /// Accepts `startpos` or a FEN string.
    fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() || input == "startpos" { Ok(Self::startpos()) } else { Self::from_fen(input) }
    }
}

/// Rules library selected at runtime by the binaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Cozy,
    Pleco,
}

impl Backend {
    pub fn available(self) -> bool {
        match self {
            Backend::Cozy => true,
            Backend::Pleco => cfg!(feature = "board-pleco"),
        }
    }

    pub fn default_backend() -> Self {
        if Backend::Pleco.available() { Backend::Pleco } else { Backend::Cozy }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self { Backend::Cozy => "cozy", Backend::Pleco => "pleco" })
    }
}

impl FromStr for Backend {
    type Err = PerftError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "cozy" => Ok(Backend::Cozy),
            "pleco" => Ok(Backend::Pleco),
            _ => Err(PerftError::Setup { input: s.to_string(), reason: "unknown backend (expected cozy or pleco)".into() }),
        }
    }
}

pub(crate) fn setup_error(input: &str, reason: impl fmt::Debug) -> PerftError {
    PerftError::Setup { input: input.to_string(), reason: format!("{reason:?}") }
}

/// Uppercase for white, lowercase for black, as in FEN.
pub(crate) fn piece_letter(lower: char, white: bool) -> char {
    if white { lower.to_ascii_uppercase() } else { lower }
}

/// Exactly one king per side. Backs both adapters' `validate`; cozy-chess
/// refuses such boards at FEN parsing already, pleco does not (it panics
/// looking for the missing king), so the pleco adapter also runs this on the
/// FEN placement field before parsing.
pub(crate) fn check_kings(white: usize, black: usize, fen: impl FnOnce() -> String) -> Result<()> {
    for (side, kings) in [("white", white), ("black", black)] {
        if kings != 1 {
            return Err(PerftError::InvalidPosition(format!("{side} has {kings} kings in {}", fen())));
        }
    }
    Ok(())
}
