// Perft move-tree enumeration over pluggable chess rules backends
pub mod error;
pub mod oracle;
pub mod perft;
pub mod board;
pub mod suite;
pub mod report;

pub use error::{PerftError, Result};
pub use oracle::LegalityOracle;
