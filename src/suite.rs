//! Reference perft suite: well-known positions with published node counts.

use std::fs;
use std::path::Path;
use std::time::Instant;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::board::cozy::CozyPosition;
use crate::board::{Backend, Setup, START_FEN};
use crate::error::{PerftError, Result};
use crate::oracle::LegalityOracle;
use crate::perft;

/// Environment variable naming a JSON Lines suite file.
pub const SUITE_ENV: &str = "PERFTCHECK_SUITE";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteEntry {
    pub name: String,
    pub fen: String,
    /// `(depth, nodes)` pairs, shallowest first.
    pub expected: Vec<(i32, u64)>,
}

impl SuiteEntry {
    fn new(name: &str, fen: &str, expected: &[(i32, u64)]) -> Self {
        Self { name: name.to_string(), fen: fen.to_string(), expected: expected.to_vec() }
    }

    pub fn up_to(&self, max_depth: i32) -> Self {
        let expected = self.expected.iter().copied().filter(|&(d, _)| d <= max_depth).collect();
        Self { expected, ..self.clone() }
    }
}

/// Positions 1-6 from the chessprogramming wiki perft results page.
#[rustfmt::skip]
pub fn reference_suite() -> Vec<SuiteEntry> {
    vec![
        SuiteEntry::new("startpos", START_FEN,
            &[(1, 20), (2, 400), (3, 8902), (4, 197_281), (5, 4_865_609)]),
        SuiteEntry::new("kiwipete", "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            &[(1, 48), (2, 2039), (3, 97_862), (4, 4_085_603), (5, 193_690_690)]),
        SuiteEntry::new("position3", "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            &[(1, 14), (2, 191), (3, 2812), (4, 43_238), (5, 674_624)]),
        SuiteEntry::new("position4", "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            &[(1, 6), (2, 264), (3, 9467), (4, 422_333), (5, 15_833_292)]),
        SuiteEntry::new("position5", "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
            &[(1, 44), (2, 1486), (3, 62_379), (4, 2_103_487), (5, 89_941_194)]),
        SuiteEntry::new("position6", "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
            &[(1, 46), (2, 2079), (3, 89_890), (4, 3_894_594), (5, 164_075_551)]),
    ]
}

/// One entry per line; blank lines and `#` comments are skipped.
pub fn parse_suite(text: &str, source_name: &str) -> Result<Vec<SuiteEntry>> {
    let mut entries = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') { continue; }
        let entry: SuiteEntry = serde_json::from_str(line).map_err(|e| PerftError::Suite {
            source_name: source_name.to_string(),
            reason: format!("line {}: {e}", lineno + 1),
        })?;
        entries.push(entry);
    }
    if entries.is_empty() {
        return Err(PerftError::Suite { source_name: source_name.to_string(), reason: "no entries".into() });
    }
    Ok(entries)
}

pub fn load_suite(path: &Path) -> Result<Vec<SuiteEntry>> {
    let name = path.display().to_string();
    let text = fs::read_to_string(path).map_err(|e| PerftError::Suite { source_name: name.clone(), reason: e.to_string() })?;
    parse_suite(&text, &name)
}

/// Explicit path first, then [`SUITE_ENV`], then the built-in suite.
pub fn resolve_suite(path: Option<&Path>) -> Result<Vec<SuiteEntry>> {
    if let Some(p) = path { return load_suite(p); }
    if let Ok(p) = std::env::var(SUITE_ENV) {
        info!("loading suite from ${SUITE_ENV}={p}");
        return load_suite(Path::new(&p));
    }
    Ok(reference_suite())
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DepthResult {
    pub depth: i32,
    pub expected: u64,
    /// `None` when skipped after an earlier mismatch.
    pub nodes: Option<u64>,
    pub elapsed_secs: Option<f64>,
    pub correct: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionReport {
    pub name: String,
    pub fen: String,
    pub results: Vec<DepthResult>,
}

impl PositionReport {
    pub fn passed(&self) -> bool { self.results.iter().all(|r| r.correct) }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SuiteReport {
    pub backend: Backend,
    pub positions: Vec<PositionReport>,
}

impl SuiteReport {
    pub fn passed(&self) -> bool { self.positions.iter().all(PositionReport::passed) }

    pub fn total_nodes(&self) -> u64 {
        self.positions.iter().flat_map(|p| p.results.iter()).filter_map(|r| r.nodes).sum()
    }

    pub fn total_secs(&self) -> f64 {
        self.positions.iter().flat_map(|p| p.results.iter()).filter_map(|r| r.elapsed_secs).sum()
    }
}

/// Runs every entry depth by depth on a fresh position. Once a depth
/// mismatches, the deeper ones for that position are skipped. `on_result` is
/// called after every depth, skipped ones included.
pub fn run_suite<P, F>(entries: &[SuiteEntry], mut on_result: F) -> Result<Vec<PositionReport>>
where
    P: LegalityOracle + Setup,
    F: FnMut(&SuiteEntry, &DepthResult),
{
    let mut reports = Vec::with_capacity(entries.len());
    for entry in entries {
        let mut correct_so_far = true;
        let mut results = Vec::with_capacity(entry.expected.len());
        for &(depth, expected) in &entry.expected {
            let result = if correct_so_far {
                let mut pos = P::parse(&entry.fen)?;
                let t0 = Instant::now();
                let nodes = perft::count(&mut pos, depth)?;
                let dt = t0.elapsed().as_secs_f64();
                if nodes != expected {
                    warn!("{} depth {depth}: got {nodes}, expected {expected}", entry.name);
                    correct_so_far = false;
                }
                DepthResult { depth, expected, nodes: Some(nodes), elapsed_secs: Some(dt), correct: nodes == expected }
            } else {
                DepthResult { depth, expected, nodes: None, elapsed_secs: None, correct: false }
            };
            on_result(entry, &result);
            results.push(result);
        }
        reports.push(PositionReport { name: entry.name.clone(), fen: entry.fen.clone(), results });
    }
    Ok(reports)
}

pub fn run_suite_on<F>(backend: Backend, entries: &[SuiteEntry], on_result: F) -> Result<SuiteReport>
where
    F: FnMut(&SuiteEntry, &DepthResult),
{
    let positions = match backend {
        Backend::Cozy => run_suite::<CozyPosition, F>(entries, on_result)?,
        #[cfg(feature = "board-pleco")]
        Backend::Pleco => run_suite::<crate::board::pleco::PlecoPosition, F>(entries, on_result)?,
        #[cfg(not(feature = "board-pleco"))]
        Backend::Pleco => {
            return Err(PerftError::Setup { input: backend.to_string(), reason: "built without the board-pleco feature".into() })
        }
    };
    Ok(SuiteReport { backend, positions })
}
