//! Text rendering of suite and divide results.

use std::fmt::{self, Write as _};
use std::time::Duration;

use crate::suite::{PositionReport, SuiteReport};

/// One Markdown table per position, in the order they were run.
pub fn markdown(report: &SuiteReport) -> String {
    render(|out| write_markdown(out, report))
}

pub fn position_table(index: usize, pos: &PositionReport) -> String {
    render(|out| write_position_table(out, index, pos))
}

pub fn json(report: &SuiteReport) -> serde_json::Result<String> { serde_json::to_string_pretty(report) }

/// `move: nodes` per line, then the total.
pub fn divide_listing(rows: &[(String, u64)]) -> String {
    render(|out| {
        for (mv, nodes) in rows {
            writeln!(out, "{mv}: {nodes}")?;
        }
        let total: u64 = rows.iter().map(|(_, n)| n).sum();
        write!(out, "\nNodes searched: {total}")
    })
}

/// One rendered move per line, then the number of moves.
pub fn move_listing(lines: &[String]) -> String {
    render(|out| {
        for line in lines {
            writeln!(out, "{line}")?;
        }
        write!(out, "{}", lines.len())
    })
}

fn render(f: impl FnOnce(&mut String) -> fmt::Result) -> String {
    let mut out = String::new();
    // writing into a String never fails
    f(&mut out).ok();
    out
}

fn write_markdown(out: &mut String, report: &SuiteReport) -> fmt::Result {
    for (i, pos) in report.positions.iter().enumerate() {
        write_position_table(out, i, pos)?;
        out.push('\n');
    }
    writeln!(
        out,
        "backend: {}  nodes: {}  time: {:.2?}  result: {}",
        report.backend,
        report.total_nodes(),
        elapsed(report.total_secs()),
        if report.passed() { "pass" } else { "FAIL" }
    )
}

fn write_position_table(out: &mut String, index: usize, pos: &PositionReport) -> fmt::Result {
    writeln!(out, "Position {index} ({}): {}", pos.name, pos.fen)?;
    out.push_str("| Depth | Perft score | time | correct |\n");
    out.push_str("|-------|-------------|------|---------|\n");
    for r in &pos.results {
        match (r.nodes, r.elapsed_secs) {
            (Some(nodes), Some(secs)) => {
                writeln!(out, "| {} | {}/{} | {:.2?} | {} |", r.depth, nodes, r.expected, elapsed(secs), r.correct)?
            }
            _ => writeln!(out, "| {} | -- | -- | {} |", r.depth, r.correct)?,
        }
    }
    Ok(())
}

/// Reports may be read back from hand-edited JSON, so out-of-range seconds
/// (negative, NaN, overflowing) render as zero.
fn elapsed(secs: f64) -> Duration { Duration::try_from_secs_f64(secs).unwrap_or_default() }
