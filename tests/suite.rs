use std::io::Write;

use perftcheck::board::cozy::CozyPosition;
use perftcheck::board::Backend;
use perftcheck::report;
use perftcheck::suite::{self, SuiteEntry};
use pretty_assertions::assert_eq;

fn shallow_suite() -> Vec<SuiteEntry> {
    suite::reference_suite().iter().map(|e| e.up_to(3)).collect()
}

#[test]
fn reference_suite_passes_to_depth_three() {
    let mut seen = 0;
    let report = suite::run_suite_on(Backend::Cozy, &shallow_suite(), |_, _| seen += 1).unwrap();
    assert!(report.passed(), "{}", report::markdown(&report));
    assert_eq!(seen, 18);
    assert_eq!(report.positions.len(), 6);
}

#[test]
fn mismatch_skips_deeper_depths() {
    let entries = vec![SuiteEntry {
        name: "broken".into(),
        fen: "startpos".into(),
        expected: vec![(1, 20), (2, 401), (3, 8902)],
    }];
    let reports = suite::run_suite::<CozyPosition, _>(&entries, |_, _| {}).unwrap();
    let r = &reports[0].results;
    assert!(r[0].correct);
    assert_eq!((r[1].nodes, r[1].correct), (Some(400), false));
    assert_eq!((r[2].nodes, r[2].correct), (None, false));
    let table = report::position_table(0, &reports[0]);
    assert!(table.contains("| 3 | -- | -- | false |"), "{table}");
}

#[test]
fn bad_fen_is_a_setup_error() {
    let entries = vec![SuiteEntry { name: "bad".into(), fen: "not a fen".into(), expected: vec![(1, 1)] }];
    let err = suite::run_suite::<CozyPosition, _>(&entries, |_, _| {}).unwrap_err();
    assert!(matches!(err, perftcheck::PerftError::Setup { .. }), "{err:?}");
}

#[test]
fn suite_file_round_trip() {
    let path = std::env::temp_dir().join(format!("perftcheck-suite-{}.jsonl", std::process::id()));
    {
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "# shallow reference positions").unwrap();
        for e in shallow_suite() {
            writeln!(f, "{}", serde_json::to_string(&e).unwrap()).unwrap();
        }
    }
    let loaded = suite::resolve_suite(Some(&path)).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(loaded, shallow_suite());
}

#[test]
fn missing_suite_file_is_reported() {
    let err = suite::load_suite(std::path::Path::new("/nonexistent/perft.jsonl")).unwrap_err();
    assert!(matches!(err, perftcheck::PerftError::Suite { .. }), "{err:?}");
}

#[cfg(feature = "board-pleco")]
#[test]
fn pleco_backend_passes_reference_suite() {
    let report = suite::run_suite_on(Backend::Pleco, &shallow_suite(), |_, _| {}).unwrap();
    assert!(report.passed(), "{}", report::markdown(&report));
    assert_eq!(report.backend, Backend::Pleco);
}
