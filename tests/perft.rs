use perftcheck::board::cozy::CozyPosition;
use perftcheck::board::{Setup, START_FEN};
use perftcheck::perft::{count, count_iterative, count_parallel, divide, enumerate_moves};
use perftcheck::LegalityOracle;

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
const FOOLS_MATE: &str = "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3";
const STALEMATE: &str = "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1";

#[test]
fn perft_startpos_small_depths() {
    let mut b = CozyPosition::startpos();
    assert_eq!(count(&mut b, 0).unwrap(), 1);
    assert_eq!(count(&mut b, 1).unwrap(), 20);
    assert_eq!(count(&mut b, 2).unwrap(), 400);
    assert_eq!(count(&mut b, 3).unwrap(), 8902);
    assert_eq!(count(&mut b, 4).unwrap(), 197281);
}

#[test]
fn perft_reference_positions() {
    let cases = [
        (KIWIPETE, 3, 97_862),
        ("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 4, 43_238),
        ("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1", 3, 9_467),
        ("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8", 3, 62_379),
    ];
    for (fen, depth, nodes) in cases {
        let mut b = CozyPosition::from_fen(fen).unwrap();
        assert_eq!(count(&mut b, depth).unwrap(), nodes, "{fen}");
    }
}

#[test]
fn position_is_unchanged_after_count() {
    for fen in [START_FEN, KIWIPETE] {
        let mut b = CozyPosition::from_fen(fen).unwrap();
        let (fen_before, hash_before) = (b.fen(), b.hash());
        count(&mut b, 3).unwrap();
        count_iterative(&mut b, 3).unwrap();
        divide(&mut b, 2).unwrap();
        assert_eq!(b.fen(), fen_before);
        assert_eq!(b.hash(), hash_before);
        assert_eq!(b.plies_applied(), 0);
    }
}

#[test]
fn depth_one_equals_legal_move_count() {
    let mut b = CozyPosition::from_fen(KIWIPETE).unwrap();
    assert_eq!(count(&mut b, 1).unwrap(), b.legal_moves().len() as u64);
}

#[test]
fn count_decomposes_over_root_moves() {
    let mut b = CozyPosition::from_fen(KIWIPETE).unwrap();
    let mut sum = 0;
    for mv in b.legal_moves() {
        b.apply(mv).unwrap();
        sum += count(&mut b, 2).unwrap();
        b.undo(mv).unwrap();
    }
    assert_eq!(sum, count(&mut b, 3).unwrap());
}

#[test]
fn terminal_positions_count_zero_beyond_depth_zero() {
    for fen in [FOOLS_MATE, STALEMATE] {
        let mut b = CozyPosition::from_fen(fen).unwrap();
        assert_eq!(count(&mut b, 0).unwrap(), 1, "{fen}");
        for d in 1..4 {
            assert_eq!(count(&mut b, d).unwrap(), 0, "{fen} depth {d}");
        }
        assert!(enumerate_moves(&mut b).unwrap().is_empty());
    }
}

#[test]
fn enumerate_matches_legal_moves() {
    let mut b = CozyPosition::from_fen(KIWIPETE).unwrap();
    let listed = enumerate_moves(&mut b).unwrap();
    assert_eq!(listed, b.legal_moves());
}

#[test]
fn traversal_strategies_agree() {
    let mut b = CozyPosition::from_fen(KIWIPETE).unwrap();
    let pool = rayon::ThreadPoolBuilder::new().num_threads(4).build().unwrap();
    for d in 0..4 {
        let recursive = count(&mut b, d).unwrap();
        assert_eq!(count_iterative(&mut b, d).unwrap(), recursive, "iterative depth {d}");
        assert_eq!(pool.install(|| count_parallel(&b, d)).unwrap(), recursive, "parallel depth {d}");
    }
}

#[cfg(feature = "board-pleco")]
mod pleco_backend {
    use super::*;
    use perftcheck::board::pleco::PlecoPosition;

    #[test]
    fn perft_startpos_small_depths() {
        let mut b = PlecoPosition::startpos();
        assert_eq!(count(&mut b, 1).unwrap(), 20);
        assert_eq!(count(&mut b, 2).unwrap(), 400);
        assert_eq!(count(&mut b, 3).unwrap(), 8902);
        assert_eq!(count(&mut b, 4).unwrap(), 197281);
        assert_eq!(b.fen(), PlecoPosition::startpos().fen());
    }

    #[test]
    fn backends_agree_on_divide() {
        let mut p = PlecoPosition::from_fen(KIWIPETE).unwrap();
        let mut c = CozyPosition::from_fen(KIWIPETE).unwrap();
        let mut p_rows: Vec<(String, u64)> =
            divide(&mut p, 2).unwrap().into_iter().map(|(m, n)| (p.describe_algebraic(m), n)).collect();
        let mut c_rows: Vec<(String, u64)> =
            divide(&mut c, 2).unwrap().into_iter().map(|(m, n)| (c.describe_algebraic(m), n)).collect();
        p_rows.sort();
        c_rows.sort();
        pretty_assertions::assert_eq!(p_rows, c_rows);
    }

    #[test]
    fn terminal_positions() {
        for fen in [FOOLS_MATE, STALEMATE] {
            let mut b = PlecoPosition::from_fen(fen).unwrap();
            assert_eq!(count(&mut b, 0).unwrap(), 1);
            assert_eq!(count(&mut b, 2).unwrap(), 0);
        }
    }
}
