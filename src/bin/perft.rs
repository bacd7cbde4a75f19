use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use perftcheck::board::cozy::CozyPosition;
#[cfg(feature = "board-pleco")]
use perftcheck::board::pleco::PlecoPosition;
use perftcheck::board::{Backend, Setup};
use perftcheck::perft::{self, Limits};
use perftcheck::{report, LegalityOracle};

#[derive(clap::Parser, Debug)]
#[command(name = "perft", version, about = "Perft driver for cozy-chess and pleco")]
struct Args {
    /// Rules backend answering legality questions
    #[arg(long, value_enum, default_value_t = Backend::default_backend())]
    backend: Backend,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Count move paths of exactly DEPTH plies
    Count {
        #[arg(value_name = "DEPTH", allow_negative_numbers = true)]
        depth: i32,
        /// FEN string or "startpos"
        #[arg(value_name = "FEN", default_value = "startpos")]
        fen: String,
        /// Number of threads for root-split
        #[arg(long, default_value_t = 1)]
        threads: usize,
        /// Report elapsed time and NPS
        #[arg(long, default_value_t = false)]
        nps: bool,
        /// Walk the tree with an explicit stack instead of recursion
        #[arg(long, default_value_t = false)]
        iterative: bool,
        /// Give up after this many milliseconds
        #[arg(long)]
        movetime: Option<u64>,
        /// Run both Pleco and Cozy and compare NPS
        #[arg(long, default_value_t = false)]
        compare: bool,
    },
    /// Node count below each root move
    Divide {
        #[arg(value_name = "DEPTH", allow_negative_numbers = true)]
        depth: i32,
        #[arg(value_name = "FEN", default_value = "startpos")]
        fen: String,
    },
    /// List legal moves as "<piece> from <square> to <square>"
    Moves {
        #[arg(value_name = "FEN", default_value = "startpos")]
        fen: String,
    },
    /// List legal moves in coordinate notation
    AlgMoves {
        #[arg(value_name = "FEN", default_value = "startpos")]
        fen: String,
    },
}

#[derive(Clone, Copy, Debug)]
struct CountOpts {
    threads: usize,
    iterative: bool,
    movetime: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if let Command::Count { depth, ref fen, threads, iterative, movetime, compare: true, .. } = args.cmd {
        return compare(depth, fen, CountOpts { threads, iterative, movetime });
    }
    match args.backend {
        Backend::Cozy => run::<CozyPosition>(&args.cmd),
        #[cfg(feature = "board-pleco")]
        Backend::Pleco => run::<PlecoPosition>(&args.cmd),
        #[cfg(not(feature = "board-pleco"))]
        Backend::Pleco => anyhow::bail!("the pleco backend requires --features board-pleco"),
    }
}

fn run<P>(cmd: &Command) -> Result<()>
where
    P: LegalityOracle + Setup + Clone + Send + Sync,
    P::Move: Send + Sync,
{
    match cmd {
        Command::Count { depth, fen, threads, nps, iterative, movetime, .. } => {
            let base = P::parse(fen).context("invalid position")?;
            let opts = CountOpts { threads: *threads, iterative: *iterative, movetime: *movetime };
            let (nodes, dt) = timed_count(&base, *depth, opts)?;
            if *nps {
                println!("nodes: {nodes} elapsed: {:.3}s nps: {:.1}", dt, nodes as f64 / dt.max(f64::EPSILON));
            } else {
                println!("{nodes}");
            }
        }
        Command::Divide { depth, fen } => {
            let mut pos = P::parse(fen).context("invalid position")?;
            let split = perft::divide(&mut pos, *depth)?;
            let rows: Vec<(String, u64)> = split.into_iter().map(|(mv, n)| (pos.describe_algebraic(mv), n)).collect();
            println!("{}", report::divide_listing(&rows));
        }
        Command::Moves { fen } => {
            let mut pos = P::parse(fen).context("invalid position")?;
            println!("{}", report::move_listing(&perft::describe_moves(&mut pos)?));
        }
        Command::AlgMoves { fen } => {
            let mut pos = P::parse(fen).context("invalid position")?;
            println!("{}", report::move_listing(&perft::enumerate_moves_algebraic(&mut pos)?));
        }
    }
    Ok(())
}

fn timed_count<P>(base: &P, depth: i32, opts: CountOpts) -> Result<(u64, f64)>
where
    P: LegalityOracle + Clone + Send + Sync,
    P::Move: Send + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new().num_threads(opts.threads.max(1)).build().context("thread pool")?;
    pool.install(|| -> Result<(u64, f64)> {
        let t0 = Instant::now();
        let limits = opts
            .movetime
            .map(|ms| Limits::with_deadline(t0 + Duration::from_millis(ms)))
            .unwrap_or_default();
        let nodes = if opts.threads > 1 {
            perft::count_parallel_with_limits(base, depth, &limits)?
        } else if opts.iterative {
            perft::count_iterative_with_limits(&mut base.clone(), depth, &limits)?
        } else {
            perft::count_with_limits(&mut base.clone(), depth, &limits)?
        };
        Ok((nodes, t0.elapsed().as_secs_f64()))
    })
}

#[cfg(feature = "board-pleco")]
fn compare(depth: i32, fen: &str, opts: CountOpts) -> Result<()> {
    let pleco_base = PlecoPosition::parse(fen).context("invalid position")?;
    let cozy_base = CozyPosition::parse(fen).context("invalid position")?;
    let (p_nodes, p_dt) = timed_count(&pleco_base, depth, opts)?;
    let (c_nodes, c_dt) = timed_count(&cozy_base, depth, opts)?;
    if p_nodes != c_nodes {
        anyhow::bail!("node counts disagree: pleco={p_nodes} cozy={c_nodes}");
    }
    let nps = |nodes: u64, dt: f64| if dt > 0.0 { nodes as f64 / dt } else { f64::INFINITY };
    let (p_nps, c_nps) = (nps(p_nodes, p_dt), nps(c_nodes, c_dt));
    println!("pleco: nodes={p_nodes} elapsed={p_dt:.3}s nps={p_nps:.1}");
    println!("cozy:  nodes={c_nodes} elapsed={c_dt:.3}s nps={c_nps:.1}");
    if !(p_nps.is_finite() && c_nps.is_finite()) { return Ok(()); }
    let (winner, fast, slow) = if p_nps >= c_nps { ("pleco", p_nps, c_nps) } else { ("cozy", c_nps, p_nps) };
    if fast == slow {
        println!("tie: equal nps");
    } else {
        println!("winner: {winner} by +{:.1} nps (+{:.1}%)", fast - slow, (fast - slow) / slow * 100.0);
    }
    Ok(())
}

#[cfg(not(feature = "board-pleco"))]
fn compare(_depth: i32, _fen: &str, _opts: CountOpts) -> Result<()> {
    anyhow::bail!("--compare requires --features board-pleco to be enabled")
}
