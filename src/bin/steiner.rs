use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use fast_steiner::algorithm::dijkstra::{dijkstra, DijkstraScratch};
use fast_steiner::graph::Adjacency;
use fast_steiner::{parser, solve, Error, SolverOptions, SteinerIndex, INF};

#[derive(Parser, Debug)]
#[command(about = "Erickson-Monma-Veinott Steiner tree solver.")]
struct Args {
    /// Input instance in SteinLib-style format; stdin when omitted.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Run the Erickson-Monma-Veinott solver.
    #[arg(long, alias = "el")]
    erickson: bool,

    /// Run one Dijkstra from a pseudo-random source instead of solving.
    #[arg(long)]
    dijkstra: bool,

    /// Seed for the pseudo-random source vertex.
    #[arg(long, default_value_t = 123_456_789)]
    seed: u64,

    /// Print an optimal Steiner tree as an edge list.
    #[arg(long)]
    list: bool,

    /// Number of worker threads; hardware parallelism when omitted.
    #[arg(long)]
    workers: Option<usize>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> fast_steiner::Result<()> {
    let load_start = Instant::now();
    let instance = match &args.input {
        Some(path) => parser::load_file(path)?,
        None => {
            info!("no input file specified, reading stdin");
            parser::parse_steinlib(BufReader::new(io::stdin()))?
        }
    };
    info!("loaded in {:.2?}", load_start.elapsed());

    let mut opts = SolverOptions::new().with_traceback(args.list);
    if let Some(workers) = args.workers {
        opts = opts.with_workers(workers);
    }

    let mut index = SteinerIndex::build(&instance, opts.workers())?;
    info!(
        "terminals: {:?} (1-based)",
        index.terminals().iter().map(|t| t + 1).collect::<Vec<_>>()
    );

    if args.dijkstra {
        let mut rng = StdRng::seed_from_u64(args.seed);
        let source = rng.gen_range(0..index.num_vertices());
        let mut scratch = DijkstraScratch::new(index.universe());
        let start = Instant::now();
        dijkstra(&index, source, &mut scratch);
        let reached = scratch.dist[..index.num_vertices()]
            .iter()
            .filter(|&&d| d < INF)
            .count();
        println!(
            "dijkstra: source = {}, reached = {reached} of {} [{:.2?}]",
            source + 1,
            index.num_vertices(),
            start.elapsed()
        );
        return Ok(());
    }

    if args.erickson {
        let solution = solve(&mut index, &opts)?;
        if solution.cost == INF {
            println!("no Steiner tree spans the terminals");
            return Ok(());
        }
        println!("cost: {}", solution.cost);
        if let Some(declared) = index.declared_cost() {
            if declared != solution.cost {
                return Err(Error::CostMismatch {
                    declared,
                    computed: solution.cost,
                });
            }
        }
        if args.list {
            let list = solution
                .edges
                .iter()
                .map(|&(u, v, _)| format!("\"{} {}\"", u + 1, v + 1))
                .collect::<Vec<_>>()
                .join(", ");
            println!("solution: [{list}]");
        }
        return Ok(());
    }

    info!("no command given; the instance was parsed and indexed only");
    Ok(())
}
