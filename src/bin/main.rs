use std::path::PathBuf;

use anstream::println;
use clap::Parser;
use clap::ValueEnum;
use owo_colors::OwoColorize;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use search::algorithms::uninformed::Algorithm;
use search::algorithms::uninformed::search;
use search::problem::Problem;
use search::problems::maze::Coord;
use search::problems::maze::MazeProblem;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum AlgorithmChoice {
    Bfs,
    Dfs,
    Both,
}

impl AlgorithmChoice {
    fn algorithms(self) -> &'static [Algorithm] {
        match self {
            AlgorithmChoice::Bfs => &[Algorithm::Bfs],
            AlgorithmChoice::Dfs => &[Algorithm::Dfs],
            AlgorithmChoice::Both => &Algorithm::ALL,
        }
    }
}

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(long_version = search::build::CLAP_LONG_VERSION)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Maze to solve, in the text format. A random one is generated if missing
    #[arg(long, env = "MAZE")]
    pub maze: Option<PathBuf>,

    #[arg(long, env = "MAZE_WIDTH", default_value_t = 10)]
    pub width: Coord,
    #[arg(long, env = "MAZE_HEIGHT", default_value_t = 10)]
    pub height: Coord,
    #[arg(long, env = "MAZE_SEED", default_value_t = 0u64)]
    pub seed: u64,

    #[arg(short, long, value_enum, default_value_t = AlgorithmChoice::Both)]
    pub algorithm: AlgorithmChoice,

    #[command(flatten)]
    color: colorchoice_clap::Color,
}

fn load(args: &Args) -> std::io::Result<MazeProblem> {
    match &args.maze {
        Some(p) => {
            let text = std::fs::read_to_string(p)?;
            MazeProblem::try_from(text.as_str()).map_err(std::io::Error::other)
        }
        None => {
            let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
            MazeProblem::generate(args.width, args.height, &mut rng).map_err(std::io::Error::other)
        }
    }
}

fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    args.color.write_global();

    let problem = load(&args)?;
    let (width, height) = problem.space().dimensions();
    println!(
        "{} {width}x{height} from {} to {}",
        "Maze".bold(),
        problem.start().yellow(),
        problem.goal().yellow()
    );
    println!("{problem}");

    for &algorithm in args.algorithm.algorithms() {
        match search(&problem, algorithm) {
            Ok(result) => {
                println!("{} {}", algorithm.green().bold(), result.path());
                println!("{}", problem.display_path(result.path()));
                result.stats().write_stats(anstream::stdout())?;
            }
            Err(e) => {
                println!("{} {}", algorithm.red().bold(), e.red());
            }
        }
    }

    Ok(())
}
