use std::path::PathBuf;

use clap::Parser;
use flight_rtree::{Config, FlightRTree, LoadPolicy, DEFAULT_MAX_ENTRIES};

#[derive(Parser)]
#[command(version, about, long_about = None, allow_negative_numbers = true)]
struct Cli {
    /// Path to the flights CSV (`timestamp,identifier,duration` with a header line)
    #[arg(value_name = "FILE")]
    file: PathBuf,
    /// Report the flights airborne at this time, may be repeated
    #[arg(long = "at", value_name = "TIME")]
    at: Vec<f64>,
    /// Maximum entries or children per node
    #[arg(long, default_value_t = DEFAULT_MAX_ENTRIES)]
    max_entries: usize,
    /// Print the tree structure after loading
    #[arg(long, default_value_t = false)]
    traverse: bool,
    /// Skip malformed lines instead of stopping at the first one
    #[arg(long, default_value_t = false)]
    skip_malformed: bool,
}

fn main() -> Result<(), String> {
    env_logger::init();
    let cli = Cli::parse();

    let config = Config::new(cli.max_entries).map_err(|e| e.to_string())?;
    let policy = if cli.skip_malformed {
        LoadPolicy::SkipMalformed
    } else {
        LoadPolicy::Strict
    };

    let mut tree = FlightRTree::with_config(config);
    let summary = tree
        .load_from_path(&cli.file, policy)
        .map_err(|e| format!("{}: {}", cli.file.display(), e))?;
    for (_, e) in &summary.skipped {
        eprintln!("skipped {e}");
    }

    if cli.traverse {
        print!("{tree}");
    }

    for at in cli.at {
        let found = tree.search(at);
        println!("{at}: {} flight(s)", found.len());
        for flight in found {
            println!("  {} [{}, {}]", flight.id, flight.start, flight.end());
        }
    }
    Ok(())
}
