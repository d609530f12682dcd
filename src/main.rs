use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;
use serde_json::json;
use std::path::PathBuf;
use std::time::Instant;

use sais_table::{read_text, Alphabet, SuffixTable, TextFormat};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Verbose/info output (default: quiet)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Debug output, including per-level construction sizes
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a suffix table over the bytes of a file and save it
    Build {
        /// Text to index
        input: PathBuf,

        /// Where to write the table
        #[arg(short, long)]
        output: PathBuf,

        /// Input format: plain, gzip or zstd (default: guessed from the extension)
        #[arg(short, long)]
        format: Option<TextFormat>,

        /// Index at most this many bytes of the input
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Look up patterns in a saved table
    Search {
        /// Saved suffix table
        table: PathBuf,

        /// Patterns to look up
        #[arg(required = true)]
        patterns: Vec<String>,
    },

    /// Summarize a saved table from its LCP array
    Stats {
        /// Saved suffix table
        table: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG still wins when set explicitly.
    let log_level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match args.command {
        Command::Build {
            input,
            output,
            format,
            limit,
        } => build(input, output, format, limit),
        Command::Search { table, patterns } => search(table, &patterns),
        Command::Stats { table } => stats(table),
    }
}

fn build(
    input: PathBuf,
    output: PathBuf,
    format: Option<TextFormat>,
    limit: Option<usize>,
) -> Result<()> {
    let format = format.unwrap_or_else(|| TextFormat::from_path(&input));
    let start = Instant::now();
    let text = read_text(&input, format, limit)?;
    info!("Read {} bytes in {:?}", text.len(), start.elapsed());

    let start = Instant::now();
    let table = SuffixTable::new(text);
    info!("Built suffix table in {:?}", start.elapsed());
    anyhow::ensure!(table.is_sorted(), "suffix table is not sorted");

    table.save(&output)?;
    info!("Wrote {}", output.display());
    Ok(())
}

fn search(path: PathBuf, patterns: &[String]) -> Result<()> {
    let table = SuffixTable::<u8>::load(&path)?;
    info!("Loaded {} suffixes from {}", table.table().len(), path.display());

    let queries: Vec<Vec<u8>> = patterns.iter().map(|p| p.as_bytes().to_vec()).collect();
    let lcps = table.batch_lcp(&queries);
    for (pattern, (query, lcp)) in patterns.iter().zip(queries.iter().zip(lcps)) {
        let row = json!({
            "pattern": pattern,
            "contains": lcp == query.len(),
            "lower_bound": table.lower_bound(query),
            "lcp": lcp,
            "count": table.count(query),
        });
        println!("{}", row);
    }
    Ok(())
}

fn stats(path: PathBuf) -> Result<()> {
    let table = SuffixTable::<u8>::load(&path)?;
    let start = Instant::now();
    let distinct_substrings = table.distinct_substrings();
    info!("Computed LCP statistics in {:?}", start.elapsed());

    let n = table.len();
    let (repeat_at, max_lcp) = table.longest_repeat();
    let longest_repeat = String::from_utf8_lossy(&table.text()[repeat_at..repeat_at + max_lcp]);

    let row = json!({
        "length": n,
        "alphabet_size": Alphabet::from_text(table.text()).len(),
        "max_lcp": max_lcp,
        "longest_repeat_position": repeat_at,
        "longest_repeat": longest_repeat,
        "distinct_substrings": distinct_substrings,
    });
    println!("{}", row);
    Ok(())
}
