// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Milepost command line interface.
//!
//! Loads a TSP instance, solves it to proven optimality, and prints one
//! line `shortest <sequence> (<distance>)`. Verbosity flags add search
//! traces and a final counters block; ambient diagnostics go through
//! `log`/`env_logger` and never pollute the contractual stdout lines.

use anyhow::{Context, Result};
use clap::Parser;
use milepost_model::loading::GraphLoader;
use milepost_search::{
    monitor::TraceMonitor, solver::TspSolver, stats::SolveStatistics, verbosity::Verbosity,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "milepost")]
#[command(version)]
#[command(about = "An exact parallel solver for the symmetric TSP")]
struct Cli {
    /// Verbosity bit mask: graph=1, shorter=2, bound=4, analyse=8,
    /// counters=16.
    #[arg(short, long, default_value = "0")]
    verbosity: u32,

    /// Number of worker threads.
    #[arg(short, long, default_value = "2")]
    threads: usize,

    /// Path to the TSP instance file.
    #[arg(short = 'f', long = "file")]
    filename: PathBuf,
}

fn main() {
    env_logger::init();

    // Argument errors exit with code 1, like every other failure.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            std::process::exit(if error.use_stderr() { 1 } else { 0 });
        }
    };

    if let Err(error) = run(cli) {
        eprintln!("Error: {:#}", error);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let verbosity = Verbosity::from_bits(cli.verbosity);

    let graph = GraphLoader::default()
        .load_from_path::<i64, _>(&cli.filename)
        .with_context(|| format!("Failed to load instance {:?}", cli.filename))?;
    log::info!("loaded {} cities from {:?}", graph.size(), cli.filename);

    if verbosity.contains(Verbosity::GRAPH) {
        print!("{}", graph);
    }

    let solver = TspSolver::builder()
        .with_threads(cli.threads)
        .build()
        .context("Invalid solver configuration")?;

    let monitor = TraceMonitor::new(verbosity);
    let outcome = solver.solve_with_monitor(&graph, &monitor);

    println!("shortest {}", outcome.solution());

    if verbosity.contains(Verbosity::COUNTERS) {
        print_counters(outcome.statistics());
    }

    Ok(())
}

/// Renders the counters block from the collected statistics.
fn print_counters(statistics: &SolveStatistics) {
    println!("verified: {}", statistics.tours_verified);
    println!("found shorter: {}", statistics.improvements_found);
    print!("bound (per level):");
    for hits in &statistics.prunings_per_level {
        print!(" {}", hits);
    }
    println!();
}
