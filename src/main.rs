//! Log Heatmap - keyword frequency bar chart for log files
//!
//! Main entry point for the command-line application.

use std::error::Error as _;
use std::io;
use std::path::Path;
use std::process;

use log_heatmap::cli::{Args, USAGE};
use log_heatmap::dispatcher::{Dispatcher, DispatcherConfig};
use log_heatmap::ranking::rank;
use log_heatmap::report::Report;
use log_heatmap::stats::{print_error, print_info, print_warning};

fn main() {
    // Parse command-line arguments
    let args = Args::parse_normalized();

    let Some(path) = args.input_path().map(Path::to_path_buf) else {
        println!("{}", USAGE);
        process::exit(1);
    };

    // Set up logging; an explicit RUST_LOG wins
    let default_level = if args.verbose {
        "debug"
    } else if args.quiet {
        "error"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Stderr)
        .init();

    // Run the application
    if let Err(e) = run(&args, &path) {
        print_error(&format!("{}", e));

        // Print chain of errors
        let mut source = e.source();
        while let Some(err) = source {
            print_error(&format!("  Caused by: {}", err));
            source = err.source();
        }

        process::exit(1);
    }
}

fn run(args: &Args, path: &Path) -> anyhow::Result<()> {
    let dispatcher = Dispatcher::new(DispatcherConfig::from_args(args)?);

    if args.verbose && !args.quiet {
        print_config(args, path, dispatcher.config());
    }

    let counts = dispatcher.run(path)?;

    let ranked = rank(counts);
    if ranked.is_empty() && !args.quiet {
        print_warning(&format!("No keywords found in {}", path.display()));
    }

    let report = Report::new(path.display().to_string(), args.top, ranked).with_bar_width(args.width);
    report.write_to(io::stdout().lock())?;

    if args.stats {
        dispatcher.stats().print_summary();
    }

    Ok(())
}

/// Print configuration summary
fn print_config(args: &Args, path: &Path, config: &DispatcherConfig) {
    print_info(&format!("Input:        {}", path.display()));
    print_info(&format!("Top:          {}", args.top));
    print_info(&format!("Chunk size:   {} lines", config.chunk_size));
    print_info(&format!("Workers:      {}", config.workers));
    print_info(&format!("Queue depth:  {} chunks", config.queue_depth));
    print_info(&format!("Merge:        {:?} ({} shards)", config.merge_strategy, config.shards));
    print_info(&format!("Bar width:    {}", args.width));
}
