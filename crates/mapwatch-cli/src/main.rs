use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use clap::Parser;
use mapwatch_core::{WatchOptions, start};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mapwatch")]
#[command(about = "Reports the beatmap currently loaded by a running osu! client", version)]
struct Args {
    /// Exit after the first successful reading and print it
    #[arg(long)]
    once: bool,

    /// Mirror every change into FILE
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("mapwatch=info".parse()?)
                .add_directive("mapwatch_core=info".parse()?),
        )
        .init();

    let args = Args::parse();

    // Graceful shutdown: the watcher observes the flag between ticks.
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    ctrlc::set_handler(move || {
        info!("received shutdown signal, stopping...");
        flag.store(true, Ordering::SeqCst);
    })?;

    let defaults = WatchOptions::default();
    let options = WatchOptions {
        run_once: args.once,
        write_to_file: args.output.is_some(),
        file_path: args.output.unwrap_or(defaults.file_path),
    };

    let last = start(options, stop);

    if args.once {
        match last {
            Some(path) => println!("{path}"),
            None => info!("no reading observed"),
        }
    }

    Ok(())
}
