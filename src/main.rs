use clap::Parser;
use log::{info, warn};
use snafu::ErrorCompat;

mod args;
mod fairness;

fn main() {
    let args = args::Args::parse();

    if args.verbose {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    info!("args: {:?}", args);

    let res = fairness::run(&args);
    if let Err(e) = res {
        warn!("Error occured {:?}", e);
        eprintln!("Failed to process the rosters:\n{}", e);
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}
