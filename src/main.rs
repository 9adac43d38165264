use clap::Parser;
use log::{error, info};
use std::process::ExitCode;

use deepfashion2voc::{process_dataset, Args, ErrorKind};

fn main() -> ExitCode {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if !args.dataset_dir.is_dir() {
        error!(
            "The specified dataset_dir does not exist: {}",
            args.dataset_dir.display()
        );
        return ExitCode::FAILURE;
    }

    info!("Starting the conversion process...");

    match process_dataset(&args) {
        Ok(stats) => {
            println!("{}", stats.saved_annotations);
            ExitCode::SUCCESS
        }
        Err(e) => {
            match e.kind() {
                ErrorKind::Integrity => error!("Dataset integrity check failed: {}", e),
                ErrorKind::Config => error!("Missing input: {}", e),
                ErrorKind::Io => error!("Failed to process dataset: {}", e),
            }
            ExitCode::FAILURE
        }
    }
}
