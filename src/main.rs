use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

use savideo2yolo::{process_project, Args};

fn main() -> ExitCode {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let dirname = PathBuf::from(&args.sa_dir);
    if !dirname.exists() {
        error!("The specified sa_dir does not exist: {}", args.sa_dir);
        return ExitCode::FAILURE;
    }

    info!("Starting the conversion process...");

    match process_project(&args) {
        Ok(stats) if stats.videos_processed == 0 && stats.videos_failed > 0 => {
            error!("No video could be converted.");
            ExitCode::FAILURE
        }
        Ok(_) => {
            info!("Conversion process completed successfully.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to process project: {}", e);
            ExitCode::FAILURE
        }
    }
}
