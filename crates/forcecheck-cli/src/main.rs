mod cli;
mod commands;
mod config;
mod error;
mod logging;

use crate::cli::Cli;
use crate::config::Settings;
use crate::error::{CliError, Result, USAGE_EXIT};
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    let code = match run_app() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\n❌ Error: {}", e);
            e.exit_code()
        }
    };
    std::process::exit(code);
}

fn run_app() -> Result<i32> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let usage_error = e.use_stderr();
            e.print()?;
            return Ok(if usage_error { USAGE_EXIT } else { 0 });
        }
    };

    let settings = Settings::load_from_env()?;
    logging::setup_logging(settings.log_level, settings.log_file.clone())?;

    info!("🚀 forcecheck v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    if let Some(num_threads) = settings.threads {
        info!(
            "Setting Rayon global thread pool to {} threads.",
            num_threads
        );
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| {
                CliError::Other(anyhow::anyhow!("Failed to build global thread pool: {}", e))
            })?;
    }

    let command_result = match &cli.generate {
        Some(output) => {
            info!("Dispatching to reference generation.");
            commands::generate::run(&cli.input, output, &settings)
        }
        None => {
            info!("Dispatching to verification.");
            commands::verify::run(&cli.input, cli.print_stats(), &settings)
        }
    };

    match &command_result {
        Ok(0) => info!("✅ Command completed successfully."),
        Ok(code) => error!("❌ Verification failed (exit code {}).", code),
        Err(e) => error!("❌ Command failed: {}", e),
    }

    command_result
}
