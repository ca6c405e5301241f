use super::{launcher, load_scenario, script_root};
use crate::config::Settings;
use crate::error::Result;
use chrono::{DateTime, Local, TimeZone};
use forcecheck::workflows::harness::Harness;
use forcecheck::workflows::outcome::GenerateOutcome;
use std::path::Path;
use tracing::info;

/// Timestamp in the classic `ctime` layout, e.g. `Sun Oct 18 12:00:00 2026`.
pub fn ctime<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format("%a %b %e %H:%M:%S %Y").to_string()
}

pub fn run(input: &Path, output: &Path, settings: &Settings) -> Result<i32> {
    let config = load_scenario(input)?;
    let launcher = launcher(settings);
    let harness = Harness::new(&launcher, &config).with_script_root(script_root(input));

    match harness.generate(&ctime(&Local::now()))? {
        GenerateOutcome::Generated(reference) => {
            reference.write_to_path(output)?;
            info!(path = ?output, "Reference document written.");
            println!(
                "Wrote {} ({} particles) from {}",
                output.display(),
                reference.natoms,
                input.display()
            );
        }
        GenerateOutcome::Skipped(reason) => {
            println!("Skipped generating {}: {}", output.display(), reason);
        }
    }
    Ok(0)
}
