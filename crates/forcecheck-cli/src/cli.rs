use clap::{Parser, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

const AFTER_HELP: &str = "\
Harness settings (threads, logging, execution modes) are read from the TOML
file named by the FORCECHECK_CONFIG environment variable, if set.";

#[derive(Parser, Debug)]
#[command(
    name = "forcecheck",
    version,
    about = "forcecheck - Regression harness for bonded-interaction styles of a molecular dynamics engine.",
    help_template = HELP_TEMPLATE,
    after_help = AFTER_HELP,
)]
pub struct Cli {
    /// Scenario document (YAML) holding the setup and reference values.
    #[arg(value_name = "PATH")]
    pub input: PathBuf,

    /// Run the scenario and write a fresh reference document instead of verifying.
    #[arg(long = "gen", value_name = "PATH", conflicts_with = "stats")]
    pub generate: Option<PathBuf>,

    /// Print per-group error statistics to stderr while verifying.
    #[arg(long, value_name = "yes|no")]
    pub stats: Option<Toggle>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toggle {
    Yes,
    No,
}

impl Cli {
    pub fn print_stats(&self) -> bool {
        self.stats == Some(Toggle::Yes)
    }
}
