mod defaults;
mod file;

use crate::error::{CliError, Result};
use crate::logging;
use defaults::DefaultsConfig;
use file::FileSettings;
use forcecheck::workflows::mode::ExecutionMode;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;

/// Environment variable naming the harness settings file.
pub const CONFIG_ENV: &str = "FORCECHECK_CONFIG";

/// Process-wide harness settings, resolved from the settings file and the
/// built-in defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub threads: Option<usize>,
    pub packages: Vec<String>,
    pub log_level: LevelFilter,
    pub log_file: Option<PathBuf>,
    pub modes: Vec<ExecutionMode>,
}

impl Settings {
    pub fn load_from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => Self::load(Some(Path::new(&path))),
            _ => Self::load(None),
        }
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => FileSettings::from_file(path)?,
            None => FileSettings::default(),
        };
        Self::resolve(file)
    }

    fn resolve(file: FileSettings) -> Result<Self> {
        let defaults = DefaultsConfig::default();
        let logging_config = file.logging.unwrap_or_default();

        if file.threads == Some(0) {
            return Err(CliError::Config(
                "'threads' must be at least 1 when set.".to_string(),
            ));
        }

        let modes = match file.modes {
            Some(modes) if modes.is_empty() => {
                return Err(CliError::Config(
                    "At least one execution mode must be declared under [[modes]].".to_string(),
                ));
            }
            Some(modes) => modes
                .into_iter()
                .map(|m| m.into_mode())
                .collect::<Result<Vec<_>>>()?,
            None => defaults.modes,
        };

        let settings = Self {
            threads: file.threads,
            packages: file.packages.unwrap_or(defaults.packages),
            log_level: logging::parse_level(
                logging_config.level.as_deref().unwrap_or(&defaults.log_level),
            )?,
            log_file: logging_config.file,
            modes,
        };
        debug!("Resolved harness settings: {:?}", settings);
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.threads, None);
        assert_eq!(settings.packages, vec!["OMP".to_string()]);
        assert_eq!(settings.log_level, LevelFilter::WARN);
        assert_eq!(settings.log_file, None);
        assert_eq!(settings.modes, ExecutionMode::defaults());
    }

    #[test]
    fn settings_file_replaces_modes_and_logging() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("forcecheck.toml");
        fs::write(
            &path,
            r#"
            threads = 4
            packages = []

            [logging]
            level = "debug"
            file = "harness.log"

            [[modes]]
            name = "plain"
            "#,
        )
        .unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.threads, Some(4));
        assert!(settings.packages.is_empty());
        assert_eq!(settings.log_level, LevelFilter::DEBUG);
        assert_eq!(settings.log_file, Some(PathBuf::from("harness.log")));
        assert_eq!(settings.modes, vec![ExecutionMode::plain()]);
    }

    #[test]
    fn malformed_file_reports_its_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "threads = \"many\"").unwrap();

        let err = Settings::load(Some(&path)).unwrap_err();
        match err {
            CliError::FileParsing { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unreadable_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let result = Settings::load(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(CliError::Io(_))));
    }

    #[test]
    fn empty_mode_list_is_rejected() {
        let result = Settings::resolve(FileSettings {
            modes: Some(Vec::new()),
            ..FileSettings::default()
        });
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn zero_threads_is_rejected() {
        let result = Settings::resolve(FileSettings {
            threads: Some(0),
            ..FileSettings::default()
        });
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
