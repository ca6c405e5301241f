use crate::error::{CliError, Result};
use forcecheck::workflows::mode::{ExecutionMode, Relaxation, ToleranceSchedule};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileLoggingConfig {
    pub level: Option<String>,
    pub file: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileTolerances {
    #[serde(rename = "base-scale")]
    pub base_scale: Option<f64>,
    #[serde(rename = "init-forces")]
    pub init_forces: Option<f64>,
    #[serde(rename = "init-stress")]
    pub init_stress: Option<f64>,
    #[serde(rename = "init-energy")]
    pub init_energy: Option<f64>,
    #[serde(rename = "run-forces")]
    pub run_forces: Option<f64>,
    #[serde(rename = "run-stress")]
    pub run_stress: Option<f64>,
    #[serde(rename = "run-energy")]
    pub run_energy: Option<f64>,
}

impl FileTolerances {
    /// Fills unset multipliers from `base`.
    fn over(self, base: ToleranceSchedule) -> ToleranceSchedule {
        ToleranceSchedule {
            base_scale: self.base_scale.unwrap_or(base.base_scale),
            init_forces: self.init_forces.unwrap_or(base.init_forces),
            init_stress: self.init_stress.unwrap_or(base.init_stress),
            init_energy: self.init_energy.unwrap_or(base.init_energy),
            run_forces: self.run_forces.unwrap_or(base.run_forces),
            run_stress: self.run_stress.unwrap_or(base.run_stress),
            run_energy: self.run_energy.unwrap_or(base.run_energy),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileRelaxation {
    pub pattern: String,
    pub exempt: Option<String>,
    pub factor: f64,
}

impl From<FileRelaxation> for Relaxation {
    fn from(r: FileRelaxation) -> Self {
        Self {
            pattern: r.pattern,
            exempt: r.exempt,
            factor: r.factor,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileMode {
    pub name: String,
    pub package: Option<String>,
    pub suffix: Option<String>,
    #[serde(default)]
    pub tolerances: FileTolerances,
    #[serde(default)]
    pub relaxations: Vec<FileRelaxation>,
}

impl FileMode {
    /// A mode with a suffix starts from the accelerated schedule, a plain
    /// mode from the default one.
    pub fn into_mode(self) -> Result<ExecutionMode> {
        if self.name.trim().is_empty() {
            return Err(CliError::Config("Execution mode names must not be empty.".into()));
        }
        if let Some(bad) = self.relaxations.iter().find(|r| r.factor <= 0.0) {
            return Err(CliError::Config(format!(
                "Relaxation factor for '{}' in mode '{}' must be positive, got {}.",
                bad.pattern, self.name, bad.factor
            )));
        }
        let base = if self.suffix.is_some() {
            ToleranceSchedule::accelerated()
        } else {
            ToleranceSchedule::default()
        };
        Ok(ExecutionMode {
            name: self.name,
            package: self.package,
            suffix: self.suffix,
            tolerances: self.tolerances.over(base),
            relaxations: self.relaxations.into_iter().map(Into::into).collect(),
        })
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileSettings {
    pub threads: Option<usize>,
    /// Packages the built-in sandbox engine reports as installed.
    pub packages: Option<Vec<String>>,
    pub logging: Option<FileLoggingConfig>,
    pub modes: Option<Vec<FileMode>>,
}

impl FileSettings {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading harness settings from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kebab_case_tolerances_are_parsed() {
        let settings = FileSettings::from_toml(
            r#"
            threads = 2

            [[modes]]
            name = "intel"
            package = "INTEL"
            suffix = "intel"

            [modes.tolerances]
            base-scale = 4.0
            run-stress = 20.0

            [[modes.relaxations]]
            pattern = "bond_modify table"
            exempt = "bond_modify table 0"
            factor = 1.0e6
            "#,
        )
        .unwrap();
        assert_eq!(settings.threads, Some(2));
        let modes = settings.modes.unwrap();
        assert_eq!(modes.len(), 1);
        assert_eq!(modes[0].tolerances.base_scale, Some(4.0));
        assert_eq!(modes[0].relaxations[0].factor, 1.0e6);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(FileSettings::from_toml("thread = 4").is_err());
        assert!(FileSettings::from_toml("[logging]\nverbosity = 2").is_err());
    }

    #[test]
    fn suffixed_mode_fills_gaps_from_accelerated_schedule() {
        let mode = FileMode {
            name: "intel".into(),
            package: Some("INTEL".into()),
            suffix: Some("intel".into()),
            tolerances: FileTolerances {
                run_stress: Some(20.0),
                ..FileTolerances::default()
            },
            relaxations: Vec::new(),
        }
        .into_mode()
        .unwrap();
        assert_eq!(mode.tolerances.base_scale, 5.0);
        assert_eq!(mode.tolerances.init_stress, 10.0);
        assert_eq!(mode.tolerances.run_stress, 20.0);
    }

    #[test]
    fn plain_mode_fills_gaps_from_default_schedule() {
        let mode = FileMode {
            name: "reference".into(),
            package: None,
            suffix: None,
            tolerances: FileTolerances::default(),
            relaxations: Vec::new(),
        }
        .into_mode()
        .unwrap();
        assert_eq!(mode.tolerances, ToleranceSchedule::default());
    }

    #[test]
    fn non_positive_relaxation_factor_is_rejected() {
        let result = FileMode {
            name: "omp".into(),
            package: None,
            suffix: Some("omp".into()),
            tolerances: FileTolerances::default(),
            relaxations: vec![FileRelaxation {
                pattern: "bond_modify".into(),
                exempt: None,
                factor: 0.0,
            }],
        }
        .into_mode();
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
