pub mod generate;
pub mod verify;

use crate::config::Settings;
use crate::error::{CliError, Result};
use forcecheck::core::models::config::ScenarioConfig;
use forcecheck::engine::sandbox::SandboxLauncher;
use std::path::{Path, PathBuf};
use tracing::info;

/// Reads the scenario document; any failure here is a document error.
fn load_scenario(path: &Path) -> Result<ScenarioConfig> {
    let config = ScenarioConfig::from_path(path).map_err(|source| CliError::Document {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        bond_style = %config.bond_style,
        natoms = config.natoms,
        "Scenario document loaded."
    );
    Ok(config)
}

/// Relative input scripts are resolved next to the scenario document.
fn script_root(document: &Path) -> PathBuf {
    document
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

fn launcher(settings: &Settings) -> SandboxLauncher {
    SandboxLauncher::with_packages(settings.packages.iter().cloned())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_root_is_the_document_directory() {
        assert_eq!(
            script_root(Path::new("tests/bond-morse.yaml")),
            PathBuf::from("tests")
        );
        assert_eq!(script_root(Path::new("bond-morse.yaml")), PathBuf::new());
    }

    #[test]
    fn missing_document_is_a_document_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_scenario(&dir.path().join("absent.yaml")).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::DOCUMENT_EXIT);
    }

    #[test]
    fn non_mapping_document_is_a_document_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.yaml");
        std::fs::write(&path, "- epsilon\n- 1e-13\n").unwrap();
        let err = load_scenario(&path).unwrap_err();
        assert!(matches!(err, CliError::Document { .. }));
    }
}
