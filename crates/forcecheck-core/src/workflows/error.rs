use crate::core::compare::VerifyReport;
use crate::core::io::writer::WriteError;
use crate::core::models::observables::ForceTableError;
use crate::engine::error::EngineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("Engine error: {source}")]
    Engine {
        #[from]
        source: EngineError,
    },

    #[error("Failed to write reference document: {source}")]
    Write {
        #[from]
        source: WriteError,
    },

    #[error("Command '{command}' did not complete its run")]
    Incomplete { command: String },

    #[error("Only {nlocal} of {natoms} particles are local; distributed runs are not supported")]
    NotAllLocal { natoms: usize, nlocal: usize },

    #[error("Reference table '{group}' has {found} entries, expected {expected}")]
    ReferenceSize {
        group: String,
        expected: usize,
        found: usize,
    },

    #[error("Reference table '{group}' cannot hold engine particle: {source}")]
    Table {
        group: String,
        #[source]
        source: ForceTableError,
    },

    #[error("Mode '{mode}' out of tolerance: {report}")]
    ToleranceExceeded { mode: String, report: VerifyReport },
}
