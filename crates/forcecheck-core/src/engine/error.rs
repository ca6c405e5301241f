use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Engine launch failed: {0}")]
    Launch(String),

    #[error("Unknown command '{0}'")]
    UnknownCommand(String),

    #[error("Invalid command '{line}': {reason}")]
    InvalidCommand { line: String, reason: String },

    #[error("Unrecognized {category} style '{style}'")]
    UnknownStyle { category: String, style: String },

    #[error("Bond coefficients for type {bond_type} are not set")]
    MissingCoefficients { bond_type: usize },

    #[error("Compute '{0}' does not exist")]
    UnknownCompute(String),

    #[error("Cannot read script '{path}': {source}")]
    Script {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Script '{path}' line {line}: {source}")]
    ScriptLine {
        path: String,
        line: usize,
        #[source]
        source: Box<EngineError>,
    },
}

impl EngineError {
    pub(crate) fn invalid(line: &str, reason: impl Into<String>) -> Self {
        Self::InvalidCommand {
            line: line.to_string(),
            reason: reason.into(),
        }
    }
}
