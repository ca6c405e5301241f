use super::fields;
use super::observables::{ForceTable, StressTensor};
use crate::core::io::event::EventSource;
use crate::core::io::reader::{EventReader, ReadError, ReadSummary};
use crate::core::io::writer::{DocumentWriter, WriteError};
use crate::core::io::yaml::YamlEventStream;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

pub const DEFAULT_EPSILON: f64 = 1.0e-14;
pub const DEFAULT_BOND_STYLE: &str = "zero";

/// A `(subsystem, style)` pair that must exist in the engine before a
/// scenario can run, e.g. `("bond", "harmonic")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Prerequisite {
    pub category: String,
    pub style: String,
}

impl Prerequisite {
    pub fn new(category: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            style: style.into(),
        }
    }
}

impl fmt::Display for Prerequisite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_style {}", self.category, self.style)
    }
}

/// One regression scenario: how to set the engine up, and the reference
/// observables recorded for the static and the dynamic phase.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioConfig {
    pub lammps_version: String,
    pub date_generated: String,
    pub epsilon: f64,
    pub prerequisites: Vec<Prerequisite>,
    pub pre_commands: Vec<String>,
    pub post_commands: Vec<String>,
    pub input_file: String,
    pub bond_style: String,
    pub bond_coeff: Vec<String>,
    pub natoms: usize,
    pub init_energy: f64,
    pub run_energy: f64,
    pub init_stress: StressTensor,
    pub run_stress: StressTensor,
    pub init_forces: ForceTable,
    pub run_forces: ForceTable,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            lammps_version: String::new(),
            date_generated: String::new(),
            epsilon: DEFAULT_EPSILON,
            prerequisites: Vec::new(),
            pre_commands: Vec::new(),
            post_commands: Vec::new(),
            input_file: String::new(),
            bond_style: DEFAULT_BOND_STYLE.to_string(),
            bond_coeff: Vec::new(),
            natoms: 0,
            init_energy: 0.0,
            run_energy: 0.0,
            init_stress: StressTensor::default(),
            run_stress: StressTensor::default(),
            init_forces: ForceTable::default(),
            run_forces: ForceTable::default(),
        }
    }
}

impl ScenarioConfig {
    /// Populates a fresh config from an event stream.
    pub fn read_from(source: &mut impl EventSource) -> Result<(Self, ReadSummary), ReadError> {
        let mut config = Self::default();
        let mut reader = EventReader::new(fields::handlers());
        let summary = reader.read(source, &mut config)?;
        debug!(
            assigned = summary.assigned.len(),
            ignored = summary.ignored.len(),
            "Scenario document read."
        );
        Ok((config, summary))
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ReadError> {
        let mut source = YamlEventStream::from_text(text);
        Self::read_from(&mut source).map(|(config, _)| config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ReadError> {
        let path = path.as_ref();
        info!("Loading scenario document from {:?}", path);
        let text = std::fs::read_to_string(path).map_err(|e| ReadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Serializes every field in document key order.
    pub fn to_document(&self) -> DocumentWriter {
        let mut writer = DocumentWriter::new();
        writer.emit_str(fields::LAMMPS_VERSION, &self.lammps_version);
        writer.emit_str(fields::DATE_GENERATED, &self.date_generated);
        writer.emit_real(fields::EPSILON, self.epsilon);
        writer.emit_block(
            fields::PREREQUISITES,
            self.prerequisites.iter().map(fields::format_prerequisite),
        );
        writer.emit_block(fields::PRE_COMMANDS, &self.pre_commands);
        writer.emit_block(fields::POST_COMMANDS, &self.post_commands);
        writer.emit_str(fields::INPUT_FILE, &self.input_file);
        writer.emit_str(fields::BOND_STYLE, &self.bond_style);
        writer.emit_block(fields::BOND_COEFF, &self.bond_coeff);
        writer.emit_int(fields::NATOMS, self.natoms as u64);
        writer.emit_real(fields::INIT_ENERGY, self.init_energy);
        writer.emit_block(fields::INIT_STRESS, [fields::format_stress(&self.init_stress)]);
        writer.emit_block(fields::INIT_FORCES, fields::format_forces(&self.init_forces));
        writer.emit_real(fields::RUN_ENERGY, self.run_energy);
        writer.emit_block(fields::RUN_STRESS, [fields::format_stress(&self.run_stress)]);
        writer.emit_block(fields::RUN_FORCES, fields::format_forces(&self.run_forces));
        writer
    }

    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), WriteError> {
        self.to_document().write_to_path(path)
    }
}
