//! # Engine Module
//!
//! This module defines the seam between the harness and the simulation engine
//! it exercises. The harness never reaches into engine internals: it submits
//! textual commands, reads back structured command output, and inspects a
//! [`Snapshot`] of the observables once a command has completed.
//!
//! ## Architecture
//!
//! - **Engine Contract** ([`Engine`], [`EngineLauncher`]) - Command submission, style queries,
//!   observable snapshots, and engine construction per execution mode
//! - **Error Handling** ([`error`]) - Engine-specific error types
//! - **Sandbox Engine** ([`sandbox`]) - A small deterministic bonded-particle engine
//!   implementing the contract, used by the command-line tool and the tests
//!
//! Engines are owned by exactly one harness invocation and released when
//! dropped, on every exit path.

pub mod error;
pub mod sandbox;

use crate::core::models::observables::StressTensor;
use error::EngineError;
use nalgebra::Vector3;
use std::path::Path;

/// Everything a command printed, plus how many steps it integrated when it
/// was a run command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandOutput {
    pub text: String,
    pub steps_completed: Option<u64>,
}

impl CommandOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            steps_completed: None,
        }
    }

    pub fn append(&mut self, other: CommandOutput) {
        self.text.push_str(&other.text);
        if other.steps_completed.is_some() {
            self.steps_completed = other.steps_completed;
        }
    }
}

/// Observables of the engine after the last completed command.
///
/// `tags` and `forces` are parallel arrays in engine storage order; a
/// particle's tag, not its position, identifies it.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub natoms: usize,
    pub tags: Vec<usize>,
    pub forces: Vec<Vector3<f64>>,
    pub stress: StressTensor,
    pub energy: f64,
}

impl Snapshot {
    /// Number of particles resident in this engine instance.
    #[inline]
    pub fn nlocal(&self) -> usize {
        self.tags.len()
    }

    pub fn tagged_forces(&self) -> impl Iterator<Item = (usize, &Vector3<f64>)> {
        self.tags.iter().copied().zip(self.forces.iter())
    }
}

pub trait Engine {
    fn version(&self) -> &str;

    /// Acceleration suffix applied to styles, if any.
    fn suffix(&self) -> Option<&str>;

    /// Whether `style` is available in the `category` registry, e.g.
    /// `("bond", "harmonic/omp")`.
    fn has_style(&self, category: &str, style: &str) -> bool;

    /// Text printed when the engine instance was created.
    fn banner(&self) -> &str;

    fn command(&mut self, line: &str) -> Result<CommandOutput, EngineError>;

    /// Executes every command of a script file in order.
    fn file(&mut self, path: &Path) -> Result<CommandOutput, EngineError>;

    fn snapshot(&self) -> Snapshot;

    /// Evaluates the scalar of compute `id`.
    fn compute_scalar(&self, id: &str) -> Result<f64, EngineError>;
}

/// Creates engine instances, one per execution mode.
pub trait EngineLauncher {
    type Engine: Engine;

    fn has_package(&self, package: &str) -> bool;

    fn launch(&self, suffix: Option<&str>) -> Result<Self::Engine, EngineError>;
}
