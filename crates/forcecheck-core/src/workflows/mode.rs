use crate::core::compare::{Observable, Phase};

/// Raises the base tolerance of a mode when a post-setup command enables a
/// feature known to lose precision, e.g. tabulated interactions.
#[derive(Debug, Clone, PartialEq)]
pub struct Relaxation {
    /// Substring that marks a triggering command.
    pub pattern: String,
    /// Substring that disarms the trigger, e.g. the feature being switched off.
    pub exempt: Option<String>,
    pub factor: f64,
}

impl Relaxation {
    pub fn applies_to(&self, command: &str) -> bool {
        command.contains(&self.pattern)
            && self
                .exempt
                .as_deref()
                .is_none_or(|exempt| !command.contains(exempt))
    }
}

/// Per-group tolerance multipliers on top of `base_scale * epsilon`.
#[derive(Debug, Clone, PartialEq)]
pub struct ToleranceSchedule {
    pub base_scale: f64,
    pub init_forces: f64,
    pub init_stress: f64,
    pub init_energy: f64,
    pub run_forces: f64,
    pub run_stress: f64,
    pub run_energy: f64,
}

impl Default for ToleranceSchedule {
    fn default() -> Self {
        Self {
            base_scale: 1.0,
            init_forces: 1.0,
            init_stress: 1.0,
            init_energy: 1.0,
            run_forces: 10.0,
            run_stress: 1.0,
            run_energy: 1.0,
        }
    }
}

impl ToleranceSchedule {
    /// Looser schedule for thread-parallel style variants, whose reductions
    /// may sum in a different order.
    pub fn accelerated() -> Self {
        Self {
            base_scale: 5.0,
            init_stress: 10.0,
            run_forces: 10.0,
            run_stress: 10.0,
            ..Self::default()
        }
    }

    pub fn multiplier(&self, phase: Phase, observable: Observable) -> f64 {
        match (phase, observable) {
            (Phase::Init, Observable::Forces) => self.init_forces,
            (Phase::Init, Observable::Stress) => self.init_stress,
            (Phase::Init, Observable::Energy) => self.init_energy,
            (Phase::Run, Observable::Forces) => self.run_forces,
            (Phase::Run, Observable::Stress) => self.run_stress,
            (Phase::Run, Observable::Energy) => self.run_energy,
        }
    }
}

/// One way of running a scenario: plain, or through an acceleration package
/// selected by a style suffix.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionMode {
    pub name: String,
    /// Package that must be installed for the mode to run at all.
    pub package: Option<String>,
    pub suffix: Option<String>,
    pub tolerances: ToleranceSchedule,
    pub relaxations: Vec<Relaxation>,
}

impl ExecutionMode {
    pub fn plain() -> Self {
        Self {
            name: "plain".to_string(),
            package: None,
            suffix: None,
            tolerances: ToleranceSchedule::default(),
            relaxations: Vec::new(),
        }
    }

    pub fn omp() -> Self {
        Self {
            name: "omp".to_string(),
            package: Some("OMP".to_string()),
            suffix: Some("omp".to_string()),
            tolerances: ToleranceSchedule::accelerated(),
            relaxations: Vec::new(),
        }
    }

    pub fn defaults() -> Vec<Self> {
        vec![Self::plain(), Self::omp()]
    }

    /// Mode tolerance before per-group multipliers.
    pub fn base_tolerance(&self, epsilon: f64, post_commands: &[String]) -> f64 {
        let mut tolerance = self.tolerances.base_scale * epsilon;
        for command in post_commands {
            for relaxation in &self.relaxations {
                if relaxation.applies_to(command) {
                    tolerance *= relaxation.factor;
                }
            }
        }
        tolerance
    }

    pub fn tolerance(&self, base: f64, phase: Phase, observable: Observable) -> f64 {
        base * self.tolerances.multiplier(phase, observable)
    }
}
