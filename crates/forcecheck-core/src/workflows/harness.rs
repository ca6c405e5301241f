use super::error::HarnessError;
use super::mode::ExecutionMode;
use super::outcome::{CaseOutcome, GenerateOutcome, ModeResult, RunSummary, SkipReason};
use crate::core::compare::{GroupComparison, GroupReport, Observable, Phase, VerifyReport};
use crate::core::models::config::{Prerequisite, ScenarioConfig};
use crate::core::models::observables::{ForceTable, ForceTableError, StressTensor};
use crate::engine::{Engine, EngineLauncher, Snapshot};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Setup command of the static phase.
pub const STATIC_RUN: &str = "run 0 post no";

/// Commands of the dynamic phase, executed after the static phase.
pub const DYNAMIC_RUN: [&str; 6] = [
    "fix 1 all nve",
    "compute pe all pe/atom",
    "compute sum all reduce sum c_pe",
    "thermo_style custom step temp pe press c_sum",
    "thermo 2",
    "run 4 post no",
];
const DYNAMIC_STEPS: u64 = 4;

/// Compute whose scalar independently sums the per-particle energies.
pub const ENERGY_SUM_COMPUTE: &str = "sum";

/// Result of preparing an engine for a scenario.
#[derive(Debug)]
pub enum Setup<E> {
    Ready(E),
    /// Prerequisites the engine lacks, with the style suffix applied.
    Missing(Vec<Prerequisite>),
}

/// Drives one scenario through an engine: setup, the static and dynamic
/// phases, and either verification or reference generation.
#[derive(Debug)]
pub struct Harness<'a, L> {
    launcher: &'a L,
    config: &'a ScenarioConfig,
    script_root: PathBuf,
}

impl<'a, L: EngineLauncher> Harness<'a, L> {
    pub fn new(launcher: &'a L, config: &'a ScenarioConfig) -> Self {
        Self {
            launcher,
            config,
            script_root: PathBuf::new(),
        }
    }

    /// Directory that a relative `input_file` is resolved against.
    pub fn with_script_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.script_root = root.into();
        self
    }

    pub fn script_path(&self) -> PathBuf {
        let path = Path::new(&self.config.input_file);
        if path.is_relative() {
            self.script_root.join(path)
        } else {
            path.to_path_buf()
        }
    }

    /// Prerequisites as the engine must provide them: bond styles carry the
    /// engine's suffix.
    fn required_styles(&self, suffix: Option<&str>) -> Vec<Prerequisite> {
        self.config
            .prerequisites
            .iter()
            .map(|p| match suffix {
                Some(suffix) if p.category == "bond" => {
                    Prerequisite::new(p.category.clone(), format!("{}/{}", p.style, suffix))
                }
                _ => p.clone(),
            })
            .collect()
    }

    /// Launches an engine and replays the scenario up to and including the
    /// static phase.
    pub fn setup(&self, suffix: Option<&str>) -> Result<Setup<L::Engine>, HarnessError> {
        let mut engine = self.launcher.launch(suffix)?;
        let missing: Vec<Prerequisite> = self
            .required_styles(engine.suffix())
            .into_iter()
            .filter(|p| !engine.has_style(&p.category, &p.style))
            .collect();
        if !missing.is_empty() {
            warn!(count = missing.len(), "Prerequisite styles are unavailable.");
            return Ok(Setup::Missing(missing));
        }
        debug!(banner = engine.banner().trim_end(), "Engine launched.");

        for command in &self.config.pre_commands {
            engine.command(command)?;
        }
        engine.file(&self.script_path())?;
        engine.command(&format!("bond_style {}", self.config.bond_style))?;
        for coeff in &self.config.bond_coeff {
            engine.command(&format!("bond_coeff {}", coeff))?;
        }
        for command in &self.config.post_commands {
            engine.command(command)?;
        }

        let output = engine.command(STATIC_RUN)?;
        if output.steps_completed != Some(0) {
            return Err(HarnessError::Incomplete {
                command: STATIC_RUN.to_string(),
            });
        }
        Ok(Setup::Ready(engine))
    }

    fn run_dynamics(engine: &mut L::Engine) -> Result<(), HarnessError> {
        let mut steps_completed = None;
        for command in DYNAMIC_RUN {
            steps_completed = engine.command(command)?.steps_completed;
        }
        if steps_completed != Some(DYNAMIC_STEPS) {
            return Err(HarnessError::Incomplete {
                command: DYNAMIC_RUN[DYNAMIC_RUN.len() - 1].to_string(),
            });
        }
        Ok(())
    }

    /// Verifies the scenario in one mode.
    ///
    /// Every comparison group is evaluated before a tolerance failure is
    /// raised, so a [`HarnessError::ToleranceExceeded`] always carries the
    /// complete report.
    #[instrument(skip_all, fields(mode = %mode.name))]
    pub fn verify(&self, mode: &ExecutionMode) -> Result<CaseOutcome, HarnessError> {
        if let Some(package) = &mode.package {
            if !self.launcher.has_package(package) {
                info!(package = %package, "Package not installed; skipping mode.");
                return Ok(CaseOutcome::Skipped(SkipReason::PackageMissing(
                    package.clone(),
                )));
            }
        }

        let mut engine = match self.setup(mode.suffix.as_deref())? {
            Setup::Ready(engine) => engine,
            Setup::Missing(missing) => {
                return Ok(CaseOutcome::Skipped(SkipReason::PrerequisitesMissing(
                    missing,
                )));
            }
        };

        let config = self.config;
        let base = mode.base_tolerance(config.epsilon, &config.post_commands);
        let mut report = VerifyReport::default();

        // === Phase 1: Static evaluation ===
        let snapshot = engine.snapshot();
        ensure_all_local(&snapshot)?;
        report.push(compare_forces(
            mode.tolerance(base, Phase::Init, Observable::Forces),
            Phase::Init,
            &snapshot,
            &config.init_forces,
        )?);
        report.push(compare_stress(
            mode.tolerance(base, Phase::Init, Observable::Stress),
            Phase::Init,
            &snapshot.stress,
            &config.init_stress,
        ));
        let mut energy = GroupComparison::new(
            Phase::Init,
            Observable::Energy,
            mode.tolerance(base, Phase::Init, Observable::Energy),
        );
        energy.check("energy", snapshot.energy, config.init_energy);
        report.push(energy.finish());

        // === Phase 2: Dynamic run ===
        Self::run_dynamics(&mut engine)?;
        let snapshot = engine.snapshot();
        report.push(compare_forces(
            mode.tolerance(base, Phase::Run, Observable::Forces),
            Phase::Run,
            &snapshot,
            &config.run_forces,
        )?);
        report.push(compare_stress(
            mode.tolerance(base, Phase::Run, Observable::Stress),
            Phase::Run,
            &snapshot.stress,
            &config.run_stress,
        ));
        let summed = engine.compute_scalar(ENERGY_SUM_COMPUTE)?;
        let mut energy = GroupComparison::new(
            Phase::Run,
            Observable::Energy,
            mode.tolerance(base, Phase::Run, Observable::Energy),
        );
        energy.check("energy", snapshot.energy, config.run_energy);
        energy.check("energy vs. per-particle sum", snapshot.energy, summed);
        report.push(energy.finish());

        if report.passed() {
            info!("All comparison groups within tolerance.");
            Ok(CaseOutcome::Verified(report))
        } else {
            warn!(%report, "Comparison failed.");
            Err(HarnessError::ToleranceExceeded {
                mode: mode.name.clone(),
                report,
            })
        }
    }

    /// Runs the scenario in plain mode and records fresh reference values.
    ///
    /// Setup fields are carried over from the loaded scenario; the particle
    /// count, engine version, and every observable come from the engine.
    #[instrument(skip_all)]
    pub fn generate(&self, date_generated: &str) -> Result<GenerateOutcome, HarnessError> {
        let mut engine = match self.setup(None)? {
            Setup::Ready(engine) => engine,
            Setup::Missing(missing) => {
                return Ok(GenerateOutcome::Skipped(SkipReason::PrerequisitesMissing(
                    missing,
                )));
            }
        };

        let mut generated = self.config.clone();
        generated.lammps_version = engine.version().to_string();
        generated.date_generated = date_generated.to_string();

        let snapshot = engine.snapshot();
        generated.natoms = snapshot.natoms;
        generated.init_energy = snapshot.energy;
        generated.init_stress = snapshot.stress;
        generated.init_forces = force_table(Phase::Init, &snapshot)?;

        Self::run_dynamics(&mut engine)?;
        let snapshot = engine.snapshot();
        generated.run_energy = snapshot.energy;
        generated.run_stress = snapshot.stress;
        generated.run_forces = force_table(Phase::Run, &snapshot)?;

        info!(natoms = generated.natoms, "Reference values generated.");
        Ok(GenerateOutcome::Generated(Box::new(generated)))
    }

    /// Verifies the scenario in every mode. A failing mode never stops the
    /// remaining modes from running.
    pub fn run_modes(&self, modes: &[ExecutionMode]) -> RunSummary {
        let mut summary = RunSummary::default();
        for mode in modes {
            let outcome = self.verify(mode);
            match &outcome {
                Ok(CaseOutcome::Verified(_)) => info!(mode = %mode.name, "Mode passed."),
                Ok(CaseOutcome::Skipped(reason)) => {
                    info!(mode = %mode.name, %reason, "Mode skipped.")
                }
                Err(e) => warn!(mode = %mode.name, error = %e, "Mode failed."),
            }
            summary.results.push(ModeResult {
                mode: mode.name.clone(),
                outcome,
            });
        }
        summary
    }
}

fn ensure_all_local(snapshot: &Snapshot) -> Result<(), HarnessError> {
    if snapshot.natoms != snapshot.nlocal() {
        return Err(HarnessError::NotAllLocal {
            natoms: snapshot.natoms,
            nlocal: snapshot.nlocal(),
        });
    }
    Ok(())
}

fn group_name(phase: Phase, observable: Observable) -> String {
    format!("{}_{}", phase, observable)
}

fn compare_forces(
    tolerance: f64,
    phase: Phase,
    snapshot: &Snapshot,
    reference: &ForceTable,
) -> Result<GroupReport, HarnessError> {
    let expected = snapshot.nlocal() + 1;
    if reference.len() != expected {
        return Err(HarnessError::ReferenceSize {
            group: group_name(phase, Observable::Forces),
            expected,
            found: reference.len(),
        });
    }
    let mut group = GroupComparison::new(phase, Observable::Forces, tolerance);
    for (tag, force) in snapshot.tagged_forces() {
        let wanted = reference.get(tag).ok_or_else(|| HarnessError::Table {
            group: group_name(phase, Observable::Forces),
            source: ForceTableError::TagOutOfRange {
                tag,
                max_tag: reference.max_tag(),
            },
        })?;
        group.check_vector(tag, force, wanted);
    }
    Ok(group.finish())
}

fn compare_stress(
    tolerance: f64,
    phase: Phase,
    computed: &StressTensor,
    reference: &StressTensor,
) -> GroupReport {
    let mut group = GroupComparison::new(phase, Observable::Stress, tolerance);
    for ((name, c), r) in StressTensor::COMPONENT_NAMES
        .iter()
        .zip(computed.components())
        .zip(reference.components())
    {
        group.check(name, c, r);
    }
    group.finish()
}

fn force_table(phase: Phase, snapshot: &Snapshot) -> Result<ForceTable, HarnessError> {
    let mut table = ForceTable::with_natoms(snapshot.natoms);
    for (tag, force) in snapshot.tagged_forces() {
        table.set(tag, *force).map_err(|source| HarnessError::Table {
            group: group_name(phase, Observable::Forces),
            source,
        })?;
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::CommandOutput;
    use crate::engine::error::EngineError;
    use crate::engine::sandbox::SandboxLauncher;
    use nalgebra::Vector3;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::{TempDir, tempdir};

    /// Engine double that reports fixed observables and records commands.
    struct ScriptedEngine {
        suffix: Option<String>,
        styles: Vec<(String, String)>,
        snapshot: Snapshot,
        sum: f64,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Engine for ScriptedEngine {
        fn version(&self) -> &str {
            "scripted"
        }

        fn suffix(&self) -> Option<&str> {
            self.suffix.as_deref()
        }

        fn has_style(&self, category: &str, style: &str) -> bool {
            self.styles
                .iter()
                .any(|(c, s)| c == category && s == style)
        }

        fn banner(&self) -> &str {
            "Scripted engine\n"
        }

        fn command(&mut self, line: &str) -> Result<CommandOutput, EngineError> {
            self.log.borrow_mut().push(line.to_string());
            let steps_completed = line
                .strip_prefix("run ")
                .and_then(|rest| rest.split_whitespace().next())
                .and_then(|n| n.parse().ok());
            Ok(CommandOutput {
                text: String::new(),
                steps_completed,
            })
        }

        fn file(&mut self, path: &Path) -> Result<CommandOutput, EngineError> {
            self.log
                .borrow_mut()
                .push(format!("file {}", path.display()));
            Ok(CommandOutput::default())
        }

        fn snapshot(&self) -> Snapshot {
            self.snapshot.clone()
        }

        fn compute_scalar(&self, id: &str) -> Result<f64, EngineError> {
            match id {
                ENERGY_SUM_COMPUTE => Ok(self.sum),
                _ => Err(EngineError::UnknownCompute(id.to_string())),
            }
        }
    }

    struct ScriptedLauncher {
        packages: Vec<String>,
        styles: Vec<(String, String)>,
        snapshot: Snapshot,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl ScriptedLauncher {
        fn new(energy: f64) -> Self {
            Self {
                packages: vec!["OMP".to_string()],
                styles: vec![
                    ("atom".to_string(), "bond".to_string()),
                    ("bond".to_string(), "harmonic".to_string()),
                    ("bond".to_string(), "harmonic/omp".to_string()),
                ],
                snapshot: Snapshot {
                    natoms: 2,
                    tags: vec![2, 1],
                    forces: vec![Vector3::new(-1.5, 0.0, 0.25), Vector3::new(1.5, 0.0, -0.25)],
                    stress: StressTensor::from_components([1.0, 2.0, 3.0, 0.0, 0.0, -1.0]),
                    energy,
                },
                log: Rc::new(RefCell::new(Vec::new())),
            }
        }

        fn commands(&self) -> Vec<String> {
            self.log.borrow().clone()
        }
    }

    impl EngineLauncher for ScriptedLauncher {
        type Engine = ScriptedEngine;

        fn has_package(&self, package: &str) -> bool {
            self.packages.iter().any(|p| p == package)
        }

        fn launch(&self, suffix: Option<&str>) -> Result<ScriptedEngine, EngineError> {
            Ok(ScriptedEngine {
                suffix: suffix.map(str::to_string),
                styles: self.styles.clone(),
                snapshot: self.snapshot.clone(),
                sum: self.snapshot.energy,
                log: Rc::clone(&self.log),
            })
        }
    }

    fn two_particle_config() -> ScenarioConfig {
        let mut forces = ForceTable::with_natoms(2);
        forces.set(1, Vector3::new(1.5, 0.0, -0.25)).unwrap();
        forces.set(2, Vector3::new(-1.5, 0.0, 0.25)).unwrap();
        ScenarioConfig {
            epsilon: 1e-12,
            prerequisites: vec![
                Prerequisite::new("atom", "bond"),
                Prerequisite::new("bond", "harmonic"),
            ],
            pre_commands: vec!["units real".to_string()],
            post_commands: vec!["thermo 0".to_string()],
            input_file: "in.dimer".to_string(),
            bond_style: "harmonic".to_string(),
            bond_coeff: vec!["1 100.0 1.5".to_string()],
            natoms: 2,
            init_energy: 5.0,
            run_energy: 5.0,
            init_stress: StressTensor::from_components([1.0, 2.0, 3.0, 0.0, 0.0, -1.0]),
            run_stress: StressTensor::from_components([1.0, 2.0, 3.0, 0.0, 0.0, -1.0]),
            init_forces: forces.clone(),
            run_forces: forces,
            ..ScenarioConfig::default()
        }
    }

    #[test]
    fn setup_replays_scenario_commands_in_order() {
        let launcher = ScriptedLauncher::new(5.0);
        let config = two_particle_config();
        let harness = Harness::new(&launcher, &config).with_script_root("/scenarios");
        assert!(matches!(harness.setup(None).unwrap(), Setup::Ready(_)));

        assert_eq!(
            launcher.commands(),
            vec![
                "units real".to_string(),
                format!("file {}", Path::new("/scenarios").join("in.dimer").display()),
                "bond_style harmonic".to_string(),
                "bond_coeff 1 100.0 1.5".to_string(),
                "thermo 0".to_string(),
                "run 0 post no".to_string(),
            ]
        );
    }

    #[test]
    fn energy_within_epsilon_passes() {
        let launcher = ScriptedLauncher::new(5.0000000000001);
        let config = two_particle_config();
        let harness = Harness::new(&launcher, &config);

        match harness.verify(&ExecutionMode::plain()).unwrap() {
            CaseOutcome::Verified(report) => {
                assert_eq!(report.groups.len(), 6);
                assert!(report.passed());
                let run_energy = report.group(Phase::Run, Observable::Energy).unwrap();
                assert_eq!(run_energy.stats.count(), 2);
            }
            other => panic!("expected verified outcome, got {:?}", other),
        }
    }

    #[test]
    fn energy_beyond_epsilon_fails_with_energy_group() {
        let launcher = ScriptedLauncher::new(5.01);
        let config = two_particle_config();
        let harness = Harness::new(&launcher, &config);

        match harness.verify(&ExecutionMode::plain()) {
            Err(HarnessError::ToleranceExceeded { mode, report }) => {
                assert_eq!(mode, "plain");
                assert_eq!(report.groups.len(), 6);
                let failed: Vec<String> = report.failed_groups().map(|g| g.name()).collect();
                assert_eq!(failed, vec!["init_energy", "run_energy"]);
                let init = report.group(Phase::Init, Observable::Energy).unwrap();
                assert_eq!(init.mismatches[0].label, "energy");
            }
            other => panic!("expected tolerance failure, got {:?}", other),
        }
    }

    #[test]
    fn missing_suffixed_prerequisite_skips_the_mode() {
        let mut launcher = ScriptedLauncher::new(5.0);
        launcher.styles.retain(|(_, s)| s != "harmonic/omp");
        let config = two_particle_config();
        let harness = Harness::new(&launcher, &config);

        let outcome = harness.verify(&ExecutionMode::omp()).unwrap();
        assert_eq!(
            outcome,
            CaseOutcome::Skipped(SkipReason::PrerequisitesMissing(vec![Prerequisite::new(
                "bond",
                "harmonic/omp"
            )]))
        );
        assert!(launcher.commands().is_empty());
    }

    #[test]
    fn missing_package_skips_without_launching() {
        let mut launcher = ScriptedLauncher::new(5.0);
        launcher.packages.clear();
        let config = two_particle_config();
        let summary = Harness::new(&launcher, &config).run_modes(&ExecutionMode::defaults());

        assert_eq!(summary.passed(), 1);
        assert_eq!(summary.skipped(), 1);
        assert_eq!(summary.exit_code(), 0);
        assert!(matches!(
            summary.results[1].outcome,
            Ok(CaseOutcome::Skipped(SkipReason::PackageMissing(_)))
        ));
    }

    #[test]
    fn reference_table_of_wrong_size_is_a_hard_failure() {
        let launcher = ScriptedLauncher::new(5.0);
        let mut config = two_particle_config();
        config.init_forces = ForceTable::with_natoms(3);
        let harness = Harness::new(&launcher, &config);

        let result = harness.verify(&ExecutionMode::plain());
        assert!(matches!(
            result,
            Err(HarnessError::ReferenceSize {
                expected: 3,
                found: 4,
                ..
            })
        ));
    }

    #[test]
    fn partially_local_particles_abort_verification() {
        let mut launcher = ScriptedLauncher::new(5.0);
        launcher.snapshot.natoms = 4;
        let config = two_particle_config();
        let result = Harness::new(&launcher, &config).verify(&ExecutionMode::plain());
        assert!(matches!(
            result,
            Err(HarnessError::NotAllLocal {
                natoms: 4,
                nlocal: 2
            })
        ));
    }

    #[test]
    fn failing_mode_sets_nonzero_exit_code() {
        let launcher = ScriptedLauncher::new(7.0);
        let config = two_particle_config();
        let summary = Harness::new(&launcher, &config).run_modes(&ExecutionMode::defaults());
        assert_eq!(summary.failed(), 2);
        assert_eq!(summary.exit_code(), 1);
    }

    const TRIMER: &str = "\
units real
atom_style bond
atom 1 1 0.0 0.0 0.0
atom 2 2 1.4 0.1 0.0
atom 3 1 2.1 1.3 -0.2
atom 4 2 3.4 1.1 0.3
mass 1 12.011
mass 2 15.999
bond 1 1 2
bond 2 2 3
bond 1 3 4
velocity 1 0.001 0.0 -0.002
velocity 4 -0.001 0.003 0.0
timestep 0.2
";

    fn sandbox_scenario(style: &str, coeffs: &[&str]) -> (TempDir, ScenarioConfig) {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("in.trimer"), TRIMER).unwrap();
        let config = ScenarioConfig {
            epsilon: 1e-13,
            prerequisites: vec![
                Prerequisite::new("atom", "bond"),
                Prerequisite::new("bond", style),
            ],
            input_file: "in.trimer".to_string(),
            bond_style: style.to_string(),
            bond_coeff: coeffs.iter().map(|c| c.to_string()).collect(),
            ..ScenarioConfig::default()
        };
        (dir, config)
    }

    fn generated(launcher: &SandboxLauncher, dir: &Path, config: &ScenarioConfig) -> ScenarioConfig {
        let harness = Harness::new(launcher, config).with_script_root(dir);
        match harness.generate("Sun Oct 18 12:00:00 2026").unwrap() {
            GenerateOutcome::Generated(config) => *config,
            other => panic!("expected generated document, got {:?}", other),
        }
    }

    #[test]
    fn sandbox_reference_verifies_in_every_mode() {
        let launcher = SandboxLauncher::new();
        let (dir, config) = sandbox_scenario("morse", &["1 30.0 1.2 1.4", "2 25.0 1.0 1.3"]);
        let reference = generated(&launcher, dir.path(), &config);

        assert_eq!(reference.natoms, 4);
        assert_eq!(reference.init_forces.len(), 5);
        assert!(reference.lammps_version.starts_with("sandbox"));
        assert!(reference.init_energy > 0.0);
        assert_ne!(reference.run_forces, reference.init_forces);

        let path = dir.path().join("bond-morse.yaml");
        reference.write_to_path(&path).unwrap();
        let reloaded = ScenarioConfig::from_path(&path).unwrap();
        assert_eq!(reloaded, reference);

        let summary = Harness::new(&launcher, &reloaded)
            .with_script_root(dir.path())
            .run_modes(&ExecutionMode::defaults());
        assert_eq!(summary.passed(), 2, "{}", summary);
    }

    #[test]
    fn sandbox_detects_changed_coefficients() {
        let launcher = SandboxLauncher::new();
        let (dir, config) = sandbox_scenario("harmonic", &["* 100.0 1.5"]);
        let mut reference = generated(&launcher, dir.path(), &config);
        reference.bond_coeff = vec!["* 100.0 1.45".to_string()];

        let result = Harness::new(&launcher, &reference)
            .with_script_root(dir.path())
            .verify(&ExecutionMode::plain());
        match result {
            Err(HarnessError::ToleranceExceeded { report, .. }) => {
                assert!(!report.group(Phase::Init, Observable::Forces).unwrap().passed());
                assert!(!report.group(Phase::Init, Observable::Energy).unwrap().passed());
            }
            other => panic!("expected tolerance failure, got {:?}", other),
        }
    }

    #[test]
    fn sandbox_skips_generation_for_unknown_style() {
        let launcher = SandboxLauncher::new();
        let (dir, mut config) = sandbox_scenario("harmonic", &["* 100.0 1.5"]);
        config.prerequisites.push(Prerequisite::new("bond", "fene"));
        let harness = Harness::new(&launcher, &config).with_script_root(dir.path());

        assert_eq!(
            harness.generate("now").unwrap(),
            GenerateOutcome::Skipped(SkipReason::PrerequisitesMissing(vec![Prerequisite::new(
                "bond", "fene"
            )]))
        );
    }

    #[test]
    fn sandbox_script_errors_abort_setup() {
        let launcher = SandboxLauncher::new();
        let (dir, mut config) = sandbox_scenario("harmonic", &["* 100.0 1.5"]);
        config.post_commands = vec!["pair_style lj/cut 8.0".to_string()];
        let result = Harness::new(&launcher, &config)
            .with_script_root(dir.path())
            .setup(None);
        assert!(matches!(result, Err(HarnessError::Engine { .. })));
    }
}
