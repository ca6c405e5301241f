//! A small deterministic bonded-particle engine.
//!
//! The sandbox understands a line-oriented command language modeled on the
//! input scripts of production molecular dynamics codes: particles and bonds
//! are declared explicitly, one bond style is active at a time, and `run`
//! integrates with `fix nve` when one is defined. It has no periodic box, no
//! pair interactions, and keeps every particle local.

pub mod integrate;
pub mod styles;

use super::error::EngineError;
use super::{CommandOutput, Engine, EngineLauncher, Snapshot};
use crate::core::models::observables::StressTensor;
use integrate::{VelocityVerlet, kinetic_energy};
use nalgebra::Vector3;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;
use styles::{BondEvaluation, BondStyle, BondTopology};
use tracing::{debug, trace};

pub const SANDBOX_VERSION: &str = concat!("sandbox ", env!("CARGO_PKG_VERSION"));

const DEFAULT_TIMESTEP: f64 = 0.005;
const ATOM_STYLES: [&str; 2] = ["bond", "molecular"];
const FIX_STYLES: [&str; 1] = ["nve"];
const COMPUTE_STYLES: [&str; 2] = ["pe/atom", "reduce"];
const DEFAULT_THERMO_COLUMNS: [&str; 5] = ["step", "temp", "pe", "etotal", "press"];
const MAX_INCLUDE_DEPTH: usize = 16;

/// Launches sandbox engines. Packages decide which accelerated modes apply.
#[derive(Debug, Clone)]
pub struct SandboxLauncher {
    packages: Vec<String>,
}

impl Default for SandboxLauncher {
    fn default() -> Self {
        Self {
            packages: vec!["OMP".to_string()],
        }
    }
}

impl SandboxLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_packages<I, S>(packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            packages: packages.into_iter().map(Into::into).collect(),
        }
    }
}

impl EngineLauncher for SandboxLauncher {
    type Engine = SandboxEngine;

    fn has_package(&self, package: &str) -> bool {
        self.packages.iter().any(|p| p == package)
    }

    fn launch(&self, suffix: Option<&str>) -> Result<SandboxEngine, EngineError> {
        Ok(SandboxEngine::new(suffix))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Compute {
    PeAtom,
    ReduceSum { source: String },
}

#[derive(Debug)]
pub struct SandboxEngine {
    suffix: Option<String>,
    banner: String,
    tags: Vec<usize>,
    types: Vec<usize>,
    positions: Vec<Vector3<f64>>,
    velocities: Vec<Vector3<f64>>,
    index_of: HashMap<usize, usize>,
    masses: HashMap<usize, f64>,
    bonds: Vec<BondTopology>,
    style: Option<BondStyle>,
    evaluation: BondEvaluation,
    timestep: f64,
    nve: Option<String>,
    computes: Vec<(String, Compute)>,
    thermo_every: u64,
    thermo_columns: Vec<String>,
    step: u64,
    script_dirs: Vec<PathBuf>,
}

impl SandboxEngine {
    pub fn new(suffix: Option<&str>) -> Self {
        let mut banner = format!("Sandbox engine ({})\n", SANDBOX_VERSION);
        if let Some(suffix) = suffix {
            let _ = writeln!(
                banner,
                "  style suffix '{}' with {} worker threads",
                suffix,
                rayon::current_num_threads()
            );
        }
        Self {
            suffix: suffix.map(str::to_string),
            banner,
            tags: Vec::new(),
            types: Vec::new(),
            positions: Vec::new(),
            velocities: Vec::new(),
            index_of: HashMap::new(),
            masses: HashMap::new(),
            bonds: Vec::new(),
            style: None,
            evaluation: BondEvaluation::empty(0),
            timestep: DEFAULT_TIMESTEP,
            nve: None,
            computes: Vec::new(),
            thermo_every: 0,
            thermo_columns: DEFAULT_THERMO_COLUMNS.iter().map(|c| c.to_string()).collect(),
            step: 0,
            script_dirs: Vec::new(),
        }
    }

    pub fn natoms(&self) -> usize {
        self.tags.len()
    }

    pub fn bond_style(&self) -> Option<&BondStyle> {
        self.style.as_ref()
    }

    fn execute(&mut self, line: &str) -> Result<CommandOutput, EngineError> {
        let mut args = Args::new(line);
        let Some(name) = args.next() else {
            return Ok(CommandOutput::default());
        };
        trace!(command = name, "Executing sandbox command.");
        let output = match name {
            "units" => {
                args.word("units")?;
                Ok(CommandOutput::default())
            }
            "atom_style" => {
                let style = args.word("atom style")?;
                if !ATOM_STYLES.contains(&style) {
                    return Err(unknown_style("atom", style));
                }
                Ok(CommandOutput::default())
            }
            "atom" => self.add_atom(&mut args),
            "mass" => {
                let atom_type: usize = args.parse("atom type")?;
                let mass: f64 = args.parse("mass")?;
                if mass <= 0.0 {
                    return Err(EngineError::invalid(line, "mass must be positive"));
                }
                self.masses.insert(atom_type, mass);
                Ok(CommandOutput::default())
            }
            "bond" => self.add_bond(&mut args),
            "velocity" => {
                let tag: usize = args.parse("tag")?;
                let index = self.index(line, tag)?;
                self.velocities[index] = args.vector("velocity")?;
                Ok(CommandOutput::default())
            }
            "timestep" => {
                self.timestep = args.parse("timestep")?;
                Ok(CommandOutput::default())
            }
            "bond_style" => self.set_bond_style(&mut args),
            "bond_coeff" => self.set_bond_coeff(&mut args),
            "fix" => {
                let id = args.word("fix id")?.to_string();
                args.expect_word("all")?;
                let style = args.word("fix style")?;
                if !FIX_STYLES.contains(&style) {
                    return Err(unknown_style("fix", style));
                }
                self.nve = Some(id);
                Ok(CommandOutput::default())
            }
            "compute" => self.add_compute(&mut args),
            "thermo" => {
                self.thermo_every = args.parse("thermo interval")?;
                Ok(CommandOutput::default())
            }
            "thermo_style" => self.set_thermo_style(&mut args),
            "run" => self.run(&mut args),
            "include" => {
                let path = PathBuf::from(args.word("script path")?);
                if self.script_dirs.len() >= MAX_INCLUDE_DEPTH {
                    return Err(EngineError::invalid(
                        line,
                        format!("include files nested deeper than {}", MAX_INCLUDE_DEPTH),
                    ));
                }
                let path = match self.script_dirs.last() {
                    Some(dir) if path.is_relative() => dir.join(path),
                    _ => path,
                };
                self.file(&path)
            }
            _ => Err(EngineError::UnknownCommand(name.to_string())),
        }?;
        args.finish()?;
        Ok(output)
    }

    fn index(&self, line: &str, tag: usize) -> Result<usize, EngineError> {
        self.index_of
            .get(&tag)
            .copied()
            .ok_or_else(|| EngineError::invalid(line, format!("no particle with tag {}", tag)))
    }

    fn add_atom(&mut self, args: &mut Args) -> Result<CommandOutput, EngineError> {
        let tag: usize = args.parse("tag")?;
        let atom_type: usize = args.parse("atom type")?;
        let position = args.vector("position")?;
        if tag == 0 || self.index_of.contains_key(&tag) {
            return Err(EngineError::invalid(
                args.line,
                format!("tag {} is zero or already in use", tag),
            ));
        }
        self.index_of.insert(tag, self.tags.len());
        self.tags.push(tag);
        self.types.push(atom_type);
        self.positions.push(position);
        self.velocities.push(Vector3::zeros());
        self.evaluation = BondEvaluation::empty(self.tags.len());
        Ok(CommandOutput::default())
    }

    fn add_bond(&mut self, args: &mut Args) -> Result<CommandOutput, EngineError> {
        let bond_type: usize = args.parse("bond type")?;
        let first: usize = args.parse("first tag")?;
        let second: usize = args.parse("second tag")?;
        if bond_type == 0 || first == second {
            return Err(EngineError::invalid(
                args.line,
                "bond needs a positive type and two distinct particles",
            ));
        }
        let i = self.index(args.line, first)?;
        let j = self.index(args.line, second)?;
        self.bonds.push(BondTopology { bond_type, i, j });
        Ok(CommandOutput::default())
    }

    fn set_bond_style(&mut self, args: &mut Args) -> Result<CommandOutput, EngineError> {
        let name = args.word("bond style")?;
        let suffixed = self
            .suffix
            .as_deref()
            .and_then(|suffix| BondStyle::from_name(&format!("{}/{}", name, suffix)));
        let style = suffixed
            .or_else(|| BondStyle::from_name(name))
            .ok_or_else(|| unknown_style("bond", name))?;
        debug!(style = %style.name(), "Bond style selected.");
        self.style = Some(style);
        Ok(CommandOutput::default())
    }

    fn set_bond_coeff(&mut self, args: &mut Args) -> Result<CommandOutput, EngineError> {
        let line = args.line;
        let target = args.word("bond type")?.to_string();
        let params: Vec<f64> = args.rest_parsed("coefficient")?;
        let max_type = self.bonds.iter().map(|b| b.bond_type).max().unwrap_or(0);
        let style = self
            .style
            .as_mut()
            .ok_or_else(|| EngineError::invalid(line, "bond_coeff before bond_style"))?;
        if target == "*" {
            for bond_type in 1..=max_type {
                style.set_coeff(bond_type, &params)?;
            }
        } else {
            let bond_type = target
                .parse()
                .map_err(|_| EngineError::invalid(line, "invalid bond type"))?;
            style.set_coeff(bond_type, &params)?;
        }
        Ok(CommandOutput::default())
    }

    fn add_compute(&mut self, args: &mut Args) -> Result<CommandOutput, EngineError> {
        let id = args.word("compute id")?.to_string();
        args.expect_word("all")?;
        let compute = match args.word("compute style")? {
            "pe/atom" => Compute::PeAtom,
            "reduce" => {
                args.expect_word("sum")?;
                let input = args.word("reduce input")?;
                let source = input
                    .strip_prefix("c_")
                    .ok_or_else(|| EngineError::invalid(args.line, "reduce input must be c_ID"))?;
                match self.find_compute(source) {
                    Some(Compute::PeAtom) => {}
                    Some(_) => {
                        return Err(EngineError::invalid(
                            args.line,
                            "reduce input must be a per-particle compute",
                        ));
                    }
                    None => return Err(EngineError::UnknownCompute(source.to_string())),
                }
                Compute::ReduceSum {
                    source: source.to_string(),
                }
            }
            other => return Err(unknown_style("compute", other)),
        };
        self.computes.retain(|(existing, _)| existing != &id);
        self.computes.push((id, compute));
        Ok(CommandOutput::default())
    }

    fn find_compute(&self, id: &str) -> Option<&Compute> {
        self.computes
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, compute)| compute)
    }

    fn set_thermo_style(&mut self, args: &mut Args) -> Result<CommandOutput, EngineError> {
        args.expect_word("custom")?;
        let mut columns = Vec::new();
        while let Some(column) = args.next() {
            let known = match column.strip_prefix("c_") {
                Some(id) => self.find_compute(id).is_some(),
                None => matches!(column, "step" | "temp" | "pe" | "ke" | "etotal" | "press"),
            };
            if !known {
                return Err(EngineError::invalid(
                    args.line,
                    format!("unknown thermo keyword '{}'", column),
                ));
            }
            columns.push(column.to_string());
        }
        self.thermo_columns = columns;
        Ok(CommandOutput::default())
    }

    fn evaluate(&mut self) -> Result<(), EngineError> {
        self.evaluation = match &self.style {
            Some(style) => style.compute(&self.positions, &self.bonds)?,
            None if self.bonds.is_empty() => BondEvaluation::empty(self.tags.len()),
            None => {
                return Err(EngineError::invalid(
                    "run",
                    "bonds are defined but no bond style is set",
                ));
            }
        };
        Ok(())
    }

    fn masses_per_particle(&self) -> Result<Vec<f64>, EngineError> {
        self.types
            .iter()
            .map(|t| {
                self.masses
                    .get(t)
                    .copied()
                    .ok_or_else(|| EngineError::invalid("run", format!("mass of type {} is not set", t)))
            })
            .collect()
    }

    fn run(&mut self, args: &mut Args) -> Result<CommandOutput, EngineError> {
        let nsteps: u64 = args.parse("step count")?;
        if let Some(keyword) = args.next() {
            if keyword != "post" || !matches!(args.word("post flag")?, "yes" | "no") {
                return Err(EngineError::invalid(args.line, "expected 'post yes|no'"));
            }
        }

        let started = Instant::now();
        let masses = match &self.nve {
            Some(_) if nsteps > 0 => Some(self.masses_per_particle()?),
            _ => None,
        };
        let integrator = VelocityVerlet::new(self.timestep);

        self.evaluate()?;
        let mut text = format!("{}\n", self.thermo_columns.join(" "));
        self.thermo_line(&mut text, masses.as_deref())?;

        let first_step = self.step;
        for n in 1..=nsteps {
            if let Some(masses) = &masses {
                integrator.initial_integrate(
                    &mut self.positions,
                    &mut self.velocities,
                    &self.evaluation.forces,
                    masses,
                );
            }
            self.evaluate()?;
            if let Some(masses) = &masses {
                integrator.final_integrate(&mut self.velocities, &self.evaluation.forces, masses);
            }
            self.step = first_step + n;
            if n == nsteps || (self.thermo_every > 0 && self.step % self.thermo_every == 0) {
                self.thermo_line(&mut text, masses.as_deref())?;
            }
        }

        let _ = writeln!(
            text,
            "Loop time of {:.6} on 1 procs for {} steps with {} atoms",
            started.elapsed().as_secs_f64(),
            nsteps,
            self.natoms()
        );
        Ok(CommandOutput {
            text,
            steps_completed: Some(nsteps),
        })
    }

    fn thermo_line(&self, text: &mut String, masses: Option<&[f64]>) -> Result<(), EngineError> {
        let ke = match masses {
            Some(masses) => kinetic_energy(&self.velocities, masses),
            None => self
                .masses_per_particle()
                .map(|m| kinetic_energy(&self.velocities, &m))
                .unwrap_or(0.0),
        };
        let dof = 3 * self.natoms().saturating_sub(1);
        let mut values = Vec::with_capacity(self.thermo_columns.len());
        for column in &self.thermo_columns {
            let value = match column.as_str() {
                "step" => {
                    values.push(self.step.to_string());
                    continue;
                }
                "temp" if dof > 0 => 2.0 * ke / dof as f64,
                "temp" => 0.0,
                "pe" => self.evaluation.energy,
                "ke" => ke,
                "etotal" => ke + self.evaluation.energy,
                // No periodic box: report the virial trace over three.
                "press" => self.evaluation.virial[..3].iter().sum::<f64>() / 3.0,
                other => self.compute_scalar(other.trim_start_matches("c_"))?,
            };
            values.push(format!("{:.8}", value));
        }
        let _ = writeln!(text, "{}", values.join(" "));
        Ok(())
    }

    fn run_script(&mut self, path: &Path, text: &str) -> Result<CommandOutput, EngineError> {
        let mut output = CommandOutput::default();
        for (number, raw) in text.lines().enumerate() {
            let line = raw.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }
            let result = self.execute(line).map_err(|e| EngineError::ScriptLine {
                path: path.display().to_string(),
                line: number + 1,
                source: Box::new(e),
            })?;
            output.append(result);
        }
        Ok(output)
    }
}

impl Engine for SandboxEngine {
    fn version(&self) -> &str {
        SANDBOX_VERSION
    }

    fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    fn has_style(&self, category: &str, style: &str) -> bool {
        match category {
            "atom" => ATOM_STYLES.contains(&style),
            "bond" => BondStyle::from_name(style).is_some(),
            "fix" => FIX_STYLES.contains(&style),
            "compute" => COMPUTE_STYLES.contains(&style),
            _ => false,
        }
    }

    fn banner(&self) -> &str {
        &self.banner
    }

    fn command(&mut self, line: &str) -> Result<CommandOutput, EngineError> {
        let line = line.split('#').next().unwrap_or_default().trim();
        self.execute(line)
    }

    fn file(&mut self, path: &Path) -> Result<CommandOutput, EngineError> {
        debug!(path = %path.display(), "Reading sandbox script.");
        let text = std::fs::read_to_string(path).map_err(|e| EngineError::Script {
            path: path.display().to_string(),
            source: e,
        })?;
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        self.script_dirs.push(dir);
        let result = self.run_script(path, &text);
        self.script_dirs.pop();
        result
    }

    fn snapshot(&self) -> Snapshot {
        let forces = if self.evaluation.forces.len() == self.tags.len() {
            self.evaluation.forces.clone()
        } else {
            vec![Vector3::zeros(); self.tags.len()]
        };
        Snapshot {
            natoms: self.natoms(),
            tags: self.tags.clone(),
            forces,
            stress: StressTensor::from_components(self.evaluation.virial),
            energy: self.evaluation.energy,
        }
    }

    fn compute_scalar(&self, id: &str) -> Result<f64, EngineError> {
        match self.find_compute(id) {
            Some(Compute::ReduceSum { source }) => match self.find_compute(source) {
                Some(Compute::PeAtom) => Ok(self.evaluation.per_atom_energy.iter().sum()),
                _ => Err(EngineError::UnknownCompute(source.clone())),
            },
            Some(Compute::PeAtom) => Err(EngineError::invalid(
                id,
                "per-particle compute has no scalar",
            )),
            None => Err(EngineError::UnknownCompute(id.to_string())),
        }
    }
}

fn unknown_style(category: &str, style: &str) -> EngineError {
    EngineError::UnknownStyle {
        category: category.to_string(),
        style: style.to_string(),
    }
}

/// Whitespace-separated arguments of one command line.
struct Args<'a> {
    line: &'a str,
    words: std::str::SplitWhitespace<'a>,
}

impl<'a> Args<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            line,
            words: line.split_whitespace(),
        }
    }

    fn next(&mut self) -> Option<&'a str> {
        self.words.next()
    }

    fn word(&mut self, what: &str) -> Result<&'a str, EngineError> {
        self.words
            .next()
            .ok_or_else(|| EngineError::invalid(self.line, format!("missing {}", what)))
    }

    fn expect_word(&mut self, expected: &str) -> Result<(), EngineError> {
        match self.words.next() {
            Some(word) if word == expected => Ok(()),
            _ => Err(EngineError::invalid(
                self.line,
                format!("expected '{}'", expected),
            )),
        }
    }

    fn parse<T: FromStr>(&mut self, what: &str) -> Result<T, EngineError> {
        let word = self.word(what)?;
        word.parse()
            .map_err(|_| EngineError::invalid(self.line, format!("invalid {} '{}'", what, word)))
    }

    fn vector(&mut self, what: &str) -> Result<Vector3<f64>, EngineError> {
        Ok(Vector3::new(
            self.parse(what)?,
            self.parse(what)?,
            self.parse(what)?,
        ))
    }

    fn rest_parsed<T: FromStr>(&mut self, what: &str) -> Result<Vec<T>, EngineError> {
        let mut values = Vec::new();
        while let Some(word) = self.words.next() {
            values.push(word.parse().map_err(|_| {
                EngineError::invalid(self.line, format!("invalid {} '{}'", what, word))
            })?);
        }
        Ok(values)
    }

    fn finish(mut self) -> Result<(), EngineError> {
        match self.words.next() {
            None => Ok(()),
            Some(extra) => Err(EngineError::invalid(
                self.line,
                format!("unexpected argument '{}'", extra),
            )),
        }
    }
}
