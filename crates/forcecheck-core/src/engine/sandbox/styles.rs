use crate::engine::error::EngineError;
use nalgebra::Vector3;
use rayon::prelude::*;
use std::ops::RangeInclusive;

/// Suffix of the thread-parallel style variants.
pub const ACCELERATED_SUFFIX: &str = "omp";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondKind {
    Zero,
    Harmonic,
    Morse,
    Gromos,
}

impl BondKind {
    pub const ALL: [BondKind; 4] = [Self::Zero, Self::Harmonic, Self::Morse, Self::Gromos];

    pub fn name(self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::Harmonic => "harmonic",
            Self::Morse => "morse",
            Self::Gromos => "gromos",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Accepted number of `bond_coeff` parameters after the type.
    pub fn coeff_count(self) -> RangeInclusive<usize> {
        match self {
            Self::Zero => 0..=1,
            Self::Harmonic | Self::Gromos => 2..=2,
            Self::Morse => 3..=3,
        }
    }

    /// Energy of one bond of length `r` and the force prefactor `fbond`,
    /// such that the force on the first particle is `fbond * (x1 - x2)`.
    #[inline]
    pub fn evaluate(self, coeffs: &[f64], r: f64) -> (f64, f64) {
        match self {
            Self::Zero => (0.0, 0.0),
            Self::Harmonic => {
                let (k, r0) = (coeffs[0], coeffs[1]);
                let dr = r - r0;
                let rk = k * dr;
                let fbond = if r > 0.0 { -2.0 * rk / r } else { 0.0 };
                (rk * dr, fbond)
            }
            Self::Morse => {
                let (d0, alpha, r0) = (coeffs[0], coeffs[1], coeffs[2]);
                let dr = r - r0;
                let ralpha = (-alpha * dr).exp();
                let fbond = if r > 0.0 {
                    -2.0 * d0 * alpha * (1.0 - ralpha) * ralpha / r
                } else {
                    0.0
                };
                (d0 * (1.0 - ralpha) * (1.0 - ralpha), fbond)
            }
            Self::Gromos => {
                let (k, r0) = (coeffs[0], coeffs[1]);
                let dr = r * r - r0 * r0;
                (0.25 * k * dr * dr, -k * dr)
            }
        }
    }
}

/// A bond between the particles at storage indices `i` and `j`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BondTopology {
    pub bond_type: usize,
    pub i: usize,
    pub j: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BondEvaluation {
    pub energy: f64,
    pub forces: Vec<Vector3<f64>>,
    pub per_atom_energy: Vec<f64>,
    /// Virial components in the order xx, yy, zz, xy, xz, yz.
    pub virial: [f64; 6],
}

impl BondEvaluation {
    pub fn empty(nparticles: usize) -> Self {
        Self {
            energy: 0.0,
            forces: vec![Vector3::zeros(); nparticles],
            per_atom_energy: vec![0.0; nparticles],
            virial: [0.0; 6],
        }
    }
}

struct BondTerm {
    i: usize,
    j: usize,
    del: Vector3<f64>,
    energy: f64,
    fbond: f64,
}

/// An active bond style with its per-type coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct BondStyle {
    kind: BondKind,
    accelerated: bool,
    coeffs: Vec<Option<Vec<f64>>>,
}

impl BondStyle {
    pub fn new(kind: BondKind, accelerated: bool) -> Self {
        Self {
            kind,
            accelerated,
            coeffs: Vec::new(),
        }
    }

    /// Resolves a style name such as `morse` or `morse/omp`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.split_once('/') {
            None => BondKind::from_name(name).map(|kind| Self::new(kind, false)),
            Some((base, ACCELERATED_SUFFIX)) => {
                BondKind::from_name(base).map(|kind| Self::new(kind, true))
            }
            Some(_) => None,
        }
    }

    pub fn kind(&self) -> BondKind {
        self.kind
    }

    pub fn is_accelerated(&self) -> bool {
        self.accelerated
    }

    pub fn name(&self) -> String {
        if self.accelerated {
            format!("{}/{}", self.kind.name(), ACCELERATED_SUFFIX)
        } else {
            self.kind.name().to_string()
        }
    }

    /// Every style name this engine can instantiate.
    pub fn available_names() -> Vec<String> {
        BondKind::ALL
            .iter()
            .flat_map(|kind| {
                [
                    kind.name().to_string(),
                    format!("{}/{}", kind.name(), ACCELERATED_SUFFIX),
                ]
            })
            .collect()
    }

    pub fn set_coeff(&mut self, bond_type: usize, params: &[f64]) -> Result<(), EngineError> {
        if bond_type == 0 {
            return Err(EngineError::invalid(
                "bond_coeff",
                "bond types start at 1",
            ));
        }
        if !self.kind.coeff_count().contains(&params.len()) {
            return Err(EngineError::invalid(
                "bond_coeff",
                format!(
                    "style {} takes {:?} coefficients, got {}",
                    self.name(),
                    self.kind.coeff_count(),
                    params.len()
                ),
            ));
        }
        if self.coeffs.len() < bond_type {
            self.coeffs.resize(bond_type, None);
        }
        self.coeffs[bond_type - 1] = Some(params.to_vec());
        Ok(())
    }

    pub fn coeffs(&self, bond_type: usize) -> Option<&[f64]> {
        bond_type
            .checked_sub(1)
            .and_then(|idx| self.coeffs.get(idx))
            .and_then(|c| c.as_deref())
    }

    fn term(&self, bond: &BondTopology, positions: &[Vector3<f64>]) -> Result<BondTerm, EngineError> {
        let coeffs = self
            .coeffs(bond.bond_type)
            .ok_or(EngineError::MissingCoefficients {
                bond_type: bond.bond_type,
            })?;
        let del = positions[bond.i] - positions[bond.j];
        let (energy, fbond) = self.kind.evaluate(coeffs, del.norm());
        Ok(BondTerm {
            i: bond.i,
            j: bond.j,
            del,
            energy,
            fbond,
        })
    }

    /// Evaluates every bond and accumulates forces, per-particle energies,
    /// and the virial.
    ///
    /// Accelerated styles evaluate the bond terms in parallel. Accumulation is
    /// always serial in bond order, so both variants produce identical sums.
    pub fn compute(
        &self,
        positions: &[Vector3<f64>],
        bonds: &[BondTopology],
    ) -> Result<BondEvaluation, EngineError> {
        let terms: Vec<BondTerm> = if self.accelerated {
            bonds
                .par_iter()
                .map(|bond| self.term(bond, positions))
                .collect::<Result<_, _>>()?
        } else {
            bonds
                .iter()
                .map(|bond| self.term(bond, positions))
                .collect::<Result<_, _>>()?
        };

        let mut result = BondEvaluation::empty(positions.len());
        for term in terms {
            let f = term.del * term.fbond;
            result.forces[term.i] += f;
            result.forces[term.j] -= f;
            result.energy += term.energy;
            result.per_atom_energy[term.i] += 0.5 * term.energy;
            result.per_atom_energy[term.j] += 0.5 * term.energy;

            let d = term.del;
            let v = [
                d.x * d.x,
                d.y * d.y,
                d.z * d.z,
                d.x * d.y,
                d.x * d.z,
                d.y * d.z,
            ];
            for (acc, component) in result.virial.iter_mut().zip(v) {
                *acc += component * term.fbond;
            }
        }
        Ok(result)
    }
}
