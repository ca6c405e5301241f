use nalgebra::Vector3;

/// Constant-energy velocity-Verlet integration, split around the force
/// evaluation of each step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityVerlet {
    pub dt: f64,
}

impl VelocityVerlet {
    pub fn new(dt: f64) -> Self {
        Self { dt }
    }

    /// Half kick followed by a full drift.
    pub fn initial_integrate(
        &self,
        positions: &mut [Vector3<f64>],
        velocities: &mut [Vector3<f64>],
        forces: &[Vector3<f64>],
        masses: &[f64],
    ) {
        let half_dt = 0.5 * self.dt;
        for (((x, v), f), &m) in positions
            .iter_mut()
            .zip(velocities.iter_mut())
            .zip(forces)
            .zip(masses)
        {
            *v += f * (half_dt / m);
            *x += *v * self.dt;
        }
    }

    /// Second half kick with the forces of the new positions.
    pub fn final_integrate(
        &self,
        velocities: &mut [Vector3<f64>],
        forces: &[Vector3<f64>],
        masses: &[f64],
    ) {
        let half_dt = 0.5 * self.dt;
        for ((v, f), &m) in velocities.iter_mut().zip(forces).zip(masses) {
            *v += f * (half_dt / m);
        }
    }
}

pub fn kinetic_energy(velocities: &[Vector3<f64>], masses: &[f64]) -> f64 {
    velocities
        .iter()
        .zip(masses)
        .map(|(v, &m)| 0.5 * m * v.norm_squared())
        .sum()
}
