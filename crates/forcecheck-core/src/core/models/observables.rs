use nalgebra::Vector3;
use thiserror::Error;

/// Symmetric stress (virial) tensor stored as its six independent components.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StressTensor {
    pub xx: f64,
    pub yy: f64,
    pub zz: f64,
    pub xy: f64,
    pub xz: f64,
    pub yz: f64,
}

impl StressTensor {
    pub const COMPONENT_NAMES: [&'static str; 6] = ["xx", "yy", "zz", "xy", "xz", "yz"];

    pub fn from_components(c: [f64; 6]) -> Self {
        Self {
            xx: c[0],
            yy: c[1],
            zz: c[2],
            xy: c[3],
            xz: c[4],
            yz: c[5],
        }
    }

    /// Components in the fixed order xx, yy, zz, xy, xz, yz.
    pub fn components(&self) -> [f64; 6] {
        [self.xx, self.yy, self.zz, self.xy, self.xz, self.yz]
    }
}

/// Largest particle count a force table will allocate slots for.
pub const MAX_NATOMS: usize = 10_000_000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ForceTableError {
    #[error("Particle tag {tag} is outside the table range 1..={max_tag}")]
    TagOutOfRange { tag: usize, max_tag: usize },
    #[error("Particle count {natoms} exceeds the limit of {max}")]
    TooLarge { natoms: usize, max: usize },
}

/// Per-particle force vectors addressed by particle tag.
///
/// The table holds `natoms + 1` entries: tags are 1-based and slot 0 is never
/// written. Tags come straight from the engine's tag namespace, so a slot
/// index has nothing to do with where a particle is stored inside the engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ForceTable {
    slots: Vec<Vector3<f64>>,
}

impl ForceTable {
    pub fn with_natoms(natoms: usize) -> Self {
        Self {
            slots: vec![Vector3::zeros(); natoms + 1],
        }
    }

    /// Like [`ForceTable::with_natoms`], for counts that come from untrusted
    /// input. Counts above [`MAX_NATOMS`] are refused before allocating.
    pub fn try_with_natoms(natoms: usize) -> Result<Self, ForceTableError> {
        if natoms > MAX_NATOMS {
            return Err(ForceTableError::TooLarge {
                natoms,
                max: MAX_NATOMS,
            });
        }
        Ok(Self::with_natoms(natoms))
    }

    /// Number of slots, including the unused slot 0.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Largest tag the table can hold.
    #[inline]
    pub fn max_tag(&self) -> usize {
        self.slots.len().saturating_sub(1)
    }

    pub fn get(&self, tag: usize) -> Option<&Vector3<f64>> {
        if tag == 0 {
            return None;
        }
        self.slots.get(tag)
    }

    pub fn set(&mut self, tag: usize, force: Vector3<f64>) -> Result<(), ForceTableError> {
        let max_tag = self.max_tag();
        if tag == 0 || tag > max_tag {
            return Err(ForceTableError::TagOutOfRange { tag, max_tag });
        }
        self.slots[tag] = force;
        Ok(())
    }

    /// Iterates over `(tag, force)` for every addressable slot.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Vector3<f64>)> {
        self.slots.iter().enumerate().skip(1)
    }

    /// Raw slot view, slot 0 included.
    pub fn as_slice(&self) -> &[Vector3<f64>] {
        &self.slots
    }
}
