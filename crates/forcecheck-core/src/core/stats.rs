use std::fmt;

/// Relative difference between a computed and a reference value.
///
/// The difference is scaled by the smaller of the two magnitudes. When that
/// magnitude is exactly zero the absolute difference is returned instead, so
/// two exact zeros compare as a perfect match.
#[inline]
pub fn relative_error(computed: f64, reference: f64) -> f64 {
    let diff = (computed - reference).abs();
    let div = computed.abs().min(reference.abs());
    if div == 0.0 { diff } else { diff / div }
}

/// Running statistics over a stream of non-negative error samples.
///
/// Mean and variance are updated incrementally (Welford), so a stream of
/// identical samples has a standard deviation of exactly zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ErrorAccumulator {
    count: usize,
    mean: f64,
    m2: f64,
    max: f64,
    argmax: Option<usize>,
}

impl ErrorAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Appends one sample. The maximum and its 1-based position only move
    /// when `value` strictly exceeds the current maximum.
    pub fn add(&mut self, value: f64) {
        self.count += 1;
        if value > self.max {
            self.max = value;
            self.argmax = Some(self.count);
        }
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn average(&self) -> f64 {
        self.mean
    }

    /// Population standard deviation.
    pub fn stddev(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        (self.m2 / self.count as f64).max(0.0).sqrt()
    }

    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    #[inline]
    pub fn argmax(&self) -> Option<usize> {
        self.argmax
    }
}

impl fmt::Display for ErrorAccumulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Average: {:10.3e} StdDev: {:10.3e} MaxErr: {:10.3e} @ item: ",
            self.average(),
            self.stddev(),
            self.max()
        )?;
        match self.argmax {
            Some(idx) => write!(f, "{}", idx),
            None => write!(f, "-"),
        }
    }
}
