//! Feature vectors bound to memory cells.
//!
//! Features are opaque fixed-length `f32` vectors supplied by whatever sits
//! in front of the engine (an image decoder, a text embedder, a sensor).
//! The engine only ever adds them into the déjà-vu matrix and projects
//! queries through it.

use rand::Rng;

/// A dense feature vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Features(pub Vec<f32>);

impl Features {
    /// A vector of `dim` zeros — what an empty cell recalls.
    #[must_use]
    pub fn zeros(dim: usize) -> Self {
        Self(vec![0.0; dim])
    }

    /// Unit vector along axis `axis`. Out-of-range axes yield all zeros.
    #[must_use]
    pub fn one_hot(dim: usize, axis: usize) -> Self {
        let mut v = vec![0.0; dim];
        if let Some(slot) = v.get_mut(axis) {
            *slot = 1.0;
        }
        Self(v)
    }

    /// Random L2-normalized vector.
    pub fn random_unit<R: Rng + ?Sized>(dim: usize, rng: &mut R) -> Self {
        let raw: Vec<f32> = (0..dim).map(|_| rng.gen_range(-1.0..1.0)).collect();
        let mag: f32 = raw.iter().map(|x| x * x).sum::<f32>().sqrt();
        if mag < f32::EPSILON {
            return Self::zeros(dim);
        }
        Self(raw.iter().map(|x| x / mag).collect())
    }

    /// Number of components.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.0.len()
    }

    /// Borrow the components.
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Whether every component is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&x| x == 0.0)
    }

    /// Dot product, accumulated in `f64`. Mismatched lengths use the shorter.
    #[must_use]
    pub fn dot(&self, other: &Self) -> f64 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(&a, &b)| f64::from(a) * f64::from(b))
            .sum()
    }
}

impl From<Vec<f32>> for Features {
    fn from(v: Vec<f32>) -> Self {
        Self(v)
    }
}
