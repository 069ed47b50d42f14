//! # Opinion Space
//!
//! A homogeneous array of per-agent opinion records behind get/set/distance
//! operations. The simulation layers never assume scalar floats: they go
//! through the [`Opinion`] trait, so alternative representations (vector
//! valued, categorical) can plug in without touching the model or driver.
//!
//! The one instantiation this crate ships is `f32` opinions in [-1, 1].

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ============================================================================
// Opinion trait
// ============================================================================

/// One agent's opinion record.
///
/// `distance` is the pluggable metric between two records; `scalar` is the
/// projection the driver's convergence test ranges over. For scalar floats
/// both are the obvious choices: absolute difference and identity.
pub trait Opinion: Copy + Default + PartialEq + std::fmt::Debug {
    fn distance(&self, other: &Self) -> f32;

    /// Projection used by the convergence measure (`max − min` spread).
    fn scalar(&self) -> f32;
}

impl Opinion for f32 {
    fn distance(&self, other: &Self) -> f32 {
        (self - other).abs()
    }

    fn scalar(&self) -> f32 {
        *self
    }
}

// ============================================================================
// OpinionSpace
// ============================================================================

/// Per-agent opinion storage bound to a network of the same size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpinionSpace<T: Opinion = f32> {
    opinions: Vec<T>,
}

impl<T: Opinion> OpinionSpace<T> {
    /// Create a space of `num_agents` default-valued opinions.
    pub fn new(num_agents: usize) -> Self {
        Self {
            opinions: vec![T::default(); num_agents],
        }
    }

    pub fn from_opinions(opinions: Vec<T>) -> Self {
        Self { opinions }
    }

    pub fn len(&self) -> usize {
        self.opinions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.opinions.is_empty()
    }

    /// Read-only view of one agent's opinion. `None` if out of range.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.opinions.get(index)
    }

    /// Bounds-checked in-place replacement. On an out-of-range index this
    /// fails and performs no mutation.
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        let len = self.opinions.len();
        let slot = self.opinions.get_mut(index).ok_or(Error::InvalidIndex {
            what: "agent",
            index,
            len,
        })?;
        *slot = value;
        Ok(())
    }

    /// Metric distance between agents `a` and `b`.
    pub fn distance(&self, a: usize, b: usize) -> Result<f32> {
        let len = self.opinions.len();
        let oa = self.opinions.get(a).ok_or(Error::InvalidIndex {
            what: "agent",
            index: a,
            len,
        })?;
        let ob = self.opinions.get(b).ok_or(Error::InvalidIndex {
            what: "agent",
            index: b,
            len,
        })?;
        Ok(oa.distance(ob))
    }

    /// `max − min` over scalar projections; 0 for an empty space.
    pub fn spread(&self) -> f32 {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for op in &self.opinions {
            let s = op.scalar();
            if s < min {
                min = s;
            }
            if s > max {
                max = s;
            }
        }
        if min > max { 0.0 } else { max - min }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.opinions
    }
}

impl OpinionSpace<f32> {
    /// Fill a space with independent uniform draws from [-1, 1].
    pub fn uniform(num_agents: usize, rng: &mut dyn RngCore) -> Self {
        Self {
            opinions: (0..num_agents)
                .map(|_| rng.gen_range(-1.0f32..=1.0))
                .collect(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
