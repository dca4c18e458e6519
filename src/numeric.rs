//! Non-finite filtering shared by every numeric reduction.
//!
//! Missing samples travel through the series as `NaN`; reductions must skip
//! them instead of reading them as zero.

use serde::{Deserialize, Serialize};

/// Inclusive value range of a series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueBounds {
    pub min: f64,
    pub max: f64,
}

impl ValueBounds {
    pub fn union(self, other: ValueBounds) -> ValueBounds {
        ValueBounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

/// Iterator over the finite values only
pub fn finite_values(values: &[f64]) -> impl Iterator<Item = f64> + '_ {
    values.iter().copied().filter(|v| v.is_finite())
}

/// Min and max over the finite values, `None` when there are none
pub fn finite_bounds(values: &[f64]) -> Option<ValueBounds> {
    finite_values(values).fold(None, |acc, v| match acc {
        None => Some(ValueBounds { min: v, max: v }),
        Some(b) => Some(ValueBounds {
            min: b.min.min(v),
            max: b.max.max(v),
        }),
    })
}

/// Missing or non-finite scalars collapse to zero
pub fn finite_or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}
