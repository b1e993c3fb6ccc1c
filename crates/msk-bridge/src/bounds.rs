//! Bound-key classification of (lower, upper) pairs.

use crate::error::{BridgeError, BridgeResult};

/// How a row or column is bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundKey {
    Free,
    LowerOnly,
    UpperOnly,
    Fixed,
    Ranged,
}

impl BoundKey {
    /// Classify a bound pair, rejecting NaN, inverted and wrong-signed
    /// infinite bounds.
    pub fn derive(lower: f64, upper: f64) -> BridgeResult<Self> {
        if lower.is_nan() || upper.is_nan() {
            return Err(BridgeError::value("NAN values not allowed in bounds"));
        }
        if lower.is_finite() && upper.is_finite() && lower > upper {
            return Err(BridgeError::value(
                "The upper bound should be larger than the lower bound",
            ));
        }
        if lower == f64::INFINITY {
            return Err(BridgeError::value("+INF values not allowed as lower bound"));
        }
        if upper == f64::NEG_INFINITY {
            return Err(BridgeError::value("-INF values not allowed as upper bound"));
        }

        Ok(match (lower.is_infinite(), upper.is_infinite()) {
            (true, true) => BoundKey::Free,
            (true, false) => BoundKey::UpperOnly,
            (false, true) => BoundKey::LowerOnly,
            (false, false) if lower == upper => BoundKey::Fixed,
            (false, false) => BoundKey::Ranged,
        })
    }

    /// Rebuild host bounds from a key and the raw values the solver stores.
    ///
    /// Sides the key leaves open become the matching infinity; the solver's
    /// stored value for those sides is meaningless.
    pub fn expand(&self, lower: f64, upper: f64) -> (f64, f64) {
        match self {
            BoundKey::Free => (f64::NEG_INFINITY, f64::INFINITY),
            BoundKey::LowerOnly => (lower, f64::INFINITY),
            BoundKey::UpperOnly => (f64::NEG_INFINITY, upper),
            BoundKey::Fixed | BoundKey::Ranged => (lower, upper),
        }
    }
}
