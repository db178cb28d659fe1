//! Rate specifications for event generators.
//!
//! A generator's instantaneous rate is either plain data (a constant, or a
//! per-base / per-repeat rate scaled by the current array size) or an
//! arbitrary function of `(current_time, array)`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::errors::ParameterError;
use crate::genome::CrisprArray;

/// Signature of a custom rate function.
pub type RateFn = dyn Fn(f64, &CrisprArray) -> f64 + Send + Sync;

/// How a generator's rate is obtained at each step.
///
/// The data variants serialize externally tagged in snake case, for example
/// `{"per_base": 1e-5}`. [`Rate::Custom`] cannot be serialized.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rate {
    /// Fixed rate, independent of the array.
    Constant(f64),
    /// `rate * array_length * repeat_length`, zero for an empty array.
    PerBase(f64),
    /// `rate * array_length`, zero for an empty array.
    PerRepeat(f64),
    /// Any function of the current time and array.
    #[serde(skip)]
    Custom(Arc<RateFn>),
}

impl Rate {
    /// Wrap a closure as a [`Rate::Custom`].
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(f64, &CrisprArray) -> f64 + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Evaluate the rate for the given state.
    #[inline]
    pub fn evaluate(&self, current_time: f64, array: &CrisprArray) -> f64 {
        match self {
            Self::Constant(r) => *r,
            Self::PerBase(r) => {
                if array.is_empty() || array.repeat_length() == 0 {
                    0.0
                } else {
                    r * array.len() as f64 * array.repeat_length() as f64
                }
            }
            Self::PerRepeat(r) => {
                if array.is_empty() {
                    0.0
                } else {
                    r * array.len() as f64
                }
            }
            Self::Custom(f) => f(current_time, array),
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }

    /// Reject negative or non-finite data rates. Custom rates are checked by
    /// the engine each time they are evaluated.
    pub fn validate(&self, generator: &'static str) -> Result<(), ParameterError> {
        match self {
            Self::Constant(r) | Self::PerBase(r) | Self::PerRepeat(r) => {
                if !r.is_finite() || *r < 0.0 {
                    return Err(ParameterError::invalid(
                        generator,
                        format!("rate must be finite and non-negative, got {r}"),
                    ));
                }
                Ok(())
            }
            Self::Custom(_) => Ok(()),
        }
    }

    /// JSON summary: the constant as a number, other data rates in their
    /// tagged form, `"callable"` for custom functions.
    pub fn to_json_value(&self) -> Value {
        match self {
            Self::Constant(r) => Value::from(*r),
            Self::PerBase(r) => serde_json::json!({ "per_base": r }),
            Self::PerRepeat(r) => serde_json::json!({ "per_repeat": r }),
            Self::Custom(_) => Value::from("callable"),
        }
    }
}

impl fmt::Debug for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(r) => f.debug_tuple("Constant").field(r).finish(),
            Self::PerBase(r) => f.debug_tuple("PerBase").field(r).finish(),
            Self::PerRepeat(r) => f.debug_tuple("PerRepeat").field(r).finish(),
            Self::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}

impl PartialEq for Rate {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Constant(a), Self::Constant(b))
            | (Self::PerBase(a), Self::PerBase(b))
            | (Self::PerRepeat(a), Self::PerRepeat(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Default for Rate {
    fn default() -> Self {
        Self::Constant(0.0)
    }
}

impl From<f64> for Rate {
    fn from(rate: f64) -> Self {
        Self::Constant(rate)
    }
}
