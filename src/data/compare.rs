//! Numeric comparison operators used for filtering and significance selection.

use crate::error::{ProteolysisError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Comparison applied as `value <op> threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparator {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
}

impl Comparator {
    /// Evaluate the comparison. NaN never passes.
    pub fn apply(self, value: f64, threshold: f64) -> bool {
        if value.is_nan() || threshold.is_nan() {
            return false;
        }
        match self {
            Self::Lt => value < threshold,
            Self::Le => value <= threshold,
            Self::Gt => value > threshold,
            Self::Ge => value >= threshold,
            Self::Eq => value == threshold,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Eq => "==",
        }
    }
}

impl FromStr for Comparator {
    type Err = ProteolysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "lt" | "<" => Ok(Self::Lt),
            "le" | "<=" => Ok(Self::Le),
            "gt" | ">" => Ok(Self::Gt),
            "ge" | ">=" => Ok(Self::Ge),
            "eq" | "==" | "=" => Ok(Self::Eq),
            other => Err(ProteolysisError::InvalidParameter(format!(
                "Unknown comparator '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply() {
        assert!(Comparator::Le.apply(0.05, 0.05));
        assert!(!Comparator::Lt.apply(0.05, 0.05));
        assert!(Comparator::Ge.apply(3.0, 1.0));
        assert!(!Comparator::Le.apply(f64::NAN, 0.05));
    }

    #[test]
    fn test_from_str() {
        assert_eq!("le".parse::<Comparator>().unwrap(), Comparator::Le);
        assert_eq!(">".parse::<Comparator>().unwrap(), Comparator::Gt);
        assert!("between".parse::<Comparator>().is_err());
    }
}
