//! Extent domain entity
//!
//! A bounding box in the service's configured spatial reference.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bounding box (minX, minY, maxX, maxY).
///
/// No ordering between min and max components is enforced; upstream services
/// receive exactly what was configured or requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Extent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

/// Reasons a textual bounding box was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtentParseError {
    #[error("expected 4 components, got {0}")]
    WrongArity(usize),

    #[error("component {index} is not a number: {value:?}")]
    NotANumber { index: usize, value: String },

    #[error("component {index} is not finite")]
    NotFinite { index: usize },
}

impl Extent {
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Build from a slice as found in remote documents. Anything other than four
    /// finite components yields `None`.
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        match values {
            [a, b, c, d] if values.iter().all(|v| v.is_finite()) => {
                Some(Self::new(*a, *b, *c, *d))
            }
            _ => None,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.as_array().iter().all(|v| v.is_finite())
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.min_x, self.min_y, self.max_x, self.max_y]
    }

    /// WFS `BBOX` value, or `None` when the extent is degenerate.
    ///
    /// A zero first component means "no spatial filter".
    pub fn bbox_param(&self) -> Option<String> {
        if self.min_x == 0.0 {
            return None;
        }
        Some(format!(
            "{:.6},{:.6},{:.6},{:.6}",
            self.min_x, self.min_y, self.max_x, self.max_y
        ))
    }
}

impl From<[f64; 4]> for Extent {
    fn from(v: [f64; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<Extent> for [f64; 4] {
    fn from(e: Extent) -> Self {
        e.as_array()
    }
}

impl FromStr for Extent {
    type Err = ExtentParseError;

    /// Parse `minX,minY,maxX,maxY`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(ExtentParseError::WrongArity(parts.len()));
        }

        let mut values = [0.0f64; 4];
        for (index, part) in parts.iter().enumerate() {
            let value: f64 = part.parse().map_err(|_| ExtentParseError::NotANumber {
                index,
                value: part.to_string(),
            })?;
            if !value.is_finite() {
                return Err(ExtentParseError::NotFinite { index });
            }
            values[index] = value;
        }

        Ok(values.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_bbox() {
        let extent: Extent = "1.5,2,3.25,4".parse().unwrap();
        assert_eq!(extent, Extent::new(1.5, 2.0, 3.25, 4.0));
    }

    #[test]
    fn parse_tolerates_whitespace_and_exponents() {
        let extent: Extent = " 2.6e6 , 6.5e6, 2.7e6 ,6.6e6 ".parse().unwrap();
        assert_eq!(extent, Extent::new(2.6e6, 6.5e6, 2.7e6, 6.6e6));
    }

    #[test]
    fn parse_rejects_wrong_arity() {
        assert_eq!(
            "1,2,3".parse::<Extent>(),
            Err(ExtentParseError::WrongArity(3))
        );
        assert_eq!("".parse::<Extent>(), Err(ExtentParseError::WrongArity(1)));
    }

    #[test]
    fn parse_rejects_garbage_and_non_finite() {
        assert!(matches!(
            "1,two,3,4".parse::<Extent>(),
            Err(ExtentParseError::NotANumber { index: 1, .. })
        ));
        assert_eq!(
            "1,2,inf,4".parse::<Extent>(),
            Err(ExtentParseError::NotFinite { index: 2 })
        );
    }

    #[test]
    fn bbox_param_skipped_when_first_component_is_zero() {
        assert_eq!(Extent::new(0.0, 1.0, 2.0, 3.0).bbox_param(), None);
        assert_eq!(
            Extent::new(1.0, 2.0, 3.0, 4.5).bbox_param().as_deref(),
            Some("1.000000,2.000000,3.000000,4.500000")
        );
    }

    #[test]
    fn is_finite_checks_every_component() {
        assert!(Extent::new(1.0, 2.0, 3.0, 4.0).is_finite());
        assert!(!Extent::new(f64::NAN, 2.0, 3.0, 4.0).is_finite());
        assert!(!Extent::new(1.0, 2.0, 3.0, f64::NEG_INFINITY).is_finite());
    }

    #[test]
    fn from_slice_requires_four_components() {
        assert_eq!(
            Extent::from_slice(&[1.0, 2.0, 3.0, 4.0]),
            Some(Extent::new(1.0, 2.0, 3.0, 4.0))
        );
        assert_eq!(Extent::from_slice(&[1.0, 2.0]), None);
        assert_eq!(Extent::from_slice(&[]), None);
    }
}
