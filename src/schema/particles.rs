//! Occurrence constraints
//!
//! This module implements the cardinality model shared by element
//! declarations and bounded sequences: `minOccurs`, `maxOccurs` and the
//! `unbounded` marker.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Upper occurrence bound: a count or `unbounded`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaxOccurs {
    /// At most this many occurrences
    Bounded(u32),
    /// No upper bound
    Unbounded,
}

/// The `unbounded` upper bound
pub const UNBOUNDED: MaxOccurs = MaxOccurs::Unbounded;

impl MaxOccurs {
    /// Check if there is no upper bound
    pub fn is_unbounded(&self) -> bool {
        matches!(self, MaxOccurs::Unbounded)
    }

    /// Check if `count` occurrences are within the bound
    pub fn admits(&self, count: usize) -> bool {
        match self {
            MaxOccurs::Bounded(max) => count <= *max as usize,
            MaxOccurs::Unbounded => true,
        }
    }

    /// Check if the bound allows more than one occurrence
    pub fn is_multiple(&self) -> bool {
        match self {
            MaxOccurs::Bounded(max) => *max > 1,
            MaxOccurs::Unbounded => true,
        }
    }
}

impl Default for MaxOccurs {
    fn default() -> Self {
        MaxOccurs::Bounded(1)
    }
}

impl From<u32> for MaxOccurs {
    fn from(max: u32) -> Self {
        MaxOccurs::Bounded(max)
    }
}

impl TryFrom<i64> for MaxOccurs {
    type Error = Error;

    fn try_from(max: i64) -> Result<Self> {
        u32::try_from(max).map(MaxOccurs::Bounded).map_err(|_| {
            Error::Declaration(format!(
                "maximum length must be 'unbounded' or a non-negative integer, got {}",
                max
            ))
        })
    }
}

impl FromStr for MaxOccurs {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s == "unbounded" {
            return Ok(MaxOccurs::Unbounded);
        }
        s.parse::<u32>().map(MaxOccurs::Bounded).map_err(|_| {
            Error::Declaration(format!(
                "maximum length must be 'unbounded' or a non-negative integer, got '{}'",
                s
            ))
        })
    }
}

impl fmt::Display for MaxOccurs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaxOccurs::Bounded(max) => write!(f, "{}", max),
            MaxOccurs::Unbounded => write!(f, "unbounded"),
        }
    }
}

/// Occurrence bounds for a component (minOccurs, maxOccurs)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurs {
    /// Minimum number of occurrences (default 1)
    pub min: u32,
    /// Maximum number of occurrences (default 1)
    pub max: MaxOccurs,
}

impl Occurs {
    /// Create new occurrence bounds
    pub fn new(min: u32, max: MaxOccurs) -> Self {
        Self { min, max }
    }

    /// Default occurrence (1, 1)
    pub fn once() -> Self {
        Self::new(1, MaxOccurs::Bounded(1))
    }

    /// Optional occurrence (0, 1)
    pub fn optional() -> Self {
        Self::new(0, MaxOccurs::Bounded(1))
    }

    /// Zero or more (0, unbounded)
    pub fn zero_or_more() -> Self {
        Self::new(0, MaxOccurs::Unbounded)
    }

    /// One or more (1, unbounded)
    pub fn one_or_more() -> Self {
        Self::new(1, MaxOccurs::Unbounded)
    }

    /// Check if the component can be omitted (minOccurs == 0)
    pub fn is_emptiable(&self) -> bool {
        self.min == 0
    }

    /// Check if the component has maxOccurs == 1
    pub fn is_single(&self) -> bool {
        self.max == MaxOccurs::Bounded(1)
    }

    /// Check if the component can have multiple occurrences
    pub fn is_multiple(&self) -> bool {
        self.max.is_multiple()
    }

    /// Check if occurrence count is under the minimum
    pub fn is_missing(&self, count: usize) -> bool {
        count < self.min as usize
    }

    /// Check if occurrence count is at or over the maximum
    pub fn is_over(&self, count: usize) -> bool {
        match self.max {
            MaxOccurs::Bounded(max) => count >= max as usize,
            MaxOccurs::Unbounded => false,
        }
    }

    /// Check the bounds of a component declaration
    pub fn validate(&self) -> Result<()> {
        match self.max {
            MaxOccurs::Bounded(0) => Err(Error::Declaration(
                "maxOccurs must be 'unbounded' or at least 1".to_string(),
            )),
            MaxOccurs::Bounded(max) if self.min > max => Err(Error::Declaration(format!(
                "minOccurs ({}) must be lesser or equal than maxOccurs ({})",
                self.min, max
            ))),
            _ => Ok(()),
        }
    }
}

impl Default for Occurs {
    fn default() -> Self {
        Self::once()
    }
}

/// Parse minOccurs/maxOccurs from their lexical forms
pub fn parse_occurs(min_occurs: Option<&str>, max_occurs: Option<&str>) -> Result<Occurs> {
    let mut occurs = Occurs::once();

    if let Some(min_str) = min_occurs {
        occurs.min = min_str.trim().parse::<u32>().map_err(|_| {
            Error::Declaration("minOccurs value is not a valid non-negative integer".to_string())
        })?;
    }

    if let Some(max_str) = max_occurs {
        occurs.max = max_str.parse()?;
    }

    occurs.validate()?;
    Ok(occurs)
}

/// Trait for declarations that carry occurrence constraints
pub trait Particle {
    /// Get the occurrence bounds
    fn occurs(&self) -> Occurs;

    /// Get minimum occurrences
    fn min_occurs(&self) -> u32 {
        self.occurs().min
    }

    /// Get maximum occurrences
    fn max_occurs(&self) -> MaxOccurs {
        self.occurs().max
    }

    /// Check if this particle can be omitted
    fn is_emptiable(&self) -> bool {
        self.occurs().is_emptiable()
    }

    /// Check if this particle can have multiple occurrences
    fn is_multiple(&self) -> bool {
        self.occurs().is_multiple()
    }
}
