//! Shared primitive types used across the dashboard.

use crate::error::{DeskError, DeskResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A stable, unique identifier for any stored entity (UUID text).
pub type EntityId = String;

/// Calendar month, 1..=12. Kept as a plain integer to match the procedure signatures.
pub type Month = i32;

pub type Year = i32;

/// A reporting month. Ordered chronologically (year first, then month).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    pub year:  Year,
    pub month: Month,
}

impl Period {
    pub fn new(month: Month, year: Year) -> DeskResult<Self> {
        if !(1..=12).contains(&month) || year < 1 {
            return Err(DeskError::InvalidPeriod { month, year });
        }
        Ok(Self { year, month })
    }

    /// The month after this one, rolling December into January.
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_months() {
        assert!(Period::new(0, 2024).is_err());
        assert!(Period::new(13, 2024).is_err());
        assert!(Period::new(12, 2024).is_ok());
    }

    #[test]
    fn next_rolls_over_the_year() {
        let dec = Period::new(12, 2024).unwrap();
        assert_eq!(dec.next(), Period::new(1, 2025).unwrap());
        assert!(dec < dec.next());
        assert_eq!(dec.to_string(), "2024-12");
    }
}
