//! The `FlightInterval` stored in `FlightRTree` and represents the closed interval [start, start + span]
//!
//! A flight is airborne at time `t` when `start <= t <= start + span`, so both the take-off and the
//! landing instant count as airborne.
//!
//! A span must be finite and non-negative. A zero span is a point interval.

use crate::error::{Error, Result};

/// A flight record: identifier, start time and time in the air.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub struct FlightInterval {
    /// Flight identifier
    pub id: String,
    /// Start coordinate, e.g. a unix timestamp
    pub start: f64,
    /// Time in the air
    pub span: f64,
}

impl FlightInterval {
    /// Create a new `FlightInterval`
    ///
    /// # Panics
    ///
    /// This method panics when start, span or end is not finite, or span < 0
    #[inline]
    pub fn new(id: impl Into<String>, start: f64, span: f64) -> Self {
        match Self::try_new(id, start, span) {
            Ok(interval) => interval,
            Err(_) => panic!("invalid interval"),
        }
    }

    /// Create a new `FlightInterval`, rejecting non-finite coordinates or end and negative spans.
    ///
    /// # Example
    /// ```rust
    /// use flight_rtree::FlightInterval;
    ///
    /// assert!(FlightInterval::try_new("AA1", 100.0, 50.0).is_ok());
    /// assert!(FlightInterval::try_new("AA1", 100.0, -1.0).is_err());
    /// assert!(FlightInterval::try_new("AA1", f64::NAN, 1.0).is_err());
    /// assert!(FlightInterval::try_new("AA1", f64::MAX, f64::MAX).is_err());
    /// ```
    #[inline]
    pub fn try_new(id: impl Into<String>, start: f64, span: f64) -> Result<Self> {
        let interval = Self {
            id: id.into(),
            start,
            span,
        };
        interval.validate()?;
        Ok(interval)
    }

    /// Checks that start, span and end are finite and the span is not negative.
    #[inline]
    pub fn validate(&self) -> Result<()> {
        let finite = self.start.is_finite() && self.span.is_finite() && self.end().is_finite();
        if !finite || self.span < 0.0 {
            return Err(Error::InvalidInterval {
                id: self.id.clone(),
                start: self.start,
                span: self.span,
            });
        }
        Ok(())
    }

    /// End coordinate, `start + span`
    #[inline]
    #[must_use]
    pub fn end(&self) -> f64 {
        self.start + self.span
    }

    /// Checks if the flight is airborne at `t`
    #[inline]
    #[must_use]
    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t <= self.end()
    }
}
