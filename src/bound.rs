use crate::interval::FlightInterval;

/// Minimum bounding range `[low, high]` of a subtree.
///
/// An empty bound is `[+inf, -inf]`, so the first `extend` turns it into a real range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bound {
    /// Low value
    low: f64,
    /// High value
    high: f64,
}

/// Anything that occupies a range on the time axis.
pub(crate) trait Bounded {
    fn bound(&self) -> Bound;
}

impl Bounded for FlightInterval {
    #[inline]
    fn bound(&self) -> Bound {
        Bound {
            low: self.start,
            high: self.end(),
        }
    }
}

impl Bounded for Bound {
    #[inline]
    fn bound(&self) -> Bound {
        *self
    }
}

impl Bound {
    /// The empty bound, covering nothing
    pub const EMPTY: Self = Self {
        low: f64::INFINITY,
        high: f64::NEG_INFINITY,
    };

    /// Low value
    #[inline]
    #[must_use]
    pub fn low(&self) -> f64 {
        self.low
    }

    /// High value
    #[inline]
    #[must_use]
    pub fn high(&self) -> f64 {
        self.high
    }

    /// Returns `true` if nothing has been absorbed since the bound was last reset
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.low > self.high
    }

    /// Length of the range, 0 for an empty bound
    #[inline]
    #[must_use]
    pub fn len(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.high - self.low
        }
    }

    /// Checks if `t` lies in `[low, high]`
    #[inline]
    #[must_use]
    pub fn contains(&self, t: f64) -> bool {
        self.low <= t && t <= self.high
    }

    /// Widen the range to also cover `other`.
    pub(crate) fn extend(&mut self, other: Bound) {
        self.low = self.low.min(other.low);
        self.high = self.high.max(other.high);
    }

    /// The tightest bound covering every item, `EMPTY` for no items.
    pub(crate) fn covering<'a, B, I>(items: I) -> Bound
    where
        B: Bounded + 'a,
        I: IntoIterator<Item = &'a B>,
    {
        items.into_iter().fold(Bound::EMPTY, |mut acc, item| {
            acc.extend(item.bound());
            acc
        })
    }

    /// How much the range has to grow to also cover `record`.
    pub(crate) fn enlargement(&self, record: &FlightInterval) -> f64 {
        let grown = record.end().max(self.high) - record.start.min(self.low);
        grown - (self.high - self.low)
    }
}

impl Default for Bound {
    #[inline]
    fn default() -> Self {
        Self::EMPTY
    }
}
