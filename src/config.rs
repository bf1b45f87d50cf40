//! Configuration of a `FlightRTree`.

use crate::error::{Error, Result};

/// Fanout of the reference configuration.
pub const DEFAULT_MAX_ENTRIES: usize = 2;

/// Smallest fanout a tree can be built with. A new root always holds two children.
pub const MIN_MAX_ENTRIES: usize = 2;

/// Tree configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawConfig"))]
pub struct Config {
    /// Maximum number of entries in a leaf or children in an internal node.
    /// A node holding more is split.
    max_entries: usize,
}

impl Config {
    /// Create a new `Config`
    ///
    /// # Example
    /// ```rust
    /// use flight_rtree::Config;
    ///
    /// assert_eq!(Config::new(8).unwrap().max_entries(), 8);
    /// assert!(Config::new(1).is_err());
    /// ```
    #[inline]
    pub fn new(max_entries: usize) -> Result<Self> {
        if max_entries < MIN_MAX_ENTRIES {
            return Err(Error::InvalidConfig(format!(
                "max_entries must be at least {MIN_MAX_ENTRIES}, got {max_entries}"
            )));
        }
        Ok(Self { max_entries })
    }

    /// Maximum fanout of a node
    #[inline]
    #[must_use]
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }
}

/// Unchecked form of `Config`, deserialized first and then validated by `Config::new`.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawConfig {
    max_entries: usize,
}

#[cfg(feature = "serde")]
impl TryFrom<RawConfig> for Config {
    type Error = Error;

    fn try_from(raw: RawConfig) -> Result<Self> {
        Config::new(raw.max_entries)
    }
}

impl Default for Config {
    #[inline]
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}
