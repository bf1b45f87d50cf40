//! Loading flights from a CSV source.
//!
//! The first line is a header and is skipped. Every other line holds three comma separated
//! fields: `timestamp,identifier,duration`. Blank lines are ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::interval::FlightInterval;
use crate::rtree::FlightRTree;

/// What to do with a malformed line
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadPolicy {
    /// Stop at the first malformed line and return its error
    #[default]
    Strict,
    /// Record the malformed line in the summary and carry on
    SkipMalformed,
}

/// The outcome of a load.
#[derive(Debug, Default)]
pub struct LoadSummary {
    /// Number of records inserted
    pub inserted: usize,
    /// Line number and error of every skipped line
    pub skipped: Vec<(usize, Error)>,
}

/// Parse one data line into a flight record. `line_no` is only used for error reporting.
///
/// # Example
/// ```rust
/// use flight_rtree::loader::parse_line;
///
/// let flight = parse_line("1700000000, UA100 ,3600", 2).unwrap();
/// assert_eq!(flight.id, "UA100");
/// assert_eq!(flight.start, 1_700_000_000.0);
/// assert_eq!(flight.span, 3600.0);
/// assert!(parse_line("1700000000,UA100", 3).is_err());
/// ```
pub fn parse_line(line: &str, line_no: usize) -> Result<FlightInterval> {
    let parse_err = |reason: String| Error::Parse {
        line: line_no,
        reason,
    };
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let [timestamp, id, duration] = fields[..] else {
        return Err(parse_err(format!(
            "expected 3 fields, found {}",
            fields.len()
        )));
    };
    if id.is_empty() {
        return Err(parse_err("empty flight identifier".to_string()));
    }
    let start: f64 = timestamp
        .parse()
        .map_err(|e| parse_err(format!("invalid timestamp {timestamp:?}: {e}")))?;
    let span: f64 = duration
        .parse()
        .map_err(|e| parse_err(format!("invalid duration {duration:?}: {e}")))?;
    FlightInterval::try_new(id, start, span).map_err(|e| parse_err(e.to_string()))
}

/// Insert every flight of a CSV source into `tree`.
///
/// Under `LoadPolicy::Strict` the records read before a malformed line stay in the tree.
/// A read failure is returned whatever the policy.
pub fn load_csv<R: BufRead>(
    tree: &mut FlightRTree,
    reader: R,
    policy: LoadPolicy,
) -> Result<LoadSummary> {
    let mut summary = LoadSummary::default();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = i + 1;
        // line 1 is the header
        if line_no == 1 || line.trim().is_empty() {
            continue;
        }
        match parse_line(&line, line_no) {
            Ok(record) => {
                tree.insert_record(record)?;
                summary.inserted += 1;
            }
            Err(e) if policy == LoadPolicy::SkipMalformed => {
                warn!("skipping {e}");
                summary.skipped.push((line_no, e));
            }
            Err(e) => return Err(e),
        }
    }
    debug!(
        "tree holds {} flights, height {}, bound [{}, {}]",
        tree.len(),
        tree.height(),
        tree.bound().low(),
        tree.bound().high()
    );
    Ok(summary)
}

impl FlightRTree {
    /// Insert every flight of the CSV file at `path`.
    pub fn load_from_path<P: AsRef<Path>>(
        &mut self,
        path: P,
        policy: LoadPolicy,
    ) -> Result<LoadSummary> {
        let path = path.as_ref();
        info!("loading flights from {}", path.display());
        let file = File::open(path)?;
        let summary = load_csv(self, BufReader::new(file), policy)?;
        info!(
            "loaded {} flights from {}, skipped {} lines",
            summary.inserted,
            path.display(),
            summary.skipped.len()
        );
        Ok(summary)
    }
}
