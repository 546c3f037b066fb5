//! Version ordinal keys for jar tie-breaking
//!
//! A [`VersionKey`] folds every digit run of a version string into one
//! ordinal: `sum(run[i] * 10^(N - i - 1))` where `N` is the number of runs in
//! that string. Run counts are never normalized between two keys, so
//! `"2.3"` (23) and `"2.3.0"` (230) do not compare the way semver would.
//! Downstream manifests depend on this exact ordering.

use std::cmp::Ordering;
use std::fmt;

/// Comparable key derived from a raw version string
#[derive(Debug, Clone)]
pub struct VersionKey {
    raw: String,
    ordinal: u128,
}

impl VersionKey {
    /// Build a key from a raw version string. Never fails.
    pub fn parse(raw: &str) -> Self {
        let runs = digit_runs(raw);
        let count = runs.len();

        let ordinal = runs
            .iter()
            .enumerate()
            .fold(0u128, |acc, (i, run)| {
                let weight = 10u128
                    .checked_pow((count - i - 1) as u32)
                    .unwrap_or(u128::MAX);
                acc.saturating_add(run.saturating_mul(weight))
            });

        Self {
            raw: raw.to_string(),
            ordinal,
        }
    }

    /// Ordinal value used for comparison
    pub fn ordinal(&self) -> u128 {
        self.ordinal
    }

    /// Original version string
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// Maximal runs of ASCII digits, in order. Runs too large for `u128` saturate.
fn digit_runs(raw: &str) -> Vec<u128> {
    raw.split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .map(|run| run.parse::<u128>().unwrap_or(u128::MAX))
        .collect()
}

impl Ord for VersionKey {
    fn cmp(&self, other: &Self) -> Ordering {
        // Equal ordinals: the longer raw string is the older one.
        self.ordinal
            .cmp(&other.ordinal)
            .then_with(|| other.raw.len().cmp(&self.raw.len()))
    }
}

impl PartialOrd for VersionKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for VersionKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for VersionKey {}

impl fmt::Display for VersionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
