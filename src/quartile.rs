//! Quartile conventions.
//!
//! Every method works on an ascending slice and picks positions that are
//! monotone in the quartile, so Q1 ≤ Q3 holds for any of them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// How Q1 and Q3 are derived from the sorted sample.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuartileMethod {
    /// Odd n drops the median element, then each half's median is taken.
    #[default]
    ExclusiveHalves,

    /// Odd n keeps the median element in both halves; even n splits like `ExclusiveHalves`.
    InclusiveHalves,

    /// Ranks (n+1)/4 and 3(n+1)/4, linear interpolation between neighbours.
    LinearInterpolation,

    /// Same ranks as `LinearInterpolation`, a fractional rank takes the mean of both neighbours.
    RankMidpoint,

    /// Positions 0.25·(n-1) and 0.75·(n-1), linear interpolation.
    Percentile,
}

impl QuartileMethod {
    pub const ALL: [QuartileMethod; 5] = [
        QuartileMethod::ExclusiveHalves,
        QuartileMethod::InclusiveHalves,
        QuartileMethod::LinearInterpolation,
        QuartileMethod::RankMidpoint,
        QuartileMethod::Percentile,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            QuartileMethod::ExclusiveHalves => "exclusive-halves",
            QuartileMethod::InclusiveHalves => "inclusive-halves",
            QuartileMethod::LinearInterpolation => "linear-interpolation",
            QuartileMethod::RankMidpoint => "rank-midpoint",
            QuartileMethod::Percentile => "percentile",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            QuartileMethod::ExclusiveHalves => "Median of each half, median excluded",
            QuartileMethod::InclusiveHalves => "Median of each half, median included",
            QuartileMethod::LinearInterpolation => "Rank (n+1)/4 with linear interpolation",
            QuartileMethod::RankMidpoint => "Rank (n+1)/4, midpoint of neighbours",
            QuartileMethod::Percentile => "Position p(n-1) with linear interpolation",
        }
    }

    /// Q1 and Q3 of an ascending, non-empty slice.
    pub fn quartiles(&self, sorted: &[f64]) -> Result<(f64, f64), Error> {
        if sorted.is_empty() {
            return Err(Error::InvalidInput("quartiles of an empty sequence".to_owned()));
        }

        match self {
            QuartileMethod::ExclusiveHalves | QuartileMethod::InclusiveHalves => {
                let (lower, upper) = self.halves(sorted);
                debug_assert!(!lower.is_empty() && !upper.is_empty());
                Ok((median_of_sorted(lower)?, median_of_sorted(upper)?))
            }
            QuartileMethod::LinearInterpolation => Ok((
                value_at(sorted, rank_position(sorted.len(), 1), Bracket::Interpolate),
                value_at(sorted, rank_position(sorted.len(), 3), Bracket::Interpolate),
            )),
            QuartileMethod::RankMidpoint => Ok((
                value_at(sorted, rank_position(sorted.len(), 1), Bracket::Midpoint),
                value_at(sorted, rank_position(sorted.len(), 3), Bracket::Midpoint),
            )),
            QuartileMethod::Percentile => {
                let last = (sorted.len() - 1) as f64;
                Ok((
                    value_at(sorted, 0.25 * last, Bracket::Interpolate),
                    value_at(sorted, 0.75 * last, Bracket::Interpolate),
                ))
            }
        }
    }

    /// Lower and upper halves for the halves-based methods.
    ///
    /// Rank-based methods have no halves; both slices are the whole sample for them.
    pub fn halves<'a>(&self, sorted: &'a [f64]) -> (&'a [f64], &'a [f64]) {
        let len = sorted.len();
        let mid = len / 2;
        match self {
            _ if len < 2 => (sorted, sorted),
            QuartileMethod::ExclusiveHalves | QuartileMethod::InclusiveHalves if len % 2 == 0 => {
                (&sorted[..mid], &sorted[mid..])
            }
            QuartileMethod::ExclusiveHalves => (&sorted[..mid], &sorted[mid + 1..]),
            QuartileMethod::InclusiveHalves => (&sorted[..=mid], &sorted[mid..]),
            _ => (sorted, sorted),
        }
    }
}

impl fmt::Display for QuartileMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for QuartileMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase().replace('_', "-");
        QuartileMethod::ALL
            .iter()
            .find(|m| m.name() == s)
            .copied()
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "unknown quartile method '{}', expected one of: {}",
                    s,
                    QuartileMethod::ALL.map(|m| m.name()).join(", ")
                ))
            })
    }
}

/// Midpoint median: sorts a copy, odd length → middle element, even → mean of the two central ones.
pub fn compute_median(values: &[f64]) -> Result<f64, Error> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    median_of_sorted(&sorted)
}

pub(crate) fn median_of_sorted(sorted: &[f64]) -> Result<f64, Error> {
    let len = sorted.len();
    if len == 0 {
        return Err(Error::InvalidInput("median of an empty sequence".to_owned()));
    }
    let mid = len / 2;
    if len % 2 == 1 {
        Ok(sorted[mid])
    } else {
        Ok(midpoint(sorted[mid - 1], sorted[mid]))
    }
}

/// Mean of `lo <= hi` that stays finite near `f64::MAX` and never leaves `[lo, hi]`.
pub(crate) fn midpoint(lo: f64, hi: f64) -> f64 {
    let m = if lo.is_sign_negative() != hi.is_sign_negative() {
        (lo + hi) / 2.0
    } else {
        lo + (hi - lo) / 2.0
    };
    m.clamp(lo, hi)
}

// lo·(1 - t) + hi·t has no hi - lo term to overflow
fn lerp(lo: f64, hi: f64, t: f64) -> f64 {
    (lo * (1.0 - t) + hi * t).clamp(lo, hi)
}

#[derive(Clone, Copy)]
enum Bracket {
    Interpolate,
    Midpoint,
}

// 0-based position of the 1-based rank quarter·(n+1)/4
fn rank_position(len: usize, quarter: usize) -> f64 {
    (quarter * (len + 1)) as f64 / 4.0 - 1.0
}

fn value_at(sorted: &[f64], position: f64, bracket: Bracket) -> f64 {
    let last = sorted.len() - 1;
    let position = position.clamp(0.0, last as f64);

    if position.fract() == 0.0 {
        return sorted[position as usize];
    }

    let lo = sorted[position.floor() as usize];
    let hi = sorted[(position.ceil() as usize).min(last)];
    match bracket {
        Bracket::Interpolate => lerp(lo, hi, position.fract()),
        Bracket::Midpoint => midpoint(lo, hi),
    }
}
