// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// A percentage with exactly two decimal places.
///
/// It is stored as a whole number of hundredths so that sums and comparisons
/// against 100 are exact.
#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash, Default)]
pub struct Percent(i64);

impl Percent {
    pub const ZERO: Percent = Percent(0);
    pub const HUNDRED: Percent = Percent(100_00);

    pub const fn from_hundredths(hundredths: i64) -> Percent {
        Percent(hundredths)
    }

    pub const fn hundredths(&self) -> i64 {
        self.0
    }

    /// The share of `count` in `total`, rounded to two decimals, with halves
    /// rounded away from zero.
    ///
    /// ```
    /// # use poll_statistics::{Percent, StatsErrors};
    /// assert_eq!(Percent::of(1, 3)?.to_string(), "33.33");
    /// assert_eq!(Percent::of(2, 3)?.to_string(), "66.67");
    /// assert_eq!(Percent::of(1, 0), Err(StatsErrors::ZeroTotal));
    /// # Ok::<(), StatsErrors>(())
    /// ```
    pub fn of(count: u64, total: u64) -> Result<Percent, StatsErrors> {
        if total == 0 {
            return Err(StatsErrors::ZeroTotal);
        }
        // count * 100 / total in hundredths, plus half a unit before truncating.
        let num = 2 * (count as u128) * 100_00 + (total as u128);
        let den = 2 * (total as u128);
        i64::try_from(num / den)
            .map(Percent)
            .map_err(|_| StatsErrors::PercentOverflow)
    }

    /// Converts a floating point percentage, rounding it to two decimals.
    ///
    /// `f64::round` rounds halves away from zero.
    pub fn from_f64(value: f64) -> Result<Percent, StatsErrors> {
        let scaled = (value * 100.0).round();
        // i64::MAX as f64 rounds up to 2^63, which does not fit.
        if !scaled.is_finite() || scaled.abs() >= i64::MAX as f64 {
            return Err(StatsErrors::NotFinite);
        }
        Ok(Percent(scaled as i64))
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Display for Percent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        f.pad(&format!("{}{}.{:02}", sign, abs / 100, abs % 100))
    }
}

impl Percent {
    pub fn checked_add(self, rhs: Percent) -> Option<Percent> {
        self.0.checked_add(rhs.0).map(Percent)
    }

    pub fn checked_sub(self, rhs: Percent) -> Option<Percent> {
        self.0.checked_sub(rhs.0).map(Percent)
    }

    /// The sum of some percentages, or `PercentOverflow` if it does not fit.
    pub fn try_sum<I: IntoIterator<Item = Percent>>(iter: I) -> Result<Percent, StatsErrors> {
        iter.into_iter().try_fold(Percent::ZERO, |acc, p| {
            acc.checked_add(p).ok_or(StatsErrors::PercentOverflow)
        })
    }
}

/// A named tally in a poll.
///
/// The percentage is only meaningful once the statistics of the poll have been
/// computed.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Counter {
    pub name: String,
    pub count: u64,
    pub percent: Percent,
}

impl Counter {
    pub fn new(name: &str, count: u64) -> Counter {
        Counter {
            name: name.to_string(),
            count,
            percent: Percent::ZERO,
        }
    }

    /// A counter for which the percentage is already known.
    pub fn with_percent(name: &str, percent: Percent) -> Counter {
        Counter {
            name: name.to_string(),
            count: 0,
            percent,
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Poll {
    pub title: String,
    pub description: String,
    pub counters: Vec<Counter>,
}

// ******** Output data structures *********

/// What happened to the rounding excess of a poll.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ExcessResolution {
    /// The percentages already added up to 100.
    Balanced,
    /// A single counter had the highest percentage and took the excess.
    AddedToHighest { index: usize, excess: Percent },
    /// Several counters shared the highest percentage. The first counter with
    /// the lowest percentage took the excess.
    AddedToLowest { index: usize, excess: Percent },
    /// All the counters shared the highest percentage. Nothing was changed and
    /// the percentages do not add up to 100.
    Unresolved { excess: Percent },
}

impl ExcessResolution {
    pub fn is_balanced(&self) -> bool {
        !matches!(self, ExcessResolution::Unresolved { .. })
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PollStatistics {
    pub title: String,
    pub description: String,
    pub total: u64,
    pub counters: Vec<Counter>,
    pub resolution: ExcessResolution,
}

/// Errors that prevent the statistics from being computed.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum StatsErrors {
    /// The total is zero: no percentage can be computed.
    ZeroTotal,
    /// There is no counter to work with.
    EmptyPoll,
    /// The percentage does not fit in the representation.
    PercentOverflow,
    /// The counts add up to more than `u64::MAX`.
    CountOverflow,
    /// A percentage was given as NaN or infinity.
    NotFinite,
    /// A poll needs at least two counters.
    NotEnoughCounters(usize),
    DuplicateCounter(String),
    UnknownCounter(String),
}

impl Error for StatsErrors {}

impl Display for StatsErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsErrors::ZeroTotal => write!(f, "the total count is zero"),
            StatsErrors::EmptyPoll => write!(f, "the poll has no counters"),
            StatsErrors::PercentOverflow => write!(f, "the percentage is too large"),
            StatsErrors::CountOverflow => write!(f, "the counts are too large to be added up"),
            StatsErrors::NotFinite => write!(f, "the percentage is not a finite number"),
            StatsErrors::NotEnoughCounters(n) => {
                write!(f, "a poll needs at least 2 counters, got {}", n)
            }
            StatsErrors::DuplicateCounter(name) => write!(f, "duplicate counter {:?}", name),
            StatsErrors::UnknownCounter(name) => write!(f, "unknown counter {:?}", name),
        }
    }
}
