mod config;
use log::{debug, info, warn};

pub mod builder;
pub mod manual;

pub use crate::config::*;

/// Sets the percentage of a counter with respect to the given total.
///
/// The name and the count are left untouched. The total is not checked against
/// the count: a count larger than the total gives a percentage above 100.
pub fn compute_percent(counter: Counter, total: u64) -> Result<Counter, StatsErrors> {
    let percent = Percent::of(counter.count, total)?;
    Ok(Counter { percent, ..counter })
}

/// Corrects the percentages so that they add up to exactly 100.
///
/// The rounding excess (positive or negative) is given to:
/// - the counter with the highest percentage, if there is only one;
/// - otherwise the first counter, in the order given, that has the lowest
///   percentage.
///
/// If all the counters share the same percentage, none of them is preferred
/// over the others and the percentages are left as they are.
pub fn resolve_excess(counters: &mut [Counter]) -> Result<ExcessResolution, StatsErrors> {
    let highest = counters
        .iter()
        .map(|c| c.percent)
        .max()
        .ok_or(StatsErrors::EmptyPoll)?;
    let total_percent = Percent::try_sum(counters.iter().map(|c| c.percent))?;
    if total_percent == Percent::HUNDRED {
        return Ok(ExcessResolution::Balanced);
    }

    let excess = Percent::HUNDRED
        .checked_sub(total_percent)
        .ok_or(StatsErrors::PercentOverflow)?;
    let num_highest = counters.iter().filter(|c| c.percent == highest).count();
    debug!(
        "resolve_excess: total: {} excess: {} highest: {} ({} counters)",
        total_percent, excess, highest, num_highest
    );

    if num_highest == counters.len() {
        warn!(
            "resolve_excess: all {} counters are tied at {}, leaving an excess of {}",
            num_highest, highest, excess
        );
        return Ok(ExcessResolution::Unresolved { excess });
    }

    let target = if num_highest == 1 {
        highest
    } else {
        counters
            .iter()
            .map(|c| c.percent)
            .min()
            .ok_or(StatsErrors::EmptyPoll)?
    };
    // The first one in the input order.
    let (index, counter) = counters
        .iter_mut()
        .enumerate()
        .find(|(_, c)| c.percent == target)
        .ok_or(StatsErrors::EmptyPoll)?;
    counter.percent = counter
        .percent
        .checked_add(excess)
        .ok_or(StatsErrors::PercentOverflow)?;
    debug!(
        "resolve_excess: {:?} now at {}",
        counter.name, counter.percent
    );

    if num_highest == 1 {
        Ok(ExcessResolution::AddedToHighest { index, excess })
    } else {
        Ok(ExcessResolution::AddedToLowest { index, excess })
    }
}

/// Same as [resolve_excess], but leaves the input alone and returns the
/// corrected counters.
pub fn resolved(counters: &[Counter]) -> Result<(Vec<Counter>, ExcessResolution), StatsErrors> {
    let mut res = counters.to_vec();
    let resolution = resolve_excess(&mut res)?;
    Ok((res, resolution))
}

/// Computes the percentages of the counters against a total provided by the
/// caller and corrects the rounding excess.
///
/// The counters are returned in the same order.
pub fn compute_statistics(
    counters: &[Counter],
    total: u64,
) -> Result<(Vec<Counter>, ExcessResolution), StatsErrors> {
    if counters.is_empty() {
        return Err(StatsErrors::EmptyPoll);
    }
    let mut res: Vec<Counter> = Vec::with_capacity(counters.len());
    for c in counters.iter() {
        let with_percent = compute_percent(c.clone(), total)?;
        debug!(
            "compute_statistics: {:?}: {} / {} -> {}",
            with_percent.name, with_percent.count, total, with_percent.percent
        );
        res.push(with_percent);
    }
    let resolution = resolve_excess(&mut res)?;
    Ok((res, resolution))
}

/// Runs the statistics for all the counters of a poll.
///
/// The total is the sum of all the counts.
pub fn run_poll_stats(poll: &Poll) -> Result<PollStatistics, StatsErrors> {
    info!(
        "Processing poll {:?} with {} counters",
        poll.title,
        poll.counters.len()
    );
    let total = poll
        .counters
        .iter()
        .try_fold(0u64, |acc, c| acc.checked_add(c.count))
        .ok_or(StatsErrors::CountOverflow)?;
    info!("Total count: {}", total);

    let (counters, resolution) = compute_statistics(&poll.counters, total)?;
    for c in counters.iter() {
        info!("{:>8} {:>7}% {}", c.count, c.percent, c.name);
    }
    info!("Excess resolution: {:?}", resolution);

    Ok(PollStatistics {
        title: poll.title.clone(),
        description: poll.description.clone(),
        total,
        counters,
        resolution,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: f64) -> Percent {
        Percent::from_f64(s).unwrap()
    }

    fn percents(counters: &[Counter]) -> Vec<Percent> {
        counters.iter().map(|c| c.percent).collect()
    }

    fn with_percents(values: &[f64]) -> Vec<Counter> {
        values
            .iter()
            .enumerate()
            .map(|(idx, v)| Counter::with_percent(&format!("counter {}", idx + 1), p(*v)))
            .collect()
    }

    #[test]
    fn compute_percent_keeps_name_and_count() {
        let c = compute_percent(Counter::new("Counter Name", 5), 5).unwrap();
        assert_eq!(c.name, "Counter Name");
        assert_eq!(c.count, 5);
        assert_eq!(c.percent, Percent::HUNDRED);
    }

    #[test]
    fn compute_percent_two_decimals() {
        for (count, total, expected) in [(5, 10, 50.0), (1, 3, 33.33), (2, 8, 25.0), (2, 3, 66.67)]
        {
            let c = compute_percent(Counter::new("a", count), total).unwrap();
            assert_eq!(c.percent, p(expected), "{} / {}", count, total);
        }
    }

    #[test]
    fn compute_percent_rounds_half_away_from_zero() {
        // 1 / 8 = 12.5% exactly, 1 / 16 = 6.25%, 1 / 32 = 3.125%
        assert_eq!(Percent::of(1, 32).unwrap().to_string(), "3.13");
        assert_eq!(Percent::of(1, 16).unwrap().to_string(), "6.25");
        // 1 / 160 = 0.625%
        assert_eq!(Percent::of(1, 160).unwrap().to_string(), "0.63");
        // 1 / 200000 = 0.0005%
        assert_eq!(Percent::of(1, 200_000).unwrap(), Percent::ZERO);
    }

    #[test]
    fn compute_percent_zero_total() {
        let res = compute_percent(Counter::new("a", 0), 0);
        assert_eq!(res, Err(StatsErrors::ZeroTotal));
    }

    #[test]
    fn compute_percent_is_not_capped() {
        let c = compute_percent(Counter::new("a", 3), 2).unwrap();
        assert_eq!(c.percent.to_string(), "150.00");
    }

    #[test]
    fn percent_from_f64() {
        assert_eq!(p(66.65).hundredths(), 6665);
        assert_eq!(p(-0.01).to_string(), "-0.01");
        assert_eq!(p(0.005).hundredths(), 1);
        assert_eq!(Percent::from_f64(f64::NAN), Err(StatsErrors::NotFinite));
        assert_eq!(Percent::from_f64(f64::INFINITY), Err(StatsErrors::NotFinite));
        // 2^63 hundredths does not fit in an i64.
        assert_eq!(
            Percent::from_f64(9_223_372_036_854_775_808.0 / 100.0),
            Err(StatsErrors::NotFinite)
        );
    }

    #[test]
    fn resolve_excess_all_counters_equal() {
        let mut counters = with_percents(&[33.33, 33.33, 33.33]);
        let res = resolve_excess(&mut counters).unwrap();
        assert_eq!(percents(&counters), vec![p(33.33), p(33.33), p(33.33)]);
        assert_eq!(res, ExcessResolution::Unresolved { excess: p(0.01) });
        assert!(!res.is_balanced());
    }

    #[test]
    fn resolve_excess_to_highest_counter() {
        for (initial, expected, lowest) in [
            (66.66, 66.67, 33.33),
            (66.65, 66.67, 33.33),
            (66.66, 66.68, 33.32),
        ] {
            let mut counters = with_percents(&[initial, lowest]);
            resolve_excess(&mut counters).unwrap();
            assert_eq!(percents(&counters), vec![p(expected), p(lowest)]);

            // The position does not matter.
            let mut counters = with_percents(&[lowest, initial]);
            let res = resolve_excess(&mut counters).unwrap();
            assert_eq!(percents(&counters), vec![p(lowest), p(expected)]);
            assert!(matches!(
                res,
                ExcessResolution::AddedToHighest { index: 1, .. }
            ));
        }
    }

    #[test]
    fn resolve_excess_removes_from_highest_counter() {
        let mut counters = with_percents(&[66.68, 33.33]);
        let res = resolve_excess(&mut counters).unwrap();
        assert_eq!(percents(&counters), vec![p(66.67), p(33.33)]);
        assert_eq!(
            res,
            ExcessResolution::AddedToHighest {
                index: 0,
                excess: p(-0.01)
            }
        );
    }

    #[test]
    fn resolve_excess_to_lowest_when_several_highest() {
        for (initial, expected, highest) in [(11.11, 11.12, 44.44), (11.10, 11.12, 44.44)] {
            let mut counters = with_percents(&[highest, highest, initial]);
            let res = resolve_excess(&mut counters).unwrap();
            assert_eq!(percents(&counters), vec![p(highest), p(highest), p(expected)]);
            assert!(matches!(res, ExcessResolution::AddedToLowest { index: 2, .. }));
        }
    }

    #[test]
    fn resolve_excess_no_change_at_100() {
        let mut counters = vec![
            Counter {
                name: "a".to_string(),
                count: 4,
                percent: p(80.0),
            },
            Counter {
                name: "b".to_string(),
                count: 1,
                percent: p(20.0),
            },
        ];
        let res = resolve_excess(&mut counters).unwrap();
        assert_eq!(res, ExcessResolution::Balanced);
        assert_eq!(percents(&counters), vec![p(80.0), p(20.0)]);
    }

    #[test]
    fn resolve_excess_is_idempotent() {
        let mut counters = with_percents(&[66.66, 33.33]);
        resolve_excess(&mut counters).unwrap();
        let once = counters.clone();
        let res = resolve_excess(&mut counters).unwrap();
        assert_eq!(res, ExcessResolution::Balanced);
        assert_eq!(once, counters);
    }

    #[test]
    fn resolve_excess_first_lowest_in_input_order() {
        let mut counters = vec![
            Counter::with_percent("a", p(33.33)),
            Counter::with_percent("b", p(33.33)),
            Counter::with_percent("c", p(16.66)),
            Counter::with_percent("d", p(16.66)),
        ];
        resolve_excess(&mut counters).unwrap();
        assert_eq!(counters[2].name, "c");
        assert_eq!(counters[2].percent, p(16.68));
        assert_eq!(counters[3].percent, p(16.66));

        let mut swapped = vec![
            Counter::with_percent("a", p(33.33)),
            Counter::with_percent("b", p(33.33)),
            Counter::with_percent("d", p(16.66)),
            Counter::with_percent("c", p(16.66)),
        ];
        resolve_excess(&mut swapped).unwrap();
        assert_eq!(swapped[2].name, "d");
        assert_eq!(swapped[2].percent, p(16.68));
        assert_eq!(swapped[3].percent, p(16.66));
        assert_eq!(percents(&counters), percents(&swapped));
    }

    #[test]
    fn resolve_excess_percent_overflow() {
        let mut counters = vec![
            Counter::with_percent("a", Percent::from_hundredths(i64::MAX)),
            Counter::with_percent("b", Percent::from_hundredths(1)),
        ];
        assert_eq!(
            resolve_excess(&mut counters),
            Err(StatsErrors::PercentOverflow)
        );

        // The sum fits, but not the excess.
        let mut counters = vec![
            Counter::with_percent("a", Percent::from_hundredths(i64::MIN)),
            Counter::with_percent("b", Percent::from_hundredths(1)),
        ];
        assert_eq!(
            resolve_excess(&mut counters),
            Err(StatsErrors::PercentOverflow)
        );
    }

    #[test]
    fn resolve_excess_empty() {
        let mut counters: Vec<Counter> = vec![];
        assert_eq!(resolve_excess(&mut counters), Err(StatsErrors::EmptyPoll));
    }

    #[test]
    fn resolved_leaves_input_alone() {
        let counters = with_percents(&[66.66, 33.33]);
        let (res, resolution) = resolved(&counters).unwrap();
        assert_eq!(percents(&counters), vec![p(66.66), p(33.33)]);
        assert_eq!(percents(&res), vec![p(66.67), p(33.33)]);
        assert!(resolution.is_balanced());
    }

    #[test]
    fn statistics_always_add_up_to_100() {
        let _ = env_logger::builder().is_test(true).try_init();
        for a in 0..8u64 {
            for b in 0..8u64 {
                for c in 0..8u64 {
                    if a + b + c == 0 {
                        continue;
                    }
                    let counters = vec![
                        Counter::new("a", a),
                        Counter::new("b", b),
                        Counter::new("c", c),
                    ];
                    let (res, resolution) = compute_statistics(&counters, a + b + c).unwrap();
                    let sum = Percent::try_sum(res.iter().map(|c| c.percent)).unwrap();
                    let all_tied = a == b && b == c;
                    assert_eq!(all_tied, !resolution.is_balanced(), "{} {} {}", a, b, c);
                    if !all_tied {
                        assert_eq!(sum, Percent::HUNDRED, "{} {} {}", a, b, c);
                    }
                }
            }
        }
    }

    #[test]
    fn run_poll_stats_simple() {
        let _ = env_logger::builder().is_test(true).try_init();
        let poll = Poll {
            title: "title".to_string(),
            description: "description".to_string(),
            counters: vec![Counter::new("Alice", 2), Counter::new("Bob", 1)],
        };
        let stats = run_poll_stats(&poll).unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.title, "title");
        assert_eq!(stats.counters[0].percent, p(66.67));
        assert_eq!(stats.counters[1].percent, p(33.33));
        assert_eq!(stats.resolution, ExcessResolution::Balanced);
    }

    #[test]
    fn run_poll_stats_no_votes() {
        let poll = Poll {
            counters: vec![Counter::new("Alice", 0), Counter::new("Bob", 0)],
            ..Poll::default()
        };
        assert_eq!(run_poll_stats(&poll), Err(StatsErrors::ZeroTotal));
    }

    #[test]
    fn run_poll_stats_count_overflow() {
        let poll = Poll {
            counters: vec![Counter::new("Alice", u64::MAX), Counter::new("Bob", 1)],
            ..Poll::default()
        };
        assert_eq!(run_poll_stats(&poll), Err(StatsErrors::CountOverflow));
    }

    #[test]
    fn run_poll_stats_empty() {
        assert_eq!(
            run_poll_stats(&Poll::default()),
            Err(StatsErrors::EmptyPoll)
        );
    }
}
