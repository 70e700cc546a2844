pub use crate::config::*;

use std::collections::HashSet;

/// A builder for creating polls.
///
/// A poll needs a title and at least two counters. The counts start at zero and
/// can be set once the counters are declared.
///
/// ```
/// pub use poll_statistics::builder::Builder;
/// # use poll_statistics::StatsErrors;
///
/// let mut builder = Builder::new("Lunch")?
///     .description("Where do we go?")
///     .counters(&["Pizza".to_string(), "Sushi".to_string()])?;
///
/// builder.count("Pizza", 2)?;
/// builder.count("Sushi", 1)?;
///
/// let stats = poll_statistics::run_poll_stats(&builder.build())?;
/// assert_eq!(stats.counters[0].percent.to_string(), "66.67");
///
/// # Ok::<(), StatsErrors>(())
/// ```
pub struct Builder {
    pub(crate) _title: String,
    pub(crate) _description: String,
    pub(crate) _counters: Vec<Counter>,
}

impl Builder {
    pub fn new(title: &str) -> Result<Builder, StatsErrors> {
        Ok(Builder {
            _title: title.to_string(),
            _description: String::new(),
            _counters: Vec::new(),
        })
    }

    pub fn description(self, description: &str) -> Builder {
        Builder {
            _description: description.to_string(),
            ..self
        }
    }

    /// Declares the counters of the poll, in display order.
    ///
    /// Replaces any counter previously declared.
    pub fn counters(self, names: &[String]) -> Result<Builder, StatsErrors> {
        if names.len() < 2 {
            return Err(StatsErrors::NotEnoughCounters(names.len()));
        }
        let mut seen: HashSet<&str> = HashSet::new();
        for name in names.iter() {
            if !seen.insert(name.as_str()) {
                return Err(StatsErrors::DuplicateCounter(name.clone()));
            }
        }
        Ok(Builder {
            _counters: names.iter().map(|name| Counter::new(name, 0)).collect(),
            ..self
        })
    }

    /// Sets the count of a declared counter.
    pub fn count(&mut self, name: &str, count: u64) -> Result<(), StatsErrors> {
        let counter = self
            ._counters
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| StatsErrors::UnknownCounter(name.to_string()))?;
        counter.count = count;
        Ok(())
    }

    /// Adds to the count of a declared counter.
    pub fn add_count(&mut self, name: &str, count: u64) -> Result<(), StatsErrors> {
        let counter = self
            ._counters
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| StatsErrors::UnknownCounter(name.to_string()))?;
        counter.count = counter
            .count
            .checked_add(count)
            .ok_or(StatsErrors::CountOverflow)?;
        Ok(())
    }

    pub fn build(self) -> Poll {
        Poll {
            title: self._title,
            description: self._description,
            counters: self._counters,
        }
    }
}
