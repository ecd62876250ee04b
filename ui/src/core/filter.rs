//! Period selection state and the filtered view derived from it.

use std::collections::BTreeSet;

use super::dataset::MetricRecord;
use super::error::Result;
use super::period::Period;

/// Periods currently visible on the charts. Starts with every period selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    selected: BTreeSet<Period>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::all()
    }
}

impl FilterState {
    pub fn all() -> Self {
        Self {
            selected: Period::ALL.into_iter().collect(),
        }
    }

    pub fn none() -> Self {
        Self {
            selected: BTreeSet::new(),
        }
    }

    /// Flip membership of `period`. Calling twice restores the prior state.
    pub fn toggle(&mut self, period: Period) {
        if !self.selected.remove(&period) {
            self.selected.insert(period);
        }
    }

    /// Consuming form of [`FilterState::toggle`].
    pub fn toggled(mut self, period: Period) -> Self {
        self.toggle(period);
        self
    }

    /// Toggle by identifier. Unknown identifiers leave the state untouched.
    pub fn toggle_named(&mut self, identifier: &str) -> Result<Period> {
        let period: Period = identifier.parse()?;
        self.toggle(period);
        Ok(period)
    }

    pub fn contains(&self, period: Period) -> bool {
        self.selected.contains(&period)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.selected.len() == Period::COUNT
    }

    /// Selected periods in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = Period> + '_ {
        self.selected.iter().copied()
    }

    /// Records whose period is selected, in dataset order.
    pub fn apply(&self, dataset: &[MetricRecord]) -> Vec<MetricRecord> {
        dataset
            .iter()
            .filter(|record| self.contains(record.period))
            .copied()
            .collect()
    }
}
