use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::models::{MealOption, Staple};

/// Tags recorded for the day currently being planned.
#[derive(Debug, Clone, Default)]
struct DayTags {
    pulses: Vec<String>,
    staples: BTreeSet<Staple>,
}

/// Repetition history threaded through one plan generation.
///
/// Staples are counted once per day they appear; variety buckets are counted
/// per selection; pulses are remembered per day, most recent day first.
#[derive(Debug, Clone, Default)]
pub struct RotationState {
    pulse_history: VecDeque<Vec<String>>,
    staple_days: BTreeMap<Staple, u32>,
    variety_counts: BTreeMap<String, u32>,
    today: DayTags,
    days_completed: u32,
}

impl RotationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pulses served on the most recently completed day.
    pub fn previous_day_pulses(&self) -> &[String] {
        self.pulse_history.front().map(Vec::as_slice).unwrap_or(&[])
    }

    /// All completed days' pulses, most recent day first.
    pub fn pulse_history(&self) -> impl Iterator<Item = &[String]> {
        self.pulse_history.iter().map(Vec::as_slice)
    }

    pub fn pulse_used_previous_day(&self, pulse: &str) -> bool {
        self.previous_day_pulses().iter().any(|p| p == pulse)
    }

    pub fn staple_days(&self, staple: Staple) -> u32 {
        self.staple_days.get(&staple).copied().unwrap_or(0)
    }

    /// True when using `staple` would add a day beyond `cap`.
    ///
    /// A staple already served today can be served again without cost.
    pub fn staple_at_cap(&self, staple: Staple, cap: u32) -> bool {
        !self.today.staples.contains(&staple) && self.staple_days(staple) >= cap
    }

    pub fn variety_count(&self, bucket: &str) -> u32 {
        self.variety_counts.get(bucket).copied().unwrap_or(0)
    }

    pub fn variety_at_cap(&self, bucket: &str, cap: u32) -> bool {
        self.variety_count(bucket) >= cap
    }

    pub fn is_unused_bucket(&self, bucket: &str) -> bool {
        self.variety_count(bucket) == 0
    }

    /// Record the tags of a selected option against the current day.
    pub fn record(&mut self, option: &MealOption) {
        if let Some(pulse) = &option.pulse {
            self.today.pulses.push(pulse.clone());
        }
        if let Some(staple) = option.staple {
            if self.today.staples.insert(staple) {
                *self.staple_days.entry(staple).or_insert(0) += 1;
            }
        }
        *self
            .variety_counts
            .entry(option.variety_bucket.clone())
            .or_insert(0) += 1;
    }

    /// Close the current day so its pulses become the look-back window.
    pub fn end_day(&mut self) {
        let today = std::mem::take(&mut self.today);
        self.pulse_history.push_front(today.pulses);
        self.days_completed += 1;
    }

    pub fn days_completed(&self) -> u32 {
        self.days_completed
    }
}
