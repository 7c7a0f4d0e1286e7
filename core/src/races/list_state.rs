//! Authoritative race set and filter selection.
//!
//! Pure and synchronous: one owner mutates it (see
//! [`RaceService`](super::RaceService)) and everyone else reads snapshots.

use std::collections::{BTreeMap, BTreeSet};

use crate::context::DEFAULT_RACE_DISPLAY_COUNT;
use crate::feed::{FeedOutcome, RemoteRace};

use super::race::Race;

/// Why the last load did not produce races. Both surface as `show_error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadFailure {
    Transport(String),
    EmptyPayload,
}

/// What the owner has to do after a race expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryOutcome {
    /// Race was not in the set (already replaced by a newer load).
    Ignored,
    /// Race removed; enough races remain to fill the display.
    Removed,
    /// Race removed and the display can no longer be filled; fetch again.
    RefillNeeded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RaceListState {
    // Keyed by race_id; ordered so derived views are reproducible.
    races: BTreeMap<String, Race>,
    selected_category_filters: BTreeSet<String>,
    is_loading: bool,
    show_error: bool,
    show_filters: bool,
    last_failure: Option<LoadFailure>,
    display_count: usize,
}

impl Default for RaceListState {
    fn default() -> Self {
        Self::with_display_count(DEFAULT_RACE_DISPLAY_COUNT)
    }
}

impl RaceListState {
    pub fn with_display_count(display_count: usize) -> Self {
        Self {
            races: BTreeMap::new(),
            selected_category_filters: BTreeSet::new(),
            is_loading: true,
            show_error: false,
            show_filters: false,
            last_failure: None,
            display_count,
        }
    }

    // --- Mutations ---

    /// Apply a feed outcome.
    ///
    /// A successful load replaces the race set wholesale and keeps the
    /// filter selection. An empty or missing payload counts as a failure;
    /// failures keep whatever races were loaded before.
    pub fn load(&mut self, outcome: FeedOutcome) {
        match outcome {
            FeedOutcome::Loading => {
                self.is_loading = true;
                self.show_error = false;
            }
            FeedOutcome::Success(Some(records)) if !records.is_empty() => {
                let races = map_records(records);
                if races.is_empty() {
                    self.fail(LoadFailure::EmptyPayload);
                    return;
                }
                tracing::info!(count = races.len(), "Races loaded");
                self.races = races;
                self.is_loading = false;
                self.show_error = false;
                self.last_failure = None;
            }
            FeedOutcome::Success(_) => self.fail(LoadFailure::EmptyPayload),
            FeedOutcome::Error(e) => self.fail(LoadFailure::Transport(e.to_string())),
        }
    }

    fn fail(&mut self, failure: LoadFailure) {
        tracing::warn!(?failure, "Race load failed");
        self.is_loading = false;
        self.show_error = true;
        self.last_failure = Some(failure);
    }

    /// Drop an expired race and report whether the list needs a refill.
    pub fn on_race_expired(&mut self, race_id: &str) -> ExpiryOutcome {
        let Some(race) = self.races.remove(race_id) else {
            tracing::debug!(race_id, "Expired race no longer in list");
            return ExpiryOutcome::Ignored;
        };

        let remaining = self.races.len();
        tracing::info!(
            race_id,
            remaining,
            "{} finished, {} races remain",
            race.title(),
            remaining
        );

        if remaining.min(self.display_count) < self.display_count {
            ExpiryOutcome::RefillNeeded
        } else {
            ExpiryOutcome::Removed
        }
    }

    /// Select the category if unselected, otherwise unselect it.
    pub fn toggle_filter(&mut self, category_id: &str) {
        if !self.selected_category_filters.remove(category_id) {
            self.selected_category_filters
                .insert(category_id.to_string());
        }
        tracing::debug!(category_id, selected = ?self.selected_category_filters, "Toggled filter");
    }

    pub fn clear_filters(&mut self) {
        self.selected_category_filters.clear();
    }

    pub fn set_show_filters(&mut self, show: bool) {
        self.show_filters = show;
    }

    // --- Derived views ---

    /// Races sorted by start time (ties by meeting name), cut to `limit`,
    /// then narrowed to the selected categories if any are selected.
    ///
    /// Filtering happens after the cut, so a matching race beyond the first
    /// `limit` never shows up here.
    pub fn visible_races(&self, limit: usize) -> Vec<&Race> {
        let mut sorted: Vec<&Race> = self.races.values().collect();
        sorted.sort_by(|a, b| {
            a.advertised_start
                .cmp(&b.advertised_start)
                .then_with(|| a.meeting_name.cmp(&b.meeting_name))
        });
        sorted.truncate(limit);

        if self.selected_category_filters.is_empty() {
            return sorted;
        }
        sorted
            .into_iter()
            .filter(|race| self.selected_category_filters.contains(&race.category_id))
            .collect()
    }

    /// [`visible_races`](Self::visible_races) at the display count.
    pub fn next_races(&self) -> Vec<&Race> {
        self.visible_races(self.display_count)
    }

    // --- Accessors ---

    pub fn races(&self) -> impl Iterator<Item = &Race> {
        self.races.values()
    }

    pub fn race(&self, race_id: &str) -> Option<&Race> {
        self.races.get(race_id)
    }

    pub fn len(&self) -> usize {
        self.races.len()
    }

    pub fn is_empty(&self) -> bool {
        self.races.is_empty()
    }

    pub fn selected_category_filters(&self) -> &BTreeSet<String> {
        &self.selected_category_filters
    }

    pub fn is_filter_selected(&self, category_id: &str) -> bool {
        self.selected_category_filters.contains(category_id)
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn show_error(&self) -> bool {
        self.show_error
    }

    pub fn show_filters(&self) -> bool {
        self.show_filters
    }

    pub fn last_failure(&self) -> Option<&LoadFailure> {
        self.last_failure.as_ref()
    }

    pub fn display_count(&self) -> usize {
        self.display_count
    }
}

fn map_records(records: Vec<RemoteRace>) -> BTreeMap<String, Race> {
    let mut races = BTreeMap::new();
    for record in records {
        match Race::try_from(record) {
            Ok(race) => {
                races.insert(race.race_id.clone(), race);
            }
            Err(e) => tracing::warn!(error = %e, "Skipping race record"),
        }
    }
    races
}
